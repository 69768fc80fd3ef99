//! Admin REST API operations.

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::instrument;

use shopgate_core::{
    CheckOut, Customer, DiscountCode, DraftOrder, DraftOrderId, NewOrder, Order, PriceRule,
    PriceRuleId, Product,
};

use super::client::{GatewayClient, decode_envelope, encode_envelope};
use super::transport::Transport;
use super::{Operation, ShopifyError};

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;

/// A listable Admin REST collection: where it lives and which key wraps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminResource {
    pub operation: Operation,
    /// Path relative to `/admin/api/{version}/`.
    pub path: String,
    /// Envelope key holding the array in the response.
    pub key: &'static str,
}

impl AdminResource {
    #[must_use]
    pub fn new(operation: Operation, path: impl Into<String>, key: &'static str) -> Self {
        Self {
            operation,
            path: path.into(),
            key,
        }
    }

    #[must_use]
    pub fn products() -> Self {
        Self::new(Operation::FetchProducts, "products.json", "products")
    }

    #[must_use]
    pub fn orders() -> Self {
        Self::new(Operation::FetchOrders, "orders.json", "orders")
    }

    #[must_use]
    pub fn customers() -> Self {
        Self::new(Operation::FetchCustomers, "customers.json", "customers")
    }

    #[must_use]
    pub fn checkouts() -> Self {
        Self::new(Operation::FetchCheckouts, "checkouts.json", "checkouts")
    }

    #[must_use]
    pub fn price_rules() -> Self {
        Self::new(Operation::FetchPriceRules, "price_rules.json", "price_rules")
    }

    #[must_use]
    pub fn draft_orders() -> Self {
        Self::new(Operation::FetchDraftOrders, "draft_orders.json", "draft_orders")
    }

    /// Discount codes under one price rule.
    #[must_use]
    pub fn discount_codes(price_rule_id: PriceRuleId) -> Self {
        Self::new(
            Operation::FetchDiscountCodes,
            format!("price_rules/{price_rule_id}/discount_codes.json"),
            "discount_codes",
        )
    }
}

impl<T: Transport> GatewayClient<T> {
    /// GET a collection and decode the array under its envelope key.
    ///
    /// An absent or `null` key yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` on transport failure, a non-200 status, or a
    /// body that does not decode.
    #[instrument(skip(self, resource), fields(operation = %resource.operation, path = %resource.path))]
    pub async fn fetch_resource<R: DeserializeOwned>(
        &self,
        resource: AdminResource,
    ) -> Result<Vec<R>, ShopifyError> {
        let url = self.admin_url(&resource.path)?;
        let body = self
            .dispatch(
                resource.operation,
                Method::GET,
                url,
                self.admin_auth(),
                None,
                &[STATUS_OK],
            )
            .await?;

        let records: Vec<R> =
            decode_envelope(resource.operation, &body, resource.key)?.unwrap_or_default();
        tracing::debug!(count = records.len(), "Fetched Shopify records");
        Ok(records)
    }

    /// Fetch all products.
    ///
    /// # Errors
    ///
    /// See [`GatewayClient::fetch_resource`].
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ShopifyError> {
        self.fetch_resource(AdminResource::products()).await
    }

    /// Fetch all orders.
    ///
    /// # Errors
    ///
    /// See [`GatewayClient::fetch_resource`].
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, ShopifyError> {
        self.fetch_resource(AdminResource::orders()).await
    }

    /// Fetch all customers.
    ///
    /// # Errors
    ///
    /// See [`GatewayClient::fetch_resource`].
    pub async fn fetch_customers(&self) -> Result<Vec<Customer>, ShopifyError> {
        self.fetch_resource(AdminResource::customers()).await
    }

    /// Fetch abandoned checkouts.
    ///
    /// # Errors
    ///
    /// See [`GatewayClient::fetch_resource`].
    pub async fn fetch_checkouts(&self) -> Result<Vec<CheckOut>, ShopifyError> {
        self.fetch_resource(AdminResource::checkouts()).await
    }

    /// Fetch all price rules.
    ///
    /// # Errors
    ///
    /// See [`GatewayClient::fetch_resource`].
    pub async fn fetch_price_rules(&self) -> Result<Vec<PriceRule>, ShopifyError> {
        self.fetch_resource(AdminResource::price_rules()).await
    }

    /// Fetch the discount codes of one price rule.
    ///
    /// # Errors
    ///
    /// See [`GatewayClient::fetch_resource`].
    pub async fn fetch_discount_codes(
        &self,
        price_rule_id: PriceRuleId,
    ) -> Result<Vec<DiscountCode>, ShopifyError> {
        self.fetch_resource(AdminResource::discount_codes(price_rule_id))
            .await
    }

    /// Fetch all draft orders.
    ///
    /// # Errors
    ///
    /// See [`GatewayClient::fetch_resource`].
    pub async fn fetch_draft_orders(&self) -> Result<Vec<DraftOrder>, ShopifyError> {
        self.fetch_resource(AdminResource::draft_orders()).await
    }

    /// Create a draft order and return it as Shopify stored it.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if encoding fails, the call fails, the status is
    /// not 201, or the response lacks `draft_order`.
    #[instrument(skip(self, order), fields(line_items = order.line_items.len()))]
    pub async fn create_draft_order(&self, order: &DraftOrder) -> Result<DraftOrder, ShopifyError> {
        const OPERATION: Operation = Operation::CreateDraftOrder;
        const KEY: &str = "draft_order";

        let payload = encode_envelope(OPERATION, KEY, order)?;
        let body = self
            .dispatch(
                OPERATION,
                Method::POST,
                self.admin_url("draft_orders.json")?,
                self.admin_auth(),
                Some(payload),
                &[STATUS_CREATED],
            )
            .await?;

        decode_envelope(OPERATION, &body, KEY)?.ok_or(ShopifyError::MissingField {
            operation: OPERATION,
            key: KEY,
        })
    }

    /// Delete a draft order.
    ///
    /// Succeeds only when the status is in the configured delete set.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if the call fails or the status is not accepted.
    #[instrument(skip(self))]
    pub async fn remove_draft_order(&self, id: DraftOrderId) -> Result<(), ShopifyError> {
        self.dispatch(
            Operation::RemoveDraftOrder,
            Method::DELETE,
            self.admin_url(&format!("draft_orders/{id}.json"))?,
            self.admin_auth(),
            None,
            &self.inner.delete_success_statuses,
        )
        .await?;

        Ok(())
    }

    /// Place an order directly.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if encoding fails, the call fails, the status is
    /// not 201, or the response lacks `order`.
    #[instrument(skip(self, order), fields(customer_id = %order.customer.id))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ShopifyError> {
        const OPERATION: Operation = Operation::CreateOrder;
        const KEY: &str = "order";

        let payload = encode_envelope(OPERATION, KEY, order)?;
        let body = self
            .dispatch(
                OPERATION,
                Method::POST,
                self.admin_url("orders.json")?,
                self.admin_auth(),
                Some(payload),
                &[STATUS_CREATED],
            )
            .await?;

        decode_envelope(OPERATION, &body, KEY)?.ok_or(ShopifyError::MissingField {
            operation: OPERATION,
            key: KEY,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use shopgate_core::{
        Email, FinancialStatus, LineItem, NewOrderCustomer, NewOrderLineItem, OrderId,
        ShippingAddress, VariantId,
    };

    use super::*;
    use crate::config::tests::{base_vars, test_config};
    use crate::config::GatewayConfig;
    use crate::shopify::RequestAuth;
    use crate::shopify::mock::MockTransport;

    fn client(mock: &MockTransport) -> GatewayClient<MockTransport> {
        GatewayClient::with_transport(&test_config(), mock.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_products_decodes_array_under_key() {
        let mock = MockTransport::new();
        mock.respond_json(
            200,
            &json!({"products": [
                {"id": 1, "title": "Mug", "vendor": "Acme", "images": [], "variants": [
                    {"id": 11, "product_id": 1, "title": "Default", "price": "12.50"}
                ]},
                {"id": 2, "title": "Tee", "vendor": "Acme", "images": [], "variants": []}
            ]}),
        );

        let products = client(&mock).fetch_products().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].variants[0].price, Decimal::new(1250, 2));
        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.url.as_str(),
            "https://acme-outfitters.myshopify.com/admin/api/2024-01/products.json"
        );
        assert!(matches!(
            &request.auth,
            RequestAuth::Basic { username, .. } if username == "4f1c2a9b7e"
        ));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_each_fetch_reads_its_own_key() {
        let mock = MockTransport::new();
        mock.respond_json(
            200,
            &json!({"orders": [
                {"id": 450_789_469, "currency": "CAD", "customer": {"id": 207_119_551, "email": "bob@example.com"}},
                {"id": 450_789_470, "currency": "USD"}
            ]}),
        );
        mock.respond_json(
            200,
            &json!({"customers": [{"id": 207_119_551, "state": "enabled", "email": "bob@example.com"}]}),
        );
        mock.respond_json(
            200,
            &json!({"checkouts": [{"id": 901_414_060, "cart_token": "68778783ad298f1c80c3bafcddeea02f"}]}),
        );
        mock.respond_json(
            200,
            &json!({"price_rules": [
                {"id": 507_328_175, "starts_at": "2024-01-01T00:00:00-05:00", "value": "-10.0"}
            ]}),
        );

        let client = client(&mock);
        let orders = client.fetch_orders().await.unwrap();
        let customers = client.fetch_customers().await.unwrap();
        let checkouts = client.fetch_checkouts().await.unwrap();
        let price_rules = client.fetch_price_rules().await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, OrderId::new(450_789_469));
        assert_eq!(orders[0].currency, "CAD");
        assert_eq!(orders[1].currency, "USD");
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].email.as_deref(), Some("bob@example.com"));
        assert_eq!(checkouts.len(), 1);
        assert_eq!(
            checkouts[0].cart_token.as_deref(),
            Some("68778783ad298f1c80c3bafcddeea02f")
        );
        assert_eq!(price_rules.len(), 1);
        assert_eq!(price_rules[0].id, PriceRuleId::new(507_328_175));

        let paths: Vec<String> = mock
            .requests()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(
            paths,
            [
                "/admin/api/2024-01/orders.json",
                "/admin/api/2024-01/customers.json",
                "/admin/api/2024-01/checkouts.json",
                "/admin/api/2024-01/price_rules.json",
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_ignores_neighbouring_keys() {
        for (resource, body) in [
            (AdminResource::orders(), json!({"order": [{"id": 1, "currency": "CAD"}]})),
            (AdminResource::customers(), json!({"customer": [{"id": 1}]})),
            (AdminResource::checkouts(), json!({"checkout": [{"id": 1}]})),
            (AdminResource::price_rules(), json!({"price_rule": [{"id": 1}]})),
        ] {
            let mock = MockTransport::new();
            mock.respond_json(200, &body);

            let records: Vec<serde_json::Value> =
                client(&mock).fetch_resource(resource.clone()).await.unwrap();

            assert!(records.is_empty(), "{}", resource.key);
        }
    }

    #[tokio::test]
    async fn test_fetch_with_absent_key_is_empty() {
        let mock = MockTransport::new();
        mock.respond_json(200, &json!({"something_else": [1, 2]}));
        mock.respond_json(200, &json!({"orders": null}));

        let client = client(&mock);
        assert!(client.fetch_customers().await.unwrap().is_empty());
        assert!(client.fetch_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_non_200_reports_status() {
        let mock = MockTransport::new();
        mock.respond(401, r#"{"errors":"[API] Invalid API key or access token"}"#);

        let err = client(&mock).fetch_price_rules().await.unwrap_err();

        let text = err.to_string();
        assert!(text.contains("401"), "{text}");
        assert!(text.contains("Invalid API key"), "{text}");
    }

    #[tokio::test]
    async fn test_fetch_discount_codes_uses_rule_path() {
        let mock = MockTransport::new();
        mock.respond_json(
            200,
            &json!({"discount_codes": [
                {"id": 507_328_175, "price_rule_id": 42, "code": "SUMMERSALE10OFF", "usage_count": 0}
            ]}),
        );

        let codes = client(&mock)
            .fetch_discount_codes(PriceRuleId::new(42))
            .await
            .unwrap();

        assert_eq!(codes[0].code, "SUMMERSALE10OFF");
        assert!(
            mock.requests()[0]
                .url
                .path()
                .ends_with("/price_rules/42/discount_codes.json")
        );
    }

    #[tokio::test]
    async fn test_create_draft_order_round_trip() {
        let order = DraftOrder::new(vec![
            LineItem::new(VariantId::new(447_654_529), 1, "IPod Nano").unwrap(),
            LineItem::new(VariantId::new(39_072_856), 3, "Case").unwrap(),
        ]);
        let mock = MockTransport::new();
        let mut echoed = serde_json::to_value(&order).unwrap();
        echoed["id"] = json!(994_118_539);
        mock.respond_json(201, &json!({"draft_order": echoed}));

        let created = client(&mock).create_draft_order(&order).await.unwrap();

        assert_eq!(created.id, Some(DraftOrderId::new(994_118_539)));
        assert_eq!(created.line_items, order.line_items);
        assert_eq!(
            mock.request_json(0),
            json!({"draft_order": serde_json::to_value(&order).unwrap()})
        );
        assert_eq!(mock.requests()[0].method, Method::POST);
    }

    #[tokio::test]
    async fn test_create_draft_order_requires_201() {
        let mock = MockTransport::new();
        mock.respond_json(200, &json!({"draft_order": {"line_items": []}}));

        let order = DraftOrder::new(vec![LineItem::new(VariantId::new(1), 1, "Mug").unwrap()]);
        let err = client(&mock).create_draft_order(&order).await.unwrap_err();
        assert!(matches!(err, ShopifyError::Status { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_create_draft_order_missing_key() {
        let mock = MockTransport::new();
        mock.respond_json(201, &json!({}));

        let order = DraftOrder::new(vec![LineItem::new(VariantId::new(1), 1, "Mug").unwrap()]);
        let err = client(&mock).create_draft_order(&order).await.unwrap_err();
        assert!(matches!(
            err,
            ShopifyError::MissingField {
                key: "draft_order",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_remove_draft_order_sends_one_delete() {
        let mock = MockTransport::new();
        mock.respond(200, "{}");

        client(&mock)
            .remove_draft_order(DraftOrderId::new(994_118_539))
            .await
            .unwrap();

        assert_eq!(mock.call_count(), 1);
        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::DELETE);
        assert!(request.url.as_str().contains("994118539"));
    }

    #[tokio::test]
    async fn test_remove_draft_order_rejects_other_statuses() {
        let mock = MockTransport::new();
        mock.respond(204, "");
        mock.respond(404, r#"{"errors":"Not Found"}"#);

        let client = client(&mock);
        let no_content = client
            .remove_draft_order(DraftOrderId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(no_content, ShopifyError::Status { status: 204, .. }));

        let missing = client
            .remove_draft_order(DraftOrderId::new(1))
            .await
            .unwrap_err();
        assert!(missing.to_string().contains(r#"{"errors":"Not Found"}"#));
    }

    #[tokio::test]
    async fn test_remove_draft_order_honours_configured_statuses() {
        let mut vars = base_vars();
        vars.insert("SHOPIFY_DELETE_SUCCESS_STATUSES", "200,204");
        let config =
            GatewayConfig::from_lookup(&|key| vars.get(key).map(|v| (*v).to_string())).unwrap();
        let mock = MockTransport::new();
        mock.respond(204, "");

        let client = GatewayClient::with_transport(&config, mock.clone()).unwrap();
        client
            .remove_draft_order(DraftOrderId::new(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_order_posts_order_envelope() {
        let new_order = NewOrder {
            customer: NewOrderCustomer {
                id: shopgate_core::CustomerId::new(207_119_551),
                email: Email::parse("bob@example.com").unwrap(),
            },
            line_items: vec![NewOrderLineItem {
                variant_id: VariantId::new(447_654_529),
                quantity: 1,
            }],
            shipping_address: ShippingAddress {
                address1: "1 Main St".to_string(),
                city: "Ottawa".to_string(),
                province: "ON".to_string(),
                country: "CA".to_string(),
            },
            financial_status: FinancialStatus::Pending,
        };
        let mock = MockTransport::new();
        mock.respond_json(
            201,
            &json!({"order": {"id": 450_789_469, "currency": "CAD",
                "customer": {"id": 207_119_551, "email": "bob@example.com"}}}),
        );

        let order = client(&mock).create_order(&new_order).await.unwrap();

        assert_eq!(order.id, OrderId::new(450_789_469));
        let sent = mock.request_json(0);
        assert_eq!(sent["order"]["financial_status"], "pending");
        assert_eq!(sent["order"]["line_items"][0]["variant_id"], 447_654_529);
        assert!(mock.requests()[0].url.path().ends_with("/orders.json"));
    }
}
