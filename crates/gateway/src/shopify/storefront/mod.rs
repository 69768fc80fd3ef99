//! Shopify Storefront API cart operations.
//!
//! Queries are plain GraphQL documents sent as `graphql_client::QueryBody`;
//! responses decode through `graphql_client::Response`.

mod queries;

use graphql_client::{QueryBody, Response};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use shopgate_core::{Cart, CartId, CartLineId, MerchandiseId};

use super::client::GatewayClient;
use super::transport::Transport;
use super::{GraphQLError, Operation, ShopifyError};

use queries::{
    ADD_CART_LINES, AddCartLinesData, AddCartLinesVariables, CART_LINES_PAGE, CartLineInput,
    CartMutationPayload, CartNode,
    GET_CART, GetCartData, GetCartVariables, REMOVE_CART_LINES, RemoveCartLinesData,
    RemoveCartLinesVariables,
};

impl<T: Transport> GatewayClient<T> {
    /// Execute a GraphQL document against the Storefront endpoint.
    async fn execute<V, D>(
        &self,
        operation: Operation,
        operation_name: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<D, ShopifyError>
    where
        V: Serialize,
        D: DeserializeOwned,
    {
        let request_body = QueryBody {
            variables,
            query,
            operation_name,
        };
        let payload = serde_json::to_vec(&request_body)
            .map_err(|source| ShopifyError::Encode { operation, source })?;

        let body = self
            .dispatch(
                operation,
                Method::POST,
                self.inner.storefront_url.clone(),
                self.storefront_auth(),
                Some(payload),
                &[200],
            )
            .await?;

        let response: Response<D> = serde_json::from_str(&body).map_err(|source| {
            tracing::error!(
                %operation,
                error = %source,
                body = %super::truncate_body(&body),
                "Failed to parse Shopify GraphQL response"
            );
            ShopifyError::Decode { operation, source }
        })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL {
                operation,
                errors: errors.into_iter().map(GraphQLError::from).collect(),
            });
        }

        response.data.ok_or(ShopifyError::MissingField {
            operation,
            key: "data",
        })
    }

    /// Fetch a cart by id.
    ///
    /// At most the first 100 lines are returned; a longer cart is logged at
    /// WARN and relayed truncated.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::MissingField` if Shopify has no such cart, or
    /// any transport, status, decode, or GraphQL error.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn fetch_cart(&self, cart_id: &CartId) -> Result<Cart, ShopifyError> {
        const OPERATION: Operation = Operation::FetchCart;

        let data: GetCartData = self
            .execute(
                OPERATION,
                "GetCart",
                GET_CART,
                GetCartVariables { id: cart_id },
            )
            .await?;

        data.cart
            .map(|node| into_cart(OPERATION, node))
            .ok_or(ShopifyError::MissingField {
                operation: OPERATION,
                key: "cart",
            })
    }

    /// Remove one line from a cart and return the updated cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserErrors` if Shopify rejects the removal, or
    /// any transport, status, decode, or GraphQL error.
    #[instrument(skip(self), fields(cart_id = %cart_id, line_id = %line_id))]
    pub async fn remove_cart_line(
        &self,
        cart_id: &CartId,
        line_id: &CartLineId,
    ) -> Result<Cart, ShopifyError> {
        const OPERATION: Operation = Operation::RemoveCartLine;

        let data: RemoveCartLinesData = self
            .execute(
                OPERATION,
                "RemoveCartLines",
                REMOVE_CART_LINES,
                RemoveCartLinesVariables {
                    cart_id,
                    line_ids: [line_id],
                },
            )
            .await?;

        mutation_cart(OPERATION, data.cart_lines_remove, "cartLinesRemove")
    }

    /// Add a merchandise line to a cart and return the updated cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserErrors` if Shopify rejects the line, or any
    /// transport, status, decode, or GraphQL error.
    #[instrument(skip(self), fields(cart_id = %cart_id, merchandise_id = %merchandise_id))]
    pub async fn add_cart_line(
        &self,
        cart_id: &CartId,
        merchandise_id: &MerchandiseId,
        quantity: u32,
    ) -> Result<Cart, ShopifyError> {
        const OPERATION: Operation = Operation::AddCartLine;

        let data: AddCartLinesData = self
            .execute(
                OPERATION,
                "AddCartLines",
                ADD_CART_LINES,
                AddCartLinesVariables {
                    cart_id,
                    lines: [CartLineInput {
                        merchandise_id,
                        quantity,
                    }],
                },
            )
            .await?;

        mutation_cart(OPERATION, data.cart_lines_add, "cartLinesAdd")
    }
}

/// Pull the cart out of a mutation payload, surfacing `userErrors` first.
fn mutation_cart(
    operation: Operation,
    payload: Option<CartMutationPayload>,
    payload_key: &'static str,
) -> Result<Cart, ShopifyError> {
    let payload = payload.ok_or(ShopifyError::MissingField {
        operation,
        key: payload_key,
    })?;

    if !payload.user_errors.is_empty() {
        return Err(ShopifyError::UserErrors {
            operation,
            errors: payload.user_errors,
        });
    }

    payload
        .cart
        .map(|node| into_cart(operation, node))
        .ok_or(ShopifyError::MissingField {
            operation,
            key: "cart",
        })
}

fn into_cart(operation: Operation, node: CartNode) -> Cart {
    if node.is_truncated() {
        tracing::warn!(
            %operation,
            cart_id = %node.id,
            limit = CART_LINES_PAGE,
            "Cart has more lines than one page; relaying the first page only"
        );
    }
    let cart = Cart::from(node);
    tracing::debug!(
        lines = cart.lines.len(),
        quantity = cart.total_quantity(),
        "Decoded cart"
    );
    cart
}
