//! GraphQL documents for Shopify Storefront API cart operations, plus the
//! variable and response shapes they use.

use serde::{Deserialize, Serialize};

use shopgate_core::{Cart, CartId, CartLine, CartLineId, CartMerchandise, MerchandiseId};

use crate::shopify::UserError;

/// Appends the `CartFields` fragment selected by every cart query and mutation.
macro_rules! with_cart_fields {
    ($body:literal) => {
        concat!(
            $body,
            r"
fragment CartFields on Cart {
  id
  lines(first: 100) {
    pageInfo {
      hasNextPage
    }
    edges {
      node {
        id
        quantity
        merchandise {
          ... on ProductVariant {
            id
            title
            price {
              amount
              currencyCode
            }
          }
        }
      }
    }
  }
}
"
        )
    };
}

pub const GET_CART: &str = with_cart_fields!(
    r"
query GetCart($id: ID!) {
  cart(id: $id) {
    ...CartFields
  }
}
"
);

pub const REMOVE_CART_LINES: &str = with_cart_fields!(
    r"
mutation RemoveCartLines($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart {
      ...CartFields
    }
    userErrors {
      field
      message
    }
  }
}
"
);

pub const ADD_CART_LINES: &str = with_cart_fields!(
    r"
mutation AddCartLines($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFields
    }
    userErrors {
      field
      message
    }
  }
}
"
);

// =============================================================================
// Variables
// =============================================================================

#[derive(Debug, Serialize)]
pub struct GetCartVariables<'a> {
    pub id: &'a CartId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartLinesVariables<'a> {
    pub cart_id: &'a CartId,
    pub line_ids: [&'a CartLineId; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartLinesVariables<'a> {
    pub cart_id: &'a CartId,
    pub lines: [CartLineInput<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput<'a> {
    pub merchandise_id: &'a MerchandiseId,
    pub quantity: u32,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct GetCartData {
    pub cart: Option<CartNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartLinesData {
    pub cart_lines_remove: Option<CartMutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartLinesData {
    pub cart_lines_add: Option<CartMutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<CartNode>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

/// Lines selected per cart; a larger cart comes back cut to this many.
pub const CART_LINES_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CartNode {
    pub id: CartId,
    pub lines: Connection<CartLineNode>,
}

impl CartNode {
    /// Whether Shopify holds more lines than the page returned.
    pub const fn is_truncated(&self) -> bool {
        self.lines.page_info.has_next_page
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<N> {
    #[serde(default)]
    pub page_info: PageInfo,
    pub edges: Vec<Edge<N>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
pub struct Edge<N> {
    pub node: N,
}

#[derive(Debug, Deserialize)]
pub struct CartLineNode {
    pub id: CartLineId,
    pub quantity: i64,
    #[serde(default)]
    pub merchandise: Option<CartMerchandise>,
}

impl From<CartNode> for Cart {
    fn from(node: CartNode) -> Self {
        Self {
            id: node.id,
            lines: node
                .lines
                .edges
                .into_iter()
                .map(|edge| CartLine {
                    id: edge.node.id,
                    quantity: edge.node.quantity,
                    merchandise: edge.node.merchandise,
                })
                .collect(),
        }
    }
}
