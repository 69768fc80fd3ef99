//! Newtype IDs for Shopify Admin API resources.
//!
//! Admin REST resources are identified by 64-bit integers assigned by Shopify.
//! Use the `define_id!` macro to create type-safe wrappers that prevent
//! accidentally mixing IDs from different resource families.

/// Macro to define a type-safe Shopify resource ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Default` (zero)
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
/// - `FromStr`, so ids can be read straight out of form and query fields
///
/// # Example
///
/// ```rust
/// # use shopgate_core::define_id;
/// define_id!(ProductId);
/// define_id!(OrderId);
///
/// let product_id = ProductId::new(1);
/// let order_id: OrderId = "42".parse().unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = order_id;
/// # let _ = (product_id, order_id);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Default,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(ImageId);
define_id!(OrderId);
define_id!(CustomerId);
define_id!(DraftOrderId);
define_id!(CheckoutId);
define_id!(PriceRuleId);
define_id!(DiscountCodeId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id: PriceRuleId = " 1452060672282 ".parse().unwrap();
        assert_eq!(id.as_i64(), 1_452_060_672_282);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!("abc".parse::<DraftOrderId>().is_err());
        assert!("".parse::<DraftOrderId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = VariantId::new(39_072_856);
        assert_eq!(serde_json::to_string(&id).unwrap(), "39072856");

        let parsed: VariantId = serde_json::from_str("39072856").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderId::new(450_789_469).to_string(), "450789469");
    }
}
