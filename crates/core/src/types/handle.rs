//! Opaque Storefront API handles.
//!
//! Carts and cart lines live entirely on Shopify's side. The gateway never
//! interprets these values; it only checks they are present and relays them
//! (e.g. `gid://shopify/Cart/c1-abc123?key=...`).

use thiserror::Error;

/// Errors that can occur when parsing a handle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandleError {
    /// The input was empty or only whitespace.
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

macro_rules! define_handle {
    ($name:ident, $label:literal) => {
        #[doc = concat!("Opaque ", $label, " returned by the Storefront API.")]
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse a handle, rejecting empty input.
            ///
            /// # Errors
            ///
            /// Returns [`HandleError::Empty`] if the trimmed input is empty.
            pub fn parse(s: &str) -> Result<Self, HandleError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(HandleError::Empty($label));
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the handle as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the handle and returns its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_handle!(CartId, "cart id");
define_handle!(CartLineId, "cart line id");
define_handle!(MerchandiseId, "merchandise id");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(CartId::parse(""), Err(HandleError::Empty("cart id")));
        assert_eq!(
            CartLineId::parse("   "),
            Err(HandleError::Empty("cart line id"))
        );
    }

    #[test]
    fn test_error_message_names_handle() {
        let err = MerchandiseId::parse("").unwrap_err();
        assert_eq!(err.to_string(), "merchandise id cannot be empty");
    }

    #[test]
    fn test_parse_keeps_gid_verbatim() {
        let id = CartId::parse("gid://shopify/Cart/c1-abc?key=xyz").unwrap();
        assert_eq!(id.as_str(), "gid://shopify/Cart/c1-abc?key=xyz");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"gid://shopify/Cart/c1-abc?key=xyz\""
        );
    }
}
