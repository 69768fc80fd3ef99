//! Deserialization helpers for Shopify's loosely-typed JSON.

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` the same as a missing field.
///
/// Shopify sends `null` for unset scalars (e.g. `variant_id` on custom line
/// items); these decode to the type's zero value instead of failing the whole
/// envelope. Pair with `#[serde(default)]`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
