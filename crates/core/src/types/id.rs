//! Newtype IDs for type-safe entity references.
//!
//! Product identifiers are opaque strings chosen by whoever maintains the
//! catalog (e.g. `basic-av`). They are compared byte-for-byte and never
//! normalized, so `Basic-AV` and `basic-av` are different products.

use core::borrow::Borrow;
use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a product, unique within a cart and within a catalog.
///
/// Any string is accepted, including the empty string.
///
/// # Example
///
/// ```rust
/// use shieldsync_core::ProductId;
///
/// let id = ProductId::from("basic-av");
/// assert_eq!(id.as_str(), "basic-av");
/// assert_eq!(id.to_string(), "basic-av");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the ID and return the owned string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_is_case_sensitive() {
        assert_ne!(ProductId::from("basic-av"), ProductId::from("Basic-AV"));
    }

    #[test]
    fn test_product_id_accepts_empty() {
        let id = ProductId::new("");
        assert_eq!(id.as_str(), "");
    }

    #[test]
    fn test_product_id_serializes_transparently() {
        let json = serde_json::to_string(&ProductId::from("pro-av")).unwrap_or_default();
        assert_eq!(json, "\"pro-av\"");
    }
}
