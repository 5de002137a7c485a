//! Point-in-time view of the cart.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::CartLine;
use crate::types::{Price, ProductId};

/// An immutable copy of the cart as of one committed mutation.
///
/// Snapshots are what observers receive and what view layers render from.
/// The total is computed from the lines on every call; it is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartSnapshot {
    version: u64,
    lines: Vec<CartLine>,
}

impl CartSnapshot {
    pub(crate) const fn new(version: u64, lines: Vec<CartLine>) -> Self {
        Self { version, lines }
    }

    /// Number of mutations committed before this snapshot was taken.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Sum of `unit_price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        total_of(&self.lines)
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub(crate) fn total_of(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}

// Derived fields are written out so consumers of the JSON form do not have
// to recompute them.
impl Serialize for CartSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CartSnapshot", 4)?;
        state.serialize_field("version", &self.version)?;
        state.serialize_field("lines", &self.lines)?;
        state.serialize_field("item_count", &self.item_count())?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}
