//! Cart line items.

use serde::Serialize;

use crate::types::{Price, ProductId};

/// A product the shopper wants to put in the cart.
///
/// This is what the purchase page dispatches; the store decides whether it
/// becomes a new line or bumps an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Price,
}

impl NewCartItem {
    /// Create a new cart item candidate.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, unit_price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
        }
    }
}

/// One product and its quantity in the cart.
///
/// Lines only exist with a quantity of at least one. Name and unit price are
/// fixed by the first add and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    id: ProductId,
    name: String,
    unit_price: Price,
    quantity: u32,
}

impl CartLine {
    /// Start a line from its first add.
    pub(crate) fn first(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            unit_price: item.unit_price,
            quantity: 1,
        }
    }

    pub(crate) fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Callers must remove the line instead of setting zero.
    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        debug_assert!(quantity > 0, "zero-quantity lines are removed, not stored");
        self.quantity = quantity;
    }

    /// Product this line refers to.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    /// Display name captured at first add.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price captured at first add.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Number of units, always at least one.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}
