//! Cart store errors.

use thiserror::Error;

/// Errors returned by [`CartStore`](super::CartStore) mutations.
///
/// A mutation that returns an error has not touched the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The requested quantity is negative or does not fit in a `u32`.
    #[error("invalid quantity {quantity}: must be between 0 and {}", u32::MAX)]
    InvalidQuantity {
        /// The rejected quantity, as requested.
        quantity: i64,
    },
}
