//! Type-safe price representation using decimal arithmetic.
//!
//! SHIELDSYNC sells in a single currency, the Indian rupee, so a [`Price`] is
//! just a non-negative amount. Display follows the `en-IN` locale: the last
//! three integer digits form one group and every two digits before that form
//! another (`₹1,23,456.5`). At most three fraction digits are shown, with
//! midpoints rounded away from zero, the way `Intl.NumberFormat` renders a
//! plain `en-IN` number.

use core::fmt;
use core::iter::Sum;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount in rupees.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use shieldsync_core::Price;
///
/// let price = Price::whole(14);
/// assert_eq!(price.times(2), Price::whole(28));
/// assert_eq!(Price::whole(123_456).display_inr(), "₹1,23,456");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn whole(rupees: u32) -> Self {
        Self(Decimal::from(rupees))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// Add two prices, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.checked_add(other.0).unwrap_or(Decimal::MAX))
    }

    /// Format for display with the rupee sign and Indian digit grouping.
    ///
    /// Amounts are rounded to three decimals and trailing zeros are dropped,
    /// so `14.00` renders as `₹14`, `1234.50` as `₹1,234.5` and `2.3455` as
    /// `₹2.346`.
    #[must_use]
    pub fn display_inr(&self) -> String {
        let rendered = self
            .0
            .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string();
        let (integer, fraction) = rendered
            .split_once('.')
            .map_or((rendered.as_str(), None), |(i, f)| (i, Some(f)));

        let grouped = group_indian(integer);
        match fraction {
            Some(fraction) => format!("₹{grouped}.{fraction}"),
            None => format!("₹{grouped}"),
        }
    }
}

const DISPLAY_DECIMALS: u32 = 3;

/// Group integer digits as `xx,xx,xxx`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    groups.push(head);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_inr())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}
