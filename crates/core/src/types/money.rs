//! Rupee amounts using decimal arithmetic.
//!
//! The marketplace only trades in INR, so `Money` carries no currency code.
//! Amounts are exact decimals: a cart total is the exact sum of
//! `unit price * quantity` with no float drift.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of Indian rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Currency symbol used for display.
    pub const SYMBOL: &'static str = "₹";

    /// Create an amount from a decimal value in rupees.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from whole rupees.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// Zero rupees.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Decimal places a stored amount may carry (`NUMERIC(12, 2)`).
    pub const STORED_SCALE: u32 = 2;

    /// Whether the amount has more than two decimal places, ignoring
    /// trailing zeros.
    #[must_use]
    pub fn has_sub_paise(&self) -> bool {
        self.0.normalize().scale() > Self::STORED_SCALE
    }

    /// Whether the amount fits a `NUMERIC(12, 2)` column.
    #[must_use]
    pub fn fits_storage(&self) -> bool {
        self.0.abs() < Decimal::from(10_000_000_000_i64)
    }

    /// This amount multiplied by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", Self::SYMBOL, self.0)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        Ok(Self(<Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_and_sum() {
        let total: Money = [Money::from_rupees(1330).times(2), Money::from_rupees(1000)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_rupees(3660));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Money::from_rupees(1870).to_string(), "₹1870.00");
        assert_eq!(Money::new(Decimal::new(12_345, 2)).to_string(), "₹123.45");
    }

    #[test]
    fn test_is_negative() {
        assert!(Money::from_rupees(-1).is_negative());
        assert!(!Money::zero().is_negative());
    }
}
