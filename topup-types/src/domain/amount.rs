//! Top-up amount value object.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

const MIN_AMOUNT: Decimal = dec!(1000);
const MAX_AMOUNT: Decimal = dec!(100000);
const SCALE: u32 = 2;

/// A validated top-up amount in Colombian pesos.
///
/// The raw value is rounded to two decimals (half away from zero) before the
/// range check, so `999.995` is accepted as `1000.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn of(raw: Decimal) -> Result<Self, ValidationError> {
        let mut value = raw.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(SCALE);

        if value <= Decimal::ZERO {
            return Err(ValidationError::AmountNotPositive);
        }
        if value < MIN_AMOUNT {
            return Err(ValidationError::AmountBelowMinimum {
                minimum: format_currency(MIN_AMOUNT),
            });
        }
        if value > MAX_AMOUNT {
            return Err(ValidationError::AmountAboveMaximum {
                maximum: format_currency(MAX_AMOUNT),
            });
        }

        Ok(Self(value))
    }

    /// Parses a decimal string such as `"5000"` or `"5000.50"`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let value: Decimal = trimmed
            .parse()
            .map_err(|_| ValidationError::AmountNotNumeric(trimmed.to_string()))?;
        Self::of(value)
    }

    /// Builds an amount from a value expressed in cents.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        Self::of(Decimal::new(cents, SCALE))
    }

    pub fn minimum() -> Self {
        let mut value = MIN_AMOUNT;
        value.rescale(SCALE);
        Self(value)
    }

    pub fn maximum() -> Self {
        let mut value = MAX_AMOUNT;
        value.rescale(SCALE);
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_valid_for_top_up(&self) -> bool {
        self.0 >= MIN_AMOUNT && self.0 <= MAX_AMOUNT
    }

    pub fn is_maximum_amount(&self) -> bool {
        self.0 == MAX_AMOUNT
    }

    /// Formats as Colombian pesos, e.g. `$ 5.000,00`.
    pub fn to_currency_string(&self) -> String {
        format_currency(self.0)
    }
}

fn format_currency(amount: Decimal) -> String {
    let mut scaled = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    scaled.rescale(SCALE);
    let mantissa = scaled.mantissa().unsigned_abs();
    let units = (mantissa / 100).to_string();
    let cents = mantissa % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if scaled.is_sign_negative() { "-" } else { "" };
    format!("{sign}$ {grouped},{cents:02}")
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_currency_string())
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::of(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_bounds_inclusive() {
        assert_eq!(Amount::of(dec!(1000)).unwrap().value(), dec!(1000.00));
        assert_eq!(Amount::of(dec!(100000)).unwrap().value(), dec!(100000.00));
    }

    #[test]
    fn test_amount_below_minimum() {
        let result = Amount::of(dec!(500));
        assert!(matches!(result, Err(ValidationError::AmountBelowMinimum { .. })));
    }

    #[test]
    fn test_amount_above_maximum() {
        let result = Amount::of(dec!(100000.01));
        assert!(matches!(result, Err(ValidationError::AmountAboveMaximum { .. })));
    }

    #[test]
    fn test_amount_not_positive() {
        assert_eq!(Amount::of(dec!(0)), Err(ValidationError::AmountNotPositive));
        assert_eq!(Amount::of(dec!(-5000)), Err(ValidationError::AmountNotPositive));
    }

    #[test]
    fn test_rounding_happens_before_range_check() {
        assert_eq!(Amount::of(dec!(999.995)).unwrap().value(), dec!(1000.00));
        assert!(Amount::of(dec!(999.994)).is_err());
        assert!(Amount::of(dec!(100000.004)).is_ok());
        assert!(Amount::of(dec!(100000.005)).is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Amount::parse(" 5000.5 ").unwrap().value(), dec!(5000.50));
        assert!(matches!(
            Amount::parse("cinco mil"),
            Err(ValidationError::AmountNotNumeric(_))
        ));
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Amount::from_cents(500_000).unwrap().value(), dec!(5000.00));
        assert!(Amount::from_cents(50_000).is_err());
    }

    #[test]
    fn test_currency_format() {
        assert_eq!(Amount::of(dec!(5000)).unwrap().to_currency_string(), "$ 5.000,00");
        assert_eq!(Amount::maximum().to_currency_string(), "$ 100.000,00");
        assert_eq!(Amount::of(dec!(1234.5)).unwrap().to_string(), "$ 1.234,50");
    }

    #[test]
    fn test_maximum_predicates() {
        assert!(Amount::maximum().is_maximum_amount());
        assert!(!Amount::minimum().is_maximum_amount());
        assert!(Amount::minimum().is_valid_for_top_up());
    }

    #[test]
    fn test_below_minimum_message_mentions_limit() {
        let err = Amount::of(dec!(10)).unwrap_err();
        assert_eq!(err.to_string(), "El valor debe ser mayor o igual a $ 1.000,00");
    }
}
