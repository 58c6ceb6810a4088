use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// A monetary amount held at two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Formats as `1234,56`: comma decimal separator, no thousands grouping.
    pub fn to_comma_string(self) -> String {
        format!("{:.2}", self.0).replace('.', ",")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalSeparator {
    #[default]
    Comma,
    Dot,
}

/// Parses a statement-style amount such as `R$ 1.234,56`.
///
/// Everything except digits and commas is discarded and the comma becomes the
/// decimal point, so signs and currency symbols never survive: the result is a
/// magnitude. Anything that does not parse yields zero.
pub fn normalize_amount(raw: &str) -> Decimal {
    normalize_amount_with(raw, DecimalSeparator::Comma)
}

/// [`normalize_amount`] for sources whose decimal separator is configurable.
/// With [`DecimalSeparator::Dot`] the input is read as a native number
/// (`-1000.5`), keeping digits and dots only.
pub fn normalize_amount_with(raw: &str, separator: DecimalSeparator) -> Decimal {
    let cleaned: String = match separator {
        DecimalSeparator::Comma => raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == ',')
            .map(|c| if c == ',' { '.' } else { c })
            .collect(),
        DecimalSeparator::Dot => raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect(),
    };
    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn normalize_amount_thousands_and_comma() {
        assert_eq!(normalize_amount("1.234,56"), dec("1234.56"));
    }

    #[test]
    fn normalize_amount_currency_symbol() {
        assert_eq!(normalize_amount("R$ 45,00"), dec("45.00"));
    }

    #[test]
    fn normalize_amount_empty_is_zero() {
        assert_eq!(normalize_amount(""), Decimal::ZERO);
    }

    #[test]
    fn normalize_amount_garbage_is_zero() {
        assert_eq!(normalize_amount("n/a"), Decimal::ZERO);
        // Two commas leave two decimal points behind.
        assert_eq!(normalize_amount("1,234,56"), Decimal::ZERO);
    }

    #[test]
    fn normalize_amount_drops_sign() {
        assert_eq!(normalize_amount("-1000,00"), dec("1000.00"));
    }

    #[test]
    fn normalize_amount_dot_separator() {
        assert_eq!(
            normalize_amount_with("-1000.50", DecimalSeparator::Dot),
            dec("1000.50")
        );
        assert_eq!(normalize_amount_with("abc", DecimalSeparator::Dot), Decimal::ZERO);
    }

    #[test]
    fn from_decimal_rounds_to_cents() {
        assert_eq!(
            Money::from_decimal(dec("100.004")),
            Money::from_decimal(dec("100.001"))
        );
        assert_eq!(Money::from_decimal(dec("100.004")), Money::from_cents(10000));
    }

    #[test]
    fn comma_string_format() {
        assert_eq!(Money::from_cents(123456).to_comma_string(), "1234,56");
        assert_eq!(Money::from_cents(5).to_comma_string(), "0,05");
    }

    #[test]
    fn positive_and_abs() {
        assert!(Money::from_cents(1).is_positive());
        assert!(!Money::zero().is_positive());
        assert!(!Money::from_cents(-1).is_positive());
        assert_eq!(Money::from_cents(-250).abs(), Money::from_cents(250));
    }
}
