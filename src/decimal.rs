use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use crate::errors::{RateEngineError, Result};

/// number of rate units in one whole (rates are quoted per ten thousand)
pub const RATE_UNITS: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// currency precision for rounding interest amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyPrecision {
    /// domestic currency, no fractional digits
    Domestic,
    /// foreign currencies, two fractional digits
    Foreign,
}

impl CurrencyPrecision {
    /// number of fractional digits
    pub fn digits(&self) -> u32 {
        match self {
            CurrencyPrecision::Domestic => 0,
            CurrencyPrecision::Foreign => 2,
        }
    }

    /// create from a digit count, only 0 and 2 are meaningful
    pub fn from_digits(digits: u32) -> Result<Self> {
        match digits {
            0 => Ok(CurrencyPrecision::Domestic),
            2 => Ok(CurrencyPrecision::Foreign),
            other => Err(RateEngineError::InvalidPrecision { digits: other }),
        }
    }
}

/// exact currency amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal, kept exact
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> std::result::Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// round half away from zero and pin the scale to the currency precision
    pub fn round_to(&self, precision: CurrencyPrecision) -> Self {
        Money(round_and_rescale(self.0, precision.digits()))
    }

    /// round to an arbitrary number of places, pinning the scale
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(round_and_rescale(self.0, dp))
    }

    /// simple interest for `days` out of `year_days` at a per-ten-thousand rate
    pub fn simple_interest(&self, rate: Rate, days: u32, year_days: u32) -> Money {
        if year_days == 0 {
            return Money::ZERO;
        }
        Money(self.0 * rate.as_fraction() * Decimal::from(days) / Decimal::from(year_days))
    }

    /// scale by a plain factor
    pub fn scale_by(&self, factor: Decimal) -> Money {
        Money(self.0 * factor)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

/// interest rate quoted per ten thousand (250 is 2.5% a year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from per-ten-thousand units
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from whole per-ten-thousand units
    pub fn from_units(units: i64) -> Self {
        Rate(Decimal::from(units))
    }

    /// create from a plain fraction (0.025 becomes 250)
    pub fn from_fraction(fraction: Decimal) -> Self {
        Rate(fraction * RATE_UNITS)
    }

    /// per-ten-thousand units
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// plain fraction (250 becomes 0.025)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / RATE_UNITS
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// negative rates are never propagated
    pub fn floor_at_zero(self) -> Rate {
        if self.is_negative() {
            Rate::ZERO
        } else {
            self
        }
    }

    /// round half away from zero to `dp` places
    pub fn round_dp(&self, dp: u32) -> Rate {
        Rate(self.0.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn round_and_rescale(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_pins_scale() {
        let whole = Money::from_major(1_000);
        assert_eq!(whole.round_to(CurrencyPrecision::Foreign).as_decimal().scale(), 2);
        assert_eq!(whole.round_to(CurrencyPrecision::Domestic).as_decimal().scale(), 0);

        let fractional = Money::from_decimal(dec!(2117.4863));
        assert_eq!(fractional.round_to(CurrencyPrecision::Domestic).as_decimal(), dec!(2117));
        assert_eq!(fractional.round_to(CurrencyPrecision::Foreign).as_decimal(), dec!(2117.49));
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(
            Money::from_decimal(dec!(10.5)).round_to(CurrencyPrecision::Domestic),
            Money::from_major(11),
        );
        assert_eq!(
            Money::from_decimal(dec!(-10.5)).round_to(CurrencyPrecision::Domestic),
            Money::from_major(-11),
        );
    }

    #[test]
    fn test_parse_amounts() {
        let amount: Money = "1234.50".parse().unwrap();
        assert_eq!(amount, Money::from_decimal(dec!(1234.5)));
        assert_eq!(amount.to_string(), "1234.50");
        assert!("12,34".parse::<Money>().is_err());

        let total: Money = [amount, Money::from_major(1)].iter().sum();
        assert_eq!(total, Money::from_decimal(dec!(1235.50)));
    }

    #[test]
    fn test_precision_digits() {
        assert_eq!(CurrencyPrecision::from_digits(0).unwrap(), CurrencyPrecision::Domestic);
        assert_eq!(CurrencyPrecision::from_digits(2).unwrap(), CurrencyPrecision::Foreign);
        assert!(CurrencyPrecision::from_digits(3).is_err());
    }

    #[test]
    fn test_simple_interest() {
        let principal = Money::from_major(1_000_000);
        let interest = principal.simple_interest(Rate::from_units(250), 31, 366);
        assert_eq!(interest.round_to(CurrencyPrecision::Domestic), Money::from_major(2117));
    }

    #[test]
    fn test_rate_units() {
        let rate = Rate::from_units(250);
        assert_eq!(rate.as_fraction(), dec!(0.025));
        assert_eq!(Rate::from_fraction(dec!(0.025)), rate);
        assert_eq!(Rate::from_units(-50).floor_at_zero(), Rate::ZERO);
        assert_eq!(rate.floor_at_zero(), rate);
    }
}
