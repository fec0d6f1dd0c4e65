use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Money type with 2 decimal places, matching ledger currency precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

/// round to currency precision and pin the scale so display and
/// serialization always carry two places
fn two_dp(d: Decimal) -> Decimal {
    let mut rounded = d.round_dp(2);
    rounded.rescale(2);
    rounded
}

impl Money {
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, 2));
    pub const ONE: Money = Money(Decimal::from_parts(100, 0, 0, false, 2));

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(two_dp(d))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(two_dp(Decimal::from_str(s)?)))
    }

    /// create from whole currency units (rupees, dollars, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(two_dp(Decimal::from(amount)))
    }

    /// create from minor units (paise, cents)
    pub fn from_minor(amount: i64) -> Self {
        Money(two_dp(Decimal::from(amount) / Decimal::from(100)))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// check if negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// absolute value
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// calculate percentage (e.g., 5% of 100)
    pub fn percentage(&self, rate: Decimal) -> Self {
        Money(two_dp(self.0 * rate / Decimal::from(100)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(two_dp(self.0 + other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = two_dp(self.0 + other.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(two_dp(self.0 - other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = two_dp(self.0 - other.0);
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money(two_dp(self.0 * other))
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money(two_dp(self.0 / other))
    }
}

/// rate type for interest rates and ratios, stored as a fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal fraction (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from a percentage value, fractional allowed (e.g., 0.5 for 0.5%)
    pub fn from_percent(p: Decimal) -> Self {
        Rate(p / Decimal::from(100))
    }

    /// create from a whole percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// get as decimal fraction
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    /// interest on a principal for one period at this rate
    pub fn interest_on(&self, principal: Money) -> Money {
        Money::from_decimal(principal.as_decimal() * self.0)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.129").unwrap();
        assert_eq!(m.to_string(), "100.13"); // rounded to 2 places
    }

    #[test]
    fn test_minor_units() {
        let m = Money::from_minor(12_345); // 123.45 in paise
        assert_eq!(m, Money::from_str_exact("123.45").unwrap());
    }

    #[test]
    fn test_percentage() {
        let principal = Money::from_major(50_000);
        assert_eq!(principal.percentage(dec!(5)), Money::from_major(2_500));
    }

    #[test]
    fn test_fractional_percent_rate() {
        let rate = Rate::from_percent(dec!(0.5));
        assert_eq!(rate.as_decimal(), dec!(0.005));

        let interest = rate.interest_on(Money::from_major(10_000));
        assert_eq!(interest, Money::from_major(50));
    }

    #[test]
    fn test_interest_on_rounds_to_currency() {
        let rate = Rate::from_percent(dec!(2.5));
        let interest = rate.interest_on(Money::from_str_exact("333.33").unwrap());
        assert_eq!(interest, Money::from_str_exact("8.33").unwrap());
    }

    #[test]
    fn test_arithmetic_keeps_scale() {
        let a = Money::from_str_exact("10.01").unwrap();
        let b = Money::from_str_exact("0.005").unwrap(); // rounds to 0.01 on construction
        assert_eq!(a + b, Money::from_str_exact("10.02").unwrap());
        assert_eq!(a - a, Money::ZERO);
    }
}
