//! Fixed-point money in integer cents, plus basis-point shares.
//!
//! All draw accounting runs on whole cents so that `house + winnings == revenue`
//! holds exactly; nothing in the payout path touches floating point.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const CENTS_PER_UNIT: i64 = 100;
pub const FULL_SHARE_BASIS_POINTS: u32 = 10_000;

/// Signed amount of money in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub const fn cents(self) -> i64 {
        self.cents
    }

    pub const fn is_negative(self) -> bool {
        self.cents < 0
    }

    /// Converts a float amount, rounding half away from zero to the nearest cent.
    /// Only used for config values; draw arithmetic never goes through here.
    pub fn from_f64(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let cents = (amount * CENTS_PER_UNIT as f64).round();
        if cents.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Self::from_cents(cents as i64))
    }

    pub fn as_f64(self) -> f64 {
        self.cents as f64 / CENTS_PER_UNIT as f64
    }

    /// `self * numerator / denominator`, rounded half away from zero to a whole cent.
    pub fn mul_div_round(self, numerator: i64, denominator: i64) -> Self {
        debug_assert!(denominator > 0);
        let product = self.cents as i128 * numerator as i128;
        let denominator = denominator as i128;
        let quotient = product / denominator;
        let remainder = product % denominator;
        let adjust = if remainder.abs() * 2 >= denominator {
            product.signum()
        } else {
            0
        };
        Self::from_cents((quotient + adjust) as i64)
    }

    /// Number of whole `price` units affordable with this amount.
    pub fn units_affordable(self, price: Money) -> usize {
        if price.cents <= 0 || self.cents <= 0 {
            return 0;
        }
        (self.cents / price.cents) as usize
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(
            f,
            "{sign}${}.{:02}",
            abs / CENTS_PER_UNIT as u64,
            abs % CENTS_PER_UNIT as u64
        )
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::from_cents(self.cents + rhs.cents)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.cents += rhs.cents;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money::from_cents(self.cents - rhs.cents)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.cents -= rhs.cents;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money::from_cents(-self.cents)
    }
}

impl Mul<usize> for Money {
    type Output = Money;

    fn mul(self, rhs: usize) -> Money {
        Money::from_cents(self.cents * rhs as i64)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyParseError {
    input: String,
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid money amount '{}'", self.input)
    }
}

impl std::error::Error for MoneyParseError {}

impl FromStr for Money {
    type Err = MoneyParseError;

    /// Accepts `1.33`, `$1.33`, `-0.5`, `10`. At most two fractional digits.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = || MoneyParseError {
            input: raw.to_string(),
        };
        let trimmed = raw.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let (whole, frac) = match rest.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (rest, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if frac.len() > 2 || !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let whole_cents = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i64>()
                .ok()
                .and_then(|units| units.checked_mul(CENTS_PER_UNIT))
                .ok_or_else(err)?
        };
        let frac_cents = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac.parse::<i64>().map_err(|_| err())?,
        };
        let cents = whole_cents.checked_add(frac_cents).ok_or_else(err)?;
        Ok(Money::from_cents(if negative { -cents } else { cents }))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        serializer.serialize_str(&format!(
            "{sign}{}.{:02}",
            abs / CENTS_PER_UNIT as u64,
            abs % CENTS_PER_UNIT as u64
        ))
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a money amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Money, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
        value
            .checked_mul(CENTS_PER_UNIT)
            .map(Money::from_cents)
            .ok_or_else(|| E::custom("money amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
        i64::try_from(value)
            .map_err(|_| E::custom("money amount out of range"))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
        Money::from_f64(value).ok_or_else(|| E::custom("money amount out of range"))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

/// A share of revenue in basis points: 10_000 == 100%.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareBasisPoints(pub u32);

impl ShareBasisPoints {
    pub const fn from_percent(percent: u32) -> Self {
        Self(percent * 100)
    }

    /// Percentage with up to two decimals (12.5 -> 1250 bp). `None` outside `[0, 100]`.
    pub fn from_percent_f64(percent: f64) -> Option<Self> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return None;
        }
        Some(Self((percent * 100.0).round() as u32))
    }

    pub fn as_percent(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn basis_points(self) -> u32 {
        self.0
    }

    /// Applies this share to `amount` and splits it between `ways` recipients,
    /// rounding each part half away from zero to a whole cent.
    pub fn split(self, amount: Money, ways: usize) -> Money {
        let denominator = FULL_SHARE_BASIS_POINTS as i64 * ways.max(1) as i64;
        amount.mul_div_round(self.0 as i64, denominator)
    }
}
