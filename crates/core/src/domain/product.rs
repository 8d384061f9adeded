use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const NANOS_PER_UNIT: i64 = 1_000_000_000;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Currency amount split into whole units and nano-units (10^-9 of a unit).
///
/// `units` and `nanos` must agree in sign; `nanos` stays within
/// `-999_999_999..=999_999_999`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[serde(default = "default_currency")]
    pub currency_code: String,
    #[serde(default)]
    pub units: i64,
    #[serde(default)]
    pub nanos: i32,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for Money {
    fn default() -> Self {
        Self::zero(DEFAULT_CURRENCY)
    }
}

impl Money {
    pub fn new(currency_code: impl Into<String>, units: i64, nanos: i32) -> Self {
        Self { currency_code: currency_code.into(), units, nanos }
    }

    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(currency_code, 0, 0)
    }

    pub fn is_valid(&self) -> bool {
        let nanos_in_range = i64::from(self.nanos).abs() < NANOS_PER_UNIT;
        let signs_agree =
            (self.units >= 0 && self.nanos >= 0) || (self.units <= 0 && self.nanos <= 0);
        nanos_in_range && signs_agree
    }

    pub fn is_negative(&self) -> bool {
        self.units < 0 || self.nanos < 0
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.units) + Decimal::new(i64::from(self.nanos), 9)
    }

    /// Rebuilds an amount from a decimal, truncating below nano precision.
    pub fn from_decimal(currency_code: impl Into<String>, value: Decimal) -> Option<Self> {
        let whole = value.trunc();
        let nanos = ((value - whole) * Decimal::from(NANOS_PER_UNIT)).trunc();
        Some(Self::new(currency_code, whole.to_i64()?, nanos.to_i32()?))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_decimal().round_dp(2), self.currency_code)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub picture: String,
    #[serde(rename = "priceUsd", default)]
    pub price: Money,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Whole-percent discount, 0 when no discount applies.
    #[serde(default)]
    pub discount: u32,
}

impl Product {
    /// Price after applying `discount`. The stored `price` is never modified.
    pub fn discounted_price(&self) -> Money {
        if self.discount == 0 {
            return self.price.clone();
        }

        let remaining = Decimal::from(100 - self.discount.min(100));
        let value = self.price.to_decimal() * remaining / Decimal::ONE_HUNDRED;
        Money::from_decimal(self.price.currency_code.clone(), value)
            .unwrap_or_else(|| Money::zero(self.price.currency_code.clone()))
    }

    pub fn matches_text(&self, needle_lowercase: &str) -> bool {
        self.name.to_lowercase().contains(needle_lowercase)
            || self.description.to_lowercase().contains(needle_lowercase)
    }
}
