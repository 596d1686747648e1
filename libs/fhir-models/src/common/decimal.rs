//! The FHIR `decimal` primitive
//!
//! FHIR decimals carry their precision in the written digits: `1.50` and
//! `1.5` are different values on the wire. [`FhirDecimal`] holds a
//! [`rust_decimal::Decimal`], which keeps its scale, and reads and writes JSON
//! numbers through [`serde_json::Number`] so that the text survives a round
//! trip unchanged.

use rust_decimal::Decimal;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;
use std::fmt;
use std::str::FromStr;

/// A decimal value with its written precision.
///
/// Equality is numeric: `1.50 == 1.5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FhirDecimal(Decimal);

impl FhirDecimal {
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn decimal(&self) -> Decimal {
        self.0
    }

    /// Digits after the decimal point, as written.
    pub fn scale(&self) -> u32 {
        self.0.scale()
    }
}

impl From<Decimal> for FhirDecimal {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i32> for FhirDecimal {
    fn from(value: i32) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<i64> for FhirDecimal {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<u32> for FhirDecimal {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for FhirDecimal {
    type Err = rust_decimal::Error;

    /// Accepts plain (`72.50`) and exponent (`7.25e1`) notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map(Self)
    }
}

impl fmt::Display for FhirDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for FhirDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let number = Number::from_str(&self.0.to_string()).map_err(ser::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FhirDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = Number::deserialize(deserializer)?;
        number
            .as_str()
            .parse()
            .map_err(|e| de::Error::custom(format!("invalid decimal {number}: {e}")))
    }
}
