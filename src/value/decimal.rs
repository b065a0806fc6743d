//! Arbitrary precision decimals with the special values
//!
//! `BigDecimal` only holds finite numbers. Decimal literals may also spell
//! infinities and NaN, which keep their own variants here.

use std::fmt;

use bigdecimal::BigDecimal;
use num_traits::Zero;

/// A decimal number, finite or one of the special values.
#[derive(Debug, Clone)]
pub enum Decimal {
    Finite(BigDecimal),
    Infinity,
    NegInfinity,
    NaN,
}

impl Decimal {
    pub fn is_finite(&self) -> bool {
        matches!(self, Decimal::Finite(_))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Decimal::NaN)
    }

    pub fn as_finite(&self) -> Option<&BigDecimal> {
        match self {
            Decimal::Finite(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_finite().is_some_and(Zero::is_zero)
    }

    /// The special values as floats; `None` for finite decimals.
    pub(crate) fn special_as_f64(&self) -> Option<f64> {
        match self {
            Decimal::Finite(_) => None,
            Decimal::Infinity => Some(f64::INFINITY),
            Decimal::NegInfinity => Some(f64::NEG_INFINITY),
            Decimal::NaN => Some(f64::NAN),
        }
    }
}

impl From<BigDecimal> for Decimal {
    fn from(d: BigDecimal) -> Self {
        Decimal::Finite(d)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decimal::Finite(d) => write!(f, "{}", d),
            Decimal::Infinity => f.write_str("Infinity"),
            Decimal::NegInfinity => f.write_str("-Infinity"),
            Decimal::NaN => f.write_str("NaN"),
        }
    }
}
