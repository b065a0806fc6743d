//! Text to number conversion for the numeric tower
//!
//! Each converter turns a literal into one numeric category or reports why
//! it could not. Fields hold an ordered list of converters and take the
//! first that succeeds.
//!
//! Accepted syntax follows the usual literal forms:
//! - int: optional sign, digits, `_` between digits
//! - float: anything `f64` parses (`1.5`, `.5`, `1e5`, `inf`, `nan`)
//! - fraction: `n/d`, or a decimal literal converted exactly (`1.25`, `3e-2`)
//! - complex: `a`, `bj`, `a+bj`, optionally in parentheses
//! - decimal: arbitrary precision decimal literal (`1e400`), `inf`,
//!   `infinity` or `nan`
//!
//! Integers and fractions are exact and unbounded in value, but a literal
//! may carry at most `MAX_DIGITS` digits and an exponent of at most
//! `MAX_EXPONENT` in magnitude. Longer literals are rejected, never
//! truncated.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::Zero;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::{Decimal, Value};

/// Most digits an integer or fraction literal may carry.
pub const MAX_DIGITS: usize = 4300;

/// Largest exponent magnitude a fraction or decimal literal may carry.
pub const MAX_EXPONENT: u64 = 999_999;

/// One text-to-number conversion routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Converter {
    Int,
    Float,
    Fraction,
    Complex,
    Decimal,
}

impl Converter {
    /// Returns the converter name
    pub fn as_str(&self) -> &'static str {
        match self {
            Converter::Int => "int",
            Converter::Float => "float",
            Converter::Fraction => "fraction",
            Converter::Complex => "complex",
            Converter::Decimal => "decimal",
        }
    }

    /// Converts `text` into a numeric value.
    pub fn convert(&self, text: &str) -> Result<Value, ParseFailure> {
        let result = match self {
            Converter::Int => parse_int(text).map(Value::Int),
            Converter::Float => parse_float(text).map(Value::Float),
            Converter::Fraction => parse_fraction(text).map(Value::Rational),
            Converter::Complex => parse_complex(text).map(Value::Complex),
            Converter::Decimal => parse_decimal(text).map(Value::Decimal),
        };
        result.map_err(|reason| ParseFailure {
            converter: *self,
            reason,
        })
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a converter rejected a literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub converter: Converter,
    pub reason: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Removes `_` separators, which are only allowed between two digits.
fn strip_separators(text: &str) -> Option<String> {
    if !text.contains('_') {
        return Some(text.to_string());
    }
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, c) in chars.iter().enumerate() {
        if *c == '_' {
            let before = i.checked_sub(1).and_then(|p| chars.get(p));
            let after = chars.get(i + 1);
            match (before, after) {
                (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => continue,
                _ => return None,
            }
        }
        out.push(*c);
    }
    Some(out)
}

fn prepare(text: &str, kind: &str) -> Result<String, String> {
    strip_separators(text.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("invalid literal for {}: {:?}", kind, text))
}

/// Digits as an integer, refusing strings longer than `MAX_DIGITS`.
fn bounded_integer(digits: &str) -> Option<BigInt> {
    if digits.is_empty() || digits.len() > MAX_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parses an integer literal.
pub fn parse_int(text: &str) -> Result<BigInt, String> {
    let cleaned = prepare(text, "int() with base 10")?;
    let (negative, digits) = split_sign(&cleaned);
    if digits.len() > MAX_DIGITS {
        return Err(format!("int literal exceeds the limit of {} digits", MAX_DIGITS));
    }
    let magnitude =
        bounded_integer(digits).ok_or_else(|| format!("invalid literal for int() with base 10: {:?}", text))?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    }
}

/// Parses a floating point literal. Overflowing literals become infinities.
pub fn parse_float(text: &str) -> Result<f64, String> {
    let cleaned = prepare(text, "float")?;
    cleaned
        .parse::<f64>()
        .map_err(|_| format!("could not convert string to float: {:?}", text))
}

fn decimal_literal() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<sign>[-+]?)(?P<int>\d*)(?:\.(?P<frac>\d*))?(?:[eE](?P<exp>[-+]?\d+))?$")
            .expect("decimal literal pattern is valid")
    })
}

fn ratio_literal() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<sign>[-+]?)(?P<num>\d+)\s*/\s*(?P<den>\d+)$").expect("ratio pattern is valid")
    })
}

/// Exponent of a decimal literal, zero when absent and `None` when out of
/// range.
fn exponent(caps: &Captures<'_>) -> Option<i64> {
    match caps.name("exp") {
        Some(m) => m
            .as_str()
            .parse::<i64>()
            .ok()
            .filter(|exp| exp.unsigned_abs() <= MAX_EXPONENT),
        None => Some(0),
    }
}

/// Integer and fraction digits of a decimal literal; `None` when both are
/// empty.
fn decimal_parts<'t>(caps: &Captures<'t>) -> Option<(&'t str, &'t str)> {
    let int_part = caps.name("int").map_or("", |m| m.as_str());
    let frac_part = caps.name("frac").map_or("", |m| m.as_str());
    if int_part.is_empty() && frac_part.is_empty() {
        None
    } else {
        Some((int_part, frac_part))
    }
}

/// Parses a fraction literal, `n/d` or an exact decimal.
pub fn parse_fraction(text: &str) -> Result<BigRational, String> {
    let invalid = || format!("Invalid literal for Fraction: {:?}", text);
    let cleaned = prepare(text, "Fraction").map_err(|_| invalid())?;

    if let Some(caps) = ratio_literal().captures(&cleaned) {
        let numer = bounded_integer(&caps["num"]).ok_or_else(invalid)?;
        let denom = bounded_integer(&caps["den"]).ok_or_else(invalid)?;
        if denom.is_zero() {
            return Err(format!("Fraction({}, 0)", numer));
        }
        let numer = if &caps["sign"] == "-" { -numer } else { numer };
        return Ok(BigRational::new(numer, denom));
    }

    let caps = decimal_literal().captures(&cleaned).ok_or_else(invalid)?;
    let (int_part, frac_part) = decimal_parts(&caps).ok_or_else(invalid)?;
    let exp = exponent(&caps).ok_or_else(invalid)?;
    let frac_len = i64::try_from(frac_part.len()).map_err(|_| invalid())?;
    let scale = exp
        .checked_sub(frac_len)
        .filter(|scale| scale.unsigned_abs() <= MAX_EXPONENT)
        .ok_or_else(invalid)?;
    let shift = u32::try_from(scale.unsigned_abs()).map_err(|_| invalid())?;

    let mantissa = bounded_integer(&format!("{}{}", int_part, frac_part)).ok_or_else(invalid)?;
    let factor = BigInt::from(10u32).pow(shift);
    let value = if scale >= 0 {
        BigRational::from_integer(mantissa * factor)
    } else {
        BigRational::new(mantissa, factor)
    };
    Ok(if &caps["sign"] == "-" { -value } else { value })
}

const REAL: &str = r"(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

fn complex_patterns() -> &'static (Regex, Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let imaginary = Regex::new(&format!(r"^(?P<imag>[-+]?(?:{})?)[jJ]$", REAL))
            .expect("imaginary pattern is valid");
        let both = Regex::new(&format!(r"^(?P<real>[-+]?{})(?P<imag>[-+](?:{})?)[jJ]$", REAL, REAL))
            .expect("complex pattern is valid");
        let real = Regex::new(&format!(r"^(?P<real>[-+]?{})$", REAL)).expect("real pattern is valid");
        (imaginary, both, real)
    })
}

fn imaginary_part(text: &str) -> Option<f64> {
    match text {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        other => other.parse().ok(),
    }
}

/// Parses a complex literal such as `1+2j`, `-3.5j` or `(2-1j)`.
pub fn parse_complex(text: &str) -> Result<Complex64, String> {
    let invalid = || "complex() arg is a malformed string".to_string();
    let mut cleaned = text.trim();
    if let Some(inner) = cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        cleaned = inner.trim();
    }
    let cleaned = strip_separators(cleaned).ok_or_else(invalid)?;
    let (imaginary, both, real) = complex_patterns();

    if let Some(caps) = imaginary.captures(&cleaned) {
        let im = imaginary_part(&caps["imag"]).ok_or_else(invalid)?;
        return Ok(Complex64::new(0.0, im));
    }
    if let Some(caps) = both.captures(&cleaned) {
        let re: f64 = caps["real"].parse().map_err(|_| invalid())?;
        let im = imaginary_part(&caps["imag"]).ok_or_else(invalid)?;
        return Ok(Complex64::new(re, im));
    }
    if let Some(caps) = real.captures(&cleaned) {
        let re: f64 = caps["real"].parse().map_err(|_| invalid())?;
        return Ok(Complex64::new(re, 0.0));
    }
    Err(invalid())
}

/// Parses an arbitrary precision decimal literal.
pub fn parse_decimal(text: &str) -> Result<Decimal, String> {
    let invalid = || format!("Invalid literal for Decimal: {:?}", text);
    let cleaned = prepare(text, "Decimal").map_err(|_| invalid())?;

    let (negative, body) = split_sign(&cleaned);
    match body.to_ascii_lowercase().as_str() {
        "inf" | "infinity" if negative => return Ok(Decimal::NegInfinity),
        "inf" | "infinity" => return Ok(Decimal::Infinity),
        "nan" => return Ok(Decimal::NaN),
        _ => {}
    }

    let caps = decimal_literal().captures(&cleaned).ok_or_else(invalid)?;
    decimal_parts(&caps).ok_or_else(invalid)?;
    exponent(&caps).ok_or_else(invalid)?;
    BigDecimal::from_str(&cleaned).map(Decimal::Finite).map_err(|_| invalid())
}

/// Outcome of running a converter chain over one literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    Parsed(Value),
    Failed(ParseFailure),
}

/// Runs `converters` in order and returns the first success.
///
/// An infinite float is re-read with the decimal converter when the chain
/// also contains one, so oversized literals keep their magnitude.
pub fn convert_with(converters: &[Converter], text: &str) -> Conversion {
    let mut last = ParseFailure {
        converter: Converter::Int,
        reason: format!("no converter accepted {:?}", text),
    };
    for converter in converters {
        match converter.convert(text) {
            Ok(Value::Float(f)) if f.is_infinite() && converters.contains(&Converter::Decimal) => {
                match Converter::Decimal.convert(text) {
                    Ok(decimal) => return Conversion::Parsed(decimal),
                    Err(_) => return Conversion::Parsed(Value::Float(f)),
                }
            }
            Ok(value) => return Conversion::Parsed(value),
            Err(failure) => last = failure,
        }
    }
    Conversion::Failed(last)
}
