//! Dynamic values checked by fields
//!
//! A `Value` is the runtime shape of anything a field can be asked to
//! validate. The numeric variants form a tower (integral, rational, real,
//! complex, decimal) and compare across variants the way numbers do:
//! `Int(1) == Float(1.0) == Rational(1/1)`. Integers and rationals are
//! unbounded, and comparisons between numeric kinds are exact. `Value`
//! hashes consistently with that equality, so equal numbers of different
//! kinds hash alike.
//!
//! Collections keep their elements in a `Vec`; sets compare without regard
//! to order and dicts compare by key lookup.

pub mod decimal;
pub mod numeric;

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

pub use decimal::Decimal;

use crate::schema::{HostRef, Schema};

/// Closed set of runtime categories a field can restrict values to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Float,
    Rational,
    Complex,
    Decimal,
    Text,
    Bytes,
    Date,
    Datetime,
    Time,
    Timedelta,
    Tuple,
    List,
    Set,
    FrozenSet,
    Dict,
    Object,
    Interface,
    Marker,
}

impl ValueKind {
    /// Returns the type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::None => "none",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Rational => "rational",
            ValueKind::Complex => "complex",
            ValueKind::Decimal => "decimal",
            ValueKind::Text => "str",
            ValueKind::Bytes => "bytes",
            ValueKind::Date => "date",
            ValueKind::Datetime => "datetime",
            ValueKind::Time => "time",
            ValueKind::Timedelta => "timedelta",
            ValueKind::Tuple => "tuple",
            ValueKind::List => "list",
            ValueKind::Set => "set",
            ValueKind::FrozenSet => "frozenset",
            ValueKind::Dict => "dict",
            ValueKind::Object => "object",
            ValueKind::Interface => "interface",
            ValueKind::Marker => "marker",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A dynamically typed value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a value; the default missing value of every field
    None,
    Bool(bool),
    Int(BigInt),
    Float(f64),
    Rational(BigRational),
    Complex(Complex64),
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
    Time(NaiveTime),
    Timedelta(TimeDelta),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Set(Vec<Value>),
    FrozenSet(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    /// A host object, compared by identity
    Object(HostRef),
    /// A schema used as a value, compared by identity
    Interface(Arc<Schema>),
    /// A named sentinel distinct from every other value
    Marker(&'static str),
}

impl Value {
    /// Creates a bytes value.
    pub fn bytes(data: impl AsRef<[u8]>) -> Self {
        Value::Bytes(data.as_ref().to_vec())
    }

    /// Creates a list value.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Creates a tuple value.
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Creates a set value, dropping repeated members.
    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Set(dedup(items.into_iter().map(Into::into)))
    }

    /// Creates a frozen set value, dropping repeated members.
    pub fn frozenset<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::FrozenSet(dedup(items.into_iter().map(Into::into)))
    }

    /// Creates a dict value. A later entry replaces an earlier one with an
    /// equal key.
    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut out: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            match out.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        Value::Dict(out)
    }

    /// Creates an integer value.
    pub fn int(value: impl Into<BigInt>) -> Self {
        Value::Int(value.into())
    }

    /// Creates an exact rational value. Returns `None` for a zero denominator.
    pub fn rational(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Option<Self> {
        let denom = denom.into();
        if denom.is_zero() {
            return None;
        }
        Some(Value::Rational(BigRational::new(numer.into(), denom)))
    }

    /// Returns the runtime category of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Rational(_) => ValueKind::Rational,
            Value::Complex(_) => ValueKind::Complex,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Text(_) => ValueKind::Text,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Date(_) => ValueKind::Date,
            Value::Datetime(_) => ValueKind::Datetime,
            Value::Time(_) => ValueKind::Time,
            Value::Timedelta(_) => ValueKind::Timedelta,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::List(_) => ValueKind::List,
            Value::Set(_) => ValueKind::Set,
            Value::FrozenSet(_) => ValueKind::FrozenSet,
            Value::Dict(_) => ValueKind::Dict,
            Value::Object(_) => ValueKind::Object,
            Value::Interface(_) => ValueKind::Interface,
            Value::Marker(_) => ValueKind::Marker,
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// The integer, when it fits in an `i64`
    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(ToPrimitive::to_i64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HostRef> {
        match self {
            Value::Object(host) => Some(host),
            _ => None,
        }
    }

    /// Truthiness: empty containers, zero, `None` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => !i.is_zero(),
            Value::Float(f) => *f != 0.0,
            Value::Rational(r) => !r.is_zero(),
            Value::Complex(c) => !c.is_zero(),
            Value::Decimal(d) => !d.is_zero(),
            Value::Text(s) => !s.is_empty(),
            Value::Bytes(b) => !b.is_empty(),
            Value::Timedelta(d) => !d.is_zero(),
            Value::Tuple(items) | Value::List(items) | Value::Set(items) | Value::FrozenSet(items) => {
                !items.is_empty()
            }
            Value::Dict(entries) => !entries.is_empty(),
            Value::Date(_)
            | Value::Datetime(_)
            | Value::Time(_)
            | Value::Object(_)
            | Value::Interface(_)
            | Value::Marker(_) => true,
        }
    }

    /// Number of members for sized values; text is measured in characters.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Text(s) => Some(s.chars().count()),
            Value::Bytes(b) => Some(b.len()),
            Value::Tuple(items) | Value::List(items) | Value::Set(items) | Value::FrozenSet(items) => {
                Some(items.len())
            }
            Value::Dict(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Whether the value answers a membership test.
    pub fn supports_membership(&self) -> bool {
        matches!(
            self,
            Value::Text(_)
                | Value::Bytes(_)
                | Value::Tuple(_)
                | Value::List(_)
                | Value::Set(_)
                | Value::FrozenSet(_)
                | Value::Dict(_)
        )
    }

    /// Members produced by iterating the value, or `None` if it is not
    /// iterable. Text yields one-character strings, bytes yield integers
    /// and dicts yield their keys.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::Text(s) => Some(s.chars().map(|c| Value::Text(c.to_string())).collect()),
            Value::Bytes(b) => Some(b.iter().map(|byte| Value::int(*byte)).collect()),
            Value::Tuple(items) | Value::List(items) | Value::Set(items) | Value::FrozenSet(items) => {
                Some(items.clone())
            }
            Value::Dict(entries) => Some(entries.iter().map(|(k, _)| k.clone()).collect()),
            _ => None,
        }
    }

    /// Membership test; `None` when the value has no membership semantics.
    pub fn contains(&self, item: &Value) -> Option<bool> {
        match (self, item) {
            (Value::Text(s), Value::Text(needle)) => Some(s.contains(needle.as_str())),
            (Value::Text(_), _) => Some(false),
            (Value::Bytes(b), Value::Int(i)) => Some(b.iter().any(|byte| BigInt::from(*byte) == *i)),
            (Value::Bytes(b), Value::Bytes(needle)) => {
                Some(needle.is_empty() || b.windows(needle.len()).any(|w| w == needle.as_slice()))
            }
            (Value::Bytes(_), _) => Some(false),
            (Value::Tuple(items), _)
            | (Value::List(items), _)
            | (Value::Set(items), _)
            | (Value::FrozenSet(items), _) => Some(items.iter().any(|v| v == item)),
            (Value::Dict(entries), _) => Some(entries.iter().any(|(k, _)| k == item)),
            _ => None,
        }
    }

    /// Values of a dict, in insertion order.
    pub fn dict_values(&self) -> Option<Vec<Value>> {
        match self {
            Value::Dict(entries) => Some(entries.iter().map(|(_, v)| v.clone()).collect()),
            _ => None,
        }
    }

    /// Python-style representation used inside containers and in messages.
    pub fn repr(&self) -> String {
        match self {
            Value::Text(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Value::Bytes(b) => format!("b'{}'", escape_bytes(b)),
            Value::Date(d) => format!("date({})", d),
            Value::Datetime(d) => format!("datetime({})", d),
            Value::Time(t) => format!("time({})", t),
            Value::Timedelta(d) => format!("timedelta({})", d),
            Value::Decimal(d) => format!("Decimal('{}')", d),
            other => other.to_string(),
        }
    }

    fn as_number(&self) -> Option<Number<'_>> {
        match self {
            Value::Int(i) => Some(Number::Int(i)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Rational(r) => Some(Number::Rational(r)),
            Value::Decimal(Decimal::Finite(d)) => Some(Number::Decimal(d)),
            Value::Decimal(special) => special.special_as_f64().map(Number::Float),
            Value::Complex(c) if c.im == 0.0 => Some(Number::Float(c.re)),
            _ => None,
        }
    }
}

fn dedup(items: impl Iterator<Item = Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn escape_bytes(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for byte in data {
        match byte {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            0x20..=0x7e => out.push(char::from(*byte)),
            other => out.push_str(&format!("\\x{:02x}", other)),
        }
    }
    out
}

/// Real-valued view used for cross-variant numeric comparison.
enum Number<'a> {
    Int(&'a BigInt),
    Float(f64),
    Rational(&'a BigRational),
    Decimal(&'a BigDecimal),
}

impl Number<'_> {
    /// The exact value as a fraction. Decimals and non-finite floats have
    /// none.
    fn exact(&self) -> Option<BigRational> {
        match self {
            Number::Int(i) => Some(BigRational::from_integer((*i).clone())),
            Number::Float(f) => BigRational::from_float(*f),
            Number::Rational(r) => Some((*r).clone()),
            Number::Decimal(_) => None,
        }
    }

    fn compare(&self, other: &Number<'_>) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(b)),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(b),
            (Number::Decimal(a), Number::Decimal(b)) => Some(a.cmp(b)),
            (Number::Float(f), _) if !f.is_finite() => non_finite_cmp(*f),
            (_, Number::Float(f)) if !f.is_finite() => non_finite_cmp(*f).map(Ordering::reverse),
            (Number::Decimal(d), other) => Some(decimal_cmp(d, &other.exact()?)),
            (this, Number::Decimal(d)) => Some(decimal_cmp(d, &this.exact()?).reverse()),
            (a, b) => Some(a.exact()?.cmp(&b.exact()?)),
        }
    }

    /// Residue modulo the hash prime. Equal numbers share a residue
    /// whatever their kind.
    fn hash_residue(&self) -> i64 {
        match self {
            Number::Int(i) => fraction_residue(i, &BigInt::one()),
            Number::Rational(r) => fraction_residue(r.numer(), r.denom()),
            Number::Decimal(d) => decimal_residue(d),
            Number::Float(f) if f.is_nan() => 0,
            Number::Float(f) if f.is_infinite() => {
                if *f > 0.0 { HASH_INFINITY } else { -HASH_INFINITY }
            }
            Number::Float(f) => match BigRational::from_float(*f) {
                Some(r) => fraction_residue(r.numer(), r.denom()),
                None => 0,
            },
        }
    }
}

/// Where a NaN or an infinity falls relative to any finite number.
fn non_finite_cmp(f: f64) -> Option<Ordering> {
    if f.is_nan() {
        None
    } else if f > 0.0 {
        Some(Ordering::Greater)
    } else {
        Some(Ordering::Less)
    }
}

fn decimal_cmp(decimal: &BigDecimal, other: &BigRational) -> Ordering {
    // Denominators are kept positive, so scaling preserves order.
    let scaled = decimal.clone() * BigDecimal::new(other.denom().clone(), 0);
    scaled.cmp(&BigDecimal::new(other.numer().clone(), 0))
}

const HASH_MODULUS: u64 = (1 << 61) - 1;
const HASH_INFINITY: i64 = 314_159;

fn hash_modulus() -> BigInt {
    BigInt::from(HASH_MODULUS)
}

fn signed_residue(magnitude: BigInt, negative: bool) -> i64 {
    let residue = magnitude.to_i64().unwrap_or(0);
    if negative {
        -residue
    } else {
        residue
    }
}

fn fraction_residue(numer: &BigInt, denom: &BigInt) -> i64 {
    let p = hash_modulus();
    // Fermat inverse; zero exactly when the denominator is a multiple of p.
    let inverse = denom.modpow(&(&p - 2u32), &p);
    let magnitude = if inverse.is_zero() {
        BigInt::from(HASH_INFINITY)
    } else {
        (numer.abs() % &p) * inverse % &p
    };
    signed_residue(magnitude, numer.is_negative())
}

fn decimal_residue(decimal: &BigDecimal) -> i64 {
    let p = hash_modulus();
    let ten = BigInt::from(10u32);
    let (digits, scale) = decimal.as_bigint_and_exponent();
    let power = if scale <= 0 {
        ten.modpow(&-BigInt::from(scale), &p)
    } else {
        ten.modpow(&(&p - 2u32), &p).modpow(&BigInt::from(scale), &p)
    };
    signed_residue((digits.abs() % &p) * power % &p, digits.is_negative())
}

fn unordered_hash<'a, T: Hash + 'a>(items: impl Iterator<Item = &'a T>) -> u64 {
    items
        .map(|item| {
            let mut hasher = DefaultHasher::new();
            item.hash(&mut hasher);
            hasher.finish()
        })
        .fold(0, u64::wrapping_add)
}

fn unordered_eq(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().all(|item| b.contains(item))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Datetime(a), Value::Datetime(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Timedelta(a), Value::Timedelta(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b))
            | (Value::Set(a), Value::FrozenSet(b))
            | (Value::FrozenSet(a), Value::Set(b))
            | (Value::FrozenSet(a), Value::FrozenSet(b)) => unordered_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, value)| {
                        b.iter().any(|(other_key, other_value)| key == other_key && value == other_value)
                    })
            }
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Interface(a), Value::Interface(b)) => Arc::ptr_eq(a, b),
            (Value::Marker(a), Value::Marker(b)) => a == b,
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x.compare(&y) == Some(Ordering::Equal),
                _ => false,
            },
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Some(number) = self.as_number() {
            ValueKind::Int.hash(state);
            number.hash_residue().hash(state);
            return;
        }
        match self.kind() {
            ValueKind::FrozenSet => ValueKind::Set.hash(state),
            kind => kind.hash(state),
        }
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Complex(c) => {
                let re = Number::Float(c.re).hash_residue();
                let im = Number::Float(c.im).hash_residue();
                re.wrapping_add(im.wrapping_mul(1_000_003)).hash(state);
            }
            Value::Text(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Datetime(d) => d.hash(state),
            Value::Time(t) => t.hash(state),
            Value::Timedelta(d) => d.hash(state),
            Value::Tuple(items) | Value::List(items) => items.hash(state),
            Value::Set(items) | Value::FrozenSet(items) => unordered_hash(items.iter()).hash(state),
            Value::Dict(entries) => unordered_hash(entries.iter()).hash(state),
            Value::Object(host) => (Arc::as_ptr(host) as *const ()).hash(state),
            Value::Interface(schema) => Arc::as_ptr(schema).hash(state),
            Value::Marker(name) => name.hash(state),
            Value::None | Value::Int(_) | Value::Float(_) | Value::Rational(_) | Value::Decimal(_) => {}
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Datetime(a), Value::Datetime(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::Timedelta(a), Value::Timedelta(b)) => Some(a.cmp(b)),
            (Value::Tuple(a), Value::Tuple(b)) | (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.partial_cmp(y)? {
                        Ordering::Equal => continue,
                        unequal => return Some(unequal),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            (a, b) => {
                let (x, y) = (a.as_number()?, b.as_number()?);
                // Complex values with an imaginary part have no ordering.
                if matches!(a, Value::Complex(c) if c.im != 0.0) || matches!(b, Value::Complex(c) if c.im != 0.0) {
                    return None;
                }
                x.compare(&y)
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(&item.repr())?;
    }
    Ok(())
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Rational(r) => {
                if r.denom().is_one() {
                    write!(f, "{}", r.numer())
                } else {
                    write!(f, "{}/{}", r.numer(), r.denom())
                }
            }
            Value::Complex(c) => {
                if c.re == 0.0 && c.re.is_sign_positive() {
                    write!(f, "{}j", format_float(c.im).trim_end_matches(".0"))
                } else {
                    let sign = if c.im < 0.0 || (c.im == 0.0 && c.im.is_sign_negative()) { '-' } else { '+' };
                    write!(
                        f,
                        "({}{}{}j)",
                        format_float(c.re).trim_end_matches(".0"),
                        sign,
                        format_float(c.im.abs()).trim_end_matches(".0")
                    )
                }
            }
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "b'{}'", escape_bytes(b)),
            Value::Date(d) => write!(f, "{}", d),
            Value::Datetime(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t),
            Value::Timedelta(d) => write!(f, "{}", d),
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Value::Set(items) => {
                if items.is_empty() {
                    return f.write_str("set()");
                }
                f.write_str("{")?;
                write_items(f, items)?;
                f.write_str("}")
            }
            Value::FrozenSet(items) => {
                f.write_str("frozenset({")?;
                write_items(f, items)?;
                f.write_str("})")
            }
            Value::Dict(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k.repr(), v.repr())?;
                }
                f.write_str("}")
            }
            Value::Object(host) => write!(f, "<object {:p}>", Arc::as_ptr(host) as *const ()),
            Value::Interface(schema) => write!(f, "<interface {}>", schema.name()),
            Value::Marker(name) => f.write_str(name),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::int(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<BigRational> for Value {
    fn from(v: BigRational) -> Self {
        Value::Rational(v)
    }
}

impl From<Complex64> for Value {
    fn from(v: Complex64) -> Self {
        Value::Complex(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Value::Decimal(Decimal::Finite(v))
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Datetime(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<TimeDelta> for Value {
    fn from(v: TimeDelta) -> Self {
        Value::Timedelta(v)
    }
}

impl From<HostRef> for Value {
    fn from(v: HostRef) -> Self {
        Value::Object(v)
    }
}

impl From<Arc<Schema>> for Value {
    fn from(v: Arc<Schema>) -> Self {
        Value::Interface(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::None)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::int(i),
                (None, Some(u)) => Value::int(u),
                (None, None) => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Dict(
                map.iter()
                    .map(|(k, v)| (Value::Text(k.clone()), Value::from(v)))
                    .collect(),
            ),
        }
    }
}
