//! Validation error types
//!
//! Every failure carries the offending value, the name of the field that
//! rejected it (when known) and a kind with kind-specific detail.
//!
//! Error codes:
//! - FIELD_REQUIRED_MISSING
//! - FIELD_WRONG_TYPE
//! - FIELD_TOO_SMALL / FIELD_TOO_BIG
//! - FIELD_TOO_SHORT / FIELD_TOO_LONG
//! - FIELD_NOT_A_CONTAINER / FIELD_NOT_AN_ITERATOR
//! - FIELD_NOT_UNIQUE
//! - FIELD_WRONG_CONTAINED_TYPE
//! - FIELD_INVALID_VALUE
//! - FIELD_CONSTRAINT_NOT_SATISFIED
//! - FIELD_SCHEMA_NOT_PROVIDED / _NOT_FULLY_IMPLEMENTED / _NOT_CORRECTLY_IMPLEMENTED
//! - FIELD_INVALID_URI / FIELD_INVALID_ID / FIELD_INVALID_DOTTED_NAME
//! - FIELD_INVALID_NUMBER_LITERAL / _INT_ / _FLOAT_ / _DECIMAL_LITERAL
//! - FIELD_NOT_AN_INTERFACE
//! - FIELD_MISSING_VOCABULARY

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::value::{Value, ValueKind};

/// Kind of validation failure, with its detail.
#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// Value equals the missing value on a required field
    RequiredMissing,
    /// Value is not one of the accepted runtime categories
    WrongType { expected: Vec<ValueKind> },
    TooSmall { min: Value },
    TooBig { max: Value },
    TooShort { min_length: usize },
    TooLong { max_length: usize },
    NotAContainer,
    NotAnIterator,
    /// The collection holds `duplicate` more than once
    NotUnique { duplicate: Value },
    /// One or more members failed; every failure is kept
    WrongContainedType { errors: Vec<ValidationError> },
    InvalidValue { reason: Option<String> },
    ConstraintNotSatisfied,
    SchemaNotProvided { schema: String },
    SchemaNotFullyImplemented { attribute: String },
    SchemaNotCorrectlyImplemented {
        field_errors: BTreeMap<String, ValidationError>,
        invariant_errors: Vec<ValidationError>,
    },
    InvalidUri,
    InvalidId,
    InvalidDottedName { reason: Option<String> },
    InvalidNumberLiteral { reason: String },
    InvalidIntLiteral { reason: String },
    InvalidFloatLiteral { reason: String },
    InvalidDecimalLiteral { reason: String },
    NotAnInterface,
    /// A choice could not find its named vocabulary, or its source binder
    /// (`name` is `None`) has no object to bind to yet
    MissingVocabulary { name: Option<String> },
}

impl ErrorKind {
    /// Returns the string code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::RequiredMissing => "FIELD_REQUIRED_MISSING",
            ErrorKind::WrongType { .. } => "FIELD_WRONG_TYPE",
            ErrorKind::TooSmall { .. } => "FIELD_TOO_SMALL",
            ErrorKind::TooBig { .. } => "FIELD_TOO_BIG",
            ErrorKind::TooShort { .. } => "FIELD_TOO_SHORT",
            ErrorKind::TooLong { .. } => "FIELD_TOO_LONG",
            ErrorKind::NotAContainer => "FIELD_NOT_A_CONTAINER",
            ErrorKind::NotAnIterator => "FIELD_NOT_AN_ITERATOR",
            ErrorKind::NotUnique { .. } => "FIELD_NOT_UNIQUE",
            ErrorKind::WrongContainedType { .. } => "FIELD_WRONG_CONTAINED_TYPE",
            ErrorKind::InvalidValue { .. } => "FIELD_INVALID_VALUE",
            ErrorKind::ConstraintNotSatisfied => "FIELD_CONSTRAINT_NOT_SATISFIED",
            ErrorKind::SchemaNotProvided { .. } => "FIELD_SCHEMA_NOT_PROVIDED",
            ErrorKind::SchemaNotFullyImplemented { .. } => "FIELD_SCHEMA_NOT_FULLY_IMPLEMENTED",
            ErrorKind::SchemaNotCorrectlyImplemented { .. } => "FIELD_SCHEMA_NOT_CORRECTLY_IMPLEMENTED",
            ErrorKind::InvalidUri => "FIELD_INVALID_URI",
            ErrorKind::InvalidId => "FIELD_INVALID_ID",
            ErrorKind::InvalidDottedName { .. } => "FIELD_INVALID_DOTTED_NAME",
            ErrorKind::InvalidNumberLiteral { .. } => "FIELD_INVALID_NUMBER_LITERAL",
            ErrorKind::InvalidIntLiteral { .. } => "FIELD_INVALID_INT_LITERAL",
            ErrorKind::InvalidFloatLiteral { .. } => "FIELD_INVALID_FLOAT_LITERAL",
            ErrorKind::InvalidDecimalLiteral { .. } => "FIELD_INVALID_DECIMAL_LITERAL",
            ErrorKind::NotAnInterface => "FIELD_NOT_AN_INTERFACE",
            ErrorKind::MissingVocabulary { .. } => "FIELD_MISSING_VOCABULARY",
        }
    }

    /// Whether this kind reports a text-to-number parse failure
    pub fn is_literal_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidNumberLiteral { .. }
                | ErrorKind::InvalidIntLiteral { .. }
                | ErrorKind::InvalidFloatLiteral { .. }
                | ErrorKind::InvalidDecimalLiteral { .. }
        )
    }
}

/// A single validation failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    kind: ErrorKind,
    value: Value,
    field: Option<String>,
}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;

impl ValidationError {
    /// Creates an error of `kind` about `value`.
    pub fn new(kind: ErrorKind, value: Value) -> Self {
        Self {
            kind,
            value,
            field: None,
        }
    }

    pub fn required_missing(field: &str) -> Self {
        Self::new(ErrorKind::RequiredMissing, Value::None).with_field(field)
    }

    pub fn wrong_type(value: &Value, expected: &[ValueKind]) -> Self {
        Self::new(
            ErrorKind::WrongType {
                expected: expected.to_vec(),
            },
            value.clone(),
        )
    }

    pub fn too_small(value: &Value, min: &Value) -> Self {
        Self::new(ErrorKind::TooSmall { min: min.clone() }, value.clone())
    }

    pub fn too_big(value: &Value, max: &Value) -> Self {
        Self::new(ErrorKind::TooBig { max: max.clone() }, value.clone())
    }

    pub fn too_short(value: &Value, min_length: usize) -> Self {
        Self::new(ErrorKind::TooShort { min_length }, value.clone())
    }

    pub fn too_long(value: &Value, max_length: usize) -> Self {
        Self::new(ErrorKind::TooLong { max_length }, value.clone())
    }

    pub fn not_unique(collection: &Value, duplicate: &Value) -> Self {
        Self::new(
            ErrorKind::NotUnique {
                duplicate: duplicate.clone(),
            },
            collection.clone(),
        )
    }

    pub fn constraint_not_satisfied(value: &Value) -> Self {
        Self::new(ErrorKind::ConstraintNotSatisfied, value.clone())
    }

    /// An invalid-value error; also what schema invariants report.
    pub fn invalid_value(value: &Value, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::InvalidValue {
                reason: Some(reason.into()),
            },
            value.clone(),
        )
    }

    /// Sets the field name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the field name unless one is already recorded.
    pub fn or_field(mut self, field: &str) -> Self {
        if self.field.is_none() {
            self.field = Some(field.to_string());
        }
        self
    }

    /// Returns the error kind
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the string code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns the offending value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the name of the rejecting field, if known
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Errors nested inside a wrong-contained-type error
    pub fn contained_errors(&self) -> &[ValidationError] {
        match &self.kind {
            ErrorKind::WrongContainedType { errors } => errors,
            _ => &[],
        }
    }

    /// Argument tuple used for equality and ordering.
    pub fn args(&self) -> Vec<Value> {
        let field = || Value::from(self.field.clone());
        match &self.kind {
            ErrorKind::RequiredMissing => vec![field()],
            ErrorKind::WrongType { expected } => vec![
                self.value.clone(),
                Value::Text(expected.iter().map(|k| k.type_name()).collect::<Vec<_>>().join(", ")),
                field(),
            ],
            ErrorKind::TooSmall { min } => vec![self.value.clone(), min.clone()],
            ErrorKind::TooBig { max } => vec![self.value.clone(), max.clone()],
            ErrorKind::TooShort { min_length } => vec![self.value.clone(), length_value(*min_length)],
            ErrorKind::TooLong { max_length } => vec![self.value.clone(), length_value(*max_length)],
            ErrorKind::NotUnique { duplicate } => vec![duplicate.clone()],
            ErrorKind::WrongContainedType { errors } => vec![error_list(errors.iter()), field()],
            ErrorKind::SchemaNotCorrectlyImplemented {
                field_errors,
                invariant_errors,
            } => vec![error_list(field_errors.values().chain(invariant_errors.iter())), field()],
            ErrorKind::ConstraintNotSatisfied => vec![self.value.clone(), field()],
            ErrorKind::SchemaNotProvided { schema } => vec![Value::Text(schema.clone()), self.value.clone()],
            ErrorKind::SchemaNotFullyImplemented { attribute } => vec![Value::Text(attribute.clone())],
            ErrorKind::InvalidDottedName { reason: Some(reason) } | ErrorKind::InvalidValue { reason: Some(reason) } => {
                vec![Value::Text(reason.clone()), self.value.clone()]
            }
            ErrorKind::InvalidNumberLiteral { reason }
            | ErrorKind::InvalidIntLiteral { reason }
            | ErrorKind::InvalidFloatLiteral { reason }
            | ErrorKind::InvalidDecimalLiteral { reason } => vec![Value::Text(reason.clone())],
            ErrorKind::MissingVocabulary { name } => name.iter().cloned().map(Value::Text).collect(),
            ErrorKind::NotAContainer
            | ErrorKind::NotAnIterator
            | ErrorKind::InvalidValue { reason: None }
            | ErrorKind::InvalidUri
            | ErrorKind::InvalidId
            | ErrorKind::InvalidDottedName { reason: None }
            | ErrorKind::NotAnInterface => vec![self.value.clone()],
        }
    }

    fn message(&self) -> String {
        match &self.kind {
            ErrorKind::RequiredMissing => "required field is missing".to_string(),
            ErrorKind::WrongType { expected } => format!(
                "expected {}, got {}",
                expected.iter().map(|k| k.type_name()).collect::<Vec<_>>().join(" or "),
                self.value.type_name()
            ),
            ErrorKind::TooSmall { min } => format!("{} < {}", self.value.repr(), min.repr()),
            ErrorKind::TooBig { max } => format!("{} > {}", self.value.repr(), max.repr()),
            ErrorKind::TooShort { min_length } => format!("length is less than {}", min_length),
            ErrorKind::TooLong { max_length } => format!("length is greater than {}", max_length),
            ErrorKind::NotAContainer => format!("{} is not a container", self.value.repr()),
            ErrorKind::NotAnIterator => format!("{} is not iterable", self.value.repr()),
            ErrorKind::NotUnique { duplicate } => format!("{} is not unique", duplicate.repr()),
            ErrorKind::WrongContainedType { errors } => {
                format!("{} contained value(s) failed: {}", errors.len(), join_errors(errors.iter()))
            }
            ErrorKind::InvalidValue { reason } => {
                reason.clone().unwrap_or_else(|| format!("{} is invalid", self.value.repr()))
            }
            ErrorKind::ConstraintNotSatisfied => format!("{} does not satisfy the constraint", self.value.repr()),
            ErrorKind::SchemaNotProvided { schema } => format!("object does not provide {}", schema),
            ErrorKind::SchemaNotFullyImplemented { attribute } => {
                format!("attribute '{}' is not implemented", attribute)
            }
            ErrorKind::SchemaNotCorrectlyImplemented {
                field_errors,
                invariant_errors,
            } => {
                let mut parts: Vec<String> = field_errors
                    .iter()
                    .map(|(name, err)| format!("{}: {}", name, err))
                    .collect();
                parts.extend(invariant_errors.iter().map(|err| err.to_string()));
                format!("object does not implement the schema correctly: {}", parts.join("; "))
            }
            ErrorKind::InvalidUri => format!("{} is not a valid URI", self.value.repr()),
            ErrorKind::InvalidId => format!("{} is not a valid id", self.value.repr()),
            ErrorKind::InvalidDottedName { reason } => reason
                .clone()
                .unwrap_or_else(|| format!("{} is not a valid dotted name", self.value.repr())),
            ErrorKind::InvalidNumberLiteral { reason }
            | ErrorKind::InvalidIntLiteral { reason }
            | ErrorKind::InvalidFloatLiteral { reason }
            | ErrorKind::InvalidDecimalLiteral { reason } => reason.clone(),
            ErrorKind::NotAnInterface => format!("{} is not an interface", self.value.repr()),
            ErrorKind::MissingVocabulary { name: Some(name) } => {
                format!("cannot validate without vocabulary '{}'", name)
            }
            ErrorKind::MissingVocabulary { name: None } => {
                "cannot validate before the vocabulary source is bound".to_string()
            }
        }
    }
}

fn length_value(length: usize) -> Value {
    Value::int(length)
}

fn error_list<'a>(errors: impl Iterator<Item = &'a ValidationError>) -> Value {
    Value::List(errors.map(|e| Value::Text(e.to_string())).collect())
}

fn join_errors<'a>(errors: impl Iterator<Item = &'a ValidationError>) -> String {
    errors.map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

impl PartialEq for ValidationError {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code() && self.args() == other.args()
    }
}

impl PartialOrd for ValidationError {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (a, b) = (self.args(), other.args());
        for (x, y) in a.iter().zip(b.iter()) {
            match x.partial_cmp(y)? {
                Ordering::Equal => continue,
                unequal => return Some(unequal),
            }
        }
        match a.len().cmp(&b.len()) {
            Ordering::Equal => Some(self.code().cmp(other.code())),
            unequal => Some(unequal),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())?;
        if let Some(field) = &self.field {
            write!(f, " ({})", field)?;
        }
        write!(f, ": {}", self.message())
    }
}

impl std::error::Error for ValidationError {}
