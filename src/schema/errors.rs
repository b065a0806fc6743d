//! Schema error types
//!
//! `SchemaError` covers everything that is not a validation verdict:
//! malformed field construction, host attribute access, vocabulary and
//! registry lookups, and loading schema definitions from disk.
//!
//! Error codes:
//! - SCHEMA_UNEXPECTED_ARGUMENT
//! - SCHEMA_INVALID_ARGUMENT
//! - SCHEMA_READ_ONLY
//! - SCHEMA_ATTRIBUTE_MISSING
//! - SCHEMA_TERM_NOT_FOUND / SCHEMA_TOKEN_NOT_FOUND
//! - SCHEMA_UNKNOWN_VOCABULARY
//! - SCHEMA_DUPLICATE_TERM
//! - SCHEMA_UNKNOWN_SCHEMA / SCHEMA_IMMUTABLE
//! - SCHEMA_MALFORMED_DEFINITION
//! - SCHEMA_VALIDATION_FAILED

use thiserror::Error;

use crate::field::ValidationError;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised outside the validation verdict itself
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A field constructor received an argument its type does not take
    #[error("{field_type}() got an unexpected argument '{argument}'")]
    UnexpectedArgument { field_type: String, argument: String },

    /// A constructor argument has an unusable value
    #[error("invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// Attempt to write through a read-only field
    #[error("can't set values on read-only field '{field}'")]
    ReadOnly { field: String },

    /// Host object has no attribute of that name
    #[error("object has no attribute '{attribute}'")]
    AttributeMissing { attribute: String },

    /// Vocabulary has no term for the value
    #[error("term not found for value {value}")]
    TermNotFound { value: String },

    /// Vocabulary has no term for the token
    #[error("term not found for token '{token}'")]
    TokenNotFound { token: String },

    /// Registry has no factory under that name
    #[error("unknown vocabulary: '{name}'")]
    UnknownVocabulary { name: String },

    /// Two terms share a value or a token
    #[error("term {what}s must be unique: {repr}")]
    DuplicateTerm { what: &'static str, repr: String },

    /// Schema name not registered
    #[error("schema '{name}' not found")]
    UnknownSchema { name: String },

    /// Schema name already registered
    #[error("schema '{name}' is already registered and immutable")]
    SchemaImmutable { name: String },

    /// Declarative schema file could not be understood
    #[error("malformed schema definition '{path}': {reason}")]
    MalformedDefinition { path: String, reason: String },

    /// A value was rejected while configuring a field
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl SchemaError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnexpectedArgument { .. } => "SCHEMA_UNEXPECTED_ARGUMENT",
            SchemaError::InvalidArgument { .. } => "SCHEMA_INVALID_ARGUMENT",
            SchemaError::ReadOnly { .. } => "SCHEMA_READ_ONLY",
            SchemaError::AttributeMissing { .. } => "SCHEMA_ATTRIBUTE_MISSING",
            SchemaError::TermNotFound { .. } => "SCHEMA_TERM_NOT_FOUND",
            SchemaError::TokenNotFound { .. } => "SCHEMA_TOKEN_NOT_FOUND",
            SchemaError::UnknownVocabulary { .. } => "SCHEMA_UNKNOWN_VOCABULARY",
            SchemaError::DuplicateTerm { .. } => "SCHEMA_DUPLICATE_TERM",
            SchemaError::UnknownSchema { .. } => "SCHEMA_UNKNOWN_SCHEMA",
            SchemaError::SchemaImmutable { .. } => "SCHEMA_IMMUTABLE",
            SchemaError::MalformedDefinition { .. } => "SCHEMA_MALFORMED_DEFINITION",
            SchemaError::Validation(_) => "SCHEMA_VALIDATION_FAILED",
        }
    }

    /// Whether this is a lookup failure. Unknown vocabularies are a
    /// special case of not-found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SchemaError::TermNotFound { .. }
                | SchemaError::TokenNotFound { .. }
                | SchemaError::UnknownVocabulary { .. }
                | SchemaError::UnknownSchema { .. }
        )
    }

    /// Returns the validation error if this wraps one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            SchemaError::Validation(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn invalid_argument(argument: &str, reason: impl Into<String>) -> Self {
        SchemaError::InvalidArgument {
            argument: argument.to_string(),
            reason: reason.into(),
        }
    }
}
