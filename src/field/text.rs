//! Text rules: line fields, ASCII, URIs, dotted names and ids

use std::sync::OnceLock;

use regex::Regex;

use super::errors::{ErrorKind, ValidationError, ValidationResult};
use super::FieldType;
use crate::value::Value;

/// Dot-count bounds for dotted names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotBounds {
    pub min_dots: usize,
    pub max_dots: Option<usize>,
}

fn uri_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9+.-]+:\S*$").expect("URI pattern is valid"))
}

fn dotted_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([a-zA-Z][a-zA-Z0-9_]*)([.][a-zA-Z][a-zA-Z0-9_]*)*$").expect("dotted-name pattern is valid")
    })
}

/// The constraint a field applies when no user constraint replaces it.
pub(crate) fn builtin_constraint(field_type: FieldType, value: &Value) -> bool {
    match (field_type, value) {
        (
            FieldType::TextLine | FieldType::Password | FieldType::Uri | FieldType::DottedName | FieldType::Id,
            Value::Text(text),
        ) => !text.contains(['\n', '\r']),
        (FieldType::AsciiLine, Value::Text(text)) => !text.contains('\n'),
        (FieldType::BytesLine, Value::Bytes(data)) => !data.contains(&b'\n'),
        _ => true,
    }
}

pub(crate) fn check_ascii(value: &Value) -> ValidationResult<()> {
    match value {
        Value::Text(text) if !text.is_ascii() => Err(ValidationError::new(
            ErrorKind::InvalidValue { reason: None },
            value.clone(),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn is_uri(text: &str) -> bool {
    uri_pattern().is_match(text)
}

pub(crate) fn check_uri(value: &Value) -> ValidationResult<()> {
    match value.as_str() {
        Some(text) if is_uri(text) => Ok(()),
        _ => Err(ValidationError::new(ErrorKind::InvalidUri, value.clone())),
    }
}

fn invalid_dotted(value: &Value, reason: Option<String>) -> ValidationError {
    ValidationError::new(ErrorKind::InvalidDottedName { reason }, value.clone())
}

pub(crate) fn check_dotted_name(value: &Value, dots: &DotBounds) -> ValidationResult<()> {
    let text = value.as_str().unwrap_or_default();
    if !dotted_pattern().is_match(text) {
        return Err(invalid_dotted(value, None));
    }
    let count = text.matches('.').count();
    if count < dots.min_dots {
        return Err(invalid_dotted(
            value,
            Some(format!("too few dots; {} required", dots.min_dots)),
        ));
    }
    match dots.max_dots {
        Some(max_dots) if count > max_dots => Err(invalid_dotted(
            value,
            Some(format!("too many dots; no more than {} allowed", max_dots)),
        )),
        _ => Ok(()),
    }
}

/// An id is a URI or a dotted name with at least one dot.
pub(crate) fn check_id(value: &Value) -> ValidationResult<()> {
    let text = value.as_str().unwrap_or_default();
    if is_uri(text) || (text.contains('.') && dotted_pattern().is_match(text)) {
        Ok(())
    } else {
        Err(ValidationError::new(ErrorKind::InvalidId, value.clone()))
    }
}
