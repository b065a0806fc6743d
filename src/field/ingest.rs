//! Reading field values from text

use super::errors::ValidationError;
use super::numeric;
use super::{Field, FieldType};
use crate::schema::{SchemaError, SchemaResult};
use crate::value::Value;

/// Fields that can parse their value from a text literal.
pub trait FromUnicode {
    /// Parses `text`, validates the result and returns it.
    ///
    /// # Errors
    ///
    /// `SchemaError::Validation` when the text does not parse or the parsed
    /// value is invalid; `SchemaError::InvalidArgument` for field types that
    /// have no text form.
    fn from_unicode(&self, text: &str) -> SchemaResult<Value>;
}

impl FromUnicode for Field {
    fn from_unicode(&self, text: &str) -> SchemaResult<Value> {
        let field_type = self.field_type();
        let value = match field_type {
            _ if field_type.is_numeric() => return Ok(numeric::from_literal(self, text)?),
            FieldType::Bool => Value::Bool(text == "true" || text == "True"),
            FieldType::Uri | FieldType::DottedName | FieldType::Id => Value::from(text.trim()),
            FieldType::Text
            | FieldType::TextLine
            | FieldType::SourceText
            | FieldType::Password
            | FieldType::Ascii
            | FieldType::AsciiLine
            | FieldType::Choice => Value::from(text),
            FieldType::Bytes | FieldType::BytesLine => {
                if !text.is_ascii() {
                    return Err(ValidationError::invalid_value(
                        &Value::from(text),
                        "only ASCII text can be read as bytes",
                    )
                    .into());
                }
                Value::bytes(text)
            }
            _ => {
                return Err(SchemaError::invalid_argument(
                    "text",
                    format!("{} fields cannot be read from text", field_type),
                ))
            }
        };
        self.validate(&value)?;
        Ok(value)
    }
}
