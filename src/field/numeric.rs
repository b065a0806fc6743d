//! Text ingest for the numeric tower

use super::errors::{ErrorKind, ValidationError, ValidationResult};
use super::{Field, FieldType};
use crate::value::numeric::{convert_with, Conversion, Converter};
use crate::value::Value;

/// Converters tried in order for each numeric field type. Float comes before
/// fraction so that `"1.5"` reads as a float where both would succeed.
pub(crate) fn converters(field_type: FieldType) -> &'static [Converter] {
    match field_type {
        FieldType::Number => &[
            Converter::Int,
            Converter::Float,
            Converter::Fraction,
            Converter::Complex,
            Converter::Decimal,
        ],
        FieldType::Complex => &[Converter::Int, Converter::Float, Converter::Complex, Converter::Fraction],
        FieldType::Real => &[Converter::Int, Converter::Float, Converter::Fraction],
        FieldType::Rational => &[Converter::Int, Converter::Fraction],
        FieldType::Integral | FieldType::Int => &[Converter::Int],
        FieldType::Float => &[Converter::Float],
        FieldType::Decimal => &[Converter::Decimal],
        _ => &[],
    }
}

fn literal_error(field_type: FieldType, reason: String) -> ErrorKind {
    match field_type {
        FieldType::Int | FieldType::Integral => ErrorKind::InvalidIntLiteral { reason },
        FieldType::Float => ErrorKind::InvalidFloatLiteral { reason },
        FieldType::Decimal => ErrorKind::InvalidDecimalLiteral { reason },
        _ => ErrorKind::InvalidNumberLiteral { reason },
    }
}

/// Parses `text` with the field's converter chain and validates the result.
pub(crate) fn from_literal(field: &Field, text: &str) -> ValidationResult<Value> {
    match convert_with(converters(field.field_type()), text) {
        Conversion::Parsed(value) => {
            field.validate(&value)?;
            Ok(value)
        }
        Conversion::Failed(failure) => Err(ValidationError::new(
            literal_error(field.field_type(), failure.reason),
            Value::from(text),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Decimal, ValueKind};

    fn ingest(field_type: FieldType, text: &str) -> ValidationResult<Value> {
        from_literal(&Field::new(field_type).unwrap(), text)
    }

    #[test]
    fn test_every_numeric_type_has_converters() {
        for field_type in [
            FieldType::Number,
            FieldType::Complex,
            FieldType::Real,
            FieldType::Rational,
            FieldType::Integral,
            FieldType::Int,
            FieldType::Float,
            FieldType::Decimal,
        ] {
            assert!(!converters(field_type).is_empty(), "{}", field_type);
        }
        assert!(converters(FieldType::Text).is_empty());
    }

    #[test]
    fn test_number_picks_strictest_reading() {
        assert_eq!(ingest(FieldType::Number, "1").unwrap().kind(), ValueKind::Int);
        assert_eq!(ingest(FieldType::Number, "1.5").unwrap().kind(), ValueKind::Float);
        assert_eq!(ingest(FieldType::Number, "1/3").unwrap().kind(), ValueKind::Rational);
        assert_eq!(ingest(FieldType::Number, "1+2j").unwrap().kind(), ValueKind::Complex);
    }

    #[test]
    fn test_oversized_float_becomes_decimal() {
        let value = ingest(FieldType::Number, &format!("1{}", "0".repeat(400))).unwrap();
        assert_eq!(value.kind(), ValueKind::Int);
        let value = ingest(FieldType::Number, "1e400").unwrap();
        assert_eq!(value.kind(), ValueKind::Decimal);
        assert_eq!(ingest(FieldType::Number, "inf").unwrap(), Value::from(Decimal::Infinity));
        assert_eq!(ingest(FieldType::Real, "inf").unwrap(), Value::Float(f64::INFINITY));
    }

    #[test]
    fn test_wide_integers_stay_integers() {
        let text = "123456789012345678901234567891";
        for field_type in [FieldType::Number, FieldType::Integral, FieldType::Int] {
            let value = ingest(field_type, text).unwrap();
            assert_eq!(value.kind(), ValueKind::Int, "{}", field_type);
            assert_eq!(value.to_string(), text);
        }
    }

    #[test]
    fn test_extreme_exponents_are_literal_errors() {
        let err = ingest(FieldType::Rational, "1.5e-2147483648").unwrap_err();
        assert_eq!(err.code(), "FIELD_INVALID_NUMBER_LITERAL");
        let err = ingest(FieldType::Decimal, "1e2147483647").unwrap_err();
        assert_eq!(err.code(), "FIELD_INVALID_DECIMAL_LITERAL");
    }

    #[test]
    fn test_rational_reads_fractions() {
        assert_eq!(ingest(FieldType::Rational, "3/4").unwrap(), Value::rational(3, 4).unwrap());
        assert_eq!(ingest(FieldType::Rational, "7").unwrap(), Value::int(7));
    }

    #[test]
    fn test_literal_errors_per_type() {
        assert_eq!(ingest(FieldType::Int, "1.5").unwrap_err().code(), "FIELD_INVALID_INT_LITERAL");
        assert_eq!(ingest(FieldType::Float, "abc").unwrap_err().code(), "FIELD_INVALID_FLOAT_LITERAL");
        assert_eq!(ingest(FieldType::Decimal, "abc").unwrap_err().code(), "FIELD_INVALID_DECIMAL_LITERAL");
        assert_eq!(ingest(FieldType::Real, "abc").unwrap_err().code(), "FIELD_INVALID_NUMBER_LITERAL");
        let err = ingest(FieldType::Int, "x").unwrap_err();
        assert_eq!(err.value(), &Value::from("x"));
    }

    #[test]
    fn test_parsed_value_is_validated() {
        let field = Field::builder(FieldType::Int).max(10).build().unwrap();
        assert_eq!(from_literal(&field, "11").unwrap_err().code(), "FIELD_TOO_BIG");
    }
}
