//! Schema introspection helpers

use super::host::HostRef;
use super::types::{Member, Schema};
use crate::field::{field_errors, Field, ValidationError};

/// Fields of `schema` and its bases, keyed by name, in name order (own
/// names first). Methods are left out.
pub fn fields_of(schema: &Schema) -> Vec<(String, Field)> {
    schema
        .names()
        .into_iter()
        .filter_map(|name| match schema.get(&name) {
            Some(Member::Field(field)) => Some((name, field)),
            _ => None,
        })
        .collect()
}

/// Fields of `schema` sorted by creation order.
pub fn fields_in_order(schema: &Schema) -> Vec<(String, Field)> {
    let mut fields = fields_of(schema);
    fields.sort_by_key(|(_, field)| field.order());
    fields
}

pub fn names_of(schema: &Schema) -> Vec<String> {
    fields_of(schema).into_iter().map(|(name, _)| name).collect()
}

pub fn names_in_order(schema: &Schema) -> Vec<String> {
    fields_in_order(schema).into_iter().map(|(name, _)| name).collect()
}

/// Validates every field of `schema` against the attributes of `host`.
/// Empty means every field is valid; invariants are not consulted.
pub fn schema_validation_errors(schema: &Schema, host: &HostRef) -> Vec<(String, ValidationError)> {
    field_errors(schema, host)
}

/// Field errors as `(Some(name), error)` pairs. When there are none, the
/// schema invariants run and each failure is reported as `(None, error)`.
/// Empty means `host` is valid.
pub fn validation_errors(schema: &Schema, host: &HostRef) -> Vec<(Option<String>, ValidationError)> {
    let errors = field_errors(schema, host);
    if !errors.is_empty() {
        return errors.into_iter().map(|(name, err)| (Some(name), err)).collect();
    }
    schema
        .validate_invariants(host)
        .into_iter()
        .map(|err| (None, err))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use crate::schema::Instance;
    use crate::value::Value;

    fn range_schema() -> std::sync::Arc<Schema> {
        // Declared out of creation order on purpose.
        let high = Field::new(FieldType::Int).unwrap();
        let low = Field::new(FieldType::Int).unwrap();
        Schema::builder("IRange")
            .field("high", high)
            .field("low", low)
            .method("width", "()")
            .invariant("ordered", |host| match (host.attribute("low"), host.attribute("high")) {
                (Some(low), Some(high)) if low > high => Err(ValidationError::invalid_value(&low, "low > high")),
                _ => Ok(()),
            })
            .build()
    }

    #[test]
    fn test_methods_are_not_fields() {
        let schema = range_schema();
        assert_eq!(names_of(&schema), vec!["high", "low"]);
        assert!(schema.contains("width"));
    }

    #[test]
    fn test_creation_order() {
        let schema = range_schema();
        assert_eq!(names_in_order(&schema), vec!["high", "low"]);
        let derived = Schema::builder("IDerived")
            .extends(schema)
            .field("step", Field::new(FieldType::Int).unwrap())
            .build();
        assert_eq!(names_of(&derived), vec!["step", "high", "low"]);
        assert_eq!(names_in_order(&derived), vec!["high", "low", "step"]);
    }

    #[test]
    fn test_validation_errors_prefer_field_errors() {
        let schema = range_schema();
        let host = Instance::providing(schema.clone()).with("low", "x").with("high", 1).into_ref();
        let errors = validation_errors(&schema, &host);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0.as_deref(), Some("low"));

        let host = Instance::providing(schema.clone()).with("low", 5).with("high", 1).into_ref();
        assert!(schema_validation_errors(&schema, &host).is_empty());
        let errors = validation_errors(&schema, &host);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, None);
        assert_eq!(errors[0].1.value(), &Value::int(5));

        let host = Instance::providing(schema.clone()).with("low", 1).with("high", 5).into_ref();
        assert!(validation_errors(&schema, &host).is_empty());
    }
}
