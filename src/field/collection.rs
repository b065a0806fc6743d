//! Collections and mappings
//!
//! Every member is validated against the contained field; all failures are
//! reported together in one `WrongContainedType`.

use super::capability::LengthBounds;
use super::errors::{ErrorKind, ValidationError, ValidationResult};
use super::Field;
use crate::schema::{HostRef, SchemaResult};
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CollectionSpec {
    pub value_type: Option<Box<Field>>,
    pub unique: bool,
    pub length: LengthBounds,
}

impl CollectionSpec {
    pub(crate) fn bind(&self, context: &HostRef) -> SchemaResult<Self> {
        let mut bound = self.clone();
        if let Some(value_type) = &self.value_type {
            bound.value_type = Some(Box::new(value_type.bind(context)?));
        }
        Ok(bound)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MappingSpec {
    pub key_type: Option<Box<Field>>,
    pub value_type: Option<Box<Field>>,
    pub length: LengthBounds,
}

impl MappingSpec {
    pub(crate) fn bind(&self, context: &HostRef) -> SchemaResult<Self> {
        let mut bound = self.clone();
        if let Some(key_type) = &self.key_type {
            bound.key_type = Some(Box::new(key_type.bind(context)?));
        }
        if let Some(value_type) = &self.value_type {
            bound.value_type = Some(Box::new(value_type.bind(context)?));
        }
        Ok(bound)
    }
}

fn collect_errors<'a>(field: Option<&Field>, members: impl Iterator<Item = &'a Value>, errors: &mut Vec<ValidationError>) {
    if let Some(field) = field {
        errors.extend(members.filter_map(|member| field.validate(member).err()));
    }
}

fn contained(errors: Vec<ValidationError>, value: &Value) -> ValidationResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(ErrorKind::WrongContainedType { errors }, value.clone()))
    }
}

pub(crate) fn validate_collection(spec: &CollectionSpec, value: &Value) -> ValidationResult<()> {
    let members = value.elements().unwrap_or_default();

    let mut errors = Vec::new();
    collect_errors(spec.value_type.as_deref(), members.iter(), &mut errors);
    contained(errors, value)?;

    if spec.unique {
        for (index, member) in members.iter().enumerate() {
            if members[..index].contains(member) {
                return Err(ValidationError::not_unique(value, member));
            }
        }
    }
    Ok(())
}

/// Values are checked before keys; both land in the same error list.
pub(crate) fn validate_mapping(spec: &MappingSpec, value: &Value) -> ValidationResult<()> {
    let Value::Dict(entries) = value else {
        return Ok(());
    };
    let mut errors = Vec::new();
    collect_errors(spec.value_type.as_deref(), entries.iter().map(|(_, v)| v), &mut errors);
    collect_errors(spec.key_type.as_deref(), entries.iter().map(|(k, _)| k), &mut errors);
    contained(errors, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    fn int_field() -> Box<Field> {
        Box::new(Field::new(FieldType::Int).unwrap())
    }

    #[test]
    fn test_every_member_failure_is_kept() {
        let spec = CollectionSpec {
            value_type: Some(int_field()),
            ..CollectionSpec::default()
        };
        let err = validate_collection(&spec, &Value::list([Value::int(1), Value::from("a"), Value::from("b")]))
            .unwrap_err();
        assert_eq!(err.code(), "FIELD_WRONG_CONTAINED_TYPE");
        assert_eq!(err.contained_errors().len(), 2);
    }

    #[test]
    fn test_unique_reports_first_duplicate() {
        let spec = CollectionSpec {
            unique: true,
            ..CollectionSpec::default()
        };
        let err = validate_collection(&spec, &Value::list([1, 2, 1, 2])).unwrap_err();
        assert_eq!(err.code(), "FIELD_NOT_UNIQUE");
        assert_eq!(err.args(), vec![Value::int(1)]);
        assert!(validate_collection(&spec, &Value::list([1, 2, 3])).is_ok());
    }

    #[test]
    fn test_member_errors_come_before_uniqueness() {
        let spec = CollectionSpec {
            value_type: Some(int_field()),
            unique: true,
            ..CollectionSpec::default()
        };
        let err = validate_collection(&spec, &Value::list([Value::from("a"), Value::from("a")])).unwrap_err();
        assert_eq!(err.code(), "FIELD_WRONG_CONTAINED_TYPE");
    }

    #[test]
    fn test_mapping_values_then_keys() {
        let spec = MappingSpec {
            key_type: Some(Box::new(Field::new(FieldType::TextLine).unwrap())),
            value_type: Some(int_field()),
            ..MappingSpec::default()
        };
        assert!(validate_mapping(&spec, &Value::dict([("a", 1)])).is_ok());
        let err = validate_mapping(&spec, &Value::dict([(Value::int(1), Value::from("x"))])).unwrap_err();
        let types: Vec<&str> = err.contained_errors().iter().map(|e| e.value().type_name()).collect();
        assert_eq!(types, vec!["str", "int"]);
    }
}
