//! Object fields: values that must implement a schema
//!
//! Validating an object walks every field of the target schema, binds it
//! to the object and validates the attribute found there. Object graphs may
//! be cyclic; an object already being validated on this thread is accepted
//! without a second walk.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::errors::{ErrorKind, ValidationError, ValidationResult};
use crate::events::{observers, BeforeObjectAssigned, EventDispatcher};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{identity, HostRef, Member, Schema, SchemaError};
use crate::value::Value;

#[derive(Clone)]
pub(crate) struct ObjectSpec {
    pub schema: Arc<Schema>,
    pub validate_invariants: bool,
    /// Receives assignment events; the process-wide observers when unset
    pub dispatcher: Option<Arc<dyn EventDispatcher>>,
}

impl PartialEq for ObjectSpec {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema) && self.validate_invariants == other.validate_invariants
    }
}

impl fmt::Debug for ObjectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSpec")
            .field("schema", &self.schema.name())
            .field("validate_invariants", &self.validate_invariants)
            .field("dispatcher", &self.dispatcher.is_some())
            .finish()
    }
}

thread_local! {
    static VALIDATING: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

/// Marks a host as being validated until dropped.
struct CycleGuard(usize);

impl CycleGuard {
    /// `None` when the host is already being validated on this thread.
    fn enter(host: &HostRef) -> Option<Self> {
        let id = identity(host);
        VALIDATING
            .with(|validating| validating.borrow_mut().insert(id))
            .then_some(CycleGuard(id))
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        VALIDATING.with(|validating| {
            validating.borrow_mut().remove(&self.0);
        });
    }
}

/// Binding a contained choice may fail to find its vocabulary; that is
/// reported like any other field failure.
fn bind_failure(err: SchemaError) -> ValidationError {
    match err {
        SchemaError::Validation(err) => err,
        SchemaError::UnknownVocabulary { name } => {
            ValidationError::new(ErrorKind::MissingVocabulary { name: Some(name) }, Value::None)
        }
        other => ValidationError::invalid_value(&Value::None, other.to_string()),
    }
}

/// Field failures of `host` against every field of `schema`, in schema
/// name order. Method members are skipped.
pub(crate) fn field_errors(schema: &Schema, host: &HostRef) -> Vec<(String, ValidationError)> {
    let mut errors = Vec::new();
    for name in schema.names() {
        let Some(Member::Field(field)) = schema.get(&name) else {
            continue;
        };
        let bound = match field.bind(host) {
            Ok(bound) => bound,
            Err(err) => {
                errors.push((name.clone(), bind_failure(err).or_field(&name)));
                continue;
            }
        };
        let Some(value) = host.attribute(&name) else {
            let err = ValidationError::new(
                ErrorKind::SchemaNotFullyImplemented {
                    attribute: name.clone(),
                },
                Value::None,
            )
            .with_field(&name);
            errors.push((name, err));
            continue;
        };
        if let Err(err) = bound.validate(&value) {
            errors.push((name, err));
        }
    }
    errors
}

pub(crate) fn validate_object(spec: &ObjectSpec, value: &Value) -> ValidationResult<()> {
    let Some(host) = value.as_object().filter(|host| host.provides(&spec.schema)) else {
        return Err(ValidationError::new(
            ErrorKind::SchemaNotProvided {
                schema: spec.schema.name().to_string(),
            },
            value.clone(),
        ));
    };

    let Some(_guard) = CycleGuard::enter(host) else {
        log_event_with_fields(Event::ObjectCycleBroken, &[("schema", spec.schema.name())]);
        return Ok(());
    };

    let field_errors: BTreeMap<String, ValidationError> = field_errors(&spec.schema, host).into_iter().collect();
    let invariant_errors = if spec.validate_invariants && field_errors.is_empty() {
        spec.schema.validate_invariants(host)
    } else {
        Vec::new()
    };
    if field_errors.is_empty() && invariant_errors.is_empty() {
        return Ok(());
    }

    log_event_with_fields(
        Event::ObjectValidationFailed,
        &[
            ("schema", spec.schema.name()),
            ("field_errors", &field_errors.len().to_string()),
            ("invariant_errors", &invariant_errors.len().to_string()),
        ],
    );
    Err(ValidationError::new(
        ErrorKind::SchemaNotCorrectlyImplemented {
            field_errors,
            invariant_errors,
        },
        value.clone(),
    ))
}

/// Sends a before-assignment event and returns the object observers left
/// in it.
pub(crate) fn announce_assignment(spec: &ObjectSpec, name: &str, host: &HostRef, value: Value) -> Value {
    let mut event = BeforeObjectAssigned::new(value, name, Arc::clone(host));
    log_event_with_fields(
        Event::BeforeObjectAssigned,
        &[("field", name), ("schema", spec.schema.name())],
    );
    match &spec.dispatcher {
        Some(dispatcher) => dispatcher.notify(&mut event),
        None => observers().notify(&mut event),
    }
    event.object
}
