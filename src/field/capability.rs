//! Capability layers shared by several field types
//!
//! Each layer checks one property of a value that already passed the type
//! check and the constraint. Fields run their layers in a fixed order.

use std::cmp::Ordering;

use super::errors::{ErrorKind, ValidationError, ValidationResult};
use crate::value::Value;

/// One validation step.
pub(crate) trait Layer {
    fn check(&self, value: &Value) -> ValidationResult<()>;
}

/// Inclusive `min` / `max` for orderable fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bounds {
    pub min: Option<Value>,
    pub max: Option<Value>,
}

fn compare(value: &Value, bound: &Value) -> ValidationResult<Ordering> {
    value.partial_cmp(bound).ok_or_else(|| {
        ValidationError::invalid_value(
            value,
            format!("{} cannot be compared with {}", value.repr(), bound.repr()),
        )
    })
}

impl Layer for Bounds {
    fn check(&self, value: &Value) -> ValidationResult<()> {
        if let Some(min) = &self.min {
            if compare(value, min)? == Ordering::Less {
                return Err(ValidationError::too_small(value, min));
            }
        }
        if let Some(max) = &self.max {
            if compare(value, max)? == Ordering::Greater {
                return Err(ValidationError::too_big(value, max));
            }
        }
        Ok(())
    }
}

/// Inclusive length bounds for sized values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LengthBounds {
    pub min_length: usize,
    pub max_length: Option<usize>,
}

impl Layer for LengthBounds {
    fn check(&self, value: &Value) -> ValidationResult<()> {
        let Some(length) = value.len() else {
            return Err(ValidationError::new(ErrorKind::NotAContainer, value.clone()));
        };
        if length < self.min_length {
            return Err(ValidationError::too_short(value, self.min_length));
        }
        match self.max_length {
            Some(max_length) if length > max_length => Err(ValidationError::too_long(value, max_length)),
            _ => Ok(()),
        }
    }
}

/// The value must answer membership tests.
pub(crate) struct ContainerCheck;

impl Layer for ContainerCheck {
    fn check(&self, value: &Value) -> ValidationResult<()> {
        if value.supports_membership() {
            Ok(())
        } else {
            Err(ValidationError::new(ErrorKind::NotAContainer, value.clone()))
        }
    }
}

/// The value must be iterable.
pub(crate) struct IterableCheck;

impl Layer for IterableCheck {
    fn check(&self, value: &Value) -> ValidationResult<()> {
        if value.elements().is_some() {
            Ok(())
        } else {
            Err(ValidationError::new(ErrorKind::NotAnIterator, value.clone()))
        }
    }
}
