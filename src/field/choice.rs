//! Choice fields: values drawn from a vocabulary
//!
//! The vocabulary is either known when the field is built (explicit values,
//! a vocabulary object or any other source) or found later: by name through
//! a registry, or by calling a binder with the object the field is bound to.

use std::fmt;
use std::sync::Arc;

use super::errors::{ErrorKind, ValidationError, ValidationResult};
use crate::observability::{log_event, Event};
use crate::schema::{HostRef, SchemaResult};
use crate::value::Value;
use crate::vocabulary::{get_registry, same_source, Source, SourceBinder, VocabularyRegistry};

#[derive(Clone)]
pub(crate) enum VocabularySource {
    Fixed(Arc<dyn Source>),
    Named(String),
    Binder(SourceBinder),
}

impl PartialEq for VocabularySource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (VocabularySource::Fixed(a), VocabularySource::Fixed(b)) => same_source(a, b),
            (VocabularySource::Named(a), VocabularySource::Named(b)) => a == b,
            (VocabularySource::Binder(a), VocabularySource::Binder(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for VocabularySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabularySource::Fixed(source) => f.debug_tuple("Fixed").field(source).finish(),
            VocabularySource::Named(name) => f.debug_tuple("Named").field(name).finish(),
            VocabularySource::Binder(binder) => f.debug_tuple("Binder").field(binder).finish(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct ChoiceSpec {
    pub source: VocabularySource,
    /// Registry for named vocabularies; the process-wide one when unset
    pub registry: Option<Arc<VocabularyRegistry>>,
    /// Late-bound vocabulary resolved by `bind`
    resolved: Option<Arc<dyn Source>>,
}

impl ChoiceSpec {
    pub(crate) fn new(source: VocabularySource, registry: Option<Arc<VocabularyRegistry>>) -> Self {
        Self {
            source,
            registry,
            resolved: None,
        }
    }

    /// Whether the default must wait until the vocabulary can be resolved
    pub(crate) fn defers_validation(&self) -> bool {
        !matches!(self.source, VocabularySource::Fixed(_))
    }

    pub(crate) fn name(&self) -> Option<&str> {
        match &self.source {
            VocabularySource::Named(name) => Some(name),
            _ => None,
        }
    }

    pub(crate) fn resolved(&self) -> Option<Arc<dyn Source>> {
        match &self.source {
            VocabularySource::Fixed(source) => Some(Arc::clone(source)),
            _ => self.resolved.clone(),
        }
    }

    fn registry(&self) -> Arc<VocabularyRegistry> {
        self.registry.clone().unwrap_or_else(get_registry)
    }

    fn resolve(&self, context: Option<&HostRef>) -> ValidationResult<Arc<dyn Source>> {
        if let Some(source) = self.resolved() {
            return Ok(source);
        }
        match &self.source {
            VocabularySource::Fixed(source) => Ok(Arc::clone(source)),
            VocabularySource::Named(name) => self.registry().get(context, name).map_err(|_| {
                ValidationError::new(ErrorKind::MissingVocabulary { name: Some(name.clone()) }, Value::None)
            }),
            VocabularySource::Binder(binder) => match context {
                Some(context) => Ok(binder.bind(context)),
                None => {
                    log_event(Event::UnboundChoiceValidated);
                    Err(ValidationError::new(ErrorKind::MissingVocabulary { name: None }, Value::None))
                }
            },
        }
    }

    pub(crate) fn bind(&self, context: &HostRef) -> SchemaResult<Self> {
        let mut bound = self.clone();
        bound.resolved = match &self.source {
            VocabularySource::Fixed(_) => None,
            VocabularySource::Named(name) => Some(self.registry().get(Some(context), name)?),
            VocabularySource::Binder(binder) => Some(binder.bind(context)),
        };
        Ok(bound)
    }
}

impl PartialEq for ChoiceSpec {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for ChoiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoiceSpec")
            .field("source", &self.source)
            .field("resolved", &self.resolved.is_some())
            .finish()
    }
}

pub(crate) fn validate_choice(spec: &ChoiceSpec, context: Option<&HostRef>, value: &Value) -> ValidationResult<()> {
    let source = spec.resolve(context)?;
    if source.contains(value) {
        Ok(())
    } else {
        Err(ValidationError::constraint_not_satisfied(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Instance;
    use crate::vocabulary::SimpleVocabulary;

    fn colors() -> Arc<dyn Source> {
        Arc::new(SimpleVocabulary::from_values(["red", "green"]).unwrap())
    }

    #[test]
    fn test_fixed_vocabulary() {
        let spec = ChoiceSpec::new(VocabularySource::Fixed(colors()), None);
        assert!(!spec.defers_validation());
        assert!(validate_choice(&spec, None, &Value::from("red")).is_ok());
        let err = validate_choice(&spec, None, &Value::from("blue")).unwrap_err();
        assert_eq!(err.code(), "FIELD_CONSTRAINT_NOT_SATISFIED");
    }

    #[test]
    fn test_named_vocabulary_from_registry() {
        let registry = Arc::new(VocabularyRegistry::new());
        let spec = ChoiceSpec::new(VocabularySource::Named("colors".into()), Some(registry.clone()));
        assert!(spec.defers_validation());

        let err = validate_choice(&spec, None, &Value::from("red")).unwrap_err();
        assert_eq!(err.code(), "FIELD_MISSING_VOCABULARY");

        registry.register_source("colors", colors());
        assert!(validate_choice(&spec, None, &Value::from("red")).is_ok());
    }

    #[test]
    fn test_bind_resolves_against_context() {
        let binder = SourceBinder::new(|host| {
            let allowed = host.attribute("allowed").and_then(|v| v.elements()).unwrap_or_default();
            Arc::new(SimpleVocabulary::from_values(allowed).unwrap()) as Arc<dyn Source>
        });
        let spec = ChoiceSpec::new(VocabularySource::Binder(binder), None);
        let host = Instance::new().with("allowed", Value::list(["a", "b"])).into_ref();

        assert!(spec.resolved().is_none());
        let bound = spec.bind(&host).unwrap();
        assert!(bound.resolved().is_some());
        assert!(validate_choice(&bound, Some(&host), &Value::from("a")).is_ok());
        assert!(validate_choice(&bound, Some(&host), &Value::from("c")).is_err());
    }

    #[test]
    fn test_unbound_binder_is_missing_vocabulary() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counted = calls.clone();
        let binder = SourceBinder::new(move |_| {
            counted.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Arc::new(SimpleVocabulary::from_values(["a"]).unwrap()) as Arc<dyn Source>
        });
        let spec = ChoiceSpec::new(VocabularySource::Binder(binder), None);

        let err = validate_choice(&spec, None, &Value::from("a")).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MissingVocabulary { name: None }));
        assert!(err.args().is_empty());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bind_with_unknown_name_fails() {
        let spec = ChoiceSpec::new(
            VocabularySource::Named("nothing".into()),
            Some(Arc::new(VocabularyRegistry::new())),
        );
        let err = spec.bind(&Instance::new().into_ref()).unwrap_err();
        assert!(err.is_not_found());
    }
}
