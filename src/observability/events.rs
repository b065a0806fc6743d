//! Observable events
//!
//! Events are explicit and typed; each one has a stable name and a
//! severity used when it is written to the log.

use std::fmt;

/// Log severity of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
        }
    }
}

/// Observable events in the schema library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Loading
    /// One schema definition file was loaded
    SchemaLoaded,
    /// A directory of schema definitions was loaded
    SchemasLoaded,

    // Vocabularies
    /// A factory was registered under a vocabulary name
    VocabularyRegistered,
    /// The process-wide vocabulary registry was replaced
    VocabularyRegistryReplaced,

    // Object validation
    /// A choice with a source binder was validated before being bound
    UnboundChoiceValidated,
    /// Validation reached an object already being validated
    ObjectCycleBroken,
    /// An object failed validation against its schema
    ObjectValidationFailed,
    /// An object is about to be assigned through an object field
    BeforeObjectAssigned,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::VocabularyRegistered => "VOCABULARY_REGISTERED",
            Event::VocabularyRegistryReplaced => "VOCABULARY_REGISTRY_REPLACED",
            Event::UnboundChoiceValidated => "UNBOUND_CHOICE_VALIDATED",
            Event::ObjectCycleBroken => "OBJECT_CYCLE_BROKEN",
            Event::ObjectValidationFailed => "OBJECT_VALIDATION_FAILED",
            Event::BeforeObjectAssigned => "BEFORE_OBJECT_ASSIGNED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaLoaded | Event::VocabularyRegistered => Severity::Debug,
            Event::SchemasLoaded | Event::VocabularyRegistryReplaced => Severity::Info,
            Event::ObjectCycleBroken | Event::BeforeObjectAssigned => Severity::Trace,
            Event::ObjectValidationFailed => Severity::Debug,
            Event::UnboundChoiceValidated => Severity::Warn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake_case() {
        let events = [
            Event::SchemaLoaded,
            Event::SchemasLoaded,
            Event::VocabularyRegistered,
            Event::VocabularyRegistryReplaced,
            Event::UnboundChoiceValidated,
            Event::ObjectCycleBroken,
            Event::ObjectValidationFailed,
            Event::BeforeObjectAssigned,
        ];
        for event in events {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'), "{}", name);
        }
    }

    #[test]
    fn test_registry_replacement_is_info() {
        assert_eq!(Event::VocabularyRegistryReplaced.severity(), Severity::Info);
        assert!(Event::ObjectCycleBroken.severity() < Severity::Info);
        assert_eq!(Event::UnboundChoiceValidated.severity(), Severity::Warn);
    }
}
