//! Vocabulary Registry Tests
//!
//! Tests for the process-wide vocabulary registry. They live in their own
//! test binary and run as one test, since replacing the registry affects
//! every field that relies on it.

use std::sync::Arc;

use schemafields::vocabulary::VocabularyRegistry;
use schemafields::{get_registry, set_registry, Field, FieldType, Host, Instance, SimpleVocabulary, Source, Value};

/// Named choices without a registry of their own follow the global one,
/// including after it is replaced.
#[test]
fn test_global_registry_lifecycle() {
    // =========================================================================
    // Lookup in the default registry
    // =========================================================================

    let field = Field::builder(FieldType::Choice).vocabulary_name("sizes").build().unwrap();
    assert!(!get_registry().contains("sizes"));
    assert_eq!(
        field.validate(&Value::from("small")).unwrap_err().code(),
        "FIELD_MISSING_VOCABULARY"
    );

    get_registry().register_source("sizes", Arc::new(SimpleVocabulary::from_values(["small", "large"]).unwrap()));
    assert!(field.validate(&Value::from("small")).is_ok());

    // =========================================================================
    // Replacement
    // =========================================================================

    let replacement = Arc::new(VocabularyRegistry::new());
    replacement.register("sizes", |context| {
        let sizes = context
            .and_then(|host| host.attribute("sizes"))
            .and_then(|value| value.elements())
            .unwrap_or_default();
        Arc::new(SimpleVocabulary::from_values(sizes).unwrap()) as Arc<dyn Source>
    });
    let previous = set_registry(replacement.clone());
    assert!(previous.contains("sizes"));
    assert!(Arc::ptr_eq(&get_registry(), &replacement));

    let host = Instance::new().with("sizes", Value::list(["tiny"])).into_ref();
    let bound = field.bind(&host).unwrap();
    assert!(bound.validate(&Value::from("tiny")).is_ok());
    assert!(bound.validate(&Value::from("small")).is_err());

    // =========================================================================
    // Unknown names at bind time
    // =========================================================================

    let orphan = Field::builder(FieldType::Choice).vocabulary_name("shapes").build().unwrap();
    assert_eq!(orphan.bind(&host).unwrap_err().code(), "SCHEMA_UNKNOWN_VOCABULARY");

    set_registry(previous);
    assert!(host.attribute("sizes").is_some());
}
