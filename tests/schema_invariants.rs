//! Schema Invariant Tests
//!
//! Tests for schemas as contracts over host objects:
//! - Object fields report exactly what `validation_errors` reports
//! - Invariants run only once every field is valid
//! - Cyclic object graphs terminate
//! - Assignment events may substitute the stored object
//! - Schema files load atomically from disk

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use schemafields::schema::{fields_in_order, names_of, validation_errors, SchemaDocument, SchemaLoader};
use schemafields::{
    ErrorKind, Field, FieldType, Host, HostRef, Instance, Observers, Schema, ValidationError, Value,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn person_schema() -> Arc<Schema> {
    let person = Schema::builder("IPerson")
        .field("name", Field::builder(FieldType::TextLine).min_length(1).build().unwrap())
        .field("age", Field::builder(FieldType::Int).min(0).max(150).build().unwrap())
        .method("greet", "(other)")
        .invariant("adults_have_names", |host| {
            match (host.attribute("age"), host.attribute("name")) {
                (Some(age), Some(name)) if age >= Value::int(18) && name == Value::from("anonymous") => {
                    Err(ValidationError::invalid_value(&name, "adults must be named"))
                }
                _ => Ok(()),
            }
        })
        .build();
    // Self-referencing field, defined once the schema exists.
    person.define_field(
        "friend",
        Field::builder(FieldType::Object)
            .schema(person.clone())
            .required(false)
            .build()
            .unwrap(),
    );
    person
}

fn person(schema: &Arc<Schema>, name: &str, age: i64) -> HostRef {
    Instance::providing(schema.clone())
        .with("name", name)
        .with("age", age)
        .with("friend", Value::None)
        .into_ref()
}

// =============================================================================
// Introspection Tests
// =============================================================================

/// Methods are members but never fields.
#[test]
fn test_fields_exclude_methods() {
    let schema = person_schema();
    assert!(schema.contains("greet"));
    assert_eq!(names_of(&schema), vec!["name", "age", "friend"]);
    let ordered: Vec<String> = fields_in_order(&schema).into_iter().map(|(name, _)| name).collect();
    assert_eq!(ordered, vec!["name", "age", "friend"]);
}

// =============================================================================
// Object Validation Tests
// =============================================================================

/// A valid object has no errors of any kind.
#[test]
fn test_valid_object() {
    let schema = person_schema();
    let alice = person(&schema, "Alice", 30);
    assert!(validation_errors(&schema, &alice).is_empty());
}

/// The errors inside an object-field failure are the field errors
/// `validation_errors` reports for the same object.
#[test]
fn test_object_errors_match_validation_errors() {
    let schema = person_schema();
    let field = Field::builder(FieldType::Object).schema(schema.clone()).build().unwrap();
    let broken = person(&schema, "", 200);

    let reported = validation_errors(&schema, &broken);
    assert_eq!(reported.len(), 2);

    let err = field.validate(&Value::Object(broken.clone())).unwrap_err();
    let ErrorKind::SchemaNotCorrectlyImplemented { field_errors, invariant_errors } = err.kind() else {
        panic!("unexpected error: {:?}", err);
    };
    assert!(invariant_errors.is_empty());
    assert_eq!(field_errors.len(), reported.len());
    for (name, error) in reported {
        let name = name.unwrap();
        assert_eq!(field_errors.get(&name), Some(&error), "{}", name);
    }
}

/// Missing attributes mean the schema is not fully implemented.
#[test]
fn test_missing_attribute() {
    let schema = person_schema();
    let partial = Instance::providing(schema.clone())
        .with("name", "Bob")
        .with("friend", Value::None)
        .into_ref();
    let errors = validation_errors(&schema, &partial);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0.as_deref(), Some("age"));
    assert_eq!(errors[0].1.code(), "FIELD_SCHEMA_NOT_FULLY_IMPLEMENTED");
}

/// Objects that do not declare the schema are rejected outright.
#[test]
fn test_schema_not_provided() {
    let schema = person_schema();
    let field = Field::builder(FieldType::Object).schema(schema).build().unwrap();
    let stranger = Instance::new().with("name", "Eve").with("age", 40).into_ref();
    let err = field.validate(&Value::Object(stranger)).unwrap_err();
    assert_eq!(err.code(), "FIELD_SCHEMA_NOT_PROVIDED");
}

/// Invariants only run once the fields are valid, and can be turned off.
#[test]
fn test_invariants_follow_field_errors() {
    let schema = person_schema();
    let anonymous = person(&schema, "anonymous", 40);
    let errors = validation_errors(&schema, &anonymous);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, None);

    let broken = person(&schema, "anonymous", -1);
    let errors = validation_errors(&schema, &broken);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0.as_deref(), Some("age"));

    let lenient = Field::builder(FieldType::Object)
        .schema(schema.clone())
        .validate_invariants(false)
        .build()
        .unwrap();
    assert!(lenient.validate(&Value::Object(anonymous)).is_ok());
}

/// Validation of a cyclic graph terminates and still reports errors
/// outside the cycle.
#[test]
fn test_cycles_terminate() {
    let schema = person_schema();
    let a = person(&schema, "A", 20);
    let b = person(&schema, "B", 21);
    a.set_attribute("friend", Value::Object(b.clone())).unwrap();
    b.set_attribute("friend", Value::Object(a.clone())).unwrap();

    let field = Field::builder(FieldType::Object).schema(schema.clone()).build().unwrap();
    assert!(field.validate(&Value::Object(a.clone())).is_ok());

    b.set_attribute("age", Value::int(-5)).unwrap();
    let err = field.validate(&Value::Object(a)).unwrap_err();
    let ErrorKind::SchemaNotCorrectlyImplemented { field_errors, .. } = err.kind() else {
        panic!("unexpected error: {:?}", err);
    };
    assert_eq!(field_errors.keys().collect::<Vec<_>>(), vec!["friend"]);
}

// =============================================================================
// Assignment Event Tests
// =============================================================================

/// Observers see the assignment first and may replace the stored object.
#[test]
fn test_observer_substitutes_object() {
    let schema = person_schema();
    let replacement = person(&schema, "Replacement", 50);
    let seen = Arc::new(AtomicUsize::new(0));

    let dispatcher = Arc::new(Observers::new());
    {
        let seen = seen.clone();
        let replacement = replacement.clone();
        dispatcher.subscribe(move |event| {
            assert_eq!(event.name, "partner");
            seen.fetch_add(1, Ordering::SeqCst);
            event.object = Value::Object(replacement.clone());
        });
    }

    let field = Field::builder(FieldType::Object)
        .name("partner")
        .schema(schema.clone())
        .dispatcher(dispatcher)
        .build()
        .unwrap();
    let host = Instance::new().into_ref();
    field.set(&host, Value::Object(person(&schema, "Original", 30))).unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert_eq!(field.get(&host).unwrap(), Value::Object(replacement));
}

/// Read-only fields refuse assignment.
#[test]
fn test_readonly_field_refuses_set() {
    let field = Field::builder(FieldType::Int).name("id").readonly(true).build().unwrap();
    let host = Instance::new().with("id", 1).into_ref();
    let err = field.set(&host, Value::int(2)).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_READ_ONLY");
    assert_eq!(field.get(&host).unwrap(), Value::int(1));
}

// =============================================================================
// Loader Tests
// =============================================================================

/// Schema files on disk load with their fields and methods.
#[test]
fn test_loader_reads_schema_files() {
    let tmp = TempDir::new().unwrap();
    let document = json!({
        "name": "IDocument",
        "description": "A published document",
        "fields": [
            {"name": "title", "type": "TextLine", "max_length": 80},
            {"name": "slug", "type": "DottedName", "max_dots": 0},
            {"name": "tags", "type": "List", "unique": true,
             "value_type": {"type": "TextLine"}, "required": false},
            {"name": "state", "type": "Choice", "values": ["draft", "published"]}
        ],
        "methods": {"publish": "()"}
    });
    fs::write(tmp.path().join("document.json"), document.to_string()).unwrap();

    let mut loader = SchemaLoader::new(tmp.path());
    assert_eq!(loader.load_all().unwrap(), 1);
    let schema = loader.require("IDocument").unwrap();
    assert_eq!(schema.description(), Some("A published document"));
    assert!(schema.contains("publish"));

    let draft = Instance::providing(schema.clone())
        .with("title", "Hello")
        .with("slug", "hello")
        .with("tags", Value::list(["a", "a"]))
        .with("state", "archived")
        .into_ref();
    let mut failed: Vec<(String, &str)> = validation_errors(&schema, &draft)
        .into_iter()
        .map(|(name, err)| (name.unwrap(), err.code()))
        .collect();
    failed.sort();
    assert_eq!(
        failed,
        vec![
            ("state".to_string(), "FIELD_CONSTRAINT_NOT_SATISFIED"),
            ("tags".to_string(), "FIELD_NOT_UNIQUE"),
        ]
    );
}

/// A batch with one bad document registers nothing.
#[test]
fn test_loader_batch_is_atomic() {
    let tmp = TempDir::new().unwrap();
    let mut loader = SchemaLoader::new(tmp.path());
    let documents: Vec<SchemaDocument> = serde_json::from_value(json!([
        {"name": "IGood", "fields": [{"name": "x", "type": "Int"}]},
        {"name": "IBad", "extends": ["IMissing"], "fields": []}
    ]))
    .unwrap();
    let err = loader.register_documents(documents).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_UNKNOWN_SCHEMA");
    assert_eq!(loader.schema_count(), 0);
}

/// An empty schema directory loads nothing.
#[test]
fn test_loader_empty_directory() {
    let tmp = TempDir::new().unwrap();
    let mut loader = SchemaLoader::new(&tmp.path().join("absent"));
    assert_eq!(loader.load_all().unwrap(), 0);
    assert!(loader.names().is_empty());
}
