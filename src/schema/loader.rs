//! Schema loader for declarative schema definitions
//!
//! - One JSON document per schema, `<dir>/<name>.json`
//! - Fields are built through the same builders as code, so unknown or
//!   inapplicable arguments fail the load
//! - Registered schemas are immutable; a second schema with the same name
//!   is rejected
//!
//! Loading runs in two passes: schemas are created in base order first,
//! then their fields are defined. Object fields may therefore refer to any
//! schema in the same load, including their own.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;
use crate::field::{Field, FieldBuilder, FieldType};
use crate::observability::{log_event_with_fields, Event};
use crate::value::numeric::parse_decimal;
use crate::value::Value;

/// A schema as written on disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Names of base schemas
    #[serde(default)]
    pub extends: Vec<String>,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    /// Method name to signature
    #[serde(default)]
    pub methods: BTreeMap<String, String>,
}

/// Keyword arguments of one field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// Attribute name; absent for contained fields
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub readonly: Option<bool>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub missing_value: Option<serde_json::Value>,
    #[serde(default)]
    pub min: Option<serde_json::Value>,
    #[serde(default)]
    pub max: Option<serde_json::Value>,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub min_dots: Option<usize>,
    #[serde(default)]
    pub max_dots: Option<usize>,
    #[serde(default)]
    pub value_type: Option<Box<FieldConfig>>,
    #[serde(default)]
    pub key_type: Option<Box<FieldConfig>>,
    #[serde(default)]
    pub unique: Option<bool>,
    /// Name of the schema an object value must provide
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub validate_invariants: Option<bool>,
    #[serde(default)]
    pub values: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub vocabulary_name: Option<String>,
}

impl FieldConfig {
    /// A config with only the type set.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            name: None,
            field_type,
            title: None,
            description: None,
            required: None,
            readonly: None,
            default: None,
            missing_value: None,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            min_dots: None,
            max_dots: None,
            value_type: None,
            key_type: None,
            unique: None,
            schema: None,
            validate_invariants: None,
            values: None,
            vocabulary_name: None,
        }
    }

    /// Builds the field, resolving object schemas through `lookup`.
    fn build(&self, lookup: &dyn Fn(&str) -> Option<Arc<Schema>>) -> SchemaResult<Field> {
        let field_type = self.field_type;
        let mut builder = Field::builder(field_type);
        if let Some(title) = &self.title {
            builder = builder.title(title.as_str());
        }
        if let Some(description) = &self.description {
            builder = builder.description(description.as_str());
        }
        if let Some(required) = self.required {
            builder = builder.required(required);
        }
        if let Some(readonly) = self.readonly {
            builder = builder.readonly(readonly);
        }
        if let Some(missing_value) = &self.missing_value {
            builder = builder.missing_value(literal(field_type, missing_value)?);
        }
        if let Some(min) = &self.min {
            builder = builder.min(literal(field_type, min)?);
        }
        if let Some(max) = &self.max {
            builder = builder.max(literal(field_type, max)?);
        }
        if let Some(default) = &self.default {
            builder = builder.default(literal(field_type, default)?);
        }
        builder = self.apply_capabilities(builder, lookup)?;
        builder.build()
    }

    fn apply_capabilities(
        &self,
        mut builder: FieldBuilder,
        lookup: &dyn Fn(&str) -> Option<Arc<Schema>>,
    ) -> SchemaResult<FieldBuilder> {
        if let Some(min_length) = self.min_length {
            builder = builder.min_length(min_length);
        }
        if let Some(max_length) = self.max_length {
            builder = builder.max_length(max_length);
        }
        if let Some(min_dots) = self.min_dots {
            builder = builder.min_dots(min_dots);
        }
        if let Some(max_dots) = self.max_dots {
            builder = builder.max_dots(max_dots);
        }
        if let Some(value_type) = &self.value_type {
            builder = builder.value_type(value_type.build(lookup)?);
        }
        if let Some(key_type) = &self.key_type {
            builder = builder.key_type(key_type.build(lookup)?);
        }
        if let Some(unique) = self.unique {
            builder = builder.unique(unique);
        }
        if let Some(name) = &self.schema {
            let schema = lookup(name).ok_or_else(|| SchemaError::UnknownSchema { name: name.clone() })?;
            builder = builder.schema(schema);
        }
        if let Some(validate_invariants) = self.validate_invariants {
            builder = builder.validate_invariants(validate_invariants);
        }
        if let Some(values) = &self.values {
            builder = builder.values(values.iter().map(Value::from));
        }
        if let Some(name) = &self.vocabulary_name {
            builder = builder.vocabulary_name(name.as_str());
        }
        Ok(builder)
    }
}

/// Reads a JSON literal for a field of `field_type`. Temporal fields take
/// ISO 8601 strings and decimals may be given as strings to keep their
/// precision.
fn literal(field_type: FieldType, json: &serde_json::Value) -> SchemaResult<Value> {
    let Some(text) = json.as_str() else {
        return Ok(Value::from(json));
    };
    let invalid = |e: chrono::ParseError| SchemaError::invalid_argument(field_type.name(), e.to_string());
    let value = match field_type {
        FieldType::Date => Value::Date(NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(invalid)?),
        FieldType::Datetime => {
            Value::Datetime(NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").map_err(invalid)?)
        }
        FieldType::Time => Value::Time(NaiveTime::parse_from_str(text, "%H:%M:%S%.f").map_err(invalid)?),
        FieldType::Decimal => Value::Decimal(
            parse_decimal(text).map_err(|reason| SchemaError::invalid_argument(field_type.name(), reason))?,
        ),
        _ => Value::from(json),
    };
    Ok(value)
}

/// Loads declarative schemas from a directory and keeps them by name.
pub struct SchemaLoader {
    schema_dir: PathBuf,
    schemas: BTreeMap<String, Arc<Schema>>,
}

impl SchemaLoader {
    /// Creates a loader reading `*.json` files from `schema_dir`.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: BTreeMap::new(),
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every schema file in the directory and returns how many were
    /// loaded. A missing directory loads nothing.
    ///
    /// # Errors
    ///
    /// `SchemaError::MalformedDefinition` for unreadable or invalid files;
    /// any error from registering the documents.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        if !self.schema_dir.exists() {
            return Ok(0);
        }
        let malformed = |path: &Path, reason: String| SchemaError::MalformedDefinition {
            path: path.display().to_string(),
            reason,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.schema_dir)
            .map_err(|e| malformed(self.schema_dir.as_path(), format!("failed to read directory: {}", e)))?
        {
            let path = entry
                .map_err(|e| malformed(self.schema_dir.as_path(), format!("failed to read directory entry: {}", e)))?
                .path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in &paths {
            let content =
                fs::read_to_string(path).map_err(|e| malformed(path.as_path(), format!("failed to read file: {}", e)))?;
            let document: SchemaDocument =
                serde_json::from_str(&content).map_err(|e| malformed(path.as_path(), format!("invalid JSON: {}", e)))?;
            documents.push(document);
        }

        let count = self.register_documents(documents)?.len();
        log_event_with_fields(
            Event::SchemasLoaded,
            &[
                ("count", &count.to_string()),
                ("dir", &self.schema_dir.display().to_string()),
            ],
        );
        Ok(count)
    }

    /// Registers one document.
    pub fn register_document(&mut self, document: SchemaDocument) -> SchemaResult<Arc<Schema>> {
        let mut schemas = self.register_documents(vec![document])?;
        schemas
            .pop()
            .ok_or_else(|| SchemaError::invalid_argument("document", "no schema was registered"))
    }

    /// Registers documents that may extend or refer to each other. Nothing
    /// is registered when any document fails.
    pub fn register_documents(&mut self, documents: Vec<SchemaDocument>) -> SchemaResult<Vec<Arc<Schema>>> {
        let mut pending = HashSet::new();
        for document in &documents {
            if self.schemas.contains_key(&document.name) || !pending.insert(document.name.as_str()) {
                return Err(SchemaError::SchemaImmutable {
                    name: document.name.clone(),
                });
            }
        }

        // Pass 1: create schemas once their bases exist.
        let mut created: BTreeMap<String, Arc<Schema>> = BTreeMap::new();
        while created.len() < documents.len() {
            let ready = documents.iter().find(|d| {
                !created.contains_key(&d.name)
                    && d.extends
                        .iter()
                        .all(|base| created.contains_key(base) || self.schemas.contains_key(base))
            });
            let Some(document) = ready else {
                return Err(self.unresolved_bases(&documents, &created));
            };
            let mut builder = Schema::builder(document.name.as_str());
            if let Some(description) = &document.description {
                builder = builder.description(description.as_str());
            }
            for base in &document.extends {
                let schema = created.get(base).or_else(|| self.schemas.get(base)).cloned();
                if let Some(schema) = schema {
                    builder = builder.extends(schema);
                }
            }
            created.insert(document.name.clone(), builder.build());
        }

        // Pass 2: members.
        let lookup = |name: &str| created.get(name).or_else(|| self.schemas.get(name)).cloned();
        for document in &documents {
            let Some(schema) = created.get(&document.name) else {
                continue;
            };
            for config in &document.fields {
                let name = config.name.as_deref().ok_or_else(|| SchemaError::MalformedDefinition {
                    path: document.name.clone(),
                    reason: format!("{} field without a name", config.field_type),
                })?;
                schema.define_field(name, config.build(&lookup)?);
            }
            for (name, signature) in &document.methods {
                schema.define_method(name, signature.as_str());
            }
        }

        let mut registered = Vec::with_capacity(documents.len());
        for document in &documents {
            if let Some(schema) = created.remove(&document.name) {
                log_event_with_fields(
                    Event::SchemaLoaded,
                    &[("schema", schema.name()), ("fields", &document.fields.len().to_string())],
                );
                self.schemas.insert(document.name.clone(), Arc::clone(&schema));
                registered.push(schema);
            }
        }
        Ok(registered)
    }

    fn unresolved_bases(&self, documents: &[SchemaDocument], created: &BTreeMap<String, Arc<Schema>>) -> SchemaError {
        let known = |name: &str| {
            created.contains_key(name) || self.schemas.contains_key(name) || documents.iter().any(|d| d.name == name)
        };
        for document in documents.iter().filter(|d| !created.contains_key(&d.name)) {
            if let Some(base) = document.extends.iter().find(|base| !known(base.as_str())) {
                return SchemaError::UnknownSchema { name: base.clone() };
            }
        }
        let stuck: Vec<&str> = documents
            .iter()
            .filter(|d| !created.contains_key(&d.name))
            .map(|d| d.name.as_str())
            .collect();
        SchemaError::MalformedDefinition {
            path: stuck.join(", "),
            reason: "schemas extend each other in a cycle".to_string(),
        }
    }

    /// Registers a schema built in code.
    pub fn register(&mut self, schema: Arc<Schema>) -> SchemaResult<()> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::SchemaImmutable {
                name: schema.name().to_string(),
            });
        }
        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    /// Like `get`, but a missing schema is an error.
    pub fn require(&self, name: &str) -> SchemaResult<Arc<Schema>> {
        self.schemas
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownSchema { name: name.to_string() })
    }

    pub fn exists(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Instance;
    use serde_json::json;
    use tempfile::TempDir;

    fn person_document() -> SchemaDocument {
        serde_json::from_value(json!({
            "name": "IPerson",
            "fields": [
                {"name": "name", "type": "TextLine", "max_length": 20},
                {"name": "age", "type": "Int", "min": 0, "required": false},
                {"name": "friends", "type": "List", "required": false,
                 "value_type": {"type": "Object", "schema": "IPerson"}}
            ],
            "methods": {"greet": "(other)"}
        }))
        .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        let schema = loader.register_document(person_document()).unwrap();

        assert!(loader.exists("IPerson"));
        assert!(Arc::ptr_eq(loader.get("IPerson").unwrap(), &schema));
        assert_eq!(schema.names(), vec!["name", "age", "friends", "greet"]);
        let age = schema.get("age").and_then(|m| m.as_field().cloned()).unwrap();
        assert_eq!(age.min(), Some(&Value::int(0)));
        assert_eq!(age.interface(), Some("IPerson"));
    }

    #[test]
    fn test_schema_immutability() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        loader.register_document(person_document()).unwrap();

        let err = loader.register_document(person_document()).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_IMMUTABLE");
    }

    #[test]
    fn test_load_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let text = serde_json::to_string(&json!({
            "name": "IPerson",
            "fields": [
                {"name": "name", "type": "TextLine", "max_length": 20},
                {"name": "age", "type": "Int", "min": 0, "required": false}
            ]
        }))
        .unwrap();
        fs::write(temp_dir.path().join("person.json"), text).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader.load_all().unwrap(), 1);
        let schema = loader.require("IPerson").unwrap();

        let alice = Instance::providing(schema.clone())
            .with("name", "Alice")
            .with("age", 30)
            .into_ref();
        assert!(crate::schema::validation_errors(&schema, &alice).is_empty());
    }

    #[test]
    fn test_unknown_argument_is_rejected() {
        let bad = json!({"name": "IBad", "fields": [{"name": "x", "type": "Int", "colour": "red"}]});
        assert!(serde_json::from_value::<SchemaDocument>(bad).is_err());

        let inapplicable: SchemaDocument = serde_json::from_value(json!({
            "name": "IBad",
            "fields": [{"name": "x", "type": "Text", "min": 1}]
        }))
        .unwrap();
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.register_document(inapplicable).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_UNEXPECTED_ARGUMENT");
        assert!(!loader.exists("IBad"));
    }

    #[test]
    fn test_bases_resolve_in_any_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        let documents: Vec<SchemaDocument> = serde_json::from_value(json!([
            {"name": "IEmployee", "extends": ["IPerson"],
             "fields": [{"name": "salary", "type": "Decimal", "required": false}]},
            {"name": "IPerson", "fields": [{"name": "born", "type": "Date", "min": "1900-01-01"}]}
        ]))
        .unwrap();
        let schemas = loader.register_documents(documents).unwrap();
        assert_eq!(schemas.len(), 2);

        let employee = loader.require("IEmployee").unwrap();
        let person = loader.require("IPerson").unwrap();
        assert!(employee.extends(&person));
        assert_eq!(employee.names(), vec!["salary", "born"]);
    }

    #[test]
    fn test_unknown_base() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        let document: SchemaDocument = serde_json::from_value(json!({"name": "IChild", "extends": ["IMissing"]})).unwrap();
        let err = loader.register_document(document).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(&temp_dir.path().join("absent"));
        assert_eq!(loader.load_all().unwrap(), 0);
        assert_eq!(loader.schema_count(), 0);
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.json"), "{ not json").unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code(), "SCHEMA_MALFORMED_DEFINITION");
    }
}
