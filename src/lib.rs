//! schemafields - declarative schema fields, vocabularies and object-graph
//! validation
//!
//! Fields are typed validating descriptors. Schemas group fields, methods
//! and invariants into named contracts that host objects implement.
//! Choice fields draw their values from vocabularies, which may be fixed,
//! named in a registry or computed from the bound object.
//!
//! ```ignore
//! use schemafields::{Field, FieldType, Instance, Schema, Value};
//!
//! let person = Schema::builder("IPerson")
//!     .field("name", Field::builder(FieldType::TextLine).max_length(40).build()?)
//!     .field("age", Field::builder(FieldType::Int).min(0).required(false).build()?)
//!     .build();
//!
//! let alice = Instance::providing(person.clone())
//!     .with("name", "Alice")
//!     .with("age", 30)
//!     .into_ref();
//! assert!(schemafields::schema::validation_errors(&person, &alice).is_empty());
//! ```

pub mod events;
pub mod field;
pub mod observability;
pub mod schema;
pub mod value;
pub mod vocabulary;

pub use events::{observers, BeforeObjectAssigned, EventDispatcher, Observers};
pub use field::{
    Constraint, DefaultFactory, ErrorKind, Field, FieldBuilder, FieldType, FromUnicode, ValidationError,
    ValidationResult, Verdict, UNCHANGED_PASSWORD,
};
pub use schema::{Host, HostRef, Instance, Schema, SchemaError, SchemaResult};
pub use value::{Decimal, Value, ValueKind};
pub use vocabulary::{get_registry, set_registry, SimpleTerm, SimpleVocabulary, Source, TreeVocabulary, Vocabulary};
