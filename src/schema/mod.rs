//! Schemas: named contracts over host objects
//!
//! A schema declares fields (validated attributes), methods and invariants,
//! and may extend other schemas. Objects implementing schemas are `Host`s.
//!
//! # Design Principles
//!
//! - Members may be declared after construction, so schemas can refer to
//!   themselves and to each other
//! - Lookups search the schema itself before its bases
//! - Field and invariant failures are collected, never short-circuited
//! - Registered schemas are immutable by name

mod errors;
mod host;
mod introspection;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use host::{identity, Host, HostRef, Instance};
pub use introspection::{
    fields_in_order, fields_of, names_in_order, names_of, schema_validation_errors, validation_errors,
};
pub use loader::{FieldConfig, SchemaDocument, SchemaLoader};
pub use types::{Invariant, Member, Schema, SchemaBuilder};
