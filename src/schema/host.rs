//! Host objects
//!
//! A host is anything a schema's fields can be read from and written to:
//! it declares which schemas it provides and exposes named attributes.
//! Hosts are shared through `HostRef` and compared by identity.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::errors::SchemaResult;
use super::types::Schema;
use crate::value::Value;

/// An object whose attributes are described by schemas.
pub trait Host: Send + Sync + fmt::Debug {
    /// Whether this object declares that it provides `schema`
    fn provides(&self, schema: &Schema) -> bool;

    /// Reads an attribute; `None` when the attribute does not exist
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Writes an attribute
    fn set_attribute(&self, name: &str, value: Value) -> SchemaResult<()>;
}

/// Shared handle to a host object
pub type HostRef = Arc<dyn Host>;

/// Identity of a host, stable while the host is alive.
pub fn identity(host: &HostRef) -> usize {
    Arc::as_ptr(host) as *const () as usize
}

/// A dynamic host object with attributes held in memory.
///
/// ```ignore
/// let person = Instance::providing(person_schema)
///     .with("name", "Alice")
///     .into_ref();
/// ```
#[derive(Default)]
pub struct Instance {
    provided: Vec<Arc<Schema>>,
    attributes: RwLock<BTreeMap<String, Value>>,
}

impl Instance {
    /// Creates an object that provides no schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an object providing `schema`.
    pub fn providing(schema: Arc<Schema>) -> Self {
        Self::new().provide(schema)
    }

    /// Declares that the object provides another schema.
    pub fn provide(mut self, schema: Arc<Schema>) -> Self {
        self.provided.push(schema);
        self
    }

    /// Sets an attribute while building the object.
    pub fn with(self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value.into());
        self
    }

    /// Wraps the object in a shared handle.
    pub fn into_ref(self) -> HostRef {
        Arc::new(self)
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Names of the attributes currently set
    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl Host for Instance {
    fn provides(&self, schema: &Schema) -> bool {
        self.provided.iter().any(|p| p.is_or_extends(schema))
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn set_attribute(&self, name: &str, value: Value) -> SchemaResult<()> {
        self.attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
        Ok(())
    }
}

// Attribute values may point back at this object, so only names are shown.
impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field(
                "provides",
                &self.provided.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("attributes", &self.attribute_names())
            .finish()
    }
}
