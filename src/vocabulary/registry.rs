//! Named vocabulary registry
//!
//! Choice fields may refer to a vocabulary by name. The name is resolved
//! through a registry of factories, each producing a vocabulary for a
//! context. A process-wide registry is created on first use and can be
//! replaced wholesale.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::Source;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{HostRef, SchemaError, SchemaResult};

/// Builds a vocabulary for an optional context
pub type VocabularyFactory = Arc<dyn Fn(Option<&HostRef>) -> Arc<dyn Source> + Send + Sync>;

/// Maps vocabulary names to factories.
#[derive(Default)]
pub struct VocabularyRegistry {
    factories: RwLock<HashMap<String, VocabularyFactory>>,
}

impl VocabularyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`, replacing any previous one.
    pub fn register<F>(&self, name: &str, factory: F)
    where
        F: Fn(Option<&HostRef>) -> Arc<dyn Source> + Send + Sync + 'static,
    {
        self.factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::new(factory));
        log_event_with_fields(Event::VocabularyRegistered, &[("name", name)]);
    }

    /// Registers a fixed vocabulary that ignores the context.
    pub fn register_source(&self, name: &str, source: Arc<dyn Source>) {
        self.register(name, move |_| Arc::clone(&source));
    }

    /// Builds the vocabulary registered as `name` for `context`.
    ///
    /// # Errors
    ///
    /// `SchemaError::UnknownVocabulary` when nothing is registered under
    /// that name.
    pub fn get(&self, context: Option<&HostRef>, name: &str) -> SchemaResult<Arc<dyn Source>> {
        // Factories run outside the lock; they may consult the registry.
        let factory = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownVocabulary {
                name: name.to_string(),
            })?;
        Ok(factory(context))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl fmt::Debug for VocabularyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VocabularyRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn global() -> &'static RwLock<Arc<VocabularyRegistry>> {
    static REGISTRY: OnceLock<RwLock<Arc<VocabularyRegistry>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Arc::new(VocabularyRegistry::new())))
}

/// Returns the process-wide registry, creating an empty one on first use.
pub fn get_registry() -> Arc<VocabularyRegistry> {
    Arc::clone(&global().read().unwrap_or_else(PoisonError::into_inner))
}

/// Replaces the process-wide registry and returns the previous one.
pub fn set_registry(registry: Arc<VocabularyRegistry>) -> Arc<VocabularyRegistry> {
    let mut slot = global().write().unwrap_or_else(PoisonError::into_inner);
    let previous = std::mem::replace(&mut *slot, registry);
    log_event_with_fields(
        Event::VocabularyRegistryReplaced,
        &[("names", &slot.names().join(","))],
    );
    previous
}
