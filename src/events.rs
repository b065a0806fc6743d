//! Assignment events
//!
//! Object fields announce an assignment before storing the value. Observers
//! receive the event mutably and may substitute the object being assigned.

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::schema::HostRef;
use crate::value::Value;

/// Sent before an object field stores a value on its host.
#[derive(Debug, Clone)]
pub struct BeforeObjectAssigned {
    /// The object about to be stored; observers may replace it
    pub object: Value,
    /// Name of the field being assigned
    pub name: String,
    /// The host receiving the value
    pub target: HostRef,
}

impl BeforeObjectAssigned {
    pub fn new(object: Value, name: impl Into<String>, target: HostRef) -> Self {
        Self {
            object,
            name: name.into(),
            target,
        }
    }
}

/// Delivers assignment events to whoever is interested.
pub trait EventDispatcher: Send + Sync {
    fn notify(&self, event: &mut BeforeObjectAssigned);
}

type Observer = Arc<dyn Fn(&mut BeforeObjectAssigned) + Send + Sync>;

/// An ordered list of observers; also the process-wide default dispatcher.
#[derive(Default)]
pub struct Observers {
    observers: RwLock<Vec<Observer>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an observer. Observers run in subscription order.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&mut BeforeObjectAssigned) + Send + Sync + 'static,
    {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    /// Removes every observer.
    pub fn clear(&self) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventDispatcher for Observers {
    fn notify(&self, event: &mut BeforeObjectAssigned) {
        // Observers may subscribe from inside a callback.
        let snapshot: Vec<Observer> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in snapshot {
            observer(event);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers").field("len", &self.len()).finish()
    }
}

/// Process-wide observers used by object fields without a dispatcher of
/// their own.
pub fn observers() -> &'static Observers {
    static GLOBAL: OnceLock<Observers> = OnceLock::new();
    GLOBAL.get_or_init(Observers::new)
}
