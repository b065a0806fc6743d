//! Vocabularies: permitted values for choice fields
//!
//! A `Source` answers membership only. A `Vocabulary` is a source whose
//! terms can be listed and looked up by value or by token.
//!
//! - `SimpleVocabulary`: flat, ordered terms
//! - `TreeVocabulary`: nested terms with path lookup
//! - `VocabularyRegistry`: named vocabulary factories

mod registry;
mod simple;
mod term;
mod tree;

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use registry::{get_registry, set_registry, VocabularyFactory, VocabularyRegistry};
pub use simple::SimpleVocabulary;
pub use term::{derive_token, escape_non_ascii, SimpleTerm};
pub use tree::{TermNode, TreeItem, TreeVocabulary};

use crate::schema::{HostRef, SchemaResult};
use crate::value::Value;

/// Anything that can tell whether a value is permitted.
pub trait Source: Send + Sync + fmt::Debug {
    fn contains(&self, value: &Value) -> bool;

    /// The full vocabulary behind this source, when there is one
    fn as_vocabulary(&self) -> Option<&dyn Vocabulary> {
        None
    }
}

/// A source whose terms can be enumerated and looked up.
pub trait Vocabulary: Source {
    /// Number of terms (top-level terms for trees)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Terms in construction order
    fn terms(&self) -> Vec<&SimpleTerm>;

    /// Fails with `SchemaError::TermNotFound`.
    fn get_term(&self, value: &Value) -> SchemaResult<&SimpleTerm>;

    /// Fails with `SchemaError::TokenNotFound`.
    fn get_term_by_token(&self, token: &str) -> SchemaResult<&SimpleTerm>;
}

/// Produces the source for the object a choice field is bound to.
///
/// Clones share identity: choice fields built from clones of one binder are
/// equal, fields built from separately created binders are not.
#[derive(Clone)]
pub struct SourceBinder {
    produce: Arc<dyn Fn(&HostRef) -> Arc<dyn Source> + Send + Sync>,
}

impl SourceBinder {
    pub fn new<F>(produce: F) -> Self
    where
        F: Fn(&HostRef) -> Arc<dyn Source> + Send + Sync + 'static,
    {
        Self {
            produce: Arc::new(produce),
        }
    }

    /// The source for `context`
    pub fn bind(&self, context: &HostRef) -> Arc<dyn Source> {
        (self.produce)(context)
    }
}

impl PartialEq for SourceBinder {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.produce, &other.produce)
    }
}

impl fmt::Debug for SourceBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SourceBinder(..)")
    }
}

/// A source defined by a predicate.
pub struct PredicateSource {
    name: String,
    predicate: Box<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl PredicateSource {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }
}

impl Source for PredicateSource {
    fn contains(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for PredicateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateSource").field("name", &self.name).finish()
    }
}

/// Term positions bucketed by value hash. Equal values hash alike, so a
/// lookup compares only the values sharing a bucket.
#[derive(Debug, Clone, Default)]
pub(crate) struct ValueIndex {
    buckets: HashMap<u64, Vec<usize>>,
}

impl ValueIndex {
    pub(crate) fn insert(&mut self, value: &Value, position: usize) {
        self.buckets.entry(hash_of(value)).or_default().push(position);
    }

    /// Latest indexed position in `terms` whose value equals `value`.
    pub(crate) fn find(&self, value: &Value, terms: &[SimpleTerm]) -> Option<usize> {
        self.buckets
            .get(&hash_of(value))?
            .iter()
            .rev()
            .copied()
            .find(|&position| terms[position].value() == value)
    }
}

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Two sources are interchangeable when they are the same object or list
/// the same terms.
pub(crate) fn same_source(a: &Arc<dyn Source>, b: &Arc<dyn Source>) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }
    match (a.as_vocabulary(), b.as_vocabulary()) {
        (Some(x), Some(y)) => x.terms() == y.terms(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_source() {
        let even = PredicateSource::new("even", |v| v.as_i64().is_some_and(|i| i % 2 == 0));
        assert!(even.contains(&Value::int(4)));
        assert!(!even.contains(&Value::int(3)));
        assert!(even.as_vocabulary().is_none());
    }

    #[test]
    fn test_value_index_finds_equal_numbers() {
        let terms = vec![SimpleTerm::new(1), SimpleTerm::new("a"), SimpleTerm::with_token(1.0, "again")];
        let mut index = ValueIndex::default();
        for (position, term) in terms.iter().enumerate() {
            index.insert(term.value(), position);
        }
        assert_eq!(index.find(&Value::int(1), &terms), Some(2));
        assert_eq!(index.find(&Value::from("a"), &terms), Some(1));
        assert_eq!(index.find(&Value::from("b"), &terms), None);
    }

    #[test]
    fn test_binder_identity_follows_clones() {
        let binder = SourceBinder::new(|_| Arc::new(PredicateSource::new("any", |_| true)) as Arc<dyn Source>);
        let twin = SourceBinder::new(|_| Arc::new(PredicateSource::new("any", |_| true)) as Arc<dyn Source>);
        assert_eq!(binder, binder.clone());
        assert_ne!(binder, twin);
    }

    #[test]
    fn test_same_source_compares_terms() {
        let a: Arc<dyn Source> = Arc::new(SimpleVocabulary::from_values([1, 2]).unwrap());
        let b: Arc<dyn Source> = Arc::new(SimpleVocabulary::from_values([1, 2]).unwrap());
        let c: Arc<dyn Source> = Arc::new(SimpleVocabulary::from_values([2, 1]).unwrap());
        assert!(same_source(&a, &b));
        assert!(!same_source(&a, &c));
    }
}
