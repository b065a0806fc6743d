//! Vocabulary Invariant Tests
//!
//! Tests for vocabularies and the choice fields drawing on them:
//! - Values and tokens are unique within a vocabulary
//! - Tree paths lead from a root down to the value
//! - Choices resolve fixed, named and context-bound sources

use std::sync::Arc;

use schemafields::vocabulary::{SourceBinder, TermNode, TreeItem, VocabularyRegistry};
use schemafields::{
    Field, FieldType, Host, Instance, SimpleTerm, SimpleVocabulary, Source, TreeVocabulary, Value, Vocabulary,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn regions() -> TreeVocabulary {
    TreeVocabulary::from_dict(vec![
        TreeItem::new("eu", "Europe").children([
            TreeItem::new("de", "Germany").child(TreeItem::new("be", "Berlin")),
            TreeItem::new("fr", "France").child(TreeItem::new("pa", "Paris").titled("Capital")),
        ]),
        TreeItem::new("as", "Asia").child(TreeItem::new("jp", "Japan")),
    ])
    .unwrap()
}

fn allowed_values() -> SourceBinder {
    SourceBinder::new(|host| {
        let allowed = host.attribute("allowed").and_then(|value| value.elements()).unwrap_or_default();
        Arc::new(SimpleVocabulary::from_values(allowed).unwrap()) as Arc<dyn Source>
    })
}

fn walk<'a>(nodes: &'a [TermNode], parent: Option<&'a Value>, out: &mut Vec<(&'a Value, Option<&'a Value>)>) {
    for node in nodes {
        out.push((node.term.value(), parent));
        walk(&node.children, Some(node.term.value()), out);
    }
}

// =============================================================================
// Simple Vocabulary Tests
// =============================================================================

/// Lookups by value and by token find the same term.
#[test]
fn test_value_and_token_lookup_agree() {
    let vocab = SimpleVocabulary::from_items([("one", 1), ("two", 2), ("caf\u{e9}", 3)]).unwrap();
    for term in vocab.terms() {
        let by_value = vocab.get_term(term.value()).unwrap();
        let by_token = vocab.get_term_by_token(term.token()).unwrap();
        assert_eq!(by_value, by_token);
    }
    assert!(vocab.get_term_by_token("caf\\xe9").is_ok());
    assert_eq!(vocab.get_term(&Value::int(4)).unwrap_err().code(), "SCHEMA_TERM_NOT_FOUND");
    assert_eq!(vocab.get_term_by_token("four").unwrap_err().code(), "SCHEMA_TOKEN_NOT_FOUND");
}

/// Repeated values or tokens are refused unless duplicates are swallowed.
#[test]
fn test_duplicates() {
    assert_eq!(
        SimpleVocabulary::from_values([1, 2, 1]).unwrap_err().code(),
        "SCHEMA_DUPLICATE_TERM"
    );
    assert_eq!(
        SimpleVocabulary::from_items([("a", 1), ("a", 2)]).unwrap_err().code(),
        "SCHEMA_DUPLICATE_TERM"
    );

    let vocab = SimpleVocabulary::swallow_duplicates(vec![
        SimpleTerm::with_token(1, "first").titled("First"),
        SimpleTerm::with_token(1, "second").titled("Second"),
    ]);
    assert_eq!(vocab.len(), 2);
    assert_eq!(vocab.get_term(&Value::int(1)).unwrap().token(), "second");
}

// =============================================================================
// Tree Vocabulary Tests
// =============================================================================

/// Every path starts at a root, ends at the value and walks parent to
/// child.
#[test]
fn test_tree_paths() {
    let tree = regions();
    let mut nodes = Vec::new();
    walk(tree.roots(), None, &mut nodes);
    assert_eq!(nodes.len(), 7);

    let roots: Vec<&Value> = tree.roots().iter().map(|node| node.term.value()).collect();
    for (value, parent) in nodes {
        let path = tree.get_term_path(value);
        assert_eq!(path.last(), Some(value));
        assert!(roots.contains(&&path[0]));
        match parent {
            Some(parent) => {
                assert_eq!(&path[path.len() - 2], parent);
                assert_eq!(tree.get_term_path(parent), path[..path.len() - 1].to_vec());
            }
            None => assert_eq!(path.len(), 1),
        }
    }
    assert!(tree.get_term_path(&Value::from("Atlantis")).is_empty());
}

/// Siblings are ordered by token and every node is reachable by value or
/// token.
#[test]
fn test_tree_lookup() {
    let tree = regions();
    let tokens: Vec<&str> = tree.roots().iter().map(|node| node.term.token()).collect();
    assert_eq!(tokens, vec!["as", "eu"]);
    assert_eq!(tree.len(), 2);

    assert!(tree.contains(&Value::from("Paris")));
    let paris = tree.get_term_by_token("pa").unwrap();
    assert_eq!(paris.title(), Some("Capital"));
    assert_eq!(
        tree.get_term_path(paris.value()),
        vec![Value::from("Europe"), Value::from("France"), Value::from("Paris")]
    );
}

/// Values and tokens are unique across the whole tree, not just among
/// siblings.
#[test]
fn test_tree_rejects_duplicates_across_levels() {
    let err = TreeVocabulary::from_dict(vec![
        TreeItem::new("a", 1).child(TreeItem::new("b", 2)),
        TreeItem::new("c", 3).child(TreeItem::new("d", 2)),
    ])
    .unwrap_err();
    assert_eq!(err.code(), "SCHEMA_DUPLICATE_TERM");

    let err = TreeVocabulary::from_dict(vec![TreeItem::new("a", 1).child(TreeItem::new("a", 2))]).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_DUPLICATE_TERM");
}

// =============================================================================
// Choice Source Tests
// =============================================================================

/// A tree vocabulary works as a choice source at every level.
#[test]
fn test_choice_over_tree() {
    let field = Field::builder(FieldType::Choice).vocabulary(Arc::new(regions())).build().unwrap();
    assert!(field.validate(&Value::from("Europe")).is_ok());
    assert!(field.validate(&Value::from("Berlin")).is_ok());
    assert_eq!(
        field.validate(&Value::from("Atlantis")).unwrap_err().code(),
        "FIELD_CONSTRAINT_NOT_SATISFIED"
    );
}

/// Named vocabularies are looked up in the registry given to the field.
#[test]
fn test_named_vocabulary() {
    let registry = Arc::new(VocabularyRegistry::new());
    let field = Field::builder(FieldType::Choice)
        .vocabulary_name("colors")
        .registry(registry.clone())
        .default("red")
        .build()
        .unwrap();

    let err = field.validate(&Value::from("red")).unwrap_err();
    assert_eq!(err.code(), "FIELD_MISSING_VOCABULARY");

    registry.register_source("colors", Arc::new(SimpleVocabulary::from_values(["red", "green"]).unwrap()));
    assert!(field.validate(&Value::from("red")).is_ok());
    assert_eq!(
        field.validate(&Value::from("blue")).unwrap_err().code(),
        "FIELD_CONSTRAINT_NOT_SATISFIED"
    );
}

/// A binder builds the vocabulary from the object the field is bound to.
#[test]
fn test_context_bound_source() {
    let field = Field::builder(FieldType::Choice)
        .name("favorite")
        .source(allowed_values())
        .build()
        .unwrap();

    let host = Instance::new().with("allowed", Value::list(["tea", "coffee"])).into_ref();
    let bound = field.bind(&host).unwrap();
    assert!(bound.validate(&Value::from("tea")).is_ok());
    assert!(bound.validate(&Value::from("juice")).is_err());

    host.set_attribute("allowed", Value::list(["juice"])).unwrap();
    let rebound = field.bind(&host).unwrap();
    assert!(rebound.validate(&Value::from("juice")).is_ok());
}

/// Before binding there is no object to build the vocabulary from.
#[test]
fn test_unbound_source_is_missing_vocabulary() {
    let field = Field::builder(FieldType::Choice).source(allowed_values()).build().unwrap();
    let err = field.validate(&Value::from("tea")).unwrap_err();
    assert_eq!(err.code(), "FIELD_MISSING_VOCABULARY");
    assert!(err.args().is_empty());
}

/// Choice fields built from the same binder are equal; fields built from
/// different binders are not.
#[test]
fn test_same_binder_same_field() {
    let binder = allowed_values();
    let a = Field::builder(FieldType::Choice).title("Drink").source(binder.clone()).build().unwrap();
    let b = Field::builder(FieldType::Choice).title("Drink").source(binder).build().unwrap();
    assert_eq!(a, b);

    let c = Field::builder(FieldType::Choice).title("Drink").source(allowed_values()).build().unwrap();
    assert_ne!(a, c);
}
