//! Tree vocabularies
//!
//! Terms nest: every term may have child terms. Lookups by value and by
//! token cover the whole tree, and each value knows the path of ancestor
//! values leading to it.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::term::SimpleTerm;
use super::{Source, ValueIndex, Vocabulary};
use crate::schema::{SchemaError, SchemaResult};
use crate::value::Value;

/// Input node for [`TreeVocabulary::from_dict`]: a `(token, value[, title])`
/// key and its children.
#[derive(Debug, Clone)]
pub struct TreeItem {
    token: String,
    value: Value,
    title: Option<String>,
    children: Vec<TreeItem>,
}

impl TreeItem {
    pub fn new(token: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            token: token.into(),
            value: value.into(),
            title: None,
            children: Vec::new(),
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn child(mut self, child: TreeItem) -> Self {
        self.children.push(child);
        self
    }

    pub fn children<I: IntoIterator<Item = TreeItem>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }

    fn key_cmp(&self, other: &TreeItem) -> Ordering {
        self.token
            .cmp(&other.token)
            .then_with(|| self.value.partial_cmp(&other.value).unwrap_or(Ordering::Equal))
            .then_with(|| self.title.cmp(&other.title))
    }
}

/// A term and its subtree
#[derive(Debug, Clone, PartialEq)]
pub struct TermNode {
    pub term: SimpleTerm,
    pub children: Vec<TermNode>,
}

/// A vocabulary of nested terms.
#[derive(Debug, Clone)]
pub struct TreeVocabulary {
    roots: Vec<TermNode>,
    /// Every term in the tree, children before their parent
    flat: Vec<SimpleTerm>,
    /// Path of each term in `flat`, root first
    paths: Vec<Vec<Value>>,
    by_value: ValueIndex,
    by_token: HashMap<String, usize>,
}

impl TreeVocabulary {
    /// Builds a tree from nested items. Siblings are ordered by their
    /// `(token, value, title)` key. Values and tokens must be unique across
    /// the whole tree.
    pub fn from_dict(items: Vec<TreeItem>) -> SchemaResult<Self> {
        Self::new(build_nodes(items))
    }

    /// Builds a tree from already constructed nodes, keeping their order.
    pub fn new(roots: Vec<TermNode>) -> SchemaResult<Self> {
        let mut vocab = Self {
            roots,
            flat: Vec::new(),
            paths: Vec::new(),
            by_value: ValueIndex::default(),
            by_token: HashMap::new(),
        };
        let roots = vocab.roots.clone();
        vocab.index(&roots, &[])?;
        Ok(vocab)
    }

    // Children are indexed before their parent.
    fn index(&mut self, nodes: &[TermNode], ancestors: &[Value]) -> SchemaResult<()> {
        for node in nodes {
            let mut path = ancestors.to_vec();
            path.push(node.term.value().clone());
            self.index(&node.children, &path)?;

            let term = &node.term;
            if self.by_value.find(term.value(), &self.flat).is_some() {
                return Err(SchemaError::DuplicateTerm {
                    what: "value",
                    repr: term.value().repr(),
                });
            }
            if self.by_token.contains_key(term.token()) {
                return Err(SchemaError::DuplicateTerm {
                    what: "token",
                    repr: format!("'{}'", term.token()),
                });
            }
            let position = self.flat.len();
            self.by_value.insert(term.value(), position);
            self.by_token.insert(term.token().to_string(), position);
            self.flat.push(term.clone());
            self.paths.push(path);
        }
        Ok(())
    }

    /// Ancestor values of `value`, root first and ending with `value`
    /// itself; empty when the value is not in the tree.
    pub fn get_term_path(&self, value: &Value) -> Vec<Value> {
        self.position(value)
            .map(|position| self.paths[position].clone())
            .unwrap_or_default()
    }

    /// Top-level node for `term`
    pub fn get(&self, term: &SimpleTerm) -> Option<&TermNode> {
        self.roots.iter().find(|node| &node.term == term)
    }

    /// Top-level terms
    pub fn keys(&self) -> Vec<&SimpleTerm> {
        self.roots.iter().map(|node| &node.term).collect()
    }

    /// Direct children of the top-level `term`
    pub fn children(&self, term: &SimpleTerm) -> Option<&[TermNode]> {
        self.get(term).map(|node| node.children.as_slice())
    }

    pub fn roots(&self) -> &[TermNode] {
        &self.roots
    }

    fn position(&self, value: &Value) -> Option<usize> {
        self.by_value.find(value, &self.flat)
    }
}

fn build_nodes(mut items: Vec<TreeItem>) -> Vec<TermNode> {
    items.sort_by(TreeItem::key_cmp);
    items
        .into_iter()
        .map(|item| {
            let mut term = SimpleTerm::with_token(item.value, &item.token);
            if let Some(title) = item.title {
                term = term.titled(title);
            }
            TermNode {
                term,
                children: build_nodes(item.children),
            }
        })
        .collect()
}

impl Source for TreeVocabulary {
    fn contains(&self, value: &Value) -> bool {
        self.position(value).is_some()
    }

    fn as_vocabulary(&self) -> Option<&dyn Vocabulary> {
        Some(self)
    }
}

impl Vocabulary for TreeVocabulary {
    fn len(&self) -> usize {
        self.roots.len()
    }

    fn terms(&self) -> Vec<&SimpleTerm> {
        self.keys()
    }

    fn get_term(&self, value: &Value) -> SchemaResult<&SimpleTerm> {
        self.position(value)
            .map(|position| &self.flat[position])
            .ok_or_else(|| SchemaError::TermNotFound { value: value.repr() })
    }

    fn get_term_by_token(&self, token: &str) -> SchemaResult<&SimpleTerm> {
        self.by_token
            .get(token)
            .map(|position| &self.flat[*position])
            .ok_or_else(|| SchemaError::TokenNotFound {
                token: token.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions() -> TreeVocabulary {
        TreeVocabulary::from_dict(vec![
            TreeItem::new("eu", "Europe").children([
                TreeItem::new("fr", "France").child(TreeItem::new("par", "Paris")),
                TreeItem::new("de", "Germany"),
            ]),
            TreeItem::new("as", "Asia").child(TreeItem::new("jp", "Japan")),
        ])
        .unwrap()
    }

    #[test]
    fn test_siblings_sorted_by_key() {
        let vocab = regions();
        let tokens: Vec<&str> = vocab.keys().iter().map(|t| t.token()).collect();
        assert_eq!(tokens, vec!["as", "eu"]);
        let europe = vocab.get_term(&Value::from("Europe")).unwrap().clone();
        let children: Vec<&str> = vocab
            .children(&europe)
            .unwrap()
            .iter()
            .map(|n| n.term.token())
            .collect();
        assert_eq!(children, vec!["de", "fr"]);
    }

    #[test]
    fn test_term_path() {
        let vocab = regions();
        assert_eq!(
            vocab.get_term_path(&Value::from("Paris")),
            vec![Value::from("Europe"), Value::from("France"), Value::from("Paris")]
        );
        assert_eq!(vocab.get_term_path(&Value::from("Asia")), vec![Value::from("Asia")]);
        assert!(vocab.get_term_path(&Value::from("Mars")).is_empty());
    }

    #[test]
    fn test_lookups_cover_whole_tree() {
        let vocab = regions();
        assert!(vocab.contains(&Value::from("Japan")));
        assert_eq!(vocab.get_term_by_token("par").unwrap().value(), &Value::from("Paris"));
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn test_uniqueness_across_tree() {
        let err = TreeVocabulary::from_dict(vec![
            TreeItem::new("a", 1).child(TreeItem::new("b", 2)),
            TreeItem::new("c", 2),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTerm { what: "value", .. }));

        let err = TreeVocabulary::from_dict(vec![
            TreeItem::new("a", 1).child(TreeItem::new("x", 2)),
            TreeItem::new("x", 3),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTerm { what: "token", .. }));
    }

    #[test]
    fn test_equal_numbers_collide_across_kinds() {
        let err = TreeVocabulary::from_dict(vec![
            TreeItem::new("a", 1).child(TreeItem::new("b", 2.0)),
            TreeItem::new("c", 2),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTerm { what: "value", .. }));

        let vocab = TreeVocabulary::from_dict(vec![TreeItem::new("a", 1).child(TreeItem::new("b", 2))]).unwrap();
        assert_eq!(vocab.get_term_path(&Value::Float(2.0)), vec![Value::int(1), Value::int(2)]);
    }
}
