//! Flat vocabularies

use std::collections::HashMap;

use super::term::SimpleTerm;
use super::{Source, ValueIndex, Vocabulary};
use crate::schema::{SchemaError, SchemaResult};
use crate::value::Value;

/// An ordered list of terms indexed by value and by token.
///
/// Values and tokens must be unique unless the vocabulary is built with
/// `swallow_duplicates`, in which case the last term wins the lookups while
/// iteration still yields every term.
#[derive(Debug, Clone)]
pub struct SimpleVocabulary {
    terms: Vec<SimpleTerm>,
    by_value: ValueIndex,
    by_token: HashMap<String, usize>,
}

impl SimpleVocabulary {
    /// Builds a vocabulary from terms, rejecting duplicates.
    pub fn new(terms: Vec<SimpleTerm>) -> SchemaResult<Self> {
        let mut by_value = ValueIndex::default();
        let mut by_token = HashMap::with_capacity(terms.len());
        for (index, term) in terms.iter().enumerate() {
            if by_value.find(term.value(), &terms).is_some() {
                return Err(SchemaError::DuplicateTerm {
                    what: "value",
                    repr: term.value().repr(),
                });
            }
            if by_token.insert(term.token().to_string(), index).is_some() {
                return Err(SchemaError::DuplicateTerm {
                    what: "token",
                    repr: format!("'{}'", term.token()),
                });
            }
            by_value.insert(term.value(), index);
        }
        Ok(Self {
            terms,
            by_value,
            by_token,
        })
    }

    /// Builds a vocabulary from terms, keeping duplicates.
    pub fn swallow_duplicates(terms: Vec<SimpleTerm>) -> Self {
        let mut by_value = ValueIndex::default();
        let mut by_token = HashMap::with_capacity(terms.len());
        for (index, term) in terms.iter().enumerate() {
            by_value.insert(term.value(), index);
            by_token.insert(term.token().to_string(), index);
        }
        Self {
            terms,
            by_value,
            by_token,
        }
    }

    /// One term per value; tokens are derived from the values.
    pub fn from_values<I, T>(values: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::new(values.into_iter().map(SimpleTerm::new).collect())
    }

    /// One term per `(token, value)` pair.
    pub fn from_items<I, S, T>(items: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<Value>,
    {
        Self::new(
            items
                .into_iter()
                .map(|(token, value)| SimpleTerm::with_token(value, token.as_ref()))
                .collect(),
        )
    }

    /// One term per `(token, value, title)` triple.
    pub fn from_titled_items<I, S, T, U>(items: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = (S, T, U)>,
        S: AsRef<str>,
        T: Into<Value>,
        U: Into<String>,
    {
        Self::new(
            items
                .into_iter()
                .map(|(token, value, title)| SimpleTerm::with_token(value, token.as_ref()).titled(title))
                .collect(),
        )
    }

    fn position(&self, value: &Value) -> Option<usize> {
        self.by_value.find(value, &self.terms)
    }
}

impl Source for SimpleVocabulary {
    fn contains(&self, value: &Value) -> bool {
        self.position(value).is_some()
    }

    fn as_vocabulary(&self) -> Option<&dyn Vocabulary> {
        Some(self)
    }
}

impl Vocabulary for SimpleVocabulary {
    fn len(&self) -> usize {
        self.terms.len()
    }

    fn terms(&self) -> Vec<&SimpleTerm> {
        self.terms.iter().collect()
    }

    fn get_term(&self, value: &Value) -> SchemaResult<&SimpleTerm> {
        self.position(value)
            .map(|index| &self.terms[index])
            .ok_or_else(|| SchemaError::TermNotFound { value: value.repr() })
    }

    fn get_term_by_token(&self, token: &str) -> SchemaResult<&SimpleTerm> {
        self.by_token
            .get(token)
            .map(|index| &self.terms[*index])
            .ok_or_else(|| SchemaError::TokenNotFound {
                token: token.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_keeps_order() {
        let vocab = SimpleVocabulary::from_values(["b", "a", "c"]).unwrap();
        let tokens: Vec<&str> = vocab.terms().iter().map(|t| t.token()).collect();
        assert_eq!(tokens, vec!["b", "a", "c"]);
        assert_eq!(vocab.len(), 3);
        assert!(vocab.contains(&Value::from("a")));
        assert!(!vocab.contains(&Value::from("d")));
    }

    #[test]
    fn test_lookup_by_value_and_token() {
        let vocab = SimpleVocabulary::from_titled_items([("r", "red", "Red"), ("g", "green", "Green")]).unwrap();
        assert_eq!(vocab.get_term(&Value::from("green")).unwrap().token(), "g");
        assert_eq!(vocab.get_term_by_token("r").unwrap().title(), Some("Red"));
    }

    #[test]
    fn test_missing_lookups_are_not_found() {
        let vocab = SimpleVocabulary::from_values([1, 2]).unwrap();
        let err = vocab.get_term(&Value::int(3)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.code(), "SCHEMA_TERM_NOT_FOUND");
        let err = vocab.get_term_by_token("3").unwrap_err();
        assert_eq!(err.code(), "SCHEMA_TOKEN_NOT_FOUND");
    }

    #[test]
    fn test_duplicates_rejected() {
        let err = SimpleVocabulary::from_values([1, 1]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTerm { what: "value", .. }));
        let err = SimpleVocabulary::from_items([("x", 1), ("x", 2)]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTerm { what: "token", .. }));
    }

    #[test]
    fn test_swallowed_duplicates_last_wins() {
        let vocab = SimpleVocabulary::swallow_duplicates(vec![
            SimpleTerm::with_token(1, "x").titled("first"),
            SimpleTerm::with_token(1, "x").titled("second"),
        ]);
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.get_term(&Value::int(1)).unwrap().title(), Some("second"));
        assert_eq!(vocab.get_term_by_token("x").unwrap().title(), Some("second"));
    }

    #[test]
    fn test_numeric_membership_crosses_variants() {
        let vocab = SimpleVocabulary::from_values([1, 2, 3]).unwrap();
        assert!(vocab.contains(&Value::Float(2.0)));
    }
}
