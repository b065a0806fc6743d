//! Schema definitions
//!
//! A schema is a named contract: an ordered set of member declarations
//! (fields and plain methods), base schemas it extends, and invariants
//! checked against whole objects.
//!
//! Members can be declared after construction so schemas may refer to
//! themselves or to each other through object fields.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::host::HostRef;
use crate::field::{Field, ValidationResult};

/// A declaration inside a schema
#[derive(Debug, Clone)]
pub enum Member {
    /// A validated attribute
    Field(Field),
    /// A method declaration; carries no value constraints
    Method { signature: String },
}

impl Member {
    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Member::Field(field) => Some(field),
            Member::Method { .. } => None,
        }
    }
}

type InvariantFn = dyn Fn(&HostRef) -> ValidationResult<()> + Send + Sync;

/// A predicate over a whole object
#[derive(Clone)]
pub struct Invariant {
    name: String,
    check: Arc<InvariantFn>,
}

impl Invariant {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&HostRef) -> ValidationResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, host: &HostRef) -> ValidationResult<()> {
        (self.check)(host)
    }
}

impl fmt::Debug for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invariant").field("name", &self.name).finish()
    }
}

/// A named interface contract.
pub struct Schema {
    name: String,
    description: Option<String>,
    bases: Vec<Arc<Schema>>,
    members: RwLock<Vec<(String, Member)>>,
    invariants: RwLock<Vec<Invariant>>,
}

impl Schema {
    /// Starts building a schema named `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            description: None,
            bases: Vec::new(),
            members: Vec::new(),
            invariants: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn bases(&self) -> &[Arc<Schema>] {
        &self.bases
    }

    /// Whether this schema is `other` or extends it, directly or not.
    pub fn is_or_extends(&self, other: &Schema) -> bool {
        std::ptr::eq(self, other) || self.bases.iter().any(|base| base.is_or_extends(other))
    }

    /// Whether this schema strictly extends `other`.
    pub fn extends(&self, other: &Schema) -> bool {
        !std::ptr::eq(self, other) && self.is_or_extends(other)
    }

    /// Declares a field. The field takes the member name and records this
    /// schema as its owner. A member with the same name is replaced.
    pub fn define_field(&self, name: &str, field: Field) {
        let field = field.with_name(name).owned_by(&self.name);
        self.insert_member(name, Member::Field(field));
    }

    /// Declares a method.
    pub fn define_method(&self, name: &str, signature: impl Into<String>) {
        self.insert_member(
            name,
            Member::Method {
                signature: signature.into(),
            },
        );
    }

    /// Adds an invariant.
    pub fn add_invariant(&self, invariant: Invariant) {
        self.invariants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invariant);
    }

    fn insert_member(&self, name: &str, member: Member) {
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        match members.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = member,
            None => members.push((name.to_string(), member)),
        }
    }

    /// Names declared directly on this schema, in declaration order
    pub fn own_names(&self) -> Vec<String> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Names declared on this schema and its bases; own names first.
    pub fn names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_names(&mut seen, &mut out);
        out
    }

    fn collect_names(&self, seen: &mut HashSet<String>, out: &mut Vec<String>) {
        for name in self.own_names() {
            if seen.insert(name.clone()) {
                out.push(name);
            }
        }
        for base in &self.bases {
            base.collect_names(seen, out);
        }
    }

    /// Looks up a member here first, then in the bases in order.
    pub fn get(&self, name: &str) -> Option<Member> {
        let own = self
            .members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, member)| member.clone());
        own.or_else(|| self.bases.iter().find_map(|base| base.get(name)))
    }

    /// Whether `name` is declared here or on a base
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Runs every invariant of this schema and its bases against `host`
    /// and returns the failures. Each schema is visited once.
    pub fn validate_invariants(&self, host: &HostRef) -> Vec<crate::field::ValidationError> {
        let mut visited = HashSet::new();
        let mut errors = Vec::new();
        self.collect_invariant_errors(host, &mut visited, &mut errors);
        errors
    }

    fn collect_invariant_errors(
        &self,
        host: &HostRef,
        visited: &mut HashSet<usize>,
        errors: &mut Vec<crate::field::ValidationError>,
    ) {
        if !visited.insert(self as *const Schema as usize) {
            return;
        }
        let invariants = self
            .invariants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for invariant in invariants {
            if let Err(err) = invariant.check(host) {
                errors.push(err);
            }
        }
        for base in &self.bases {
            base.collect_invariant_errors(host, visited, errors);
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("bases", &self.bases.iter().map(|b| b.name()).collect::<Vec<_>>())
            .field("members", &self.own_names())
            .finish()
    }
}

/// Builder for [`Schema`]
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    bases: Vec<Arc<Schema>>,
    members: Vec<(String, Member)>,
    invariants: Vec<Invariant>,
}

impl SchemaBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn extends(mut self, base: Arc<Schema>) -> Self {
        self.bases.push(base);
        self
    }

    pub fn field(mut self, name: &str, field: Field) -> Self {
        self.members.push((name.to_string(), Member::Field(field)));
        self
    }

    pub fn method(mut self, name: &str, signature: impl Into<String>) -> Self {
        self.members.push((
            name.to_string(),
            Member::Method {
                signature: signature.into(),
            },
        ));
        self
    }

    pub fn invariant<F>(mut self, name: &str, check: F) -> Self
    where
        F: Fn(&HostRef) -> ValidationResult<()> + Send + Sync + 'static,
    {
        self.invariants.push(Invariant::new(name, check));
        self
    }

    pub fn build(self) -> Arc<Schema> {
        let schema = Arc::new(Schema {
            name: self.name,
            description: self.description,
            bases: self.bases,
            members: RwLock::new(Vec::new()),
            invariants: RwLock::new(self.invariants),
        });
        for (name, member) in self.members {
            match member {
                Member::Field(field) => schema.define_field(&name, field),
                method @ Member::Method { .. } => schema.insert_member(&name, method),
            }
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldType};
    use crate::schema::Instance;
    use crate::value::Value;

    fn text_line() -> Field {
        Field::builder(FieldType::TextLine).build().unwrap()
    }

    #[test]
    fn test_fields_take_member_names() {
        let schema = Schema::builder("IPerson").field("name", text_line()).build();
        let member = schema.get("name").unwrap();
        let field = member.as_field().unwrap();
        assert_eq!(field.name(), "name");
        assert_eq!(field.interface(), Some("IPerson"));
    }

    #[test]
    fn test_names_include_bases_after_own() {
        let base = Schema::builder("IBase")
            .field("id", text_line())
            .method("describe", "describe()")
            .build();
        let derived = Schema::builder("IDerived")
            .extends(base)
            .field("title", text_line())
            .build();
        assert_eq!(derived.names(), vec!["title", "id", "describe"]);
        assert!(derived.contains("id"));
        assert!(!derived.contains("missing"));
    }

    #[test]
    fn test_extends() {
        let base = Schema::builder("IBase").build();
        let derived = Schema::builder("IDerived").extends(base.clone()).build();
        assert!(derived.extends(&base));
        assert!(!base.extends(&derived));
        assert!(!base.extends(&base));
        assert!(base.is_or_extends(&base));
    }

    #[test]
    fn test_invariants_collect_failures() {
        let schema = Schema::builder("IRange")
            .invariant("ordered", |host| {
                let low = host.attribute("low").unwrap_or(Value::None);
                let high = host.attribute("high").unwrap_or(Value::None);
                if low > high {
                    return Err(crate::field::ValidationError::invalid_value(&low, "low above high"));
                }
                Ok(())
            })
            .build();
        let good = Instance::new().with("low", 1).with("high", 2).into_ref();
        let bad = Instance::new().with("low", 3).with("high", 2).into_ref();
        assert!(schema.validate_invariants(&good).is_empty());
        assert_eq!(schema.validate_invariants(&bad).len(), 1);
    }

    #[test]
    fn test_self_reference_by_late_definition() {
        let node = Schema::builder("INode").build();
        let next = Field::builder(FieldType::Object)
            .schema(node.clone())
            .required(false)
            .build()
            .unwrap();
        node.define_field("next", next);
        assert!(node.contains("next"));
    }
}
