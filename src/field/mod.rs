//! Fields: validating descriptors for schema attributes
//!
//! A field describes one attribute: whether it is required, its default,
//! the runtime categories it accepts, and capability-specific bounds
//! (order, length, contained fields, target schema, vocabulary).
//!
//! # Validation protocol
//!
//! 1. A value equal to the field's missing value fails with
//!    `RequiredMissing` on required fields and passes otherwise.
//! 2. Otherwise the layers run in order:
//!    runtime type → constraint → capability layers → leaf checks.
//! 3. A constraint may stop validation early; the remaining layers are
//!    skipped and the value is accepted.
//!
//! Fields are built with [`Field::builder`]; each field type accepts only
//! the arguments that make sense for it.

mod builder;
mod capability;
mod choice;
mod collection;
mod errors;
mod ingest;
mod numeric;
mod object;
mod text;

pub use builder::FieldBuilder;
pub use capability::{Bounds, LengthBounds};
pub use errors::{ErrorKind, ValidationError, ValidationResult};
pub use ingest::FromUnicode;
pub(crate) use object::field_errors;
pub use text::DotBounds;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use num_traits::Zero;
use serde::Deserialize;

use self::capability::{ContainerCheck, IterableCheck, Layer};
use self::choice::ChoiceSpec;
use self::collection::{CollectionSpec, MappingSpec};
use self::object::ObjectSpec;
use crate::schema::{HostRef, Schema, SchemaError, SchemaResult};
use crate::value::{Value, ValueKind};
use crate::vocabulary::Source;

/// Sentinel accepted by password fields meaning "keep the stored password".
pub const UNCHANGED_PASSWORD: Value = Value::Marker("UNCHANGED_PASSWORD");

static NEXT_ORDER: AtomicU64 = AtomicU64::new(0);

fn next_order() -> u64 {
    NEXT_ORDER.fetch_add(1, AtomicOrdering::Relaxed)
}

/// Concrete field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum FieldType {
    /// Accepts any value
    Field,
    Container,
    Iterable,
    Bool,
    Text,
    TextLine,
    SourceText,
    Password,
    #[serde(alias = "ASCII")]
    Ascii,
    #[serde(alias = "ASCIILine")]
    AsciiLine,
    #[serde(alias = "URI")]
    Uri,
    DottedName,
    Id,
    Bytes,
    BytesLine,
    Number,
    Complex,
    Real,
    Rational,
    Integral,
    /// Integers of any size. Booleans are a separate kind and fail the
    /// type check here, even though Bool fields read integers as booleans.
    Int,
    Float,
    Decimal,
    Date,
    Datetime,
    Time,
    Timedelta,
    Interface,
    Object,
    Collection,
    Sequence,
    MutableSequence,
    Tuple,
    List,
    Set,
    FrozenSet,
    Mapping,
    MutableMapping,
    Dict,
    Choice,
}

const NUMBER_KINDS: &[ValueKind] = &[
    ValueKind::Int,
    ValueKind::Float,
    ValueKind::Rational,
    ValueKind::Complex,
    ValueKind::Decimal,
];
const COMPLEX_KINDS: &[ValueKind] = &[ValueKind::Int, ValueKind::Float, ValueKind::Rational, ValueKind::Complex];
const REAL_KINDS: &[ValueKind] = &[ValueKind::Int, ValueKind::Float, ValueKind::Rational];
const RATIONAL_KINDS: &[ValueKind] = &[ValueKind::Int, ValueKind::Rational];
const SEQUENCE_KINDS: &[ValueKind] = &[ValueKind::Text, ValueKind::Bytes, ValueKind::Tuple, ValueKind::List];

impl FieldType {
    /// Returns the type name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Field => "Field",
            FieldType::Container => "Container",
            FieldType::Iterable => "Iterable",
            FieldType::Bool => "Bool",
            FieldType::Text => "Text",
            FieldType::TextLine => "TextLine",
            FieldType::SourceText => "SourceText",
            FieldType::Password => "Password",
            FieldType::Ascii => "ASCII",
            FieldType::AsciiLine => "ASCIILine",
            FieldType::Uri => "URI",
            FieldType::DottedName => "DottedName",
            FieldType::Id => "Id",
            FieldType::Bytes => "Bytes",
            FieldType::BytesLine => "BytesLine",
            FieldType::Number => "Number",
            FieldType::Complex => "Complex",
            FieldType::Real => "Real",
            FieldType::Rational => "Rational",
            FieldType::Integral => "Integral",
            FieldType::Int => "Int",
            FieldType::Float => "Float",
            FieldType::Decimal => "Decimal",
            FieldType::Date => "Date",
            FieldType::Datetime => "Datetime",
            FieldType::Time => "Time",
            FieldType::Timedelta => "Timedelta",
            FieldType::Interface => "Interface",
            FieldType::Object => "Object",
            FieldType::Collection => "Collection",
            FieldType::Sequence => "Sequence",
            FieldType::MutableSequence => "MutableSequence",
            FieldType::Tuple => "Tuple",
            FieldType::List => "List",
            FieldType::Set => "Set",
            FieldType::FrozenSet => "FrozenSet",
            FieldType::Mapping => "Mapping",
            FieldType::MutableMapping => "MutableMapping",
            FieldType::Dict => "Dict",
            FieldType::Choice => "Choice",
        }
    }

    /// Runtime categories a value must fall in; empty means unrestricted.
    pub fn accepted_kinds(&self) -> &'static [ValueKind] {
        match self {
            FieldType::Bool => &[ValueKind::Bool],
            FieldType::Text
            | FieldType::TextLine
            | FieldType::SourceText
            | FieldType::Password
            | FieldType::Ascii
            | FieldType::AsciiLine
            | FieldType::Uri
            | FieldType::DottedName
            | FieldType::Id => &[ValueKind::Text],
            FieldType::Bytes | FieldType::BytesLine => &[ValueKind::Bytes],
            FieldType::Number => NUMBER_KINDS,
            FieldType::Complex => COMPLEX_KINDS,
            FieldType::Real => REAL_KINDS,
            FieldType::Rational => RATIONAL_KINDS,
            FieldType::Integral | FieldType::Int => &[ValueKind::Int],
            FieldType::Float => &[ValueKind::Float],
            FieldType::Decimal => &[ValueKind::Decimal],
            // A datetime is never accepted where a date is expected.
            FieldType::Date => &[ValueKind::Date],
            FieldType::Datetime => &[ValueKind::Datetime],
            FieldType::Time => &[ValueKind::Time],
            FieldType::Timedelta => &[ValueKind::Timedelta],
            FieldType::Sequence => SEQUENCE_KINDS,
            FieldType::MutableSequence | FieldType::List => &[ValueKind::List],
            FieldType::Tuple => &[ValueKind::Tuple],
            FieldType::Set => &[ValueKind::Set],
            FieldType::FrozenSet => &[ValueKind::FrozenSet],
            FieldType::Mapping | FieldType::MutableMapping | FieldType::Dict => &[ValueKind::Dict],
            FieldType::Field
            | FieldType::Container
            | FieldType::Iterable
            | FieldType::Interface
            | FieldType::Object
            | FieldType::Collection
            | FieldType::Choice => &[],
        }
    }

    /// Fields with `min` / `max`
    pub fn is_orderable(&self) -> bool {
        matches!(
            self,
            FieldType::Number
                | FieldType::Complex
                | FieldType::Real
                | FieldType::Rational
                | FieldType::Integral
                | FieldType::Int
                | FieldType::Float
                | FieldType::Decimal
                | FieldType::Date
                | FieldType::Datetime
                | FieldType::Time
                | FieldType::Timedelta
        )
    }

    /// Fields with `min_length` / `max_length`
    pub fn is_length_bounded(&self) -> bool {
        self.is_text() || self.is_bytes() || self.is_collection() || self.is_mapping()
    }

    pub fn is_text(&self) -> bool {
        matches!(self.accepted_kinds(), [ValueKind::Text])
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, FieldType::Bytes | FieldType::BytesLine)
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            FieldType::Collection
                | FieldType::Sequence
                | FieldType::MutableSequence
                | FieldType::Tuple
                | FieldType::List
                | FieldType::Set
                | FieldType::FrozenSet
        )
    }

    /// Set types are always unique
    pub fn is_set(&self) -> bool {
        matches!(self, FieldType::Set | FieldType::FrozenSet)
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, FieldType::Mapping | FieldType::MutableMapping | FieldType::Dict)
    }

    /// Members of the numeric tower, including `Float` and `Decimal`
    pub fn is_numeric(&self) -> bool {
        self.is_orderable()
            && !matches!(
                self,
                FieldType::Date | FieldType::Datetime | FieldType::Time | FieldType::Timedelta
            )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a constraint check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Satisfied,
    Violated,
    /// Accept the value and skip the remaining validation layers
    StopValidation,
}

type ConstraintFn = dyn Fn(&Value) -> ValidationResult<Verdict> + Send + Sync;

/// A user check run after the type check. Replaces the field's built-in
/// constraint (the no-newline rule of line fields).
#[derive(Clone)]
pub struct Constraint(Arc<ConstraintFn>);

impl Constraint {
    /// A constraint that may reject with its own error or stop validation.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> ValidationResult<Verdict> + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    /// A plain predicate; `false` fails with `ConstraintNotSatisfied`.
    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(move |value| {
            Ok(if check(value) {
                Verdict::Satisfied
            } else {
                Verdict::Violated
            })
        })
    }

    pub fn check(&self, value: &Value) -> ValidationResult<Verdict> {
        (self.0)(value)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Constraint(..)")
    }
}

/// Produces default values on demand.
#[derive(Clone)]
pub enum DefaultFactory {
    Plain(Arc<dyn Fn() -> Value + Send + Sync>),
    /// Receives the context of a bound field
    ContextAware(Arc<dyn Fn(Option<&HostRef>) -> Value + Send + Sync>),
}

impl DefaultFactory {
    pub fn plain<F>(factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        DefaultFactory::Plain(Arc::new(factory))
    }

    pub fn context_aware<F>(factory: F) -> Self
    where
        F: Fn(Option<&HostRef>) -> Value + Send + Sync + 'static,
    {
        DefaultFactory::ContextAware(Arc::new(factory))
    }

    fn produce(&self, context: Option<&HostRef>) -> Value {
        match self {
            DefaultFactory::Plain(factory) => factory(),
            DefaultFactory::ContextAware(factory) => factory(context),
        }
    }
}

impl fmt::Debug for DefaultFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultFactory::Plain(_) => f.write_str("DefaultFactory::Plain(..)"),
            DefaultFactory::ContextAware(_) => f.write_str("DefaultFactory::ContextAware(..)"),
        }
    }
}

/// Capability-specific configuration
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldKind {
    Plain,
    Sized(LengthBounds),
    Dotted(LengthBounds, DotBounds),
    Ordered(Bounds),
    Collection(CollectionSpec),
    Mapping(MappingSpec),
    Object(ObjectSpec),
    Choice(ChoiceSpec),
}

/// Why the layer pipeline ended early.
enum Interrupt {
    Stop,
    Invalid(ValidationError),
}

impl From<ValidationError> for Interrupt {
    fn from(err: ValidationError) -> Self {
        Interrupt::Invalid(err)
    }
}

/// A validating attribute descriptor.
#[derive(Clone)]
pub struct Field {
    field_type: FieldType,
    name: String,
    interface: Option<String>,
    order: u64,
    title: Option<String>,
    description: Option<String>,
    required: bool,
    readonly: bool,
    default: Value,
    default_factory: Option<DefaultFactory>,
    missing_value: Value,
    constraint: Option<Constraint>,
    kind: FieldKind,
    context: Option<HostRef>,
}

impl Field {
    /// Starts building a field of `field_type`.
    pub fn builder(field_type: FieldType) -> FieldBuilder {
        FieldBuilder::new(field_type)
    }

    /// A field of `field_type` with every argument at its default.
    pub fn new(field_type: FieldType) -> SchemaResult<Field> {
        FieldBuilder::new(field_type).build()
    }

    fn bare(field_type: FieldType, kind: FieldKind) -> Self {
        Self {
            field_type,
            name: String::new(),
            interface: None,
            order: next_order(),
            title: None,
            description: None,
            required: true,
            readonly: false,
            default: Value::None,
            default_factory: None,
            missing_value: Value::None,
            constraint: None,
            kind,
            context: None,
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the schema the field was declared on
    pub fn interface(&self) -> Option<&str> {
        self.interface.as_deref()
    }

    /// Creation order; later fields have larger values
    pub fn order(&self) -> u64 {
        self.order
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn missing_value(&self) -> &Value {
        &self.missing_value
    }

    /// The default as stored, without consulting a factory
    pub fn stored_default(&self) -> &Value {
        &self.default
    }

    pub fn has_default_factory(&self) -> bool {
        self.default_factory.is_some()
    }

    /// The host object of a bound field
    pub fn context(&self) -> Option<&HostRef> {
        self.context.as_ref()
    }

    pub fn min(&self) -> Option<&Value> {
        match &self.kind {
            FieldKind::Ordered(bounds) => bounds.min.as_ref(),
            _ => None,
        }
    }

    pub fn max(&self) -> Option<&Value> {
        match &self.kind {
            FieldKind::Ordered(bounds) => bounds.max.as_ref(),
            _ => None,
        }
    }

    fn length_bounds(&self) -> Option<&LengthBounds> {
        match &self.kind {
            FieldKind::Sized(length) | FieldKind::Dotted(length, _) => Some(length),
            FieldKind::Collection(spec) => Some(&spec.length),
            FieldKind::Mapping(spec) => Some(&spec.length),
            _ => None,
        }
    }

    pub fn min_length(&self) -> Option<usize> {
        self.length_bounds().map(|l| l.min_length)
    }

    pub fn max_length(&self) -> Option<usize> {
        self.length_bounds().and_then(|l| l.max_length)
    }

    pub fn min_dots(&self) -> Option<usize> {
        match &self.kind {
            FieldKind::Dotted(_, dots) => Some(dots.min_dots),
            _ => None,
        }
    }

    pub fn max_dots(&self) -> Option<usize> {
        match &self.kind {
            FieldKind::Dotted(_, dots) => dots.max_dots,
            _ => None,
        }
    }

    pub fn value_type(&self) -> Option<&Field> {
        match &self.kind {
            FieldKind::Collection(spec) => spec.value_type.as_deref(),
            FieldKind::Mapping(spec) => spec.value_type.as_deref(),
            _ => None,
        }
    }

    pub fn key_type(&self) -> Option<&Field> {
        match &self.kind {
            FieldKind::Mapping(spec) => spec.key_type.as_deref(),
            _ => None,
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(&self.kind, FieldKind::Collection(spec) if spec.unique)
    }

    /// Target schema of an object field
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        match &self.kind {
            FieldKind::Object(spec) => Some(&spec.schema),
            _ => None,
        }
    }

    pub fn validates_invariants(&self) -> bool {
        matches!(&self.kind, FieldKind::Object(spec) if spec.validate_invariants)
    }

    /// Vocabulary of a choice field, once known
    pub fn vocabulary(&self) -> Option<Arc<dyn Source>> {
        match &self.kind {
            FieldKind::Choice(spec) => spec.resolved(),
            _ => None,
        }
    }

    pub fn vocabulary_name(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Choice(spec) => spec.name(),
            _ => None,
        }
    }

    pub(crate) fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub(crate) fn owned_by(mut self, interface: &str) -> Self {
        self.interface = Some(interface.to_string());
        self
    }

    fn label(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(&self.name)
        }
    }

    fn attach(&self, err: ValidationError) -> ValidationError {
        match self.label() {
            Some(name) => err.or_field(name),
            None => err,
        }
    }

    /// Sets `min`, validating it unless it is `None` or the missing value.
    pub fn set_min(&mut self, min: Value) -> ValidationResult<()> {
        self.set_bound(min, true)
    }

    /// Sets `max`, validating it unless it is `None` or the missing value.
    pub fn set_max(&mut self, max: Value) -> ValidationResult<()> {
        self.set_bound(max, false)
    }

    fn set_bound(&mut self, bound: Value, is_min: bool) -> ValidationResult<()> {
        if !bound.is_none() && bound != self.missing_value {
            self.validate(&bound)?;
        }
        let slot = if bound.is_none() { None } else { Some(bound) };
        if let FieldKind::Ordered(bounds) = &mut self.kind {
            if is_min {
                bounds.min = slot;
            } else {
                bounds.max = slot;
            }
        }
        Ok(())
    }

    /// Sets the stored default, validating it unless it is the missing
    /// value.
    pub fn set_default(&mut self, default: Value) -> ValidationResult<()> {
        if default != self.missing_value {
            self.validate(&default)?;
        }
        self.default = default;
        Ok(())
    }

    /// The default value. A factory is called (with the bound context when
    /// it is context-aware) and its result validated; a stored default is
    /// returned as is.
    pub fn default_value(&self) -> ValidationResult<Value> {
        match &self.default_factory {
            Some(factory) => {
                let value = factory.produce(self.context.as_ref());
                if value != self.missing_value {
                    self.validate(&value)?;
                }
                Ok(value)
            }
            None => Ok(self.default.clone()),
        }
    }

    /// Checks `value` against every rule of this field.
    pub fn validate(&self, value: &Value) -> ValidationResult<()> {
        if self.keeps_stored_password(value) {
            return Ok(());
        }
        if *value == self.missing_value {
            if self.required {
                return Err(self.attach(ValidationError::new(ErrorKind::RequiredMissing, value.clone())));
            }
            return Ok(());
        }
        match self.run_layers(value) {
            Ok(()) | Err(Interrupt::Stop) => Ok(()),
            Err(Interrupt::Invalid(err)) => Err(self.attach(err)),
        }
    }

    fn keeps_stored_password(&self, value: &Value) -> bool {
        self.field_type == FieldType::Password
            && *value == UNCHANGED_PASSWORD
            && self
                .context
                .as_ref()
                .and_then(|host| host.attribute(&self.name))
                .is_some_and(|stored| stored.is_truthy())
    }

    fn run_layers(&self, value: &Value) -> Result<(), Interrupt> {
        let coerced = self.coerce(value);
        let value = coerced.as_ref().unwrap_or(value);

        let kinds = self.field_type.accepted_kinds();
        if !kinds.is_empty() && !kinds.contains(&value.kind()) {
            return Err(ValidationError::wrong_type(value, kinds).into());
        }

        self.check_constraint(value)?;

        for layer in self.layers() {
            layer.check(value)?;
        }

        self.check_leaf(value)
    }

    /// Bool fields take integers as booleans, on validate and on set.
    fn coerce(&self, value: &Value) -> Option<Value> {
        match (self.field_type, value) {
            (FieldType::Bool, Value::Int(i)) => Some(Value::Bool(!i.is_zero())),
            _ => None,
        }
    }

    fn check_constraint(&self, value: &Value) -> Result<(), Interrupt> {
        let satisfied = match &self.constraint {
            Some(constraint) => match constraint.check(value) {
                Ok(Verdict::Satisfied) => true,
                Ok(Verdict::Violated) => false,
                Ok(Verdict::StopValidation) => return Err(Interrupt::Stop),
                Err(err) => return Err(Interrupt::Invalid(err)),
            },
            None => text::builtin_constraint(self.field_type, value),
        };
        if satisfied {
            Ok(())
        } else {
            Err(ValidationError::constraint_not_satisfied(value).into())
        }
    }

    fn layers(&self) -> Vec<&dyn Layer> {
        let mut layers: Vec<&dyn Layer> = Vec::new();
        match (&self.kind, self.field_type) {
            (FieldKind::Ordered(bounds), _) => layers.push(bounds),
            (FieldKind::Sized(length), _) | (FieldKind::Dotted(length, _), _) => layers.push(length),
            (FieldKind::Collection(spec), _) => {
                layers.extend([&ContainerCheck as &dyn Layer, &IterableCheck, &spec.length])
            }
            (FieldKind::Mapping(spec), _) => {
                layers.extend([&ContainerCheck as &dyn Layer, &IterableCheck, &spec.length])
            }
            (_, FieldType::Container) => layers.push(&ContainerCheck),
            (_, FieldType::Iterable) => layers.extend([&ContainerCheck as &dyn Layer, &IterableCheck]),
            _ => {}
        }
        layers
    }

    fn check_leaf(&self, value: &Value) -> Result<(), Interrupt> {
        match &self.kind {
            FieldKind::Dotted(_, dots) => text::check_dotted_name(value, dots)?,
            FieldKind::Collection(spec) => collection::validate_collection(spec, value)?,
            FieldKind::Mapping(spec) => collection::validate_mapping(spec, value)?,
            FieldKind::Object(spec) => object::validate_object(spec, value)?,
            FieldKind::Choice(spec) => choice::validate_choice(spec, self.context.as_ref(), value)?,
            FieldKind::Plain | FieldKind::Sized(_) | FieldKind::Ordered(_) => {}
        }
        match self.field_type {
            FieldType::Ascii | FieldType::AsciiLine => text::check_ascii(value)?,
            FieldType::Uri => text::check_uri(value)?,
            FieldType::Id => text::check_id(value)?,
            FieldType::Interface if !matches!(value, Value::Interface(_)) => {
                return Err(ValidationError::new(ErrorKind::NotAnInterface, value.clone()).into())
            }
            _ => {}
        }
        Ok(())
    }

    /// Reads this field's attribute from `host`.
    pub fn get(&self, host: &HostRef) -> SchemaResult<Value> {
        host.attribute(&self.name)
            .ok_or_else(|| SchemaError::AttributeMissing {
                attribute: self.name.clone(),
            })
    }

    /// Reads this field's attribute, falling back to `default`.
    pub fn query(&self, host: &HostRef, default: Value) -> Value {
        host.attribute(&self.name).unwrap_or(default)
    }

    /// Writes this field's attribute on `host`. The value is not validated.
    ///
    /// # Errors
    ///
    /// `SchemaError::ReadOnly` on read-only fields.
    pub fn set(&self, host: &HostRef, value: Value) -> SchemaResult<()> {
        if self.readonly {
            return Err(SchemaError::ReadOnly {
                field: self.name.clone(),
            });
        }
        if self.field_type == FieldType::Password && value == UNCHANGED_PASSWORD {
            return Ok(());
        }
        let value = self.coerce(&value).unwrap_or(value);
        let value = match &self.kind {
            FieldKind::Object(spec) => object::announce_assignment(spec, &self.name, host, value),
            _ => value,
        };
        host.set_attribute(&self.name, value)
    }

    /// A copy of this field attached to `context`. Contained fields are
    /// bound too and late-bound vocabularies are resolved.
    pub fn bind(&self, context: &HostRef) -> SchemaResult<Field> {
        let mut clone = self.clone();
        clone.context = Some(Arc::clone(context));
        clone.kind = match &self.kind {
            FieldKind::Collection(spec) => FieldKind::Collection(spec.bind(context)?),
            FieldKind::Mapping(spec) => FieldKind::Mapping(spec.bind(context)?),
            FieldKind::Choice(spec) => FieldKind::Choice(spec.bind(context)?),
            other => other.clone(),
        };
        Ok(clone)
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.field_type == other.field_type
            && self.interface == other.interface
            && self.name == other.name
            && self.title == other.title
            && self.description == other.description
            && self.required == other.required
            && self.readonly == other.readonly
            && self.default == other.default
            && self.missing_value == other.missing_value
            && self.kind == other.kind
    }
}

impl Eq for Field {}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field_type.hash(state);
        self.interface.hash(state);
        self.name.hash(state);
        self.title.hash(state);
        self.description.hash(state);
        self.required.hash(state);
        self.readonly.hash(state);
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("type", &self.field_type)
            .field("name", &self.name)
            .field("interface", &self.interface)
            .field("order", &self.order)
            .field("required", &self.required)
            .field("readonly", &self.readonly)
            .field("default", &self.default)
            .field("kind", &self.kind)
            .field("bound", &self.context.is_some())
            .finish()
    }
}
