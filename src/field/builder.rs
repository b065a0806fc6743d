//! Field construction
//!
//! Every field type takes the common arguments (title, description, name,
//! required, readonly, constraint, default, default_factory,
//! missing_value) plus those of its capabilities. Supplying an argument
//! the type does not take fails the build.

use std::sync::Arc;

use super::capability::{Bounds, LengthBounds};
use super::choice::{ChoiceSpec, VocabularySource};
use super::collection::{CollectionSpec, MappingSpec};
use super::object::ObjectSpec;
use super::text::DotBounds;
use super::{Constraint, DefaultFactory, Field, FieldKind, FieldType};
use crate::events::EventDispatcher;
use crate::schema::{Schema, SchemaError, SchemaResult};
use crate::value::Value;
use crate::vocabulary::{SimpleVocabulary, Source, SourceBinder, VocabularyRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Argument {
    Title,
    Description,
    Name,
    Required,
    Readonly,
    Constraint,
    Default,
    DefaultFactory,
    MissingValue,
    Min,
    Max,
    MinLength,
    MaxLength,
    MinDots,
    MaxDots,
    ValueType,
    KeyType,
    Unique,
    Schema,
    ValidateInvariants,
    Dispatcher,
    Values,
    Vocabulary,
    Source,
    VocabularyName,
    Registry,
}

impl Argument {
    fn as_str(&self) -> &'static str {
        match self {
            Argument::Title => "title",
            Argument::Description => "description",
            Argument::Name => "name",
            Argument::Required => "required",
            Argument::Readonly => "readonly",
            Argument::Constraint => "constraint",
            Argument::Default => "default",
            Argument::DefaultFactory => "default_factory",
            Argument::MissingValue => "missing_value",
            Argument::Min => "min",
            Argument::Max => "max",
            Argument::MinLength => "min_length",
            Argument::MaxLength => "max_length",
            Argument::MinDots => "min_dots",
            Argument::MaxDots => "max_dots",
            Argument::ValueType => "value_type",
            Argument::KeyType => "key_type",
            Argument::Unique => "unique",
            Argument::Schema => "schema",
            Argument::ValidateInvariants => "validate_invariants",
            Argument::Dispatcher => "dispatcher",
            Argument::Values => "values",
            Argument::Vocabulary => "vocabulary",
            Argument::Source => "source",
            Argument::VocabularyName => "vocabulary_name",
            Argument::Registry => "registry",
        }
    }

    fn accepted_by(&self, field_type: FieldType) -> bool {
        match self {
            Argument::Title
            | Argument::Description
            | Argument::Name
            | Argument::Required
            | Argument::Readonly
            | Argument::Constraint
            | Argument::Default
            | Argument::DefaultFactory
            | Argument::MissingValue => true,
            Argument::Min | Argument::Max => field_type.is_orderable(),
            Argument::MinLength | Argument::MaxLength => field_type.is_length_bounded(),
            Argument::MinDots | Argument::MaxDots => field_type == FieldType::DottedName,
            Argument::ValueType => field_type.is_collection() || field_type.is_mapping(),
            Argument::KeyType => field_type.is_mapping(),
            Argument::Unique => field_type.is_collection(),
            Argument::Schema | Argument::ValidateInvariants | Argument::Dispatcher => {
                field_type == FieldType::Object
            }
            Argument::Values
            | Argument::Vocabulary
            | Argument::Source
            | Argument::VocabularyName
            | Argument::Registry => field_type == FieldType::Choice,
        }
    }
}

/// Builder for [`Field`]; see [`Field::builder`].
pub struct FieldBuilder {
    field_type: FieldType,
    supplied: Vec<Argument>,
    title: Option<String>,
    description: Option<String>,
    name: Option<String>,
    required: bool,
    readonly: bool,
    constraint: Option<Constraint>,
    default: Option<Value>,
    default_factory: Option<DefaultFactory>,
    missing_value: Value,
    min: Option<Value>,
    max: Option<Value>,
    length: LengthBounds,
    dots: DotBounds,
    value_type: Option<Field>,
    key_type: Option<Field>,
    unique: Option<bool>,
    schema: Option<Arc<Schema>>,
    validate_invariants: bool,
    dispatcher: Option<Arc<dyn EventDispatcher>>,
    values: Option<Vec<Value>>,
    vocabulary: Option<Arc<dyn Source>>,
    source: Option<VocabularySource>,
    vocabulary_name: Option<String>,
    registry: Option<Arc<VocabularyRegistry>>,
}

impl FieldBuilder {
    pub(crate) fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            supplied: Vec::new(),
            title: None,
            description: None,
            name: None,
            required: true,
            readonly: false,
            constraint: None,
            default: None,
            default_factory: None,
            missing_value: Value::None,
            min: None,
            max: None,
            length: LengthBounds::default(),
            dots: DotBounds::default(),
            value_type: None,
            key_type: None,
            unique: None,
            schema: None,
            validate_invariants: true,
            dispatcher: None,
            values: None,
            vocabulary: None,
            source: None,
            vocabulary_name: None,
            registry: None,
        }
    }

    fn supply(mut self, argument: Argument) -> Self {
        self.supplied.push(argument);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self.supply(Argument::Title)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self.supply(Argument::Description)
    }

    /// Attribute name; normally assigned when the field joins a schema
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.supply(Argument::Name)
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self.supply(Argument::Required)
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self.supply(Argument::Readonly)
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self.supply(Argument::Constraint)
    }

    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self.supply(Argument::Default)
    }

    pub fn default_factory(mut self, factory: DefaultFactory) -> Self {
        self.default_factory = Some(factory);
        self.supply(Argument::DefaultFactory)
    }

    /// The value meaning "no value"; `None` unless set
    pub fn missing_value(mut self, missing_value: impl Into<Value>) -> Self {
        self.missing_value = missing_value.into();
        self.supply(Argument::MissingValue)
    }

    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(min.into());
        self.supply(Argument::Min)
    }

    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(max.into());
        self.supply(Argument::Max)
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.length.min_length = min_length;
        self.supply(Argument::MinLength)
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.length.max_length = Some(max_length);
        self.supply(Argument::MaxLength)
    }

    pub fn min_dots(mut self, min_dots: usize) -> Self {
        self.dots.min_dots = min_dots;
        self.supply(Argument::MinDots)
    }

    pub fn max_dots(mut self, max_dots: usize) -> Self {
        self.dots.max_dots = Some(max_dots);
        self.supply(Argument::MaxDots)
    }

    /// Field every member (or mapping value) must satisfy
    pub fn value_type(mut self, value_type: Field) -> Self {
        self.value_type = Some(value_type);
        self.supply(Argument::ValueType)
    }

    /// Field every mapping key must satisfy
    pub fn key_type(mut self, key_type: Field) -> Self {
        self.key_type = Some(key_type);
        self.supply(Argument::KeyType)
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self.supply(Argument::Unique)
    }

    /// Schema an object value must provide
    pub fn schema(mut self, schema: Arc<Schema>) -> Self {
        self.schema = Some(schema);
        self.supply(Argument::Schema)
    }

    /// Whether object validation also checks schema invariants (default
    /// `true`)
    pub fn validate_invariants(mut self, validate_invariants: bool) -> Self {
        self.validate_invariants = validate_invariants;
        self.supply(Argument::ValidateInvariants)
    }

    /// Receives before-assignment events instead of the process-wide
    /// observers
    pub fn dispatcher(mut self, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self.supply(Argument::Dispatcher)
    }

    /// Permitted values, as a simple vocabulary
    pub fn values<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self.supply(Argument::Values)
    }

    pub fn vocabulary(mut self, vocabulary: Arc<dyn Source>) -> Self {
        self.vocabulary = Some(vocabulary);
        self.supply(Argument::Vocabulary)
    }

    /// A binder producing the vocabulary for the bound object. Fields built
    /// from clones of the same binder compare equal.
    pub fn source(mut self, binder: SourceBinder) -> Self {
        self.source = Some(VocabularySource::Binder(binder));
        self.supply(Argument::Source)
    }

    /// Name looked up in the vocabulary registry
    pub fn vocabulary_name(mut self, name: impl Into<String>) -> Self {
        self.vocabulary_name = Some(name.into());
        self.supply(Argument::VocabularyName)
    }

    /// Registry used for `vocabulary_name` instead of the process-wide one
    pub fn registry(mut self, registry: Arc<VocabularyRegistry>) -> Self {
        self.registry = Some(registry);
        self.supply(Argument::Registry)
    }

    /// Builds the field. `min`, `max` and the default are validated in that
    /// order, each against the field as configured so far.
    ///
    /// # Errors
    ///
    /// - `SchemaError::UnexpectedArgument` for arguments the type does not take
    /// - `SchemaError::InvalidArgument` for inconsistent arguments
    /// - `SchemaError::Validation` when `min`, `max` or the default is invalid
    pub fn build(mut self) -> SchemaResult<Field> {
        let field_type = self.field_type;
        if let Some(argument) = self.supplied.iter().find(|a| !a.accepted_by(field_type)) {
            return Err(SchemaError::UnexpectedArgument {
                field_type: field_type.name().to_string(),
                argument: argument.as_str().to_string(),
            });
        }
        if self.default.is_some() && self.default_factory.is_some() {
            return Err(SchemaError::invalid_argument(
                "default_factory",
                "cannot specify both a default and a default factory",
            ));
        }

        let kind = self.kind()?;
        let defers_default = matches!(&kind, FieldKind::Choice(spec) if spec.defers_validation());

        let mut field = Field::bare(field_type, kind);
        field.name = self.name.unwrap_or_default();
        field.title = self.title;
        field.description = self.description;
        field.required = self.required;
        field.readonly = self.readonly;
        field.constraint = self.constraint;
        field.default_factory = self.default_factory;
        field.default = self.missing_value.clone();
        field.missing_value = self.missing_value;

        if let Some(min) = self.min {
            field.set_min(min)?;
        }
        if let Some(max) = self.max {
            field.set_max(max)?;
        }
        match self.default {
            Some(default) if defers_default => field.default = default,
            Some(default) => field.set_default(default)?,
            None => {}
        }
        Ok(field)
    }

    fn kind(&mut self) -> SchemaResult<FieldKind> {
        let field_type = self.field_type;
        let length = std::mem::take(&mut self.length);
        let kind = match field_type {
            FieldType::DottedName => {
                if let Some(max_dots) = self.dots.max_dots {
                    if max_dots < self.dots.min_dots {
                        return Err(SchemaError::invalid_argument(
                            "max_dots",
                            "max_dots cannot be less than min_dots",
                        ));
                    }
                }
                FieldKind::Dotted(length, std::mem::take(&mut self.dots))
            }
            _ if field_type.is_orderable() => FieldKind::Ordered(Bounds::default()),
            _ if field_type.is_collection() => {
                let unique = match (field_type.is_set(), self.unique) {
                    (true, Some(false)) => {
                        return Err(SchemaError::invalid_argument("unique", "set fields are always unique"))
                    }
                    (true, _) => true,
                    (false, unique) => unique.unwrap_or(false),
                };
                FieldKind::Collection(CollectionSpec {
                    value_type: self.value_type.take().map(Box::new),
                    unique,
                    length,
                })
            }
            _ if field_type.is_mapping() => FieldKind::Mapping(MappingSpec {
                key_type: self.key_type.take().map(Box::new),
                value_type: self.value_type.take().map(Box::new),
                length,
            }),
            _ if field_type.is_length_bounded() => FieldKind::Sized(length),
            FieldType::Object => {
                let schema = self
                    .schema
                    .take()
                    .ok_or_else(|| SchemaError::invalid_argument("schema", "object fields require a schema"))?;
                FieldKind::Object(ObjectSpec {
                    schema,
                    validate_invariants: self.validate_invariants,
                    dispatcher: self.dispatcher.take(),
                })
            }
            FieldType::Choice => FieldKind::Choice(ChoiceSpec::new(self.vocabulary_source()?, self.registry.take())),
            _ => FieldKind::Plain,
        };
        Ok(kind)
    }

    fn vocabulary_source(&mut self) -> SchemaResult<VocabularySource> {
        let given = [
            self.values.is_some(),
            self.vocabulary.is_some(),
            self.source.is_some(),
            self.vocabulary_name.is_some(),
        ];
        if given.iter().filter(|g| **g).count() != 1 {
            return Err(SchemaError::invalid_argument(
                "vocabulary",
                "exactly one of values, vocabulary, source or vocabulary_name is required",
            ));
        }
        if let Some(values) = self.values.take() {
            return Ok(VocabularySource::Fixed(Arc::new(SimpleVocabulary::from_values(values)?)));
        }
        if let Some(vocabulary) = self.vocabulary.take() {
            return Ok(VocabularySource::Fixed(vocabulary));
        }
        if let Some(name) = self.vocabulary_name.take() {
            return Ok(VocabularySource::Named(name));
        }
        self.source
            .take()
            .ok_or_else(|| SchemaError::invalid_argument("source", "missing vocabulary source"))
    }
}
