//! Schema descriptors supplied by the data-modeling layer.
//!
//! The translator never sees the ODM's own type handles. Instead the
//! collaborator hands over a [`SchemaDescriptor`]: an ordered list of
//! [`Field`]s, each tagged with a closed [`FieldKind`].
//!
//! Descriptors can be built in code or deserialized from the JSON shape the
//! routing layer exports:
//!
//! ```json
//! {
//!   "paths": {
//!     "name": { "type": "String", "required": true },
//!     "related": { "type": "ObjectId", "ref": "vegetable" }
//!   },
//!   "virtuals": { "id": {} }
//! }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

/// Name of the document identifier path.
pub const ID_KEY: &str = "_id";

/// Name of the ODM's internal version counter path.
pub const VERSION_KEY: &str = "__v";

/// Name of the identifier virtual added to every document.
pub const ID_VIRTUAL: &str = "id";

/// Scalar types with a direct JSON Schema counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Floating point number.
    Number,
    /// Boolean.
    Boolean,
    /// Plain string.
    String,
    /// Timestamp, serialized as an RFC 3339 string.
    Date,
    /// Document identifier, serialized as a string.
    Identifier,
}

/// Types that carry no JSON Schema `type` of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueType {
    /// Schemaless value.
    Mixed,
    /// Plain object literal.
    Object,
    /// Binary data.
    Buffer,
}

impl OpaqueType {
    /// The type name as the ODM spells it.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mixed => "Mixed",
            Self::Object => "Object",
            Self::Buffer => "Buffer",
        }
    }
}

/// The shape of a single schema path.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A scalar value.
    Primitive(PrimitiveType),
    /// An identifier pointing at another resource.
    Reference {
        /// Singular name of the referenced resource.
        target: String,
    },
    /// An embedded sub-schema.
    Nested(SchemaDescriptor),
    /// An array; `None` when the element type is unknown.
    Array(Option<Box<FieldKind>>),
    /// A value without a schema type.
    Opaque(OpaqueType),
    /// A type name the adapter did not recognize.
    Unknown(String),
}

impl FieldKind {
    /// Returns the embedded schema, whether declared directly or as an array
    /// of sub-documents.
    pub fn nested_schema(&self) -> Option<&SchemaDescriptor> {
        match self {
            Self::Nested(schema) => Some(schema),
            Self::Array(Some(inner)) => match inner.as_ref() {
                Self::Nested(schema) => Some(schema),
                _ => None,
            },
            _ => None,
        }
    }

    /// Maps an ODM type name onto a kind.
    ///
    /// Unrecognized names are kept as [`FieldKind::Unknown`] so that a single
    /// exotic field never prevents the rest of the model from loading.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "Number" | "Decimal128" => Self::Primitive(PrimitiveType::Number),
            "Boolean" => Self::Primitive(PrimitiveType::Boolean),
            "String" => Self::Primitive(PrimitiveType::String),
            "Date" => Self::Primitive(PrimitiveType::Date),
            "ObjectId" | "Oid" => Self::Primitive(PrimitiveType::Identifier),
            "Array" => Self::Array(None),
            "Mixed" => Self::Opaque(OpaqueType::Mixed),
            "Object" => Self::Opaque(OpaqueType::Object),
            "Buffer" => Self::Opaque(OpaqueType::Buffer),
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// A named schema path.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Path name.
    pub name: String,
    /// Path type.
    pub kind: FieldKind,
    /// Whether the path is required on write.
    pub required: bool,
    /// `false` when the schema hides the path from query results.
    pub selected: bool,
    /// Whether the path is a computed virtual.
    pub is_virtual: bool,
}

impl Field {
    /// Creates a selected, optional, non-virtual field.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            selected: true,
            is_virtual: false,
        }
    }

    /// Creates a string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveType::String))
    }

    /// Creates a number field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveType::Number))
    }

    /// Creates a boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveType::Boolean))
    }

    /// Creates a date field.
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveType::Date))
    }

    /// Creates an identifier field.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveType::Identifier))
    }

    /// Creates a reference to another resource.
    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Reference {
                target: target.into(),
            },
        )
    }

    /// Creates an embedded sub-schema field.
    pub fn nested(name: impl Into<String>, schema: SchemaDescriptor) -> Self {
        Self::new(name, FieldKind::Nested(schema))
    }

    /// Creates an array field with the given element kind.
    pub fn array(name: impl Into<String>, items: FieldKind) -> Self {
        Self::new(name, FieldKind::Array(Some(Box::new(items))))
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Hides the field from query results.
    #[must_use]
    pub fn deselected(mut self) -> Self {
        self.selected = false;
        self
    }

    /// Marks the field as a virtual.
    #[must_use]
    pub fn into_virtual(mut self) -> Self {
        self.is_virtual = true;
        self
    }
}

/// Ordered collection of schema paths: document paths first, then virtuals.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct SchemaDescriptor {
    fields: Vec<Field>,
}

impl SchemaDescriptor {
    /// Creates an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, keeping document paths ahead of virtuals.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.push(field);
        self
    }

    /// Appends a field as a virtual.
    #[must_use]
    pub fn virtual_field(self, field: Field) -> Self {
        self.field(field.into_virtual())
    }

    /// Adds the keys the ODM puts on every top-level document:
    /// `_id`, `__v` and the `id` virtual.
    #[must_use]
    pub fn with_document_keys(self) -> Self {
        self.field(Field::identifier(ID_KEY))
            .field(Field::number(VERSION_KEY))
            .virtual_field(Field::string(ID_VIRTUAL))
    }

    /// Adds the keys the ODM puts on every embedded document:
    /// `_id` and the `id` virtual.
    #[must_use]
    pub fn with_subdocument_keys(self) -> Self {
        self.field(Field::identifier(ID_KEY))
            .virtual_field(Field::string(ID_VIRTUAL))
    }

    /// All fields in translation order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Document paths only.
    pub fn paths(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_virtual)
    }

    /// Virtual paths only.
    pub fn virtuals(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_virtual)
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the descriptor has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push(&mut self, field: Field) {
        if field.is_virtual {
            self.fields.push(field);
        } else {
            let at = self
                .fields
                .iter()
                .position(|f| f.is_virtual)
                .unwrap_or(self.fields.len());
            self.fields.insert(at, field);
        }
    }
}

/// Wire form of a schema descriptor.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    #[serde(default)]
    paths: IndexMap<String, RawField>,
    #[serde(default)]
    virtuals: IndexMap<String, RawField>,
}

/// Wire form of a schema path.
#[derive(Debug, Default, Deserialize)]
struct RawField {
    #[serde(default, rename = "type")]
    type_name: Option<String>,
    #[serde(default, rename = "ref")]
    reference: Option<String>,
    #[serde(default)]
    items: Option<Box<RawField>>,
    #[serde(default)]
    schema: Option<serde_json::Value>,
    #[serde(default)]
    required: bool,
    #[serde(default = "default_select")]
    select: bool,
}

fn default_select() -> bool {
    true
}

impl TryFrom<RawSchema> for SchemaDescriptor {
    type Error = String;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        let mut schema = Self::new();
        for (name, field) in raw.paths {
            let kind = field.kind()?;
            schema.push(field.into_field(name, kind, false));
        }
        for (name, field) in raw.virtuals {
            let kind = field.kind()?;
            schema.push(field.into_field(name, kind, true));
        }
        Ok(schema)
    }
}

impl RawField {
    fn kind(&self) -> Result<FieldKind, String> {
        if let Some(nested) = &self.schema {
            let schema: SchemaDescriptor =
                serde_json::from_value(nested.clone()).map_err(|e| e.to_string())?;
            return Ok(FieldKind::Nested(schema));
        }

        let Some(type_name) = self.type_name.as_deref() else {
            // Virtuals rarely declare a type; they surface as strings.
            return Ok(match &self.items {
                Some(items) => FieldKind::Array(Some(Box::new(items.kind()?))),
                None => FieldKind::Primitive(PrimitiveType::String),
            });
        };

        let kind = match FieldKind::from_type_name(type_name) {
            FieldKind::Primitive(PrimitiveType::Identifier) => match &self.reference {
                Some(target) => FieldKind::Reference {
                    target: target.clone(),
                },
                None => FieldKind::Primitive(PrimitiveType::Identifier),
            },
            FieldKind::Array(_) => match &self.items {
                Some(items) => match items.kind()? {
                    FieldKind::Nested(schema) => FieldKind::Nested(schema),
                    inner => FieldKind::Array(Some(Box::new(inner))),
                },
                None => FieldKind::Array(None),
            },
            other => other,
        };
        Ok(kind)
    }

    fn into_field(self, name: String, kind: FieldKind, is_virtual: bool) -> Field {
        Field {
            name,
            kind,
            required: self.required,
            selected: self.select,
            is_virtual,
        }
    }
}
