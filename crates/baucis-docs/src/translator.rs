//! Schema descriptor to OpenAPI schema translation.
//!
//! Translation never fails. A field whose type has no JSON Schema
//! counterpart is logged and documented as a string so that one exotic path
//! does not hide the rest of the model.

use indexmap::IndexMap;

use crate::controller::capitalize;
use crate::model::{Field, FieldKind, PrimitiveType, SchemaDescriptor, ID_KEY, VERSION_KEY};
use crate::openapi::{Schema, SchemaType};
use crate::selection::Selection;

/// Translates the fields of one resource.
#[derive(Debug, Clone, Copy)]
pub struct SchemaTranslator<'a> {
    resource: &'a str,
    selection: &'a Selection,
}

impl<'a> SchemaTranslator<'a> {
    /// Creates a translator for `resource` filtered by `selection`.
    pub fn new(resource: &'a str, selection: &'a Selection) -> Self {
        Self {
            resource,
            selection,
        }
    }

    /// Returns `true` if the field is hidden from the document.
    pub fn skips(&self, field: &Field) -> bool {
        !field.selected || !self.selection.includes(&field.name)
    }

    /// Translates one field, or `None` if it is skipped.
    ///
    /// `owner` is the name of the component schema that holds the field; it
    /// prefixes the names synthesized for embedded documents.
    pub fn translate_field(&self, field: &Field, owner: &str) -> Option<Schema> {
        if self.skips(field) {
            return None;
        }
        if field.name == VERSION_KEY {
            return Some(Schema::number().with_format("int32"));
        }

        if field.kind.nested_schema().is_some() && field.name != ID_KEY {
            return Some(Schema::array(Schema::component(&nested_name(
                owner,
                &field.name,
            ))));
        }

        let property = match &field.kind {
            FieldKind::Primitive(PrimitiveType::Identifier) | FieldKind::Reference { .. }
                if field.name == ID_KEY =>
            {
                Schema::string()
            }
            FieldKind::Reference { target } => Schema::component(&capitalize(target)),
            FieldKind::Primitive(primitive) => primitive_schema(*primitive),
            FieldKind::Array(items) => Schema::array(
                items
                    .as_deref()
                    .map_or_else(Schema::string, item_schema),
            ),
            FieldKind::Opaque(opaque) => self.unsupported(field, owner, opaque.name()),
            FieldKind::Unknown(type_name) => self.unsupported(field, owner, type_name),
            FieldKind::Nested(_) => self.unsupported(field, owner, "Schema"),
        };
        Some(property)
    }

    /// Builds the component schema for a descriptor.
    ///
    /// The result has no `type`; it only lists properties and the required
    /// names among the fields that survive selection.
    pub fn translate_schema(&self, schema: &SchemaDescriptor, name: &str) -> Schema {
        let mut result = Schema::default();
        for field in schema.fields() {
            let Some(property) = self.translate_field(field, name) else {
                continue;
            };
            result.properties.insert(field.name.clone(), property);
            if field.required {
                result.required.push(field.name.clone());
            }
        }
        result
    }

    /// Builds the schema named `name` followed by one schema per embedded
    /// document, depth first.
    pub fn translate_all(&self, schema: &SchemaDescriptor, name: &str) -> IndexMap<String, Schema> {
        let mut schemas = IndexMap::new();
        self.collect(schema, name, &mut schemas);
        schemas
    }

    fn collect(&self, schema: &SchemaDescriptor, name: &str, out: &mut IndexMap<String, Schema>) {
        out.insert(name.to_string(), self.translate_schema(schema, name));
        for field in schema.fields() {
            if self.skips(field) {
                continue;
            }
            if let Some(nested) = field.kind.nested_schema() {
                self.collect(nested, &nested_name(name, &field.name), out);
            }
        }
    }

    fn unsupported(&self, field: &Field, owner: &str, type_name: &str) -> Schema {
        tracing::warn!(
            resource = %self.resource,
            field = %format!("{owner}.{}", field.name),
            field_type = %type_name,
            "Unsupported field type, documenting as string"
        );
        Schema::string()
    }
}

/// Name of the synthetic schema for an embedded document.
pub fn nested_name(owner: &str, field: &str) -> String {
    format!("{owner}{}", capitalize(field))
}

fn item_schema(kind: &FieldKind) -> Schema {
    match kind {
        // Populated reference arrays are ambiguous on the wire; document ids.
        FieldKind::Reference { .. } => Schema::string(),
        FieldKind::Primitive(primitive) => Schema::typed(primitive_type(*primitive)),
        FieldKind::Array(_) => Schema::typed(SchemaType::Array),
        FieldKind::Nested(_) => Schema::typed(SchemaType::Object),
        FieldKind::Opaque(opaque) => Schema::component(opaque.name()),
        FieldKind::Unknown(type_name) => Schema::component(type_name),
    }
}

fn primitive_type(primitive: PrimitiveType) -> SchemaType {
    match primitive {
        PrimitiveType::Number => SchemaType::Number,
        PrimitiveType::Boolean => SchemaType::Boolean,
        PrimitiveType::String | PrimitiveType::Date | PrimitiveType::Identifier => {
            SchemaType::String
        }
    }
}

fn primitive_schema(primitive: PrimitiveType) -> Schema {
    let schema = Schema::typed(primitive_type(primitive));
    match primitive {
        PrimitiveType::Number => schema.with_format("double"),
        PrimitiveType::Date => schema.with_format("date-time"),
        _ => schema,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OpaqueType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn translate(field: Field) -> serde_json::Value {
        let selection = Selection::All;
        let translator = SchemaTranslator::new("vegetable", &selection);
        serde_json::to_value(translator.translate_field(&field, "Vegetable").unwrap()).unwrap()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(
            translate(Field::number("weight")),
            json!({ "type": "number", "format": "double" })
        );
        assert_eq!(translate(Field::boolean("ripe")), json!({ "type": "boolean" }));
        assert_eq!(translate(Field::string("name")), json!({ "type": "string" }));
        assert_eq!(
            translate(Field::date("picked")),
            json!({ "type": "string", "format": "date-time" })
        );
        assert_eq!(translate(Field::identifier("owner")), json!({ "type": "string" }));
    }

    #[test]
    fn test_version_key_is_int32() {
        assert_eq!(
            translate(Field::number("__v")),
            json!({ "type": "number", "format": "int32" })
        );
        assert_eq!(
            translate(Field::string("__v")),
            json!({ "type": "number", "format": "int32" })
        );
    }

    #[test]
    fn test_id_is_string_even_with_reference() {
        assert_eq!(translate(Field::identifier("_id")), json!({ "type": "string" }));
        assert_eq!(
            translate(Field::reference("_id", "vegetable")),
            json!({ "type": "string" })
        );
    }

    #[test]
    fn test_reference() {
        assert_eq!(
            translate(Field::reference("related", "vegetable")),
            json!({ "$ref": "#/components/schemas/Vegetable" })
        );
    }

    #[test]
    fn test_arrays() {
        assert_eq!(
            translate(Field::array("tags", FieldKind::Primitive(PrimitiveType::String))),
            json!({ "type": "array", "items": { "type": "string" } })
        );
        assert_eq!(
            translate(Field::array("orders", FieldKind::Primitive(PrimitiveType::Number))),
            json!({ "type": "array", "items": { "type": "number" } })
        );
        assert_eq!(
            translate(Field::array(
                "clusters",
                FieldKind::Reference {
                    target: "chargeCluster".to_string()
                }
            )),
            json!({ "type": "array", "items": { "type": "string" } })
        );
        assert_eq!(
            translate(Field::new("bag", FieldKind::Array(None))),
            json!({ "type": "array", "items": { "type": "string" } })
        );
        assert_eq!(
            translate(Field::array("blobs", FieldKind::Opaque(OpaqueType::Buffer))),
            json!({ "type": "array", "items": { "$ref": "#/components/schemas/Buffer" } })
        );
        assert_eq!(
            translate(Field::array("shapes", FieldKind::Unknown("Polygon".to_string()))),
            json!({ "type": "array", "items": { "$ref": "#/components/schemas/Polygon" } })
        );
    }

    #[test]
    fn test_unsupported_falls_back_to_string() {
        assert_eq!(
            translate(Field::new("meta", FieldKind::Opaque(OpaqueType::Mixed))),
            json!({ "type": "string" })
        );
        assert_eq!(
            translate(Field::new("shape", FieldKind::Unknown("Polygon".to_string()))),
            json!({ "type": "string" })
        );
    }

    #[test]
    fn test_nested_field() {
        let inner = SchemaDescriptor::new().field(Field::boolean("bread"));
        assert_eq!(
            translate(Field::nested("stuffed", inner.clone())),
            json!({ "type": "array", "items": { "$ref": "#/components/schemas/VegetableStuffed" } })
        );
        assert_eq!(
            translate(Field::array("stuffed", FieldKind::Nested(inner))),
            json!({ "type": "array", "items": { "$ref": "#/components/schemas/VegetableStuffed" } })
        );
    }

    #[test]
    fn test_skips() {
        let selection = Selection::parse("-password");
        let translator = SchemaTranslator::new("fungus", &selection);

        assert!(translator.skips(&Field::string("password")));
        assert!(translator.skips(&Field::string("secret").deselected()));
        assert!(!translator.skips(&Field::boolean("dork")));
        assert!(translator
            .translate_field(&Field::string("password"), "Fungus")
            .is_none());
    }

    #[test]
    fn test_translate_schema_required_only_for_visible_fields() {
        let schema = SchemaDescriptor::new()
            .field(Field::string("name").required())
            .field(Field::string("secret").required().deselected())
            .field(Field::boolean("ripe"));
        let selection = Selection::All;
        let translator = SchemaTranslator::new("vegetable", &selection);

        let value = serde_json::to_value(translator.translate_schema(&schema, "Vegetable")).unwrap();
        assert_eq!(
            value,
            json!({
                "required": ["name"],
                "properties": {
                    "name": { "type": "string" },
                    "ripe": { "type": "boolean" }
                }
            })
        );
    }

    #[test]
    fn test_translate_schema_omits_empty_required() {
        let schema = SchemaDescriptor::new().field(Field::boolean("ripe"));
        let selection = Selection::All;
        let translator = SchemaTranslator::new("vegetable", &selection);

        let value = serde_json::to_value(translator.translate_schema(&schema, "Vegetable")).unwrap();
        assert!(value.get("required").is_none());
    }

    #[test]
    fn test_translate_all_recurses_into_nested() {
        let filling = SchemaDescriptor::new().field(Field::string("herb"));
        let stuffing = SchemaDescriptor::new()
            .field(Field::boolean("bread"))
            .field(Field::nested("filling", filling))
            .with_subdocument_keys();
        let goose = SchemaDescriptor::new()
            .field(Field::boolean("cooked"))
            .field(Field::array("stuffed", FieldKind::Nested(stuffing)))
            .with_document_keys();

        let selection = Selection::All;
        let translator = SchemaTranslator::new("goose", &selection);
        let schemas = translator.translate_all(&goose, "Goose");

        let names: Vec<&str> = schemas.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Goose", "GooseStuffed", "GooseStuffedFilling"]);

        let stuffed: Vec<&str> = schemas["GooseStuffed"]
            .properties
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(stuffed, vec!["bread", "filling", "_id", "id"]);
        assert_eq!(
            schemas["GooseStuffed"].properties["filling"]
                .items
                .as_ref()
                .unwrap()
                .reference
                .as_deref(),
            Some("#/components/schemas/GooseStuffedFilling")
        );
    }

    #[test]
    fn test_skipped_nested_field_has_no_schema() {
        let inner = SchemaDescriptor::new().field(Field::boolean("bread"));
        let goose = SchemaDescriptor::new()
            .field(Field::nested("stuffed", inner))
            .field(Field::boolean("cooked"));

        let selection = Selection::parse("-stuffed");
        let translator = SchemaTranslator::new("goose", &selection);
        let schemas = translator.translate_all(&goose, "Goose");

        assert_eq!(schemas.len(), 1);
        assert!(!schemas["Goose"].properties.contains_key("stuffed"));
    }
}
