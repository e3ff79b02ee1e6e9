//! Integration tests for full document generation.
//!
//! The fixture mirrors a small garden API: vegetables with hidden paths,
//! fungi restricted by a selection expression, geese with embedded
//! stuffing, and charge areas holding arrays of primitives and references.

use baucis_docs::{
    ControllerRegistry, ControllerSource, DocsError, DocumentCache, Field, FieldKind, OpenApi,
    OpenApiOptions, PathItem, PrimitiveType, ResourceController, Schema, SchemaDescriptor,
    ServerVariables,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn vegetable() -> ResourceController {
    ResourceController::new(
        "vegetable",
        SchemaDescriptor::new()
            .field(Field::string("name").required())
            .field(
                Field::array("diseases", FieldKind::Primitive(PrimitiveType::String)).deselected(),
            )
            .field(Field::string("species").deselected())
            .field(Field::reference("related", "vegetable"))
            .with_document_keys(),
    )
}

fn fungus() -> ResourceController {
    ResourceController::new(
        "fungus",
        SchemaDescriptor::new()
            .field(Field::boolean("dork"))
            .field(Field::string("hyphenated-field-name"))
            .field(Field::string("password"))
            .with_document_keys(),
    )
    .plural("fungi")
    .select("-hyphenated-field-name -password")
}

fn goose() -> ResourceController {
    let stuffing = SchemaDescriptor::new()
        .field(Field::boolean("bread"))
        .with_subdocument_keys();
    ResourceController::new(
        "goose",
        SchemaDescriptor::new()
            .field(Field::boolean("cooked"))
            .field(Field::array("stuffed", FieldKind::Nested(stuffing)))
            .with_document_keys(),
    )
    .plural("geese")
}

fn charge_area() -> ResourceController {
    ResourceController::new(
        "chargeArea",
        SchemaDescriptor::new()
            .field(Field::string("name").required())
            .field(Field::array("tags", FieldKind::Primitive(PrimitiveType::String)))
            .field(Field::array("orders", FieldKind::Primitive(PrimitiveType::Number)))
            .field(Field::array(
                "clusters",
                FieldKind::Reference {
                    target: "ChargeCluster".to_string(),
                },
            ))
            .with_document_keys(),
    )
}

fn charge_cluster() -> ResourceController {
    ResourceController::new(
        "chargeCluster",
        SchemaDescriptor::new()
            .field(Field::string("name").required())
            .with_document_keys(),
    )
}

/// All fixture controllers, with an overlay on the vegetable controller.
fn registry() -> ControllerRegistry {
    let mut vegetable = vegetable();
    let overlay = vegetable.overlay_mut();
    overlay.extensions.insert("lambic".to_string(), json!("kriek"));
    let star_trek: PathItem = serde_json::from_value(json!({
        "get": {
            "operationId": "enterprise",
            "responses": { "200": { "description": "Successful response." } }
        }
    }))
    .unwrap();
    overlay.paths.insert("/starkTrek".to_string(), star_trek);
    overlay.schemas.insert("Spook".to_string(), Schema::default());

    let mut registry = ControllerRegistry::new();
    for controller in [vegetable, fungus(), goose(), charge_area(), charge_cluster()] {
        registry.register(controller).unwrap();
    }
    registry
}

fn customized_cache(source: &dyn ControllerSource) -> DocumentCache {
    let server_vars = || {
        ServerVariables::new()
            .add_server_var(
                "user",
                &["demo", "joe", "alicia"],
                "alicia",
                Some("User name for authentication."),
            )
            .add_server_var("env", &["dev", "qa", "prod"], "qa", Some("Development to test."))
    };
    let options = OpenApiOptions::new()
        .title("my app")
        .version("3.14.15")
        .description("OpenAPI 3.0.0 sample doc.")
        .contact("Pedro J. Molina", "http://pjmolina.com", "pjmolina@acme.com")
        .add_server("http://api1.acme.com", Some("My prod server"), Some(server_vars()))
        .add_server("http://api2.acme.com/qa", Some("My QA server"), Some(server_vars()))
        .add_security_scheme_basic_auth("authentication_basic")
        .add_security_jwt("authentication_jwt")
        .add_security_scheme_api_key("authentication_apikey", None)
        .license("Apache 2", "http://apache.org")
        .terms_of_service("My TOS")
        .build();

    let cache = DocumentCache::new(options);
    cache
        .customize_root(source, |doc| {
            doc.extensions
                .insert("x-powered-by".to_string(), json!("baucis"));
            doc.components.schemas.insert(
                "customDefinition".to_string(),
                Schema::default().property("a", Schema::string()),
            );
        })
        .unwrap();
    cache
}

/// The default-release document as JSON.
fn document() -> Value {
    let source = registry();
    let cache = customized_cache(&source);
    let doc: OpenApi = cache.versioned(&source, source.default_release()).unwrap();
    serde_json::to_value(&doc).unwrap()
}

/// Header fields come from the builder and the root customization.
#[test]
fn test_header() {
    let body = document();
    assert_eq!(body["openapi"], "3.0.0");
    assert_eq!(body["x-powered-by"], "baucis");
    assert_eq!(body["info"]["title"], "my app");
    assert_eq!(body["info"]["version"], "3.14.15");
    assert_eq!(body["servers"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["servers"][0]["variables"]["user"]["enum"],
        json!(["demo", "joe", "alicia"])
    );
    assert!(body.get("security").is_none());
    assert_eq!(
        body["components"]["securitySchemes"]["authentication_apikey"],
        json!({ "type": "apiKey", "name": "authentication_apikey", "in": "header" })
    );
}

/// One tag per resource, in registration order.
#[test]
fn test_tags_follow_registration_order() {
    let body = document();
    let tags: Vec<&str> = body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        tags,
        vec!["vegetable", "fungus", "goose", "chargeArea", "chargeCluster"]
    );
    assert_eq!(body["tags"][2]["description"], "Goose resource.");
    assert_eq!(body["tags"][2]["x-resource"], true);
}

/// Each resource contributes an instance path and a collection path.
#[test]
fn test_every_resource_has_two_paths_with_fixed_operation_ids() {
    let body = document();
    for (plural, key) in [
        ("vegetables", "Vegetable"),
        ("fungi", "Fungus"),
        ("geese", "Goose"),
        ("chargeAreas", "ChargeArea"),
        ("chargeClusters", "ChargeCluster"),
    ] {
        let instance = &body["paths"][format!("/{plural}/{{id}}")];
        assert_eq!(instance["get"]["operationId"], format!("get{key}ById"));
        assert_eq!(instance["put"]["operationId"], format!("update{key}"));
        assert_eq!(instance["delete"]["operationId"], format!("delete{key}ById"));
        assert!(instance.get("post").is_none());

        let collection = &body["paths"][format!("/{plural}")];
        assert_eq!(collection["get"]["operationId"], format!("query{key}"));
        assert_eq!(collection["post"]["operationId"], format!("create{key}"));
        assert_eq!(collection["delete"]["operationId"], format!("delete{key}ByQuery"));
        assert!(collection.get("put").is_none());
    }
}

/// Summaries and parameter references for the vegetable paths.
#[test]
fn test_vegetable_operations() {
    let body = document();
    let instance = &body["paths"]["/vegetables/{id}"];
    assert_eq!(instance["get"]["summary"], "Get a vegetable by its unique ID");
    assert_eq!(instance["get"]["description"], "Retrieve a vegetable by its ID.");
    assert!(instance["get"].get("parameters").is_none());
    assert!(instance["get"].get("security").is_none());
    assert_eq!(
        instance["parameters"],
        json!([
            { "$ref": "#/components/parameters/select" },
            { "$ref": "#/components/parameters/populate" },
            { "$ref": "#/components/parameters/id" }
        ])
    );

    assert_eq!(
        instance["put"]["parameters"],
        json!([{ "$ref": "#/components/parameters/X-Baucis-Update-Operator" }])
    );
    assert_eq!(
        instance["put"]["requestBody"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/Vegetable"
    );

    let collection = &body["paths"]["/vegetables"];
    assert_eq!(collection["get"]["summary"], "Query some vegetables");
    assert_eq!(collection["get"]["parameters"].as_array().unwrap().len(), 7);
    assert_eq!(collection["delete"]["parameters"].as_array().unwrap().len(), 6);
    assert_eq!(
        collection["parameters"][2],
        json!({ "$ref": "#/components/parameters/sort" })
    );
}

/// Response tables for reads and writes.
#[test]
fn test_error_responses() {
    let body = document();
    let instance = &body["paths"]["/vegetables/{id}"]["get"]["responses"];
    assert_eq!(instance["404"]["description"], "No vegetable was found with that ID.");
    assert_eq!(instance["200"]["description"], "Successful response. Single resource.");
    assert_eq!(instance["default"]["description"], "Unexpected error.");
    assert_eq!(instance.as_object().unwrap().len(), 3);

    let create = &body["paths"]["/vegetables"]["post"]["responses"];
    assert_eq!(create["404"]["description"], "No vegetables matched that query.");
    assert_eq!(create["422"]["description"], "Validation error.");
    assert_eq!(
        create["422"]["content"]["application/json"]["schema"]["items"]["$ref"],
        "#/components/schemas/ValidationError"
    );
    assert_eq!(
        create["200"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/Vegetable"
    );
    assert_eq!(create.as_object().unwrap().len(), 4);

    let update = &body["paths"]["/vegetables/{id}"]["put"]["responses"];
    assert!(update.get("422").is_some());
}

/// Component schemas honor hidden paths and selection expressions.
#[test]
fn test_schema_definitions() {
    let body = document();
    let schemas = &body["components"]["schemas"];

    let vegetable = &schemas["Vegetable"];
    assert_eq!(vegetable["required"], json!(["name"]));
    assert_eq!(vegetable["properties"]["name"]["type"], "string");
    assert_eq!(
        vegetable["properties"]["related"]["$ref"],
        "#/components/schemas/Vegetable"
    );
    assert!(vegetable["properties"].get("diseases").is_none());
    assert!(vegetable["properties"].get("species").is_none());
    assert_eq!(vegetable["properties"].as_object().unwrap().len(), 5);

    let fungus = &schemas["Fungus"];
    assert!(fungus.get("required").is_none());
    assert_eq!(fungus["properties"]["dork"]["type"], "boolean");
    assert_eq!(fungus["properties"]["_id"]["type"], "string");
    assert_eq!(
        fungus["properties"]["__v"],
        json!({ "type": "number", "format": "int32" })
    );
    assert_eq!(fungus["properties"]["id"]["type"], "string");
    assert!(fungus["properties"].get("hyphenated-field-name").is_none());
    assert!(fungus["properties"].get("password").is_none());
    assert_eq!(fungus["properties"].as_object().unwrap().len(), 4);

    let goose = &schemas["Goose"];
    assert_eq!(
        goose["properties"]["stuffed"],
        json!({ "type": "array", "items": { "$ref": "#/components/schemas/GooseStuffed" } })
    );
    assert_eq!(goose["properties"].as_object().unwrap().len(), 5);

    let stuffed = &schemas["GooseStuffed"];
    assert!(stuffed.get("required").is_none());
    assert_eq!(stuffed["properties"]["bread"]["type"], "boolean");
    assert_eq!(stuffed["properties"]["_id"]["type"], "string");
    assert_eq!(stuffed["properties"]["id"]["type"], "string");
    assert_eq!(stuffed["properties"].as_object().unwrap().len(), 3);
}

/// Arrays of primitives keep their item type; arrays of references document ids.
#[test]
fn test_arrays_of_primitives_and_references() {
    let body = document();
    let area = &body["components"]["schemas"]["ChargeArea"]["properties"];
    assert_eq!(area["tags"], json!({ "type": "array", "items": { "type": "string" } }));
    assert_eq!(area["orders"], json!({ "type": "array", "items": { "type": "number" } }));
    assert_eq!(area["clusters"], json!({ "type": "array", "items": { "type": "string" } }));
}

/// Controller overlays contribute paths and schemas but not other keys.
#[test]
fn test_controller_extension_points() {
    let body = document();
    assert!(body.get("lambic").is_none());
    assert_eq!(body["paths"]["/starkTrek"]["get"]["operationId"], "enterprise");
    assert!(body["components"]["schemas"].get("Spook").is_some());
}

/// Edits to the root survive versioned generation.
#[test]
fn test_root_extensions_preserved() {
    let body = document();
    assert_eq!(
        body["components"]["schemas"]["customDefinition"],
        json!({ "properties": { "a": { "type": "string" } } })
    );
}

/// The shared parameter catalog is published under components.
#[test]
fn test_parameter_catalog() {
    let body = document();
    let skip = &body["components"]["parameters"]["skip"];
    assert_eq!(
        skip,
        &json!({
            "name": "skip",
            "in": "query",
            "description": "How many documents to skip. [doc](https://github.com/wprl/baucis/wiki/Query-String-Parameters#skip)",
            "required": false,
            "schema": { "type": "integer", "format": "int32" }
        })
    );

    let header = &body["components"]["parameters"]["X-Baucis-Update-Operator"];
    assert_eq!(header["in"], "header");
    assert_eq!(header["required"], false);

    let id = &body["components"]["parameters"]["id"];
    assert_eq!(id["in"], "path");
    assert_eq!(id["required"], true);
}

/// Every `$ref` resolves and no operation id repeats.
#[test]
fn test_references_resolve_and_ids_are_unique() {
    let source = registry();
    let cache = customized_cache(&source);
    let doc = cache.versioned(&source, "0.0.1").unwrap();
    assert!(doc.dangling_references().unwrap().is_empty());
    assert!(doc.ensure_unique_operation_ids().is_ok());
}

/// The served JSON parses back into the same document.
#[test]
fn test_document_json_roundtrip() {
    let source = registry();
    let cache = customized_cache(&source);
    let doc = cache.versioned(&source, "0.0.1").unwrap();
    let parsed = OpenApi::from_json(&doc.to_json_pretty().unwrap()).unwrap();
    assert_eq!(parsed, doc);
}

/// Release-only controllers that reuse a root operation id are rejected,
/// while every other release still serves a document with unique ids.
#[test]
fn test_versioned_documents_keep_operation_ids_unique() {
    let mut source = registry();
    source
        .register(
            ResourceController::new("mineral", SchemaDescriptor::new().field(Field::string("color")))
                .releases(["1.5.0"]),
        )
        .unwrap();
    source
        .register(vegetable().plural("veggies").releases(["2.0.0"]))
        .unwrap();
    let cache = customized_cache(&source);

    for release in ["0.0.1", "1.5.0", "9.9.9"] {
        let doc = cache.versioned(&source, release).unwrap();
        assert!(doc.ensure_unique_operation_ids().is_ok(), "release {release}");
    }

    let err = cache.versioned(&source, "2.0.0").unwrap_err();
    assert!(matches!(err, DocsError::DuplicateOperationId { .. }));
}

/// Readers in many threads share one root while another thread
/// regenerates it; every document they see is complete.
#[test]
fn test_concurrent_versioning_and_regeneration() {
    let source = registry();
    let cache = DocumentCache::default();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..20 {
                    let doc = cache.versioned(&source, "0.0.1").unwrap();
                    assert!(doc.paths.contains_key("/vegetables/{id}"));
                    assert!(doc.ensure_unique_operation_ids().is_ok());
                }
            });
        }
        s.spawn(|| {
            for i in 0..10 {
                let title = format!("garden {i}");
                cache
                    .regenerate(&source, Some(OpenApiOptions::new().title(&title).build()))
                    .unwrap();
                cache.invalidate();
            }
        });
    });

    let root = cache.root(&source).unwrap();
    assert_eq!(root.info.title.as_deref(), Some("garden 9"));
}

/// A registry loaded from JSON documents the same way as one built in code.
#[test]
fn test_registry_from_collaborator_json() {
    let json = r#"[
        {
            "singularName": "vegetable",
            "pluralName": "vegetables",
            "schema": {
                "paths": {
                    "name": { "type": "String", "required": true },
                    "diseases": { "type": "Array", "items": { "type": "String" }, "select": false },
                    "related": { "type": "ObjectId", "ref": "vegetable" },
                    "_id": { "type": "ObjectId" },
                    "__v": { "type": "Number" }
                },
                "virtuals": { "id": {} }
            }
        }
    ]"#;
    let registry = ControllerRegistry::from_json(json).unwrap();
    let cache = DocumentCache::default();
    let doc = cache.versioned(&registry, "0.0.1").unwrap();

    let vegetable = serde_json::to_value(&doc.components.schemas["Vegetable"]).unwrap();
    assert_eq!(
        vegetable,
        json!({
            "required": ["name"],
            "properties": {
                "name": { "type": "string" },
                "related": { "$ref": "#/components/schemas/Vegetable" },
                "_id": { "type": "string" },
                "__v": { "type": "number", "format": "int32" },
                "id": { "type": "string" }
            }
        })
    );
    assert_eq!(doc.info.version.as_deref(), Some("0.0.1"));
}

proptest! {
    /// Fields excluded by the selection expression never reach the schema.
    #[test]
    fn excluded_fields_never_documented(
        names in proptest::collection::btree_set("[a-z][a-zA-Z0-9-]{0,10}", 1..8),
        mask in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let excluded: Vec<&String> = names
            .iter()
            .zip(&mask)
            .filter_map(|(n, hide)| hide.then_some(n))
            .collect();
        let expression = excluded
            .iter()
            .map(|n| format!("-{n}"))
            .collect::<Vec<_>>()
            .join(" ");

        let schema = names
            .iter()
            .fold(SchemaDescriptor::new(), |s, n| s.field(Field::string(n.clone())));
        let controller = ResourceController::new("thing", schema).select(&expression);
        let fragment = controller.fragment();
        let properties = &fragment.schemas["Thing"].properties;

        for name in &names {
            prop_assert_eq!(properties.contains_key(name), !excluded.contains(&name));
        }
    }
}
