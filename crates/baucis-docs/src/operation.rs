//! Operation synthesis for the CRUD verbs of a resource.

use std::fmt;

use indexmap::IndexMap;

use crate::controller::{capitalize, ResourceController};
use crate::openapi::{MediaType, Operation, RequestBody, Response, Schema};
use crate::parameters::operation_parameters;

const JSON: &str = "application/json";

/// HTTP verbs a controller documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Read.
    Get,
    /// Replace or update.
    Put,
    /// Create.
    Post,
    /// Remove.
    Delete,
}

impl Verb {
    /// Lowercase method name as used for path item keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
        }
    }

    /// Whether the verb carries a validated document.
    pub fn validates(self) -> bool {
        matches!(self, Self::Put | Self::Post)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an operation addresses one document or a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationMode {
    /// `/plural/{id}`.
    Instance,
    /// `/plural`.
    Collection,
}

impl OperationMode {
    /// Verbs routed for this mode, in document order.
    pub fn verbs(self) -> [Verb; 3] {
        match self {
            Self::Instance => [Verb::Get, Verb::Put, Verb::Delete],
            Self::Collection => [Verb::Get, Verb::Post, Verb::Delete],
        }
    }
}

/// Builds the operation for `verb` on the `mode` path of `controller`.
pub fn build_operation(controller: &ResourceController, mode: OperationMode, verb: Verb) -> Operation {
    let singular = controller.singular_name();
    let plural = controller.plural_name();
    let key = capitalize(singular);

    let (operation_id, summary, description) = match (mode, verb) {
        (OperationMode::Instance, Verb::Get) => (
            format!("get{key}ById"),
            format!("Get a {singular} by its unique ID"),
            format!("Retrieve a {singular} by its ID."),
        ),
        (OperationMode::Instance, Verb::Put) => (
            format!("update{key}"),
            format!("Modify a {singular} by its unique ID"),
            format!("Update an existing {singular} by its ID."),
        ),
        (OperationMode::Instance, Verb::Post) => (
            format!("create{key}ById"),
            format!("Create a {singular} with a given ID"),
            format!("Create a {singular} under the given ID."),
        ),
        (OperationMode::Instance, Verb::Delete) => (
            format!("delete{key}ById"),
            format!("Delete a {singular} by its unique ID"),
            format!("Deletes an existing {singular} by its ID."),
        ),
        (OperationMode::Collection, Verb::Get) => (
            format!("query{key}"),
            format!("Query some {plural}"),
            format!("Query over {plural}."),
        ),
        (OperationMode::Collection, Verb::Put) => (
            format!("update{key}ByQuery"),
            format!("Modify some {plural} by query"),
            format!("Update all {plural} matching the specified query."),
        ),
        (OperationMode::Collection, Verb::Post) => (
            format!("create{key}"),
            format!("Create some {plural}"),
            format!("Create one or more {plural}."),
        ),
        (OperationMode::Collection, Verb::Delete) => (
            format!("delete{key}ByQuery"),
            format!("Delete some {plural} by query"),
            format!("Delete all {plural} matching the specified query."),
        ),
    };

    Operation {
        tags: vec![singular.to_string()],
        summary: Some(summary),
        description: Some(description),
        operation_id: Some(operation_id),
        parameters: operation_parameters(mode, verb),
        request_body: request_body(mode, verb, singular, &key),
        responses: responses(mode, verb, singular, plural, &key),
        deprecated: false,
        security: None,
        extensions: IndexMap::new(),
    }
}

fn json_content(schema: Schema) -> IndexMap<String, MediaType> {
    IndexMap::from([(
        JSON.to_string(),
        MediaType {
            schema: Some(schema),
            example: None,
        },
    )])
}

fn request_body(mode: OperationMode, verb: Verb, singular: &str, key: &str) -> Option<RequestBody> {
    if mode != OperationMode::Instance || !verb.validates() {
        return None;
    }
    let action = if verb == Verb::Put { "Update" } else { "Create" };
    Some(RequestBody {
        description: Some(format!(
            "{action} a {singular} by sending the paths to be updated in the request body."
        )),
        content: json_content(Schema::component(key)),
        required: false,
    })
}

fn response(description: impl Into<String>, schema: Schema) -> Response {
    Response {
        description: description.into(),
        headers: IndexMap::new(),
        content: json_content(schema),
    }
}

fn responses(
    mode: OperationMode,
    verb: Verb,
    singular: &str,
    plural: &str,
    key: &str,
) -> IndexMap<String, Response> {
    let mut responses = IndexMap::new();
    responses.insert(
        "default".to_string(),
        response("Unexpected error.", Schema::string()),
    );

    let success = if mode == OperationMode::Instance || verb == Verb::Post {
        response("Successful response. Single resource.", Schema::component(key))
    } else {
        response(
            "Successful response. Collection of resources.",
            Schema::array(Schema::component(key)),
        )
    };
    responses.insert("200".to_string(), success);

    let not_found = match mode {
        OperationMode::Instance => format!("No {singular} was found with that ID."),
        OperationMode::Collection => format!("No {plural} matched that query."),
    };
    responses.insert("404".to_string(), response(not_found, Schema::string()));

    if verb.validates() {
        responses.insert(
            "422".to_string(),
            response(
                "Validation error.",
                Schema::array(Schema::component("ValidationError")),
            ),
        );
    }
    responses
}
