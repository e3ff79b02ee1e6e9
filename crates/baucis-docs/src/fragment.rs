//! Per-controller document fragments.

use indexmap::IndexMap;
use serde_json::Value;

use crate::controller::{capitalize, ControllerFragment, ResourceController};
use crate::openapi::{PathItem, Tag};
use crate::operation::{build_operation, OperationMode, Verb};
use crate::parameters::path_parameters;
use crate::translator::SchemaTranslator;

/// Path of the collection, e.g. `/vegetables`.
pub fn collection_path(controller: &ResourceController) -> String {
    format!("/{}", controller.plural_name())
}

/// Path of a single document, e.g. `/vegetables/{id}`.
pub fn instance_path(controller: &ResourceController) -> String {
    format!("/{}/{{id}}", controller.plural_name())
}

fn path_item(controller: &ResourceController, mode: OperationMode) -> PathItem {
    let mut item = PathItem {
        parameters: path_parameters(mode),
        ..Default::default()
    };
    for verb in mode.verbs() {
        let operation = Some(build_operation(controller, mode, verb));
        match verb {
            Verb::Get => item.get = operation,
            Verb::Put => item.put = operation,
            Verb::Post => item.post = operation,
            Verb::Delete => item.delete = operation,
        }
    }
    item
}

/// Generates the paths and schemas of one controller, then lays the
/// controller's overlay on top.
pub fn build_fragment(controller: &ResourceController) -> ControllerFragment {
    let name = controller.schema_name();
    let translator = SchemaTranslator::new(controller.singular_name(), controller.selection());

    let mut schemas = translator.translate_all(controller.schema(), &name);

    let mut paths = IndexMap::new();
    paths.insert(
        instance_path(controller),
        path_item(controller, OperationMode::Instance),
    );
    paths.insert(
        collection_path(controller),
        path_item(controller, OperationMode::Collection),
    );

    let overlay = controller.overlay();
    paths.extend(overlay.paths.clone());
    schemas.extend(overlay.schemas.clone());

    tracing::debug!(
        resource = %controller.singular_name(),
        paths = paths.len(),
        schemas = schemas.len(),
        "Generated controller fragment"
    );

    ControllerFragment {
        paths,
        schemas,
        extensions: overlay.extensions.clone(),
    }
}

/// The tag describing a controller's resource.
pub fn resource_tag(controller: &ResourceController) -> Tag {
    let singular = controller.singular_name();
    Tag {
        name: singular.to_string(),
        description: Some(format!("{} resource.", capitalize(singular))),
        external_docs: None,
        extensions: IndexMap::from([("x-resource".to_string(), Value::Bool(true))]),
    }
}
