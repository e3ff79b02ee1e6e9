//! Assembly of the root document and its per-release specializations.
//!
//! Only the `paths` and `schemas` of a controller fragment ever reach a
//! document. Other keys a collaborator hangs on a fragment stay there.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::controller::ResourceController;
use crate::error::{DocsError, DocsResult};
use crate::fragment::resource_tag;
use crate::openapi::{Info, OpenApi, Schema, Server};
use crate::options::CustomizationOptions;
use crate::parameters::common_parameters;

/// Title used when the customization input has none.
pub const DEFAULT_TITLE: &str = "api";

/// Description used when the customization input has none.
pub const DEFAULT_DESCRIPTION: &str = "Baucis generated OpenAPI v.3 documentation.";

/// Server URL used when the customization input lists no servers.
pub const DEFAULT_SERVER_URL: &str = "/api";

/// Strips the last `extra` segments from a request path.
///
/// `base_path("/api/openapi.json", 1)` is `/api`.
pub fn base_path(url: &str, extra: usize) -> String {
    let path = url.split(&['?', '#'][..]).next().unwrap_or_default();
    let mut parts: Vec<&str> = path.split('/').collect();
    parts.truncate(parts.len().saturating_sub(extra));
    parts.join("/")
}

/// The two schemas every generated `422` response points at.
pub fn validation_error_schemas() -> IndexMap<String, Schema> {
    let validation_error = Schema::default()
        .property("properties", Schema::component("ValidationErrorProperties"))
        .property("message", Schema::string())
        .property("name", Schema::string())
        .property("kind", Schema::string())
        .property("path", Schema::string())
        .required_property("message")
        .required_property("name")
        .required_property("kind")
        .required_property("path");

    let validation_error_properties = Schema::default()
        .property("type", Schema::string())
        .property("message", Schema::string())
        .property("path", Schema::string())
        .required_property("type")
        .required_property("message")
        .required_property("path");

    IndexMap::from([
        ("ValidationError".to_string(), validation_error),
        (
            "ValidationErrorProperties".to_string(),
            validation_error_properties,
        ),
    ])
}

fn build_info(info: Option<&Info>) -> Info {
    let mut info = info.cloned().unwrap_or_default();
    info.title.get_or_insert_with(|| DEFAULT_TITLE.to_string());
    info.description
        .get_or_insert_with(|| DEFAULT_DESCRIPTION.to_string());
    info
}

fn ensure_unique_operations(controllers: &[&ResourceController]) -> DocsResult<()> {
    let mut seen = HashSet::new();
    for controller in controllers {
        let fragment = controller.fragment();
        for item in fragment.paths.values() {
            for (_, operation) in item.operations() {
                let Some(id) = operation.operation_id.as_deref() else {
                    continue;
                };
                if !seen.insert(id.to_string()) {
                    return Err(DocsError::DuplicateOperationId {
                        operation_id: id.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn merge_controllers(doc: &mut OpenApi, controllers: &[&ResourceController]) {
    for controller in controllers {
        let fragment = controller.fragment();
        doc.paths
            .extend(fragment.paths.iter().map(|(k, v)| (k.clone(), v.clone())));
        doc.components
            .schemas
            .extend(fragment.schemas.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

fn warn_dangling(doc: &OpenApi) -> DocsResult<()> {
    for reference in doc.dangling_references()? {
        tracing::warn!(reference = %reference, "Unresolved $ref in generated document");
    }
    Ok(())
}

/// Builds the root document from the controllers of the default release.
///
/// Generated paths and schemas come first; the customization overlay then
/// replaces or extends them key by key.
///
/// # Errors
///
/// Returns [`DocsError::DuplicateOperationId`] if two operations share an
/// id, whether generated or supplied through the overlay's `paths`.
///
/// # Example
///
/// ```
/// use baucis_docs::{generate_root, Field, OpenApiOptions, ResourceController, SchemaDescriptor};
///
/// let vegetable = ResourceController::new(
///     "vegetable",
///     SchemaDescriptor::new().field(Field::string("name").required()),
/// );
/// let options = OpenApiOptions::new().title("Garden").build();
///
/// let doc = generate_root(&[&vegetable], &options)?;
/// assert_eq!(doc.info.title.as_deref(), Some("Garden"));
/// assert!(doc.paths.contains_key("/vegetables/{id}"));
/// assert!(doc.components.schemas.contains_key("ValidationError"));
/// # Ok::<(), baucis_docs::DocsError>(())
/// ```
pub fn generate_root(
    controllers: &[&ResourceController],
    options: &CustomizationOptions,
) -> DocsResult<OpenApi> {
    ensure_unique_operations(controllers)?;

    let mut doc = OpenApi::new(build_info(options.info.as_ref()));
    doc.servers = options
        .servers
        .clone()
        .unwrap_or_else(|| vec![Server::new(DEFAULT_SERVER_URL)]);
    doc.tags = controllers.iter().map(|c| resource_tag(c)).collect();

    merge_controllers(&mut doc, controllers);
    doc.components.schemas.extend(validation_error_schemas());
    doc.components.parameters = common_parameters();

    if let Some(components) = &options.components {
        doc.components.overlay(components.clone());
    }
    if let Some(paths) = &options.paths {
        doc.paths.extend(paths.clone());
    }
    doc.security.clone_from(&options.security);
    doc.external_docs.clone_from(&options.external_docs);

    doc.ensure_unique_operation_ids()?;
    warn_dangling(&doc)?;
    tracing::debug!(
        controllers = controllers.len(),
        paths = doc.paths.len(),
        schemas = doc.components.schemas.len(),
        "Generated root document"
    );
    Ok(doc)
}

/// Specializes a root document for one release.
///
/// The root is cloned, `info.version` defaults to `release`, and the paths
/// and schemas of `controllers` are merged over the clone. Root content for
/// other resources is kept.
///
/// # Errors
///
/// Returns [`DocsError::DuplicateOperationId`] if the merged document holds
/// two operations with one id, including a collision between a root
/// controller and one only visible in `release`.
pub fn generate_for_version(
    root: &OpenApi,
    release: &str,
    controllers: &[&ResourceController],
) -> DocsResult<OpenApi> {
    ensure_unique_operations(controllers)?;

    let mut doc = root.clone();
    doc.info
        .version
        .get_or_insert_with(|| release.to_string());
    merge_controllers(&mut doc, controllers);
    doc.ensure_unique_operation_ids()?;
    Ok(doc)
}
