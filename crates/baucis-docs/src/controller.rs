//! Resource controllers and the registry that holds them.
//!
//! A [`ResourceController`] is the read-only view of one REST resource: its
//! singular and plural names, its schema descriptor, and its selection
//! expression. The generated [`ControllerFragment`] is memoized on the
//! controller; editing the overlay through [`ResourceController::overlay_mut`]
//! drops the memoized value.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DocsError, DocsResult};
use crate::fragment;
use crate::model::SchemaDescriptor;
use crate::openapi::{Extensions, PathItem, Schema};
use crate::selection::Selection;

/// Release every controller is registered for by default.
pub const DEFAULT_RELEASE: &str = "0.0.1";

/// Upper-cases the first character of `s`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The partial document contributed by one controller.
///
/// Only `paths` and `schemas` are ever merged into a document. Anything in
/// `extensions` stays on the fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerFragment {
    /// `/plural` and `/plural/{id}` path items.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Component schemas for the resource and its embedded documents.
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
    /// Arbitrary keys attached by collaborators.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl ControllerFragment {
    /// Returns `true` if the fragment holds nothing at all.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.schemas.is_empty() && self.extensions.is_empty()
    }
}

/// One documented REST resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawController")]
pub struct ResourceController {
    singular: String,
    plural: String,
    schema: SchemaDescriptor,
    selection: Selection,
    releases: Vec<String>,
    overlay: ControllerFragment,
    fragment: OnceLock<Arc<ControllerFragment>>,
}

impl ResourceController {
    /// Creates a controller whose plural name is `singular` + `s`.
    pub fn new(singular: impl Into<String>, schema: SchemaDescriptor) -> Self {
        let singular = singular.into();
        let plural = format!("{singular}s");
        Self {
            singular,
            plural,
            schema,
            selection: Selection::All,
            releases: Vec::new(),
            overlay: ControllerFragment::default(),
            fragment: OnceLock::new(),
        }
    }

    /// Overrides the plural name.
    #[must_use]
    pub fn plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = plural.into();
        self.fragment = OnceLock::new();
        self
    }

    /// Sets the selection expression.
    #[must_use]
    pub fn select(mut self, expression: &str) -> Self {
        self.selection = Selection::parse(expression);
        self.fragment = OnceLock::new();
        self
    }

    /// Restricts the controller to the given releases.
    #[must_use]
    pub fn releases<I, S>(mut self, releases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.releases = releases.into_iter().map(Into::into).collect();
        self
    }

    /// Singular resource name, e.g. `vegetable`.
    pub fn singular_name(&self) -> &str {
        &self.singular
    }

    /// Plural resource name, e.g. `vegetables`.
    pub fn plural_name(&self) -> &str {
        &self.plural
    }

    /// Name of the top-level component schema, e.g. `Vegetable`.
    pub fn schema_name(&self) -> String {
        capitalize(&self.singular)
    }

    /// Schema descriptor.
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// Parsed selection expression.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Releases the controller is restricted to. Empty means every release.
    pub fn release_list(&self) -> &[String] {
        &self.releases
    }

    /// Returns `true` if the controller is visible in `release`.
    pub fn serves_release(&self, release: &str) -> bool {
        self.releases.is_empty() || self.releases.iter().any(|r| r == release)
    }

    /// Collaborator-supplied additions layered over the generated fragment.
    pub fn overlay(&self) -> &ControllerFragment {
        &self.overlay
    }

    /// Mutable access to the overlay. Invalidates the memoized fragment.
    pub fn overlay_mut(&mut self) -> &mut ControllerFragment {
        self.fragment = OnceLock::new();
        &mut self.overlay
    }

    /// The generated fragment, built on first access and reused afterwards.
    pub fn fragment(&self) -> Arc<ControllerFragment> {
        Arc::clone(
            self.fragment
                .get_or_init(|| Arc::new(fragment::build_fragment(self))),
        )
    }

    /// Returns `true` once the fragment has been built.
    pub fn has_fragment(&self) -> bool {
        self.fragment.get().is_some()
    }

    /// Checks that the names can be turned into paths and identifiers.
    pub fn validate(&self) -> DocsResult<()> {
        check_name(&self.singular, "singular", &self.singular)?;
        check_name(&self.singular, "plural", &self.plural)
    }
}

fn check_name(resource: &str, which: &str, name: &str) -> DocsResult<()> {
    let reason = if name.is_empty() {
        format!("{which} name is empty")
    } else if name.contains('/') || name.chars().any(char::is_whitespace) {
        format!("{which} name '{name}' contains '/' or whitespace")
    } else {
        return Ok(());
    };
    Err(DocsError::InvalidController {
        resource: resource.to_string(),
        reason,
    })
}

/// Wire form of a controller, as exported by the routing layer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawController {
    singular_name: String,
    #[serde(default)]
    plural_name: Option<String>,
    #[serde(default)]
    schema: SchemaDescriptor,
    #[serde(default, alias = "select")]
    selection: Option<String>,
    #[serde(default)]
    releases: Vec<String>,
}

impl TryFrom<RawController> for ResourceController {
    type Error = DocsError;

    fn try_from(raw: RawController) -> Result<Self, Self::Error> {
        let mut controller = Self::new(raw.singular_name, raw.schema).releases(raw.releases);
        if let Some(plural) = raw.plural_name {
            controller = controller.plural(plural);
        }
        controller.selection = Selection::from_optional(raw.selection.as_deref());
        controller.validate()?;
        Ok(controller)
    }
}

/// Supplies the controllers visible in a release.
pub trait ControllerSource: Send + Sync {
    /// Controllers visible in `release`, in registration order.
    fn controllers(&self, release: &str) -> Vec<&ResourceController>;

    /// Release used when a request does not ask for one.
    fn default_release(&self) -> &str;
}

/// Ordered set of registered controllers.
#[derive(Debug, Clone)]
pub struct ControllerRegistry {
    controllers: Vec<ResourceController>,
    default_release: String,
}

impl Default for ControllerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerRegistry {
    /// Creates an empty registry with the default release `0.0.1`.
    pub fn new() -> Self {
        Self {
            controllers: Vec::new(),
            default_release: DEFAULT_RELEASE.to_string(),
        }
    }

    /// Sets the release served when none is requested.
    #[must_use]
    pub fn with_default_release(mut self, release: impl Into<String>) -> Self {
        self.default_release = release.into();
        self
    }

    /// Parses a JSON array of controllers and registers them in order.
    pub fn from_json(json: &str) -> DocsResult<Self> {
        let controllers: Vec<ResourceController> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for controller in controllers {
            registry.register(controller)?;
        }
        Ok(registry)
    }

    /// Adds a controller.
    ///
    /// Rejects invalid names and a plural that is already registered, since
    /// both would produce the same paths.
    pub fn register(&mut self, controller: ResourceController) -> DocsResult<()> {
        controller.validate()?;
        if self
            .controllers
            .iter()
            .any(|c| c.plural_name() == controller.plural_name())
        {
            return Err(DocsError::InvalidController {
                resource: controller.singular_name().to_string(),
                reason: format!("plural '{}' is already registered", controller.plural_name()),
            });
        }
        tracing::debug!(
            resource = %controller.singular_name(),
            plural = %controller.plural_name(),
            "Registered controller"
        );
        self.controllers.push(controller);
        Ok(())
    }

    /// Looks up a controller by singular name.
    pub fn get(&self, singular: &str) -> Option<&ResourceController> {
        self.controllers.iter().find(|c| c.singular_name() == singular)
    }

    /// Mutable lookup by singular name, e.g. to edit an overlay.
    pub fn get_mut(&mut self, singular: &str) -> Option<&mut ResourceController> {
        self.controllers
            .iter_mut()
            .find(|c| c.singular_name() == singular)
    }

    /// All controllers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceController> {
        self.controllers.iter()
    }

    /// Number of registered controllers.
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl ControllerSource for ControllerRegistry {
    fn controllers(&self, release: &str) -> Vec<&ResourceController> {
        self.controllers
            .iter()
            .filter(|c| c.serves_release(release))
            .collect()
    }

    fn default_release(&self) -> &str {
        &self.default_release
    }
}
