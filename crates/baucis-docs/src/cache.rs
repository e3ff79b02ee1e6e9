//! Process-wide root document cell.
//!
//! The cell moves from empty to generated on first access and is replaced
//! wholesale on regeneration. Documents are always built outside the lock
//! and published with a single assignment, so readers never observe a
//! partially built document and a failed build leaves the previous one in
//! place.
//!
//! Options, the cached root and a generation counter share one lock. A lazy
//! build publishes only into an empty slot whose generation is unchanged, so
//! it can never overwrite the result of a regeneration that finished while
//! it was running.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::assembler::{generate_for_version, generate_root};
use crate::controller::ControllerSource;
use crate::error::DocsResult;
use crate::openapi::OpenApi;
use crate::options::CustomizationOptions;

fn build(source: &dyn ControllerSource, options: &CustomizationOptions) -> DocsResult<OpenApi> {
    let controllers = source.controllers(source.default_release());
    generate_root(&controllers, options)
}

#[derive(Debug, Default)]
struct CacheState {
    options: CustomizationOptions,
    root: Option<Arc<OpenApi>>,
    /// Bumped whenever the options change or the root is dropped.
    generation: u64,
}

/// Lazily generated, shareable root document.
///
/// # Example
///
/// ```
/// use baucis_docs::{ControllerRegistry, DocumentCache, OpenApiOptions};
///
/// let registry = ControllerRegistry::new();
/// let cache = DocumentCache::new(OpenApiOptions::new().title("Garden").build());
/// assert!(!cache.is_generated());
///
/// let root = cache.root(&registry)?;
/// assert_eq!(root.info.title.as_deref(), Some("Garden"));
/// assert!(cache.is_generated());
/// # Ok::<(), baucis_docs::DocsError>(())
/// ```
#[derive(Debug, Default)]
pub struct DocumentCache {
    state: RwLock<CacheState>,
}

impl DocumentCache {
    /// Creates an empty cache that will generate with `options`.
    pub fn new(options: CustomizationOptions) -> Self {
        Self {
            state: RwLock::new(CacheState {
                options,
                ..CacheState::default()
            }),
        }
    }

    /// The customization options the next generation will use.
    pub fn options(&self) -> CustomizationOptions {
        self.state.read().options.clone()
    }

    /// Returns `true` once a root document is cached.
    pub fn is_generated(&self) -> bool {
        self.state.read().root.is_some()
    }

    /// Drops the cached root; the next access regenerates it.
    pub fn invalidate(&self) {
        let mut state = self.state.write();
        state.root = None;
        state.generation += 1;
    }

    /// The root document, generated on first call.
    ///
    /// Concurrent first calls may each build a document; the first one to
    /// publish wins and the others return it.
    ///
    /// # Errors
    ///
    /// Returns the generation error if no root is cached and building one
    /// fails.
    pub fn root(&self, source: &dyn ControllerSource) -> DocsResult<Arc<OpenApi>> {
        loop {
            let (options, generation) = {
                let state = self.state.read();
                if let Some(doc) = &state.root {
                    return Ok(Arc::clone(doc));
                }
                (state.options.clone(), state.generation)
            };

            let doc = build(source, &options)?;

            let mut state = self.state.write();
            if let Some(existing) = &state.root {
                return Ok(Arc::clone(existing));
            }
            if state.generation == generation {
                let doc = Arc::new(doc);
                state.root = Some(Arc::clone(&doc));
                tracing::info!(paths = doc.paths.len(), "Generated OpenAPI root document");
                return Ok(doc);
            }
            tracing::debug!("Options changed during root generation, rebuilding");
        }
    }

    /// Rebuilds the root, optionally with new customization options.
    ///
    /// The stored options and document change only if generation succeeds.
    /// Without new options the current ones are used; if another
    /// regeneration replaces them meanwhile, the build is repeated with the
    /// replacement.
    ///
    /// # Errors
    ///
    /// Returns the generation error; the cache is left untouched.
    pub fn regenerate(
        &self,
        source: &dyn ControllerSource,
        options: Option<CustomizationOptions>,
    ) -> DocsResult<Arc<OpenApi>> {
        if let Some(options) = options {
            let doc = Arc::new(build(source, &options)?);
            self.publish(options, Arc::clone(&doc));
            return Ok(doc);
        }

        loop {
            let (options, generation) = {
                let state = self.state.read();
                (state.options.clone(), state.generation)
            };
            let doc = Arc::new(build(source, &options)?);

            let mut state = self.state.write();
            if state.generation == generation {
                state.root = Some(Arc::clone(&doc));
                state.generation += 1;
                tracing::info!(paths = doc.paths.len(), "Regenerated OpenAPI root document");
                return Ok(doc);
            }
        }
    }

    fn publish(&self, options: CustomizationOptions, doc: Arc<OpenApi>) {
        let mut state = self.state.write();
        tracing::info!(paths = doc.paths.len(), "Regenerated OpenAPI root document");
        state.options = options;
        state.root = Some(doc);
        state.generation += 1;
    }

    /// Applies a collaborator edit to the root document.
    ///
    /// Edits persist until the next regeneration and are visible in every
    /// versioned document. The edit runs under the cache's write lock, so it
    /// always applies to the latest root and no regeneration can slip in
    /// between reading the root and publishing the edited copy.
    ///
    /// # Errors
    ///
    /// Returns the generation error if no root is cached and building one
    /// fails.
    pub fn customize_root<F>(&self, source: &dyn ControllerSource, edit: F) -> DocsResult<Arc<OpenApi>>
    where
        F: FnOnce(&mut OpenApi),
    {
        let mut state = self.state.write();
        let mut doc = match &state.root {
            Some(root) => (**root).clone(),
            None => build(source, &state.options)?,
        };
        edit(&mut doc);

        let doc = Arc::new(doc);
        state.root = Some(Arc::clone(&doc));
        Ok(doc)
    }

    /// The document served for `release`.
    ///
    /// The cached root is cloned and the controllers visible in `release`
    /// are merged over it. A release no controller names is not an error.
    ///
    /// # Errors
    ///
    /// Returns the root's generation error, or
    /// [`DocsError::DuplicateOperationId`](crate::DocsError::DuplicateOperationId)
    /// when the release's controllers collide with the root's.
    ///
    /// # Example
    ///
    /// ```
    /// use baucis_docs::{ControllerRegistry, DocumentCache, Field, ResourceController, SchemaDescriptor};
    ///
    /// let mut registry = ControllerRegistry::new();
    /// registry.register(ResourceController::new(
    ///     "vegetable",
    ///     SchemaDescriptor::new().field(Field::string("name")),
    /// ))?;
    /// registry.register(
    ///     ResourceController::new("mineral", SchemaDescriptor::new().field(Field::string("color")))
    ///         .releases(["2.0.0"]),
    /// )?;
    ///
    /// let cache = DocumentCache::default();
    /// let current = cache.versioned(&registry, "0.0.1")?;
    /// let next = cache.versioned(&registry, "2.0.0")?;
    ///
    /// assert!(!current.paths.contains_key("/minerals"));
    /// assert!(next.paths.contains_key("/minerals"));
    /// assert_eq!(next.info.version.as_deref(), Some("2.0.0"));
    /// # Ok::<(), baucis_docs::DocsError>(())
    /// ```
    pub fn versioned(&self, source: &dyn ControllerSource, release: &str) -> DocsResult<OpenApi> {
        let root = self.root(source)?;
        let controllers = source.controllers(release);
        generate_for_version(&root, release, &controllers)
    }
}
