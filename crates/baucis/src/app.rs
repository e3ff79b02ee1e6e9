//! Wiring from configuration to a running document server.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use baucis_config::{BaucisConfig, ConfigError, ConfigLoader};
use baucis_docs::{ControllerRegistry, DocumentCache};
use baucis_server::{DocsServer, ServerConfig};

/// Prefix of environment overrides, e.g. `BAUCIS__SERVER__HTTP_ADDR`.
pub const ENV_PREFIX: &str = "BAUCIS";

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "baucis.toml";

/// Service name reported by `/health`.
pub const SERVICE_NAME: &str = "baucis-openapi";

/// Loads configuration: defaults, then `.env`, then the file, then
/// `BAUCIS__*` overrides.
///
/// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
/// read if present.
pub fn load_config(path: Option<&Path>) -> Result<BaucisConfig, ConfigError> {
    let loader = ConfigLoader::new().with_defaults().with_dotenv()?;
    let loader = match path {
        Some(path) => loader.with_file(path)?,
        None => loader.with_optional_file(DEFAULT_CONFIG_FILE)?,
    };
    loader.with_env_prefix(ENV_PREFIX).load()
}

/// Reads the controllers file, a JSON array of controller descriptors.
///
/// Without a file the registry is empty and the document only carries the
/// fixed schemas and parameters.
pub fn load_registry(path: Option<&Path>, default_release: &str) -> anyhow::Result<ControllerRegistry> {
    let registry = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read controllers from {}", path.display()))?;
            ControllerRegistry::from_json(&json)
                .with_context(|| format!("Invalid controllers in {}", path.display()))?
        }
        None => {
            tracing::warn!("No controllers file given, documenting no resources");
            ControllerRegistry::new()
        }
    };

    tracing::info!(
        controllers = registry.len(),
        default_release,
        "Loaded controllers"
    );
    Ok(registry.with_default_release(default_release))
}

/// Server settings derived from the `[server]` section.
pub fn server_config(config: &BaucisConfig) -> ServerConfig {
    ServerConfig::builder()
        .http_addr(&config.server.http_addr)
        .mount_path(&config.server.mount_path)
        .shutdown_timeout(Duration::from_secs(config.server.shutdown_timeout_secs))
        .request_timeout(Duration::from_millis(config.server.request_timeout_ms))
        .service_name(SERVICE_NAME)
        .service_version(crate::VERSION)
        .build()
}

/// Builds the server and generates the root document up front, so a
/// broken controller set fails at startup instead of on first request.
pub fn build_server(config: &BaucisConfig, registry: ControllerRegistry) -> anyhow::Result<DocsServer> {
    let cache = Arc::new(DocumentCache::new(config.docs.to_options()));
    let root = cache
        .root(&registry)
        .context("Failed to generate the root OpenAPI document")?;

    tracing::info!(
        paths = root.paths.len(),
        schemas = root.components.schemas.len(),
        "Root document ready"
    );

    Ok(DocsServer::new(server_config(config), Arc::new(registry), cache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use baucis_docs::{ControllerSource, Field, ResourceController, SchemaDescriptor};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const GARDEN: &str = include_str!("../../../demos/garden-controllers.json");

    fn json_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_registry_from_file() {
        let file = json_file(GARDEN);
        let registry = load_registry(Some(file.path()), "2.1.0").unwrap();

        assert_eq!(registry.default_release(), "2.1.0");
        assert!(registry.get("vegetable").is_some());
        assert_eq!(registry.get("fungus").unwrap().plural_name(), "fungi");
    }

    #[test]
    fn test_load_registry_without_file() {
        let registry = load_registry(None, "0.0.1").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_registry_errors() {
        let missing = load_registry(Some(Path::new("/nonexistent/controllers.json")), "0.0.1");
        assert!(missing
            .unwrap_err()
            .to_string()
            .contains("Failed to read controllers"));

        let file = json_file(r#"[{"pluralName": "nameless"}]"#);
        let invalid = load_registry(Some(file.path()), "0.0.1");
        assert!(invalid.unwrap_err().to_string().contains("Invalid controllers"));
    }

    #[test]
    fn test_load_config_from_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
            [server]
            mount_path = "/garden"

            [docs]
            title = "Garden"
            "#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.server.mount_path, "/garden");
        assert_eq!(config.docs.title.as_deref(), Some("Garden"));
    }

    #[test]
    fn test_sample_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/baucis.toml");
        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.docs.default_release, "1.0.0");
        assert_eq!(config.docs.servers.len(), 1);
        assert_eq!(server_config(&config).docs_route(), "/api/openapi.json");
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        let result = load_config(Some(Path::new("/nonexistent/baucis.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_server_config_from_sections() {
        let mut config = BaucisConfig::default();
        config.server.http_addr = "127.0.0.1:9000".to_string();
        config.server.mount_path = "/v2".to_string();
        config.server.request_timeout_ms = 1500;

        let server = server_config(&config);
        assert_eq!(server.http_addr(), "127.0.0.1:9000");
        assert_eq!(server.docs_route(), "/v2/openapi.json");
        assert_eq!(server.request_timeout(), Duration::from_millis(1500));
        assert_eq!(server.service_name(), SERVICE_NAME);
    }

    #[test]
    fn test_build_server_generates_root() {
        let mut config = BaucisConfig::default();
        config.docs.title = Some("Garden".to_string());

        let registry = ControllerRegistry::from_json(GARDEN).unwrap();
        let server = build_server(&config, registry).unwrap();

        assert!(server.cache().is_generated());
        let root = server.cache().root(server.source().as_ref()).unwrap();
        assert_eq!(root.info.title.as_deref(), Some("Garden"));
        assert!(root.components.schemas.contains_key("Vegetable"));
    }

    #[test]
    fn test_build_server_rejects_colliding_operations() {
        let mut registry = ControllerRegistry::new();
        registry
            .register(ResourceController::new("bean", SchemaDescriptor::new()))
            .unwrap();
        registry
            .register(
                ResourceController::new("Bean", SchemaDescriptor::new().field(Field::string("x")))
                    .plural("beanz"),
            )
            .unwrap();

        let err = build_server(&BaucisConfig::default(), registry).unwrap_err();
        assert!(err.to_string().contains("root OpenAPI document"));
    }
}
