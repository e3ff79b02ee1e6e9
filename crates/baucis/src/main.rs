//! baucis-openapi - serves the OpenAPI document for a set of controllers.

use std::path::PathBuf;

use anyhow::Context;
use baucis::app::{build_server, load_config, load_registry, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use baucis::telemetry::init_logging;

/// Command-line arguments.
struct Args {
    /// Path to configuration file.
    config: Option<PathBuf>,
    /// Path to the controllers JSON file.
    controllers: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config = None;
        let mut controllers = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = args.next().map(PathBuf::from);
                }
                "--controllers" | "-C" => {
                    controllers = args.next().map(PathBuf::from);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("baucis-openapi {}", baucis::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { config, controllers }
    }
}

fn print_help() {
    println!(
        r"baucis-openapi - OpenAPI 3.0 documents for REST controllers

USAGE:
    baucis-openapi [OPTIONS]

OPTIONS:
    -c, --config <PATH>         Configuration file, TOML or JSON (default: {DEFAULT_CONFIG_FILE} if present)
    -C, --controllers <PATH>    JSON array of controller descriptors
    -h, --help                  Print help information
    -v, --version               Print version information

ENVIRONMENT VARIABLES:
    {ENV_PREFIX}__SERVER__HTTP_ADDR        Listen address (default: 0.0.0.0:8012)
    {ENV_PREFIX}__SERVER__MOUNT_PATH       Mount path of openapi.json (default: /api)
    {ENV_PREFIX}__LOGGING__LEVEL           Log level or filter directive (default: info)
    {ENV_PREFIX}__LOGGING__FORMAT          json or pretty (default: json)
    {ENV_PREFIX}__DOCS__DEFAULT_RELEASE    Release served without API-Version (default: 0.0.1)
    {ENV_PREFIX}__DOCS__TITLE              Document title

EXAMPLES:
    baucis-openapi --config demos/baucis.toml --controllers demos/garden-controllers.json
    curl -H 'API-Version: 2.0.0' http://127.0.0.1:8012/api/openapi.json
"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging.to_log_config()).context("Failed to initialize logging")?;

    tracing::info!(
        version = baucis::VERSION,
        addr = %config.server.http_addr,
        mount_path = %config.server.mount_path,
        "Starting baucis-openapi"
    );

    let registry = load_registry(args.controllers.as_deref(), &config.docs.default_release)?;
    let server = build_server(&config, registry)?;

    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }
    Ok(())
}
