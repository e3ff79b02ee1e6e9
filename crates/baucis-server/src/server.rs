//! HTTP server for generated documents.
//!
//! The server is built on Hyper and Tokio and answers three kinds of
//! request:
//!
//! - `GET <mount>/openapi.json` with the document for the requested release
//! - `GET /health` with a [`HealthStatus`](crate::HealthStatus)
//! - anything else with a JSON 404
//!
//! The release is read from the `API-Version` header. Without one the
//! source's default release is served.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use baucis_docs::{ControllerRegistry, DocumentCache};
//! use baucis_server::{DocsServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = DocsServer::new(
//!         ServerConfig::builder().http_addr("0.0.0.0:8012").build(),
//!         Arc::new(ControllerRegistry::new()),
//!         Arc::new(DocumentCache::default()),
//!     );
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use baucis_docs::{base_path, ControllerSource, DocumentCache};
use bytes::Bytes;
use http::{header, HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::health::HealthCheck;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Request header selecting the documented release.
pub const RELEASE_HEADER: &str = "api-version";

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Serves OpenAPI documents for a set of controllers.
pub struct DocsServer {
    config: ServerConfig,
    docs_route: String,
    source: Arc<dyn ControllerSource>,
    cache: Arc<DocumentCache>,
    health: HealthCheck,
}

impl std::fmt::Debug for DocsServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsServer")
            .field("config", &self.config)
            .field("docs_route", &self.docs_route)
            .field("default_release", &self.source.default_release())
            .field("document_cached", &self.cache.is_generated())
            .finish_non_exhaustive()
    }
}

impl DocsServer {
    /// Creates a server documenting the controllers of `source`.
    ///
    /// The cache is shared so a collaborator holding another handle can
    /// customize or regenerate the root document while the server runs.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        source: Arc<dyn ControllerSource>,
        cache: Arc<DocumentCache>,
    ) -> Self {
        let health = HealthCheck::new(config.service_name(), config.service_version());
        Self {
            docs_route: config.docs_route(),
            config,
            source,
            cache,
            health,
        }
    }

    /// Returns a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the shared document cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<DocumentCache> {
        &self.cache
    }

    /// Returns the controller source.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn ControllerSource> {
        &self.source
    }

    /// Returns a reference to the health check handler.
    #[must_use]
    pub fn health(&self) -> &HealthCheck {
        &self.health
    }

    /// Runs the server until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be
    /// bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and serves until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be
    /// bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|_| ServerError::InvalidAddress(self.config.http_addr().to_string()))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::bind(addr.to_string(), e))?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener.
    ///
    /// After `shutdown` fires no new connection is accepted and open ones
    /// are asked to finish. The call returns once they have, or once the
    /// shutdown timeout elapses.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's local address cannot be read.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            addr = %local_addr,
            route = %self.docs_route,
            default_release = %self.source.default_release(),
            "Document server listening"
        );

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                    tracing::debug!(remote = %remote_addr, error = %e, "Connection error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to accept connection");
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        drop(listener);

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            timeout = ?shutdown_timeout,
            active = tracker.active_connections(),
            "Waiting for open connections"
        );

        tokio::select! {
            () = tracker.wait_for_idle() => {
                tracing::info!("All connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    active = tracker.active_connections(),
                    "Shutdown timeout reached with connections still open"
                );
            }
        }

        tracing::info!("Document server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.respond(&req)) }
        });

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(self.config.request_timeout());

        let mut conn = std::pin::pin!(builder.serve_connection(io, service));

        tokio::select! {
            result = conn.as_mut() => return result,
            () = shutdown.recv() => {
                tracing::debug!(remote = %remote_addr, "Closing connection for shutdown");
            }
        }

        conn.as_mut().graceful_shutdown();
        conn.await
    }

    /// Routes a request to its response.
    ///
    /// Request bodies are never read, so any body type is accepted.
    pub fn respond<B>(&self, req: &Request<B>) -> HttpResponse {
        let method = req.method();
        let path = req.uri().path();

        tracing::debug!(%method, path, "Handling request");

        if path == self.docs_route {
            if method != Method::GET {
                return self.handle_method_not_allowed(method);
            }
            return self.handle_document(req);
        }

        if method == Method::GET && path == "/health" {
            return self.handle_health();
        }

        self.handle_not_found(path)
    }

    fn handle_document<B>(&self, req: &Request<B>) -> HttpResponse {
        let release = requested_release(req).unwrap_or_else(|| self.source.default_release());
        let mount = base_path(req.uri().path(), 1);

        let body = self
            .cache
            .versioned(self.source.as_ref(), release)
            .and_then(|doc| doc.to_json());

        match body {
            Ok(body) => {
                tracing::debug!(release, mount = %mount, "Serving OpenAPI document");
                json_response(StatusCode::OK, body)
            }
            Err(e) => {
                tracing::error!(release, mount = %mount, error = %e, "Failed to generate OpenAPI document");
                self.handle_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DOCUMENT_GENERATION_FAILED",
                    &e.to_string(),
                )
            }
        }
    }

    fn handle_health(&self) -> HttpResponse {
        let status = self.health.status(self.cache.is_generated());
        match serde_json::to_string(&status) {
            Ok(body) => json_response(StatusCode::OK, body),
            Err(e) => self.handle_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "HEALTH_SERIALIZATION_FAILED",
                &e.to_string(),
            ),
        }
    }

    fn handle_method_not_allowed(&self, method: &Method) -> HttpResponse {
        let mut response = self.handle_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            &format!("{method} is not supported on {}", self.docs_route),
        );
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("GET"));
        response
    }

    /// Creates a standard error response.
    fn handle_error(&self, status: StatusCode, code: &str, message: &str) -> HttpResponse {
        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message
            }
        });
        json_response(status, body.to_string())
    }

    fn handle_not_found(&self, path: &str) -> HttpResponse {
        let body = serde_json::json!({
            "error": "Not Found",
            "path": path
        });
        json_response(StatusCode::NOT_FOUND, body.to_string())
    }
}

/// The release named by the request's `API-Version` header, if any.
fn requested_release<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(RELEASE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|release| !release.is_empty())
}

fn json_response(status: StatusCode, body: String) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}
