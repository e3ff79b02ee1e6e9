//! Liveness reporting for `/health`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Body of the `/health` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    /// Always `healthy` while the process serves requests.
    pub status: String,

    /// Service name.
    pub service: String,

    /// Service version.
    pub version: String,

    /// Server uptime in seconds.
    pub uptime_seconds: u64,

    /// Whether a root document has been generated yet.
    pub document_cached: bool,
}

/// Health check handler.
///
/// # Example
///
/// ```rust
/// use baucis_server::HealthCheck;
///
/// let health = HealthCheck::new("garden-docs", "1.0.0");
/// let status = health.status(false);
///
/// assert_eq!(status.status, "healthy");
/// assert_eq!(status.service, "garden-docs");
/// ```
#[derive(Debug, Clone)]
pub struct HealthCheck {
    service: String,
    version: String,
    start_time: Instant,
}

impl HealthCheck {
    /// Creates a new health check; uptime counts from now.
    #[must_use]
    pub fn new(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version: version.into(),
            start_time: Instant::now(),
        }
    }

    /// Returns the current health status.
    #[must_use]
    pub fn status(&self, document_cached: bool) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            service: self.service.clone(),
            version: self.version.clone(),
            uptime_seconds: self.uptime().as_secs(),
            document_cached,
        }
    }

    /// Returns the server uptime.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the service name.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns the service version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status() {
        let health = HealthCheck::new("garden-docs", "2.0.0");
        let status = health.status(true);

        assert_eq!(status.status, "healthy");
        assert_eq!(status.service, "garden-docs");
        assert_eq!(status.version, "2.0.0");
        assert!(status.document_cached);
        assert!(status.uptime_seconds < 5);
    }

    #[test]
    fn test_health_status_serialization() {
        let status = HealthCheck::new("svc", "1.0.0").status(false);
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "svc");
        assert_eq!(json["document_cached"], false);
        assert!(json["uptime_seconds"].is_u64());
    }

    #[test]
    fn test_accessors() {
        let health = HealthCheck::new("svc", "1.0.0");
        assert_eq!(health.service(), "svc");
        assert_eq!(health.version(), "1.0.0");
    }
}
