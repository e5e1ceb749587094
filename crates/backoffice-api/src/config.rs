//! API configuration.

use std::time::{Duration, Instant};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Allowed CORS origins; `*` allows any.
    pub cors_origins: Vec<String>,
    /// Deadline for a single request.
    pub request_timeout: Duration,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl ApiConfig {
    /// Creates a new API configuration with the given host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Sets the CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Sets the per-request deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// True when any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8480,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            start_time: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_default() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8480);
        assert!(config.allows_any_origin());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_api_config_builder() {
        let config = ApiConfig::new("0.0.0.0", 3000)
            .with_cors_origins(vec!["http://localhost:3000".to_string()])
            .with_request_timeout(Duration::from_secs(5));
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert!(!config.allows_any_origin());
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
