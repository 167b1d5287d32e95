//! Service configuration
//!
//! Defaults can be overridden per-field through the builder or loaded
//! from environment variables, so deployments reconfigure the service
//! without a rebuild.
//!
//! ## Environment Variables
//!
//! - `DONELIST_BIND_ADDR` - Socket address to listen on (default: 127.0.0.1:3000)
//! - `DONELIST_ALLOWED_ORIGIN` - The one allow-listed CORS origin
//!   (default: http://localhost:5173). Wildcards are rejected.
//! - `DONELIST_PAGE_SIZE` - Tasks per listing page (default: 5)
//! - `DONELIST_REQUEST_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `DONELIST_MAX_BODY_SIZE` - Maximum request body size in bytes (default: 65536)
//! - `DONELIST_ENABLE_OPENAPI` - Serve the OpenAPI document (default: true)

use std::env;
use std::net::SocketAddr;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Runtime configuration for the task service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// The single allow-listed CORS origin. Never a wildcard.
    pub allowed_origin: String,
    /// Fixed page size for task listings. Not settable via the API.
    pub page_size: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Serve the OpenAPI document at /api-docs/openapi.json.
    pub enable_openapi: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfigBuilder::default()
            .build()
            .expect("default configuration is valid")
    }
}

/// Builder for [`ServiceConfig`] with environment variable support.
#[derive(Debug, Clone)]
pub struct ServiceConfigBuilder {
    bind_addr: SocketAddr,
    allowed_origin: String,
    page_size: usize,
    request_timeout_secs: u64,
    max_body_size: usize,
    enable_openapi: bool,
}

impl Default for ServiceConfigBuilder {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            allowed_origin: "http://localhost:5173".to_string(),
            page_size: 5,
            request_timeout_secs: 30,
            max_body_size: 64 * 1024,
            enable_openapi: true,
        }
    }
}

impl ServiceConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `DONELIST_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any environment variable has an invalid
    /// value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::default();

        if let Some(addr) = get_env_string("DONELIST_BIND_ADDR") {
            let parsed = addr.parse().map_err(|e| ConfigError::InvalidEnvVar {
                key: "DONELIST_BIND_ADDR".to_string(),
                message: format!("invalid socket address '{addr}': {e}"),
            })?;
            builder = builder.bind_addr(parsed);
        }
        if let Some(origin) = get_env_string("DONELIST_ALLOWED_ORIGIN") {
            builder = builder.allowed_origin(origin);
        }
        if let Some(size) = get_env_usize("DONELIST_PAGE_SIZE")? {
            builder = builder.page_size(size);
        }
        if let Some(timeout) = get_env_u64("DONELIST_REQUEST_TIMEOUT_SECS")? {
            builder = builder.request_timeout_secs(timeout);
        }
        if let Some(max_size) = get_env_usize("DONELIST_MAX_BODY_SIZE")? {
            builder = builder.max_body_size(max_size);
        }
        if let Some(openapi) = get_env_bool("DONELIST_ENABLE_OPENAPI")? {
            builder = builder.enable_openapi(openapi);
        }

        Ok(builder)
    }

    /// Set the listener address.
    #[must_use]
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the allow-listed CORS origin.
    #[must_use]
    pub fn allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_origin = origin.into();
        self
    }

    /// Set the listing page size.
    #[must_use]
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub fn request_timeout_secs(mut self, timeout: u64) -> Self {
        self.request_timeout_secs = timeout;
        self
    }

    /// Set the maximum request body size in bytes.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Enable or disable the OpenAPI document endpoint.
    #[must_use]
    pub fn enable_openapi(mut self, enable: bool) -> Self {
        self.enable_openapi = enable;
        self
    }

    /// Validate the configuration and build a [`ServiceConfig`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the configuration is
    /// invalid.
    pub fn build(self) -> Result<ServiceConfig, ConfigError> {
        self.validate()?;

        Ok(ServiceConfig {
            bind_addr: self.bind_addr,
            allowed_origin: self.allowed_origin,
            page_size: self.page_size,
            request_timeout_secs: self.request_timeout_secs,
            max_body_size: self.max_body_size,
            enable_openapi: self.enable_openapi,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "page_size must be greater than 0".to_string(),
            ));
        }
        if self.page_size > 100 {
            return Err(ConfigError::ValidationError(
                "page_size must be <= 100".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs > 300 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be <= 300 (5 minutes)".to_string(),
            ));
        }

        if self.max_body_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_body_size must be greater than 0".to_string(),
            ));
        }

        if self.allowed_origin.is_empty() {
            return Err(ConfigError::ValidationError(
                "allowed_origin cannot be empty".to_string(),
            ));
        }
        if self.allowed_origin.contains('*') {
            return Err(ConfigError::ValidationError(
                "allowed_origin must be an explicit origin, not a wildcard".to_string(),
            ));
        }

        Ok(())
    }
}

// Environment variable helper functions

fn get_env_string(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn get_env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(val) => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!(
                    "invalid boolean value '{val}', expected true/false/1/0/yes/no/on/off"
                ),
            }),
        },
        Err(_) => Ok(None),
    }
}

fn get_env_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(key) {
        Ok(val) => val
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid u64 value '{val}': {e}"),
            }),
        Err(_) => Ok(None),
    }
}

fn get_env_usize(key: &str) -> Result<Option<usize>, ConfigError> {
    match env::var(key) {
        Ok(val) => val
            .parse::<usize>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid usize value '{val}': {e}"),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder() {
        let config = ServiceConfigBuilder::new().build().unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.allowed_origin, "http://localhost:5173");
        assert!(config.enable_openapi);
    }

    #[test]
    fn test_builder_validation_page_size() {
        let result = ServiceConfigBuilder::new().page_size(0).build();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("page_size must be greater than 0")
        );

        let result = ServiceConfigBuilder::new().page_size(101).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_validation_timeout() {
        let result = ServiceConfigBuilder::new().request_timeout_secs(0).build();
        assert!(result.is_err());

        let result = ServiceConfigBuilder::new().request_timeout_secs(301).build();
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("request_timeout_secs must be <= 300")
        );
    }

    #[test]
    fn test_builder_rejects_wildcard_origin() {
        let result = ServiceConfigBuilder::new().allowed_origin("*").build();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("not a wildcard")
        );
    }

    #[test]
    fn test_builder_custom_values() {
        let config = ServiceConfigBuilder::new()
            .page_size(10)
            .allowed_origin("https://tasks.example.com")
            .enable_openapi(false)
            .build()
            .unwrap();

        assert_eq!(config.page_size, 10);
        assert_eq!(config.allowed_origin, "https://tasks.example.com");
        assert!(!config.enable_openapi);
    }

    #[test]
    fn test_env_bool_parsing() {
        assert_eq!(get_env_bool("DONELIST_NONEXISTENT").unwrap(), None);
    }
}
