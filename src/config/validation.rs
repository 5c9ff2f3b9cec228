//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the controller URL is present and well-formed
//! - Validate value ranges (intervals > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "controller.base_url").
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn error(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a configuration, collecting every semantic error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.controller.base_url.is_empty() {
        errors.push(error("controller.base_url", "is required"));
    } else {
        match Url::parse(&config.controller.base_url) {
            Ok(url) if url.host_str().is_none() => {
                errors.push(error("controller.base_url", "has no host"));
            }
            Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                errors.push(error(
                    "controller.base_url",
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
            Ok(_) => {}
            Err(e) => {
                errors.push(error("controller.base_url", e.to_string()));
            }
        }
    }

    if config.controller.refresh_interval_ms == 0 {
        errors.push(error("controller.refresh_interval_ms", "must be > 0"));
    }

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(error(
            "listener.bind_address",
            format!("'{}' is not a valid socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(error("timeouts.connect_secs", "must be > 0"));
    }
    if config.timeouts.discovery_secs == 0 {
        errors.push(error("timeouts.discovery_secs", "must be > 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
