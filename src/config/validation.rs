//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, timeouts and log settings
//! - Check that API base paths and the media type namespace are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),

    #[error("{field}: base path '{value}' must start with '/' and not end with '/'")]
    InvalidBasePath { field: &'static str, value: String },

    #[error("api: greeting_base and departing_base must differ")]
    SharedBasePath,

    #[error("api.namespace: '{0}' must be non-empty lowercase alphanumerics or '-'")]
    InvalidNamespace(String),

    #[error("openapi.{0} must not be empty while the document is served")]
    EmptyOpenApiField(&'static str),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    check_base_path(&mut errors, "api.greeting_base", &config.api.greeting_base);
    check_base_path(&mut errors, "api.departing_base", &config.api.departing_base);
    if config.api.greeting_base == config.api.departing_base {
        errors.push(ValidationError::SharedBasePath);
    }

    let namespace = &config.api.namespace;
    let namespace_ok = !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !namespace_ok {
        errors.push(ValidationError::InvalidNamespace(namespace.clone()));
    }

    if config.openapi.enabled {
        if config.openapi.title.trim().is_empty() {
            errors.push(ValidationError::EmptyOpenApiField("title"));
        }
        if config.openapi.version.trim().is_empty() {
            errors.push(ValidationError::EmptyOpenApiField("version"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_base_path(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !value.starts_with('/') || value.len() < 2 || value.ends_with('/') {
        errors.push(ValidationError::InvalidBasePath {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.observability.log_level = "loud".into();
        config.api.namespace = "Flip Foundry".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout("timeouts.request_secs")));
        assert!(errors.contains(&ValidationError::UnknownLogLevel("loud".into())));
    }

    #[test]
    fn test_openapi_title_required_only_when_served() {
        let mut config = ServiceConfig::default();
        config.openapi.title = " ".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::EmptyOpenApiField("title")])
        );

        config.openapi.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = ServiceConfig::default();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_base_paths() {
        let mut config = ServiceConfig::default();
        config.api.greeting_base = "flip/greeting/".into();
        config.api.departing_base = "flip/greeting/".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::SharedBasePath));
    }
}
