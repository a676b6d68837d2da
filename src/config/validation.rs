//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parseable)
//! - Check the lookup service base URL is usable before any request is served
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `resolver.service` is empty or missing.
    MissingService,
    /// `resolver.service` is not an absolute http(s) base URL.
    InvalidServiceUrl { value: String, reason: String },
    /// `listener.bind_address` does not parse as a socket address.
    InvalidBindAddress { value: String },
    /// `observability.metrics_address` does not parse as a socket address.
    InvalidMetricsAddress { value: String },
    /// A timeout is zero.
    ZeroTimeout { field: &'static str },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingService => {
                write!(f, "resolver.service must be configured")
            }
            ValidationError::InvalidServiceUrl { value, reason } => {
                write!(f, "resolver.service {value:?} is not a usable base URL: {reason}")
            }
            ValidationError::InvalidBindAddress { value } => {
                write!(f, "listener.bind_address {value:?} is not a socket address")
            }
            ValidationError::InvalidMetricsAddress { value } => {
                write!(
                    f,
                    "observability.metrics_address {value:?} is not a socket address"
                )
            }
            ValidationError::ZeroTimeout { field } => {
                write!(f, "timeouts.{field} must be greater than zero")
            }
        }
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.resolver.service.is_empty() {
        errors.push(ValidationError::MissingService);
    } else {
        match Url::parse(&config.resolver.service) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                if url.host_str().is_none() {
                    errors.push(ValidationError::InvalidServiceUrl {
                        value: config.resolver.service.clone(),
                        reason: "no host".to_string(),
                    });
                }
            }
            Ok(url) => {
                errors.push(ValidationError::InvalidServiceUrl {
                    value: config.resolver.service.clone(),
                    reason: format!("unsupported scheme {:?}", url.scheme()),
                });
            }
            Err(e) => {
                errors.push(ValidationError::InvalidServiceUrl {
                    value: config.resolver.service.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress {
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "request_secs",
        });
    }
    if config.timeouts.lookup_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "lookup_secs",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.resolver.service = "http://lookup.internal:3000".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_service_rejected() {
        let config = GatewayConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingService));
    }

    #[test]
    fn test_unparseable_service_rejected() {
        let mut config = valid_config();
        config.resolver.service = "not a url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidServiceUrl { .. }
        ));
    }

    #[test]
    fn test_non_http_service_rejected() {
        let mut config = valid_config();
        config.resolver.service = "ftp://lookup.internal".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidServiceUrl { .. }
        ));
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "nowhere".to_string();
        config.timeouts.lookup_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
