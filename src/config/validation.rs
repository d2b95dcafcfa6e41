//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses and URLs actually parse
//! - Validate value ranges (timeouts > 0, amounts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FaucetConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::str::FromStr;

use alloy::primitives::Address;
use url::Url;

use crate::config::schema::FaucetConfig;

/// A single failed validation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "contract.address").
    pub field: &'static str,
    /// What is wrong with the value.
    pub problem: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a parsed configuration.
pub fn validate_config(config: &FaucetConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.chain.chain_id == 0 {
        errors.push(ValidationError {
            field: "chain.chain_id",
            problem: "must be non-zero".to_string(),
        });
    }
    if let Err(e) = Url::parse(&config.chain.rpc_url) {
        errors.push(ValidationError {
            field: "chain.rpc_url",
            problem: format!("not a valid URL: {}", e),
        });
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "chain.rpc_timeout_secs",
            problem: "must be greater than zero".to_string(),
        });
    }

    if let Err(e) = config.auth.bridge_address.parse::<SocketAddr>() {
        errors.push(ValidationError {
            field: "auth.bridge_address",
            problem: format!("not a valid socket address: {}", e),
        });
    }

    if config.contract.address.is_empty() {
        errors.push(ValidationError {
            field: "contract.address",
            problem: "is required".to_string(),
        });
    } else if let Err(e) = Address::from_str(&config.contract.address) {
        errors.push(ValidationError {
            field: "contract.address",
            problem: format!("not a valid address: {}", e),
        });
    }
    if let Err(e) = Address::from_str(&config.contract.spender) {
        errors.push(ValidationError {
            field: "contract.spender",
            problem: format!("not a valid address: {}", e),
        });
    }
    if config.contract.mint_message.is_empty() {
        errors.push(ValidationError {
            field: "contract.mint_message",
            problem: "must not be empty".to_string(),
        });
    }
    for (field, amount) in [
        ("contract.mint_amount", config.contract.mint_amount),
        ("contract.approve_amount", config.contract.approve_amount),
        ("contract.transfer_amount", config.contract.transfer_amount),
    ] {
        if amount == 0 {
            errors.push(ValidationError {
                field,
                problem: "must be greater than zero".to_string(),
            });
        }
    }

    if config.service_wallet.private_key_env.is_empty() {
        errors.push(ValidationError {
            field: "service_wallet.private_key_env",
            problem: "must name an environment variable".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError {
            field: "observability.log_level",
            problem: format!(
                "unknown level '{}', expected one of {:?}",
                config.observability.log_level, LOG_LEVELS
            ),
        });
    }
    if config.observability.metrics_enabled {
        if let Err(e) = config.observability.metrics_address.parse::<SocketAddr>() {
            errors.push(ValidationError {
                field: "observability.metrics_address",
                problem: format!("not a valid socket address: {}", e),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
