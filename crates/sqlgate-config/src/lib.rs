//! Gateway configuration: a plain struct populated by an external loader,
//! plus a `config`-crate-backed environment loader and startup
//! validation (spec §6 "Environment/configuration inputs", §5 startup
//! invariants).
//!
//! Flag parsing and file-format loading are out of core scope (spec §1);
//! this crate only owns the shape of the configuration and its
//! invariants, mirroring the teacher's separation between `config`-driven
//! bootstrap and the settings struct itself.

use serde::Deserialize;
use sqlgate_common::{GatewayError, Result};

/// Per-adapter connection parameters. Deliberately loose (a label plus a
/// free-form connection string) since each adapter family interprets its
/// own parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct AdapterConfig {
    pub name: String,
    pub connection_string: String,
}

/// The gateway's full runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub listen_address: String,
    pub bearer_credential: String,
    pub repository_url: String,
    #[serde(default)]
    pub adapters: Vec<AdapterConfig>,
    #[serde(default)]
    pub dev_mode: bool,
}

impl GatewayConfig {
    /// Loads configuration from environment variables prefixed
    /// `SQLGATE__` (double underscore separates nesting), via the
    /// `config` crate's `Environment` source. No flag parser, no file
    /// format — those are left to whatever deploys this gateway.
    pub fn from_env() -> Result<Self> {
        let loaded = config::Config::builder()
            .set_default("listen_address", "0.0.0.0:8080")
            .map_err(|e| GatewayError::Invalid { reason: e.to_string() })?
            .set_default("dev_mode", false)
            .map_err(|e| GatewayError::Invalid { reason: e.to_string() })?
            .add_source(config::Environment::with_prefix("SQLGATE").separator("__").try_parsing(true))
            .build()
            .map_err(|e| GatewayError::Invalid { reason: e.to_string() })?;

        loaded.try_deserialize().map_err(|e| GatewayError::Invalid { reason: e.to_string() })
    }

    /// Enforces the startup invariants of spec §5/§6 that are checkable
    /// from configuration alone (connectivity probes and adapter/registry
    /// population happen later, at actual startup).
    pub fn validate(&self) -> Result<()> {
        if self.listen_address.trim().is_empty() {
            return Err(GatewayError::Invalid { reason: "listen_address must not be empty".to_string() });
        }
        if self.bearer_credential.trim().is_empty() && !self.dev_mode {
            return Err(GatewayError::Invalid {
                reason: "bearer_credential must not be empty outside dev_mode".to_string(),
            });
        }
        if self.repository_url.trim().is_empty() && !self.dev_mode {
            return Err(GatewayError::Invalid {
                reason: "repository_url must not be empty outside dev_mode (or set dev_mode to use the in-memory repository)".to_string(),
            });
        }
        if !self.dev_mode && self.adapters.is_empty() {
            return Err(GatewayError::Invalid {
                reason: "at least one adapter must be configured outside dev_mode".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GatewayConfig {
        GatewayConfig {
            listen_address: "0.0.0.0:8080".to_string(),
            bearer_credential: "s3cr3t".to_string(),
            repository_url: "postgres://localhost/gateway".to_string(),
            adapters: vec![AdapterConfig { name: "embedded".to_string(), connection_string: "local://".to_string() }],
            dev_mode: false,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn empty_listen_address_is_rejected() {
        let mut config = valid_config();
        config.listen_address = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_credential_outside_dev_mode_is_rejected() {
        let mut config = valid_config();
        config.bearer_credential = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn dev_mode_allows_missing_repository_and_adapters() {
        let config = GatewayConfig {
            listen_address: "127.0.0.1:8080".to_string(),
            bearer_credential: "".to_string(),
            repository_url: "".to_string(),
            adapters: vec![],
            dev_mode: true,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn no_adapters_outside_dev_mode_is_rejected() {
        let mut config = valid_config();
        config.adapters = vec![];
        assert!(config.validate().is_err());
    }
}
