//! Configuration for the in-process exposition endpoint.

use serde::{Deserialize, Serialize};

use crate::error::ExpositionError;

/// Exposition endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpositionConfig {
    /// Path for metrics endpoint (default: "/metrics").
    #[serde(default = "default_path")]
    pub path: String,

    /// Which collectors are registered before the scrape.
    #[serde(default)]
    pub collectors: CollectorsConfig,
}

fn default_path() -> String {
    "/metrics".to_string()
}

impl Default for ExpositionConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            collectors: CollectorsConfig::default(),
        }
    }
}

/// Explicit collector selection.
///
/// Every collector is enabled by default so the scrape covers the whole
/// default exposition surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorsConfig {
    /// Per-domain statistics (memory, vCPU, network, storage).
    #[serde(default = "default_true")]
    pub domain: bool,

    /// VirtualMachine status metrics.
    #[serde(default = "default_true")]
    pub vm: bool,

    /// Migration counters.
    #[serde(default = "default_true")]
    pub migrations: bool,

    /// Process and runtime metrics from the client library.
    #[serde(default = "default_true")]
    pub process: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CollectorsConfig {
    fn default() -> Self {
        Self {
            domain: true,
            vm: true,
            migrations: true,
            process: true,
        }
    }
}

impl ExpositionConfig {
    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self, ExpositionError> {
        let config: ExpositionConfig = metricdoc_common::parse_config(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ExpositionError> {
        if !self.path.starts_with('/') {
            return Err(ExpositionError::Config(
                "Metrics path must start with /".to_string(),
            ));
        }

        Ok(())
    }
}
