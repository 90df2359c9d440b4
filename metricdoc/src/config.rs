//! Configuration for the documentation generator.

use std::path::{Path, PathBuf};

use metricdoc_common::LoggingConfig;
use metricdoc_exposition::ExpositionConfig;
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

/// What to do with a HELP or TYPE line that lacks required tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Abort the run (default).
    #[default]
    Fail,
    /// Log a warning and continue with the next line.
    Skip,
}

/// Complete generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Output document path (default: "newmetrics.md").
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Substring a metric name must contain to be documented (default: "kubevirt_").
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Handling of malformed HELP/TYPE lines.
    #[serde(default)]
    pub on_malformed: MalformedLinePolicy,

    /// Install namespace substituted into recording rule expressions.
    #[serde(default)]
    pub rules_namespace: String,

    /// In-process exposition endpoint settings.
    #[serde(default)]
    pub exposition: ExpositionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_output() -> PathBuf {
    PathBuf::from("newmetrics.md")
}

fn default_namespace() -> String {
    "kubevirt_".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            namespace: default_namespace(),
            on_malformed: MalformedLinePolicy::default(),
            rules_namespace: String::new(),
            exposition: ExpositionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: GeneratorConfig = metricdoc_common::load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON5 file without validating it.
    ///
    /// Used when command-line overrides still have to be applied; call
    /// [`validate`](Self::validate) afterwards.
    pub fn load_unvalidated<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(metricdoc_common::load_config(path)?)
    }

    /// Replace the output path and log level when given.
    pub fn apply_overrides(&mut self, output: Option<PathBuf>, log_level: Option<String>) {
        if let Some(output) = output {
            self.output = output;
        }
        if let Some(level) = log_level {
            self.logging.level = level;
        }
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: GeneratorConfig = metricdoc_common::parse_config(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.output.as_os_str().is_empty() {
            return Err(GeneratorError::config("output must not be empty"));
        }

        if self.namespace.trim().is_empty() {
            return Err(GeneratorError::config("namespace must not be empty"));
        }

        self.exposition
            .validate()
            .map_err(|e| GeneratorError::config(format!("exposition: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metricdoc_common::LogFormat;

    #[test]
    fn test_override_rescues_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metricdoc.json5");
        std::fs::write(&path, r#"{ output: "", logging: { level: "warn" } }"#).unwrap();

        assert!(GeneratorConfig::load_from_file(&path).is_err());

        let mut config = GeneratorConfig::load_unvalidated(&path).unwrap();
        config.apply_overrides(Some(PathBuf::from("out.md")), Some("debug".to_string()));

        assert!(config.validate().is_ok());
        assert_eq!(config.output, PathBuf::from("out.md"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_no_overrides_keeps_file_values() {
        let mut config = GeneratorConfig::parse(r#"{ output: "docs/metrics.md" }"#).unwrap();
        config.apply_overrides(None, None);

        assert_eq!(config.output, PathBuf::from("docs/metrics.md"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = GeneratorConfig::parse("{}").unwrap();

        assert_eq!(config.output, PathBuf::from("newmetrics.md"));
        assert_eq!(config.namespace, "kubevirt_");
        assert_eq!(config.on_malformed, MalformedLinePolicy::Fail);
        assert_eq!(config.rules_namespace, "");
        assert_eq!(config.exposition.path, "/metrics");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            output: "docs/metrics.md",
            namespace: "kubevirt_vmi_",
            on_malformed: "skip",
            rules_namespace: "kubevirt",
            exposition: {
                path: "/scrape",
                collectors: { process: false }
            },
            logging: {
                level: "debug",
                format: "json"
            }
        }"#;

        let config = GeneratorConfig::parse(json).unwrap();

        assert_eq!(config.output, PathBuf::from("docs/metrics.md"));
        assert_eq!(config.namespace, "kubevirt_vmi_");
        assert_eq!(config.on_malformed, MalformedLinePolicy::Skip);
        assert_eq!(config.rules_namespace, "kubevirt");
        assert_eq!(config.exposition.path, "/scrape");
        assert!(!config.exposition.collectors.process);
        assert!(config.exposition.collectors.domain);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validate_empty_namespace() {
        let result = GeneratorConfig::parse(r#"{ namespace: "  " }"#);
        assert!(result.unwrap_err().to_string().contains("namespace"));
    }

    #[test]
    fn test_validate_empty_output() {
        let result = GeneratorConfig::parse(r#"{ output: "" }"#);
        assert!(result.unwrap_err().to_string().contains("output"));
    }

    #[test]
    fn test_validate_exposition_path() {
        let result = GeneratorConfig::parse(r#"{ exposition: { path: "metrics" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result = GeneratorConfig::parse(r#"{ on_malformed: "ignore" }"#);
        assert!(matches!(result, Err(GeneratorError::Config(_))));
    }
}
