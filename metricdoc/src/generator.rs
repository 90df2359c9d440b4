//! End-to-end generation: scrape, parse, merge, render.

use metricdoc_exposition::{ExpositionHandler, recording_rules};
use tracing::{info, instrument};

use crate::catalog::MetricCatalog;
use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::parser::ExpositionParser;
use crate::registry::{metrics_not_in_default_exposition, recording_rule_metrics};
use crate::render::write_document;

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Descriptors parsed from the scrape.
    pub scraped: usize,
    /// Descriptors from the static registry.
    pub registry: usize,
    /// Descriptors from recording rules.
    pub rules: usize,
    /// Total documented entries.
    pub total: usize,
}

/// Request `path` from `handler` and return the exposition body.
///
/// Any non-success status is an error.
pub async fn scrape_from(handler: &ExpositionHandler, path: &str) -> Result<String> {
    let response = handler.get(path).await?;

    if !response.status.is_success() {
        return Err(GeneratorError::ScrapeStatus {
            path: path.to_string(),
            status: response.status.as_u16(),
        });
    }

    info!(path, bytes = response.body.len(), "Scraped metrics endpoint");
    Ok(response.body)
}

/// Runs one documentation pass for a configuration.
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Build the configured exposition handler and scrape its metrics path.
    #[instrument(skip(self), fields(path = %self.config.exposition.path))]
    pub async fn scrape(&self) -> Result<String> {
        let handler = ExpositionHandler::new(&self.config.exposition)?;
        scrape_from(&handler, handler.metrics_path()).await
    }

    /// Build the catalog from an exposition body plus the static and rule sources.
    pub fn build_catalog(&self, body: &str) -> Result<(MetricCatalog, GenerationSummary)> {
        let parser = ExpositionParser::new(self.config.namespace.as_str(), self.config.on_malformed);
        let scraped = parser.parse_str(body)?;
        let registry = metrics_not_in_default_exposition();
        let rules = recording_rule_metrics(&recording_rules(&self.config.rules_namespace));

        let summary = GenerationSummary {
            scraped: scraped.len(),
            registry: registry.len(),
            rules: rules.len(),
            total: scraped.len() + registry.len() + rules.len(),
        };

        Ok((MetricCatalog::merge(scraped, registry, rules), summary))
    }

    /// Run the whole pipeline and write the document to the configured output.
    pub async fn run(&self) -> Result<GenerationSummary> {
        let body = self.scrape().await?;
        let (catalog, summary) = self.build_catalog(&body)?;

        write_document(&self.config.output, &catalog)?;

        info!(
            scraped = summary.scraped,
            registry = summary.registry,
            rules = summary.rules,
            total = summary.total,
            output = %self.config.output.display(),
            "Metrics document generated"
        );
        Ok(summary)
    }
}
