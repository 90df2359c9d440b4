//! Metric collector that stores metric families and renders them as exposition text.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::ExpositionError;
use crate::mapping::{
    MetricType, escape_help, format_labels, format_value, is_valid_metric_name,
    sanitize_label_name,
};

/// A single sample line of a metric family.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Suffix appended to the family name (e.g. "_bucket", "_sum"); empty for plain samples.
    pub suffix: String,
    /// Label key-value pairs, sorted by key.
    pub labels: Vec<(String, String)>,
    /// Sample value.
    pub value: f64,
}

impl Sample {
    /// Create a sample without suffix.
    pub fn new(labels: &[(&str, &str)], value: f64) -> Self {
        Self::with_suffix("", labels, value)
    }

    /// Create a sample with a name suffix (histogram and summary series).
    pub fn with_suffix(suffix: &str, labels: &[(&str, &str)], value: f64) -> Self {
        let mut labels: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (sanitize_label_name(k), (*v).to_string()))
            .collect();
        labels.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            suffix: suffix.to_string(),
            labels,
            value,
        }
    }
}

/// A named metric with its HELP text, TYPE and samples.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    /// The full metric name.
    pub name: String,
    /// HELP docstring.
    pub help: String,
    /// Metric type.
    pub metric_type: MetricType,
    /// Samples rendered below the TYPE line.
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    /// Create a family with no samples.
    pub fn new(name: impl Into<String>, help: impl Into<String>, metric_type: MetricType) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            metric_type,
            samples: Vec::new(),
        }
    }

    /// Create a gauge family.
    pub fn gauge(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, help, MetricType::Gauge)
    }

    /// Create a counter family.
    pub fn counter(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, help, MetricType::Counter)
    }

    /// Create a histogram family.
    pub fn histogram(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, help, MetricType::Histogram)
    }

    /// Add a plain sample.
    pub fn with_sample(mut self, labels: &[(&str, &str)], value: f64) -> Self {
        self.samples.push(Sample::new(labels, value));
        self
    }

    /// Add a full histogram series: cumulative buckets, `_sum` and `_count`.
    pub fn with_histogram(
        mut self,
        labels: &[(&str, &str)],
        buckets: &[(f64, u64)],
        sum: f64,
    ) -> Self {
        let mut count = 0;
        for (upper, cumulative) in buckets {
            let le = format_value(*upper);
            let mut bucket_labels = labels.to_vec();
            bucket_labels.push(("le", &le));
            self.samples.push(Sample::with_suffix(
                "_bucket",
                &bucket_labels,
                *cumulative as f64,
            ));
            count = *cumulative;
        }

        let mut inf_labels = labels.to_vec();
        inf_labels.push(("le", "+Inf"));
        self.samples
            .push(Sample::with_suffix("_bucket", &inf_labels, count as f64));
        self.samples.push(Sample::with_suffix("_sum", labels, sum));
        self.samples
            .push(Sample::with_suffix("_count", labels, count as f64));
        self
    }
}

/// Collector statistics.
#[derive(Debug, Clone, Default)]
pub struct CollectorStats {
    /// Families accepted by `register`.
    pub families_registered: u64,
    /// Families rejected because of an invalid name.
    pub families_rejected: u64,
    /// Number of times the collector was rendered.
    pub renders: u64,
}

/// Thread-safe store of metric families.
#[derive(Default)]
pub struct MetricCollector {
    /// Families indexed by metric name.
    families: RwLock<BTreeMap<String, MetricFamily>>,
    /// Statistics.
    stats: RwLock<CollectorStats>,
}

impl MetricCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric family, replacing any family with the same name.
    pub fn register(&self, family: MetricFamily) -> Result<(), ExpositionError> {
        if !is_valid_metric_name(&family.name) {
            self.stats.write().families_rejected += 1;
            warn!(name = %family.name, "Rejected metric family with invalid name");
            return Err(ExpositionError::InvalidMetricName(family.name));
        }

        debug!(name = %family.name, metric_type = %family.metric_type, "Registered metric family");
        self.families.write().insert(family.name.clone(), family);
        self.stats.write().families_registered += 1;
        Ok(())
    }

    /// Register several families at once.
    pub fn register_all(
        &self,
        families: impl IntoIterator<Item = MetricFamily>,
    ) -> Result<(), ExpositionError> {
        for family in families {
            self.register(family)?;
        }
        Ok(())
    }

    /// Get the current number of registered families.
    pub fn family_count(&self) -> usize {
        self.families.read().len()
    }

    /// Get collector statistics.
    pub fn stats(&self) -> CollectorStats {
        self.stats.read().clone()
    }

    /// Render all families in Prometheus text exposition format.
    ///
    /// Families appear in name order; each one is a `# HELP` line, a `# TYPE`
    /// line and its samples.
    pub fn render(&self) -> String {
        let families = self.families.read();
        let mut output = String::with_capacity(families.len() * 128);

        for family in families.values() {
            writeln!(output, "# HELP {} {}", family.name, escape_help(&family.help)).ok();
            writeln!(output, "# TYPE {} {}", family.name, family.metric_type).ok();

            for sample in &family.samples {
                writeln!(
                    output,
                    "{}{}{} {}",
                    family.name,
                    sample.suffix,
                    format_labels(&sample.labels),
                    format_value(sample.value)
                )
                .ok();
            }
        }
        drop(families);

        self.stats.write().renders += 1;
        output
    }
}

/// Create a shareable collector handle.
pub type SharedCollector = Arc<MetricCollector>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_render_gauge() {
        let collector = MetricCollector::new();
        collector
            .register(
                MetricFamily::gauge("kubevirt_vmi_memory_resident_bytes", "resident set size.")
                    .with_sample(&[("node", "node01"), ("name", "testvmi")], 1024.0),
            )
            .unwrap();

        let output = collector.render();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "# HELP kubevirt_vmi_memory_resident_bytes resident set size."
        );
        assert_eq!(lines[1], "# TYPE kubevirt_vmi_memory_resident_bytes gauge");
        assert_eq!(
            lines[2],
            "kubevirt_vmi_memory_resident_bytes{name=\"testvmi\",node=\"node01\"} 1024"
        );
    }

    #[test]
    fn test_render_sorted_by_name() {
        let collector = MetricCollector::new();
        collector
            .register_all([
                MetricFamily::gauge("zeta_metric", "last."),
                MetricFamily::counter("alpha_metric_total", "first."),
            ])
            .unwrap();

        let output = collector.render();
        let alpha = output.find("# HELP alpha_metric_total").unwrap();
        let zeta = output.find("# HELP zeta_metric").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn test_histogram_series() {
        let family = MetricFamily::histogram("kubevirt_test_seconds", "test histogram.")
            .with_histogram(&[("phase", "Running")], &[(0.5, 1), (1.0, 3)], 2.25);

        let suffixes: Vec<&str> = family.samples.iter().map(|s| s.suffix.as_str()).collect();
        assert_eq!(
            suffixes,
            vec!["_bucket", "_bucket", "_bucket", "_sum", "_count"]
        );

        let inf = &family.samples[2];
        assert!(inf.labels.contains(&("le".to_string(), "+Inf".to_string())));
        assert_eq!(inf.value, 3.0);
        assert_eq!(family.samples[4].value, 3.0);
    }

    #[test]
    fn test_register_rejects_invalid_name() {
        let collector = MetricCollector::new();
        let result = collector.register(MetricFamily::gauge("bad name", "help."));

        assert!(matches!(result, Err(ExpositionError::InvalidMetricName(_))));
        assert_eq!(collector.family_count(), 0);
        assert_eq!(collector.stats().families_rejected, 1);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let collector = MetricCollector::new();
        collector
            .register(MetricFamily::gauge("kubevirt_x", "old."))
            .unwrap();
        collector
            .register(MetricFamily::gauge("kubevirt_x", "new."))
            .unwrap();

        assert_eq!(collector.family_count(), 1);
        assert!(collector.render().contains("# HELP kubevirt_x new."));
    }

    #[test]
    fn test_empty_collector_render() {
        let collector = MetricCollector::new();
        assert_eq!(collector.render(), "");
        assert_eq!(collector.stats().renders, 1);
    }
}
