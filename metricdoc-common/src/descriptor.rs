use serde::{Deserialize, Serialize};

/// One documented metric: name, human-readable description and value type.
///
/// `value_type` is kept verbatim as discovered (e.g. "Gauge", "Histogram").
/// It is empty when no `# TYPE` line was found for the metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    /// Metric name (e.g., "kubevirt_vmi_memory_resident_bytes").
    pub name: String,

    /// Free-text sentence describing the metric.
    pub description: String,

    /// Title-cased value type label.
    pub value_type: String,
}

impl MetricDescriptor {
    /// Create a new descriptor.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        value_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value_type: value_type.into(),
        }
    }

    /// Whether a value type was discovered for this metric.
    pub fn has_type(&self) -> bool {
        !self.value_type.is_empty()
    }
}

/// Upper-case the first letter of every word in `s`.
///
/// A word starts after any character that is not alphanumeric or `_`, so
/// `"gauge"` becomes `"Gauge"` and `"vm-count"` becomes `"Vm-Count"`.
/// The remaining characters are left untouched.
pub fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_separator = true;

    for c in s.chars() {
        if prev_separator {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        prev_separator = is_word_separator(c);
    }

    result
}

fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}
