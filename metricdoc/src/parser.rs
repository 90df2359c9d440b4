//! Parser for the `# HELP` / `# TYPE` annotations of the Prometheus text format.
//!
//! Only metadata is extracted; sample lines are skipped. A HELP line for metric
//! `M` is paired with the first later TYPE line declaring `M`. The search for
//! that TYPE line advances the same cursor as the outer scan, so lines passed
//! over while searching are never examined as HELP lines.

use std::io::{self, BufRead};

use metricdoc_common::{MetricDescriptor, title_case};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::MalformedLinePolicy;
use crate::error::{GeneratorError, Result};

const HELP_PREFIX: &str = "# HELP ";
const TYPE_PREFIX: &str = "# TYPE ";

/// Why a HELP or TYPE line could not be tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("not a {0} line")]
    WrongKind(&'static str),
    #[error("missing metric name")]
    MissingName,
    #[error("missing description")]
    MissingDescription,
    #[error("missing metric type")]
    MissingType,
}

/// A tokenized `# HELP <name> <description...>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpLine<'a> {
    pub name: &'a str,
    /// Description tokens joined by single spaces, first token title-cased.
    pub description: String,
}

impl<'a> HelpLine<'a> {
    /// The metric name declared by a HELP line, if `line` is one and has a name.
    pub fn declared_name(line: &'a str) -> Option<&'a str> {
        line.strip_prefix(HELP_PREFIX)?.split_whitespace().next()
    }

    /// Tokenize a HELP line.
    pub fn parse(line: &'a str) -> std::result::Result<Self, LineError> {
        let rest = line
            .strip_prefix(HELP_PREFIX)
            .ok_or(LineError::WrongKind("HELP"))?;
        let mut tokens = rest.split_whitespace();

        let name = tokens.next().ok_or(LineError::MissingName)?;
        let first = tokens.next().ok_or(LineError::MissingDescription)?;

        let mut description = title_case(first);
        for token in tokens {
            description.push(' ');
            description.push_str(token);
        }

        Ok(Self { name, description })
    }
}

/// A tokenized `# TYPE <name> <type>` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeLine<'a> {
    pub name: &'a str,
    /// Type exactly as written (e.g. "gauge").
    pub metric_type: &'a str,
}

impl<'a> TypeLine<'a> {
    /// The metric name declared by a TYPE line, if `line` is one and has a name.
    pub fn declared_name(line: &'a str) -> Option<&'a str> {
        line.strip_prefix(TYPE_PREFIX)?.split_whitespace().next()
    }

    /// Tokenize a TYPE line.
    pub fn parse(line: &'a str) -> std::result::Result<Self, LineError> {
        let rest = line
            .strip_prefix(TYPE_PREFIX)
            .ok_or(LineError::WrongKind("TYPE"))?;
        let mut tokens = rest.split_whitespace();

        let name = tokens.next().ok_or(LineError::MissingName)?;
        let metric_type = tokens.next().ok_or(LineError::MissingType)?;

        Ok(Self { name, metric_type })
    }

    /// The type title-cased for documentation ("gauge" -> "Gauge").
    pub fn value_type(&self) -> String {
        title_case(self.metric_type)
    }
}

/// Extracts metric descriptors from exposition text.
#[derive(Debug, Clone)]
pub struct ExpositionParser {
    namespace: String,
    policy: MalformedLinePolicy,
}

impl ExpositionParser {
    /// Create a parser keeping metrics whose name contains `namespace`.
    pub fn new(namespace: impl Into<String>, policy: MalformedLinePolicy) -> Self {
        Self {
            namespace: namespace.into(),
            policy,
        }
    }

    /// Parse an exposition body held in memory.
    pub fn parse_str(&self, body: &str) -> Result<Vec<MetricDescriptor>> {
        self.parse(body.as_bytes())
    }

    /// Parse exposition text from `reader`.
    ///
    /// Returns one descriptor per qualifying HELP line reached by the scan.
    /// Read errors abort parsing.
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Vec<MetricDescriptor>> {
        let mut lines = reader.lines().enumerate().map(|(i, line)| (i + 1, line));
        let mut metrics = Vec::new();
        let mut skipped = 0usize;

        while let Some((line_number, line)) = lines.next() {
            let line = line.map_err(GeneratorError::Read)?;

            let Some(name) = HelpLine::declared_name(&line) else {
                continue;
            };
            if !name.contains(self.namespace.as_str()) {
                continue;
            }

            let help = match HelpLine::parse(&line) {
                Ok(help) => help,
                Err(e) => {
                    self.malformed(line_number, &line, e)?;
                    skipped += 1;
                    continue;
                }
            };

            let value_type = self.find_type(&mut lines, help.name)?;
            if value_type.is_empty() {
                debug!(name = help.name, "No TYPE line found");
            }
            metrics.push(MetricDescriptor::new(help.name, help.description, value_type));
        }

        debug!(
            metrics = metrics.len(),
            skipped,
            namespace = %self.namespace,
            "Parsed exposition body"
        );
        Ok(metrics)
    }

    /// Advance `lines` to the TYPE line declaring `name` and return its title-cased type.
    ///
    /// Reaching the end of input yields an empty type.
    fn find_type<I>(&self, lines: &mut I, name: &str) -> Result<String>
    where
        I: Iterator<Item = (usize, io::Result<String>)>,
    {
        for (line_number, line) in lines.by_ref() {
            let line = line.map_err(GeneratorError::Read)?;

            if TypeLine::declared_name(&line) != Some(name) {
                continue;
            }

            match TypeLine::parse(&line) {
                Ok(type_line) => return Ok(type_line.value_type()),
                Err(e) => self.malformed(line_number, &line, e)?,
            }
        }

        Ok(String::new())
    }

    fn malformed(&self, line_number: usize, line: &str, reason: LineError) -> Result<()> {
        match self.policy {
            MalformedLinePolicy::Fail => Err(GeneratorError::Malformed {
                line_number,
                line: line.to_string(),
                reason: reason.to_string(),
            }),
            MalformedLinePolicy::Skip => {
                warn!(line_number, line, %reason, "Skipping malformed line");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Read};

    fn parser() -> ExpositionParser {
        ExpositionParser::new("kubevirt_", MalformedLinePolicy::Fail)
    }

    fn skipping_parser() -> ExpositionParser {
        ExpositionParser::new("kubevirt_", MalformedLinePolicy::Skip)
    }

    #[test]
    fn test_help_line_tokens() {
        let help = HelpLine::parse("# HELP kubevirt_vmi_count some vm count.").unwrap();
        assert_eq!(help.name, "kubevirt_vmi_count");
        assert_eq!(help.description, "Some vm count.");
    }

    #[test]
    fn test_help_line_whitespace_collapsed() {
        let help = HelpLine::parse("# HELP kubevirt_x   spaced \t out   text.").unwrap();
        assert_eq!(help.description, "Spaced out text.");
    }

    #[test]
    fn test_help_line_errors() {
        assert_eq!(
            HelpLine::parse("# TYPE kubevirt_x gauge"),
            Err(LineError::WrongKind("HELP"))
        );
        assert_eq!(HelpLine::parse("# HELP "), Err(LineError::MissingName));
        assert_eq!(
            HelpLine::parse("# HELP kubevirt_x"),
            Err(LineError::MissingDescription)
        );
    }

    #[test]
    fn test_type_line_tokens() {
        let t = TypeLine::parse("# TYPE kubevirt_x histogram").unwrap();
        assert_eq!(t.name, "kubevirt_x");
        assert_eq!(t.metric_type, "histogram");
        assert_eq!(t.value_type(), "Histogram");
        assert_eq!(
            TypeLine::parse("# TYPE kubevirt_x"),
            Err(LineError::MissingType)
        );
    }

    #[test]
    fn test_parse_help_and_type_pair() {
        let body = "# HELP kubevirt_vmi_count some vm count.\n# TYPE kubevirt_vmi_count gauge\nkubevirt_vmi_count 3\n";

        let metrics = parser().parse_str(body).unwrap();

        assert_eq!(
            metrics,
            vec![MetricDescriptor::new(
                "kubevirt_vmi_count",
                "Some vm count.",
                "Gauge"
            )]
        );
    }

    #[test]
    fn test_type_found_later_in_stream() {
        let body = "\
# HELP kubevirt_a metric a.
kubevirt_a 1
# TYPE other_metric counter
# TYPE kubevirt_a counter
";
        let metrics = parser().parse_str(body).unwrap();

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].value_type, "Counter");
    }

    #[test]
    fn test_missing_type_is_empty() {
        let metrics = parser()
            .parse_str("# HELP kubevirt_untyped no type here.\n")
            .unwrap();

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].value_type, "");
        assert!(!metrics[0].has_type());
    }

    #[test]
    fn test_namespace_filter() {
        let body = "\
# HELP other_metric_x desc.
# TYPE other_metric_x gauge
# HELP kubevirt_y desc.
# TYPE kubevirt_y gauge
";
        let metrics = parser().parse_str(body).unwrap();

        let names: Vec<&str> = metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["kubevirt_y"]);
    }

    #[test]
    fn test_filter_applies_to_name_not_description() {
        let body = "# HELP process_open_fds mirrors kubevirt_ fds.\n# TYPE process_open_fds gauge\n";
        assert!(parser().parse_str(body).unwrap().is_empty());
    }

    #[test]
    fn test_help_lines_passed_during_type_search_are_not_revisited() {
        let body = "\
# HELP kubevirt_a metric a.
# HELP kubevirt_b metric b.
# TYPE kubevirt_a gauge
# TYPE kubevirt_b gauge
";
        let metrics = parser().parse_str(body).unwrap();

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "kubevirt_a");
    }

    #[test]
    fn test_malformed_help_fails_by_default() {
        let body = "# HELP kubevirt_ok fine.\n# TYPE kubevirt_ok gauge\n# HELP kubevirt_short\n";

        let err = parser().parse_str(body).unwrap_err();

        match err {
            GeneratorError::Malformed {
                line_number,
                line,
                reason,
            } => {
                assert_eq!(line_number, 3);
                assert_eq!(line, "# HELP kubevirt_short");
                assert_eq!(reason, "missing description");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_help_skipped_with_skip_policy() {
        let body = "\
# HELP kubevirt_short
# HELP kubevirt_ok fine.
# TYPE kubevirt_ok gauge
";
        let metrics = skipping_parser().parse_str(body).unwrap();

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "kubevirt_ok");
    }

    #[test]
    fn test_malformed_type_line() {
        let body = "# HELP kubevirt_a metric a.\n# TYPE kubevirt_a\n# TYPE kubevirt_a gauge\n";

        assert!(matches!(
            parser().parse_str(body),
            Err(GeneratorError::Malformed { line_number: 2, .. })
        ));

        let metrics = skipping_parser().parse_str(body).unwrap();
        assert_eq!(metrics[0].value_type, "Gauge");
    }

    #[test]
    fn test_malformed_line_outside_namespace_ignored() {
        let body = "# HELP go_gc\n# HELP kubevirt_a metric a.\n# TYPE kubevirt_a gauge\n";
        assert_eq!(parser().parse_str(body).unwrap().len(), 1);
    }

    struct FailingReader {
        data: &'static [u8],
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::other("connection reset"));
            }
            self.served = true;
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            Ok(n)
        }
    }

    #[test]
    fn test_read_error_aborts() {
        let reader = BufReader::new(FailingReader {
            data: b"# HELP kubevirt_a metric a.\n",
            served: false,
        });

        let err = parser().parse(reader).unwrap_err();

        assert!(matches!(err, GeneratorError::Read(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parser().parse_str("").unwrap().is_empty());
    }
}
