//! Markdown rendering of the metric catalog.

use std::fmt::{self, Write as _};
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use metricdoc_common::MetricDescriptor;
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::catalog::MetricCatalog;
use crate::error::{GeneratorError, Result};

const GEN_FILE_COMMENT: &str = "<!--
\tThis is an auto-generated file.
\tPLEASE DO NOT EDIT THIS FILE.
\tSee \"Developing new metrics\" below how to generate this file
-->";

const TITLE: &str = "# KubeVirt metrics\n";

const BACKGROUND: &str = "This document aims to help users that are not familiar with all metrics exposed by different KubeVirt components.\n\
All metrics documented here are auto-generated by the utility tool `metricdoc` and reflects exactly what is being exposed.\n\n";

const KV_SPECIFIC_METRICS: &str = "## KubeVirt Metrics List\n\
### kubevirt_info\n\
Version information.\n\n";

const FOOTER_HEADING: &str = "## Developing new metrics\n";

const FOOTER_CONTENT: &str = "After developing new metrics or changing old ones, please run `make generate` to regenerate this document.\n\n\
If you feel that the new metric doesn't follow these rules, please change `metricdoc` with your needs.\n";

/// Write one metric block: heading, description with type, blank line.
fn write_metric<W: fmt::Write>(out: &mut W, metric: &MetricDescriptor) -> fmt::Result {
    writeln!(out, "### {}", metric.name)?;
    writeln!(out, "{} Type: {}.", metric.description, metric.value_type)?;
    writeln!(out)
}

/// Render the complete document.
pub fn render_document<W: fmt::Write>(out: &mut W, catalog: &MetricCatalog) -> fmt::Result {
    write!(out, "{GEN_FILE_COMMENT}\n\n{TITLE}{BACKGROUND}{KV_SPECIFIC_METRICS}")?;

    for metric in catalog {
        write_metric(out, metric)?;
    }

    write!(out, "{FOOTER_HEADING}{FOOTER_CONTENT}")
}

/// Render the complete document into a string.
pub fn render_to_string(catalog: &MetricCatalog) -> String {
    let mut out = String::with_capacity(1024 + catalog.len() * 160);
    render_document(&mut out, catalog).ok();
    out
}

/// Create the temporary file that will replace `path`.
///
/// An existing destination keeps its permissions. A new one gets the mode a
/// plain file create would give it (0666 minus the umask).
fn replacement_file(dir: &Path, path: &Path) -> io::Result<NamedTempFile> {
    match fs::metadata(path) {
        Ok(meta) => {
            let file = Builder::new().tempfile_in(dir)?;
            file.as_file().set_permissions(meta.permissions())?;
            Ok(file)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let mut builder = Builder::new();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                builder.permissions(fs::Permissions::from_mode(0o666));
            }
            builder.tempfile_in(dir)
        }
        Err(e) => Err(e),
    }
}

/// Render the document and replace `path` with it.
///
/// The document is written to a temporary file next to `path` and renamed
/// into place, so `path` never holds a partial document.
pub fn write_document(path: &Path, catalog: &MetricCatalog) -> Result<()> {
    let document = render_to_string(catalog);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = replacement_file(dir, path).map_err(|e| GeneratorError::write(path, e))?;
    file.write_all(document.as_bytes())
        .map_err(|e| GeneratorError::write(path, e))?;
    file.as_file()
        .sync_all()
        .map_err(|e| GeneratorError::write(path, e))?;
    file.persist(path)
        .map_err(|e| GeneratorError::write(path, e.error))?;

    debug!(path = %path.display(), bytes = document.len(), "Document written");
    Ok(())
}
