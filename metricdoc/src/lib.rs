//! metricdoc - generates the KubeVirt metrics reference document.
//!
//! A run scrapes the in-process exposition endpoint, extracts metric metadata
//! from its `# HELP` / `# TYPE` lines, adds the metrics that the default scrape
//! never shows (static registry and recording rules), sorts everything by name
//! and renders a single Markdown document.
//!
//! ```text
//! ┌──────────────┐   ┌──────────┐   ┌───────────────┐   ┌──────────┐
//! │    scrape    │──>│  parser  │──>│    catalog    │──>│  render  │
//! │  (/metrics)  │   │          │   │ merge + sort  │   │ (.md)    │
//! └──────────────┘   └──────────┘   └───────────────┘   └──────────┘
//!                                      ^         ^
//!                             registry ┘         └ recording rules
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod parser;
pub mod registry;
pub mod render;

pub use catalog::MetricCatalog;
pub use config::{GeneratorConfig, MalformedLinePolicy};
pub use error::{GeneratorError, Result};
pub use generator::{GenerationSummary, Generator, scrape_from};
pub use parser::ExpositionParser;
