//! Import and logging configuration.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// How extracted rows are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementFormat {
    /// `COPY ... FROM STDIN` with CSV payload rows.
    #[default]
    Copy,
    /// Multi-row `INSERT ... VALUES` statements.
    Insert,
}

/// Source document syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

/// Configuration for the import pipeline
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Statement syntax when emitting to a stream
    pub format: StatementFormat,

    /// Reject rows with unpopulated key or `NOT NULL` columns during
    /// extraction instead of leaving them to the storage layer
    pub validate_required: bool,

    /// Prepend `CREATE TABLE` statements (or create tables in SQLite)
    pub with_schema: bool,

    /// Force a document syntax instead of guessing from the file extension
    pub document_format: Option<DocumentFormat>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            format: StatementFormat::Copy,
            validate_required: true,
            with_schema: false,
            document_format: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber. Output goes to stderr so that
    /// statement output on stdout stays clean.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
