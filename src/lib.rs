//! # Leads - Buyer coverage import and lookup
//!
//! Imports the nested leads configuration document (buyers, their tiers,
//! dealers, makes, models and years) into normalized relational tables, and
//! answers coverage queries over the result.
//!
//! ## Modules
//!
//! - **schema**: Static table definitions, compiled into a registry with DDL
//! - **generate**: Walk the document and accumulate rows per entity
//! - **emit**: Write rows as `COPY`/`INSERT` statements or load them into SQLite
//! - **coverage**: Which of a buyer's dealers cover a zipcode for a make
//!
//! ## Quick Start
//!
//! ```rust
//! use leads::{extract_document, ImportConfig};
//! use serde_json::json;
//!
//! # fn main() -> leads::Result<()> {
//! let document = json!({
//!     "makes": {
//!         "honda": {"slug": "honda", "name": "Honda", "years": [2020, 2021]}
//!     }
//! });
//!
//! let rows = extract_document(&document, &ImportConfig::default())?;
//!
//! // one make row, one make_year row per listed year
//! assert_eq!(rows.table("make").map(|t| t.rows.len()), Some(1));
//! assert_eq!(rows.table("make_year").map(|t| t.rows.len()), Some(2));
//! # Ok(())
//! # }
//! ```

use rusqlite::Connection;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub mod config;
pub mod coverage;
pub mod document;
pub mod emit;
pub mod error;
pub mod generate;
pub mod schema;

// Re-export commonly used types for convenience
pub use config::{DocumentFormat, ImportConfig, LoggingConfig, StatementFormat};
pub use coverage::{CoverageQuery, CoverageResolver, CoverageResult, CoverageRow, ResponseEnvelope};
pub use emit::{LoadReport, SqliteLoader, StatementWriter};
pub use error::{LeadsError, Result};
pub use generate::{GeneratorTree, RowExtractor, RowSet};
pub use schema::{Entity, SchemaRegistry};

/// Extract the rows of an already parsed document.
pub fn extract_document(document: &Value, config: &ImportConfig) -> Result<RowSet> {
    let registry = SchemaRegistry::new()?;
    let tree = GeneratorTree::leads(&registry)?;
    RowExtractor::new(&tree)
        .validate_required(config.validate_required)
        .extract(document)
}

/// Main entry point: import a document file as load statements.
///
/// With `with_schema` set, the statements are preceded by the DDL of every
/// table. Nothing is written if any part of the document is rejected.
pub fn import_to_writer<W: Write>(source: &Path, writer: W, config: &ImportConfig) -> Result<RowSet> {
    let document = document::load_document(source, config.document_format)?;
    info!(source = %source.display(), "loaded document");

    let rows = extract_document(&document, config)?;
    let preamble = if config.with_schema {
        Some(SchemaRegistry::new()?.ddl()?)
    } else {
        None
    };

    StatementWriter::new(writer, config.format).write_rows(&rows, preamble.as_deref())?;
    Ok(rows)
}

/// Import a document file straight into SQLite, replacing previously
/// imported data in a single transaction.
pub fn import_to_sqlite(source: &Path, conn: &mut Connection, config: &ImportConfig) -> Result<LoadReport> {
    let document = document::load_document(source, config.document_format)?;
    info!(source = %source.display(), "loaded document");

    let rows = extract_document(&document, config)?;
    let mut loader = SqliteLoader::new(conn)?;
    if config.with_schema {
        loader.create_schema(&SchemaRegistry::new()?)?;
    }
    loader.load(&rows, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_nested_keys() {
        let document = json!({
            "buyers": {"b1": {"slug": "b1", "name": "Buyer One",
                "tiers": {"t1": {"slug": "t1", "name": "Tier One",
                    "makes": {"honda": {"models": {"civic": {"years": [2020]}}}}}}}}
        });

        let rows = extract_document(&document, &ImportConfig::default()).unwrap();
        let leaf = rows.table("buyer_tier_make_model_year").unwrap();

        assert_eq!(leaf.rows.len(), 1);
        assert_eq!(leaf.value(0, "buyer_slug"), Some(&json!("b1")));
        assert_eq!(leaf.value(0, "tier_slug"), Some(&json!("t1")));
        assert_eq!(leaf.value(0, "make_slug"), Some(&json!("honda")));
        assert_eq!(leaf.value(0, "model_slug"), Some(&json!("civic")));
        assert_eq!(leaf.value(0, "year_slug"), Some(&json!(2020)));
    }

    #[test]
    fn test_unrecognized_key_aborts() {
        let document = json!({"makes": {"honda": {"slug": "honda", "name": "Honda", "bogus": 1}}});
        let err = extract_document(&document, &ImportConfig::default()).unwrap_err();
        assert!(matches!(err, LeadsError::UnrecognizedKey { ref key, .. } if key == "bogus"));
    }
}
