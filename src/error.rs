//! Error types for the import pipeline and the coverage resolver.

use thiserror::Error;

/// Errors raised while building the schema, extracting rows, emitting
/// statements or querying coverage.
#[derive(Debug, Error)]
pub enum LeadsError {
    /// A node or query referenced an entity the registry does not know.
    #[error("unknown entity `{0}`")]
    UnknownEntity(String),

    /// A document key matched neither a column nor a child node.
    #[error("unknown key `{key}` inside `{node}` (entity `{entity}`) at `{path}`")]
    UnrecognizedKey {
        key: String,
        node: String,
        entity: String,
        path: String,
    },

    /// A column declared a SQL type that is neither text nor integer.
    #[error("unsupported column type `{sql_type}` for `{entity}.{column}`")]
    UnsupportedColumnType {
        entity: String,
        column: String,
        sql_type: String,
    },

    /// A key or non-nullable column was never populated by the document.
    #[error("missing required value `{entity}.{column}` at `{path}`")]
    MissingRequiredValue {
        entity: String,
        column: String,
        path: String,
    },

    /// A value cannot be rendered as its column's declared type.
    #[error("invalid value for `{entity}.{column}`: {reason}")]
    InvalidValue {
        entity: String,
        column: String,
        reason: String,
    },

    /// The document has the wrong shape for a node (e.g. a list where a map
    /// of entries is expected).
    #[error("invalid shape for `{node}` at `{path}`: expected {expected}")]
    InvalidShape {
        node: String,
        path: String,
        expected: &'static str,
    },

    /// The static table definitions are inconsistent.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// The source document could not be parsed.
    #[error("document error: {0}")]
    Document(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`LeadsError`].
pub type Result<T> = std::result::Result<T, LeadsError>;
