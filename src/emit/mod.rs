//! Bulk emission of extracted rows
//!
//! Rows leave the crate either as a SQL script (`COPY` blocks or `INSERT`
//! statements, one per entity, parents first) or loaded straight into a
//! SQLite database.

pub mod cell;
pub mod sqlite;
pub mod writer;

pub use cell::Cell;
pub use sqlite::{LoadReport, SqliteLoader};
pub use writer::{render_entity, render_statements, StatementWriter};
