//! Schema registry
//!
//! Static table definitions for the leads schema, compiled into typed
//! entities with validated composite foreign keys, plus DDL rendering.

pub mod ddl;
pub mod registry;
pub mod tables;
pub mod types;

pub use ddl::create_table_sql;
pub use registry::SchemaRegistry;
pub use types::{ColumnDef, ColumnType, Entity, Field, ForeignKey, ForeignKeyDef, TableDef};
