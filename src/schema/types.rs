//! Table definitions and their compiled, validated form.
//!
//! Tables are declared as `static` [`TableDef`]s carrying SQL type names;
//! [`SchemaRegistry`](super::SchemaRegistry) compiles them into [`Entity`]
//! values with typed columns.

use crate::error::{LeadsError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static VARCHAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^varchar\((\d+)\)$").expect("valid varchar pattern"));

/// Static declaration of one column.
#[derive(Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub primary_key: bool,
    pub nullable: bool,
}

impl ColumnDef {
    /// Part of the primary key (never nullable).
    pub const fn key(name: &'static str, sql_type: &'static str) -> Self {
        ColumnDef { name, sql_type, primary_key: true, nullable: false }
    }

    pub const fn required(name: &'static str, sql_type: &'static str) -> Self {
        ColumnDef { name, sql_type, primary_key: false, nullable: false }
    }

    pub const fn optional(name: &'static str, sql_type: &'static str) -> Self {
        ColumnDef { name, sql_type, primary_key: false, nullable: true }
    }
}

/// Static declaration of a composite foreign key.
#[derive(Debug)]
pub struct ForeignKeyDef {
    pub columns: &'static [&'static str],
    pub references: &'static str,
    pub referenced_columns: &'static [&'static str],
}

/// Static declaration of one table.
#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub unique: &'static [&'static [&'static str]],
    pub foreign_keys: &'static [ForeignKeyDef],
}

/// The two scalar kinds a column can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text { max_len: Option<u32> },
    Integer,
}

impl ColumnType {
    /// Parse a declared SQL type name. Returns `None` for anything that is
    /// not a text or integer type.
    pub fn parse(sql_type: &str) -> Option<Self> {
        let normalized = sql_type.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "integer" | "int" | "bigint" => Some(ColumnType::Integer),
            "text" => Some(ColumnType::Text { max_len: None }),
            other => VARCHAR_REGEX
                .captures(other)
                .and_then(|caps| caps[1].parse().ok())
                .map(|len| ColumnType::Text { max_len: Some(len) }),
        }
    }

    /// SQL spelling used when rendering DDL.
    pub fn sql_name(&self) -> String {
        match self {
            ColumnType::Text { max_len: Some(len) } => format!("VARCHAR({len})"),
            ColumnType::Text { max_len: None } => "TEXT".to_string(),
            ColumnType::Integer => "INTEGER".to_string(),
        }
    }
}

/// A compiled column.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
}

/// A compiled composite foreign key: local columns map position-wise onto
/// the referenced entity's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub columns: Vec<&'static str>,
    pub references: &'static str,
    pub referenced_columns: Vec<&'static str>,
}

/// A relational table known to the registry.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: &'static str,
    pub fields: Vec<Field>,
    pub primary_key: Vec<&'static str>,
    pub unique_keys: Vec<Vec<&'static str>>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Entity {
    pub(crate) fn compile(def: &'static TableDef) -> Result<Self> {
        let mut fields = Vec::with_capacity(def.columns.len());
        for column in def.columns {
            let column_type =
                ColumnType::parse(column.sql_type).ok_or_else(|| {
                    LeadsError::UnsupportedColumnType {
                        entity: def.name.to_string(),
                        column: column.name.to_string(),
                        sql_type: column.sql_type.to_string(),
                    }
                })?;
            fields.push(Field {
                name: column.name,
                column_type,
                nullable: column.nullable && !column.primary_key,
            });
        }

        Ok(Entity {
            name: def.name,
            fields,
            primary_key: def
                .columns
                .iter()
                .filter(|c| c.primary_key)
                .map(|c| c.name)
                .collect(),
            unique_keys: def.unique.iter().map(|cols| cols.to_vec()).collect(),
            foreign_keys: def
                .foreign_keys
                .iter()
                .map(|fk| ForeignKey {
                    columns: fk.columns.to_vec(),
                    references: fk.references,
                    referenced_columns: fk.referenced_columns.to_vec(),
                })
                .collect(),
        })
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Whether `columns` (as a set) is the primary key or a unique key.
    pub fn is_key(&self, columns: &[&str]) -> bool {
        let same_set = |key: &[&'static str]| {
            key.len() == columns.len() && columns.iter().all(|c| key.iter().any(|k| k == c))
        };
        same_set(self.primary_key.as_slice()) || self.unique_keys.iter().any(|key| same_set(key.as_slice()))
    }
}
