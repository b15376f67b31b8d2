//! `CREATE TABLE` rendering for a compiled registry.

use super::registry::SchemaRegistry;
use super::types::Entity;
use crate::error::Result;

/// Render one `CREATE TABLE IF NOT EXISTS` statement.
pub fn create_table_sql(entity: &Entity) -> String {
    let mut lines: Vec<String> = entity
        .fields
        .iter()
        .map(|field| {
            let null = if field.nullable { "" } else { " NOT NULL" };
            format!("    {} {}{null}", field.name, field.column_type.sql_name())
        })
        .collect();

    lines.push(format!("    PRIMARY KEY ({})", entity.primary_key.join(", ")));
    for key in &entity.unique_keys {
        lines.push(format!("    UNIQUE ({})", key.join(", ")));
    }
    for fk in &entity.foreign_keys {
        lines.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {} ({})",
            fk.columns.join(", "),
            fk.references,
            fk.referenced_columns.join(", ")
        ));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n);\n",
        entity.name,
        lines.join(",\n")
    )
}

impl SchemaRegistry {
    /// DDL for every entity, parents first.
    pub fn ddl(&self) -> Result<String> {
        let mut sql = String::new();
        for name in self.topological_order()? {
            let entity = self.get_entity(name)?;
            sql.push_str(&format!("\n-- Create table `{name}`\n"));
            sql.push_str(&create_table_sql(entity));
        }
        Ok(sql)
    }
}
