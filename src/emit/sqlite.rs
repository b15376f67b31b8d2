//! Direct loading of extracted rows into SQLite.
//!
//! The whole load runs in one transaction: either every row is inserted or
//! the database is left as it was.

use super::cell::Cell;
use crate::error::Result;
use crate::generate::RowSet;
use crate::schema::SchemaRegistry;
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, info};

/// Counts reported after a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub tables: usize,
    pub rows: usize,
}

/// Loads row sets into a SQLite connection with foreign keys enforced.
pub struct SqliteLoader<'a> {
    conn: &'a mut Connection,
}

impl<'a> SqliteLoader<'a> {
    pub fn new(conn: &'a mut Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Create every table of the registry if missing.
    pub fn create_schema(&mut self, registry: &SchemaRegistry) -> Result<()> {
        let sql = registry.ddl()?;
        let tx = self.conn.transaction()?;
        tx.execute_batch(&sql)?;
        tx.commit()?;
        Ok(())
    }

    /// Insert every row, parents first. With `replace`, existing rows of
    /// the loaded entities are deleted first (children first), so a
    /// re-import replaces the previous data set.
    pub fn load(&mut self, rows: &RowSet, replace: bool) -> Result<LoadReport> {
        let tx = self.conn.transaction()?;

        if replace {
            for table in rows.tables().rev() {
                tx.execute(&format!("DELETE FROM {}", table.entity), [])?;
            }
        }

        let mut report = LoadReport::default();
        for table in rows.tables().filter(|t| !t.is_empty()) {
            let columns: Vec<&str> = table.columns.iter().map(|f| f.name).collect();
            let placeholders: Vec<String> =
                (1..=columns.len()).map(|idx| format!("?{idx}")).collect();
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table.entity,
                columns.join(", "),
                placeholders.join(", ")
            ))?;

            for row in &table.rows {
                let cells = table
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(field, value)| Cell::coerce(table.entity, field, value.as_ref()))
                    .collect::<Result<Vec<_>>>()?;
                stmt.execute(params_from_iter(cells.iter()))?;
            }

            debug!(entity = table.entity, rows = table.rows.len(), "loaded");
            report.tables += 1;
            report.rows += table.rows.len();
        }

        tx.commit()?;
        info!(tables = report.tables, rows = report.rows, "loaded rows into sqlite");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeadsError;
    use crate::generate::{GeneratorTree, RowExtractor};
    use serde_json::{json, Value};

    fn setup() -> (SchemaRegistry, Connection) {
        let registry = SchemaRegistry::new().unwrap();
        let mut conn = Connection::open_in_memory().unwrap();
        SqliteLoader::new(&mut conn).unwrap().create_schema(&registry).unwrap();
        (registry, conn)
    }

    fn extract(registry: &SchemaRegistry, doc: &Value) -> RowSet {
        let tree = GeneratorTree::leads(registry).unwrap();
        RowExtractor::new(&tree).extract(doc).unwrap()
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_load_with_foreign_keys() {
        let (registry, mut conn) = setup();
        let doc = json!({
            "years": {"2020": {"slug": "2020", "name": "2020"}},
            "makes": {"honda": {"slug": "honda", "name": "Honda", "years": [2020]}},
            "buyers": {"b1": {"slug": "b1", "name": "Buyer One", "years": [2020],
                "makes": {"honda": {"years": [2020]}}}}
        });
        let rows = extract(&registry, &doc);

        let report = SqliteLoader::new(&mut conn).unwrap().load(&rows, false).unwrap();
        assert_eq!(report, LoadReport { tables: 7, rows: 7 });

        let year: String = conn
            .query_row("SELECT year_slug FROM buyer_make_year", [], |row| row.get(0))
            .unwrap();
        assert_eq!(year, "2020");
    }

    #[test]
    fn test_failed_load_rolls_back() {
        let (registry, mut conn) = setup();
        // make_year references a year that was never declared
        let doc = json!({"makes": {"honda": {"slug": "honda", "name": "Honda", "years": [2020]}}});
        let rows = extract(&registry, &doc);

        let err = SqliteLoader::new(&mut conn).unwrap().load(&rows, false).unwrap_err();
        assert!(matches!(err, LeadsError::Database(_)));
        assert_eq!(count(&conn, "make"), 0);
    }

    #[test]
    fn test_replace_clears_previous_import() {
        let (registry, mut conn) = setup();
        let first = extract(&registry, &json!({"makes": {"honda": {"slug": "honda", "name": "Honda"}}}));
        let second = extract(&registry, &json!({"makes": {"ford": {"slug": "ford", "name": "Ford"}}}));

        let mut loader = SqliteLoader::new(&mut conn).unwrap();
        loader.load(&first, false).unwrap();
        loader.load(&second, true).unwrap();

        let slug: String = conn.query_row("SELECT slug FROM make", [], |row| row.get(0)).unwrap();
        assert_eq!(slug, "ford");
        assert_eq!(count(&conn, "make"), 1);
    }
}
