use super::cell::Cell;
use crate::config::StatementFormat;
use crate::error::Result;
use crate::generate::{EntityRows, RowSet};
use std::io::Write;
use tracing::info;

/// Render the load statement for one entity. Empty when it has no rows.
pub fn render_entity(table: &EntityRows, format: StatementFormat) -> Result<String> {
    if table.is_empty() {
        return Ok(String::new());
    }

    let columns = table
        .columns
        .iter()
        .map(|f| f.name)
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let cells = table
            .columns
            .iter()
            .zip(row)
            .map(|(field, value)| Cell::coerce(table.entity, field, value.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        lines.push(match format {
            StatementFormat::Copy => cells.iter().map(Cell::to_csv).collect::<Vec<_>>().join(","),
            StatementFormat::Insert => format!(
                "    ({})",
                cells.iter().map(Cell::to_sql_literal).collect::<Vec<_>>().join(", ")
            ),
        });
    }

    let header = format!("-- Data from table `{}`\n", table.entity);
    Ok(match format {
        StatementFormat::Copy => format!(
            "{header}COPY {} ({columns}) FROM STDIN WITH (FORMAT csv);\n{}\n\\.\n\n",
            table.entity,
            lines.join("\n")
        ),
        StatementFormat::Insert => format!(
            "{header}INSERT INTO {} ({columns}) VALUES\n{};\n\n",
            table.entity,
            lines.join(",\n")
        ),
    })
}

/// Render every entity's statement, parents first.
pub fn render_statements(rows: &RowSet, format: StatementFormat) -> Result<String> {
    let mut sql = String::new();
    for table in rows.tables() {
        sql.push_str(&render_entity(table, format)?);
    }
    Ok(sql)
}

/// Writes load statements for a whole row set to a stream
pub struct StatementWriter<W: Write> {
    writer: W,
    format: StatementFormat,
}

impl<W: Write> StatementWriter<W> {
    pub fn new(writer: W, format: StatementFormat) -> Self {
        StatementWriter { writer, format }
    }

    /// Render everything first, so a value error writes nothing at all.
    pub fn write_rows(&mut self, rows: &RowSet, preamble: Option<&str>) -> Result<()> {
        let sql = render_statements(rows, self.format)?;

        if let Some(preamble) = preamble {
            self.writer.write_all(preamble.as_bytes())?;
        }
        self.writer.write_all(sql.as_bytes())?;
        self.writer.flush()?;

        info!(
            format = ?self.format,
            tables = rows.tables().filter(|t| !t.is_empty()).count(),
            rows = rows.total_rows(),
            "wrote load statements"
        );
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
