//! leads-import: Load the leads configuration document into relational tables
//!
//! Usage:
//!   # Write COPY statements to stdout
//!   leads-import leads.yaml
//!
//!   # INSERT statements with table definitions, to a file
//!   leads-import leads.yaml --format insert --with-schema -o leads.sql
//!
//!   # Load straight into a SQLite database
//!   leads-import leads.yaml --database leads.db --with-schema

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use leads::{DocumentFormat, ImportConfig, LoggingConfig, StatementFormat};
use rusqlite::Connection;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Copy,
    Insert,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormatArg {
    Yaml,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "leads-import")]
#[command(about = "Import the leads configuration document", long_about = None)]
struct Args {
    /// Source document (YAML or JSON)
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Output file for statements (stdout if omitted)
    #[arg(long, short = 'o', conflicts_with = "database")]
    output: Option<PathBuf>,

    /// Statement syntax
    #[arg(long, value_enum, default_value = "copy")]
    format: FormatArg,

    /// Load rows into this SQLite database instead of writing statements
    #[arg(long, env = "LEADS_DATABASE")]
    database: Option<PathBuf>,

    /// Emit CREATE TABLE statements first (or create the tables in SQLite)
    #[arg(long)]
    with_schema: bool,

    /// Leave missing required values to the database constraints
    #[arg(long)]
    no_validate: bool,

    /// Document syntax (guessed from the extension if omitted)
    #[arg(long, value_enum)]
    input_format: Option<InputFormatArg>,

    #[arg(long, env = "LEADS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format: pretty or json
    #[arg(long, env = "LEADS_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    LoggingConfig {
        level: args.log_level.clone(),
        format: args.log_format.clone(),
    }
    .init();

    let config = ImportConfig {
        format: match args.format {
            FormatArg::Copy => StatementFormat::Copy,
            FormatArg::Insert => StatementFormat::Insert,
        },
        validate_required: !args.no_validate,
        with_schema: args.with_schema,
        document_format: args.input_format.map(|f| match f {
            InputFormatArg::Yaml => DocumentFormat::Yaml,
            InputFormatArg::Json => DocumentFormat::Json,
        }),
    };

    if let Some(database) = &args.database {
        let mut conn = Connection::open(database)
            .with_context(|| format!("Failed to open database {}", database.display()))?;
        let report = leads::import_to_sqlite(&args.source, &mut conn, &config)
            .with_context(|| format!("Failed to import {}", args.source.display()))?;
        eprintln!("Loaded {} rows into {} tables", report.rows, report.tables);
        return Ok(());
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            leads::import_to_writer(&args.source, BufWriter::new(file), &config)
        }
        None => leads::import_to_writer(&args.source, std::io::stdout().lock(), &config),
    }
    .with_context(|| format!("Failed to import {}", args.source.display()))?;

    Ok(())
}
