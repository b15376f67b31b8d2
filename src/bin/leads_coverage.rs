//! leads-coverage: Look up a buyer tier's dealer coverage for a make
//!
//! Usage:
//!   leads-coverage --database leads.db b1-blind honda --zipcode 10010
//!   leads-coverage --database leads.db b1-blind honda --zipcode 10010 --limit 5
//!
//! Prints the JSON response envelope. Invalid parameters print the error
//! envelope and exit with status 2.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use leads::{CoverageQuery, CoverageResolver, CoverageResult, LoggingConfig, ResponseEnvelope};
use rusqlite::{Connection, OpenFlags};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "leads-coverage")]
#[command(about = "Returns the buyer's coverage of a make in a zipcode", long_about = None)]
struct Args {
    /// SQLite database produced by leads-import
    #[arg(long, env = "LEADS_DATABASE")]
    database: PathBuf,

    /// Buyer tier slug
    #[arg(value_name = "TIER")]
    tier: String,

    /// Make slug
    #[arg(value_name = "MAKE")]
    make: String,

    #[arg(long)]
    zipcode: Option<String>,

    /// Maximum number of dealers (default: 3)
    #[arg(long)]
    limit: Option<String>,

    #[arg(long, env = "LEADS_LOG_LEVEL", default_value = "warn")]
    log_level: String,

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

    let mut params = BTreeMap::new();
    params.insert("buyer_tier".to_string(), args.tier.clone());
    params.insert("make".to_string(), args.make.clone());
    if let Some(zipcode) = &args.zipcode {
        params.insert("zipcode".to_string(), zipcode.clone());
    }
    if let Some(limit) = &args.limit {
        params.insert("limit".to_string(), limit.clone());
    }

    let query = match CoverageQuery::from_params(&args.tier, &args.make, &params) {
        Ok(query) => query,
        Err(errors) => {
            let envelope = ResponseEnvelope::<CoverageResult>::error(errors, params);
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            std::process::exit(2);
        }
    };

    let conn = Connection::open_with_flags(&args.database, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open database {}", args.database.display()))?;
    let result = CoverageResolver::new(&conn)
        .resolve(&query)
        .context("Failed to resolve coverage")?;

    let envelope = ResponseEnvelope::ok(result, params);
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
