use anyhow::{Result, bail};
use database::kuzu::database::KuzuDatabase;
use database::querying::{DatabaseQueryingService, QueryingService};
use serde_json::Map;
use std::path::PathBuf;
use std::sync::Arc;

pub struct QueryArgs {
    pub database: PathBuf,
    pub query_or_file: String,
}

/// Prints the rows as a JSON array of objects keyed by column name.
pub fn run(args: QueryArgs) -> Result<()> {
    let query = if std::path::Path::new(&args.query_or_file).is_file() {
        std::fs::read_to_string(&args.query_or_file)
            .map_err(|e| anyhow::anyhow!("Failed to read query file: {}", e))?
    } else {
        args.query_or_file
    };

    if query.trim().is_empty() {
        bail!("Empty query provided");
    }

    let service = DatabaseQueryingService::new(Arc::new(KuzuDatabase::new()));
    let rows = service.execute_query(&args.database, &query, Map::new())?;
    println!("{}", serde_json::to_string_pretty(&rows.to_json())?);
    Ok(())
}
