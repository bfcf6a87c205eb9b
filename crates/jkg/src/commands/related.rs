use anyhow::{Result, bail};
use database::kuzu::database::KuzuDatabase;
use database::querying::DatabaseQueryingService;
use std::path::PathBuf;
use std::sync::Arc;

pub struct RelatedArgs {
    pub database: PathBuf,
    pub method: String,
}

pub fn run(args: RelatedArgs) -> Result<()> {
    if args.method.trim().is_empty() {
        bail!("Empty method name provided");
    }

    let service = DatabaseQueryingService::new(Arc::new(KuzuDatabase::new()));
    let rows = service.related_methods(&args.database, args.method.trim())?;
    println!("{}", serde_json::to_string_pretty(&rows.to_json())?);
    Ok(())
}
