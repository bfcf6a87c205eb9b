use anyhow::{Context, Result, anyhow};
use database::kuzu::config::DatabaseConfig;
use database::kuzu::database::KuzuDatabase;
use database::kuzu::store::KuzuGraphStore;
use database::schema::manager::SchemaManager;
use indexer::analysis::types::ProjectStructure;
use indexer::loader::{GraphLoader, LoadOptions, LoadReport};
use indexer::writer::ProjectWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct LoadArgs {
    pub artifact: PathBuf,
    pub database: PathBuf,
    pub references: bool,
    pub buffer_pool_size: usize,
}

/// Opens (or creates) the database and replaces its contents with `project`.
pub fn load_into_database(
    database_path: &Path,
    buffer_pool_size: usize,
    project: &ProjectStructure,
    options: LoadOptions,
) -> Result<LoadReport> {
    if let Some(parent) = database_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let path = database_path
        .to_str()
        .ok_or_else(|| anyhow!("Database path is not valid UTF-8: {}", database_path.display()))?;

    let registry = KuzuDatabase::new();
    let config = DatabaseConfig::new(path).with_buffer_size(buffer_pool_size);
    let database = registry.get_or_create_database(path, Some(config))?;
    let mut store = KuzuGraphStore::open(&database)?;

    let report = GraphLoader::new(options).load(&mut store, project)?;
    drop(store);

    match SchemaManager::new(&database).get_schema_stats() {
        Ok(stats) => info!("Graph stored at {}. {stats}", database_path.display()),
        Err(e) => warn!("Failed to read graph statistics: {e}"),
    }
    Ok(report)
}

pub fn run(args: LoadArgs) -> Result<()> {
    let project = ProjectWriter::read(&args.artifact)?;
    let report = load_into_database(
        &args.database,
        args.buffer_pool_size,
        &project,
        LoadOptions {
            include_references: args.references,
        },
    )?;
    println!(
        "Loaded {} files into {} ({} write operations)",
        report.files,
        args.database.display(),
        report.operations
    );
    Ok(())
}
