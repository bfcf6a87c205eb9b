use anyhow::Result;
use indexer::analysis::resolver::ResolutionMode;
use indexer::execution::config::IndexingConfigBuilder;
use indexer::execution::executor::IndexingExecutor;
use indexer::extraction::summary::{OpenAiSummarizer, SummarizerConfig};
use indexer::loader::LoadOptions;
use indexer::stats::IndexingStatistics;
use indexer::writer::ProjectWriter;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::commands::load::load_into_database;

pub struct IndexArgs {
    pub project_path: PathBuf,
    pub output: Option<PathBuf>,
    pub database: PathBuf,
    pub threads: usize,
    pub summarize: bool,
    pub references: bool,
    pub strict_imports: bool,
    pub skip_load: bool,
    pub buffer_pool_size: usize,
    pub stats: Option<Option<PathBuf>>,
}

fn handle_statistics_output(stats: &IndexingStatistics, stats_output: Option<Option<PathBuf>>) {
    let Some(stats_path_option) = stats_output else {
        return;
    };

    if let Some(stats_path) = stats_path_option {
        match stats.export_to_file(&stats_path) {
            Ok(_) => info!("Statistics saved to: {}", stats_path.display()),
            Err(e) => error!("Failed to save statistics: {e}"),
        }
    }

    info!("Indexing Summary:");
    info!(
        "  - Files: {} discovered, {} parsed, {} errored, {} too large",
        stats.files.discovered, stats.files.parsed, stats.files.errored, stats.files.skipped
    );
    info!(
        "  - Types: {} classes, {} interfaces in {} packages",
        stats.declarations.classes, stats.declarations.interfaces, stats.declarations.packages
    );
    info!(
        "  - Members: {} methods, {} fields, {} parameters",
        stats.declarations.methods, stats.declarations.fields, stats.declarations.parameters
    );
    info!(
        "  - Dependencies: {} recorded, {} resolved to project files, {} object references",
        stats.dependencies, stats.resolved_dependencies, stats.object_references
    );
    if !stats.ambiguous_type_names.is_empty() {
        info!(
            "  - Ambiguous type names: {}",
            stats.ambiguous_type_names.join(", ")
        );
    }
    info!(
        "  - Duration: {:.2}s",
        stats.metadata.indexing_duration_seconds
    );
}

pub fn run(args: IndexArgs) -> Result<()> {
    let mut config = IndexingConfigBuilder::build(args.threads);
    config.extract_references = args.references;
    if args.strict_imports {
        config.resolution_mode = ResolutionMode::Exact;
    }

    let mut executor_summarizer = None;
    if args.summarize {
        match SummarizerConfig::from_env() {
            Some(summarizer_config) => {
                info!("Summarizing methods with {}", summarizer_config.model);
                executor_summarizer = Some(Arc::new(OpenAiSummarizer::new(summarizer_config)?));
                config.summarize_methods = true;
            }
            None => warn!("OPENAI_API_KEY is not set; method descriptions will be empty"),
        }
    }

    let mut executor = IndexingExecutor::new(config);
    if let Some(summarizer) = executor_summarizer {
        executor = executor.with_summarizer(summarizer);
    }

    let outcome = executor.extract_project(&args.project_path)?;

    if let Some(output) = &args.output {
        ProjectWriter::write(&outcome.project, output)?;
        println!("Project structure written to {}", output.display());
    }

    handle_statistics_output(&outcome.statistics, args.stats);

    if args.skip_load {
        return Ok(());
    }

    let report = load_into_database(
        &args.database,
        args.buffer_pool_size,
        &outcome.project,
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
