mod cli;
mod commands;

use crate::cli::{Commands, JkgCli};
use crate::commands::{index, load, query, related};
use logging::LogMode;
use std::process;

fn run(cli: JkgCli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Index {
            project_path,
            output,
            database,
            threads,
            summarize,
            references,
            strict_imports,
            skip_load,
            buffer_pool_size,
            stats,
            verbose,
            log_dir,
        } => {
            let mode = log_dir.map(LogMode::File).unwrap_or(LogMode::Cli);
            let _guards = logging::init(mode, verbose)?;

            index::run(index::IndexArgs {
                project_path,
                output,
                database,
                threads,
                summarize,
                references,
                strict_imports,
                skip_load,
                buffer_pool_size,
                stats,
            })
        }
        Commands::Load {
            artifact,
            database,
            references,
            buffer_pool_size,
            verbose,
        } => {
            let _guards = logging::init(LogMode::Cli, verbose)?;
            load::run(load::LoadArgs {
                artifact,
                database,
                references,
                buffer_pool_size,
            })
        }
        Commands::Query {
            database,
            query_or_file,
        } => {
            let _guards = logging::init(LogMode::Cli, false)?;
            query::run(query::QueryArgs {
                database,
                query_or_file,
            })
        }
        Commands::Related { database, method } => {
            let _guards = logging::init(LogMode::Cli, false)?;
            related::run(related::RelatedArgs { database, method })
        }
    }
}

fn main() {
    let cli = JkgCli::parse_args();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
