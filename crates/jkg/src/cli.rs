use clap::{Parser, Subcommand};
use database::kuzu::config::{DEFAULT_BUFFER_POOL_SIZE, DEFAULT_DATABASE_PATH};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "jkg",
    version,
    about = "Java Knowledge Graph CLI",
    long_about = "Extracts the structure of a Java project and loads it into an embedded graph database."
)]
pub struct JkgCli {
    #[command(subcommand)]
    pub command: Commands,
}

impl JkgCli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a Java project and load it into the graph
    Index {
        /// Root directory of the Java project
        project_path: PathBuf,

        /// Write the extraction artifact (JSON) to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Graph database location
        #[arg(long, value_name = "PATH", default_value = DEFAULT_DATABASE_PATH)]
        database: PathBuf,

        /// Kuzu buffer pool size in bytes
        #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_BUFFER_POOL_SIZE)]
        buffer_pool_size: usize,

        /// Number of worker threads (0 means auto-detect based on CPU cores)
        #[arg(short, long, default_value_t = 0)]
        threads: usize,

        /// Describe every method with a language model (needs OPENAI_API_KEY)
        #[arg(long)]
        summarize: bool,

        /// Scan method bodies for references to project types
        #[arg(long)]
        references: bool,

        /// Record every import and resolve only exact type names
        #[arg(long)]
        strict_imports: bool,

        /// Only extract; do not touch the graph database
        #[arg(long)]
        skip_load: bool,

        /// Output statistics. Optionally specify a file path to save to.
        #[arg(long, value_name = "FILE", num_args = 0..=1, require_equals = true)]
        stats: Option<Option<PathBuf>>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,

        /// Also write JSON logs to DIR/jkg.log
        #[arg(long, value_name = "DIR")]
        log_dir: Option<PathBuf>,
    },
    /// Load a previously written extraction artifact into the graph
    Load {
        /// Artifact produced by `jkg index --output`
        artifact: PathBuf,

        /// Graph database location
        #[arg(long, value_name = "PATH", default_value = DEFAULT_DATABASE_PATH)]
        database: PathBuf,

        /// Kuzu buffer pool size in bytes
        #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_BUFFER_POOL_SIZE)]
        buffer_pool_size: usize,

        /// Write REFERENCES edges recorded in the artifact
        #[arg(long)]
        references: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// Query the graph with a query string or a query file
    Query {
        /// Graph database location
        #[arg(long, value_name = "PATH", default_value = DEFAULT_DATABASE_PATH)]
        database: PathBuf,

        /// Query string or file path containing the query
        #[arg(value_name = "QUERY_OR_FILE")]
        query_or_file: String,
    },
    /// Show the nodes within two hops of every method with the given name
    Related {
        /// Graph database location
        #[arg(long, value_name = "PATH", default_value = DEFAULT_DATABASE_PATH)]
        database: PathBuf,

        /// Simple method name, e.g. `add`
        method: String,
    },
}
