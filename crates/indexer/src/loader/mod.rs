pub mod plan;

use crate::analysis::types::ProjectStructure;
use database::graph::GraphStore;
use database::kuzu::types::DatabaseError;
use plan::plan_batches;
pub use plan::LoadOptions;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub batches: usize,
    pub operations: usize,
    pub files: usize,
    pub skipped_error_files: usize,
    pub load_time: Duration,
}

/// Replaces the contents of a graph store with one project.
///
/// The store is wiped first, then written batch by batch in dependency
/// order. The first failing batch aborts the load and its error is
/// returned unchanged; batches already committed stay in the store.
pub struct GraphLoader {
    options: LoadOptions,
}

impl GraphLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn load(
        &self,
        store: &mut dyn GraphStore,
        project: &ProjectStructure,
    ) -> Result<LoadReport, DatabaseError> {
        let start = Instant::now();
        let batches = plan_batches(project, &self.options);
        let mut report = LoadReport {
            batches: batches.len(),
            files: project.parsed_files().count(),
            skipped_error_files: project.errored_files().count(),
            ..Default::default()
        };

        info!(
            "Loading {} files of {} into the graph in {} batches",
            report.files,
            project.project_name(),
            report.batches
        );

        for batch in &batches {
            debug!("Writing batch {} ({} operations)", batch.name, batch.len());
            store.execute_batch(batch)?;
            report.operations += batch.len();
        }

        report.load_time = start.elapsed();
        info!(
            "Loaded {} operations in {:?} ({} errored files skipped)",
            report.operations, report.load_time, report.skipped_error_files
        );
        Ok(report)
    }
}
