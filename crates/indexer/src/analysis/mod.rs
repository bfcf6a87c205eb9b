pub mod index;
pub mod references;
pub mod resolver;
pub mod types;

use crate::analysis::index::ProjectIndex;
use crate::analysis::resolver::{RelationshipResolver, ResolutionMode, ResolutionStats};
use crate::analysis::types::ProjectStructure;
use std::time::{Duration, Instant};
use tracing::info;

/// Second pass over an extracted project: builds the type index and
/// resolves dependencies against it. Runs only after every file has been
/// extracted.
pub struct AnalysisService {
    mode: ResolutionMode,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub indexed_names: usize,
    pub ambiguous_names: Vec<String>,
    pub resolution: ResolutionStats,
    pub analysis_time: Duration,
}

impl AnalysisService {
    pub fn new(mode: ResolutionMode) -> Self {
        Self { mode }
    }

    pub fn analyze(&self, project: &mut ProjectStructure) -> AnalysisReport {
        let start = Instant::now();

        let index = ProjectIndex::build(project);
        let resolution = RelationshipResolver::new(&index, self.mode).resolve_project(project);

        let report = AnalysisReport {
            indexed_names: index.len(),
            ambiguous_names: index.ambiguous_names().map(str::to_string).collect(),
            resolution,
            analysis_time: start.elapsed(),
        };

        info!(
            "Resolved {}/{} dependencies and {} object references against {} indexed names in {:?}",
            report.resolution.resolved_dependencies,
            report.resolution.dependencies,
            report.resolution.object_references,
            report.indexed_names,
            report.analysis_time
        );

        report
    }
}
