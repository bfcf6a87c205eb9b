use crate::analysis::AnalysisReport;
use crate::analysis::types::ProjectStructure;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCounters {
    pub discovered: usize,
    pub parsed: usize,
    /// Too large to read; recorded as errors in the artifact
    pub skipped: usize,
    pub errored: usize,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsMetadata {
    pub jkg_version: String,
    pub timestamp: DateTime<Utc>,
    pub project_path: String,
    pub indexing_duration_seconds: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationCounts {
    pub packages: usize,
    pub classes: usize,
    pub interfaces: usize,
    pub methods: usize,
    pub fields: usize,
    pub parameters: usize,
    pub imports: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingStatistics {
    pub metadata: StatisticsMetadata,
    pub files: FileCounters,
    pub declarations: DeclarationCounts,
    pub dependencies: usize,
    pub resolved_dependencies: usize,
    pub object_references: usize,
    pub ambiguous_type_names: Vec<String>,
    pub errored_files: Vec<String>,
}

pub fn count_declarations(project: &ProjectStructure) -> DeclarationCounts {
    let mut counts = DeclarationCounts::default();
    let mut packages = std::collections::BTreeSet::new();

    for (_, declarations) in project.parsed_files() {
        if let Some(package) = declarations.package() {
            packages.insert(package);
        }
        counts.imports += declarations.imports.len();
        counts.classes += declarations.classes.len();
        counts.interfaces += declarations.interfaces.len();

        let methods = declarations
            .classes
            .iter()
            .flat_map(|class| class.methods.iter())
            .chain(declarations.interfaces.iter().flat_map(|i| i.methods.iter()));
        for method in methods {
            counts.methods += 1;
            counts.parameters += method.parameters.len();
        }
        counts.fields += declarations
            .classes
            .iter()
            .map(|class| class.fields.len())
            .sum::<usize>();
    }

    counts.packages = packages.len();
    counts
}

pub fn finalize_statistics(
    project: &ProjectStructure,
    files: FileCounters,
    analysis: &AnalysisReport,
    duration: Duration,
) -> IndexingStatistics {
    IndexingStatistics {
        metadata: StatisticsMetadata {
            jkg_version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            project_path: project.project_path.clone(),
            indexing_duration_seconds: duration.as_secs_f64(),
        },
        files,
        declarations: count_declarations(project),
        dependencies: analysis.resolution.dependencies,
        resolved_dependencies: analysis.resolution.resolved_dependencies,
        object_references: analysis.resolution.object_references,
        ambiguous_type_names: analysis.ambiguous_names.clone(),
        errored_files: project
            .errored_files()
            .map(|(path, _)| path.clone())
            .collect(),
    }
}

impl IndexingStatistics {
    pub fn export_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
