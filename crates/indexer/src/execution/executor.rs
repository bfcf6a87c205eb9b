use crate::analysis::AnalysisService;
use crate::analysis::references::{LexicalReferenceScanner, ReferenceScanner};
use crate::analysis::types::{FileEntry, FileError, ProjectStructure};
use crate::execution::config::IndexingConfig;
use crate::extraction::DeclarationExtractor;
use crate::extraction::summary::{DisabledSummarizer, MethodSummarizer};
use crate::parsing::java::JavaSyntaxParser;
use crate::parsing::processor::{
    ErroredFile, FileProcessor, ProcessingResult, ProcessingStage, SkippedFile,
};
use crate::project::file_info::FileInfo;
use crate::project::io::{ProcessingError, read_text_file};
use crate::project::source::{FileSource, PathFileSource};
use crate::stats::{FileCounters, IndexingStatistics, finalize_statistics};

use anyhow::{Context, Result, anyhow, bail};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A fully extracted and resolved project.
#[derive(Debug)]
pub struct ExtractionOutcome {
    pub project: ProjectStructure,
    pub statistics: IndexingStatistics,
}

pub struct IndexingExecutor {
    config: IndexingConfig,
    summarizer: Arc<dyn MethodSummarizer>,
}

impl IndexingExecutor {
    pub fn new(config: IndexingConfig) -> Self {
        Self {
            config,
            summarizer: Arc::new(DisabledSummarizer),
        }
    }

    /// Used only when `summarize_methods` is set in the config.
    pub fn with_summarizer(mut self, summarizer: Arc<dyn MethodSummarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn config(&self) -> &IndexingConfig {
        &self.config
    }

    pub fn extract_project(&self, project_root: &Path) -> Result<ExtractionOutcome> {
        if !project_root.is_dir() {
            bail!("Project path not found: {}", project_root.display());
        }
        let root = dunce::canonicalize(project_root)
            .with_context(|| format!("Failed to resolve {}", project_root.display()))?;

        self.extract_files(&root, &PathFileSource::from_path(&root))
    }

    /// Extracts every file of `source`, then resolves the project. Files are
    /// keyed by their path relative to `root`.
    pub fn extract_files<S: FileSource>(
        &self,
        root: &Path,
        source: &S,
    ) -> Result<ExtractionOutcome> {
        let start_time = Instant::now();
        let files = source
            .get_files(&self.config)
            .map_err(|e| anyhow!("Failed to list source files: {e}"))?;

        info!(
            "Extracting {} Java files from {} with {} threads",
            files.len(),
            root.display(),
            self.config.worker_threads
        );

        let scanner = if self.config.extract_references {
            Some(LexicalReferenceScanner::new()?)
        } else {
            None
        };
        let disabled = DisabledSummarizer;
        let summarizer: &dyn MethodSummarizer = if self.config.summarize_methods {
            self.summarizer.as_ref()
        } else {
            &disabled
        };
        let mut extractor = DeclarationExtractor::new(summarizer);
        if let Some(scanner) = &scanner {
            extractor = extractor.with_reference_scanner(scanner as &dyn ReferenceScanner);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_threads)
            .build()
            .context("Failed to build worker pool")?;

        let results = pool.install(|| {
            files
                .par_iter()
                .map_init(JavaSyntaxParser::new, |parser, file_info| {
                    let relative_path = file_info.relative_path(root);
                    match parser {
                        Ok(parser) => self.process_file(parser, &extractor, file_info, relative_path),
                        Err(e) => ProcessingResult::Error(ErroredFile {
                            file_path: relative_path,
                            error_message: e.to_string(),
                            error_stage: ProcessingStage::Parsing,
                        }),
                    }
                })
                .collect::<Vec<_>>()
        });

        let mut project = ProjectStructure::new(root.to_string_lossy());
        let mut counters = FileCounters {
            discovered: files.len(),
            ..Default::default()
        };

        for result in results {
            let (path, entry) = match result {
                ProcessingResult::Success(success) => {
                    counters.parsed += 1;
                    counters.total_bytes += success.file_size;
                    debug!(
                        "Extracted {} ({} types, {} methods) in {:?}",
                        success.file_path,
                        success.stats.types_count,
                        success.stats.methods_count,
                        success.stats.total_time
                    );
                    (success.file_path, FileEntry::Parsed(success.declarations))
                }
                ProcessingResult::Skipped(skipped) => {
                    counters.skipped += 1;
                    warn!("Skipping {}: {}", skipped.file_path, skipped.reason);
                    (skipped.file_path, FileEntry::Error(FileError { error: skipped.reason }))
                }
                ProcessingResult::Error(errored) => {
                    counters.errored += 1;
                    warn!(
                        "Failed to extract {} ({:?}): {}",
                        errored.file_path, errored.error_stage, errored.error_message
                    );
                    (
                        errored.file_path,
                        FileEntry::Error(FileError {
                            error: errored.error_message,
                        }),
                    )
                }
            };
            project.files.insert(path, entry);
        }

        // Resolution needs the complete index, so it only starts once every
        // worker has finished.
        let analysis = AnalysisService::new(self.config.resolution_mode).analyze(&mut project);

        let statistics = finalize_statistics(&project, counters, &analysis, start_time.elapsed());
        info!(
            "Extraction finished in {:?}: {} parsed, {} errored, {} skipped",
            start_time.elapsed(),
            statistics.files.parsed,
            statistics.files.errored,
            statistics.files.skipped
        );

        Ok(ExtractionOutcome {
            project,
            statistics,
        })
    }

    fn process_file(
        &self,
        parser: &mut JavaSyntaxParser,
        extractor: &DeclarationExtractor<'_>,
        file_info: &FileInfo,
        relative_path: String,
    ) -> ProcessingResult {
        match read_text_file(&file_info.path, self.config.max_file_size) {
            Ok(content) => FileProcessor::new(relative_path, &content).process(parser, extractor),
            Err(ProcessingError::Skipped(_, reason)) => ProcessingResult::Skipped(SkippedFile {
                file_path: relative_path,
                reason,
                file_size: std::fs::metadata(&file_info.path).ok().map(|m| m.len()),
            }),
            Err(ProcessingError::Error(_, error_message)) => {
                ProcessingResult::Error(ErroredFile {
                    file_path: relative_path,
                    error_message,
                    error_stage: ProcessingStage::FileSystem,
                })
            }
        }
    }
}
