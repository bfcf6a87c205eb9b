use crate::analysis::resolver::ResolutionMode;

pub const DEFAULT_MAX_FILE_SIZE: usize = 5_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingConfig {
    pub worker_threads: usize,
    /// Files above this many bytes are recorded as errors without parsing.
    pub max_file_size: usize,
    pub resolution_mode: ResolutionMode,
    /// Scan method bodies for references to project types.
    pub extract_references: bool,
    /// Ask the configured summarizer for a description of every method.
    pub summarize_methods: bool,
}

pub struct IndexingConfigBuilder;

impl IndexingConfigBuilder {
    pub fn build(threads: usize) -> IndexingConfig {
        let effective_threads = IndexingConfigBuilder::get_effective_threads(threads);
        IndexingConfig {
            worker_threads: effective_threads,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            resolution_mode: ResolutionMode::default(),
            extract_references: false,
            summarize_methods: false,
        }
    }

    pub fn get_effective_threads(threads: usize) -> usize {
        if threads == 0 {
            num_cpus::get()
        } else {
            threads
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_zero_threads() {
        let config = IndexingConfigBuilder::build(0);

        assert!(config.worker_threads > 0);
        assert_eq!(config.max_file_size, 5_000_000);
        assert_eq!(config.resolution_mode, ResolutionMode::Heuristic);
        assert!(!config.extract_references);
        assert!(!config.summarize_methods);
    }

    #[test]
    fn test_build_with_explicit_threads() {
        assert_eq!(IndexingConfigBuilder::build(3).worker_threads, 3);
    }
}
