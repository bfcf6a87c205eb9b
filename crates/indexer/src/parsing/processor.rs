use crate::analysis::types::FileDeclarations;
use crate::extraction::DeclarationExtractor;
use crate::parsing::syntax::SyntaxParser;
use std::time::{Duration, Instant};

/// Represents a file that was skipped during processing
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub file_path: String,
    pub reason: String,
    pub file_size: Option<u64>,
}

/// Represents a file that encountered an error during processing
#[derive(Debug, Clone)]
pub struct ErroredFile {
    pub file_path: String,
    pub error_message: String,
    pub error_stage: ProcessingStage,
}

/// Represents the stage where processing failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    FileSystem, // Failed to read file metadata or content
    Parsing,    // Failed to build a syntax tree
}

/// Result of processing a file that can be success, skipped, or error
#[derive(Debug)]
pub enum ProcessingResult {
    Success(FileProcessingResult),
    Skipped(SkippedFile),
    Error(ErroredFile),
}

#[derive(Debug, Clone)]
pub struct FileProcessor<'a> {
    /// Project-relative path, used as the artifact key
    pub path: String,
    pub content: &'a str,
}

impl<'a> FileProcessor<'a> {
    pub fn new(path: String, content: &'a str) -> Self {
        Self { path, content }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Parse the file and extract its declarations.
    pub fn process(
        &self,
        parser: &mut dyn SyntaxParser,
        extractor: &DeclarationExtractor<'_>,
    ) -> ProcessingResult {
        let start_time = Instant::now();

        let tree = match parser.parse(self.content) {
            Ok(tree) => tree,
            Err(e) => {
                return ProcessingResult::Error(ErroredFile {
                    file_path: self.path.clone(),
                    error_message: e.to_string(),
                    error_stage: ProcessingStage::Parsing,
                });
            }
        };
        let parse_time = start_time.elapsed();

        let extraction_start = Instant::now();
        let declarations = extractor.extract(&tree);
        let extraction_time = extraction_start.elapsed();

        let types_count = declarations.classes.len() + declarations.interfaces.len();
        let methods_count = declarations
            .classes
            .iter()
            .map(|class| class.methods.len())
            .chain(declarations.interfaces.iter().map(|i| i.methods.len()))
            .sum();

        ProcessingResult::Success(FileProcessingResult {
            file_path: self.path.clone(),
            file_size: self.size(),
            declarations,
            stats: ProcessingStats {
                total_time: start_time.elapsed(),
                parse_time,
                extraction_time,
                types_count,
                methods_count,
            },
        })
    }
}

/// Result of processing a single file
#[derive(Clone, Debug)]
pub struct FileProcessingResult {
    pub file_path: String,
    /// File size in bytes
    pub file_size: u64,
    pub declarations: FileDeclarations,
    pub stats: ProcessingStats,
}

#[derive(Debug, Clone)]
pub struct ProcessingStats {
    pub total_time: Duration,
    pub parse_time: Duration,
    /// Time spent walking the tree, including method summaries
    pub extraction_time: Duration,
    pub types_count: usize,
    pub methods_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::summary::DisabledSummarizer;
    use crate::parsing::java::JavaSyntaxParser;

    #[test]
    fn test_process_success() {
        let mut parser = JavaSyntaxParser::new().unwrap();
        let extractor = DeclarationExtractor::new(&DisabledSummarizer);
        let processor = FileProcessor::new(
            "src/p/A.java".to_string(),
            "package p; class A { void a() {} void b() {} } interface I {}",
        );

        let ProcessingResult::Success(success) = processor.process(&mut parser, &extractor) else {
            panic!("expected a successful extraction");
        };
        assert_eq!(success.file_path, "src/p/A.java");
        assert_eq!(success.stats.types_count, 2);
        assert_eq!(success.stats.methods_count, 2);
    }

    #[test]
    fn test_process_syntax_error() {
        let mut parser = JavaSyntaxParser::new().unwrap();
        let extractor = DeclarationExtractor::new(&DisabledSummarizer);
        let processor = FileProcessor::new("Bad.java".to_string(), "class Bad { void f( { }");

        match processor.process(&mut parser, &extractor) {
            ProcessingResult::Error(errored) => {
                assert_eq!(errored.error_stage, ProcessingStage::Parsing);
                assert!(errored.error_message.starts_with("syntax error at line 1"));
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }
}
