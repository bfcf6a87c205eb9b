use crate::analysis::types::ProjectStructure;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

/// Results of writing an extraction artifact
#[derive(Debug, Clone)]
pub struct WriterResult {
    pub total_files: usize,
    pub file_size_bytes: u64,
    pub writing_duration: Duration,
}

/// Reads and writes the JSON extraction artifact.
pub struct ProjectWriter;

impl ProjectWriter {
    pub fn write<P: AsRef<Path>>(project: &ProjectStructure, path: P) -> Result<WriterResult> {
        let start = Instant::now();
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create artifact: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, project)
            .with_context(|| format!("Failed to serialize artifact: {}", path.display()))?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        let result = WriterResult {
            total_files: project.files.len(),
            file_size_bytes: std::fs::metadata(path)?.len(),
            writing_duration: start.elapsed(),
        };
        info!(
            "Wrote {} file entries to {} ({} bytes)",
            result.total_files,
            path.display(),
            result.file_size_bytes
        );
        Ok(result)
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<ProjectStructure> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open artifact: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse artifact: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{FileDeclarations, FileEntry, FileError};
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut project = ProjectStructure::new("/work/shop");
        project.files.insert(
            "p/A.java".to_string(),
            FileEntry::Parsed(FileDeclarations {
                package: Some("p".to_string()),
                ..Default::default()
            }),
        );
        project.files.insert(
            "p/B.java".to_string(),
            FileEntry::Error(FileError {
                error: "syntax error at line 2, column 1".to_string(),
            }),
        );

        let path = dir.path().join("out/structure.json");
        let result = ProjectWriter::write(&project, &path).unwrap();
        assert_eq!(result.total_files, 2);
        assert!(result.file_size_bytes > 0);

        assert_eq!(ProjectWriter::read(&path).unwrap(), project);
    }

    #[test]
    fn test_read_missing_artifact() {
        let err = ProjectWriter::read("/nonexistent/structure.json").unwrap_err();
        assert!(err.to_string().starts_with("Failed to open artifact"));
    }
}
