use std::path::{Path, PathBuf};

use crate::execution::config::IndexingConfig;
use crate::project::file_info::FileInfo;
use ignore::WalkBuilder;
use tracing::warn;

pub const JAVA_EXTENSION: &str = "java";

// The FileSource trait keeps the executor agnostic of how files are found:
// a directory walk for the CLI, or a fixed list when a caller already knows
// which files belong to the project.
pub trait FileSource {
    type Error: std::fmt::Display + Send + Sync + 'static;

    fn get_files(&self, config: &IndexingConfig) -> Result<Vec<FileInfo>, Self::Error>;
}

pub struct PathFileSource {
    pub files: Vec<FileInfo>,
}

impl PathFileSource {
    pub fn new(mut files: Vec<FileInfo>) -> Self {
        files.sort();
        Self { files }
    }

    /// Walks `path` recursively. Ignore files are not honoured, so every
    /// `.java` file under the root is a candidate.
    pub fn from_path(path: &Path) -> Self {
        let mut files = Vec::new();

        for result in WalkBuilder::new(path)
            .hidden(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .parents(false)
            .build()
        {
            match result {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|ft| ft.is_file()) {
                        let file_info = FileInfo::from_path(entry.path().to_path_buf());
                        if is_java_file(&file_info) {
                            files.push(file_info);
                        }
                    }
                }
                Err(e) => warn!("Skipping unreadable directory entry: {e}"),
            }
        }

        Self::new(files)
    }

    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self::new(paths.into_iter().map(FileInfo::from_path).collect())
    }
}

impl FileSource for PathFileSource {
    type Error = &'static str;

    fn get_files(&self, _config: &IndexingConfig) -> Result<Vec<FileInfo>, Self::Error> {
        Ok(self
            .files
            .iter()
            .filter(|file_info| is_java_file(file_info))
            .cloned()
            .collect())
    }
}

fn is_java_file(file_info: &FileInfo) -> bool {
    file_info.extension() == JAVA_EXTENSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::config::IndexingConfigBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_walk_finds_java_files_only() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src/p")).unwrap();
        std::fs::create_dir_all(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join("src/p/A.java"), "class A {}").unwrap();
        std::fs::write(dir.path().join("src/p/notes.txt"), "").unwrap();
        std::fs::write(dir.path().join(".hidden/B.java"), "class B {}").unwrap();
        std::fs::write(dir.path().join(".gitignore"), "*.java").unwrap();

        let source = PathFileSource::from_path(dir.path());
        let files = source
            .get_files(&IndexingConfigBuilder::build(1))
            .unwrap()
            .iter()
            .map(|file| file.relative_path(dir.path()))
            .collect::<Vec<_>>();

        assert_eq!(files, vec![".hidden/B.java", "src/p/A.java"]);
    }

    #[test]
    fn test_explicit_paths_are_filtered() {
        let source = PathFileSource::from_paths([
            PathBuf::from("b/B.java"),
            PathBuf::from("a/A.java"),
            PathBuf::from("a/README.md"),
        ]);
        let files = source.get_files(&IndexingConfigBuilder::build(1)).unwrap();
        assert_eq!(
            files,
            vec![
                FileInfo::from_path(PathBuf::from("a/A.java")),
                FileInfo::from_path(PathBuf::from("b/B.java")),
            ]
        );
    }
}
