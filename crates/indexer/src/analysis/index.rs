use crate::analysis::types::ProjectStructure;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Maps every declared type, by full name and by simple name, to the file
/// declaring it.
///
/// When two files declare the same name the file visited last wins, and
/// the name is remembered as ambiguous so callers can report it.
#[derive(Debug, Default)]
pub struct ProjectIndex {
    names: FxHashMap<String, String>,
    ambiguous: BTreeSet<String>,
}

impl ProjectIndex {
    pub fn build(project: &ProjectStructure) -> Self {
        let mut index = Self::default();

        for (path, declarations) in project.parsed_files() {
            let package = declarations.package();
            for class in &declarations.classes {
                index.insert(class.full_name(package), &class.name, path);
            }
            for interface in &declarations.interfaces {
                index.insert(interface.full_name(package), &interface.name, path);
            }
        }

        if !index.ambiguous.is_empty() {
            warn!(
                "{} type name(s) are declared in more than one file; the last file wins: {}",
                index.ambiguous.len(),
                index
                    .ambiguous
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        index
    }

    fn insert(&mut self, full_name: String, simple_name: &str, path: &str) {
        for key in [full_name.as_str(), simple_name] {
            if let Some(previous) = self.names.insert(key.to_string(), path.to_string())
                && previous != path
            {
                debug!("{key} is declared in {previous} and {path}");
                self.ambiguous.insert(key.to_string());
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn ambiguous_names(&self) -> impl Iterator<Item = &str> {
        self.ambiguous.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{ClassDecl, FileDeclarations, FileEntry, FileError, InterfaceDecl};
    use tracing_test::traced_test;

    fn file(package: Option<&str>, classes: &[&str], interfaces: &[&str]) -> FileEntry {
        FileEntry::Parsed(FileDeclarations {
            package: package.map(str::to_string),
            classes: classes
                .iter()
                .map(|name| ClassDecl {
                    name: name.to_string(),
                    ..Default::default()
                })
                .collect(),
            interfaces: interfaces
                .iter()
                .map(|name| InterfaceDecl {
                    name: name.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_full_and_simple_names() {
        let mut project = ProjectStructure::new("/work/shop");
        project
            .files
            .insert("p/A.java".to_string(), file(Some("p"), &["A"], &[]));
        project
            .files
            .insert("q/I.java".to_string(), file(Some("q"), &[], &["I"]));
        project.files.insert(
            "Broken.java".to_string(),
            FileEntry::Error(FileError {
                error: "syntax error".to_string(),
            }),
        );

        let index = ProjectIndex::build(&project);
        assert_eq!(index.lookup("p.A"), Some("p/A.java"));
        assert_eq!(index.lookup("A"), Some("p/A.java"));
        assert_eq!(index.lookup("q.I"), Some("q/I.java"));
        assert_eq!(index.lookup("I"), Some("q/I.java"));
        assert_eq!(index.len(), 4);
        assert_eq!(index.ambiguous_names().count(), 0);
    }

    #[test]
    fn test_default_package_type_is_not_ambiguous() {
        let mut project = ProjectStructure::new("/work/shop");
        project
            .files
            .insert("Main.java".to_string(), file(None, &["Main"], &[]));

        let index = ProjectIndex::build(&project);
        assert_eq!(index.len(), 1);
        assert_eq!(index.ambiguous_names().count(), 0);
    }

    #[test]
    #[traced_test]
    fn test_last_file_wins_and_is_reported() {
        let mut project = ProjectStructure::new("/work/shop");
        project
            .files
            .insert("a/Util.java".to_string(), file(Some("a"), &["Util"], &[]));
        project
            .files
            .insert("b/Util.java".to_string(), file(Some("b"), &["Util"], &[]));

        let index = ProjectIndex::build(&project);
        assert_eq!(index.lookup("Util"), Some("b/Util.java"));
        assert_eq!(index.lookup("a.Util"), Some("a/Util.java"));
        assert_eq!(index.ambiguous_names().collect::<Vec<_>>(), vec!["Util"]);
        assert!(logs_contain("1 type name(s) are declared in more than one file"));
    }
}
