use crate::analysis::index::ProjectIndex;
use crate::analysis::types::{
    Dependency, DependencyKind, FileDeclarations, FileEntry, MethodDecl, ObjectReference,
    ProjectStructure,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// How imports are matched against the project index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Keep an import when it names an indexed type exactly, ends with an
    /// indexed name, or has an indexed name as one of its segments. Other
    /// imports are treated as external and dropped.
    #[default]
    Heuristic,
    /// Record every import; only exact matches carry a file.
    Exact,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub dependencies: usize,
    pub resolved_dependencies: usize,
    pub object_references: usize,
}

pub struct RelationshipResolver<'a> {
    index: &'a ProjectIndex,
    mode: ResolutionMode,
}

impl<'a> RelationshipResolver<'a> {
    pub fn new(index: &'a ProjectIndex, mode: ResolutionMode) -> Self {
        Self { index, mode }
    }

    /// Fills `dependencies` and `object_references` of every parsed file,
    /// replacing whatever was there.
    pub fn resolve_project(&self, project: &mut ProjectStructure) -> ResolutionStats {
        let mut stats = ResolutionStats::default();

        for entry in project.files.values_mut() {
            let FileEntry::Parsed(declarations) = entry else {
                continue;
            };
            let (dependencies, references) = self.resolve_file(declarations);
            stats.dependencies += dependencies.len();
            stats.resolved_dependencies += dependencies.iter().filter(|d| d.file.is_some()).count();
            stats.object_references += references.len();
            declarations.dependencies = dependencies;
            declarations.object_references = references;
        }

        stats
    }

    pub fn resolve_file(
        &self,
        declarations: &FileDeclarations,
    ) -> (Vec<Dependency>, Vec<ObjectReference>) {
        let mut dependencies = declarations
            .imports
            .iter()
            .filter_map(|import| self.resolve_import(import))
            .collect::<Vec<_>>();

        for class in &declarations.classes {
            if let Some(parent) = &class.extends {
                dependencies.push(self.type_dependency(DependencyKind::Extends, parent));
            }
            for interface in &class.implements {
                dependencies.push(self.type_dependency(DependencyKind::Implements, interface));
            }
        }
        for interface in &declarations.interfaces {
            for parent in &interface.extends {
                dependencies.push(self.type_dependency(DependencyKind::Extends, parent));
            }
        }

        let package = declarations.package();
        let owners = declarations
            .classes
            .iter()
            .map(|class| (class.full_name(package), &class.methods))
            .chain(
                declarations
                    .interfaces
                    .iter()
                    .map(|interface| (interface.full_name(package), &interface.methods)),
            );

        let mut references = Vec::new();
        for (owner, methods) in owners {
            self.resolve_references(&owner, methods, &mut references);
        }

        let mut referenced = FxHashSet::default();
        for reference in &references {
            if referenced.insert(reference.to_class.as_str()) {
                dependencies.push(Dependency {
                    kind: DependencyKind::Reference,
                    target: reference.to_class.clone(),
                    file: Some(reference.to_file.clone()),
                });
            }
        }

        (dependencies, references)
    }

    fn resolve_import(&self, import: &str) -> Option<Dependency> {
        let file = self.index.lookup(import).map(str::to_string);
        let keep = match self.mode {
            ResolutionMode::Exact => true,
            ResolutionMode::Heuristic => file.is_some() || self.looks_internal(import),
        };
        keep.then(|| Dependency {
            kind: DependencyKind::Import,
            target: import.to_string(),
            file,
        })
    }

    fn looks_internal(&self, import: &str) -> bool {
        import.split('.').any(|segment| self.index.contains(segment))
            || self.index.names().any(|name| import.ends_with(name))
    }

    fn type_dependency(&self, kind: DependencyKind, target: &str) -> Dependency {
        Dependency {
            kind,
            target: target.to_string(),
            file: self.index.lookup(target).map(str::to_string),
        }
    }

    fn resolve_references(
        &self,
        owner: &str,
        methods: &[MethodDecl],
        out: &mut Vec<ObjectReference>,
    ) {
        for method in methods {
            for candidate in &method.referenced_objects {
                if let Some(file) = self.index.lookup(candidate) {
                    out.push(ObjectReference {
                        from_class: owner.to_string(),
                        from_method: method.name.clone(),
                        to_class: candidate.clone(),
                        to_file: file.to_string(),
                    });
                }
            }
        }
    }
}
