use crate::analysis::types::{DependencyKind, FileDeclarations, MethodDecl, ProjectStructure};
use database::graph::{
    NodeLabel, NodeRef, Properties, PropertyValue, RelationshipKind, WriteBatch,
};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use std::path::Path;

const TYPE_LABELS: &[NodeLabel] = &[NodeLabel::Class, NodeLabel::Interface];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Also write method-to-type `REFERENCES` edges.
    pub include_references: bool,
}

fn properties<const N: usize>(pairs: [(&'static str, PropertyValue); N]) -> Properties {
    pairs.into_iter().collect()
}

pub fn method_id(owner_full_name: &str, method: &str) -> String {
    format!("{owner_full_name}.{method}")
}

/// Every package named by a parsed file, plus all of its prefixes.
pub fn all_packages(project: &ProjectStructure) -> BTreeSet<String> {
    let mut packages = BTreeSet::new();
    for (_, declarations) in project.parsed_files() {
        if let Some(package) = declarations.package() {
            let mut prefix = String::new();
            for segment in package.split('.') {
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(segment);
                packages.insert(prefix.clone());
            }
        }
    }
    packages
}

/// Orders the writes for a full reload. Every batch only refers to nodes
/// created by itself or by an earlier batch. Errored files are left out.
pub fn plan_batches(project: &ProjectStructure, options: &LoadOptions) -> Vec<WriteBatch> {
    let project_node = NodeRef::new(NodeLabel::Project, project.project_name());
    let packages = all_packages(project);

    let mut batches = Vec::new();

    let mut reset = WriteBatch::new("reset");
    reset.delete_all();
    batches.push(reset);

    let mut root = WriteBatch::new("project");
    root.merge_node(
        project_node.clone(),
        properties([("path", project.project_path.as_str().into())]),
    );
    batches.push(root);

    let mut package_batch = WriteBatch::new("packages");
    for package in &packages {
        package_batch.merge_node(NodeRef::new(NodeLabel::Package, package), Properties::new());
    }
    for package in &packages {
        if let Some((parent, _)) = package.rsplit_once('.') {
            package_batch.merge_relationship(
                RelationshipKind::Contains,
                NodeRef::new(NodeLabel::Package, parent),
                NodeRef::new(NodeLabel::Package, package),
            );
        }
    }
    batches.push(package_batch);

    for (path, declarations) in project.parsed_files() {
        batches.push(file_batch(&project_node, path, declarations));
    }

    batches.push(inheritance_batch(project));
    if options.include_references {
        batches.push(references_batch(project));
    }
    batches.push(dependencies_batch(project));

    batches
}

fn file_batch(project_node: &NodeRef, path: &str, declarations: &FileDeclarations) -> WriteBatch {
    let mut batch = WriteBatch::new(format!("file:{path}"));
    let file_node = NodeRef::new(NodeLabel::File, path);
    let package = declarations.package();
    let package_node = package.map(|package| NodeRef::new(NodeLabel::Package, package));

    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());
    let mut file_properties = properties([("name", file_name.into())]);
    if let Some(package) = package {
        file_properties.insert("package", package.into());
    }
    batch
        .merge_node(file_node.clone(), file_properties)
        .merge_relationship(RelationshipKind::Contains, project_node.clone(), file_node.clone());
    if let Some(package_node) = &package_node {
        batch.merge_relationship(RelationshipKind::Contains, package_node.clone(), file_node.clone());
    }

    for import in &declarations.imports {
        let import_node = NodeRef::new(NodeLabel::Import, import);
        batch
            .merge_node(import_node.clone(), Properties::new())
            .merge_relationship(RelationshipKind::Imports, file_node.clone(), import_node);
    }

    for class in &declarations.classes {
        let full_name = class.full_name(package);
        let class_node = NodeRef::new(NodeLabel::Class, &full_name);
        batch.merge_node(
            class_node.clone(),
            properties([
                ("name", class.name.as_str().into()),
                ("kind", class.kind.as_str().into()),
                ("extends", class.extends.clone().unwrap_or_default().into()),
            ]),
        );
        attach_type(&mut batch, &class_node, &file_node, package_node.as_ref());

        for field in &class.fields {
            let field_node = NodeRef::new(NodeLabel::Field, format!("{full_name}.{}", field.name));
            batch
                .merge_node(
                    field_node.clone(),
                    properties([
                        ("name", field.name.as_str().into()),
                        ("type", field.type_name.as_str().into()),
                        ("className", full_name.as_str().into()),
                    ]),
                )
                .merge_relationship(RelationshipKind::HasField, class_node.clone(), field_node);
        }
        add_methods(&mut batch, &class_node, &full_name, &class.methods);
    }

    for interface in &declarations.interfaces {
        let full_name = interface.full_name(package);
        let interface_node = NodeRef::new(NodeLabel::Interface, &full_name);
        batch.merge_node(
            interface_node.clone(),
            properties([("name", interface.name.as_str().into())]),
        );
        attach_type(&mut batch, &interface_node, &file_node, package_node.as_ref());
        add_methods(&mut batch, &interface_node, &full_name, &interface.methods);
    }

    batch
}

fn attach_type(
    batch: &mut WriteBatch,
    type_node: &NodeRef,
    file_node: &NodeRef,
    package_node: Option<&NodeRef>,
) {
    if let Some(package_node) = package_node {
        batch.merge_relationship(RelationshipKind::Contains, package_node.clone(), type_node.clone());
    }
    batch.merge_relationship(RelationshipKind::Contains, file_node.clone(), type_node.clone());
}

fn add_methods(batch: &mut WriteBatch, owner: &NodeRef, owner_full_name: &str, methods: &[MethodDecl]) {
    for method in methods {
        let id = method_id(owner_full_name, &method.name);
        let method_node = NodeRef::new(NodeLabel::Method, &id);
        batch
            .merge_node(
                method_node.clone(),
                properties([
                    ("name", method.name.as_str().into()),
                    ("returnType", method.return_type.as_str().into()),
                    ("documentation", method.documentation.as_str().into()),
                    ("description", method.description.as_str().into()),
                    ("body", method.body.as_str().into()),
                    ("parentName", owner_full_name.into()),
                ]),
            )
            .merge_relationship(RelationshipKind::Declares, owner.clone(), method_node.clone());

        for (position, parameter) in method.parameters.iter().enumerate() {
            let parameter_node = NodeRef::new(NodeLabel::Parameter, format!("{id}.{}", parameter.name));
            batch
                .merge_node(
                    parameter_node.clone(),
                    properties([
                        ("name", parameter.name.as_str().into()),
                        ("type", parameter.type_name.as_str().into()),
                        ("position", (position as i64).into()),
                        ("methodId", id.as_str().into()),
                    ]),
                )
                .merge_relationship(
                    RelationshipKind::HasParameter,
                    method_node.clone(),
                    parameter_node,
                );
        }
    }
}

// Inheritance targets are matched by name, so they can only be linked once
// every type of the project exists.
fn inheritance_batch(project: &ProjectStructure) -> WriteBatch {
    let mut batch = WriteBatch::new("inheritance");
    for (_, declarations) in project.parsed_files() {
        let package = declarations.package();
        for class in &declarations.classes {
            let class_node = NodeRef::new(NodeLabel::Class, class.full_name(package));
            if let Some(parent) = &class.extends {
                batch.merge_relationship_by_name(
                    RelationshipKind::Extends,
                    class_node.clone(),
                    TYPE_LABELS,
                    parent,
                );
            }
            for interface in &class.implements {
                batch.merge_relationship_by_name(
                    RelationshipKind::Implements,
                    class_node.clone(),
                    &[NodeLabel::Interface],
                    interface,
                );
            }
        }
        for interface in &declarations.interfaces {
            let interface_node = NodeRef::new(NodeLabel::Interface, interface.full_name(package));
            for parent in &interface.extends {
                batch.merge_relationship_by_name(
                    RelationshipKind::Extends,
                    interface_node.clone(),
                    &[NodeLabel::Interface],
                    parent,
                );
            }
        }
    }
    batch
}

fn references_batch(project: &ProjectStructure) -> WriteBatch {
    let mut batch = WriteBatch::new("references");
    for (_, declarations) in project.parsed_files() {
        for reference in &declarations.object_references {
            batch.merge_relationship_by_name(
                RelationshipKind::References,
                NodeRef::new(
                    NodeLabel::Method,
                    method_id(&reference.from_class, &reference.from_method),
                ),
                TYPE_LABELS,
                &reference.to_class,
            );
        }
    }
    batch
}

// Only resolved imports become file dependencies. A file importing its own
// nested type keeps the self edge.
fn dependencies_batch(project: &ProjectStructure) -> WriteBatch {
    let mut batch = WriteBatch::new("dependencies");
    let mut seen = FxHashSet::default();
    for (path, declarations) in project.parsed_files() {
        let targets = declarations
            .dependencies
            .iter()
            .filter(|dependency| dependency.kind == DependencyKind::Import)
            .filter_map(|dependency| dependency.file.as_deref());
        for target in targets {
            if seen.insert((path.as_str(), target)) {
                batch.merge_relationship(
                    RelationshipKind::DependsOn,
                    NodeRef::new(NodeLabel::File, path),
                    NodeRef::new(NodeLabel::File, target),
                );
            }
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::graph::WriteOp;
    use crate::analysis::types::{ClassDecl, Dependency, FileEntry, FileError};

    #[test]
    fn test_all_packages_adds_prefixes() {
        let mut project = ProjectStructure::new("/work/shop");
        project.files.insert(
            "A.java".to_string(),
            FileEntry::Parsed(FileDeclarations {
                package: Some("com.acme.util".to_string()),
                ..Default::default()
            }),
        );
        project.files.insert(
            "B.java".to_string(),
            FileEntry::Parsed(FileDeclarations::default()),
        );

        let packages = all_packages(&project).into_iter().collect::<Vec<_>>();
        assert_eq!(packages, vec!["com", "com.acme", "com.acme.util"]);
    }

    #[test]
    fn test_batch_order_and_error_files_skipped() {
        let mut project = ProjectStructure::new("/work/shop");
        project.files.insert(
            "p/A.java".to_string(),
            FileEntry::Parsed(FileDeclarations {
                package: Some("p".to_string()),
                classes: vec![ClassDecl {
                    name: "A".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            }),
        );
        project.files.insert(
            "p/Broken.java".to_string(),
            FileEntry::Error(FileError {
                error: "syntax error at line 1, column 5".to_string(),
            }),
        );

        let names = plan_batches(&project, &LoadOptions::default())
            .into_iter()
            .map(|batch| batch.name)
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "reset",
                "project",
                "packages",
                "file:p/A.java",
                "inheritance",
                "dependencies"
            ]
        );

        let with_references = plan_batches(
            &project,
            &LoadOptions {
                include_references: true,
            },
        );
        assert_eq!(with_references[5].name, "references");
    }

    fn dependency(kind: DependencyKind, target: &str, file: Option<&str>) -> Dependency {
        Dependency {
            kind,
            target: target.to_string(),
            file: file.map(str::to_string),
        }
    }

    #[test]
    fn test_depends_on_follows_resolved_imports_only() {
        let mut project = ProjectStructure::new("/work/shop");
        project.files.insert(
            "p/A.java".to_string(),
            FileEntry::Parsed(FileDeclarations {
                package: Some("p".to_string()),
                dependencies: vec![
                    dependency(DependencyKind::Import, "q.B", Some("q/B.java")),
                    dependency(DependencyKind::Import, "q.B", Some("q/B.java")),
                    dependency(DependencyKind::Import, "p.A.Builder", Some("p/A.java")),
                    dependency(DependencyKind::Import, "java.util.List", None),
                    dependency(DependencyKind::Extends, "Base", Some("p/Base.java")),
                    dependency(DependencyKind::Reference, "C", Some("q/C.java")),
                ],
                ..Default::default()
            }),
        );

        let batches = plan_batches(&project, &LoadOptions::default());
        let dependencies = batches
            .iter()
            .find(|batch| batch.name == "dependencies")
            .unwrap();

        let edges = dependencies
            .ops
            .iter()
            .map(|op| match op {
                WriteOp::MergeRelationship { kind, from, to } => {
                    assert_eq!(*kind, RelationshipKind::DependsOn);
                    (from.key.as_str(), to.key.as_str())
                }
                other => panic!("unexpected operation {other:?}"),
            })
            .collect::<Vec<_>>();
        assert_eq!(edges, vec![("p/A.java", "q/B.java"), ("p/A.java", "p/A.java")]);
    }
}
