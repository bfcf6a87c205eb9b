use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use strum::EnumIter;

/// Node labels of the code graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum NodeLabel {
    Project,
    Package,
    File,
    Class,
    Interface,
    Method,
    Field,
    Parameter,
    Import,
}

impl NodeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::Project => "Project",
            NodeLabel::Package => "Package",
            NodeLabel::File => "File",
            NodeLabel::Class => "Class",
            NodeLabel::Interface => "Interface",
            NodeLabel::Method => "Method",
            NodeLabel::Field => "Field",
            NodeLabel::Parameter => "Parameter",
            NodeLabel::Import => "Import",
        }
    }

    /// Property holding the natural key every upsert is keyed on.
    pub fn key_property(&self) -> &'static str {
        match self {
            NodeLabel::Project | NodeLabel::Package | NodeLabel::Import => "name",
            NodeLabel::File => "path",
            NodeLabel::Class | NodeLabel::Interface => "fullName",
            NodeLabel::Method | NodeLabel::Field | NodeLabel::Parameter => "id",
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum RelationshipKind {
    Contains,
    Declares,
    HasField,
    HasParameter,
    Extends,
    Implements,
    Imports,
    DependsOn,
    References,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Contains => "CONTAINS",
            RelationshipKind::Declares => "DECLARES",
            RelationshipKind::HasField => "HAS_FIELD",
            RelationshipKind::HasParameter => "HAS_PARAMETER",
            RelationshipKind::Extends => "EXTENDS",
            RelationshipKind::Implements => "IMPLEMENTS",
            RelationshipKind::Imports => "IMPORTS",
            RelationshipKind::DependsOn => "DEPENDS_ON",
            RelationshipKind::References => "REFERENCES",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyValue {
    String(String),
    Int(i64),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value),
            PropertyValue::Int(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::String(value) => Value::from(value.as_str()),
            PropertyValue::Int(value) => Value::from(*value),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

pub type Properties = BTreeMap<&'static str, PropertyValue>;

/// Identifies a node by label and natural key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    pub label: NodeLabel,
    pub key: String,
}

impl NodeRef {
    pub fn new(label: NodeLabel, key: impl Into<String>) -> Self {
        Self {
            label,
            key: key.into(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.label, self.key)
    }
}

/// A single idempotent write against the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Removes every node and relationship.
    DeleteAll,
    /// Upsert keyed on `node.key`; listed properties are overwritten.
    MergeNode {
        node: NodeRef,
        properties: Properties,
    },
    /// Creates the edge when both endpoints exist, otherwise does nothing.
    MergeRelationship {
        kind: RelationshipKind,
        from: NodeRef,
        to: NodeRef,
    },
    /// Creates an edge from `from` to every node carrying one of `to_labels`
    /// whose simple or full name equals `name`. Nothing is created when no
    /// node matches.
    MergeRelationshipByName {
        kind: RelationshipKind,
        from: NodeRef,
        to_labels: Vec<NodeLabel>,
        name: String,
    },
}

/// Operations committed together in one transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    pub name: String,
    pub ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ops: Vec::new(),
        }
    }

    pub fn delete_all(&mut self) -> &mut Self {
        self.ops.push(WriteOp::DeleteAll);
        self
    }

    pub fn merge_node(&mut self, node: NodeRef, properties: Properties) -> &mut Self {
        self.ops.push(WriteOp::MergeNode { node, properties });
        self
    }

    pub fn merge_relationship(
        &mut self,
        kind: RelationshipKind,
        from: NodeRef,
        to: NodeRef,
    ) -> &mut Self {
        self.ops
            .push(WriteOp::MergeRelationship { kind, from, to });
        self
    }

    pub fn merge_relationship_by_name(
        &mut self,
        kind: RelationshipKind,
        from: NodeRef,
        to_labels: &[NodeLabel],
        name: impl Into<String>,
    ) -> &mut Self {
        self.ops.push(WriteOp::MergeRelationshipByName {
            kind,
            from,
            to_labels: to_labels.to_vec(),
            name: name.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_label_has_a_key_property() {
        for label in NodeLabel::iter() {
            assert!(!label.key_property().is_empty(), "{label}");
        }
        assert_eq!(NodeLabel::Class.key_property(), "fullName");
        assert_eq!(NodeLabel::Method.key_property(), "id");
        assert_eq!(NodeLabel::File.key_property(), "path");
    }

    #[test]
    fn test_relationship_names_are_screaming_snake_case() {
        let names: Vec<&str> = RelationshipKind::iter().map(|k| k.as_str()).collect();
        assert!(names.contains(&"HAS_PARAMETER"));
        assert!(names.contains(&"DEPENDS_ON"));
        assert!(
            names
                .iter()
                .all(|name| name.chars().all(|c| c.is_ascii_uppercase() || c == '_'))
        );
    }

    #[test]
    fn test_batch_builder_preserves_order() {
        let mut batch = WriteBatch::new("example");
        batch
            .delete_all()
            .merge_node(NodeRef::new(NodeLabel::Package, "a"), Properties::new())
            .merge_relationship(
                RelationshipKind::Contains,
                NodeRef::new(NodeLabel::Package, "a"),
                NodeRef::new(NodeLabel::Package, "a.b"),
            );

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.ops[0], WriteOp::DeleteAll);
        assert!(matches!(batch.ops[2], WriteOp::MergeRelationship { .. }));
    }
}
