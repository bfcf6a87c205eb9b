use crate::graph::store::GraphStore;
use crate::graph::types::{NodeLabel, NodeRef, Properties, RelationshipKind, WriteBatch, WriteOp};
use crate::kuzu::types::DatabaseError;
use crate::schema::init::relationship_table;
use std::collections::{BTreeMap, BTreeSet};

pub type Edge = (RelationshipKind, NodeRef, NodeRef);

/// Comparable copy of a store's contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    pub nodes: BTreeMap<NodeRef, Properties>,
    pub relationships: BTreeSet<Edge>,
}

/// `GraphStore` kept in memory, with the same match and merge rules as the
/// Kuzu store. Batches are all-or-nothing.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    graph: GraphSnapshot,
    executed_batches: Vec<String>,
    fail_on_batch: Option<usize>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the batch at `index` (0-based, counting every submitted batch)
    /// fail without applying any of its operations.
    pub fn failing_on_batch(mut self, index: usize) -> Self {
        self.fail_on_batch = Some(index);
        self
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.graph.clone()
    }

    pub fn executed_batches(&self) -> &[String] {
        &self.executed_batches
    }

    pub fn node(&self, label: NodeLabel, key: &str) -> Option<&Properties> {
        self.graph.nodes.get(&NodeRef::new(label, key))
    }

    pub fn has_node(&self, label: NodeLabel, key: &str) -> bool {
        self.node(label, key).is_some()
    }

    pub fn node_keys(&self, label: NodeLabel) -> Vec<&str> {
        self.graph
            .nodes
            .keys()
            .filter(|node| node.label == label)
            .map(|node| node.key.as_str())
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.graph.relationships.len()
    }

    pub fn has_relationship(&self, kind: RelationshipKind, from: &NodeRef, to: &NodeRef) -> bool {
        self.graph
            .relationships
            .contains(&(kind, from.clone(), to.clone()))
    }

    pub fn relationships(&self, kind: RelationshipKind) -> Vec<(&NodeRef, &NodeRef)> {
        self.graph
            .relationships
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .map(|(_, from, to)| (from, to))
            .collect()
    }

    pub fn property(&self, label: NodeLabel, key: &str, name: &str) -> Option<String> {
        self.node(label, key)
            .and_then(|properties| properties.get(name))
            .map(|value| match value.as_str() {
                Some(text) => text.to_string(),
                None => format!("{value:?}"),
            })
    }
}

fn check_pair(kind: RelationshipKind, from: NodeLabel, to: NodeLabel) -> Result<(), DatabaseError> {
    if relationship_table(kind).connects(from, to) {
        Ok(())
    } else {
        Err(DatabaseError::InvalidRelationship {
            kind: kind.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

fn apply(graph: &mut GraphSnapshot, op: &WriteOp) -> Result<(), DatabaseError> {
    match op {
        WriteOp::DeleteAll => {
            graph.nodes.clear();
            graph.relationships.clear();
        }
        WriteOp::MergeNode { node, properties } => {
            let entry = graph.nodes.entry(node.clone()).or_default();
            for (name, value) in properties {
                if *name != node.label.key_property() {
                    entry.insert(*name, value.clone());
                }
            }
        }
        WriteOp::MergeRelationship { kind, from, to } => {
            check_pair(*kind, from.label, to.label)?;
            if graph.nodes.contains_key(from) && graph.nodes.contains_key(to) {
                graph.relationships.insert((*kind, from.clone(), to.clone()));
            }
        }
        WriteOp::MergeRelationshipByName {
            kind,
            from,
            to_labels,
            name,
        } => {
            for label in to_labels {
                check_pair(*kind, from.label, *label)?;
            }
            if !graph.nodes.contains_key(from) {
                return Ok(());
            }
            let targets = graph
                .nodes
                .iter()
                .filter(|(node, properties)| {
                    to_labels.contains(&node.label)
                        && (node.key == *name
                            || properties.get("name").and_then(|v| v.as_str()) == Some(name.as_str()))
                })
                .map(|(node, _)| node.clone())
                .collect::<Vec<_>>();
            for target in targets {
                graph.relationships.insert((*kind, from.clone(), target));
            }
        }
    }
    Ok(())
}

impl GraphStore for InMemoryGraphStore {
    fn execute_batch(&mut self, batch: &WriteBatch) -> Result<(), DatabaseError> {
        let index = self.executed_batches.len();
        self.executed_batches.push(batch.name.clone());

        if self.fail_on_batch == Some(index) {
            return Err(DatabaseError::WriteFailed {
                batch: batch.name.clone(),
                message: "injected failure".to_string(),
            });
        }

        let mut staged = self.graph.clone();
        for op in &batch.ops {
            apply(&mut staged, op).map_err(|e| DatabaseError::WriteFailed {
                batch: batch.name.clone(),
                message: e.to_string(),
            })?;
        }
        self.graph = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::PropertyValue;

    fn named(name: &str) -> Properties {
        let mut properties = Properties::new();
        properties.insert("name", PropertyValue::from(name));
        properties
    }

    #[test]
    fn test_merge_node_updates_properties() {
        let mut store = InMemoryGraphStore::new();
        let node = NodeRef::new(NodeLabel::Class, "p.A");

        let mut batch = WriteBatch::new("first");
        batch.merge_node(node.clone(), named("A"));
        store.execute_batch(&batch).unwrap();

        let mut batch = WriteBatch::new("second");
        batch.merge_node(node, named("Renamed"));
        store.execute_batch(&batch).unwrap();

        assert_eq!(store.node_count(), 1);
        assert_eq!(
            store.property(NodeLabel::Class, "p.A", "name").as_deref(),
            Some("Renamed")
        );
    }

    #[test]
    fn test_failed_batch_leaves_graph_untouched() {
        let mut store = InMemoryGraphStore::new();
        let class = NodeRef::new(NodeLabel::Class, "p.A");

        let mut batch = WriteBatch::new("invalid");
        batch.merge_node(class.clone(), named("A")).merge_relationship(
            RelationshipKind::Implements,
            class.clone(),
            class,
        );

        assert!(store.execute_batch(&batch).is_err());
        assert_eq!(store.node_count(), 0);
    }

    #[test]
    fn test_by_name_matches_simple_and_full_names() {
        let mut store = InMemoryGraphStore::new();
        let class = NodeRef::new(NodeLabel::Class, "p.A");
        let base = NodeRef::new(NodeLabel::Class, "q.Base");

        let mut batch = WriteBatch::new("types");
        batch
            .merge_node(class.clone(), named("A"))
            .merge_node(base.clone(), named("Base"))
            .merge_relationship_by_name(
                RelationshipKind::Extends,
                class.clone(),
                &[NodeLabel::Class, NodeLabel::Interface],
                "Base",
            )
            .merge_relationship_by_name(
                RelationshipKind::Extends,
                base.clone(),
                &[NodeLabel::Class],
                "p.A",
            );
        store.execute_batch(&batch).unwrap();

        assert!(store.has_relationship(RelationshipKind::Extends, &class, &base));
        assert!(store.has_relationship(RelationshipKind::Extends, &base, &class));
    }

    #[test]
    fn test_injected_failure() {
        let mut store = InMemoryGraphStore::new().failing_on_batch(1);
        let mut batch = WriteBatch::new("packages");
        batch.merge_node(NodeRef::new(NodeLabel::Package, "a"), Properties::new());

        store.execute_batch(&batch).unwrap();
        assert!(store.execute_batch(&batch).is_err());
        assert_eq!(store.executed_batches(), ["packages", "packages"]);
    }
}
