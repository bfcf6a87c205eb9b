use crate::graph::types::{NodeLabel, RelationshipKind};

/// A Kuzu node table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTable {
    pub label: NodeLabel,
    pub columns: &'static [ColumnDefinition],
}

impl NodeTable {
    pub fn name(&self) -> &'static str {
        self.label.as_str()
    }

    pub fn primary_key(&self) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| column.is_primary_key)
    }
}

/// A Kuzu relationship table definition. Kuzu needs every FROM/TO pair a
/// relationship may connect declared up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipTable {
    pub kind: RelationshipKind,
    pub from_to_pairs: &'static [(&'static NodeTable, &'static NodeTable)],
}

impl RelationshipTable {
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn connects(&self, from: NodeLabel, to: NodeLabel) -> bool {
        self.from_to_pairs
            .iter()
            .any(|(f, t)| f.label == from && t.label == to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: &'static str,
    pub data_type: KuzuDataType,
    pub is_primary_key: bool,
}

macro_rules! generate_data_type_methods {
    ($($method_name:ident => $variant:ident),* $(,)?) => {
        $(
            pub const fn $method_name(mut self) -> Self {
                self.data_type = KuzuDataType::$variant;
                self
            }
        )*
    };
}

impl ColumnDefinition {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            data_type: KuzuDataType::String,
            is_primary_key: false,
        }
    }

    // generates methods for each data type e.g string(), int64(), etc.
    generate_data_type_methods! {
        string => String,
        int64 => Int64,
        boolean => Boolean,
    }

    pub const fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KuzuDataType {
    String,
    Int64,
    Boolean,
}

impl std::fmt::Display for KuzuDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KuzuDataType::String => write!(f, "STRING"),
            KuzuDataType::Int64 => write!(f, "INT64"),
            KuzuDataType::Boolean => write!(f, "BOOLEAN"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaStats {
    pub node_tables: usize,
    pub relationship_tables: usize,
    pub total_nodes: usize,
    pub total_relationships: usize,
    pub node_counts: Vec<(String, usize)>,
    pub relationship_counts: Vec<(String, usize)>,
}

impl std::fmt::Display for SchemaStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Schema Stats: {} node tables, {} rel tables, {} nodes, {} relationships",
            self.node_tables, self.relationship_tables, self.total_nodes, self.total_relationships
        )
    }
}
