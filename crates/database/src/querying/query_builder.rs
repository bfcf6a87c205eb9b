use crate::graph::types::{NodeLabel, NodeRef, Properties, RelationshipKind, WriteOp};
use crate::kuzu::types::{QueryGeneratorResult, QueryNoop};
use crate::schema::types::{NodeTable, RelationshipTable};
use serde_json::{Map, Value};
use tracing::debug;

/// A Cypher statement with its named parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CypherStatement {
    pub query: String,
    pub params: Map<String, Value>,
}

impl CypherStatement {
    fn new(query: String, params: Map<String, Value>) -> Self {
        Self { query, params }
    }
}

#[derive(Default)]
pub struct QueryBuilder {
    log_queries: bool,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self { log_queries: false }
    }

    pub fn with_query_logging(mut self) -> Self {
        self.log_queries = true;
        self
    }

    pub fn log_query(&self, query: &str) {
        if self.log_queries {
            debug!("Query: {query}");
        }
    }

    // SCHEMA

    pub fn create_node_table(&self, table: &NodeTable) -> QueryGeneratorResult {
        let columns_str = table
            .columns
            .iter()
            .map(|col| {
                let mut col_def = format!("{} {}", col.name, col.data_type);
                if col.is_primary_key {
                    col_def.push_str(" PRIMARY KEY");
                }
                col_def
            })
            .collect::<Vec<_>>()
            .join(", ");

        let query = format!(
            "CREATE NODE TABLE IF NOT EXISTS {} ({})",
            table.name(),
            columns_str
        );

        (QueryNoop::No, query)
    }

    pub fn create_relationship_table(&self, table: &RelationshipTable) -> QueryGeneratorResult {
        if table.from_to_pairs.is_empty() {
            return (QueryNoop::Yes, String::new());
        }

        let from_to_clauses = table
            .from_to_pairs
            .iter()
            .map(|(from, to)| format!("FROM {} TO {}", from.name(), to.name()))
            .collect::<Vec<_>>()
            .join(", ");

        (
            QueryNoop::No,
            format!(
                "CREATE REL TABLE IF NOT EXISTS {} ({})",
                table.name(),
                from_to_clauses
            ),
        )
    }

    // WRITES

    /// Translates one write operation into the statements that implement it.
    /// Name-matched relationships expand to one statement per target label.
    pub fn write_statements(&self, op: &WriteOp) -> Vec<CypherStatement> {
        let statements = match op {
            WriteOp::DeleteAll => vec![CypherStatement::new(
                "MATCH (n) DETACH DELETE n".to_string(),
                Map::new(),
            )],
            WriteOp::MergeNode { node, properties } => vec![self.merge_node(node, properties)],
            WriteOp::MergeRelationship { kind, from, to } => {
                vec![self.merge_relationship(*kind, from, to)]
            }
            WriteOp::MergeRelationshipByName {
                kind,
                from,
                to_labels,
                name,
            } => to_labels
                .iter()
                .map(|label| self.merge_relationship_by_name(*kind, from, *label, name))
                .collect(),
        };

        for statement in &statements {
            self.log_query(&statement.query);
        }
        statements
    }

    fn merge_node(&self, node: &NodeRef, properties: &Properties) -> CypherStatement {
        let key_property = node.label.key_property();
        let mut params = Map::new();
        params.insert("key".to_string(), Value::from(node.key.as_str()));

        let assignments = properties
            .iter()
            .filter(|(name, _)| **name != key_property)
            .map(|(name, value)| {
                let param = format!("p_{name}");
                let assignment = format!("n.{name} = ${param}");
                params.insert(param, value.to_json());
                assignment
            })
            .collect::<Vec<_>>();

        let mut query = format!("MERGE (n:{} {{{}: $key}})", node.label, key_property);
        if !assignments.is_empty() {
            let set = assignments.join(", ");
            query.push_str(&format!(" ON CREATE SET {set} ON MATCH SET {set}"));
        }

        CypherStatement::new(query, params)
    }

    fn merge_relationship(
        &self,
        kind: RelationshipKind,
        from: &NodeRef,
        to: &NodeRef,
    ) -> CypherStatement {
        let mut params = Map::new();
        params.insert("from".to_string(), Value::from(from.key.as_str()));
        params.insert("to".to_string(), Value::from(to.key.as_str()));

        let query = format!(
            "MATCH (a:{} {{{}: $from}}), (b:{} {{{}: $to}}) MERGE (a)-[:{}]->(b)",
            from.label,
            from.label.key_property(),
            to.label,
            to.label.key_property(),
            kind
        );
        CypherStatement::new(query, params)
    }

    fn merge_relationship_by_name(
        &self,
        kind: RelationshipKind,
        from: &NodeRef,
        to_label: NodeLabel,
        name: &str,
    ) -> CypherStatement {
        let mut params = Map::new();
        params.insert("from".to_string(), Value::from(from.key.as_str()));
        params.insert("name".to_string(), Value::from(name));

        let query = format!(
            "MATCH (a:{} {{{}: $from}}), (b:{}) WHERE b.name = $name OR b.{} = $name MERGE (a)-[:{}]->(b)",
            from.label,
            from.label.key_property(),
            to_label,
            to_label.key_property(),
            kind
        );
        CypherStatement::new(query, params)
    }
}
