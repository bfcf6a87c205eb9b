use crate::kuzu::connection::KuzuConnection;
use crate::kuzu::types::{DatabaseError, QueryNoop};
use crate::querying::query_builder::QueryBuilder;
use crate::schema::init::{NODE_TABLES, RELATIONSHIP_TABLES};
use crate::schema::types::{NodeTable, RelationshipTable, SchemaStats};
use kuzu::Database;
use tracing::info;

/// Creates and inspects the code graph schema.
pub struct SchemaManager<'a> {
    database: &'a Database,
    query_builder: QueryBuilder,
}

impl<'a> SchemaManager<'a> {
    pub fn new(database: &'a Database) -> Self {
        Self {
            database,
            query_builder: QueryBuilder::new(),
        }
    }

    fn get_connection(&self) -> Result<KuzuConnection<'a>, DatabaseError> {
        KuzuConnection::new(self.database)
    }

    /// Check if the schema already exists by looking for every table
    pub fn schema_exists(&self) -> Result<bool, DatabaseError> {
        let existing = self.get_connection()?.get_table_names()?;
        let has = |name: &str| existing.iter().any(|t| t.eq_ignore_ascii_case(name));

        Ok(NODE_TABLES.iter().all(|table| has(table.name()))
            && RELATIONSHIP_TABLES.iter().all(|table| has(table.name())))
    }

    pub fn initialize_schema(&self) -> Result<(), DatabaseError> {
        if self.schema_exists()? {
            info!("Schema already exists, skipping creation");
            return Ok(());
        }

        info!("Initializing code graph schema...");
        self.get_connection()?.transaction(|conn| {
            for table in NODE_TABLES.iter() {
                self.create_node_table(conn, table)?;
            }
            for table in RELATIONSHIP_TABLES.iter() {
                self.create_relationship_table(conn, table)?;
            }
            Ok(())
        })?;

        info!("Code graph schema initialized successfully");
        Ok(())
    }

    fn create_node_table(
        &self,
        transaction_conn: &KuzuConnection,
        table: &NodeTable,
    ) -> Result<(), DatabaseError> {
        let (_, query) = self.query_builder.create_node_table(table);
        transaction_conn.execute_ddl(&query)?;
        info!("Created node table: {}", table.name());
        Ok(())
    }

    fn create_relationship_table(
        &self,
        transaction_conn: &KuzuConnection,
        table: &RelationshipTable,
    ) -> Result<(), DatabaseError> {
        let (noop, query) = self.query_builder.create_relationship_table(table);
        if noop == QueryNoop::Yes {
            return Err(DatabaseError::InitializationFailed(format!(
                "RelationshipTable {} must have from_to_pairs specified",
                table.name()
            )));
        }

        transaction_conn.execute_ddl(&query)?;
        info!("Created relationship table: {}", table.name());
        Ok(())
    }

    pub fn get_schema_stats(&self) -> Result<SchemaStats, DatabaseError> {
        let connection = self.get_connection()?;

        let node_counts = NODE_TABLES
            .iter()
            .map(|table| Ok((table.name().to_string(), connection.count_nodes(table.name())?)))
            .collect::<Result<Vec<_>, DatabaseError>>()?;
        let relationship_counts = RELATIONSHIP_TABLES
            .iter()
            .map(|table| {
                Ok((
                    table.name().to_string(),
                    connection.count_relationships(table.name())?,
                ))
            })
            .collect::<Result<Vec<_>, DatabaseError>>()?;

        Ok(SchemaStats {
            node_tables: node_counts.len(),
            relationship_tables: relationship_counts.len(),
            total_nodes: node_counts.iter().map(|(_, count)| count).sum(),
            total_relationships: relationship_counts.iter().map(|(_, count)| count).sum(),
            node_counts,
            relationship_counts,
        })
    }
}
