use crate::graph::store::GraphStore;
use crate::graph::types::WriteBatch;
use crate::kuzu::connection::KuzuConnection;
use crate::kuzu::types::DatabaseError;
use crate::querying::query_builder::QueryBuilder;
use crate::schema::manager::SchemaManager;
use kuzu::Database;
use tracing::{debug, error};

/// `GraphStore` backed by an embedded Kuzu database. One connection is
/// opened for the lifetime of the store and every batch runs in its own
/// transaction.
pub struct KuzuGraphStore<'a> {
    connection: KuzuConnection<'a>,
    query_builder: QueryBuilder,
}

impl<'a> KuzuGraphStore<'a> {
    /// Ensures the schema exists and opens the shared write connection.
    pub fn open(database: &'a Database) -> Result<Self, DatabaseError> {
        SchemaManager::new(database).initialize_schema()?;

        Ok(Self {
            connection: KuzuConnection::new(database)?,
            query_builder: QueryBuilder::new().with_query_logging(),
        })
    }

    pub fn connection(&self) -> &KuzuConnection<'a> {
        &self.connection
    }
}

impl GraphStore for KuzuGraphStore<'_> {
    fn execute_batch(&mut self, batch: &WriteBatch) -> Result<(), DatabaseError> {
        debug!("Executing batch '{}' with {} operations", batch.name, batch.len());

        let query_builder = &self.query_builder;
        self.connection
            .transaction(|conn| {
                for op in &batch.ops {
                    for statement in query_builder.write_statements(op) {
                        conn.execute_with_params(&statement.query, &statement.params)?;
                    }
                }
                Ok(())
            })
            .map_err(|e| {
                error!("Batch '{}' failed: {}", batch.name, e);
                DatabaseError::WriteFailed {
                    batch: batch.name.clone(),
                    message: e.to_string(),
                }
            })
    }
}
