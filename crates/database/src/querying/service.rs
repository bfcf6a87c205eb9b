use crate::{
    kuzu::{config::DatabaseConfig, connection::KuzuConnection, database::KuzuDatabase},
    querying::library::QueryLibrary,
    querying::types::{QueryRows, QueryingService},
};
use anyhow::{Error, Result, anyhow};
use serde_json::Map;
use std::path::Path;
use std::sync::Arc;

/// Runs uncontrolled queries for developer tooling. Databases are opened
/// read-only.
pub struct DatabaseQueryingService {
    database: Arc<KuzuDatabase>,
}

impl DatabaseQueryingService {
    pub fn new(database: Arc<KuzuDatabase>) -> Self {
        Self { database }
    }

    /// Neighbours up to two hops away from every method named `method_name`.
    pub fn related_methods(
        &self,
        database_path: &Path,
        method_name: &str,
    ) -> Result<QueryRows, Error> {
        let query = QueryLibrary::get_related_methods_query();
        let mut params = Map::new();
        params.insert(
            "method_name".to_string(),
            serde_json::Value::from(method_name),
        );
        self.execute_query(database_path, query.query, params)
    }
}

impl QueryingService for DatabaseQueryingService {
    fn execute_query(
        &self,
        database_path: &Path,
        query: &str,
        params: Map<String, serde_json::Value>,
    ) -> Result<QueryRows, Error> {
        if !database_path.exists() {
            return Err(anyhow!(
                "Database not found: {}",
                database_path.display()
            ));
        }

        let path = dunce::canonicalize(database_path)?;
        let path = path
            .to_str()
            .ok_or_else(|| anyhow!("Database path is not valid UTF-8: {}", path.display()))?;

        let database = self
            .database
            .get_or_create_database(path, Some(DatabaseConfig::new(path).read_only()))?;
        let connection = KuzuConnection::new(&database)?;
        let result = connection.generic_query(query, params)?;

        Ok(QueryRows {
            column_names: result.column_names,
            rows: result.result,
        })
    }
}
