use crate::kuzu::{
    database::KuzuQueryResult,
    types::DatabaseError,
};

use kuzu::{Connection, Database};
use serde_json::Map;
use tracing::{debug, warn};

pub struct KuzuConnection<'a> {
    connection: Connection<'a>,
}

impl<'a> KuzuConnection<'a> {
    pub fn new(database: &'a Database) -> Result<Self, DatabaseError> {
        let connection = Connection::new(database).map_err(|e| {
            DatabaseError::InitializationFailed(format!(
                "Failed to create connection to database: {e}"
            ))
        })?;

        Ok(Self { connection })
    }

    /// Runs an arbitrary query and materializes every row.
    pub fn generic_query(
        &self,
        query: &str,
        params: Map<String, serde_json::Value>,
    ) -> Result<KuzuQueryResult, DatabaseError> {
        let kuzu_params = extract_kuzu_params(&params);
        let mut prepared = self.prepare(query)?;

        let result = self
            .connection
            .execute(&mut prepared, kuzu_params)
            .map_err(|e| DatabaseError::QueryExecutionError {
                query: query.to_string(),
                error: e,
            })?;

        Ok(KuzuQueryResult {
            column_names: result.get_column_names().to_vec(),
            result: result.into_iter().collect::<Vec<_>>(),
        })
    }

    pub fn query(&self, query: &str) -> Result<kuzu::QueryResult<'_>, DatabaseError> {
        self.connection
            .query(query)
            .map_err(|e| DatabaseError::QueryExecutionError {
                query: query.to_string(),
                error: e,
            })
    }

    /// Executes a parameterized write statement, discarding any returned rows.
    pub fn execute_with_params(
        &self,
        query: &str,
        params: &Map<String, serde_json::Value>,
    ) -> Result<(), DatabaseError> {
        debug!("Executing statement with {} parameters: {}", params.len(), query);

        let mut prepared = self.prepare(query)?;
        let mut result = self
            .connection
            .execute(&mut prepared, extract_kuzu_params(params))
            .map_err(|e| DatabaseError::QueryExecutionError {
                query: query.to_string(),
                error: e,
            })?;

        while result.next().is_some() {}

        Ok(())
    }

    pub fn execute_ddl(&self, query: &str) -> Result<(), DatabaseError> {
        debug!("Executing DDL: {}", query);
        self.execute_with_params(query, &Map::new())
    }

    fn prepare(&self, query: &str) -> Result<kuzu::PreparedStatement, DatabaseError> {
        self.connection
            .prepare(query)
            .map_err(|e| DatabaseError::QueryExecutionError {
                query: query.to_string(),
                error: e,
            })
    }

    fn start_transaction(&self) -> Result<(), DatabaseError> {
        self.execute_ddl("BEGIN TRANSACTION;")
            .map_err(|e| DatabaseError::TransactionFailed(format!("begin: {e}")))
    }

    fn commit_transaction(&self) -> Result<(), DatabaseError> {
        self.execute_ddl("COMMIT;")
            .map_err(|e| DatabaseError::TransactionFailed(format!("commit: {e}")))
    }

    fn rollback_transaction(&self) -> Result<(), DatabaseError> {
        self.execute_ddl("ROLLBACK;")
            .map_err(|e| DatabaseError::TransactionFailed(format!("rollback: {e}")))
    }

    /// Runs `f` inside an explicit transaction. The transaction is rolled back
    /// when `f` fails and the original error is returned.
    pub fn transaction(
        &mut self,
        f: impl FnOnce(&mut KuzuConnection<'a>) -> Result<(), DatabaseError>,
    ) -> Result<(), DatabaseError> {
        self.start_transaction()?;
        match f(self) {
            Ok(()) => self.commit_transaction(),
            Err(e) => {
                if let Err(rollback_error) = self.rollback_transaction() {
                    warn!("Rollback after failed transaction did not succeed: {rollback_error}");
                }
                Err(e)
            }
        }
    }

    pub fn table_exists(&self, table_name: &str) -> Result<bool, DatabaseError> {
        Ok(self
            .get_table_names()?
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(table_name)))
    }

    pub fn get_table_names(&self) -> Result<Vec<String>, DatabaseError> {
        let result = self
            .connection
            .query("CALL SHOW_TABLES() RETURN *")
            .map_err(DatabaseError::SchemaCheckFailed)?;
        let mut table_names = Vec::new();

        for row in result {
            // Index 1 contains the table name
            if let Some(kuzu::Value::String(table_name)) = row.get(1) {
                table_names.push(table_name.to_string());
            }
        }

        Ok(table_names)
    }

    pub fn count_nodes(&self, label: &str) -> Result<usize, DatabaseError> {
        self.count(&format!("MATCH (n:{label}) RETURN count(n)"))
    }

    pub fn count_relationships(&self, kind: &str) -> Result<usize, DatabaseError> {
        self.count(&format!("MATCH ()-[r:{kind}]->() RETURN count(r)"))
    }

    fn count(&self, query: &str) -> Result<usize, DatabaseError> {
        let mut result = self.query(query)?;
        match result.next().as_deref() {
            Some([kuzu::Value::Int64(count), ..]) => Ok(*count as usize),
            _ => Ok(0),
        }
    }
}

fn extract_kuzu_params(
    json_params: &serde_json::Map<String, serde_json::Value>,
) -> Vec<(&str, kuzu::Value)> {
    json_params
        .iter()
        .map(|(key, value)| (key.as_str(), convert_json_to_kuzu_value(value)))
        .collect()
}

fn convert_json_to_kuzu_value(value: &serde_json::Value) -> kuzu::Value {
    match value {
        serde_json::Value::String(s) => kuzu::Value::from(s.as_str()),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                kuzu::Value::from(i)
            } else if let Some(f) = n.as_f64() {
                kuzu::Value::from(f)
            } else {
                kuzu::Value::from(0i64)
            }
        }
        serde_json::Value::Bool(b) => kuzu::Value::Bool(*b),
        serde_json::Value::Null => kuzu::Value::Null(kuzu::LogicalType::Any),
        serde_json::Value::Array(arr) => {
            let values = arr.iter().map(convert_json_to_kuzu_value).collect();

            let logical_type = match arr.first() {
                Some(serde_json::Value::String(_)) => kuzu::LogicalType::String,
                Some(serde_json::Value::Number(n)) if n.is_i64() => kuzu::LogicalType::Int64,
                Some(serde_json::Value::Number(_)) => kuzu::LogicalType::Double,
                Some(serde_json::Value::Bool(_)) => kuzu::LogicalType::Bool,
                _ => kuzu::LogicalType::Any,
            };

            kuzu::Value::List(logical_type, values)
        }
        serde_json::Value::Object(obj) => kuzu::Value::Struct(
            obj.iter()
                .map(|(key, val)| (key.to_string(), convert_json_to_kuzu_value(val)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use crate::kuzu::{connection::KuzuConnection, database::KuzuDatabase};
    use crate::kuzu::types::DatabaseError;

    fn class_table(connection: &KuzuConnection) {
        connection
            .execute_ddl(
                "CREATE NODE TABLE Class (fullName STRING, name STRING, PRIMARY KEY (fullName))",
            )
            .unwrap();
    }

    #[test]
    fn test_generic_query_with_params() {
        let temp_dir = tempfile::tempdir().unwrap();
        let binding = temp_dir.path().join("test.kz");
        let database = KuzuDatabase::new()
            .force_new_database(binding.to_str().unwrap(), None)
            .unwrap();
        let connection = KuzuConnection::new(&database).unwrap();
        class_table(&connection);

        for (full_name, name) in [("p.A", "A"), ("q.A", "A"), ("p.B", "B")] {
            connection
                .execute_with_params(
                    "CREATE (c:Class {fullName: $full, name: $name})",
                    serde_json::json!({ "full": full_name, "name": name })
                        .as_object()
                        .unwrap(),
                )
                .unwrap();
        }

        let result = connection
            .generic_query(
                "MATCH (c:Class) WHERE c.name = $name RETURN c.fullName ORDER BY c.fullName",
                serde_json::json!({ "name": "A" })
                    .as_object()
                    .unwrap()
                    .clone(),
            )
            .unwrap();

        assert_eq!(result.column_names[0], "c.fullName");
        assert_eq!(result.result.len(), 2);
        assert_eq!(result.result[0][0].to_string(), "p.A");
        assert_eq!(result.result[1][0].to_string(), "q.A");
    }

    #[test]
    fn test_generic_query_with_list_params() {
        let temp_dir = tempfile::tempdir().unwrap();
        let binding = temp_dir.path().join("test.kz");
        let database = KuzuDatabase::new()
            .force_new_database(binding.to_str().unwrap(), None)
            .unwrap();
        let connection = KuzuConnection::new(&database).unwrap();
        class_table(&connection);
        connection
            .execute_ddl("CREATE (c:Class {fullName: 'p.A', name: 'A'});")
            .unwrap();
        connection
            .execute_ddl("CREATE (c:Class {fullName: 'p.B', name: 'B'});")
            .unwrap();

        let result = connection
            .generic_query(
                "MATCH (c:Class) WHERE c.fullName IN $names RETURN c.name",
                serde_json::json!({ "names": ["p.B", "p.Z"] })
                    .as_object()
                    .unwrap()
                    .clone(),
            )
            .unwrap();

        assert_eq!(result.result.len(), 1);
        assert_eq!(result.result[0][0].to_string(), "B");
    }

    #[test]
    fn test_invalid_query_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let binding = temp_dir.path().join("test.kz");
        let database = KuzuDatabase::new()
            .force_new_database(binding.to_str().unwrap(), None)
            .unwrap();
        let connection = KuzuConnection::new(&database).unwrap();

        let result = connection.generic_query("MATCH (c:Missing) RETURN c", serde_json::Map::new());

        assert!(matches!(
            result,
            Err(DatabaseError::QueryExecutionError { .. })
        ));
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        let binding = temp_dir.path().join("test.kz");
        let database = KuzuDatabase::new()
            .force_new_database(binding.to_str().unwrap(), None)
            .unwrap();
        let mut connection = KuzuConnection::new(&database).unwrap();
        class_table(&connection);

        let result = connection.transaction(|conn| {
            conn.execute_ddl("CREATE (c:Class {fullName: 'p.A', name: 'A'});")?;
            conn.execute_ddl("CREATE (c:Unknown {id: 1});")
        });

        assert!(result.is_err());
        assert_eq!(connection.count_nodes("Class").unwrap(), 0);
    }

    #[test]
    fn test_committed_transaction_is_visible() {
        let temp_dir = tempfile::tempdir().unwrap();
        let binding = temp_dir.path().join("test.kz");
        let database = KuzuDatabase::new()
            .force_new_database(binding.to_str().unwrap(), None)
            .unwrap();
        let mut connection = KuzuConnection::new(&database).unwrap();
        class_table(&connection);

        connection
            .transaction(|conn| conn.execute_ddl("CREATE (c:Class {fullName: 'p.A', name: 'A'});"))
            .unwrap();

        assert_eq!(connection.count_nodes("Class").unwrap(), 1);
        assert!(connection.table_exists("class").unwrap());
    }
}
