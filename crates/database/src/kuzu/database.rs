use crate::kuzu::config::DatabaseConfig;
use crate::kuzu::types::DatabaseError;
use kuzu::{Database, SystemConfig};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub struct KuzuQueryResult {
    pub column_names: Vec<String>,
    pub result: Vec<Vec<kuzu::Value>>,
}

/// Registry of open databases keyed by path.
///
/// Kuzu allows a single `Database` handle per path within a process, so every
/// component that needs a connection goes through this registry.
pub struct KuzuDatabase {
    databases: Mutex<HashMap<String, Arc<Database>>>,
}

impl Default for KuzuDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl KuzuDatabase {
    pub fn new() -> Self {
        Self {
            databases: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_database_keys(&self) -> Vec<String> {
        let databases_guard = self.databases.lock().unwrap();
        databases_guard.keys().cloned().collect()
    }

    pub fn get_or_create_database(
        &self,
        database_path: &str,
        config: Option<DatabaseConfig>,
    ) -> Result<Arc<Database>, DatabaseError> {
        let mut databases_guard = self.databases.lock().unwrap();

        if let Some(database) = databases_guard.get(database_path) {
            info!("Reusing open database at: {database_path}");
            return Ok(database.clone());
        }

        let system_config = config
            .map(|config| config.fmt_kuzu_database_config())
            .unwrap_or_else(SystemConfig::default);

        let database = Database::new(database_path, system_config).map_err(|e| {
            DatabaseError::InitializationFailed(format!(
                "failed to open database at {database_path}: {e}"
            ))
        })?;
        info!("KuzuDatabase::get_or_create_database - Database opened at: {database_path}");

        let database_arc = Arc::new(database);
        databases_guard.insert(database_path.to_string(), database_arc.clone());
        Ok(database_arc)
    }

    /// Drops any cached handle and removes the database from disk before
    /// opening a fresh one.
    pub fn force_new_database(
        &self,
        database_path: &str,
        config: Option<DatabaseConfig>,
    ) -> Result<Arc<Database>, DatabaseError> {
        info!("KuzuDatabase::force_new_database - Resetting database at: {database_path}");
        {
            let mut databases_guard = self.databases.lock().unwrap();
            databases_guard.remove(database_path);
        }

        let path = Path::new(database_path);
        if path.is_dir() {
            std::fs::remove_dir_all(path)?;
        } else if path.exists() {
            std::fs::remove_file(path)?;
        }

        let wal = format!("{database_path}.wal");
        if Path::new(&wal).exists()
            && let Err(e) = std::fs::remove_file(&wal)
        {
            warn!("Failed to remove write-ahead log {wal}: {e}");
        }

        self.get_or_create_database(database_path, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_reuses_handles() {
        let temp_dir = tempfile::tempdir().unwrap();
        let binding = temp_dir.path().join("registry.kz");
        let database_path = binding.to_str().unwrap();

        let registry = KuzuDatabase::new();
        let first = registry.get_or_create_database(database_path, None).unwrap();
        let second = registry.get_or_create_database(database_path, None).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.get_database_keys(), vec![database_path.to_string()]);
    }
}
