use kuzu::SystemConfig;

pub const DEFAULT_DATABASE_PATH: &str = "graph.kz";
pub const DEFAULT_BUFFER_POOL_SIZE: usize = 512 * 1024 * 1024;

/// Options for opening the embedded graph database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_path: String,
    /// Buffer pool size in bytes
    pub buffer_pool_size: Option<usize>,
    pub read_only: Option<bool>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            buffer_pool_size: Some(DEFAULT_BUFFER_POOL_SIZE),
            read_only: Some(false),
        }
    }
}

impl DatabaseConfig {
    pub fn new<P: AsRef<str>>(database_path: P) -> Self {
        Self {
            database_path: database_path.as_ref().to_string(),
            ..Default::default()
        }
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_pool_size = Some(size);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = Some(true);
        self
    }

    pub fn fmt_kuzu_database_config(&self) -> SystemConfig {
        let mut system_config = SystemConfig::default();

        if let Some(buffer_size) = self.buffer_pool_size {
            system_config = system_config.buffer_pool_size(buffer_size as u64);
        }

        if let Some(read_only) = self.read_only {
            system_config = system_config.read_only(read_only);
        }
        system_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = DatabaseConfig::new("/tmp/project.kz")
            .with_buffer_size(64 * 1024 * 1024)
            .read_only();

        assert_eq!(config.database_path, "/tmp/project.kz");
        assert_eq!(config.buffer_pool_size, Some(64 * 1024 * 1024));
        assert_eq!(config.read_only, Some(true));
    }

    #[test]
    fn test_default_path() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
        assert_eq!(config.buffer_pool_size, Some(DEFAULT_BUFFER_POOL_SIZE));
    }
}
