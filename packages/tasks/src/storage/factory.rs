use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::memory::MemoryTaskStore;
use super::sqlite::SqliteTaskStore;
use super::{StorageError, StorageResult, TaskStore};

#[derive(Debug, Clone)]
pub enum StoreProvider {
    Memory,
    Sqlite { path: PathBuf },
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub provider: StoreProvider,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: StoreProvider::Sqlite {
                path: PathBuf::from("tasks.db"),
            },
            max_connections: 10,
        }
    }
}

/// Factory for creating task store instances
pub struct StoreFactory;

impl StoreFactory {
    /// Create an initialized store from configuration
    pub async fn create_store(config: StoreConfig) -> StorageResult<Arc<dyn TaskStore>> {
        debug!("Creating task store with provider: {:?}", config.provider);

        let store: Arc<dyn TaskStore> = match &config.provider {
            StoreProvider::Memory => {
                info!("Initializing in-memory task store");
                Arc::new(MemoryTaskStore::new())
            }
            StoreProvider::Sqlite { path } => {
                info!("Initializing SQLite task store at: {:?}", path);
                Arc::new(SqliteTaskStore::connect(path, config.max_connections).await?)
            }
        };

        store.initialize().await?;
        Ok(store)
    }

    /// Create a store from a database URL: `memory` or `sqlite:<path>`
    pub async fn from_url(url: &str) -> StorageResult<Arc<dyn TaskStore>> {
        if url == "memory" {
            Self::create_store(StoreConfig {
                provider: StoreProvider::Memory,
                ..StoreConfig::default()
            })
            .await
        } else if let Some(path) = url.strip_prefix("sqlite:") {
            Self::create_store(StoreConfig {
                provider: StoreProvider::Sqlite {
                    path: PathBuf::from(path),
                },
                ..StoreConfig::default()
            })
            .await
        } else {
            Err(StorageError::Database(format!(
                "Unsupported database URL: {}",
                url
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TaskQuery;
    use tempfile::tempdir;

    #[tokio::test]
    async fn creates_sqlite_store_from_url() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let url = format!("sqlite:{}", db_path.display());

        let store = StoreFactory::from_url(&url).await.unwrap();
        let (tasks, total) = store.query_tasks(&TaskQuery::default()).await.unwrap();
        assert!(tasks.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn creates_memory_store_from_url() {
        let store = StoreFactory::from_url("memory").await.unwrap();
        let (tasks, total) = store.query_tasks(&TaskQuery::default()).await.unwrap();
        assert!(tasks.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn rejects_unknown_urls() {
        assert!(StoreFactory::from_url("postgres://nope").await.is_err());
    }
}
