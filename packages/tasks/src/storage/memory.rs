// ABOUTME: In-memory task store keyed by title
// ABOUTME: Access is serialized through a tokio RwLock, queries run in creation order

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{StorageError, StorageResult, TaskStore};
use crate::query::{self, TaskQuery};
use crate::types::Task;

#[derive(Debug)]
struct StoredTask {
    // Monotonic insertion sequence; this is the canonical creation order
    // and survives updates, mirroring the surrogate id in the SQLite backend.
    seq: u64,
    task: Task,
}

#[derive(Debug, Default)]
struct Inner {
    tasks: HashMap<String, StoredTask>,
    next_seq: u64,
}

/// Process-local task store with no persistence.
///
/// Lookup, update, and delete are O(1) by title. Listing materializes the
/// records in creation order and delegates to the shared query pipeline.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    inner: RwLock<Inner>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn create_task(&self, task: Task) -> StorageResult<Task> {
        let mut inner = self.inner.write().await;

        if inner.tasks.contains_key(&task.title) {
            return Err(StorageError::DuplicateTitle(task.title));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;

        debug!("Storing task '{}' at sequence {}", task.title, seq);
        inner.tasks.insert(
            task.title.clone(),
            StoredTask {
                seq,
                task: task.clone(),
            },
        );

        Ok(task)
    }

    async fn get_task_by_title(&self, title: &str) -> StorageResult<Option<Task>> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.get(title).map(|stored| stored.task.clone()))
    }

    async fn query_tasks(&self, query: &TaskQuery) -> StorageResult<(Vec<Task>, usize)> {
        let inner = self.inner.read().await;

        let mut stored: Vec<&StoredTask> = inner.tasks.values().collect();
        stored.sort_by_key(|entry| entry.seq);
        let tasks: Vec<Task> = stored.into_iter().map(|entry| entry.task.clone()).collect();

        Ok(query::execute(tasks, query))
    }

    async fn update_task(&self, title: &str, task: Task) -> StorageResult<Option<Task>> {
        let mut inner = self.inner.write().await;

        match inner.tasks.get_mut(title) {
            Some(stored) => {
                // Title and sequence stay as they were on creation
                stored.task.description = task.description;
                stored.task.status = task.status;
                stored.task.priority = task.priority;
                debug!("Updated task '{}'", title);
                Ok(Some(stored.task.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_task(&self, title: &str) -> StorageResult<bool> {
        let mut inner = self.inner.write().await;
        let removed = inner.tasks.remove(title).is_some();
        if removed {
            debug!("Deleted task '{}'", title);
        }
        Ok(removed)
    }
}
