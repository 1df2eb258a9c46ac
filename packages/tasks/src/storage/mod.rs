use async_trait::async_trait;
use thiserror::Error;

use crate::query::TaskQuery;
use crate::types::Task;

// Re-export modules
pub mod factory;
pub mod memory;
pub mod sqlite;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Duplicate task title: {0}")]
    DuplicateTitle(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Contract every task backend satisfies.
///
/// Both implementations must produce identical observable results for
/// identical inputs; the behavioral suite in tests/store_contract.rs runs
/// against each of them to hold that line.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Prepares the backend for use (schema creation for SQLite)
    async fn initialize(&self) -> StorageResult<()>;

    /// Inserts a new task. Fails with [`StorageError::DuplicateTitle`] when
    /// the title is already taken.
    async fn create_task(&self, task: Task) -> StorageResult<Task>;

    /// Looks up a task by its exact title
    async fn get_task_by_title(&self, title: &str) -> StorageResult<Option<Task>>;

    /// Runs a filtered/sorted/paginated listing, returning the page and the
    /// total number of matches before pagination
    async fn query_tasks(&self, query: &TaskQuery) -> StorageResult<(Vec<Task>, usize)>;

    /// Overwrites description, status, and priority of the task with the
    /// given title. The title and the record's identity never change.
    /// Returns `None` when no such task exists.
    async fn update_task(&self, title: &str, task: Task) -> StorageResult<Option<Task>>;

    /// Deletes a task by title. Returns whether a record was removed.
    async fn delete_task(&self, title: &str) -> StorageResult<bool>;
}
