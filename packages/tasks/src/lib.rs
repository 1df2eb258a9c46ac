// ABOUTME: Task tracking core: domain types, query engine, and storage backends
// ABOUTME: Exposes the task service consumed by the HTTP API layer

pub mod query;
pub mod service;
pub mod storage;
pub mod types;
pub mod validate;

// Re-export main types
pub use query::{SearchPattern, SortField, SortOrder, TaskQuery};
pub use service::{ServiceError, ServiceResult, TaskPage, TaskService};
pub use storage::factory::{StoreConfig, StoreFactory, StoreProvider};
pub use storage::memory::MemoryTaskStore;
pub use storage::sqlite::SqliteTaskStore;
pub use storage::{StorageError, StorageResult, TaskStore};
pub use types::{Task, TaskPriority, TaskStatus};
pub use validate::ValidationError;
