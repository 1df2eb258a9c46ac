use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::query::TaskQuery;
use crate::storage::{StorageError, TaskStore};
use crate::types::Task;
use crate::validate::{validate_task, ValidationError};

/// Service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation errors: {0:?}")]
    Validation(Vec<ValidationError>),
    #[error("Task does not exist")]
    NotFound,
    #[error("Task with title '{0}' already exists")]
    Duplicate(String),
    #[error("Cannot change the title of a task")]
    TitleMismatch,
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// Machine-readable code surfaced alongside the human-readable detail
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::NotFound => "TASK_NOT_FOUND",
            ServiceError::Duplicate(_) => "DUPLICATE_TASK",
            ServiceError::TitleMismatch => "TITLE_MISMATCH",
            ServiceError::Storage(_) => "INTERNAL_ERROR",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// One page of a filtered task listing
#[derive(Debug, Clone, Serialize)]
pub struct TaskPage {
    pub items: Vec<Task>,
    pub total: usize,
    pub skip: usize,
    pub limit: Option<usize>,
    pub has_more: bool,
}

impl TaskPage {
    pub fn new(items: Vec<Task>, total: usize, skip: usize, limit: Option<usize>) -> Self {
        let has_more = limit.is_some() && skip + items.len() < total;
        Self {
            items,
            total,
            skip,
            limit,
            has_more,
        }
    }
}

/// Coordinates task operations on top of a storage backend.
///
/// The store is injected and owned; its lifetime is scoped to the process in
/// the server binary and to the fixture in tests.
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Creates a new task, rejecting duplicates by title
    pub async fn create_task(&self, task: Task) -> ServiceResult<Task> {
        let errors = validate_task(&task);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        if self.store.get_task_by_title(&task.title).await?.is_some() {
            return Err(ServiceError::Duplicate(task.title));
        }

        // The backend enforces uniqueness too; a race between the check
        // above and the insert still surfaces as a duplicate.
        let created = match self.store.create_task(task).await {
            Err(StorageError::DuplicateTitle(title)) => {
                return Err(ServiceError::Duplicate(title))
            }
            other => other?,
        };

        info!("Created task '{}'", created.title);
        Ok(created)
    }

    /// Gets a task by its title
    pub async fn get_task(&self, title: &str) -> ServiceResult<Task> {
        self.store
            .get_task_by_title(title)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Runs a filtered/sorted/paginated listing
    pub async fn list_tasks(&self, query: TaskQuery) -> ServiceResult<TaskPage> {
        let skip = query.skip;
        let limit = query.limit;

        let (items, total) = self.store.query_tasks(&query).await?;
        debug!("Query returned {} of {} matching tasks", items.len(), total);

        Ok(TaskPage::new(items, total, skip, limit))
    }

    /// Updates the task addressed by `title` in place.
    ///
    /// The payload title must equal the addressed title; a mismatch is
    /// rejected before storage is consulted, whether or not the task exists.
    pub async fn update_task(&self, title: &str, task: Task) -> ServiceResult<Task> {
        if task.title != title {
            return Err(ServiceError::TitleMismatch);
        }

        let errors = validate_task(&task);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let updated = self
            .store
            .update_task(title, task)
            .await?
            .ok_or(ServiceError::NotFound)?;

        info!("Updated task '{}'", updated.title);
        Ok(updated)
    }

    /// Deletes the task addressed by `title`
    pub async fn delete_task(&self, title: &str) -> ServiceResult<()> {
        if !self.store.delete_task(title).await? {
            return Err(ServiceError::NotFound);
        }

        info!("Deleted task '{}'", title);
        Ok(())
    }
}
