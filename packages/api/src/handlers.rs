// ABOUTME: HTTP request handlers for task operations
// ABOUTME: Parses wire parameters into typed queries before touching the service

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;
use taskdeck_tasks::{
    validate, SearchPattern, ServiceError, SortField, SortOrder, Task, TaskPriority, TaskQuery,
    TaskStatus, ValidationError,
};

/// Default page size when the caller does not pass a limit
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size to prevent performance issues
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters accepted by the listing endpoint, still in wire form
#[derive(Debug, Deserialize)]
pub struct ListTasksParams {
    pub status: Option<String>,
    pub priority: Option<u8>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Converts wire parameters into a typed query, collecting every failure
fn build_query(params: ListTasksParams) -> Result<TaskQuery, ApiError> {
    let mut errors = Vec::new();
    let mut query = TaskQuery::default();

    if let Some(raw) = params.status {
        match raw.parse::<TaskStatus>() {
            Ok(status) => query.status = Some(status),
            Err(e) => errors.push(ValidationError::new("status", e.to_string())),
        }
    }

    if let Some(raw) = params.priority {
        match TaskPriority::try_from(raw) {
            Ok(priority) => query.priority = Some(priority),
            Err(e) => errors.push(ValidationError::new("priority", e.to_string())),
        }
    }

    if let Some(raw) = params.search {
        if raw.is_empty() {
            errors.push(ValidationError::new(
                "search",
                "Search pattern cannot be empty",
            ));
        } else {
            match SearchPattern::new(&raw) {
                Ok(pattern) => query.search = Some(pattern),
                Err(e) => errors.push(ValidationError::new(
                    "search",
                    format!("Invalid search pattern: {}", e),
                )),
            }
        }
    }

    if let Some(raw) = params.sort_by {
        match raw.parse::<SortField>() {
            Ok(field) => query.sort_by = Some(field),
            Err(e) => errors.push(ValidationError::new("sort_by", e.to_string())),
        }
    }

    if let Some(raw) = params.sort_order {
        match raw.parse::<SortOrder>() {
            Ok(order) => query.sort_order = order,
            Err(e) => errors.push(ValidationError::new("sort_order", e.to_string())),
        }
    }

    match params.skip {
        Some(skip) if skip < 0 => {
            errors.push(ValidationError::new("skip", "skip must be zero or greater"))
        }
        Some(skip) => query.skip = skip as usize,
        None => {}
    }

    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        errors.push(ValidationError::new(
            "limit",
            format!("limit must be between 1 and {}", MAX_PAGE_SIZE),
        ));
    } else {
        query.limit = Some(limit as usize);
    }

    if errors.is_empty() {
        Ok(query)
    } else {
        Err(ApiError(ServiceError::Validation(errors)))
    }
}

/// Request body for creating or updating a task, still in wire form
#[derive(Debug, Deserialize)]
pub struct TaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<u8>,
}

/// Converts a wire payload into a task, applying defaults and collecting
/// every failure. Field lengths are checked later by the service.
fn build_task(payload: TaskPayload) -> Result<Task, ApiError> {
    let mut errors = Vec::new();

    let title = match payload.title {
        Some(title) => title,
        None => {
            errors.push(ValidationError::new("title", "title is required"));
            String::new()
        }
    };

    let description = match payload.description {
        Some(description) => description,
        None => {
            errors.push(ValidationError::new(
                "description",
                "description is required",
            ));
            String::new()
        }
    };

    let status = match payload.status {
        None => TaskStatus::default(),
        Some(raw) => match raw.parse::<TaskStatus>() {
            Ok(status) => status,
            Err(e) => {
                errors.push(ValidationError::new("status", e.to_string()));
                TaskStatus::default()
            }
        },
    };

    let priority = match payload.priority {
        None => TaskPriority::default(),
        Some(raw) => match TaskPriority::try_from(raw) {
            Ok(priority) => priority,
            Err(e) => {
                errors.push(ValidationError::new("priority", e.to_string()));
                TaskPriority::default()
            }
        },
    };

    if !errors.is_empty() {
        return Err(ApiError(ServiceError::Validation(errors)));
    }

    Ok(Task {
        title,
        description,
        status,
        priority,
    })
}

/// Rejects path titles longer than a valid title can ever be
fn check_title_param(title: &str) -> Result<(), ApiError> {
    let errors = validate::validate_title(title);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError(ServiceError::Validation(errors)))
    }
}

/// List tasks with filtering, sorting, and pagination
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<ListTasksParams>,
) -> impl IntoResponse {
    let query = match build_query(params) {
        Ok(query) => query,
        Err(e) => return e.into_response(),
    };

    match state.service.list_tasks(query).await {
        Ok(page) => {
            info!("Listed {} of {} tasks", page.items.len(), page.total);
            (StatusCode::OK, ResponseJson(ApiResponse::success(page))).into_response()
        }
        Err(e) => {
            error!("Failed to list tasks: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// Get a single task by title
pub async fn get_task(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = check_title_param(&title) {
        return e.into_response();
    }

    match state.service.get_task(&title).await {
        Ok(task) => (StatusCode::OK, ResponseJson(ApiResponse::success(task))).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Create a new task
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskPayload>,
) -> impl IntoResponse {
    let task = match build_task(payload) {
        Ok(task) => task,
        Err(e) => return e.into_response(),
    };

    info!("Creating task '{}'", task.title);

    match state.service.create_task(task).await {
        Ok(task) => (
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(task)),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create task: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// Update an existing task in place
pub async fn update_task(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Json(payload): Json<TaskPayload>,
) -> impl IntoResponse {
    if let Err(e) = check_title_param(&title) {
        return e.into_response();
    }

    let task = match build_task(payload) {
        Ok(task) => task,
        Err(e) => return e.into_response(),
    };

    info!("Updating task '{}'", title);

    match state.service.update_task(&title, task).await {
        Ok(task) => (StatusCode::OK, ResponseJson(ApiResponse::success(task))).into_response(),
        Err(e) => {
            error!("Failed to update task '{}': {}", title, e);
            ApiError(e).into_response()
        }
    }
}

/// Delete a task by title
pub async fn delete_task(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = check_title_param(&title) {
        return e.into_response();
    }

    info!("Deleting task '{}'", title);

    match state.service.delete_task(&title).await {
        Ok(()) => (
            StatusCode::OK,
            ResponseJson(ApiResponse::success("Task successfully deleted")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to delete task '{}': {}", title, e);
            ApiError(e).into_response()
        }
    }
}
