// ABOUTME: HTTP API layer and routing for Taskdeck
// ABOUTME: Wires axum handlers to the task service through shared state

use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub mod handlers;
pub mod response;
pub mod state;

pub use response::{ApiResponse, ErrorBody};
pub use state::AppState;

/// Creates the tasks API router
pub fn create_tasks_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_tasks))
        .route("/", post(handlers::create_task))
        .route("/{title}", get(handlers::get_task))
        .route("/{title}", put(handlers::update_task))
        .route("/{title}", delete(handlers::delete_task))
}
