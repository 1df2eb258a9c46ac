// ABOUTME: Shared application state for API handlers
// ABOUTME: Carries the task service behind an Arc for cheap cloning

use std::sync::Arc;

use taskdeck_tasks::TaskService;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TaskService>,
}

impl AppState {
    pub fn new(service: TaskService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
