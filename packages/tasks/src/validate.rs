// ABOUTME: Field-level validation for task input
// ABOUTME: Collects every failure into a structured error list

use serde::Serialize;

use crate::types::Task;

/// Character limits for task fields
pub const TITLE_MIN_CHARS: usize = 1;
pub const TITLE_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MIN_CHARS: usize = 1;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// A single failed field check
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validates a task title
pub fn validate_title(title: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let chars = title.chars().count();

    if chars < TITLE_MIN_CHARS {
        errors.push(ValidationError::new("title", "Title cannot be empty"));
    } else if chars > TITLE_MAX_CHARS {
        errors.push(ValidationError::new(
            "title",
            format!(
                "Title exceeds maximum length of {} characters (got {} characters)",
                TITLE_MAX_CHARS, chars
            ),
        ));
    }

    errors
}

/// Validates a task description
pub fn validate_description(description: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let chars = description.chars().count();

    if chars < DESCRIPTION_MIN_CHARS {
        errors.push(ValidationError::new(
            "description",
            "Description cannot be empty",
        ));
    } else if chars > DESCRIPTION_MAX_CHARS {
        errors.push(ValidationError::new(
            "description",
            format!(
                "Description exceeds maximum length of {} characters (got {} characters)",
                DESCRIPTION_MAX_CHARS, chars
            ),
        ));
    }

    errors
}

/// Validates a full task before it reaches storage.
/// Status and priority are closed enums, so only the text fields can fail.
pub fn validate_task(task: &Task) -> Vec<ValidationError> {
    let mut errors = validate_title(&task.title);
    errors.extend(validate_description(&task.description));
    errors
}
