// ABOUTME: Task type definitions
// ABOUTME: Closed status/priority enumerations and their wire conversions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle state of a task. Stored and serialized as its kebab-case string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Unknown task status '{0}' (expected pending, in-progress, or completed)")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(ParseTaskStatusError(other.to_string())),
        }
    }
}

/// Priority level. Stored and serialized as its integer value (1-5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskPriority {
    VeryLow = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    VeryHigh = 5,
}

impl TaskPriority {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::VeryLow
    }
}

impl From<TaskPriority> for u8 {
    fn from(priority: TaskPriority) -> Self {
        priority as u8
    }
}

#[derive(Error, Debug)]
#[error("Priority must be between 1 and 5, got {0}")]
pub struct ParseTaskPriorityError(u8);

impl TryFrom<u8> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TaskPriority::VeryLow),
            2 => Ok(TaskPriority::Low),
            3 => Ok(TaskPriority::Medium),
            4 => Ok(TaskPriority::High),
            5 => Ok(TaskPriority::VeryHigh),
            other => Err(ParseTaskPriorityError(other)),
        }
    }
}

/// The task record as it is created, stored, and returned to callers.
///
/// The title doubles as the domain key. The SQLite backend keeps a surrogate
/// id and timestamps alongside these fields, but they never leave storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_wire_strings() {
        assert_eq!("pending".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
        assert_eq!(
            "in-progress".parse::<TaskStatus>().unwrap(),
            TaskStatus::InProgress
        );
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn priority_rejects_out_of_range_values() {
        assert!(TaskPriority::try_from(0).is_err());
        assert!(TaskPriority::try_from(6).is_err());
        assert_eq!(TaskPriority::try_from(3).unwrap(), TaskPriority::Medium);
    }

    #[test]
    fn task_deserializes_with_defaults() {
        let task: Task =
            serde_json::from_str(r#"{"title": "Gym", "description": "Leg day"}"#).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::VeryLow);
    }

    #[test]
    fn priority_serializes_as_integer() {
        let task = Task {
            title: "Gym".to_string(),
            description: "Leg day".to_string(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["priority"], 4);
        assert_eq!(json["status"], "in-progress");
    }
}
