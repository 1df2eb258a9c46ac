// ABOUTME: Filtering, sorting, and pagination over task collections
// ABOUTME: Shared by both storage backends so they produce identical pages

use regex::{Regex, RegexBuilder};
use std::str::FromStr;
use thiserror::Error;

use crate::types::{Task, TaskPriority, TaskStatus};

/// A compiled, case-insensitive search pattern.
///
/// Compiling happens at the wire edge, so invalid patterns are rejected as
/// validation failures and the engine itself never fails.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    regex: Regex,
}

impl SearchPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    /// A task matches when the pattern occurs in its title or description.
    pub fn matches(&self, task: &Task) -> bool {
        self.regex.is_match(&task.title) || self.regex.is_match(&task.description)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Fields a task listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Priority,
    Status,
}

impl SortField {
    /// Column name used when the sort is pushed down to SQL
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Priority => "priority",
            SortField::Status => "status",
        }
    }
}

#[derive(Error, Debug)]
#[error("Unknown sort field '{0}' (expected title, priority, or status)")]
pub struct ParseSortFieldError(String);

impl FromStr for SortField {
    type Err = ParseSortFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortField::Title),
            "priority" => Ok(SortField::Priority),
            "status" => Ok(SortField::Status),
            other => Err(ParseSortFieldError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn is_descending(&self) -> bool {
        matches!(self, SortOrder::Desc)
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

#[derive(Error, Debug)]
#[error("Unknown sort order '{0}' (expected asc or desc)")]
pub struct ParseSortOrderError(String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ParseSortOrderError(other.to_string())),
        }
    }
}

/// Filter, sort, and pagination parameters for a task listing
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub search: Option<SearchPattern>,
    pub sort_by: Option<SortField>,
    pub sort_order: SortOrder,
    pub skip: usize,
    pub limit: Option<usize>,
}

/// Runs a query over tasks in creation order.
///
/// Returns the requested page and the total number of matches before
/// pagination. Processing order is fixed: status filter, priority filter,
/// search, count, sort, paginate. The sort is stable and descending order
/// only inverts the key comparison, so ties keep creation order either way.
pub fn execute(tasks: Vec<Task>, query: &TaskQuery) -> (Vec<Task>, usize) {
    let mut matched: Vec<Task> = tasks
        .into_iter()
        .filter(|task| query.status.map_or(true, |status| task.status == status))
        .filter(|task| {
            query
                .priority
                .map_or(true, |priority| task.priority == priority)
        })
        .filter(|task| {
            query
                .search
                .as_ref()
                .map_or(true, |pattern| pattern.matches(task))
        })
        .collect();

    let total = matched.len();

    if let Some(field) = query.sort_by {
        let descending = query.sort_order.is_descending();
        matched.sort_by(|a, b| {
            let ordering = match field {
                SortField::Title => a.title.cmp(&b.title),
                SortField::Priority => a.priority.cmp(&b.priority),
                // Status sorts by its stored string, matching ORDER BY on
                // the text column in the relational backend
                SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            };
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    let page: Vec<Task> = match query.limit {
        Some(limit) => matched.into_iter().skip(query.skip).take(limit).collect(),
        None => matched.into_iter().skip(query.skip).collect(),
    };

    (page, total)
}
