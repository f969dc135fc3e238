//! Status/search filtering and table sorting.
//!
//! `visible_tasks` is the single predicate behind both the `list` command and
//! the interactive viewer: stable, order-preserving, both conditions ANDed.

use crate::error::{Error, Result};
use crate::task::Task;

/// Completion-status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(Error::InvalidArgument(format!(
                "unknown status filter '{other}' (expected all, active, completed)"
            ))),
        }
    }

    /// Next filter in the viewer's cycle order.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of tasks to display: status filter AND case-insensitive
/// substring match against the title. Input order is preserved.
pub fn visible_tasks<'a>(tasks: &'a [Task], status: StatusFilter, query: &str) -> Vec<&'a Task> {
    let needle = query.trim().to_lowercase();
    tasks
        .iter()
        .filter(|task| status.matches(task))
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .collect()
}

/// Sort order applied on top of the filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Insertion order (newest first); the default, no reordering.
    #[default]
    Created,
    Deadline,
    Priority,
    Title,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::Deadline => "deadline",
            SortKey::Priority => "priority",
            SortKey::Title => "title",
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "created" => Ok(SortKey::Created),
            "deadline" => Ok(SortKey::Deadline),
            "priority" => Ok(SortKey::Priority),
            "title" => Ok(SortKey::Title),
            other => Err(Error::InvalidArgument(format!(
                "unknown sort key '{other}' (expected created, deadline, priority, title)"
            ))),
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortKey::Created => SortKey::Deadline,
            SortKey::Deadline => SortKey::Priority,
            SortKey::Priority => SortKey::Title,
            SortKey::Title => SortKey::Created,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable sort of an already-filtered view. `Created` leaves the insertion
/// order untouched; tasks without a deadline sort after dated ones.
pub fn sort_tasks(tasks: &mut [&Task], key: SortKey) {
    match key {
        SortKey::Created => {}
        SortKey::Deadline => tasks.sort_by(|left, right| {
            match (left.deadline, right.deadline) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        }),
        SortKey::Priority => {
            tasks.sort_by_key(|task| task.priority.rank());
        }
        SortKey::Title => {
            tasks.sort_by(|left, right| {
                left.title
                    .to_lowercase()
                    .cmp(&right.title.to_lowercase())
            });
        }
    }
}

/// Number of completed tasks, for the progress indicator.
pub fn completed_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|task| task.completed).count()
}
