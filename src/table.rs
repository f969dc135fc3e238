//! Tabular presentation of the task collection.
//!
//! Display values are derived per render, never stored: short ids, checkbox
//! cells, deadline text with the overdue flag, and the progress line. Both
//! the `list` command and the interactive viewer build their rows here.

use chrono::NaiveDate;

use crate::task::Task;

/// Length of the id prefix shown in tables
pub const SHORT_ID_LEN: usize = 8;

pub const TABLE_HEADERS: [&str; 7] = [
    "", "ID", "Title", "Priority", "Category", "Deadline", "Created",
];

/// One task flattened into display cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub short_id: String,
    pub checkbox: &'static str,
    pub title: String,
    pub priority: &'static str,
    pub category: &'static str,
    pub deadline: String,
    pub created: String,
    pub completed: bool,
    pub overdue: bool,
}

impl TaskRow {
    pub fn from_task(task: &Task, today: NaiveDate) -> Self {
        let overdue = task.is_overdue(today);
        Self {
            id: task.id.clone(),
            short_id: short_id(&task.id),
            checkbox: if task.completed { "[x]" } else { "[ ]" },
            title: task.title.clone(),
            priority: task.priority.as_str(),
            category: task.category.as_str(),
            deadline: match task.deadline {
                Some(date) if overdue => format!("{date} (overdue)"),
                Some(date) => date.to_string(),
                None => "-".to_string(),
            },
            created: task.created_at.format("%Y-%m-%d %H:%M").to_string(),
            completed: task.completed,
            overdue,
        }
    }

    fn cells(&self) -> [&str; 7] {
        [
            self.checkbox,
            &self.short_id,
            &self.title,
            self.priority,
            self.category,
            &self.deadline,
            &self.created,
        ]
    }
}

pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

/// Render rows as a column-aligned text table, header included.
pub fn render_table(rows: &[TaskRow]) -> String {
    let mut widths: Vec<usize> = TABLE_HEADERS.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_line(&TABLE_HEADERS, &widths));
    for row in rows {
        lines.push(format_line(&row.cells(), &widths));
    }
    lines.join("\n")
}

fn format_line(cells: &[&str; 7], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        if i + 1 < cells.len() {
            for _ in cell.chars().count()..*width {
                line.push(' ');
            }
        }
    }
    line.trim_end().to_string()
}

/// Progress indicator text. An empty collection reads as zero percent.
pub fn progress_line(completed: usize, total: usize) -> String {
    let percent = if total == 0 {
        0
    } else {
        completed * 100 / total
    };
    format!("Completed: {completed} / {total} ({percent}%)")
}
