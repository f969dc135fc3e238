//! taskman task command implementations.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::{completed_count, sort_tasks, visible_tasks, SortKey, StatusFilter};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;
use crate::store::TaskStore;
use crate::table::{progress_line, render_table, short_id, TaskRow};
use crate::task::{parse_deadline, Category, Priority, Task, TaskDraft};

pub struct AddOptions {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub status: String,
    pub search: Option<String>,
    pub sort: String,
    pub limit: Option<usize>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<String>,
    pub clear_deadline: bool,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ToggleOptions {
    pub id: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RemoveOptions {
    pub id: String,
    pub yes: bool,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ClearOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct StatsOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Resolve config and open the store for one command invocation.
pub(crate) fn load_context(data_dir: Option<PathBuf>) -> Result<(Config, TaskStore)> {
    let config = Config::load_default()?;
    let dir = data_dir.or_else(|| config.data_dir.clone());
    let storage = Storage::resolve(dir)?;
    Ok((config, TaskStore::open(storage)))
}

fn output_options(json: bool, quiet: bool) -> OutputOptions {
    OutputOptions { json, quiet }
}

pub fn run_add(opts: AddOptions) -> Result<()> {
    let (config, mut store) = load_context(opts.data_dir)?;

    let priority = match &opts.priority {
        Some(raw) => Priority::parse(raw)?,
        None => config.defaults.priority()?,
    };
    let category = match &opts.category {
        Some(raw) => Category::parse(raw)?,
        None => config.defaults.category()?,
    };
    let deadline = opts.deadline.as_deref().map(parse_deadline).transpose()?;

    let task = store.add(TaskDraft {
        title: opts.title,
        description: opts.description.unwrap_or_default(),
        priority,
        category,
        deadline,
    })?;

    let mut human = HumanOutput::new(format!("Added task {}", short_id(&task.id)));
    human.push_summary("title", &task.title);
    human.push_summary("priority", task.priority.as_str());
    human.push_summary("category", task.category.as_str());
    if let Some(date) = task.deadline {
        human.push_summary("deadline", date.to_string());
    }

    emit_success(
        output_options(opts.json, opts.quiet),
        "add",
        &task,
        Some(&human),
    )
}

#[derive(Serialize)]
struct ListOutput<'a> {
    tasks: Vec<&'a Task>,
    total: usize,
    completed: usize,
}

pub fn run_list(opts: ListOptions) -> Result<()> {
    let (_config, store) = load_context(opts.data_dir)?;

    let status = StatusFilter::parse(&opts.status)?;
    let sort = SortKey::parse(&opts.sort)?;
    let query = opts.search.as_deref().unwrap_or("");

    let mut visible = visible_tasks(store.tasks(), status, query);
    sort_tasks(&mut visible, sort);
    if let Some(limit) = opts.limit {
        visible.truncate(limit);
    }

    let completed = completed_count(store.tasks());
    let total = store.len();

    if opts.json {
        let data = ListOutput {
            tasks: visible,
            total,
            completed,
        };
        return emit_success(output_options(true, opts.quiet), "list", &data, None);
    }

    if opts.quiet {
        return Ok(());
    }

    if visible.is_empty() {
        println!("No tasks to show.");
    } else {
        let today = Local::now().date_naive();
        let rows: Vec<TaskRow> = visible
            .iter()
            .map(|task| TaskRow::from_task(task, today))
            .collect();
        println!("{}", render_table(&rows));
    }
    println!("{}", progress_line(completed, total));

    Ok(())
}

pub fn run_show(opts: ShowOptions) -> Result<()> {
    let (_config, store) = load_context(opts.data_dir)?;

    let id = store.resolve_id(&opts.id)?;
    let task = store
        .find(&id)
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

    let mut human = HumanOutput::new(format!("Task {}", short_id(&task.id)));
    human.push_summary("id", &task.id);
    human.push_summary("title", &task.title);
    if !task.description.is_empty() {
        human.push_summary("description", &task.description);
    }
    human.push_summary("priority", task.priority.as_str());
    human.push_summary("category", task.category.as_str());
    human.push_summary(
        "deadline",
        task.deadline
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    human.push_summary("completed", if task.completed { "yes" } else { "no" });
    human.push_summary("created", task.created_at.format("%Y-%m-%d %H:%M").to_string());
    if task.is_overdue(Local::now().date_naive()) {
        human.push_warning("task is overdue");
    }

    emit_success(
        output_options(opts.json, opts.quiet),
        "show",
        task,
        Some(&human),
    )
}

pub fn run_edit(opts: EditOptions) -> Result<()> {
    let (_config, mut store) = load_context(opts.data_dir)?;

    let id = store.resolve_id(&opts.id)?;
    let current = store
        .find(&id)
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?
        .clone();

    let deadline = if opts.clear_deadline {
        None
    } else {
        match &opts.deadline {
            Some(raw) => Some(parse_deadline(raw)?),
            None => current.deadline,
        }
    };

    let draft = TaskDraft {
        title: opts.title.unwrap_or(current.title),
        description: opts.description.unwrap_or(current.description),
        priority: match &opts.priority {
            Some(raw) => Priority::parse(raw)?,
            None => current.priority,
        },
        category: match &opts.category {
            Some(raw) => Category::parse(raw)?,
            None => current.category,
        },
        deadline,
    };

    let task = store.update(&id, draft)?;

    let mut human = HumanOutput::new(format!("Updated task {}", short_id(&task.id)));
    human.push_summary("title", &task.title);
    human.push_summary("priority", task.priority.as_str());
    human.push_summary("category", task.category.as_str());

    emit_success(
        output_options(opts.json, opts.quiet),
        "edit",
        &task,
        Some(&human),
    )
}

pub fn run_toggle(opts: ToggleOptions) -> Result<()> {
    let (_config, mut store) = load_context(opts.data_dir)?;

    let id = store.resolve_id(&opts.id)?;
    let task = store.toggle_completed(&id)?;

    let state = if task.completed { "completed" } else { "active" };
    let human = HumanOutput::new(format!(
        "Task {} is now {state}",
        short_id(&task.id)
    ));

    emit_success(
        output_options(opts.json, opts.quiet),
        "toggle",
        &task,
        Some(&human),
    )
}

pub fn run_remove(opts: RemoveOptions) -> Result<()> {
    let (_config, mut store) = load_context(opts.data_dir)?;

    let id = store.resolve_id(&opts.id)?;
    let title = store
        .find(&id)
        .map(|task| task.title.clone())
        .unwrap_or_default();

    if !opts.yes && !confirm_removal(&title)? {
        let human = HumanOutput::new("Aborted.");
        return emit_success(
            output_options(opts.json, opts.quiet),
            "rm",
            &serde_json::json!({ "removed": false }),
            Some(&human),
        );
    }

    let task = store.remove(&id)?;

    let mut human = HumanOutput::new(format!("Removed task {}", short_id(&task.id)));
    human.push_summary("title", &task.title);

    emit_success(
        output_options(opts.json, opts.quiet),
        "rm",
        &task,
        Some(&human),
    )
}

/// Prompt on the terminal before a delete. A non-interactive stdin without
/// `--yes` is an error rather than a silent delete.
fn confirm_removal(title: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return Err(Error::InvalidArgument(
            "refusing to delete without --yes when not run from a terminal".to_string(),
        ));
    }

    eprint!("Delete '{title}'? [y/N] ");
    std::io::stderr().flush()?;

    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[derive(Serialize)]
struct ClearOutput {
    removed: usize,
    remaining: usize,
}

pub fn run_clear_completed(opts: ClearOptions) -> Result<()> {
    let (_config, mut store) = load_context(opts.data_dir)?;

    let removed = store.remove_completed()?;
    let data = ClearOutput {
        removed,
        remaining: store.len(),
    };

    let mut human = HumanOutput::new(format!(
        "Removed {removed} completed task{}",
        if removed == 1 { "" } else { "s" }
    ));
    human.push_summary("remaining", data.remaining.to_string());

    emit_success(
        output_options(opts.json, opts.quiet),
        "clear-completed",
        &data,
        Some(&human),
    )
}

#[derive(Serialize)]
struct StatsOutput {
    total: usize,
    active: usize,
    completed: usize,
    overdue: usize,
}

pub fn run_stats(opts: StatsOptions) -> Result<()> {
    let (_config, store) = load_context(opts.data_dir)?;

    let today = Local::now().date_naive();
    let completed = completed_count(store.tasks());
    let overdue = store
        .tasks()
        .iter()
        .filter(|task| task.is_overdue(today))
        .count();
    let data = StatsOutput {
        total: store.len(),
        active: store.len() - completed,
        completed,
        overdue,
    };

    let mut human = HumanOutput::new(progress_line(data.completed, data.total));
    human.push_summary("total", data.total.to_string());
    human.push_summary("active", data.active.to_string());
    human.push_summary("completed", data.completed.to_string());
    human.push_summary("overdue", data.overdue.to_string());

    emit_success(
        output_options(opts.json, opts.quiet),
        "stats",
        &data,
        Some(&human),
    )
}
