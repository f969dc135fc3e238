//! Command-line interface for taskman
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;
mod theme;
mod ui;

/// taskman - a personal task manager
///
/// Tracks to-dos with priorities, categories and deadlines in a plain
/// JSON file. One-shot subcommands for scripting, `taskman ui` for an
/// interactive table view.
#[derive(Parser, Debug)]
#[command(name = "taskman")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding the task and theme files
    #[arg(long, global = true, env = "TASKMAN_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Priority: high, medium, low
        #[arg(short, long)]
        priority: Option<String>,

        /// Category: work, study, personal, other
        #[arg(short, long)]
        category: Option<String>,

        /// Deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
    },

    /// List tasks as a table
    List {
        /// Status filter: all, active, completed
        #[arg(long, default_value = "all")]
        status: String,

        /// Show only tasks whose title contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Sort order: created, deadline, priority, title
        #[arg(long, default_value = "created")]
        sort: String,

        /// Maximum rows to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one task in full
    Show {
        /// Task id or unique prefix
        id: String,
    },

    /// Edit fields of an existing task
    Edit {
        /// Task id or unique prefix
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New priority
        #[arg(short, long)]
        priority: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,

        /// Remove the deadline
        #[arg(long, conflicts_with = "deadline")]
        clear_deadline: bool,
    },

    /// Flip a task between active and completed
    Toggle {
        /// Task id or unique prefix
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id or unique prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every completed task
    ClearCompleted,

    /// Show collection statistics
    Stats,

    /// Show or set the display theme
    Theme {
        /// light or dark; omit to show the current theme
        value: Option<String>,
    },

    /// Open the interactive task table
    Ui,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Add {
                title,
                description,
                priority,
                category,
                deadline,
            } => task::run_add(task::AddOptions {
                title,
                description,
                priority,
                category,
                deadline,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::List {
                status,
                search,
                sort,
                limit,
            } => task::run_list(task::ListOptions {
                status,
                search,
                sort,
                limit,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Show { id } => task::run_show(task::ShowOptions {
                id,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Edit {
                id,
                title,
                description,
                priority,
                category,
                deadline,
                clear_deadline,
            } => task::run_edit(task::EditOptions {
                id,
                title,
                description,
                priority,
                category,
                deadline,
                clear_deadline,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Toggle { id } => task::run_toggle(task::ToggleOptions {
                id,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Rm { id, yes } => task::run_remove(task::RemoveOptions {
                id,
                yes,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::ClearCompleted => task::run_clear_completed(task::ClearOptions {
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Stats => task::run_stats(task::StatsOptions {
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Theme { value } => theme::run(theme::ThemeOptions {
                value,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Ui => ui::run(ui::UiOptions {
                data_dir: self.data_dir,
            }),
        }
    }
}
