//! taskman - personal task manager library
//!
//! Core functionality behind the taskman CLI: a small to-do collection with
//! priorities, categories and deadlines, persisted as JSON.
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskman.toml`
//! - `error`: Error types and result aliases
//! - `task`: Task model and field validation
//! - `store`: In-memory collection with persistence and change listeners
//! - `filter`: Status/search filtering and sorting
//! - `storage`: Persistence slots in the data directory
//! - `table`: Derived display rows and the text table
//! - `lock`: File locking and atomic writes
//! - `ui`: Interactive terminal viewer

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod lock;
pub mod output;
pub mod storage;
pub mod store;
pub mod table;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
