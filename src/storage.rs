//! Persistence adapter for the taskman data directory.
//!
//! Two slots live under the data dir:
//! - `task-manager-tasks.json` - JSON array of task records
//! - `theme` - `dark` or `light`
//!
//! Reads fail soft: a missing or malformed slot degrades to the empty
//! collection (or the default theme) and never raises. Writes hold a file
//! lock and replace the slot atomically; a failed write surfaces as
//! `Error::Storage` while the in-memory state stays correct.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::lock::{write_atomic_locked, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::Task;

/// File name of the tasks slot
pub const TASKS_SLOT: &str = "task-manager-tasks.json";

/// File name of the theme slot
pub const THEME_SLOT: &str = "theme";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TASKMAN_DATA_DIR";

/// Display theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::InvalidArgument(format!(
                "unknown theme '{other}' (expected light or dark)"
            ))),
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage manager bound to a data directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Resolve the data directory: explicit flag, then `TASKMAN_DATA_DIR`,
    /// then the platform data dir.
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = override_dir {
            return Ok(Self::new(dir));
        }
        if let Some(raw) = std::env::var_os(DATA_DIR_ENV) {
            if !raw.is_empty() {
                return Ok(Self::new(PathBuf::from(raw)));
            }
        }
        let dirs = ProjectDirs::from("", "", "taskman").ok_or_else(|| {
            Error::Storage("could not determine a data directory for this platform".to_string())
        })?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_SLOT)
    }

    pub fn theme_file(&self) -> PathBuf {
        self.data_dir.join(THEME_SLOT)
    }

    /// Load the task collection. Missing slot means an empty list; malformed
    /// contents recover to an empty list with a warning.
    pub fn load_tasks(&self) -> Vec<Task> {
        let path = self.tasks_file();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read tasks slot; starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(path = %path.display(), %err, "malformed tasks slot; starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the tasks slot with the full collection.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        let path = self.tasks_file();
        let json = serde_json::to_string_pretty(tasks)
            .map_err(|err| Error::Storage(format!("failed to serialize tasks: {err}")))?;
        write_atomic_locked(&path, json.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)
            .map_err(|err| storage_write_error(&path, err))?;
        debug!(path = %path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Load the theme preference; missing or malformed falls back to default.
    pub fn load_theme(&self) -> Theme {
        let path = self.theme_file();
        match fs::read_to_string(&path) {
            Ok(raw) => Theme::parse(&raw).unwrap_or_else(|_| {
                warn!(path = %path.display(), "malformed theme slot; using default");
                Theme::default()
            }),
            Err(_) => Theme::default(),
        }
    }

    /// Persist the theme preference.
    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        let path = self.theme_file();
        write_atomic_locked(&path, theme.as_str().as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)
            .map_err(|err| storage_write_error(&path, err))
    }
}

fn storage_write_error(path: &Path, err: Error) -> Error {
    match err {
        already @ Error::Storage(_) => already,
        lock @ Error::LockFailed(_) => lock,
        other => Error::Storage(format!("failed to write {}: {other}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskDraft};
    use tempfile::TempDir;

    fn storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());
        (dir, storage)
    }

    fn sample_task(title: &str) -> Task {
        Task::from_draft(TaskDraft {
            title: title.to_string(),
            ..TaskDraft::default()
        })
    }

    #[test]
    fn missing_slot_loads_empty() {
        let (_dir, storage) = storage();
        assert!(storage.load_tasks().is_empty());
    }

    #[test]
    fn malformed_slot_loads_empty() {
        let (_dir, storage) = storage();
        fs::create_dir_all(storage.data_dir()).unwrap();
        fs::write(storage.tasks_file(), "{not json").unwrap();
        assert!(storage.load_tasks().is_empty());
    }

    #[test]
    fn save_load_round_trips_every_field() {
        let (_dir, storage) = storage();
        let mut first = sample_task("Buy milk");
        first.description = "2 liters".to_string();
        first.deadline = chrono::NaiveDate::from_ymd_opt(2025, 7, 1);
        let mut second = sample_task("Call Bob");
        second.completed = true;

        let tasks = vec![first, second];
        storage.save_tasks(&tasks).unwrap();
        assert_eq!(storage.load_tasks(), tasks);
    }

    #[test]
    fn theme_round_trips_and_degrades() {
        let (_dir, storage) = storage();
        assert_eq!(storage.load_theme(), Theme::Light);

        storage.save_theme(Theme::Dark).unwrap();
        assert_eq!(storage.load_theme(), Theme::Dark);

        fs::write(storage.theme_file(), "sepia").unwrap();
        assert_eq!(storage.load_theme(), Theme::Light);
    }

    #[test]
    fn theme_slot_holds_plain_text() {
        let (_dir, storage) = storage();
        storage.save_theme(Theme::Dark).unwrap();
        assert_eq!(fs::read_to_string(storage.theme_file()).unwrap(), "dark");
    }
}
