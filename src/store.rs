//! In-memory task collection with persistence.
//!
//! The store owns the canonical task list for one invocation. Mutations
//! update memory first, notify subscribers, then persist the full collection.
//! Persistence failures leave the in-memory state intact and bubble up so the
//! caller decides whether they are fatal (one-shot commands) or a status-line
//! notice (the viewer).

use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::task::{Task, TaskDraft};

/// Called after every in-memory mutation with the new collection.
pub type ChangeListener = Box<dyn Fn(&[Task])>;

/// The task collection. Newest tasks sit at the front.
pub struct TaskStore {
    tasks: Vec<Task>,
    storage: Storage,
    listeners: Vec<ChangeListener>,
}

impl TaskStore {
    /// Open the store, loading whatever the data directory holds.
    pub fn open(storage: Storage) -> Self {
        let tasks = storage.load_tasks();
        debug!(count = tasks.len(), "opened task store");
        Self {
            tasks,
            storage,
            listeners: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Register a listener invoked after each mutation.
    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.tasks);
        }
    }

    fn commit(&self) -> Result<()> {
        self.notify();
        self.storage.save_tasks(&self.tasks)
    }

    /// Validate a draft and prepend the resulting task.
    pub fn add(&mut self, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let task = Task::from_draft(draft);
        self.tasks.insert(0, task.clone());
        self.commit()?;
        Ok(task)
    }

    /// Replace the editable fields of an existing task. Identity, creation
    /// time and completion state survive the update.
    pub fn update(&mut self, id: &str, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let index = self.index_of(id)?;
        let task = &mut self.tasks[index];
        task.title = draft.title;
        task.description = draft.description;
        task.priority = draft.priority;
        task.category = draft.category;
        task.deadline = draft.deadline;
        let updated = task.clone();
        self.commit()?;
        Ok(updated)
    }

    /// Remove a task by id.
    pub fn remove(&mut self, id: &str) -> Result<Task> {
        let index = self.index_of(id)?;
        let removed = self.tasks.remove(index);
        self.commit()?;
        Ok(removed)
    }

    /// Flip a task's completion state.
    pub fn toggle_completed(&mut self, id: &str) -> Result<Task> {
        let index = self.index_of(id)?;
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        let toggled = task.clone();
        self.commit()?;
        Ok(toggled)
    }

    /// Drop every completed task, returning how many were removed.
    pub fn remove_completed(&mut self) -> Result<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.commit()?;
        }
        Ok(removed)
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Resolve a full id or unique prefix to the canonical id.
    pub fn resolve_id(&self, input: &str) -> Result<String> {
        if let Some(task) = self.find(input) {
            return Ok(task.id.clone());
        }

        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.id.starts_with(input))
            .collect();

        match matches.len() {
            0 => Err(Error::TaskNotFound(input.to_string())),
            1 => Ok(matches[0].id.clone()),
            n => Err(Error::InvalidArgument(format!(
                "id prefix '{input}' is ambiguous ({n} matches)"
            ))),
        }
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }
}
