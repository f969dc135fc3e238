use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::config::Config;
use crate::error::Result;
use crate::filter::{completed_count, sort_tasks, visible_tasks, SortKey, StatusFilter};
use crate::storage::Theme;
use crate::store::TaskStore;
use crate::table::progress_line;
use crate::task::{Category, Priority, Task};

use super::editor::{EditorAction, EditorKind, EditorState};
use super::view;

const EVENT_POLL_MS: u64 = 120;

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

pub(crate) struct DeleteConfirmState {
    pub(crate) task_id: String,
    pub(crate) title: String,
}

pub struct AppState {
    store: TaskStore,
    pub(crate) theme: Theme,
    pub(crate) status_filter: StatusFilter,
    pub(crate) sort: SortKey,
    pub(crate) search: String,
    pub(crate) search_active: bool,
    pub(crate) visible: Vec<usize>,
    pub(crate) selected: Option<usize>,
    pub(crate) editor: Option<EditorState>,
    pub(crate) delete_confirm: Option<DeleteConfirmState>,
    pub(crate) show_help: bool,
    status_message: Option<String>,
    info_message: Option<String>,
    default_priority: Priority,
    default_category: Category,
}

impl AppState {
    fn new(store: TaskStore, config: &Config) -> Result<Self> {
        let theme = store.storage().load_theme();
        let mut app = Self {
            store,
            theme,
            status_filter: StatusFilter::All,
            sort: SortKey::Created,
            search: String::new(),
            search_active: false,
            visible: Vec::new(),
            selected: None,
            editor: None,
            delete_confirm: None,
            show_help: false,
            status_message: None,
            info_message: None,
            default_priority: config.defaults.priority()?,
            default_category: config.defaults.category()?,
        };
        app.apply_filter(None);
        Ok(app)
    }

    pub(crate) fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|idx| self.store.tasks().get(idx))
    }

    pub(crate) fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub(crate) fn progress(&self) -> String {
        progress_line(completed_count(self.store.tasks()), self.store.len())
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        if let Some(info) = self.info_message.as_ref() {
            return Some((info.clone(), StatusKind::Info));
        }
        None
    }

    pub(crate) fn footer_hint(&self) -> String {
        if self.delete_confirm.is_some() {
            return "y confirm delete  esc cancel".to_string();
        }
        if let Some(editor) = self.editor.as_ref() {
            if editor.confirming() {
                return "enter/y confirm  e edit  esc cancel".to_string();
            }
            return "tab next field  left/right cycle choice  enter confirm  esc cancel".to_string();
        }
        if self.search_active {
            return "type to search  enter done  esc clear".to_string();
        }
        "j/k move  space toggle  n new  e edit  d delete  / search  f filter  s sort  c clear done  t theme  ? help  q quit"
            .to_string()
    }

    /// Rebuild the visible index list, keeping the selection on the same
    /// task when it is still shown.
    fn apply_filter(&mut self, previous_id: Option<String>) {
        let tasks = self.store.tasks();
        let mut refs = visible_tasks(tasks, self.status_filter, &self.search);
        sort_tasks(&mut refs, self.sort);

        let ids: Vec<String> = refs.iter().map(|task| task.id.clone()).collect();
        self.visible = ids
            .iter()
            .filter_map(|id| tasks.iter().position(|task| &task.id == id))
            .collect();

        self.selected = previous_id
            .and_then(|id| {
                self.visible
                    .iter()
                    .copied()
                    .find(|idx| tasks[*idx].id == id)
            })
            .or_else(|| self.visible.first().copied());
    }

    fn refresh(&mut self) {
        let previous = self.selected_task().map(|task| task.id.clone());
        self.apply_filter(previous);
    }

    fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            self.selected = None;
            return;
        }
        let current_pos = self
            .selected
            .and_then(|idx| self.visible.iter().position(|candidate| *candidate == idx))
            .unwrap_or(0);
        let max = self.visible.len().saturating_sub(1);
        let next = (current_pos as isize + delta).clamp(0, max as isize) as usize;
        self.selected = Some(self.visible[next]);
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    fn clear_messages(&mut self) {
        self.status_message = None;
        self.info_message = None;
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_task().map(|task| task.id.clone()) else {
            return;
        };
        match self.store.toggle_completed(&id) {
            Ok(task) => {
                let state = if task.completed { "completed" } else { "active" };
                self.set_info(format!("'{}' marked {state}", task.title));
            }
            Err(err) => self.set_error(err.to_string()),
        }
        self.apply_filter(Some(id));
    }

    fn begin_delete(&mut self) {
        if let Some(task) = self.selected_task() {
            self.delete_confirm = Some(DeleteConfirmState {
                task_id: task.id.clone(),
                title: task.title.clone(),
            });
        }
    }

    fn confirm_delete(&mut self) {
        let Some(state) = self.delete_confirm.take() else {
            return;
        };
        match self.store.remove(&state.task_id) {
            Ok(task) => self.set_info(format!("deleted '{}'", task.title)),
            Err(err) => self.set_error(err.to_string()),
        }
        self.refresh();
    }

    fn clear_completed(&mut self) {
        match self.store.remove_completed() {
            Ok(0) => self.set_info("no completed tasks".to_string()),
            Ok(count) => self.set_info(format!("removed {count} completed")),
            Err(err) => self.set_error(err.to_string()),
        }
        self.refresh();
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        if let Err(err) = self.store.storage().save_theme(self.theme) {
            self.set_error(format!("theme not saved: {err}"));
        } else {
            self.set_info(format!("theme: {}", self.theme));
        }
    }

    fn submit_editor(&mut self) {
        let Some(editor) = self.editor.as_ref() else {
            return;
        };
        let draft = match editor.to_draft() {
            Ok(draft) => draft,
            Err(message) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.set_error(message);
                }
                return;
            }
        };

        let result = match (editor.kind(), editor.task_id()) {
            (EditorKind::EditTask, Some(id)) => {
                let id = id.to_string();
                self.store.update(&id, draft)
            }
            _ => self.store.add(draft),
        };

        match result {
            Ok(task) => {
                self.editor = None;
                self.set_info(format!("saved '{}'", task.title));
                self.apply_filter(Some(task.id));
            }
            Err(err) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.set_error(err.to_string());
                }
            }
        }
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.show_help {
            self.show_help = false;
            return false;
        }

        if self.delete_confirm.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.confirm_delete(),
                KeyCode::Esc | KeyCode::Char('n') => {
                    self.delete_confirm = None;
                }
                _ => {}
            }
            return false;
        }

        if self.editor.is_some() {
            let action = match self.editor.as_mut() {
                Some(editor) => editor.handle_key(key),
                None => EditorAction::None,
            };
            match action {
                EditorAction::Cancel => self.editor = None,
                EditorAction::Submit => self.submit_editor(),
                EditorAction::None => {}
            }
            return false;
        }

        if self.search_active {
            match key.code {
                KeyCode::Esc => {
                    self.search.clear();
                    self.search_active = false;
                }
                KeyCode::Enter => self.search_active = false,
                KeyCode::Backspace => {
                    self.search.pop();
                }
                KeyCode::Char(ch) if !ch.is_control() => self.search.push(ch),
                _ => {}
            }
            self.refresh();
            return false;
        }

        self.clear_messages();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.move_selection(isize::MIN / 2),
            KeyCode::Char('G') | KeyCode::End => self.move_selection(isize::MAX / 2),
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('n') => {
                self.editor = Some(EditorState::new_task(
                    self.default_priority,
                    self.default_category,
                ));
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task() {
                    self.editor = Some(EditorState::edit_task(task));
                }
            }
            KeyCode::Char('d') => self.begin_delete(),
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char('f') => {
                self.status_filter = self.status_filter.next();
                self.refresh();
            }
            KeyCode::Char('s') => {
                self.sort = self.sort.next();
                self.refresh();
            }
            KeyCode::Char('c') => self.clear_completed(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
        false
    }
}

pub fn run(store: TaskStore, config: &Config) -> Result<()> {
    let mut app = AppState::new(store, config)?;
    run_terminal(&mut app)
}

fn run_terminal(app: &mut AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if !event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key) {
                    return Ok(());
                }
                dirty = true;
            }
            Event::Resize(_, _) => dirty = true,
            _ => {}
        }
    }
}
