use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::task::{parse_deadline, Category, Priority, Task, TaskDraft, CATEGORIES, PRIORITIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    NewTask,
    EditTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorFieldId {
    Title,
    Description,
    Priority,
    Category,
    Deadline,
}

#[derive(Debug, Clone)]
pub struct EditorField {
    pub id: EditorFieldId,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Cancel,
    Submit,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    kind: EditorKind,
    fields: Vec<EditorField>,
    active: usize,
    confirming: bool,
    error: Option<String>,
    task_id: Option<String>,
}

impl EditorState {
    pub fn new_task(priority: Priority, category: Category) -> Self {
        Self {
            kind: EditorKind::NewTask,
            fields: build_fields("", "", priority.as_str(), category.as_str(), ""),
            active: 0,
            confirming: false,
            error: None,
            task_id: None,
        }
    }

    pub fn edit_task(task: &Task) -> Self {
        let deadline = task.deadline.map(|d| d.to_string()).unwrap_or_default();
        Self {
            kind: EditorKind::EditTask,
            fields: build_fields(
                &task.title,
                &task.description,
                task.priority.as_str(),
                task.category.as_str(),
                &deadline,
            ),
            active: 0,
            confirming: false,
            error: None,
            task_id: Some(task.id.clone()),
        }
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn fields(&self) -> &[EditorField] {
        &self.fields
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn confirming(&self) -> bool {
        self.confirming
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.confirming = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if self.confirming {
            return self.handle_confirm_key(key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('u') {
            if let Some(field) = self.current_field_mut() {
                field.value.clear();
            }
            self.error = None;
            return EditorAction::None;
        }

        match key.code {
            KeyCode::Esc => return EditorAction::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.move_active(1);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_active(-1);
            }
            KeyCode::Left => self.cycle_choice(-1),
            KeyCode::Right => self.cycle_choice(1),
            KeyCode::Enter => {
                if self.active + 1 >= self.fields.len() {
                    return self.attempt_confirm();
                }
                self.move_active(1);
            }
            KeyCode::Backspace => {
                if let Some(field) = self.current_field_mut() {
                    field.value.pop();
                }
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return EditorAction::None;
                }
                if !ch.is_control() {
                    if let Some(field) = self.current_field_mut() {
                        field.value.push(ch);
                    }
                }
            }
            _ => {}
        }

        self.error = None;
        EditorAction::None
    }

    /// Validate the form into a draft the store accepts.
    pub fn to_draft(&self) -> Result<TaskDraft, String> {
        let title = self.field_value(EditorFieldId::Title).trim();
        if title.is_empty() {
            return Err("title is required".to_string());
        }

        let priority = Priority::parse(self.field_value(EditorFieldId::Priority))
            .map_err(|_| format!("priority must be one of {}", PRIORITIES.join(", ")))?;
        let category = Category::parse(self.field_value(EditorFieldId::Category))
            .map_err(|_| format!("category must be one of {}", CATEGORIES.join(", ")))?;

        let deadline_raw = self.field_value(EditorFieldId::Deadline).trim();
        let deadline = if deadline_raw.is_empty() {
            None
        } else {
            Some(parse_deadline(deadline_raw).map_err(|_| "deadline must be YYYY-MM-DD".to_string())?)
        };

        Ok(TaskDraft {
            title: title.to_string(),
            description: self.field_value(EditorFieldId::Description).to_string(),
            priority,
            category,
            deadline,
        })
    }

    fn attempt_confirm(&mut self) -> EditorAction {
        match self.to_draft() {
            Ok(_) => {
                self.confirming = true;
                EditorAction::None
            }
            Err(err) => {
                self.error = Some(err);
                self.confirming = false;
                EditorAction::None
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> EditorAction {
        match key.code {
            KeyCode::Esc => EditorAction::Cancel,
            KeyCode::Backspace | KeyCode::Char('e') => {
                self.confirming = false;
                self.error = None;
                EditorAction::None
            }
            KeyCode::Char('y') | KeyCode::Enter => EditorAction::Submit,
            _ => EditorAction::None,
        }
    }

    /// Left/right steps through the fixed choices on the priority and
    /// category fields; other fields ignore it.
    fn cycle_choice(&mut self, delta: isize) {
        let Some(field) = self.fields.get_mut(self.active) else {
            return;
        };
        let choices: &[&str] = match field.id {
            EditorFieldId::Priority => &PRIORITIES,
            EditorFieldId::Category => &CATEGORIES,
            _ => return,
        };
        let current = choices
            .iter()
            .position(|choice| choice.eq_ignore_ascii_case(field.value.trim()))
            .unwrap_or(0);
        let len = choices.len() as isize;
        let next = (current as isize + delta).rem_euclid(len) as usize;
        field.value = choices[next].to_string();
    }

    fn move_active(&mut self, delta: isize) {
        let len = self.fields.len() as isize;
        if len == 0 {
            self.active = 0;
            return;
        }
        let next = (self.active as isize + delta).rem_euclid(len);
        self.active = next as usize;
    }

    fn current_field_mut(&mut self) -> Option<&mut EditorField> {
        self.fields.get_mut(self.active)
    }

    fn field_value(&self, id: EditorFieldId) -> &str {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .map(|field| field.value.as_str())
            .unwrap_or("")
    }
}

fn build_fields(
    title: &str,
    description: &str,
    priority: &str,
    category: &str,
    deadline: &str,
) -> Vec<EditorField> {
    vec![
        EditorField {
            id: EditorFieldId::Title,
            label: "Title",
            value: title.to_string(),
            required: true,
        },
        EditorField {
            id: EditorFieldId::Description,
            label: "Description",
            value: description.to_string(),
            required: false,
        },
        EditorField {
            id: EditorFieldId::Priority,
            label: "Priority",
            value: priority.to_string(),
            required: false,
        },
        EditorField {
            id: EditorFieldId::Category,
            label: "Category",
            value: category.to_string(),
            required: false,
        },
        EditorField {
            id: EditorFieldId::Deadline,
            label: "Deadline",
            value: deadline.to_string(),
            required: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn editor_requires_title() {
        let mut editor = EditorState::new_task(Priority::Medium, Category::Other);
        for _ in 0..editor.fields().len() {
            let action = editor.handle_key(key(KeyCode::Enter));
            assert_eq!(action, EditorAction::None);
        }
        assert_eq!(editor.error(), Some("title is required"));
    }

    #[test]
    fn editor_rejects_bad_deadline() {
        let mut editor = EditorState::new_task(Priority::Medium, Category::Other);
        editor.fields[0].value = "Buy milk".to_string();
        editor.fields[4].value = "tomorrow".to_string();
        assert_eq!(editor.to_draft(), Err("deadline must be YYYY-MM-DD".to_string()));
    }

    #[test]
    fn editor_builds_draft_from_fields() {
        let mut editor = EditorState::new_task(Priority::Medium, Category::Other);
        editor.fields[0].value = "Buy milk".to_string();
        editor.fields[2].value = "high".to_string();
        editor.fields[3].value = "personal".to_string();
        editor.fields[4].value = "2025-09-01".to_string();

        let draft = editor.to_draft().unwrap();
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(draft.category, Category::Personal);
        assert_eq!(draft.deadline, NaiveDate::from_ymd_opt(2025, 9, 1));
    }

    #[test]
    fn arrow_keys_cycle_priority_choices() {
        let mut editor = EditorState::new_task(Priority::Medium, Category::Other);
        editor.active = 2;
        editor.handle_key(key(KeyCode::Right));
        assert_eq!(editor.fields[2].value, "low");
        editor.handle_key(key(KeyCode::Right));
        assert_eq!(editor.fields[2].value, "high");
        editor.handle_key(key(KeyCode::Left));
        assert_eq!(editor.fields[2].value, "low");
    }

    #[test]
    fn submit_needs_confirmation() {
        let mut editor = EditorState::new_task(Priority::Medium, Category::Other);
        editor.fields[0].value = "Buy milk".to_string();
        editor.active = editor.fields.len() - 1;

        assert_eq!(editor.handle_key(key(KeyCode::Enter)), EditorAction::None);
        assert!(editor.confirming());
        assert_eq!(editor.handle_key(key(KeyCode::Enter)), EditorAction::Submit);
    }
}
