use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::storage::Theme;
use crate::table::TaskRow;

use super::app::{AppState, DeleteConfirmState, StatusKind};
use super::editor::{EditorKind, EditorState};

const CHECKBOX_WIDTH: usize = 3;
const ID_WIDTH: usize = 8;
const PRIORITY_WIDTH: usize = 6;
const CATEGORY_WIDTH: usize = 8;
const DEADLINE_WIDTH: usize = 20;
const HELP_KEY_WIDTH: usize = 8;

struct Palette {
    text: Color,
    muted: Color,
    accent: Color,
    error: Color,
    success: Color,
    warning: Color,
    selection_bg: Color,
    border: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            text: Color::Rgb(234, 236, 239),
            muted: Color::Rgb(140, 146, 152),
            accent: Color::Rgb(122, 170, 255),
            error: Color::Rgb(255, 107, 107),
            success: Color::Rgb(126, 210, 146),
            warning: Color::Rgb(244, 200, 98),
            selection_bg: Color::Rgb(52, 56, 60),
            border: Color::Rgb(92, 126, 166),
        },
        Theme::Light => Palette {
            text: Color::Rgb(32, 36, 40),
            muted: Color::Rgb(110, 116, 122),
            accent: Color::Rgb(36, 84, 164),
            error: Color::Rgb(178, 34, 34),
            success: Color::Rgb(26, 122, 62),
            warning: Color::Rgb(150, 110, 10),
            selection_bg: Color::Rgb(214, 222, 233),
            border: Color::Rgb(120, 140, 168),
        },
    }
}

pub fn render(frame: &mut Frame, app: &mut AppState) {
    let colors = palette(app.theme);
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_header(frame, app, &colors, chunks[0]);
    render_list(frame, app, &colors, chunks[1]);
    render_footer(frame, app, &colors, chunks[2]);

    if let Some(editor) = app.editor.as_ref() {
        render_editor_modal(frame, area, &colors, editor);
    }
    if let Some(state) = app.delete_confirm.as_ref() {
        render_delete_confirm_modal(frame, area, &colors, state);
    }
    if app.show_help {
        render_help_modal(frame, area, &colors);
    }
}

fn render_header(frame: &mut Frame, app: &AppState, colors: &Palette, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "taskman",
            Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.progress(), Style::default().fg(colors.muted)),
    ]);
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors.border)),
    );
    frame.render_widget(widget, area);
}

fn render_list(frame: &mut Frame, app: &mut AppState, colors: &Palette, area: Rect) {
    let mut lines = Vec::new();

    if app.search_active || !app.search.is_empty() || show_mode_bar(app) {
        let search_label = if app.search_active && app.search.is_empty() {
            "search: _".to_string()
        } else if app.search.is_empty() {
            "search:".to_string()
        } else {
            format!("search: {}", app.search)
        };
        lines.push(Line::from(vec![
            Span::styled(search_label, Style::default().fg(colors.accent)),
            Span::raw("  "),
            Span::styled(
                format!("filter: {}", app.status_filter),
                Style::default().fg(colors.warning),
            ),
            Span::raw("  "),
            Span::styled(
                format!("sort: {}", app.sort),
                Style::default().fg(colors.muted),
            ),
        ]));
        lines.push(Line::from(""));
    }

    if app.visible.is_empty() {
        let message = if !app.search.is_empty() || show_mode_bar(app) {
            "No matches"
        } else {
            "No tasks"
        };
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(colors.muted),
        )));
    } else {
        let today = app.today();
        let list_height = area
            .height
            .saturating_sub(2)
            .saturating_sub(lines.len() as u16) as usize;
        let selected_pos = app
            .selected
            .and_then(|idx| app.visible.iter().position(|candidate| *candidate == idx));
        let (start, end) = list_window(app.visible.len(), selected_pos, list_height);

        for pos in start..end {
            let idx = app.visible[pos];
            let task = &app.tasks()[idx];
            let row = TaskRow::from_task(task, today);
            let selected = app.selected == Some(idx);
            lines.push(task_line(&row, selected, colors));
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .title("Tasks"),
    );
    frame.render_widget(widget, area);
}

fn show_mode_bar(app: &AppState) -> bool {
    app.status_filter != crate::filter::StatusFilter::All
        || app.sort != crate::filter::SortKey::Created
}

fn task_line(row: &TaskRow, selected: bool, colors: &Palette) -> Line<'static> {
    let base = if row.completed {
        Style::default()
            .fg(colors.muted)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(colors.text)
    };
    let base = if selected {
        base.bg(colors.selection_bg).add_modifier(Modifier::BOLD)
    } else {
        base
    };

    let deadline_style = if row.overdue {
        base.fg(colors.error)
    } else if row.completed {
        base
    } else {
        base.fg(colors.muted)
    };
    let priority_style = match row.priority {
        "high" if !row.completed => base.fg(colors.error),
        "low" if !row.completed => base.fg(colors.success),
        _ => base,
    };

    Line::from(vec![
        Span::styled(pad(row.checkbox, CHECKBOX_WIDTH), base),
        Span::raw(" "),
        Span::styled(pad(&row.short_id, ID_WIDTH), base.fg(colors.muted)),
        Span::raw(" "),
        Span::styled(pad(row.priority, PRIORITY_WIDTH), priority_style),
        Span::raw(" "),
        Span::styled(pad(row.category, CATEGORY_WIDTH), base.fg(colors.accent)),
        Span::raw(" "),
        Span::styled(pad(&row.deadline, DEADLINE_WIDTH), deadline_style),
        Span::raw(" "),
        Span::styled(row.title.clone(), base),
    ])
}

fn pad(value: &str, width: usize) -> String {
    let mut out: String = value.chars().take(width).collect();
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

/// Visible slice of the list, keeping the selection inside the window.
fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if height == 0 || total == 0 {
        return (0, 0);
    }
    let selected = selected.unwrap_or(0);
    let half = height / 2;
    let start = selected.saturating_sub(half).min(total.saturating_sub(height));
    let end = (start + height).min(total);
    (start, end)
}

fn render_footer(frame: &mut Frame, app: &AppState, colors: &Palette, area: Rect) {
    let mut lines = Vec::new();
    if let Some((message, kind)) = app.status_line() {
        let style = match kind {
            StatusKind::Error => Style::default().fg(colors.error),
            StatusKind::Info => Style::default().fg(colors.success),
        };
        lines.push(Line::from(Span::styled(message, style)));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        app.footer_hint(),
        Style::default().fg(colors.muted),
    )));

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(colors.border)),
    );
    frame.render_widget(widget, area);
}

fn render_editor_modal(frame: &mut Frame, area: Rect, colors: &Palette, editor: &EditorState) {
    let title = match editor.kind() {
        EditorKind::NewTask => "New Task",
        EditorKind::EditTask => "Edit Task",
    };
    let height = (editor.fields().len() + 5) as u16;
    let modal = centered_rect(area, 60, height);
    frame.render_widget(Clear, modal);

    let mut lines = Vec::new();
    for (idx, field) in editor.fields().iter().enumerate() {
        let active = idx == editor.active_index() && !editor.confirming();
        let label_style = if active {
            Style::default().fg(colors.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.muted)
        };
        let mut value = field.value.clone();
        if active {
            value.push('_');
        }
        let marker = if field.required { "*" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<12}", field.label), label_style),
            Span::styled(value, Style::default().fg(colors.text)),
        ]));
    }

    lines.push(Line::from(""));
    if let Some(error) = editor.error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(colors.error),
        )));
    } else if editor.confirming() {
        lines.push(Line::from(Span::styled(
            "Save? enter/y confirm, e edit, esc cancel",
            Style::default().fg(colors.warning),
        )));
    } else {
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.accent))
            .title(title),
    );
    frame.render_widget(widget, modal);
}

fn render_delete_confirm_modal(
    frame: &mut Frame,
    area: Rect,
    colors: &Palette,
    state: &DeleteConfirmState,
) {
    let modal = centered_rect(area, 50, 5);
    frame.render_widget(Clear, modal);

    let lines = vec![
        Line::from(Span::styled(
            format!("Delete '{}'?", state.title),
            Style::default().fg(colors.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y delete  esc cancel",
            Style::default().fg(colors.muted),
        )),
    ];

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.error))
            .title("Confirm"),
    );
    frame.render_widget(widget, modal);
}

fn render_help_modal(frame: &mut Frame, area: Rect, colors: &Palette) {
    let bindings: &[(&str, &str)] = &[
        ("j/k", "move selection"),
        ("space", "toggle completed"),
        ("n", "new task"),
        ("e/enter", "edit selected"),
        ("d", "delete selected"),
        ("/", "search titles"),
        ("f", "cycle status filter"),
        ("s", "cycle sort order"),
        ("c", "clear completed"),
        ("t", "toggle theme"),
        ("q/esc", "quit"),
    ];

    let modal = centered_rect(area, 44, (bindings.len() + 2) as u16);
    frame.render_widget(Clear, modal);

    let lines: Vec<Line> = bindings
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(
                    format!("{keys:<HELP_KEY_WIDTH$}"),
                    Style::default().fg(colors.accent),
                ),
                Span::styled(action.to_string(), Style::default().fg(colors.text)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .title("Help"),
    );
    frame.render_widget(widget, modal);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_window_keeps_selection_visible() {
        assert_eq!(list_window(10, Some(0), 4), (0, 4));
        assert_eq!(list_window(10, Some(9), 4), (6, 10));
        assert_eq!(list_window(10, Some(5), 4), (3, 7));
        assert_eq!(list_window(2, Some(1), 4), (0, 2));
        assert_eq!(list_window(0, None, 4), (0, 0));
    }

    #[test]
    fn pad_truncates_and_fills() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcd");
    }
}
