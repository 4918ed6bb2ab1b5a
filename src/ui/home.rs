//! Home screen: the task list and the collapsible add-task form.
//!
//! The screen renders controller state; every mutation is dispatched back
//! through the shell. The add form starts collapsed behind a single
//! affordance line and expands to title/description/due-date/priority
//! fields.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::controller::TaskListController;
use crate::store::{Priority, Task, TaskDraft};
use crate::theme::Theme;

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FormField {
    #[default]
    Title,
    Description,
    DueDate,
    Priority,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::DueDate,
            Self::DueDate => Self::Priority,
            Self::Priority => Self::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Title => Self::Priority,
            Self::Description => Self::Title,
            Self::DueDate => Self::Description,
            Self::Priority => Self::DueDate,
        }
    }
}

/// What a form keypress asks the shell to do.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    /// Submit the draft built from the current fields.
    Submit(TaskDraft),
    /// Close the form, discarding input.
    Cancel,
}

/// The collapsible add-task form.
#[derive(Debug, Default)]
pub struct AddTaskForm {
    open: bool,
    title: String,
    description: String,
    due_date: String,
    priority: Option<Priority>,
    focus: FormField,
    invalid_due_date: bool,
}

impl AddTaskForm {
    /// Whether the form is expanded.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Expand the form with empty fields.
    pub fn open(&mut self) {
        *self = Self {
            open: true,
            ..Self::default()
        };
    }

    /// Collapse the form and clear every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Cycle the priority choice: none → low → medium → high → none.
    fn cycle_priority(&mut self) {
        self.priority = match self.priority {
            None => Some(Priority::Low),
            Some(Priority::Low) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::High),
            Some(Priority::High) => None,
        };
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Priority => None,
        }
    }

    /// Build the draft from the current fields.
    ///
    /// Returns `None` when the due date text is present but not a valid
    /// `YYYY-MM-DD` date; the form marks the field instead of submitting.
    fn draft(&mut self) -> Option<TaskDraft> {
        let due_date = match self.due_date.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    self.invalid_due_date = true;
                    return None;
                }
            },
        };
        let mut draft = TaskDraft::new(self.title.clone());
        draft.description = Some(self.description.clone());
        draft.due_date = due_date;
        draft.priority = self.priority;
        Some(draft.normalized())
    }

    /// Handle a keypress while the form is open.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormAction> {
        match key.code {
            KeyCode::Esc => return Some(FormAction::Cancel),
            KeyCode::Enter => return self.draft().map(FormAction::Submit),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Left | KeyCode::Right if self.focus == FormField::Priority => {
                self.cycle_priority();
            }
            KeyCode::Backspace => {
                if self.focus == FormField::DueDate {
                    self.invalid_due_date = false;
                }
                if let Some(text) = self.focused_text() {
                    text.pop();
                }
            }
            KeyCode::Char(' ') if self.focus == FormField::Priority => self.cycle_priority(),
            KeyCode::Char(c) => {
                if self.focus == FormField::DueDate {
                    self.invalid_due_date = false;
                }
                if let Some(text) = self.focused_text() {
                    text.push(c);
                }
            }
            _ => {}
        }
        None
    }
}

/// Home screen state: list selection plus the add form.
#[derive(Debug, Default)]
pub struct HomeScreen {
    /// Index of the selected task row.
    pub selected: usize,
    /// The add-task form.
    pub form: AddTaskForm,
}

impl HomeScreen {
    /// Move the selection up one row.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the selection down one row, clamped to the list length.
    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Keep the selection valid after the list changed.
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Humanize a due date relative to `today`.
///
/// `Today, Aug 8` / `Tomorrow, Aug 9` / `Overdue, Aug 1` / plain `Aug 20`.
pub fn format_due_date(due: NaiveDate, today: NaiveDate) -> String {
    let formatted = due.format("%b %-d").to_string();
    if due == today {
        format!("Today, {formatted}")
    } else if Some(due) == today.succ_opt() {
        format!("Tomorrow, {formatted}")
    } else if due < today {
        format!("Overdue, {formatted}")
    } else {
        formatted
    }
}

/// Render the home screen.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    controller: &TaskListController,
    loading: bool,
    screen: &HomeScreen,
    theme: &Theme,
) {
    let form_height = if screen.form.is_open() { 7 } else { 1 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(form_height), Constraint::Min(0)])
        .split(area);

    render_form(frame, chunks[0], &screen.form, theme);

    if loading || controller.is_loading() {
        let spinner = Paragraph::new(Line::from(Span::styled(
            "Loading tasks…",
            Style::default().fg(theme.dim),
        )))
        .block(Block::default().borders(Borders::ALL).title("Tasks"));
        frame.render_widget(spinner, chunks[1]);
        return;
    }

    let tasks = controller.tasks();
    if tasks.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No tasks yet. Add a new one to get started!",
            Style::default().fg(theme.dim),
        )))
        .block(Block::default().borders(Borders::ALL).title("Tasks"));
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let today = chrono::Local::now().date_naive();
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| task_item(task, today, theme))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");
    let mut state = ListState::default();
    state.select(Some(screen.selected.min(tasks.len().saturating_sub(1))));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn task_item<'a>(task: &'a Task, today: NaiveDate, theme: &Theme) -> ListItem<'a> {
    let checkbox = if task.is_complete { "[x] " } else { "[ ] " };
    let title_style = if task.is_complete {
        Style::default()
            .fg(theme.dim)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme.fg)
    };

    let mut first = vec![
        Span::styled(checkbox, Style::default().fg(theme.fg)),
        Span::styled(task.title.as_str(), title_style),
    ];
    if let Some(priority) = task.priority {
        first.push(Span::raw(" "));
        first.push(Span::styled(
            format!("({priority})"),
            Style::default().fg(theme.priority_color(priority)),
        ));
    }
    if let Some(due) = task.due_date {
        first.push(Span::styled(
            format!("  due {}", format_due_date(due, today)),
            Style::default().fg(theme.dim),
        ));
    }

    let mut lines = vec![Line::from(first)];
    if let Some(description) = task.description.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("    {description}"),
            Style::default().fg(theme.dim),
        )));
    }
    ListItem::new(lines)
}

fn render_form(frame: &mut Frame, area: Rect, form: &AddTaskForm, theme: &Theme) {
    if !form.is_open() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "[a] Add new task",
            Style::default().fg(theme.accent),
        )));
        frame.render_widget(hint, area);
        return;
    }

    let marker = |field: FormField| if form.focus == field { "› " } else { "  " };
    let field_style = |field: FormField| {
        if form.focus == field {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.fg)
        }
    };

    let priority_label = match form.priority {
        Some(p) => p.as_str(),
        None => "none",
    };
    let due_hint = if form.invalid_due_date {
        Span::styled("  expected YYYY-MM-DD", Style::default().fg(theme.error))
    } else {
        Span::styled("  (YYYY-MM-DD)", Style::default().fg(theme.dim))
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("{}Title*:       {}", marker(FormField::Title), form.title),
            field_style(FormField::Title),
        )),
        Line::from(Span::styled(
            format!(
                "{}Description:  {}",
                marker(FormField::Description),
                form.description
            ),
            field_style(FormField::Description),
        )),
        Line::from(vec![
            Span::styled(
                format!("{}Due date:     {}", marker(FormField::DueDate), form.due_date),
                field_style(FormField::DueDate),
            ),
            due_hint,
        ]),
        Line::from(vec![
            Span::styled(
                format!(
                    "{}Priority:     {}",
                    marker(FormField::Priority),
                    priority_label
                ),
                field_style(FormField::Priority),
            ),
            Span::styled("  (space cycles)", Style::default().fg(theme.dim)),
        ]),
        Line::from(Span::styled(
            "[Enter] save   [Esc] cancel   [Tab] next field",
            Style::default().fg(theme.dim),
        )),
    ];
    let form_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("New task"));
    frame.render_widget(form_widget, area);
}
