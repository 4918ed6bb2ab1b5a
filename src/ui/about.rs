//! Static about page.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::theme::Theme;

/// Render the about page.
pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
    let body = vec![
        Line::from(Span::styled(
            "TaskMaster",
            Style::default().fg(theme.accent),
        )),
        Line::default(),
        Line::from(
            "A small task tracker backed by a hosted database. Sign in to \
             create tasks, check them off, and delete them; your list is \
             stored remotely and follows you between devices.",
        ),
        Line::default(),
        Line::from("Tasks can carry a description, a due date, and a priority."),
        Line::default(),
        Line::from(Span::styled(
            "Data never leaves the hosted backend; this client keeps only a \
             session file so you stay signed in.",
            Style::default().fg(theme.dim),
        )),
    ];
    let page = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("About"));
    frame.render_widget(page, area);
}
