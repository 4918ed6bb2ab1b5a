//! Navigation bar with the session indicator.
//!
//! Route links on the left, identity on the right: the signed-in user's
//! email plus the sign-out hint, or sign-in / sign-up entries when signed
//! out.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::auth::types::SessionUser;
use crate::theme::Theme;
use crate::ui::Route;

fn link(label: &str, active: bool, theme: &Theme) -> Span<'static> {
    let style = if active {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg)
    };
    Span::styled(label.to_owned(), style)
}

/// Render the nav bar.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    route: Route,
    user: Option<&SessionUser>,
    theme: &Theme,
) {
    let mut spans = vec![
        Span::styled(
            " TaskMaster ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(theme.dim)),
        link("[h] Home", route == Route::Home, theme),
        Span::raw("  "),
        link("[b] About", route == Route::About, theme),
        Span::styled("  │  ", Style::default().fg(theme.dim)),
    ];

    match user {
        Some(user) => {
            spans.push(Span::styled(
                user.email.clone(),
                Style::default().fg(theme.success),
            ));
            spans.push(Span::styled(
                "  [o] Sign out",
                Style::default().fg(theme.fg),
            ));
        }
        None => {
            spans.push(link("[l] Sign in", route == Route::SignIn, theme));
            spans.push(Span::raw("  "));
            spans.push(link("[n] Sign up", route == Route::SignUp, theme));
        }
    }

    spans.push(Span::styled(
        format!("  │  theme: {} [t]", theme.kind),
        Style::default().fg(theme.dim),
    ));

    let bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(bar, area);
}
