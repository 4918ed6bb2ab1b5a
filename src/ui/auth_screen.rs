//! Sign-in / sign-up form.
//!
//! One form, two modes; the route decides which. Status is rendered from
//! the typed [`AuthStatus`] variant — success and failure styling never
//! depend on message text.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::auth::types::AuthStatus;
use crate::theme::Theme;

/// Which credential field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AuthField {
    #[default]
    Email,
    Password,
}

/// Form mode, decided by the active route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Password sign-in.
    SignIn,
    /// Account registration.
    SignUp,
}

impl AuthMode {
    /// Screen title for this mode.
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
        }
    }
}

/// What an auth-form keypress asks the shell to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Submit the entered credentials.
    Submit {
        /// Entered email.
        email: String,
        /// Entered password.
        password: String,
    },
    /// Switch between sign-in and sign-up.
    SwitchMode,
    /// Leave the screen.
    Leave,
}

/// Credential form state shared by both modes.
#[derive(Debug, Default)]
pub struct AuthScreen {
    email: String,
    password: String,
    focus: AuthField,
    /// Outcome of the last submission, if any.
    pub status: Option<AuthStatus>,
    /// Whether a submission is in flight.
    pub busy: bool,
}

impl AuthScreen {
    /// Clear the status message (kept fields), e.g. when switching modes.
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Handle a keypress on the auth screen.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AuthAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('s') = key.code {
                return Some(AuthAction::SwitchMode);
            }
            return None;
        }
        match key.code {
            KeyCode::Esc => Some(AuthAction::Leave),
            KeyCode::Enter => Some(AuthAction::Submit {
                email: self.email.trim().to_owned(),
                password: self.password.clone(),
            }),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.focus = match self.focus {
                    AuthField::Email => AuthField::Password,
                    AuthField::Password => AuthField::Email,
                };
                None
            }
            KeyCode::Backspace => {
                match self.focus {
                    AuthField::Email => self.email.pop(),
                    AuthField::Password => self.password.pop(),
                };
                None
            }
            KeyCode::Char(c) => {
                match self.focus {
                    AuthField::Email => self.email.push(c),
                    AuthField::Password => self.password.push(c),
                }
                None
            }
            _ => None,
        }
    }
}

/// Human-readable text for a typed status.
fn status_text(status: &AuthStatus) -> String {
    match status {
        AuthStatus::SignedIn => "Signed in successfully!".to_owned(),
        AuthStatus::ConfirmationSent => "Check your email for the confirmation link!".to_owned(),
        AuthStatus::Failed { message, .. } => message.clone(),
    }
}

/// Render the auth screen in the given mode.
pub fn render(frame: &mut Frame, area: Rect, screen: &AuthScreen, mode: AuthMode, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    let marker = |field: AuthField| if screen.focus == field { "› " } else { "  " };
    let field_style = |field: AuthField| {
        if screen.focus == field {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.fg)
        }
    };
    let masked: String = "•".repeat(screen.password.chars().count());

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}Email:     {}", marker(AuthField::Email), screen.email),
            field_style(AuthField::Email),
        )),
        Line::from(Span::styled(
            format!("{}Password:  {masked}", marker(AuthField::Password)),
            field_style(AuthField::Password),
        )),
        Line::default(),
    ];

    if screen.busy {
        lines.push(Line::from(Span::styled(
            "Processing…",
            Style::default().fg(theme.dim),
        )));
    } else if let Some(status) = &screen.status {
        let style = if status.is_failure() {
            Style::default().fg(theme.error)
        } else {
            Style::default().fg(theme.success)
        };
        lines.push(Line::from(Span::styled(status_text(status), style)));
    } else {
        lines.push(Line::default());
    }

    let switch_hint = match mode {
        AuthMode::SignIn => "Don't have an account? [Ctrl+S] to sign up",
        AuthMode::SignUp => "Already have an account? [Ctrl+S] to sign in",
    };
    lines.push(Line::from(Span::styled(
        format!("[Enter] submit   [Tab] next field   {switch_hint}"),
        Style::default().fg(theme.dim),
    )));

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                mode.title(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(form, chunks[0]);
}
