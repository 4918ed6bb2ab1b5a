//! Presentation shell: routes, the terminal event loop, and key dispatch.
//!
//! The shell owns no business logic. Key events are translated into
//! controller and session-manager calls; their state is what gets drawn.
//! All remote work happens inline on the UI event loop — the suspension
//! points are the network calls themselves.

pub mod about;
pub mod auth_screen;
pub mod home;
pub mod nav;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tokio::sync::watch;

use crate::auth::types::{AuthStatus, Session};
use crate::auth::SessionManager;
use crate::controller::{ActionOutcome, Notice, TaskListController};
use crate::theme::Theme;
use auth_screen::{AuthAction, AuthMode, AuthScreen};
use home::{FormAction, HomeScreen};

/// The four user-facing routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Task list plus the add form.
    Home,
    /// Password sign-in.
    SignIn,
    /// Account registration.
    SignUp,
    /// Static about page.
    About,
}

impl Route {
    fn auth_mode(self) -> Option<AuthMode> {
        match self {
            Self::SignIn => Some(AuthMode::SignIn),
            Self::SignUp => Some(AuthMode::SignUp),
            Self::Home | Self::About => None,
        }
    }
}

/// The application shell.
pub struct App {
    route: Route,
    theme: Theme,
    session: Arc<SessionManager>,
    sessions: watch::Receiver<Option<Session>>,
    controller: TaskListController,
    home: HomeScreen,
    auth: AuthScreen,
    last_notice: Option<Notice>,
    pending_load: bool,
    should_quit: bool,
}

impl App {
    /// Mount the shell on the home route with an empty collection; the
    /// first loop iteration fetches the task list.
    pub fn new(
        controller: TaskListController,
        session: Arc<SessionManager>,
        theme: Theme,
    ) -> Self {
        let sessions = session.subscribe();
        Self {
            route: Route::Home,
            theme,
            session,
            sessions,
            controller,
            home: HomeScreen::default(),
            auth: AuthScreen::default(),
            last_notice: None,
            pending_load: true,
            should_quit: false,
        }
    }

    /// Run the event loop until the user quits.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            if let Some(notice) = self.controller.take_notices().into_iter().next_back() {
                self.last_notice = Some(notice);
            }
            self.home.clamp_selection(self.controller.tasks().len());
            terminal.draw(|frame| self.render(frame))?;

            if self.pending_load {
                // The frame above already shows the loading indicator.
                self.pending_load = false;
                self.controller.load_tasks().await;
                continue;
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key).await;
                    }
                }
            }
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        {
            let sessions = self.sessions.borrow();
            nav::render(
                frame,
                chunks[0],
                self.route,
                sessions.as_ref().map(|s| &s.user),
                &self.theme,
            );
        }

        match self.route {
            Route::Home => home::render(
                frame,
                chunks[1],
                &self.controller,
                self.pending_load,
                &self.home,
                &self.theme,
            ),
            Route::SignIn => {
                auth_screen::render(frame, chunks[1], &self.auth, AuthMode::SignIn, &self.theme);
            }
            Route::SignUp => {
                auth_screen::render(frame, chunks[1], &self.auth, AuthMode::SignUp, &self.theme);
            }
            Route::About => about::render(frame, chunks[1], &self.theme),
        }

        self.render_footer(frame, chunks[2]);
    }

    fn render_footer(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let line = match &self.last_notice {
            Some(notice) => Line::from(Span::styled(
                format!("⚠ {}", notice.message),
                Style::default().fg(self.theme.error),
            )),
            None => {
                let hints = match self.route {
                    Route::Home => {
                        "a add · space toggle · d delete · r reload · t theme · q quit"
                    }
                    Route::SignIn | Route::SignUp => "enter submit · esc back · q is text here",
                    Route::About => "h home · t theme · q quit",
                };
                Line::from(Span::styled(hints, Style::default().fg(self.theme.dim)))
            }
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        // A new keypress dismisses the previous failure report.
        self.last_notice = None;

        match self.route {
            Route::Home if self.home.form.is_open() => self.handle_form_key(key).await,
            Route::Home => self.handle_home_key(key).await,
            Route::SignIn | Route::SignUp => self.handle_auth_key(key).await,
            Route::About => {
                let _ = self.handle_nav_key(key).await;
            }
        }
    }

    /// Keys shared by every non-form context. Returns true when handled.
    async fn handle_nav_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') => self.route = Route::Home,
            KeyCode::Char('b') => self.route = Route::About,
            KeyCode::Char('t') => self.theme = self.theme.toggled(),
            KeyCode::Char('l') => self.go_sign_in(),
            KeyCode::Char('n') => {
                self.route = Route::SignUp;
                self.auth.clear_status();
            }
            KeyCode::Char('o') => {
                if self.session.is_signed_in() {
                    self.session.sign_out().await;
                    self.go_sign_in();
                }
            }
            _ => return false,
        }
        true
    }

    async fn handle_home_key(&mut self, key: KeyEvent) {
        if self.handle_nav_key(key).await {
            return;
        }
        match key.code {
            KeyCode::Char('a') => self.home.form.open(),
            KeyCode::Char('r') => self.pending_load = true,
            KeyCode::Up => self.home.select_prev(),
            KeyCode::Down => self.home.select_next(self.controller.tasks().len()),
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_task_id() {
                    if self.controller.toggle_complete(id).await == ActionOutcome::SignInRequired
                    {
                        self.go_sign_in();
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_task_id() {
                    if self.controller.delete_task(id).await == ActionOutcome::SignInRequired {
                        self.go_sign_in();
                    }
                }
            }
            _ => {}
        }
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(action) = self.home.form.handle_key(key) else {
            return;
        };
        match action {
            FormAction::Cancel => self.home.form.reset(),
            FormAction::Submit(draft) => match self.controller.add_task(draft).await {
                // Fields reset to empty only once the store confirmed.
                ActionOutcome::Completed => self.home.form.reset(),
                ActionOutcome::SignInRequired => self.go_sign_in(),
                ActionOutcome::Ignored | ActionOutcome::Failed => {}
            },
        }
    }

    async fn handle_auth_key(&mut self, key: KeyEvent) {
        let Some(mode) = self.route.auth_mode() else {
            return;
        };
        let Some(action) = self.auth.handle_key(key) else {
            return;
        };
        match action {
            AuthAction::Leave => {
                self.route = Route::Home;
                self.auth.clear_status();
            }
            AuthAction::SwitchMode => {
                self.route = match mode {
                    AuthMode::SignIn => Route::SignUp,
                    AuthMode::SignUp => Route::SignIn,
                };
                self.auth.clear_status();
            }
            AuthAction::Submit { email, password } => {
                self.auth.busy = true;
                let status = match mode {
                    AuthMode::SignIn => self.session.sign_in(&email, &password).await,
                    AuthMode::SignUp => self.session.sign_up(&email, &password).await,
                };
                self.auth.busy = false;
                let signed_in = status == AuthStatus::SignedIn;
                self.auth.status = Some(status);
                if signed_in {
                    // Navigate home; the list refetches on mount.
                    self.route = Route::Home;
                    self.pending_load = true;
                }
            }
        }
    }

    fn selected_task_id(&self) -> Option<crate::store::TaskId> {
        self.controller
            .tasks()
            .get(self.home.selected)
            .map(|t| t.id)
    }

    fn go_sign_in(&mut self) {
        self.route = Route::SignIn;
        self.auth.clear_status();
    }
}
