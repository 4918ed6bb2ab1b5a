//! Terminal entrypoint.
//!
//! Startup order: logging → configuration (fatal when the two required
//! environment values are missing) → clients → session restore → event
//! loop. Tracing goes to rotating files under the data directory; the
//! terminal itself belongs to the UI.

use std::io;
use std::sync::Arc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use taskmaster::auth::{RestAuthClient, SessionManager};
use taskmaster::config::AppConfig;
use taskmaster::controller::TaskListController;
use taskmaster::store::RestTaskStore;
use taskmaster::theme::Theme;
use taskmaster::ui::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().map_err(|e| {
        // Logging is not up yet; this is the one message that goes to the
        // terminal directly.
        eprintln!("taskmaster: {e}");
        anyhow::anyhow!("configuration error: {e}")
    })?;

    let file_appender = tracing_appender::rolling::daily(config.log_dir(), "taskmaster.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!(store = %config.store_url, "taskmaster starting");

    let auth_client = Arc::new(RestAuthClient::new(&config));
    let session = Arc::new(SessionManager::new(
        auth_client,
        config.session_file(),
        config.email_redirect.as_ref().map(|u| u.to_string()),
    ));
    session.restore().await;

    let store = Arc::new(RestTaskStore::new(&config, session.subscribe()));
    let controller = TaskListController::new(store, session.subscribe());
    let mut app = App::new(controller, Arc::clone(&session), Theme::default());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.map_err(|e| {
        tracing::error!(error = %e, "taskmaster exited with error");
        anyhow::anyhow!("terminal loop failed: {e}")
    })?;

    tracing::info!("taskmaster shut down cleanly");
    Ok(())
}
