//! Session lifecycle: sign-in, sign-up, sign-out, change notification, and
//! persistence across restarts.
//!
//! [`SessionManager`] owns the current `Option<Session>` behind a
//! `tokio::sync::watch` channel. Subscribers (the nav indicator, the task
//! controller, the store client) hold a receiver for their lifetime;
//! dropping it is the unsubscribe.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::persist;
use crate::auth::types::{AuthStatus, Session, SessionUser};
use crate::auth::AuthApi;

/// Owns the current session and mediates every identity operation.
pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    session_file: PathBuf,
    email_redirect: Option<String>,
    tx: watch::Sender<Option<Session>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_file", &self.session_file)
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}

impl SessionManager {
    /// Create a manager in the signed-out state.
    pub fn new(
        api: Arc<dyn AuthApi>,
        session_file: PathBuf,
        email_redirect: Option<String>,
    ) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            api,
            session_file,
            email_redirect,
            tx,
        }
    }

    /// Subscribe to session changes. The receiver always reflects the
    /// latest state; dropping it ends the subscription.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<SessionUser> {
        self.tx.borrow().as_ref().map(|s| s.user.clone())
    }

    /// Whether a session is live.
    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Restore the persisted session, revalidating it with the provider.
    ///
    /// A stale session (provider says the token is no longer valid) is
    /// discarded along with its file. A transport failure leaves the file
    /// in place but starts signed out; the next launch retries.
    pub async fn restore(&self) {
        let session = match persist::load_session(&self.session_file) {
            Ok(Some(session)) => session,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session file");
                if let Err(e) = persist::clear_session(&self.session_file) {
                    tracing::warn!(error = %e, "could not remove session file");
                }
                return;
            }
        };

        match self.api.fetch_user(&session.access_token).await {
            Ok(user) => {
                tracing::info!(email = %user.email, "restored persisted session");
                self.tx.send_replace(Some(Session { user, ..session }));
            }
            Err(e) if e.invalidates_session() => {
                tracing::info!(code = e.code(), "persisted session no longer valid");
                if let Err(e) = persist::clear_session(&self.session_file) {
                    tracing::warn!(error = %e, "could not remove session file");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not revalidate session, starting signed out");
            }
        }
    }

    /// Password sign-in. On success the session is published and persisted.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthStatus {
        match self.api.sign_in(email, password).await {
            Ok(session) => {
                if let Err(e) = persist::store_session(&self.session_file, &session) {
                    // The live session still works; it just won't survive a restart.
                    tracing::warn!(error = %e, "session not persisted");
                }
                tracing::info!(email = %session.user.email, "signed in");
                self.tx.send_replace(Some(session));
                AuthStatus::SignedIn
            }
            Err(e) => {
                tracing::error!(code = e.code(), error = %e, "sign-in failed");
                AuthStatus::Failed {
                    code: e.code(),
                    message: e.message(),
                }
            }
        }
    }

    /// Password sign-up, registering the configured email-confirmation
    /// redirect target. Success means a confirmation email was sent, not a
    /// live session.
    pub async fn sign_up(&self, email: &str, password: &str) -> AuthStatus {
        match self
            .api
            .sign_up(email, password, self.email_redirect.as_deref())
            .await
        {
            Ok(()) => {
                tracing::info!("sign-up accepted, confirmation email pending");
                AuthStatus::ConfirmationSent
            }
            Err(e) => {
                tracing::error!(code = e.code(), error = %e, "sign-up failed");
                AuthStatus::Failed {
                    code: e.code(),
                    message: e.message(),
                }
            }
        }
    }

    /// Sign out. The provider call is best-effort; local state and the
    /// session file are cleared regardless.
    pub async fn sign_out(&self) {
        let token = self
            .tx
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone());
        if let Some(token) = token {
            if let Err(e) = self.api.sign_out(&token).await {
                tracing::warn!(code = e.code(), error = %e, "provider sign-out failed");
            }
        }
        if let Err(e) = persist::clear_session(&self.session_file) {
            tracing::warn!(error = %e, "could not remove session file");
        }
        tracing::info!("signed out");
        self.tx.send_replace(None);
    }
}
