//! Session provider: typed identity records, the REST client for the
//! hosted identity API, and the session lifecycle manager.
//!
//! The [`AuthApi`] trait is the seam the session manager depends on;
//! [`RestAuthClient`] is the production implementation.

pub mod client;
pub mod error;
pub mod manager;
pub mod persist;
pub mod types;

use async_trait::async_trait;

pub use client::RestAuthClient;
pub use error::AuthError;
pub use manager::SessionManager;
pub use types::{AuthStatus, Session, SessionUser};

/// Operations the hosted identity service exposes to this client.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange email + password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Register a new account. `redirect` is the email-confirmation
    /// redirect target; success means a confirmation email was sent.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect: Option<&str>,
    ) -> Result<(), AuthError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// Fetch the user behind `access_token`; used to revalidate persisted
    /// sessions at startup.
    async fn fetch_user(&self, access_token: &str) -> Result<SessionUser, AuthError>;
}
