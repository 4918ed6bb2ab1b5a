//! Error types for the session provider client.
//!
//! Each variant carries a stable reason code; the UI classifies outcomes by
//! variant/code, never by matching message text.

/// Stable reason codes for authentication failures.
pub mod reason_codes {
    /// The HTTP request could not be completed.
    pub const AUTH_HTTP: &str = "AUTH_HTTP";

    /// The identity service rejected the request for a reason not covered
    /// by a dedicated code.
    pub const AUTH_API: &str = "AUTH_API";

    /// A success response carried an unexpected payload.
    pub const AUTH_DECODE: &str = "AUTH_DECODE";

    /// Wrong email/password combination.
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";

    /// The account exists but its email address is not confirmed yet.
    pub const EMAIL_NOT_CONFIRMED: &str = "EMAIL_NOT_CONFIRMED";

    /// The session file could not be read or written.
    pub const SESSION_PERSIST: &str = "SESSION_PERSIST";
}

/// Errors produced by the session provider client and session persistence.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Transport-level failure before a status line was received.
    #[error("[{}] {}", reason_codes::AUTH_HTTP, .0)]
    Http(String),

    /// The identity service rejected the request.
    #[error("[{}] status {status}: {message}", reason_codes::AUTH_API)]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or the raw body when none was present.
        message: String,
    },

    /// A success response carried an unexpected payload.
    #[error("[{}] {}", reason_codes::AUTH_DECODE, .0)]
    Decode(String),

    /// Wrong email/password combination.
    #[error("[{}] {}", reason_codes::INVALID_CREDENTIALS, .0)]
    InvalidCredentials(String),

    /// The account's email address has not been confirmed.
    #[error("[{}] {}", reason_codes::EMAIL_NOT_CONFIRMED, .0)]
    EmailNotConfirmed(String),

    /// The session file could not be read or written.
    #[error("[{}] {}", reason_codes::SESSION_PERSIST, .0)]
    Persist(String),
}

impl AuthError {
    /// The stable reason code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => reason_codes::AUTH_HTTP,
            Self::Api { .. } => reason_codes::AUTH_API,
            Self::Decode(_) => reason_codes::AUTH_DECODE,
            Self::InvalidCredentials(_) => reason_codes::INVALID_CREDENTIALS,
            Self::EmailNotConfirmed(_) => reason_codes::EMAIL_NOT_CONFIRMED,
            Self::Persist(_) => reason_codes::SESSION_PERSIST,
        }
    }

    /// The inner message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Http(m)
            | Self::Decode(m)
            | Self::InvalidCredentials(m)
            | Self::EmailNotConfirmed(m)
            | Self::Persist(m) => m.clone(),
            Self::Api { message, .. } => message.clone(),
        }
    }

    /// Whether this failure means the stored credentials are no longer
    /// valid (as opposed to a transient transport problem).
    pub fn invalidates_session(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials(_) | Self::Api { status: 401 | 403, .. }
        )
    }
}

/// Convenience alias for auth results.
pub type Result<T> = std::result::Result<T, AuthError>;
