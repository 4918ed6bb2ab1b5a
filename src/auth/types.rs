//! Typed session records.
//!
//! The identity service describes users as a large untyped bag of fields;
//! only the two this application needs cross the wire boundary.

use serde::{Deserialize, Serialize};

/// Minimal typed identity record for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Opaque user identifier assigned by the identity service.
    pub id: String,
    /// The user's email address.
    pub email: String,
}

/// A live (or persisted) authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token attached to authenticated requests.
    pub access_token: String,
    /// Opaque refresh token, kept for completeness of the persisted record.
    pub refresh_token: String,
    /// The signed-in user.
    pub user: SessionUser,
}

/// Typed outcome of an auth form submission.
///
/// The UI derives success/error styling from the variant; no message text
/// is ever inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// Password sign-in succeeded; a session is live.
    SignedIn,
    /// Sign-up accepted; a confirmation email is on its way.
    ConfirmationSent,
    /// The operation failed.
    Failed {
        /// Stable reason code from [`crate::auth::error::reason_codes`].
        code: &'static str,
        /// Human-readable description for display.
        message: String,
    },
}

impl AuthStatus {
    /// Whether this status represents a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
