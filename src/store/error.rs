//! Error types for the remote task store client.
//!
//! Each variant carries a stable reason code included in the Display output
//! and accessible via [`StoreError::code()`]. Callers branch on the variant
//! or the code, never on message text.

/// Stable reason codes for store failures.
pub mod reason_codes {
    /// The HTTP request could not be completed (connect, TLS, I/O).
    pub const STORE_HTTP: &str = "STORE_HTTP";

    /// The store answered with a non-success status.
    pub const STORE_API: &str = "STORE_API";

    /// The response body could not be decoded into the expected shape.
    pub const STORE_DECODE: &str = "STORE_DECODE";
}

/// Errors produced by the remote task store client.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Transport-level failure before a status line was received.
    #[error("[{}] {}", reason_codes::STORE_HTTP, .0)]
    Http(String),

    /// The store rejected the request.
    #[error("[{}] status {status}: {message}", reason_codes::STORE_API)]
    Api {
        /// HTTP status code returned by the store.
        status: u16,
        /// Server-provided message, or the raw body when none was present.
        message: String,
    },

    /// A success response carried an unexpected payload.
    #[error("[{}] {}", reason_codes::STORE_DECODE, .0)]
    Decode(String),
}

impl StoreError {
    /// The stable reason code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => reason_codes::STORE_HTTP,
            Self::Api { .. } => reason_codes::STORE_API,
            Self::Decode(_) => reason_codes::STORE_DECODE,
        }
    }
}

/// Convenience alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_code() {
        let err = StoreError::Http("connection refused".into());
        assert_eq!(err.code(), "STORE_HTTP");
    }

    #[test]
    fn api_code_and_display() {
        let err = StoreError::Api {
            status: 401,
            message: "JWT expired".into(),
        };
        assert_eq!(err.code(), "STORE_API");
        let display = err.to_string();
        assert!(display.starts_with("[STORE_API]"));
        assert!(display.contains("401"));
        assert!(display.contains("JWT expired"));
    }

    #[test]
    fn decode_code() {
        let err = StoreError::Decode("expected an array of rows".into());
        assert_eq!(err.code(), "STORE_DECODE");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }
}
