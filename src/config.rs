//! Environment-sourced application configuration.
//!
//! The hosted backend is addressed by two required values supplied through
//! the environment. A missing or malformed value is a startup-time fatal
//! misconfiguration: [`AppConfig::from_env`] returns an error and the binary
//! exits before any network activity.

use std::path::PathBuf;

use url::Url;

/// Base URL of the hosted backend (required).
pub const STORE_URL_VAR: &str = "TASKMASTER_STORE_URL";
/// Publishable API key for the hosted backend (required).
pub const STORE_KEY_VAR: &str = "TASKMASTER_STORE_KEY";
/// Email-confirmation redirect target registered at sign-up (optional).
pub const REDIRECT_URL_VAR: &str = "TASKMASTER_REDIRECT_URL";
/// Overrides the platform data directory for the session file and logs (optional).
pub const DATA_DIR_VAR: &str = "TASKMASTER_DATA_DIR";

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// A variable is present but its value cannot be used.
    #[error("invalid value for {var}: {reason}")]
    InvalidVar {
        /// The offending variable name.
        var: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Application configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the hosted backend (table API and identity API share it).
    pub store_url: Url,
    /// Publishable API key sent as `apikey` on every request.
    pub store_key: String,
    /// Optional email-confirmation redirect target for sign-up.
    pub email_redirect: Option<Url>,
    /// Optional override of the platform data directory.
    pub data_dir_override: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or any
    /// value fails validation. Callers treat this as fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through a variable lookup function.
    ///
    /// `from_env` delegates here; tests supply a closure over a map instead
    /// of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let store_url = required(&lookup, STORE_URL_VAR)?;
        let store_url = parse_url(STORE_URL_VAR, &store_url)?;

        let store_key = required(&lookup, STORE_KEY_VAR)?;

        let email_redirect = match lookup(REDIRECT_URL_VAR) {
            Some(raw) if !raw.trim().is_empty() => Some(parse_url(REDIRECT_URL_VAR, &raw)?),
            _ => None,
        };

        let data_dir_override = lookup(DATA_DIR_VAR)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        let config = Self {
            store_url,
            store_key,
            email_redirect,
            data_dir_override,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the resolved configuration.
    ///
    /// Checks:
    /// - the store URL scheme is `http` or `https`
    /// - the publishable key is non-empty after trimming
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.store_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::InvalidVar {
                    var: STORE_URL_VAR,
                    reason: format!("unsupported URL scheme '{other}'"),
                });
            }
        }
        if self.store_key.trim().is_empty() {
            return Err(ConfigError::MissingVar(STORE_KEY_VAR));
        }
        Ok(())
    }

    /// Directory holding the session file and log files.
    ///
    /// The explicit override wins; otherwise the platform data directory
    /// (falling back to the working directory when the platform reports none).
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir_override {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("taskmaster"),
        }
    }

    /// Path of the persisted session file.
    pub fn session_file(&self) -> PathBuf {
        self.data_dir().join("session.toml")
    }

    /// Directory for rotating log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    /// The store base URL as a string without a trailing slash, ready for
    /// path concatenation.
    pub fn store_base(&self) -> String {
        self.store_url.as_str().trim_end_matches('/').to_owned()
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidVar {
        var,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, (*v).to_owned())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn minimal_config_resolves() {
        let lookup = lookup_from(&[
            (STORE_URL_VAR, "https://project.example.co"),
            (STORE_KEY_VAR, "publishable-key"),
        ]);
        let config = AppConfig::from_lookup(lookup);
        assert!(config.is_ok());
        let config = match config {
            Ok(c) => c,
            Err(_) => unreachable!(),
        };
        assert_eq!(config.store_key, "publishable-key");
        assert!(config.email_redirect.is_none());
        assert!(config.data_dir_override.is_none());
    }

    #[test]
    fn missing_store_url_is_fatal() {
        let lookup = lookup_from(&[(STORE_KEY_VAR, "key")]);
        let err = AppConfig::from_lookup(lookup);
        assert!(matches!(err, Err(ConfigError::MissingVar(STORE_URL_VAR))));
    }

    #[test]
    fn missing_store_key_is_fatal() {
        let lookup = lookup_from(&[(STORE_URL_VAR, "https://project.example.co")]);
        let err = AppConfig::from_lookup(lookup);
        assert!(matches!(err, Err(ConfigError::MissingVar(STORE_KEY_VAR))));
    }

    #[test]
    fn empty_store_key_is_fatal() {
        let lookup = lookup_from(&[
            (STORE_URL_VAR, "https://project.example.co"),
            (STORE_KEY_VAR, "   "),
        ]);
        let err = AppConfig::from_lookup(lookup);
        assert!(matches!(err, Err(ConfigError::MissingVar(STORE_KEY_VAR))));
    }

    #[test]
    fn malformed_url_rejected() {
        let lookup = lookup_from(&[(STORE_URL_VAR, "not a url"), (STORE_KEY_VAR, "key")]);
        let err = AppConfig::from_lookup(lookup);
        assert!(matches!(
            err,
            Err(ConfigError::InvalidVar {
                var: STORE_URL_VAR,
                ..
            })
        ));
    }

    #[test]
    fn non_http_scheme_rejected() {
        let lookup = lookup_from(&[
            (STORE_URL_VAR, "ftp://project.example.co"),
            (STORE_KEY_VAR, "key"),
        ]);
        let err = AppConfig::from_lookup(lookup);
        assert!(matches!(
            err,
            Err(ConfigError::InvalidVar {
                var: STORE_URL_VAR,
                ..
            })
        ));
    }

    #[test]
    fn optional_redirect_parsed() {
        let lookup = lookup_from(&[
            (STORE_URL_VAR, "https://project.example.co"),
            (STORE_KEY_VAR, "key"),
            (REDIRECT_URL_VAR, "https://app.example.com/auth/callback"),
        ]);
        let config = AppConfig::from_lookup(lookup);
        assert!(config.is_ok());
        let redirect = config.ok().and_then(|c| c.email_redirect);
        assert_eq!(
            redirect.map(|u| u.to_string()),
            Some("https://app.example.com/auth/callback".to_owned())
        );
    }

    #[test]
    fn data_dir_override_respected() {
        let lookup = lookup_from(&[
            (STORE_URL_VAR, "https://project.example.co"),
            (STORE_KEY_VAR, "key"),
            (DATA_DIR_VAR, "/tmp/taskmaster-test"),
        ]);
        let config = AppConfig::from_lookup(lookup);
        assert!(config.is_ok());
        if let Ok(config) = config {
            assert_eq!(config.data_dir(), PathBuf::from("/tmp/taskmaster-test"));
            assert_eq!(
                config.session_file(),
                PathBuf::from("/tmp/taskmaster-test/session.toml")
            );
        }
    }

    #[test]
    fn store_base_strips_trailing_slash() {
        let lookup = lookup_from(&[
            (STORE_URL_VAR, "https://project.example.co/"),
            (STORE_KEY_VAR, "key"),
        ]);
        let config = AppConfig::from_lookup(lookup);
        assert!(config.is_ok());
        if let Ok(config) = config {
            assert_eq!(config.store_base(), "https://project.example.co");
        }
    }
}
