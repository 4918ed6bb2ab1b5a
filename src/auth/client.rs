//! REST implementation of the session provider client.
//!
//! The identity service lives under `/auth/v1` on the same hosted backend
//! as the task table: password grant for sign-in, a signup endpoint that
//! registers an email-confirmation redirect target, logout, and a user
//! endpoint used to revalidate persisted sessions.

use async_trait::async_trait;
use serde::Deserialize;

use crate::auth::error::AuthError;
use crate::auth::types::{Session, SessionUser};
use crate::auth::AuthApi;
use crate::config::AppConfig;

/// Session provider client speaking the hosted identity API.
pub struct RestAuthClient {
    http: reqwest::Client,
    base: String,
    api_key: String,
}

impl std::fmt::Debug for RestAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestAuthClient")
            .field("base", &self.base)
            .finish()
    }
}

/// Successful password-grant response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    user: WireUser,
}

/// The slice of the provider's user object this application keeps.
#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    email: String,
}

impl From<WireUser> for SessionUser {
    fn from(wire: WireUser) -> Self {
        Self {
            id: wire.id,
            email: wire.email,
        }
    }
}

/// Error body shape used by the identity service.
#[derive(Debug, Default, Deserialize)]
struct WireAuthError {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl RestAuthClient {
    /// Create a client from the resolved configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: config.store_base(),
            api_key: config.store_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base)
    }

    fn keyed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("apikey", &self.api_key)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AuthError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_auth_error(status.as_u16(), &body))
    }
}

/// Map a non-success identity response to a typed [`AuthError`].
///
/// The service identifies failure classes with an `error_code` field;
/// credential and confirmation failures get dedicated variants so the UI
/// never inspects message text.
fn map_auth_error(status: u16, body: &str) -> AuthError {
    let wire: WireAuthError = serde_json::from_str(body).unwrap_or_default();
    let message = wire
        .msg
        .or(wire.error_description)
        .unwrap_or_else(|| body.to_owned());
    match wire.error_code.as_deref() {
        Some("invalid_credentials") | Some("invalid_grant") => {
            AuthError::InvalidCredentials(message)
        }
        Some("email_not_confirmed") => AuthError::EmailNotConfirmed(message),
        _ => AuthError::Api { status, message },
    }
}

#[async_trait]
impl AuthApi for RestAuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let request = self
            .http
            .post(self.url("token"))
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }));
        let response = self
            .keyed(request)
            .send()
            .await
            .map_err(|e| AuthError::Http(format!("sign-in request failed: {e}")))?;
        let response = Self::check_status(response).await?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Decode(format!("token payload: {e}")))?;
        Ok(Session {
            user: token.user.into(),
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect: Option<&str>,
    ) -> Result<(), AuthError> {
        let mut request = self
            .http
            .post(self.url("signup"))
            .json(&serde_json::json!({ "email": email, "password": password }));
        if let Some(target) = redirect {
            request = request.query(&[("redirect_to", target)]);
        }
        let response = self
            .keyed(request)
            .send()
            .await
            .map_err(|e| AuthError::Http(format!("sign-up request failed: {e}")))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let request = self
            .http
            .post(self.url("logout"))
            .header("Authorization", format!("Bearer {access_token}"));
        let response = self
            .keyed(request)
            .send()
            .await
            .map_err(|e| AuthError::Http(format!("sign-out request failed: {e}")))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn fetch_user(&self, access_token: &str) -> Result<SessionUser, AuthError> {
        let request = self
            .http
            .get(self.url("user"))
            .header("Authorization", format!("Bearer {access_token}"));
        let response = self
            .keyed(request)
            .send()
            .await
            .map_err(|e| AuthError::Http(format!("user request failed: {e}")))?;
        let response = Self::check_status(response).await?;
        let user: WireUser = response
            .json()
            .await
            .map_err(|e| AuthError::Decode(format!("user payload: {e}")))?;
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        let lookup = |var: &'static str| match var {
            crate::config::STORE_URL_VAR => Some("https://project.example.co".to_owned()),
            crate::config::STORE_KEY_VAR => Some("anon-key".to_owned()),
            _ => None,
        };
        match AppConfig::from_lookup(lookup) {
            Ok(c) => c,
            Err(_) => unreachable!("test config must resolve"),
        }
    }

    #[test]
    fn urls_are_rooted_under_auth_v1() {
        let client = RestAuthClient::new(&test_config());
        assert_eq!(client.url("token"), "https://project.example.co/auth/v1/token");
        assert_eq!(
            client.url("signup"),
            "https://project.example.co/auth/v1/signup"
        );
    }

    #[test]
    fn invalid_credentials_mapped_by_error_code() {
        let body = r#"{"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        let err = map_auth_error(400, body);
        assert!(matches!(&err, AuthError::InvalidCredentials(m)
            if m == "Invalid login credentials"));
    }

    #[test]
    fn legacy_invalid_grant_mapped_to_credentials() {
        let body = r#"{"error_code":"invalid_grant","error_description":"wrong password"}"#;
        let err = map_auth_error(400, body);
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
    }

    #[test]
    fn unconfirmed_email_mapped_by_error_code() {
        let body = r#"{"error_code":"email_not_confirmed","msg":"Email not confirmed"}"#;
        let err = map_auth_error(400, body);
        assert!(matches!(err, AuthError::EmailNotConfirmed(_)));
    }

    #[test]
    fn unknown_error_code_falls_back_to_api() {
        let body = r#"{"error_code":"over_request_rate_limit","msg":"slow down"}"#;
        let err = map_auth_error(429, body);
        assert!(matches!(
            &err,
            AuthError::Api { status: 429, message } if message == "slow down"
        ));
    }

    #[test]
    fn non_json_error_body_passed_through() {
        let err = map_auth_error(502, "Bad Gateway");
        assert!(matches!(
            &err,
            AuthError::Api { status: 502, message } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn debug_omits_api_key() {
        let client = RestAuthClient::new(&test_config());
        let debug = format!("{client:?}");
        assert!(!debug.contains("anon-key"));
    }
}
