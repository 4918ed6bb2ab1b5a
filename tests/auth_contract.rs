//! Session provider contract tests.
//!
//! Verify the identity API wire shape (password grant, sign-up redirect
//! registration, logout, user fetch), typed error mapping, and the session
//! manager's publish/persist behavior on top of the real client.

use std::sync::Arc;

use taskmaster::auth::error::reason_codes;
use taskmaster::auth::{AuthApi, AuthError, AuthStatus, RestAuthClient, SessionManager};
use taskmaster::config::{AppConfig, STORE_KEY_VAR, STORE_URL_VAR};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AppConfig {
    let uri = server.uri();
    let lookup = move |var: &'static str| match var {
        STORE_URL_VAR => Some(uri.clone()),
        STORE_KEY_VAR => Some("anon-key".to_owned()),
        _ => None,
    };
    match AppConfig::from_lookup(lookup) {
        Ok(c) => c,
        Err(e) => unreachable!("mock config must resolve: {e}"),
    }
}

fn token_body() -> serde_json::Value {
    serde_json::json!({
        "access_token": "user-jwt",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh-1",
        "user": {
            "id": "user-1",
            "email": "a@example.com",
            "aud": "authenticated",
            "role": "authenticated",
            "app_metadata": { "provider": "email" }
        }
    })
}

#[tokio::test]
async fn sign_in_uses_the_password_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .and(body_partial_json(serde_json::json!({
            "email": "a@example.com",
            "password": "hunter2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestAuthClient::new(&config_for(&server));
    let result = client.sign_in("a@example.com", "hunter2").await;
    assert!(result.is_ok());
    if let Ok(session) = result {
        assert_eq!(session.access_token, "user-jwt");
        assert_eq!(session.refresh_token, "refresh-1");
        // Only the typed record survives; the provider's extra fields are
        // dropped at the wire boundary.
        assert_eq!(session.user.id, "user-1");
        assert_eq!(session.user.email, "a@example.com");
    }
}

#[tokio::test]
async fn wrong_password_maps_to_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error_code": "invalid_credentials",
            "msg": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let client = RestAuthClient::new(&config_for(&server));
    let result = client.sign_in("a@example.com", "wrong").await;
    match result {
        Err(err) => {
            assert!(matches!(err, AuthError::InvalidCredentials(_)));
            assert_eq!(err.code(), reason_codes::INVALID_CREDENTIALS);
        }
        Ok(_) => unreachable!("sign-in must fail"),
    }
}

#[tokio::test]
async fn unconfirmed_email_maps_to_its_own_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error_code": "email_not_confirmed",
            "msg": "Email not confirmed"
        })))
        .mount(&server)
        .await;

    let client = RestAuthClient::new(&config_for(&server));
    let result = client.sign_in("a@example.com", "pw").await;
    assert!(matches!(result, Err(AuthError::EmailNotConfirmed(_))));
}

#[tokio::test]
async fn sign_up_registers_the_redirect_target() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(query_param("redirect_to", "https://app.example.com/auth/callback"))
        .and(body_partial_json(serde_json::json!({
            "email": "new@example.com",
            "password": "hunter2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "user-2",
            "email": "new@example.com",
            "confirmation_sent_at": "2026-08-08T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestAuthClient::new(&config_for(&server));
    let result = client
        .sign_up(
            "new@example.com",
            "hunter2",
            Some("https://app.example.com/auth/callback"),
        )
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn sign_out_revokes_the_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestAuthClient::new(&config_for(&server));
    assert!(client.sign_out("user-jwt").await.is_ok());
}

#[tokio::test]
async fn fetch_user_returns_the_typed_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "user-1",
            "email": "a@example.com",
            "role": "authenticated"
        })))
        .mount(&server)
        .await;

    let client = RestAuthClient::new(&config_for(&server));
    let user = client.fetch_user("user-jwt").await;
    assert!(user.is_ok());
    if let Ok(user) = user {
        assert_eq!(user.id, "user-1");
        assert_eq!(user.email, "a@example.com");
    }
}

#[tokio::test]
async fn manager_round_trip_publishes_persists_and_clears() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let dir = match tempfile::tempdir() {
        Ok(d) => d,
        Err(_) => unreachable!("tempdir creation should not fail"),
    };
    let session_file = dir.path().join("session.toml");
    let client = Arc::new(RestAuthClient::new(&config_for(&server)));
    let manager = SessionManager::new(client, session_file.clone(), None);
    let mut rx = manager.subscribe();

    let status = manager.sign_in("a@example.com", "hunter2").await;
    assert_eq!(status, AuthStatus::SignedIn);
    assert!(session_file.exists());
    assert_eq!(
        rx.borrow_and_update().as_ref().map(|s| s.user.email.clone()),
        Some("a@example.com".to_owned())
    );

    manager.sign_out().await;
    assert!(!session_file.exists());
    assert!(rx.borrow_and_update().is_none());
}

#[tokio::test]
async fn manager_restore_revalidates_against_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "user-1",
            "email": "a@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = match tempfile::tempdir() {
        Ok(d) => d,
        Err(_) => unreachable!("tempdir creation should not fail"),
    };
    let session_file = dir.path().join("session.toml");
    let client: Arc<dyn AuthApi> = Arc::new(RestAuthClient::new(&config_for(&server)));

    // First process: sign in, which persists the session.
    let first = SessionManager::new(Arc::clone(&client), session_file.clone(), None);
    let _ = first.sign_in("a@example.com", "hunter2").await;
    drop(first);

    // Second process: restore from disk and revalidate.
    let second = SessionManager::new(client, session_file, None);
    second.restore().await;
    assert!(second.is_signed_in());
    assert_eq!(
        second.current_user().map(|u| u.id),
        Some("user-1".to_owned())
    );
}
