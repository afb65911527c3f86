#![allow(clippy::unwrap_used)]
// Session lifecycle and profile updates against a mocked backend.

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use campus_api::models::Role;
use campus_core::{
    Campus, ClientConfig, CoreError, PreferenceKey, SessionState, View, nav,
};

async fn setup(token: Option<&str>) -> (MockServer, Campus) {
    let server = MockServer::start().await;
    let url = url::Url::parse(&format!("{}/api", server.uri())).unwrap();
    let config = ClientConfig::new(url).with_token(token.map(|t| SecretString::from(t.to_owned())));
    let campus = Campus::new(&config).unwrap();
    (server, campus)
}

fn admin_json() -> serde_json::Value {
    json!({ "id": 1, "name": "Admin", "email": "admin@school.test", "role": "admin" })
}

// ── Restore ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_restore_without_token_is_anonymous_without_request() {
    let (server, campus) = setup(None).await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin_json()))
        .expect(0)
        .mount(&server)
        .await;

    let session = campus.session();
    assert_eq!(session.state(), SessionState::Uninitialized);
    assert_eq!(session.restore().await, SessionState::Anonymous);
}

#[tokio::test]
async fn test_restore_with_valid_token_authenticates() {
    let (server, campus) = setup(Some("tok-1")).await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin_json()))
        .mount(&server)
        .await;

    let mut rx = campus.session().subscribe();
    let state = campus.session().restore().await;
    assert!(matches!(state, SessionState::Authenticated(ref u) if u.role == Role::Admin));
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().user().unwrap().name, "Admin");
}

#[tokio::test]
async fn test_restore_with_rejected_token_is_anonymous() {
    let (server, campus) = setup(Some("stale")).await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthenticated." })))
        .mount(&server)
        .await;

    assert_eq!(campus.session().restore().await, SessionState::Anonymous);
    assert!(!campus.client().has_token());
}

// ── Login / logout ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_token_and_logout_clears_it_on_failure() {
    let (server, campus) = setup(None).await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-9",
            "user": admin_json()
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = campus.session();
    let (user, token) = session
        .login("admin@school.test", &SecretString::from("pw".to_owned()))
        .await
        .unwrap();
    assert_eq!(user.email, "admin@school.test");
    assert_eq!(token.expose_secret(), "tok-9");
    assert!(campus.client().has_token());

    assert!(session.logout().await.is_err());
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(!campus.client().has_token());
}

#[tokio::test]
async fn test_empty_credentials_are_rejected_locally() {
    let (_server, campus) = setup(None).await;
    let err = campus
        .session()
        .login("  ", &SecretString::from(String::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput { .. }));
    assert_eq!(campus.session().state(), SessionState::Uninitialized);
}

#[tokio::test]
async fn test_role_gates_views() {
    let (server, campus) = setup(Some("tok")).await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "name": "Tess", "email": "tess@school.test", "role": "teacher"
        })))
        .mount(&server)
        .await;

    campus.session().restore().await;
    let role = campus.session().role().unwrap();
    assert!(nav::can_access(role, View::Attendance).is_ok());
    assert!(nav::can_access(role, View::Teachers).is_err());
}

// ── Profile ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_toggle_preference_rolls_back_on_failure() {
    let (server, campus) = setup(Some("tok")).await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin_json()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/profile"))
        .and(body_json(json!({ "settings": {
            "notifications": true, "darkMode": true, "biometric": true, "analytics": true
        }})))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "Storage offline" })))
        .expect(1)
        .mount(&server)
        .await;

    campus.session().restore().await;
    let profile = campus.profile();
    let err = profile
        .toggle_preference(PreferenceKey::DarkMode)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Failed to update settings: Storage offline");

    let prefs = campus.session().current_user().unwrap().preferences();
    assert!(!prefs.dark_mode);
}

#[tokio::test]
async fn test_profile_response_replaces_session_user() {
    let (server, campus) = setup(Some("tok")).await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin_json()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/profile"))
        .and(body_json(json!({ "name": "Head Admin", "email": "head@school.test" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Profile updated",
            "user": { "id": 1, "name": "Head Admin", "email": "head@school.test", "role": "admin" }
        })))
        .mount(&server)
        .await;

    campus.session().restore().await;
    campus
        .profile()
        .update_personal("Head Admin", "head@school.test")
        .await
        .unwrap();
    assert_eq!(campus.session().current_user().unwrap().name, "Head Admin");
}

#[tokio::test]
async fn test_password_mismatch_never_reaches_server() {
    let (server, campus) = setup(Some("tok")).await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin_json()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    campus.session().restore().await;
    let err = campus
        .profile()
        .change_password(
            &SecretString::from("one".to_owned()),
            &SecretString::from("two".to_owned()),
        )
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Passwords do not match");
}
