use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use portfolio_backend::config::{AppConfig, AuthConfig};
use portfolio_backend::infrastructure::database::run_migrations;
use portfolio_backend::services::artwork_service::ArtworkService;
use portfolio_backend::services::auth_service::AuthService;
use portfolio_backend::services::storage::LocalStorageService;
use portfolio_backend::utils::auth::create_jwt;
use portfolio_backend::{AppState, create_app};
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

async fn setup_app() -> (Router, TempDir) {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1);
    let db = Database::connect(opt).await.unwrap();
    run_migrations(&db).await.unwrap();

    let tmp = tempfile::tempdir().unwrap();

    let config = AppConfig {
        upload_dir: tmp.path().display().to_string(),
        max_upload_size: 8 * 1024 * 1024,
        auth: AuthConfig {
            admin_username: "admin".to_string(),
            admin_password_hash: AuthService::hash_password("password123").unwrap(),
            jwt_secret: "test_secret".to_string(),
            token_expiry_minutes: 60,
        },
    };

    let state = AppState {
        db: db.clone(),
        storage: Arc::new(LocalStorageService::new(tmp.path())),
        artworks: Arc::new(ArtworkService::new(db.clone())),
        auth: Arc::new(AuthService::new(db, config.auth.clone())),
        config,
    };

    (create_app(state), tmp)
}

async fn post_login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/token")
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username={}&password={}",
                    username, password
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

async fn get_dashboard(app: &Router, token: Option<&str>) -> StatusCode {
    let mut builder = Request::builder().uri("/auth/dashboard");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

async fn post_logout(app: &Router, token: &str) -> StatusCode {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (app, _tmp) = setup_app().await;

    let (status, json) = post_login(&app, "admin", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Incorrect username or password");

    let (status, json) = post_login(&app, "intruder", "password123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Incorrect username or password");
}

#[tokio::test]
async fn test_dashboard_requires_valid_token() {
    let (app, _tmp) = setup_app().await;

    assert_eq!(get_dashboard(&app, None).await, StatusCode::UNAUTHORIZED);
    assert_eq!(
        get_dashboard(&app, Some("garbage")).await,
        StatusCode::UNAUTHORIZED
    );

    let (status, json) = post_login(&app, "admin", "password123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["token_type"], "bearer");
    let token = json["access_token"].as_str().unwrap();

    assert_eq!(get_dashboard(&app, Some(token)).await, StatusCode::OK);
}

#[tokio::test]
async fn test_dashboard_greets_admin() {
    let (app, _tmp) = setup_app().await;

    let (_, json) = post_login(&app, "admin", "password123").await;
    let token = json["access_token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/dashboard")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["message"], "Welcome to the admin dashboard, admin!");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let (app, _tmp) = setup_app().await;

    let (_, json) = post_login(&app, "admin", "password123").await;
    let token = json["access_token"].as_str().unwrap().to_string();

    assert_eq!(get_dashboard(&app, Some(&token)).await, StatusCode::OK);

    assert_eq!(post_logout(&app, &token).await, StatusCode::OK);

    // The revoked token no longer opens any admin route
    assert_eq!(
        get_dashboard(&app, Some(&token)).await,
        StatusCode::UNAUTHORIZED
    );

    // A second logout finds nothing to revoke
    assert_eq!(post_logout(&app, &token).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejects_unpersisted_token_with_valid_signature() {
    let (app, _tmp) = setup_app().await;

    // Signed with the right secret but never issued through login, so no
    // record exists in the store.
    let forged = create_jwt("admin", "test_secret", 60).unwrap();
    assert_eq!(
        get_dashboard(&app, Some(&forged)).await,
        StatusCode::UNAUTHORIZED
    );

    // Signed with the wrong secret
    let forged = create_jwt("admin", "other_secret", 60).unwrap();
    assert_eq!(
        get_dashboard(&app, Some(&forged)).await,
        StatusCode::UNAUTHORIZED
    );
}
