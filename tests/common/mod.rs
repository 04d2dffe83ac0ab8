#![allow(dead_code)]
#![allow(clippy::expect_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use authorization_api::config::{Config, DEFAULT_USERNAME_TIMEZONE, Environment};
use authorization_api::services::{NewUser, UserService};
use authorization_api::state::AppState;

/// Fresh in-memory database with all migrations applied.
pub async fn test_db() -> DatabaseConnection {
    let db = authorization_api::db::connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    db
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        username_timezone: DEFAULT_USERNAME_TIMEZONE,
    }
}

/// Router over a fresh database, plus the database handle for direct assertions.
pub async fn test_app() -> (Router, DatabaseConnection) {
    let db = test_db().await;
    let state = AppState {
        db: db.clone(),
        config: test_config(),
    };
    (authorization_api::routes::router().with_state(state), db)
}

/// Insert a user with a generated username and random password.
pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
) -> authorization_api::entities::user::Model {
    let new_user = NewUser {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: email.to_string(),
        ..Default::default()
    };
    UserService::create_user(db, new_user, DEFAULT_USERNAME_TIMEZONE)
        .await
        .expect("failed to create user")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let body_str = String::from_utf8(body.to_vec()).unwrap_or_default();

    (status, body_str)
}

/// Test helper: send a GET request to the app and return (status, body).
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

/// Test helper: send a POST request with a JSON body.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_default();
    send(app, request).await
}

/// Test helper: send a DELETE request.
pub async fn delete(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}
