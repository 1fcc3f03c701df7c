use axum::Router;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use peoplecore::config::cors::CorsConfig;
use peoplecore::config::jwt::JwtConfig;
use peoplecore::config::rate_limit::RateLimitConfig;
use peoplecore::middleware::auth::Principal;
use peoplecore::modules::auth::model::Role;
use peoplecore::router::init_router;
use peoplecore::state::AppState;
use peoplecore::utils::password::hash_password;

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Inserts an account directly. The users table carries no row policies, so
/// a plain pool connection may write it.
pub async fn create_test_user(pool: &PgPool, email: &str, password: &str, role: Role) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let (id,): (Uuid,) = sqlx::query_as(
        r#"INSERT INTO users (first_name, last_name, email, password, role)
           VALUES ('Test', 'User', $1, $2, $3)
           RETURNING id"#,
    )
    .bind(email)
    .bind(&hashed)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
        role,
    }
}

#[allow(dead_code)]
pub fn principal_for(user: &TestUser) -> Principal {
    Principal {
        user_id: user.id,
        role: user.role,
    }
}

/// Row policies never apply to superusers or BYPASSRLS roles, regardless of
/// FORCE. Tests that assert on policy filtering skip themselves when the
/// configured test role bypasses RLS.
#[allow(dead_code)]
pub async fn rls_enforced(pool: &PgPool) -> bool {
    let (bypass,): (bool,) = sqlx::query_as(
        "SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = current_user",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    !bypass
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn setup_test_app(pool: PgPool) -> Router {
    setup_test_app_with(pool, RateLimitConfig::default())
}

#[allow(dead_code)]
pub fn setup_test_app_with(pool: PgPool, rate_limit_config: RateLimitConfig) -> Router {
    dotenvy::dotenv().ok();
    let state = AppState::new(
        pool,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        rate_limit_config,
    );
    init_router(state)
}

/// Logs in through the HTTP surface and returns (access_token, refresh_token).
#[allow(dead_code)]
pub async fn login(app: &Router, email: &str, password: &str) -> (String, String) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK, "login failed");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}
