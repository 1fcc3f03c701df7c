mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_user, generate_unique_email, login, setup_test_app};
use http_body_util::BodyExt;
use peoplecore::config::jwt::JwtConfig;
use peoplecore::modules::auth::model::Role;
use peoplecore::utils::jwt::create_access_token;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

#[sqlx::test(migrations = "./migrations")]
async fn login_issues_both_tokens(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "superpass123", Role::SuperAdmin).await;

    let app = setup_test_app(pool);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": email, "password": "superpass123" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(body["access_token"].as_str().is_some());
    assert!(body["refresh_token"].as_str().is_some());
    assert_ne!(body["access_token"], body["refresh_token"]);
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "SUPER_ADMIN");
    assert!(body["user"].get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn wrong_password_and_unknown_email_are_indistinguishable(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "rightpass123", Role::Employee).await;

    let app = setup_test_app(pool);

    let mut bodies = Vec::new();
    for (email, password) in [
        (email.as_str(), "wrongpass123"),
        ("nobody@test.com", "whatever123"),
    ] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "email": email, "password": password }).to_string(),
            ))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        bodies.push(serde_json::from_slice::<serde_json::Value>(&body).unwrap());
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0], json!({ "error": "Unauthorized" }));
}

#[sqlx::test(migrations = "./migrations")]
async fn registration_defaults_to_employee_role(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": email,
                "password": "longenough123"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["role"], "EMPLOYEE");

    // Same email again is rejected.
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": email,
                "password": "longenough123"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn refresh_rotates_the_token_pair(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "managerpass1", Role::Manager).await;

    let app = setup_test_app(pool);
    let (_, refresh_token) = login(&app, &email, "managerpass1").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/refresh")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "refresh_token": refresh_token }).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let new_access = body["access_token"].as_str().unwrap();

    // The refreshed access token works on a protected route.
    let request = Request::builder()
        .method("GET")
        .uri("/api/employees")
        .header("authorization", format!("Bearer {new_access}"))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn access_token_is_rejected_on_the_refresh_route(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "managerpass1", Role::Manager).await;

    let app = setup_test_app(pool);
    let (access_token, _) = login(&app, &email, "managerpass1").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/refresh")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "refresh_token": access_token }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn protected_route_status_matrix(pool: PgPool) {
    let admin_email = generate_unique_email();
    let employee_email = generate_unique_email();
    create_test_user(&pool, &admin_email, "adminpass123", Role::HrAdmin).await;
    create_test_user(&pool, &employee_email, "emppass12345", Role::Employee).await;

    let app = setup_test_app(pool);
    let (admin_token, _) = login(&app, &admin_email, "adminpass123").await;
    let (employee_token, _) = login(&app, &employee_email, "emppass12345").await;

    // HR admin reaches an HR-admin-only surface.
    let request = Request::builder()
        .method("GET")
        .uri("/api/departments")
        .header("authorization", format!("Bearer {admin_token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Authenticated employee is refused with 403 and the fixed message.
    let request = Request::builder()
        .method("GET")
        .uri("/api/departments")
        .header("authorization", format!("Bearer {employee_token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "Insufficient permissions");

    // No credential at all is 401, not 403.
    let request = Request::builder()
        .method("GET")
        .uri("/api/departments")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage credential is the same opaque 401.
    let request = Request::builder()
        .method("GET")
        .uri("/api/departments")
        .header("authorization", "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn expired_access_token_is_rejected(pool: PgPool) {
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, "adminpass123", Role::HrAdmin).await;

    let app = setup_test_app(pool);

    // Signed with the app's secret, but expired past the validation leeway.
    let mut expired_config = JwtConfig::from_env();
    expired_config.access_token_expiry = -7_200;
    let token = create_access_token(user.id, Role::HrAdmin, &expired_config).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/api/departments")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn token_for_a_deleted_user_cannot_refresh(pool: PgPool) {
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, "emppass12345", Role::Employee).await;

    let app = setup_test_app(pool.clone());
    let (_, refresh_token) = login(&app, &email, "emppass12345").await;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/refresh")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "refresh_token": refresh_token }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn health_needs_no_credential(pool: PgPool) {
    let app = setup_test_app(pool);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_user_id_in_a_valid_token_still_authenticates_shape(pool: PgPool) {
    // A validly signed token for a non-existent user passes the token gate;
    // row policies then scope it to nothing rather than erroring.
    let app = setup_test_app(pool);

    let token =
        create_access_token(Uuid::new_v4(), Role::Manager, &JwtConfig::from_env()).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/api/employees")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
