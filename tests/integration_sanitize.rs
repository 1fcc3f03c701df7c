mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_user, generate_unique_email, login, setup_test_app};
use http_body_util::BodyExt;
use peoplecore::modules::auth::model::Role;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn injection_looking_field_rejects_before_authentication(pool: PgPool) {
    let app = setup_test_app(pool);

    // No credential at all, yet the sanitizer answers first: the gate order
    // puts body screening before the token check.
    let request = Request::builder()
        .method("POST")
        .uri("/api/departments")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "name": "<script>alert(1)</script>" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        "Invalid input in field 'name': contains a script tag"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn safe_strings_are_stored_escaped(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "adminpass123", Role::HrAdmin).await;

    let app = setup_test_app(pool);
    let (token, _) = login(&app, &email, "adminpass123").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/departments")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(
            json!({ "name": "Research & Development" }).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["name"], "Research &amp; Development");

    // The escaped form is what persists and lists back.
    let request = Request::builder()
        .method("GET")
        .uri("/api/departments")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed[0]["name"], "Research &amp; Development");
}

#[sqlx::test(migrations = "./migrations")]
async fn passwords_with_markup_characters_survive_registration_and_login(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();
    let password = "we&ird<pass>'123";

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "first_name": "Quote",
                "last_name": "Heavy",
                "email": email,
                "password": password
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // If the sanitizer had escaped the credential field, this login would
    // fail bcrypt verification.
    login(&app, &email, password).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn sql_meta_sequences_reject_naming_the_field(pool: PgPool) {
    let app = setup_test_app(pool);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "first_name": "Robert'); DROP TABLE students; --",
                "last_name": "Tables",
                "email": generate_unique_email(),
                "password": "longenough123"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(
        body["message"].as_str().unwrap().contains("first_name"),
        "{body}"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn non_json_bodies_pass_the_sanitizer_untouched(pool: PgPool) {
    let app = setup_test_app(pool);

    // A text body is not screened; the request proceeds to the next gate,
    // which rejects the missing JSON content type.
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "text/plain")
        .body(Body::from("email=admin&password=<script>"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
