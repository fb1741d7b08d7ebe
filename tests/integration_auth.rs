mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{generate_unique_username, get_auth_token, response_json, setup_test_app};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn register_request(username: &str, role: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": username,
                "email": format!("{username}@test.com"),
                "password": "studentpass123",
                "role": role
            }))
            .unwrap(),
        ))
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn register_creates_account_and_profile(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let username = generate_unique_username("amina");

    let response = app.oneshot(register_request(&username, "Student")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert!(body["access_token"].as_str().is_some());
    assert_eq!(body["profile"]["username"], username.as_str());
    assert_eq!(body["profile"]["role"], "Student");

    // Exactly one profile row was created alongside the account.
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM profiles p JOIN users u ON u.id = p.user_id WHERE u.username = $1",
    )
    .bind(&username)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn register_duplicate_username_conflicts_without_orphan_rows(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let username = generate_unique_username("amina");

    let response = app
        .clone()
        .oneshot(register_request(&username, "Student"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(register_request(&username, "Teacher")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = $1")
        .bind(&username)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn register_rejects_invalid_payload(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let username = generate_unique_username("amina");

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": username,
                "email": "not-an-email",
                "password": "studentpass123",
                "role": "Student"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn login_round_trip(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let username = generate_unique_username("amina");

    let response = app
        .clone()
        .oneshot(register_request(&username, "Teacher"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let token = get_auth_token(app.clone(), &username, "studentpass123").await;
    assert!(!token.is_empty());

    // The token works against an authenticated endpoint.
    let request = Request::builder()
        .method("GET")
        .uri("/api/profiles/me")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["role"], "Teacher");
}

#[sqlx::test(migrations = "./migrations")]
async fn login_with_wrong_password_is_unauthorized(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let username = generate_unique_username("amina");

    let response = app
        .clone()
        .oneshot(register_request(&username, "Student"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": username,
                "password": "wrong-password"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn protected_route_rejects_missing_token(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/profiles/me")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
