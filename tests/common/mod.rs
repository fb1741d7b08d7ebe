use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use rollcall::config::cors::CorsConfig;
use rollcall::config::jwt::JwtConfig;
use rollcall::router::init_router;
use rollcall::rollcall_core::password::hash_password;
use rollcall::rollcall_models::profiles::Role;
use rollcall::state::AppState;
#[allow(unused_imports)]
use sqlx::{PgPool, Postgres, Transaction};
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestUser {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub username: String,
    pub password: String,
}

#[allow(dead_code)]
pub struct TestClass {
    pub id: Uuid,
    pub name: String,
}

pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

/// Seed an account with its profile, the same shape registration produces.
#[allow(dead_code)]
pub async fn create_test_user(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
    password: &str,
    role: Role,
) -> TestUser {
    let hashed = hash_password(password).unwrap();
    let email = format!("{username}@test.com");

    let (user_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(username)
    .bind(&email)
    .bind(&hashed)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    let (profile_id,): (Uuid,) =
        sqlx::query_as("INSERT INTO profiles (user_id, role) VALUES ($1, $2) RETURNING id")
            .bind(user_id)
            .bind(role)
            .fetch_one(&mut **tx)
            .await
            .unwrap();

    TestUser {
        user_id,
        profile_id,
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[allow(dead_code)]
pub async fn create_test_class(
    tx: &mut Transaction<'_, Postgres>,
    teacher_profile_id: Uuid,
    name: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> TestClass {
    let start: Option<chrono::NaiveDate> = start_date.map(|d| d.parse().unwrap());
    let end: Option<chrono::NaiveDate> = end_date.map(|d| d.parse().unwrap());

    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO classes (name, description, start_date, end_date, teacher_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(name)
    .bind("seeded class")
    .bind(start)
    .bind(end)
    .bind(teacher_profile_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestClass {
        id,
        name: name.to_string(),
    }
}

#[allow(dead_code)]
pub async fn enroll_student(
    tx: &mut Transaction<'_, Postgres>,
    class_id: Uuid,
    student_profile_id: Uuid,
) {
    sqlx::query("INSERT INTO class_students (class_id, student_id) VALUES ($1, $2)")
        .bind(class_id)
        .bind(student_profile_id)
        .execute(&mut **tx)
        .await
        .unwrap();
}

pub fn generate_unique_username(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

pub async fn get_auth_token(app: axum::Router, username: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&serde_json::json!({
                "username": username,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

/// Build an authenticated JSON request.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"));

    match body {
        Some(value) => builder
            .body(Body::from(serde_json::to_string(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[allow(dead_code)]
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
