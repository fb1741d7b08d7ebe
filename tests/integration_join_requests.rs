mod common;

use axum::http::StatusCode;
use common::{
    create_test_class, create_test_user, enroll_student, generate_unique_username, get_auth_token,
    json_request, response_json, setup_test_app,
};
use rollcall::rollcall_models::profiles::Role;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "./migrations")]
async fn approve_and_reject_flow(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let teacher = create_test_user(
        &mut tx,
        &generate_unique_username("teacher"),
        "teacherpass123",
        Role::Teacher,
    )
    .await;
    let student_s = create_test_user(
        &mut tx,
        &generate_unique_username("student"),
        "studentpass123",
        Role::Student,
    )
    .await;
    let student_u = create_test_user(
        &mut tx,
        &generate_unique_username("student"),
        "studentpass123",
        Role::Student,
    )
    .await;
    let class = create_test_class(&mut tx, teacher.profile_id, "Algebra I", None, None).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let s_token = get_auth_token(app.clone(), &student_s.username, &student_s.password).await;
    let u_token = get_auth_token(app.clone(), &student_u.username, &student_u.password).await;
    let t_token = get_auth_token(app.clone(), &teacher.username, &teacher.password).await;

    // Both students request to join.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/classes/{}/join-requests", class.id),
            &s_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let s_request = response_json(response).await;
    assert_eq!(s_request["status"], "Pending");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/classes/{}/join-requests", class.id),
            &u_token,
            None,
        ))
        .await
        .unwrap();
    let u_request = response_json(response).await;

    // Teacher sees both pending requests.
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            &format!("/api/classes/{}/join-requests", class.id),
            &t_token,
            None,
        ))
        .await
        .unwrap();
    let pending = response_json(response).await;
    assert_eq!(pending.as_array().unwrap().len(), 2);

    // Approve S: status flips and S lands on the roster.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/join-requests/{}/decision", s_request["id"].as_str().unwrap()),
            &t_token,
            Some(json!({"action": "approve"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let decided = response_json(response).await;
    assert_eq!(decided["status"], "Approved");

    let (enrolled,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM class_students WHERE class_id = $1 AND student_id = $2",
    )
    .bind(class.id)
    .bind(student_s.profile_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(enrolled, 1);

    // Reject U: status flips and U stays off the roster.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/join-requests/{}/decision", u_request["id"].as_str().unwrap()),
            &t_token,
            Some(json!({"action": "reject"})),
        ))
        .await
        .unwrap();
    let decided = response_json(response).await;
    assert_eq!(decided["status"], "Rejected");

    let (enrolled,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM class_students WHERE class_id = $1 AND student_id = $2",
    )
    .bind(class.id)
    .bind(student_u.profile_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(enrolled, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn deciding_a_decided_request_is_invalid_state(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let teacher = create_test_user(
        &mut tx,
        &generate_unique_username("teacher"),
        "teacherpass123",
        Role::Teacher,
    )
    .await;
    let student = create_test_user(
        &mut tx,
        &generate_unique_username("student"),
        "studentpass123",
        Role::Student,
    )
    .await;
    let class = create_test_class(&mut tx, teacher.profile_id, "Algebra I", None, None).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let s_token = get_auth_token(app.clone(), &student.username, &student.password).await;
    let t_token = get_auth_token(app.clone(), &teacher.username, &teacher.password).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/classes/{}/join-requests", class.id),
            &s_token,
            None,
        ))
        .await
        .unwrap();
    let request = response_json(response).await;
    let decision_uri = format!(
        "/api/join-requests/{}/decision",
        request["id"].as_str().unwrap()
    );

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &decision_uri,
            &t_token,
            Some(json!({"action": "reject"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A second decision hits the terminal state and changes nothing.
    let response = app
        .oneshot(json_request(
            "POST",
            &decision_uri,
            &t_token,
            Some(json!({"action": "approve"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let (enrolled,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM class_students WHERE class_id = $1 AND student_id = $2",
    )
    .bind(class.id)
    .bind(student.profile_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(enrolled, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn resend_while_pending_is_a_noop(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let teacher = create_test_user(
        &mut tx,
        &generate_unique_username("teacher"),
        "teacherpass123",
        Role::Teacher,
    )
    .await;
    let student = create_test_user(
        &mut tx,
        &generate_unique_username("student"),
        "studentpass123",
        Role::Student,
    )
    .await;
    let class = create_test_class(&mut tx, teacher.profile_id, "Algebra I", None, None).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app.clone(), &student.username, &student.password).await;
    let uri = format!("/api/classes/{}/join-requests", class.id);

    let first = response_json(
        app.clone()
            .oneshot(json_request("POST", &uri, &token, None))
            .await
            .unwrap(),
    )
    .await;
    let second = response_json(
        app.oneshot(json_request("POST", &uri, &token, None))
            .await
            .unwrap(),
    )
    .await;

    // Same Pending row both times.
    assert_eq!(first["id"], second["id"]);

    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM join_requests WHERE class_id = $1 AND student_id = $2",
    )
    .bind(class.id)
    .bind(student.profile_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn rejected_student_can_request_again(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let teacher = create_test_user(
        &mut tx,
        &generate_unique_username("teacher"),
        "teacherpass123",
        Role::Teacher,
    )
    .await;
    let student = create_test_user(
        &mut tx,
        &generate_unique_username("student"),
        "studentpass123",
        Role::Student,
    )
    .await;
    let class = create_test_class(&mut tx, teacher.profile_id, "Algebra I", None, None).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let s_token = get_auth_token(app.clone(), &student.username, &student.password).await;
    let t_token = get_auth_token(app.clone(), &teacher.username, &teacher.password).await;
    let uri = format!("/api/classes/{}/join-requests", class.id);

    let first = response_json(
        app.clone()
            .oneshot(json_request("POST", &uri, &s_token, None))
            .await
            .unwrap(),
    )
    .await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/join-requests/{}/decision", first["id"].as_str().unwrap()),
            &t_token,
            Some(json!({"action": "reject"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Re-request replaces the rejected row with a fresh Pending one.
    let second = response_json(
        app.oneshot(json_request("POST", &uri, &s_token, None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(second["status"], "Pending");
    assert_ne!(first["id"], second["id"]);

    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM join_requests WHERE class_id = $1 AND student_id = $2",
    )
    .bind(class.id)
    .bind(student.profile_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn enrolled_student_cannot_request_again(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let teacher = create_test_user(
        &mut tx,
        &generate_unique_username("teacher"),
        "teacherpass123",
        Role::Teacher,
    )
    .await;
    let student = create_test_user(
        &mut tx,
        &generate_unique_username("student"),
        "studentpass123",
        Role::Student,
    )
    .await;
    let class = create_test_class(&mut tx, teacher.profile_id, "Algebra I", None, None).await;
    enroll_student(&mut tx, class.id, student.profile_id).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app.clone(), &student.username, &student.password).await;

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/classes/{}/join-requests", class.id),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn teacher_cannot_send_join_request(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let teacher = create_test_user(
        &mut tx,
        &generate_unique_username("teacher"),
        "teacherpass123",
        Role::Teacher,
    )
    .await;
    let other = create_test_user(
        &mut tx,
        &generate_unique_username("teacher"),
        "teacherpass123",
        Role::Teacher,
    )
    .await;
    let class = create_test_class(&mut tx, teacher.profile_id, "Algebra I", None, None).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app.clone(), &other.username, &other.password).await;

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/classes/{}/join-requests", class.id),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
