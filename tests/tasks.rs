mod common;

use actix_cors::Cors;
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{rt, test, App, HttpServer};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::net::TcpListener;
use std::time::Duration;
use taskvault::models::Task;
use taskvault::routes;

use common::{bearer, register_and_login, send, test_state};

fn task_payload(title: &str, priority: &str) -> serde_json::Value {
    json!({ "title": title, "description": format!("{} description", title), "priority": priority })
}

#[actix_rt::test]
async fn test_create_task_unauthorized() {
    let state = test_state().await;

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen on test port")
    .run();
    let handle = server.handle();
    let server_task = rt::spawn(server);

    let client = reqwest::Client::new();
    let request = client
        .post(format!("http://127.0.0.1:{}/tasks", port))
        .json(&task_payload("Unauthorized Task", "High"))
        .send();
    let resp = tokio::time::timeout(Duration::from_secs(10), request)
        .await
        .expect("Server did not answer in time")
        .expect("Failed to send request");

    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers()
            .get(reqwest::header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
        .fetch_one(&state.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    handle.stop(true).await;
    let _ = server_task.await;
}

#[actix_rt::test]
async fn test_tasks_require_a_token() {
    let state = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;

    let req = test::TestRequest::get().uri("/tasks").to_request();
    let resp = send(&app, req).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert!(resp.headers.contains_key(header::WWW_AUTHENTICATE));

    // Authentication is checked before the body is looked at.
    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(json!({ "title": "" }))
        .to_request();
    assert_eq!(send(&app, req).await.status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_end_to_end_owner_scoping_and_priority_filter() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    let (alice_id, alice_token) = register_and_login(&app, "alice", "pw123").await;
    let (bob_id, bob_token) = register_and_login(&app, "bob", "hunter2").await;

    // Alice creates a High and a Low task.
    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(bearer(&alice_token))
        .set_json(json!({ "title": "t", "description": "d", "priority": "High" }))
        .to_request();
    let created = send(&app, req).await;
    assert_eq!(created.status, StatusCode::OK, "{}", created.body);
    let alice_high: Task = serde_json::from_value(created.body).unwrap();
    assert_eq!(alice_high.title, "t");
    assert_eq!(alice_high.description, "d");
    assert_eq!(alice_high.priority, "High");
    assert_eq!(alice_high.owner_id, alice_id);

    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(bearer(&alice_token))
        .set_json(task_payload("alice low", "Low"))
        .to_request();
    let alice_low: Task = serde_json::from_value(send(&app, req).await.body).unwrap();

    // Bob creates a High task of his own.
    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(bearer(&bob_token))
        .set_json(task_payload("bob high", "High"))
        .to_request();
    let bob_high: Task = serde_json::from_value(send(&app, req).await.body).unwrap();
    assert_eq!(bob_high.owner_id, bob_id);

    // Alice filtering by High sees only her High task.
    let req = test::TestRequest::get()
        .uri("/tasks?priority=High")
        .insert_header(bearer(&alice_token))
        .to_request();
    let resp = send(&app, req).await;
    assert_eq!(resp.status, StatusCode::OK);
    let tasks: Vec<Task> = serde_json::from_value(resp.body).unwrap();
    assert_eq!(tasks, vec![alice_high.clone()]);

    // Without a filter, and with an empty one, she sees both of hers and nothing of Bob's.
    for uri in ["/tasks", "/tasks?priority="] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&alice_token))
            .to_request();
        let tasks: Vec<Task> = serde_json::from_value(send(&app, req).await.body).unwrap();
        assert_eq!(tasks, vec![alice_high.clone(), alice_low.clone()], "{}", uri);
    }

    // Bob never sees Alice's tasks.
    let req = test::TestRequest::get()
        .uri("/tasks?priority=High")
        .insert_header(bearer(&bob_token))
        .to_request();
    let tasks: Vec<Task> = serde_json::from_value(send(&app, req).await.body).unwrap();
    assert_eq!(tasks, vec![bob_high]);

    // Unknown priorities simply match nothing.
    let req = test::TestRequest::get()
        .uri("/tasks?priority=Urgent")
        .insert_header(bearer(&alice_token))
        .to_request();
    let tasks: Vec<Task> = serde_json::from_value(send(&app, req).await.body).unwrap();
    assert!(tasks.is_empty());
}

#[actix_rt::test]
async fn test_owner_cannot_be_chosen_by_client() {
    let state = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;

    let (alice_id, alice_token) = register_and_login(&app, "alice", "pw123").await;
    let (bob_id, bob_token) = register_and_login(&app, "bob", "hunter2").await;

    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(bearer(&alice_token))
        .set_json(json!({
            "title": "sneaky",
            "description": "planted for bob",
            "priority": "High",
            "owner_id": bob_id
        }))
        .to_request();
    let created: Task = serde_json::from_value(send(&app, req).await.body).unwrap();
    assert_eq!(created.owner_id, alice_id);

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(bearer(&bob_token))
        .to_request();
    let tasks: Vec<Task> = serde_json::from_value(send(&app, req).await.body).unwrap();
    assert!(tasks.is_empty());
}

#[actix_rt::test]
async fn test_invalid_task_payloads() {
    let state = test_state().await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let (_, token) = register_and_login(&app, "alice", "pw123").await;

    let test_cases = vec![
        (json!({ "description": "d", "priority": "High" }), "missing title"),
        (json!({ "title": "t", "priority": "High" }), "missing description"),
        (json!({ "title": "t", "description": "d" }), "missing priority"),
        (json!({ "title": "", "description": "d", "priority": "High" }), "empty title"),
        (json!({ "title": "a".repeat(201), "description": "d", "priority": "High" }), "title too long"),
        (json!({ "title": "t", "description": "b".repeat(1001), "priority": "High" }), "description too long"),
        (json!({ "title": "t", "description": "d", "priority": "" }), "empty priority"),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/tasks")
            .insert_header(bearer(&token))
            .set_json(&payload)
            .to_request();
        let resp = send(&app, req).await;
        assert_eq!(
            resp.status,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Test case failed: {}. Body: {}",
            description,
            resp.body
        );
    }

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
        .fetch_one(&state.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
