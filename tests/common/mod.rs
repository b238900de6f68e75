#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, header::HeaderMap, StatusCode};
use actix_web::{test, web};
use serde_json::{json, Value};
use taskvault::config::Config;
use taskvault::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Fresh state over a private in-memory database, with the cheapest bcrypt cost.
pub async fn test_state() -> web::Data<AppState> {
    let config = Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        _ => None,
    })
    .expect("test configuration is valid");

    web::Data::new(
        AppState::from_config(&config)
            .await
            .expect("Failed to build test state"),
    )
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send<S, B>(app: &S, req: Request) -> TestResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = test::read_body(resp).await;
    TestResponse {
        status,
        headers,
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    }
}

pub async fn register<S, B>(app: &S, username: &str, password: &str) -> TestResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    send(app, req).await
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> TestResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/token")
        .set_form([("username", username), ("password", password)])
        .to_request();
    send(app, req).await
}

/// Registers `username` and logs in, returning `(user id, access token)`.
pub async fn register_and_login<S, B>(app: &S, username: &str, password: &str) -> (i64, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let registered = register(app, username, password).await;
    assert_eq!(
        registered.status,
        StatusCode::OK,
        "registration failed: {}",
        registered.body
    );
    let logged_in = login(app, username, password).await;
    assert_eq!(logged_in.status, StatusCode::OK, "login failed: {}", logged_in.body);

    let id = registered.body["id"].as_i64().expect("id in registration response");
    let token = logged_in.body["access_token"]
        .as_str()
        .expect("access_token in login response")
        .to_string();
    (id, token)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
