mod account;
mod comment;
mod story;

use axum::{
    http::{self, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{config::Config, Global};

/// A fresh in-memory server.
fn app() -> (Global, Router) {
    let global = Global::new(Config::default()).unwrap();
    (global.clone(), crate::router(global))
}

/// Sends a request and returns the status with the parsed body,
/// `Value::Null` for empty bodies.
fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> impl std::future::Future<Output = (StatusCode, Value)> + Send + 'static {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(serde_json::to_vec(&body).unwrap().into())
            .unwrap(),
        None => builder.body(hyper::Body::empty()).unwrap(),
    };

    let app = app.clone();
    async move {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

/// Registers `username` and returns its id and credential.
async fn signup(app: &Router, username: &str) -> (u64, String) {
    let (status, body) = call(
        app,
        "POST",
        "/api/users/create",
        None,
        Some(json!({
            "first_name": "Test",
            "last_name": username,
            "email": format!("{username}@gbox.adnu.edu.ph"),
            "username": username,
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    (
        body["data"]["user"]["id"].as_u64().unwrap(),
        body["data"]["token"].as_str().unwrap().to_owned(),
    )
}

/// Registers `username` in `department`.
async fn signup_in(app: &Router, username: &str, department: &str) -> (u64, String) {
    let (id, token) = signup(app, username).await;
    let (status, _) = call(
        app,
        "PUT",
        &format!("/api/users/{id}"),
        Some(&token),
        Some(json!({ "department": department })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (id, token)
}

async fn follow(app: &Router, token: &str, target: u64) {
    let (status, _) = call(
        app,
        "POST",
        &format!("/api/users/{target}/follow"),
        Some(token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

/// Creates a post and returns its id.
async fn create_post(app: &Router, token: &str, text: &str, visibility: &str) -> u64 {
    let (status, body) = call(
        app,
        "POST",
        "/api/posts",
        Some(token),
        Some(json!({ "text": text, "visibility": visibility })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_u64().unwrap()
}

/// Ids of the items in a `{"data": [...]}` body.
fn ids(body: &Value) -> Vec<u64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect()
}
