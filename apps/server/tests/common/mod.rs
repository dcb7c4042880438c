#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use catalog_server::{api::app_router, build_state, config::Config};

pub const JWT_SECRET: &str = "0123456789abcdef0123456789abcde!";

pub struct TestApp {
    pub router: Router,
    pub dir: TempDir,
}

pub async fn spawn_app(jwt_secret: Option<&str>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.path().join("catalog.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        upload_dir: dir.path().join("images"),
        max_upload_bytes: 1024 * 1024,
        jwt_secret: jwt_secret.map(str::to_string),
    };
    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        dir,
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    into_json(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn into_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
