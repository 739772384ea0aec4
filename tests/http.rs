use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use json_items::{HttpServer, Items, MemoryStore, ServiceConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn server(store: MemoryStore, config: ServiceConfig) -> HttpServer {
    HttpServer::new(config, Items::new(store))
}

async fn send(server: &HttpServer, method: &str, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|err| panic!("failed to build request: {err}"));
    match server.router().oneshot(request).await {
        Ok(response) => response,
        Err(err) => panic!("router request failed: {err}"),
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn crud_over_http() {
    let server = server(MemoryStore::new(), ServiceConfig::default());

    let created = send(&server, "POST", "/items", r#"{"name":"widget"}"#).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(
        created.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_json(created).await, json!([{"name": "widget", "id": 1}]));

    let updated = send(&server, "PUT", "/items", r#"{"id":1,"name":"gadget"}"#).await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(body_json(updated).await, json!([{"name": "gadget", "id": 1}]));

    let read = send(&server, "GET", "/items", "").await;
    assert_eq!(read.status(), StatusCode::OK);
    assert_eq!(body_json(read).await, json!([{"name": "gadget", "id": 1}]));

    let deleted = send(&server, "DELETE", "/items?id=1", "").await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(body_json(deleted).await, json!([]));
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let server = server(MemoryStore::new(), ServiceConfig::default());

    let response = send(&server, "GET", "/nope", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_json(response).await, json!({"message": "Not Found"}));
}

#[tokio::test]
async fn read_failure_over_http() {
    let server = server(MemoryStore::missing(), ServiceConfig::default());

    let response = send(&server, "GET", "/items", "").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"message": "Failed to read data"}));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let mut config = ServiceConfig::default();
    config.limits.max_body_bytes = 16;
    let server = server(MemoryStore::new(), config);

    let body = format!(r#"{{"name":"{}"}}"#, "x".repeat(64));
    let response = send(&server, "POST", "/items", &body).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await, json!({"message": "Payload Too Large"}));

    let read = send(&server, "GET", "/items", "").await;
    assert_eq!(body_json(read).await, json!([]));
}

#[tokio::test]
async fn broken_body_stream_is_400_not_413() {
    let server = server(MemoryStore::new(), ServiceConfig::default());

    let chunks: Vec<Result<&'static str, std::io::Error>> = vec![
        Ok(r#"{"name":"#),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "client went away")),
    ];
    let request = Request::builder()
        .method("POST")
        .uri("/items")
        .body(Body::from_stream(futures_util::stream::iter(chunks)))
        .unwrap_or_else(|err| panic!("failed to build request: {err}"));
    let response = server.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"message": "Bad Request"}));

    let read = send(&server, "GET", "/items", "").await;
    assert_eq!(body_json(read).await, json!([]));
}

#[tokio::test]
async fn delete_query_reaches_handler_raw() {
    let store = MemoryStore::with_bytes(r#"[{"id":1},{"id":2}]"#);
    let server = server(store, ServiceConfig::default());

    let response = send(&server, "DELETE", "/items?id=2", "").await;
    assert_eq!(body_json(response).await, json!([{"id": 1}]));

    let response = send(&server, "DELETE", "/items?id=2", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"error": "ID not found"}));
}
