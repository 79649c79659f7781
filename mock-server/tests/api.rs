use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Note, NOT_FOUND_CODE, SESSION_EXPIRED_CODE, UNSUPPORTED_CODE};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn form_request(uri: &str, body: &str, method_override: Option<&str>) -> Request<String> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded;");
    if let Some(method) = method_override {
        builder = builder.header("X-HTTP-Method-Override", method);
    }
    builder.body(body.to_string()).unwrap()
}

fn content_type(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

// --- envelopes ---

#[tokio::test]
async fn user_info_uses_data() {
    let resp = app().oneshot(get("/api/user/info")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).starts_with("application/json"));
    let value: Value = body_json(resp).await;
    assert_eq!(value["code"], 0);
    assert_eq!(value["data"]["name"], "Ada");
}

#[tokio::test]
async fn orders_uses_result_with_string_code() {
    let resp = app().oneshot(get("/api/orders")).await.unwrap();
    let value: Value = body_json(resp).await;
    assert_eq!(value["code"], "0");
    assert!(value.get("data").is_none());
    assert_eq!(value["result"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn secure_returns_sentinel() {
    let resp = app().oneshot(get("/api/secure")).await.unwrap();
    let value: Value = body_json(resp).await;
    assert_eq!(value["code"], SESSION_EXPIRED_CODE);
}

#[tokio::test]
async fn page_is_html() {
    let resp = app().oneshot(get("/api/page")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).starts_with("text/html"));
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_ok(), "body is JSON-shaped on purpose");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app().oneshot(get("/api/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn boom_is_500() {
    let resp = app().oneshot(get("/api/boom")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn echo_reflects_headers_and_query() {
    let req = Request::builder()
        .uri("/api/echo?_t=1&page=2")
        .header("Accept-Language", "zh")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    let value: Value = body_json(resp).await;
    assert_eq!(value["data"]["accept_language"], "zh");
    assert_eq!(value["data"]["query"]["page"], "2");
    assert!(value["data"]["method_override"].is_null());
}

// --- notes ---

#[tokio::test]
async fn create_note_from_form() {
    let resp = app()
        .oneshot(form_request("/api/notes", "title=Buy+milk", None))
        .await
        .unwrap();
    let value: Value = body_json(resp).await;
    assert_eq!(value["code"], 0);
    let note: Note = serde_json::from_value(value["data"].clone()).unwrap();
    assert_eq!(note.title, "Buy milk");
}

#[tokio::test]
async fn create_note_rejects_bad_body() {
    let resp = app()
        .oneshot(form_request("/api/notes", "nope=1", None))
        .await
        .unwrap();
    let value: Value = body_json(resp).await;
    assert_ne!(value["code"], 0);
}

#[tokio::test]
async fn modify_without_override_is_unsupported() {
    let resp = app()
        .oneshot(form_request(
            "/api/notes/00000000-0000-0000-0000-000000000000",
            "title=x",
            None,
        ))
        .await
        .unwrap();
    let value: Value = body_json(resp).await;
    assert_eq!(value["code"], UNSUPPORTED_CODE);
}

#[tokio::test]
async fn delete_missing_note() {
    let resp = app()
        .oneshot(form_request(
            "/api/notes/00000000-0000-0000-0000-000000000000",
            "",
            Some("DELETE"),
        ))
        .await
        .unwrap();
    let value: Value = body_json(resp).await;
    assert_eq!(value["code"], NOT_FOUND_CODE);
}

#[tokio::test]
async fn notes_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request("/api/notes", "title=Walk+dog", None))
        .await
        .unwrap();
    let value: Value = body_json(resp).await;
    let created: Note = serde_json::from_value(value["data"].clone()).unwrap();
    let id = created.id;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(&format!("/api/notes/{id}"), "title=Walk+cat", Some("PUT")))
        .await
        .unwrap();
    let value: Value = body_json(resp).await;
    assert_eq!(value["data"]["title"], "Walk cat");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/notes"))
        .await
        .unwrap();
    let value: Value = body_json(resp).await;
    assert_eq!(value["data"].as_array().unwrap().len(), 1);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(&format!("/api/notes/{id}"), "", Some("DELETE")))
        .await
        .unwrap();
    let value: Value = body_json(resp).await;
    assert_eq!(value["code"], 0);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/notes"))
        .await
        .unwrap();
    let value: Value = body_json(resp).await;
    assert!(value["data"].as_array().unwrap().is_empty());
}
