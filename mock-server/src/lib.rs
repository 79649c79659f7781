use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub const SESSION_EXPIRED_CODE: &str = "000000000010";
pub const NOT_FOUND_CODE: &str = "2004";
pub const UNSUPPORTED_CODE: &str = "2005";
pub const INVALID_BODY_CODE: &str = "2006";
pub const METHOD_OVERRIDE: &str = "x-http-method-override";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
}

#[derive(Deserialize)]
pub struct NoteForm {
    pub title: String,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Note>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/user/info", get(user_info))
        .route("/api/orders", get(orders))
        .route("/api/empty", get(empty))
        .route("/api/stock", get(out_of_stock))
        .route("/api/secure", get(session_expired))
        .route("/api/page", get(page))
        .route("/api/boom", get(boom))
        .route("/api/echo", get(echo).post(echo))
        .route("/api/notes", get(list_notes).post(create_note))
        .route("/api/notes/{id}", post(modify_note))
        .fallback(not_found)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// `{code: 0, msg: "", data}`
pub fn success(data: Value) -> Json<Value> {
    Json(json!({ "code": 0, "msg": "", "data": data }))
}

/// `{code, msg}` with a string code.
pub fn failure(code: &str, msg: &str) -> Json<Value> {
    Json(json!({ "code": code, "msg": msg }))
}

fn decode_body<T: DeserializeOwned>(headers: &HeaderMap, body: &str) -> Result<T, String> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("application/json"));
    if is_json {
        serde_json::from_str(body).map_err(|e| e.to_string())
    } else {
        serde_urlencoded::from_str(body).map_err(|e| e.to_string())
    }
}

async fn user_info() -> Json<Value> {
    success(json!({ "id": 1, "name": "Ada" }))
}

/// Uses `result` rather than `data`, and a string success code.
async fn orders() -> Json<Value> {
    Json(json!({ "code": "0", "msg": "", "result": [{ "id": 10 }, { "id": 11 }] }))
}

async fn empty() -> Json<Value> {
    Json(json!({ "code": 0, "msg": "ok" }))
}

async fn out_of_stock() -> Json<Value> {
    failure("1001", "Out of stock")
}

async fn session_expired() -> Json<Value> {
    failure(SESSION_EXPIRED_CODE, "Session expired, please log in again")
}

/// HTML that happens to be valid JSON.
async fn page() -> Html<&'static str> {
    Html(r#"{"code":"1","msg":"not an envelope"}"#)
}

async fn boom() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "no such route").into_response()
}

/// Reflects what the server received.
async fn echo(Query(query): Query<HashMap<String, String>>, headers: HeaderMap, body: String) -> Json<Value> {
    let value_of = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    success(json!({
        "query": query,
        "accept_language": value_of("accept-language"),
        "content_type": value_of("content-type"),
        "method_override": value_of(METHOD_OVERRIDE),
        "body": body,
    }))
}

async fn list_notes(State(db): State<Db>) -> Json<Value> {
    let notes: Vec<Note> = db.read().await.values().cloned().collect();
    success(json!(notes))
}

async fn create_note(State(db): State<Db>, headers: HeaderMap, body: String) -> Json<Value> {
    let input: NoteForm = match decode_body(&headers, &body) {
        Ok(input) => input,
        Err(e) => return failure(INVALID_BODY_CODE, &e),
    };
    let note = Note {
        id: Uuid::new_v4(),
        title: input.title,
    };
    db.write().await.insert(note.id, note.clone());
    success(json!(note))
}

/// PUT and DELETE arrive as POST with a method override header.
async fn modify_note(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    let method = headers
        .get(METHOD_OVERRIDE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_uppercase);
    debug!(%id, ?method, "modify note");
    match method.as_deref() {
        Some("PUT") => {
            let input: NoteForm = match decode_body(&headers, &body) {
                Ok(input) => input,
                Err(e) => return failure(INVALID_BODY_CODE, &e),
            };
            let mut notes = db.write().await;
            let reply = match notes.get_mut(&id) {
                Some(note) => {
                    note.title = input.title;
                    success(json!(note))
                }
                None => failure(NOT_FOUND_CODE, "note not found"),
            };
            reply
        }
        Some("DELETE") => match db.write().await.remove(&id) {
            Some(_) => Json(json!({ "code": 0, "msg": "deleted" })),
            None => failure(NOT_FOUND_CODE, "note not found"),
        },
        _ => failure(UNSUPPORTED_CODE, "unsupported method"),
    }
}
