//! Canned HTTP endpoints for exercising the request helpers.
//!
//! Every route accepts any method. Responses are fixed per route so tests
//! can drive each decode path (`null`, empty, object, truncated JSON, 404)
//! and inspect what actually arrived on the wire (`/inspect`, `/upload`).

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Path},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

/// What `/inspect` saw of a request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Inspection {
    pub method: String,
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

/// One part of a multipart body received by `/upload`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UploadedPart {
    pub name: Option<String>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// What `/upload` saw of a multipart request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UploadReport {
    pub method: String,
    pub content_types: Vec<String>,
    pub parts: Vec<UploadedPart>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/null", any(|| async { json_text(StatusCode::OK, "null") }))
        .route("/empty", any(|| async { StatusCode::OK }))
        .route("/object", any(|| async { Json(json!({"a": 1})) }))
        .route("/truncated", any(|| async { json_text(StatusCode::OK, r#"{"a":"#) }))
        .route("/missing", any(missing))
        .route("/status/{code}", any(status))
        .route("/inspect", any(inspect))
        .route("/upload", any(upload))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn json_text(status: StatusCode, body: &'static str) -> impl IntoResponse {
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// Returns the request body unchanged.
async fn echo(body: Bytes) -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body)
}

/// 404 with a perfectly decodable body.
async fn missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({"error": "gone"})))
}

async fn status(Path(code): Path<u16>) -> Result<impl IntoResponse, StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, Json(json!({"status": code}))))
}

async fn inspect(method: Method, headers: HeaderMap, body: Bytes) -> Json<Inspection> {
    Json(Inspection {
        method: method.to_string(),
        headers: collect_headers(&headers),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn upload(
    method: Method,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadReport>, MultipartError> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?.to_vec();
        parts.push(UploadedPart {
            name,
            filename,
            content_type,
            data,
        });
    }
    let content_types = headers
        .get_all(header::CONTENT_TYPE)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    tracing::debug!(parts = parts.len(), "multipart upload received");
    Ok(Json(UploadReport {
        method: method.to_string(),
        content_types,
        parts,
    }))
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        out.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    out
}
