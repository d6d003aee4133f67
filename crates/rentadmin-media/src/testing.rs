//! Recording mock asset host bound to a local port.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
};
use serde_json::{Value, json};

use crate::upload::{MediaUploader, UploaderConfig};

#[derive(Debug, Clone, Default)]
pub(crate) struct Received {
    pub fields: Vec<(String, String)>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub file_size: usize,
}

pub(crate) type Log = Arc<Mutex<Vec<Received>>>;

async fn accept(State(log): State<Log>, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    let mut received = Received::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            received.file_name = field.file_name().map(str::to_string);
            received.content_type = field.content_type().map(str::to_string);
            received.file_size = field.bytes().await.unwrap().len();
        } else {
            received.fields.push((name, field.text().await.unwrap()));
        }
    }

    let preset = received
        .fields
        .iter()
        .find(|(k, _)| k == "upload_preset")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    let name = received.file_name.clone().unwrap_or_default();
    log.lock().unwrap().push(received);

    if preset == "bad" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"message": "Upload preset not found"}})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "secure_url": format!("https://cdn.test/rentadmin/{name}"),
            "public_id": format!("rentadmin/{name}"),
            "width": 800,
            "height": 600,
            "format": "jpg",
            "resource_type": "image"
        })),
    )
}

pub(crate) async fn start_host() -> (String, Log) {
    let log: Log = Arc::default();
    let app = Router::new()
        .route("/upload", post(accept))
        .with_state(log.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/upload"), log)
}

pub(crate) fn uploader(url: &str, preset: &str) -> MediaUploader {
    MediaUploader::new(UploaderConfig::new("demo", preset).with_upload_url(url)).unwrap()
}
