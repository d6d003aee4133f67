//! Auth bridge handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use rentadmin_core::auth::{AuthBridge, BridgeStatus};
use rentadmin_core::secrets::SessionToken;

use crate::cookies::RequestCookies;
use crate::server::BridgeState;

/// Body of `POST /api/auth/session`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSession {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    success: bool,
    message: &'static str,
}

fn status_code(status: BridgeStatus) -> StatusCode {
    StatusCode::from_u16(status.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn bridge_for(state: &BridgeState, headers: &HeaderMap) -> AuthBridge {
    AuthBridge::new(Arc::new(RequestCookies::from_headers(
        headers,
        &state.cookie.name,
    )))
}

pub(crate) async fn health() -> &'static str {
    "OK"
}

pub(crate) async fn auth_check(
    State(state): State<Arc<BridgeState>>,
    headers: HeaderMap,
) -> Response {
    let check = bridge_for(&state, &headers).check();
    (status_code(check.status), Json(check)).into_response()
}

pub(crate) async fn auth_token(
    State(state): State<Arc<BridgeState>>,
    headers: HeaderMap,
) -> Response {
    let fetch = bridge_for(&state, &headers).token();
    (status_code(fetch.status), Json(fetch)).into_response()
}

pub(crate) async fn create_session(
    State(state): State<Arc<BridgeState>>,
    Json(body): Json<CreateSession>,
) -> Response {
    let token = SessionToken::new(body.access_token);
    if token.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(SessionResponse {
                success: false,
                message: "Access token is required",
            }),
        )
            .into_response();
    }

    let cookie = state.cookie.issue(&token, Utc::now());
    tracing::info!(expires = %cookie.expires, "Session cookie issued");

    (
        [(SET_COOKIE, cookie.set_cookie_header())],
        Json(SessionResponse {
            success: true,
            message: "Session created",
        }),
    )
        .into_response()
}

pub(crate) async fn delete_session(State(state): State<Arc<BridgeState>>) -> Response {
    tracing::info!("Session cookie cleared");

    (
        [(SET_COOKIE, state.cookie.removal_header())],
        Json(SessionResponse {
            success: true,
            message: "Session cleared",
        }),
    )
        .into_response()
}
