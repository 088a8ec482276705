use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::value::RawValue;
use std::net::{IpAddr, SocketAddr};
use tracing::warn;

use super::types::ErrorResponse;
use crate::rpc::{null_id, RpcError, RpcReply, RpcRequest, RpcResponse};
use crate::server::state::AppState;
use crate::utils::{extract_real_ip, validate_ip_access};

/// JSON-RPC endpoint, mounted on every path
///
/// CORS preflight never reaches this handler when CORS is enabled; the
/// `CorsLayer` answers it.
pub async fn rpc_endpoint(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(ErrorResponse::new("Method not allowed")),
        )
            .into_response();
    }

    let real_ip = match validate_ip_access(&state.security, &headers, &addr) {
        Ok(ip) => ip,
        Err(_) => {
            warn!(
                "Rejected request from unauthorized IP: {}",
                extract_real_ip(&state.security, &headers, &addr)
            );
            return (StatusCode::FORBIDDEN, Json(ErrorResponse::new("Access denied")))
                .into_response();
        }
    };

    // Kept as raw text so ids and forwarded bodies survive byte-for-byte
    let payload: Box<RawValue> = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => return parse_failure(real_ip, e),
    };

    if payload.get().starts_with('[') {
        return match serde_json::from_str::<Vec<Box<RawValue>>>(payload.get()) {
            Ok(items) => handle_batch(&state, items, real_ip).await,
            Err(e) => parse_failure(real_ip, e),
        };
    }

    match RpcRequest::from_raw(payload) {
        Ok(request) => {
            let reply = state.dispatcher.handle_from(&request, Some(real_ip)).await;
            Json(reply).into_response()
        }
        Err(invalid) => {
            warn!("Invalid JSON-RPC request from {}", real_ip);
            (StatusCode::BAD_REQUEST, Json(invalid)).into_response()
        }
    }
}

fn parse_failure(real_ip: IpAddr, e: serde_json::Error) -> Response {
    warn!("Unparseable request body from {}: {}", real_ip, e);
    let response = RpcResponse::failure(null_id(), RpcError::parse_error());
    (StatusCode::BAD_REQUEST, Json(response)).into_response()
}

/// Handle each element independently; an empty batch is itself invalid
async fn handle_batch(state: &AppState, items: Vec<Box<RawValue>>, real_ip: IpAddr) -> Response {
    if items.is_empty() {
        let response = RpcResponse::failure(null_id(), RpcError::invalid_request("empty batch"));
        return (StatusCode::BAD_REQUEST, Json(response)).into_response();
    }

    let mut replies = Vec::with_capacity(items.len());
    for item in items {
        let reply = match RpcRequest::from_raw(item) {
            Ok(request) => state.dispatcher.handle_from(&request, Some(real_ip)).await,
            Err(invalid) => RpcReply::Local(invalid),
        };
        replies.push(reply);
    }

    Json(replies).into_response()
}
