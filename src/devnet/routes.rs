//! Devnet Routes
//!
//! - GET  /api/v2/status
//! - POST /api/v2/canister/:canister_id/query/:method
//! - POST /api/v2/canister/:canister_id/call/:method
//! - GET  /health/live

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use candid::Principal;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use super::error::{DevnetError, DevnetResult};
use super::state::DevnetState;
use crate::ledger::wire::{self, IdArgs, NoArgs, Reject, Reply, StatusResponse};
use crate::ledger::{LedgerError, LedgerResult};
use crate::types::EventPayload;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /api/v2/status
///
/// Always healthy; the root key is what a client fetches before signed calls.
pub async fn status(State(state): State<Arc<DevnetState>>) -> Json<StatusResponse> {
    tracing::debug!(uptime_seconds = state.uptime_seconds(), "Status requested");
    Json(StatusResponse {
        healthy: true,
        root_key: Some(state.store.root_key().to_string()),
    })
}

/// POST /api/v2/canister/:canister_id/query/:method
///
/// Anonymous reads. A sender header, if any, is ignored.
pub async fn query(
    State(state): State<Arc<DevnetState>>,
    Path((canister_id, method)): Path<(String, String)>,
    body: Bytes,
) -> DevnetResult<Response> {
    check_canister(&state, &canister_id)?;

    match method.as_str() {
        wire::GET_EVENTS => {
            let NoArgs {} = args(&body)?;
            reply(state.store.get_events())
        }
        wire::GET_EVENT_DETAIL => {
            let IdArgs { id } = args(&body)?;
            reply(state.store.get_event_detail(id))
        }
        _ => Err(DevnetError::UnknownMethod(method)),
    }
}

/// POST /api/v2/canister/:canister_id/call/:method
///
/// Writes, made as the principal in the sender header. A missing header
/// means the anonymous principal, which the store rejects.
pub async fn call(
    State(state): State<Arc<DevnetState>>,
    Path((canister_id, method)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> DevnetResult<Response> {
    check_canister(&state, &canister_id)?;
    let caller = sender(&headers)?;

    tracing::debug!(method = %method, caller = %caller, "Update call");

    match method.as_str() {
        wire::CREATE_EVENT => {
            let payload: EventPayload = args(&body)?;
            reply(state.store.create_event(caller, &payload))
        }
        wire::ATTEND_EVENT => {
            let IdArgs { id } = args(&body)?;
            reply(state.store.attend_event(caller, id))
        }
        wire::COMPLETE_EVENT => {
            let IdArgs { id } = args(&body)?;
            reply(state.store.complete_event(caller, id))
        }
        _ => Err(DevnetError::UnknownMethod(method)),
    }
}

fn check_canister(state: &DevnetState, canister_id: &str) -> DevnetResult<()> {
    if canister_id == state.config.canister_id {
        Ok(())
    } else {
        Err(DevnetError::UnknownCanister(canister_id.to_string()))
    }
}

fn sender(headers: &HeaderMap) -> DevnetResult<Principal> {
    let Some(value) = headers.get(wire::SENDER_HEADER) else {
        return Ok(Principal::anonymous());
    };
    let text = value
        .to_str()
        .map_err(|e| DevnetError::InvalidSender(e.to_string()))?;
    Principal::from_text(text).map_err(|e| DevnetError::InvalidSender(e.to_string()))
}

/// An empty body stands for `{}`
fn args<T: DeserializeOwned>(body: &[u8]) -> DevnetResult<T> {
    let body: &[u8] = if body.is_empty() { b"{}" } else { body };
    serde_json::from_slice(body).map_err(|e| DevnetError::InvalidArgs(e.to_string()))
}

/// Actor rejects travel as a 200 reply envelope; anything else is a
/// replica failure.
fn reply<T: Serialize>(result: LedgerResult<T>) -> DevnetResult<Response> {
    match result {
        Ok(value) => Ok(Json(Reply::Reply(value)).into_response()),
        Err(LedgerError::Rejected { code, message }) => {
            Ok(Json(Reply::<T>::Reject(Reject { code, message })).into_response())
        }
        Err(e) => Err(DevnetError::Ledger(e)),
    }
}
