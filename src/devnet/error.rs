//! Devnet Error Types
//!
//! Failures outside the actor's own rejects. They go out as a reject
//! envelope with an HTTP error status and a request id.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ledger::wire::reject_code;
use crate::ledger::LedgerError;

#[derive(Error, Debug)]
pub enum DevnetError {
    #[error("Canister {0} not found")]
    UnknownCanister(String),

    #[error("Method {0} not found")]
    UnknownMethod(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Invalid sender: {0}")]
    InvalidSender(String),

    /// The store failed without a reject of its own
    #[error("Ledger error: {0}")]
    Ledger(LedgerError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body, shaped like a reject envelope
#[derive(Serialize)]
pub struct ErrorResponse {
    pub reject: ErrorBody,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: u32,
    pub message: String,
    pub request_id: String,
}

impl IntoResponse for DevnetError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            DevnetError::UnknownCanister(_) | DevnetError::UnknownMethod(_) => {
                (StatusCode::NOT_FOUND, reject_code::DESTINATION_INVALID)
            }
            DevnetError::InvalidArgs(_) | DevnetError::InvalidSender(_) => {
                (StatusCode::BAD_REQUEST, reject_code::INVALID)
            }
            DevnetError::Ledger(LedgerError::Unavailable) => {
                (StatusCode::SERVICE_UNAVAILABLE, reject_code::CANISTER_ERROR)
            }
            DevnetError::Ledger(LedgerError::Timeout) => {
                (StatusCode::GATEWAY_TIMEOUT, reject_code::CANISTER_ERROR)
            }
            DevnetError::Ledger(_) | DevnetError::Internal(_) | DevnetError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, reject_code::CANISTER_ERROR)
            }
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            reject_code = code,
            error_message = %self,
            "Devnet request failed"
        );

        let body = ErrorResponse {
            reject: ErrorBody {
                code,
                message: self.to_string(),
                request_id,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type DevnetResult<T> = Result<T, DevnetError>;
