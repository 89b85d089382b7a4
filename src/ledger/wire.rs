//! Gateway wire format
//!
//! - `GET  {host}/api/v2/status`
//! - `POST {host}/api/v2/canister/{canister_id}/query/{method}` (anonymous reads)
//! - `POST {host}/api/v2/canister/{canister_id}/call/{method}` (writes, sender in
//!   the [`SENDER_HEADER`] header)
//!
//! Arguments are a JSON object and replies are a [`Reply`] envelope.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{LedgerError, LedgerResult};
use crate::types::EventId;

pub const SENDER_HEADER: &str = "x-chronox-sender";

pub const GET_EVENTS: &str = "getEvents";
pub const GET_EVENT_DETAIL: &str = "getEventDetail";
pub const CREATE_EVENT: &str = "createEvent";
pub const ATTEND_EVENT: &str = "attendEvent";
pub const COMPLETE_EVENT: &str = "completeEvent";

/// Reject codes, loosely following replica reject classes
pub mod reject_code {
    /// Malformed request
    pub const INVALID: u32 = 1;
    /// Unknown canister or method
    pub const DESTINATION_INVALID: u32 = 3;
    /// The actor refused the call
    pub const CANISTER_REJECT: u32 = 4;
    /// The actor failed while handling the call
    pub const CANISTER_ERROR: u32 = 5;
}

/// Kind of gateway request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Query,
    Update,
}

impl CallKind {
    pub fn path_segment(self) -> &'static str {
        match self {
            CallKind::Query => "query",
            CallKind::Update => "call",
        }
    }
}

pub fn status_url(host: &str) -> String {
    format!("{}/api/v2/status", host)
}

pub fn method_url(host: &str, canister_id: &str, kind: CallKind, method: &str) -> String {
    format!(
        "{}/api/v2/canister/{}/{}/{}",
        host,
        canister_id,
        kind.path_segment(),
        method
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub healthy: bool,
    #[serde(default)]
    pub root_key: Option<String>,
}

/// Argument for the id-taking methods
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdArgs {
    pub id: EventId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoArgs {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reject {
    pub code: u32,
    pub message: String,
}

/// Reply envelope: exactly one of `reply` / `reject`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reply<T> {
    Reply(T),
    Reject(Reject),
}

impl<T> Reply<T> {
    pub fn from_result(result: LedgerResult<T>) -> Self {
        match result {
            Ok(value) => Reply::Reply(value),
            Err(LedgerError::Rejected { code, message }) => Reply::Reject(Reject { code, message }),
            Err(other) => Reply::Reject(Reject {
                code: reject_code::CANISTER_ERROR,
                message: other.to_string(),
            }),
        }
    }

    pub fn into_result(self) -> LedgerResult<T> {
        match self {
            Reply::Reply(value) => Ok(value),
            Reply::Reject(Reject { code, message }) => Err(LedgerError::Rejected { code, message }),
        }
    }
}

/// Decode a reply body
pub fn decode_reply<T: DeserializeOwned>(body: &str) -> LedgerResult<T> {
    serde_json::from_str::<Reply<T>>(body)
        .map_err(|e| LedgerError::Decode(e.to_string()))?
        .into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(status_url("http://localhost:4943"), "http://localhost:4943/api/v2/status");
        assert_eq!(
            method_url("https://ic0.app", "abc-cai", CallKind::Query, GET_EVENTS),
            "https://ic0.app/api/v2/canister/abc-cai/query/getEvents"
        );
        assert_eq!(
            method_url("https://ic0.app", "abc-cai", CallKind::Update, ATTEND_EVENT),
            "https://ic0.app/api/v2/canister/abc-cai/call/attendEvent"
        );
    }

    #[test]
    fn test_reply_envelope() {
        let ok: EventId = decode_reply(r#"{"reply": 7}"#).unwrap();
        assert_eq!(ok, EventId(7));

        let err = decode_reply::<EventId>(r#"{"reject": {"code": 4, "message": "Event not found"}}"#)
            .unwrap_err();
        assert_eq!(err, LedgerError::rejected(4, "Event not found"));
        assert_eq!(err.to_string(), "Event not found");

        assert!(matches!(
            decode_reply::<EventId>("<html>"),
            Err(LedgerError::Decode(_))
        ));
    }

    #[test]
    fn test_unit_reply_shape() {
        let json = serde_json::to_string(&Reply::<()>::Reply(())).unwrap();
        assert_eq!(json, r#"{"reply":null}"#);
        decode_reply::<()>(&json).unwrap();
    }
}
