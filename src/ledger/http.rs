//! Gateway HTTP Client
//!
//! reqwest transport for the event actor. Reads go to the anonymous query
//! endpoint; writes go to the call endpoint with the bound sender.

use async_trait::async_trait;
use candid::Principal;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use super::wire::{self, CallKind, IdArgs, NoArgs, StatusResponse};
use super::{Connector, EventLedger, LedgerError, LedgerResult};
use crate::auth::Identity;
use crate::config::NetworkConfig;
use crate::types::{Event, EventId, EventPayload, EventSummary};

fn map_request_error(e: reqwest::Error) -> LedgerError {
    if e.is_timeout() {
        LedgerError::Timeout
    } else if e.is_connect() {
        LedgerError::Unavailable
    } else {
        LedgerError::Transport(e.to_string())
    }
}

/// Connector for a gateway selected by [`NetworkConfig`]
#[derive(Debug, Clone)]
pub struct HttpConnector {
    client: Client,
    config: NetworkConfig,
}

impl HttpConnector {
    pub fn new(config: NetworkConfig) -> LedgerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| LedgerError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Ask the gateway for its status
    pub async fn status(&self) -> LedgerResult<StatusResponse> {
        let url = wire::status_url(&self.config.host());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            return Err(LedgerError::Unavailable);
        }

        response
            .json()
            .await
            .map_err(|e| LedgerError::Decode(e.to_string()))
    }

    /// Development replicas sign with a key that is not the production root,
    /// so it has to be fetched before any signed call.
    async fn fetch_root_key(&self) -> LedgerResult<String> {
        let status = self.status().await?;
        if !status.healthy {
            return Err(LedgerError::Unavailable);
        }
        status
            .root_key
            .ok_or_else(|| LedgerError::Decode("status reply carries no root key".to_string()))
    }

    fn ledger(&self, sender: Option<Principal>, root_key: Option<String>) -> HttpLedger {
        HttpLedger {
            client: self.client.clone(),
            host: self.config.host(),
            canister_id: self.config.canister_id.clone(),
            sender,
            root_key,
        }
    }
}

#[async_trait(?Send)]
impl Connector for HttpConnector {
    type Ledger = HttpLedger;

    fn anonymous(&self) -> HttpLedger {
        self.ledger(None, None)
    }

    async fn authenticated(&self, identity: &Identity) -> LedgerResult<HttpLedger> {
        let root_key = if self.config.network.needs_root_key() {
            let root_key = self.fetch_root_key().await?;
            tracing::debug!(root_key = %root_key, "Fetched replica root key");
            Some(root_key)
        } else {
            None
        };
        Ok(self.ledger(Some(identity.principal()), root_key))
    }
}

/// Actor handle over HTTP
#[derive(Debug, Clone)]
pub struct HttpLedger {
    client: Client,
    host: String,
    canister_id: String,
    /// `None` for anonymous handles
    sender: Option<Principal>,
    root_key: Option<String>,
}

impl HttpLedger {
    /// Root key of the development replica this handle was bound against.
    /// `None` on production networks and on anonymous handles.
    pub fn root_key(&self) -> Option<&str> {
        self.root_key.as_deref()
    }

    async fn invoke<A, R>(&self, kind: CallKind, method: &str, args: &A) -> LedgerResult<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = wire::method_url(&self.host, &self.canister_id, kind, method);

        let mut request = self.client.post(&url).json(args);
        if let (CallKind::Update, Some(sender)) = (kind, self.sender) {
            request = request.header(wire::SENDER_HEADER, sender.to_text());
        }

        let response = request.send().await.map_err(map_request_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_request_error)?;

        // Rejects travel in the envelope even on error statuses
        match wire::decode_reply(&body) {
            Err(LedgerError::Decode(_)) if !status.is_success() => Err(LedgerError::Transport(
                format!("{} returned {}", method, status),
            )),
            other => other,
        }
    }

    async fn update<A, R>(&self, method: &str, args: &A) -> LedgerResult<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        if self.sender.is_none() {
            return Err(LedgerError::rejected(
                wire::reject_code::CANISTER_REJECT,
                "Anonymous callers cannot modify events",
            ));
        }
        self.invoke(CallKind::Update, method, args).await
    }
}

#[async_trait(?Send)]
impl EventLedger for HttpLedger {
    async fn get_events(&self) -> LedgerResult<Vec<EventSummary>> {
        self.invoke(CallKind::Query, wire::GET_EVENTS, &NoArgs {}).await
    }

    async fn get_event_detail(&self, id: EventId) -> LedgerResult<Event> {
        self.invoke(CallKind::Query, wire::GET_EVENT_DETAIL, &IdArgs { id })
            .await
    }

    async fn create_event(&self, payload: &EventPayload) -> LedgerResult<EventId> {
        self.update(wire::CREATE_EVENT, payload).await
    }

    async fn attend_event(&self, id: EventId) -> LedgerResult<()> {
        self.update(wire::ATTEND_EVENT, &IdArgs { id }).await
    }

    async fn complete_event(&self, id: EventId) -> LedgerResult<()> {
        self.update(wire::COMPLETE_EVENT, &IdArgs { id }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Network;

    #[test]
    fn test_connector_targets_network_host() {
        let connector =
            HttpConnector::new(NetworkConfig::new(Network::Ic, "abc-cai")).unwrap();
        let ledger = connector.anonymous();
        assert_eq!(ledger.host, "https://ic0.app");
        assert_eq!(ledger.canister_id, "abc-cai");
        assert!(ledger.sender.is_none());
        assert!(ledger.root_key().is_none());
    }

    #[tokio::test]
    async fn test_anonymous_handle_refuses_writes_locally() {
        let connector = HttpConnector::new(NetworkConfig {
            host: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        })
        .unwrap();

        let err = connector
            .anonymous()
            .attend_event(EventId(1))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_gateway() {
        let connector = HttpConnector::new(NetworkConfig {
            host: Some("http://127.0.0.1:9".to_string()),
            request_timeout_ms: 2_000,
            ..Default::default()
        })
        .unwrap();

        let err = connector.anonymous().get_events().await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Unavailable | LedgerError::Timeout | LedgerError::Transport(_)
        ));
    }
}
