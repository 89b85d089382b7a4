//! gloo-net Ledger Transport
//!
//! Same JSON gateway format as the native reqwest transport, over the
//! browser's fetch.

use async_trait::async_trait;
use candid::Principal;
use gloo_net::http::Request;
use serde::{de::DeserializeOwned, Serialize};

use chronox::auth::Identity;
use chronox::config::{Network, NetworkConfig, DEFAULT_CANISTER_ID};
use chronox::ledger::wire::{self, CallKind, IdArgs, NoArgs, StatusResponse};
use chronox::ledger::{Connector, EventLedger, LedgerError, LedgerResult};
use chronox::types::{Event, EventId, EventPayload, EventSummary};

/// Network settings baked in at build time.
///
/// `DFX_NETWORK` selects the network (anything but `ic` is local),
/// `CANISTER_ID_CHRONOX_BACKEND` the actor and `CHRONOX_HOST` an optional
/// gateway override.
pub fn network_config() -> NetworkConfig {
    let network = match option_env!("DFX_NETWORK").map(str::parse::<Network>) {
        Some(Ok(network)) => network,
        Some(Err(e)) => {
            web_sys::console::error_1(&format!("{}; using local", e).into());
            Network::Local
        }
        None => Network::Local,
    };

    let mut config = NetworkConfig::new(
        network,
        option_env!("CANISTER_ID_CHRONOX_BACKEND").unwrap_or(DEFAULT_CANISTER_ID),
    );
    config.host = option_env!("CHRONOX_HOST").map(str::to_string);
    config
}

fn map_request_error(e: gloo_net::Error) -> LedgerError {
    match e {
        // fetch() itself failed: offline, refused, CORS
        gloo_net::Error::JsError(js) => {
            web_sys::console::error_1(&format!("Network error: {}", js).into());
            LedgerError::Unavailable
        }
        gloo_net::Error::SerdeError(e) => LedgerError::Decode(e.to_string()),
        other => LedgerError::Transport(other.to_string()),
    }
}

/// Connector for the configured gateway
#[derive(Debug, Clone)]
pub struct GlooConnector {
    config: NetworkConfig,
}

impl GlooConnector {
    pub fn new(config: NetworkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    async fn status(&self) -> LedgerResult<StatusResponse> {
        let response = Request::get(&wire::status_url(&self.config.host()))
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.ok() {
            return Err(LedgerError::Unavailable);
        }

        response.json().await.map_err(map_request_error)
    }

    /// Development replicas sign with a key that is not the production
    /// root; signed handles are bound to it
    async fn fetch_root_key(&self) -> LedgerResult<String> {
        let status = self.status().await?;
        if !status.healthy {
            return Err(LedgerError::Unavailable);
        }
        status
            .root_key
            .ok_or_else(|| LedgerError::Decode("status reply carries no root key".to_string()))
    }

    fn ledger(&self, sender: Option<Principal>, root_key: Option<String>) -> GlooLedger {
        GlooLedger {
            host: self.config.host(),
            canister_id: self.config.canister_id.clone(),
            sender,
            root_key,
        }
    }
}

#[async_trait(?Send)]
impl Connector for GlooConnector {
    type Ledger = GlooLedger;

    fn anonymous(&self) -> GlooLedger {
        self.ledger(None, None)
    }

    async fn authenticated(&self, identity: &Identity) -> LedgerResult<GlooLedger> {
        let root_key = if self.config.network.needs_root_key() {
            Some(self.fetch_root_key().await?)
        } else {
            None
        };
        Ok(self.ledger(Some(identity.principal()), root_key))
    }
}

/// Actor handle over fetch
#[derive(Debug, Clone)]
pub struct GlooLedger {
    host: String,
    canister_id: String,
    sender: Option<Principal>,
    root_key: Option<String>,
}

impl GlooLedger {
    /// Replica root key this handle was bound against, on local networks
    pub fn root_key(&self) -> Option<&str> {
        self.root_key.as_deref()
    }

    async fn invoke<A, R>(&self, kind: CallKind, method: &str, args: &A) -> LedgerResult<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = wire::method_url(&self.host, &self.canister_id, kind, method);

        let mut builder = Request::post(&url);
        if let (CallKind::Update, Some(sender)) = (kind, self.sender) {
            builder = builder.header(wire::SENDER_HEADER, &sender.to_text());
        }

        let response = builder
            .json(args)
            .map_err(|e| LedgerError::Transport(format!("Request build error: {}", e)))?
            .send()
            .await
            .map_err(map_request_error)?;

        let ok = response.ok();
        let status = response.status();
        let body = response.text().await.map_err(map_request_error)?;

        match wire::decode_reply(&body) {
            Err(LedgerError::Decode(_)) if !ok => Err(LedgerError::Transport(format!(
                "{} returned {}",
                method, status
            ))),
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
impl EventLedger for GlooLedger {
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

    #[test]
    fn test_anonymous_handle_has_no_sender() {
        let connector = GlooConnector::new(NetworkConfig::new(Network::Ic, "abc-cai"));
        let ledger = connector.anonymous();
        assert_eq!(ledger.host, "https://ic0.app");
        assert_eq!(ledger.canister_id, "abc-cai");
        assert!(ledger.sender.is_none());
        assert!(ledger.root_key().is_none());
    }

    #[test]
    fn test_host_override() {
        let mut config = NetworkConfig::new(Network::Local, "abc-cai");
        config.host = Some("http://127.0.0.1:8000/".to_string());
        assert_eq!(GlooConnector::new(config).anonymous().host, "http://127.0.0.1:8000");
    }
}
