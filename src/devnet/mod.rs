//! Local development replica
//!
//! Serves an in-memory event actor over the JSON gateway format, for the
//! browser front-end and the CLI during development and for end-to-end tests.
//!
//! # Endpoints
//!
//! - `GET /api/v2/status` - Health and root key
//! - `POST /api/v2/canister/:canister_id/query/:method` - `getEvents`, `getEventDetail`
//! - `POST /api/v2/canister/:canister_id/call/:method` - `createEvent`, `attendEvent`, `completeEvent`
//! - `GET /health/live` - Liveness probe
//!
//! # Example
//!
//! ```rust,ignore
//! use chronox::devnet::{serve, DevnetConfig, DevnetState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DevnetConfig::default();
//!     serve(DevnetState::new(config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod routes;
pub mod state;

pub use error::{DevnetError, DevnetResult};
pub use state::{DevnetConfig, DevnetState};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the replica router with all routes and middleware
pub fn build_router(state: DevnetState) -> Router {
    let api_routes = Router::new()
        .route("/status", get(routes::status))
        .route("/canister/:canister_id/query/:method", post(routes::query))
        .route("/canister/:canister_id/call/:method", post(routes::call));

    let health_routes = Router::new().route("/live", get(routes::liveness));

    Router::new()
        .nest("/api/v2", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        // The browser front-end is served from another origin
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Start the replica
pub async fn serve(state: DevnetState, config: &DevnetConfig) -> Result<(), DevnetError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(canister_id = %config.canister_id, "ChronoX devnet listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DevnetError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("ChronoX devnet shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Identity, Session};
    use crate::config::{Network, NetworkConfig, DEFAULT_CANISTER_ID};
    use crate::ledger::wire::SENDER_HEADER;
    use crate::ledger::{Connector, EventLedger, HttpConnector, LedgerError, LedgerStore};
    use crate::remote::{EventActions, EventQuery, EventsQuery};
    use crate::types::{EventId, EventPayload};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use candid::Principal;
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, Arc<LedgerStore>) {
        let store = Arc::new(LedgerStore::new());
        let state = DevnetState::with_store(Arc::clone(&store), DevnetConfig::default());
        (build_router(state), store)
    }

    fn method_uri(kind: &str, method: &str) -> String {
        format!("/api/v2/canister/{}/{}/{}", DEFAULT_CANISTER_ID, kind, method)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn alice() -> Principal {
        Principal::self_authenticating(b"alice")
    }

    #[tokio::test]
    async fn test_status() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v2/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["healthy"], true);
        assert!(json["rootKey"].is_string());
    }

    #[tokio::test]
    async fn test_get_events_empty() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(method_uri("query", "getEvents"))
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "reply": [] }));
    }

    #[tokio::test]
    async fn test_create_event_as_sender() {
        let (app, store) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(method_uri("call", "createEvent"))
                    .header("Content-Type", "application/json")
                    .header(SENDER_HEADER, alice().to_text())
                    .body(Body::from(
                        r#"{"title": "Meetup", "location": "Hall", "startTime": 1900000000000, "completed": false}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "reply": 0 }));
        assert_eq!(store.get_event_detail(EventId(0)).unwrap().creator, alice());
    }

    #[tokio::test]
    async fn test_anonymous_call_is_rejected_in_envelope() {
        let (app, store) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(method_uri("call", "attendEvent"))
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"id": 0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["reject"]["message"], "Anonymous callers cannot modify events");
        assert_eq!(store.request_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_canister() {
        let (app, store) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v2/canister/aaaaa-aa/query/getEvents")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert!(json["reject"]["requestId"].is_string());
        assert_eq!(store.request_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_method_and_bad_args() {
        let (app, _store) = create_test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(method_uri("query", "createEvent"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(method_uri("query", "getEventDetail"))
                    .header("Content-Type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_injected_failure_maps_to_status() {
        let (app, store) = create_test_app();
        store.fail_next(LedgerError::Unavailable).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(method_uri("query", "getEvents"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    /// The HTTP connector and the remote state machines against a live replica
    #[tokio::test]
    async fn test_http_connector_end_to_end() {
        let store = Arc::new(LedgerStore::new());
        let router = build_router(DevnetState::with_store(
            Arc::clone(&store),
            DevnetConfig::default(),
        ));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let connector = HttpConnector::new(NetworkConfig {
            host: Some(format!("http://{}", addr)),
            ..NetworkConfig::new(Network::Local, DEFAULT_CANISTER_ID)
        })
        .unwrap();

        let mut session = Session::new();
        session.settle_login(Ok(Identity::new(alice())));

        // Local networks bind signed handles to the replica's root key
        let ledger = connector.authenticated(&Identity::new(alice())).await.unwrap();
        assert_eq!(ledger.root_key(), Some(store.root_key()));
        assert!(connector.anonymous().root_key().is_none());

        // Writes without an identity never reach the replica
        let mut actions = EventActions::new();
        assert!(actions
            .create_event(&connector, &Session::new(), &EventPayload::new("Meetup", "Hall", 1_900_000_000_000))
            .await
            .is_err());
        assert_eq!(store.request_count(), 0);

        let id = actions
            .create_event(&connector, &session, &EventPayload::new("Meetup", "Hall", 1_900_000_000_000))
            .await
            .unwrap();
        actions.attend_event(&connector, &session, id).await.unwrap();

        let mut events = EventsQuery::new();
        assert!(events.fetch(&connector).await);
        assert_eq!(events.events().len(), 1);
        assert_eq!(events.events()[0].num_of_attendees, 1);

        let mut detail = EventQuery::new();
        assert!(detail.watch(&connector, Some(id)).await);
        assert_eq!(detail.event().map(|e| e.creator), Some(alice()));

        // Duplicate attend: the reject message comes back verbatim
        assert!(actions.attend_event(&connector, &session, id).await.is_err());
        assert_eq!(actions.error(), Some("Already attending this event"));

        let missing = connector
            .anonymous()
            .get_event_detail(EventId(99))
            .await
            .unwrap_err();
        assert_eq!(missing.to_string(), "Event not found");
    }
}
