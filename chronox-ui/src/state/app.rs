//! Application State
//!
//! One [`Session`] per running app, held in a signal so every page re-renders
//! on sign-in and sign-out.

use leptos::*;
use std::rc::Rc;

use candid::Principal;
use chronox::auth::{
    DevIdentityConfig, DevIdentityProvider, Identity, IdentityProvider, Session, SessionStatus,
};

use crate::api::{network_config, GlooConnector};

/// Shared application state provided to all components
#[derive(Clone)]
pub struct AppState {
    pub session: RwSignal<Session>,
    pub connector: GlooConnector,
    provider: Rc<DevIdentityProvider>,
    /// Toast message
    pub notice: RwSignal<Option<String>>,
}

/// Seed for this tab's development identity; kept in memory only
fn browser_seed() -> String {
    format!("chronox-browser-{:x}", (js_sys::Math::random() * 1e15) as u64)
}

/// Provide application state to the component tree
pub fn provide_app_state() {
    let config = network_config();
    web_sys::console::log_1(
        &format!("ChronoX on {} ({})", config.network, config.canister_id).into(),
    );

    let state = AppState {
        session: create_rw_signal(Session::new()),
        connector: GlooConnector::new(config),
        provider: Rc::new(DevIdentityProvider::new(DevIdentityConfig::with_seed(browser_seed()))),
        notice: create_rw_signal(None),
    };

    provide_context(state);
}

pub fn use_app_state() -> AppState {
    use_context::<AppState>().expect("AppState not found")
}

impl AppState {
    pub fn is_authenticated(&self) -> bool {
        self.session.with(Session::is_authenticated)
    }

    /// Login or logout in flight
    pub fn is_pending(&self) -> bool {
        self.session.with(Session::is_pending)
    }

    pub fn principal(&self) -> Option<Principal> {
        self.session.with(Session::principal)
    }

    /// Live identity, read without subscribing
    pub fn identity(&self) -> Option<Identity> {
        self.session.with_untracked(|s| s.identity().cloned())
    }

    /// Start the sign-in flow. Ignored while another transition is running.
    pub fn login(&self) {
        let mut started = false;
        self.session.update(|s| started = s.begin());
        if !started {
            return;
        }

        let session = self.session;
        let provider = Rc::clone(&self.provider);
        spawn_local(async move {
            let result = provider.authenticate().await;
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Login failed: {}", e).into());
            }
            session.update(|s| s.settle_login(result));
        });
    }

    pub fn logout(&self) {
        // An expired identity still gets signed out
        let identity = match self.session.with_untracked(|s| s.status().clone()) {
            SessionStatus::Authenticated(identity) => identity,
            SessionStatus::Anonymous => return,
        };
        let mut started = false;
        self.session.update(|s| started = s.begin());
        if !started {
            return;
        }

        let session = self.session;
        let provider = Rc::clone(&self.provider);
        spawn_local(async move {
            let result = provider.sign_out(&identity).await;
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Logout failed: {}", e).into());
            }
            session.update(|s| s.settle_logout(result));
        });
    }

    /// Show a toast (auto-clears after timeout)
    pub fn show_notice(&self, message: &str) {
        self.notice.set(Some(message.to_string()));

        let notice = self.notice;
        gloo_timers::callback::Timeout::new(3000, move || {
            notice.set(None);
        })
        .forget();
    }
}
