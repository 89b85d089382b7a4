//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use leptos_router::*;

use chronox::auth::{Session, SessionStatus};

use crate::components::{Button, Header, Toast};
use crate::pages::{CreateEvent, EventDetail, Events, Home};
use crate::state::{provide_app_state, use_app_state};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_app_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <Header />

                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    <ErrorBoundary fallback=|errors| view! { <Crashed errors=errors /> }>
                        <Routes>
                            <Route path="/" view=Home />
                            <Route path="/events" view=Events />
                            <Route path="/create" view=CreateEvent />
                            <Route path="/events/:id" view=EventDetail />
                            <Route path="/*any" view=NotFound />
                        </Routes>
                    </ErrorBoundary>
                </main>

                <Footer />

                <Toast />
            </div>
        </Router>
    }
}

/// Network and canister the app is talking to
#[component]
fn Footer() -> impl IntoView {
    let state = use_app_state();
    let config = state.connector.config().clone();

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm text-gray-400">
                <span>"ChronoX on "{config.network.to_string()}</span>
                <span class="font-mono">{config.canister_id.clone()}</span>
                {move || state.session.with(pending_label).map(|label| view! {
                    <div class="flex items-center space-x-2 text-primary-400">
                        <div class="loading-spinner w-4 h-4" />
                        <span>{label}</span>
                    </div>
                })}
            </div>
        </footer>
    }
}

/// Footer text while a sign-in or sign-out is in flight. A signed-in
/// session that is pending can only be signing out.
fn pending_label(session: &Session) -> Option<&'static str> {
    if !session.is_pending() {
        return None;
    }
    match session.status() {
        SessionStatus::Authenticated(_) => Some("Signing out..."),
        SessionStatus::Anonymous => Some("Signing in..."),
    }
}

/// Last-resort fallback for a failed render, e.g. an event record whose
/// start time cannot be displayed
#[component]
fn Crashed(errors: RwSignal<Errors>) -> impl IntoView {
    let reload = |_| {
        if let Err(e) = window().location().reload() {
            web_sys::console::error_1(&e);
        }
    };

    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center space-y-4">
            <div class="text-6xl">"⚠️"</div>
            <h1 class="text-3xl font-bold">"Something went wrong with ChronoX"</h1>
            <ul class="text-gray-400 text-sm">
                {move || errors
                    .get()
                    .into_iter()
                    .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                    .collect_view()}
            </ul>
            <Button on_click=reload>"Reload"</Button>
        </div>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/events"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Browse Events"
            </A>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candid::Principal;
    use chronox::auth::Identity;

    #[test]
    fn test_pending_label_tells_sign_in_from_sign_out() {
        let mut session = Session::new();
        assert_eq!(pending_label(&session), None);

        assert!(session.begin());
        assert_eq!(pending_label(&session), Some("Signing in..."));

        session.settle_login(Ok(Identity::new(Principal::self_authenticating(b"alice"))));
        assert_eq!(pending_label(&session), None);

        assert!(session.begin());
        assert_eq!(pending_label(&session), Some("Signing out..."));

        session.settle_logout(Ok(()));
        assert_eq!(pending_label(&session), None);
    }
}
