//! Header Component
//!
//! Brand, navigation links and the sign-in control.

use leptos::*;
use leptos_router::*;

use chronox::types::short_principal;
use chronox::view::CARD_PRINCIPAL_CHARS;

use crate::components::{Button, ButtonSize, ButtonVariant};
use crate::state::use_app_state;

#[component]
pub fn Header() -> impl IntoView {
    let state = use_app_state();
    let signed_in = {
        let state = state.clone();
        move || state.is_authenticated()
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"📅"</span>
                        <span class="text-xl font-bold text-white">"ChronoX"</span>
                    </A>

                    <div class="flex items-center space-x-1">
                        <NavLink href="/events" label="Events" />
                        <Show when=signed_in.clone()>
                            <NavLink href="/create" label="Create Event" />
                        </Show>
                        <AuthControl />
                    </div>
                </div>
            </div>
        </nav>
    }
}

#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            active_class="bg-gray-700 text-white"
        >
            {label}
        </A>
    }
}

/// Principal and Sign Out when signed in, Sign In otherwise
#[component]
fn AuthControl() -> impl IntoView {
    let state = use_app_state();
    let pending = {
        let state = state.clone();
        Signal::derive(move || state.is_pending())
    };

    move || {
        let state = state.clone();
        match state.principal() {
            Some(principal) => view! {
                <div class="flex items-center space-x-3 ml-4">
                    <span class="text-sm text-gray-400 font-mono">
                        {short_principal(&principal, CARD_PRINCIPAL_CHARS)}
                    </span>
                    <Button
                        variant=ButtonVariant::Secondary
                        size=ButtonSize::Sm
                        loading=pending
                        on_click=move |_| state.logout()
                    >
                        "Sign Out"
                    </Button>
                </div>
            }
            .into_view(),
            None => view! {
                <div class="ml-4">
                    <Button size=ButtonSize::Sm loading=pending on_click=move |_| state.login()>
                        {move || if pending.get() { "Signing In..." } else { "Sign In" }}
                    </Button>
                </div>
            }
            .into_view(),
        }
    }
}
