//! Toast Notification Component

use leptos::*;

use crate::state::use_app_state;

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_app_state();

    view! {
        <div class="fixed bottom-4 right-4 z-50">
            {move || {
                state.notice.get().map(|message| view! {
                    <div class="flex items-center space-x-3 bg-green-600 text-white px-4 py-3 \
                                rounded-lg shadow-lg animate-slide-in">
                        <span class="text-lg">"✓"</span>
                        <span class="text-sm font-medium">{message}</span>
                    </div>
                })
            }}
        </div>
    }
}
