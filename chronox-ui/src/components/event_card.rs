//! Event Card Component
//!
//! One entry of the events grid, linking to the detail page.

use leptos::*;
use leptos_router::*;

use chronox::dates::{format_date_time, now_millis};
use chronox::types::{attendee_label, EventSummary};
use chronox::view::{principal_label, relative_label, status_label, CARD_PRINCIPAL_CHARS};

use crate::state::use_app_state;

#[component]
pub fn EventCard(event: EventSummary) -> impl IntoView {
    let state = use_app_state();

    let relative = relative_label(event.start_time, event.completed, now_millis());
    let badge = if event.completed {
        "bg-gray-600 text-gray-200"
    } else {
        "bg-emerald-600 text-white"
    };
    let creator = event.creator;

    view! {
        <A
            href=format!("/events/{}", event.id)
            class="block bg-gray-800 border border-gray-700 rounded-lg p-6 \
                   hover:border-primary-500 transition-colors"
        >
            <div class="flex items-start justify-between mb-3">
                <h3 class="text-lg font-semibold text-white line-clamp-2">{event.title.clone()}</h3>
                <span class=format!("ml-2 px-2 py-0.5 rounded text-xs font-medium {}", badge)>
                    {status_label(event.completed)}
                </span>
            </div>

            <div class="space-y-2 text-sm text-gray-300">
                <p>"📍 "{event.location.clone()}</p>
                <p>
                    "🕒 "{format_date_time(event.start_time)}
                    {relative.map(|label| view! {
                        <span class="ml-2 text-primary-400">"("{label}")"</span>
                    })}
                </p>
                <p>"👥 "{attendee_label(event.num_of_attendees)}</p>
            </div>

            <p class="mt-4 text-xs text-gray-500">
                "Organized by "
                {move || principal_label(&creator, state.principal(), CARD_PRINCIPAL_CHARS)}
            </p>
        </A>
    }
}
