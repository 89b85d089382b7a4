//! Events Page
//!
//! Filterable grid of every event, fetched anonymously on mount.

use leptos::*;
use leptos_router::*;

use chronox::ledger::{Connector, EventLedger};
use chronox::remote::EventsQuery;
use chronox::view::EventFilter;

use crate::api::GlooConnector;
use crate::components::{Button, ButtonSize, ButtonVariant, EventCard, Loading};
use crate::state::use_app_state;

/// Run the list read and settle `query` when it lands
pub fn load_events(query: RwSignal<EventsQuery>, connector: GlooConnector) {
    query.update(EventsQuery::begin);
    spawn_local(async move {
        let result = connector.anonymous().get_events().await;
        query.update(|q| {
            q.settle(result);
        });
    });
}

#[component]
pub fn Events() -> impl IntoView {
    let state = use_app_state();
    let query = create_rw_signal(EventsQuery::new());
    let filter = create_rw_signal(EventFilter::default());

    load_events(query, state.connector.clone());

    let refresh = {
        let connector = state.connector.clone();
        move |_| load_events(query, connector.clone())
    };
    let loading = Signal::derive(move || query.with(EventsQuery::is_loading));

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Events"</h1>
                    <p class="text-gray-400 mt-1">"Discover what's happening on ChronoX"</p>
                </div>
                <Button variant=ButtonVariant::Secondary loading=loading on_click=refresh>
                    "↻ Refresh"
                </Button>
            </div>

            <div class="flex space-x-2">
                {EventFilter::ALL
                    .into_iter()
                    .map(|option| view! { <FilterButton option=option filter=filter query=query /> })
                    .collect_view()}
            </div>

            <EventGrid query=query filter=filter />

            <SignInPrompt />
        </div>
    }
}

#[component]
fn FilterButton(
    option: EventFilter,
    filter: RwSignal<EventFilter>,
    query: RwSignal<EventsQuery>,
) -> impl IntoView {
    let count = move || query.with(|q| option.count(q.events()));
    let class = move || {
        if filter.get() == option {
            "px-4 py-2 rounded-lg bg-primary-600 text-white font-medium"
        } else {
            "px-4 py-2 rounded-lg bg-gray-800 text-gray-300 hover:bg-gray-700 transition-colors"
        }
    };

    view! {
        <button class=class on:click=move |_| filter.set(option)>
            {option.label()}" ("{count}")"
        </button>
    }
}

#[component]
fn EventGrid(query: RwSignal<EventsQuery>, filter: RwSignal<EventFilter>) -> impl IntoView {
    let state = use_app_state();

    move || {
        if query.with(EventsQuery::is_loading) {
            return view! { <Loading text="Loading events..." /> }.into_view();
        }

        if let Some(error) = query.with(|q| q.error().map(str::to_string)) {
            let connector = state.connector.clone();
            return view! {
                <div class="bg-red-900/30 border border-red-700 rounded-lg p-6 text-center space-y-4">
                    <p class="text-red-300">{error}</p>
                    <Button on_click=move |_| load_events(query, connector.clone())>
                        "Try Again"
                    </Button>
                </div>
            }
            .into_view();
        }

        let active = filter.get();
        let events: Vec<_> = query.with(|q| active.apply(q.events()).into_iter().cloned().collect());
        if events.is_empty() {
            return view! {
                <div class="text-center py-16 text-gray-400">
                    <div class="text-5xl mb-4">"📭"</div>
                    <p>{active.empty_message()}</p>
                </div>
            }
            .into_view();
        }

        view! {
            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                {events
                    .into_iter()
                    .map(|event| view! { <EventCard event=event /> })
                    .collect_view()}
            </div>
        }
        .into_view()
    }
}

/// Anonymous visitors get a nudge toward creating their own event
#[component]
fn SignInPrompt() -> impl IntoView {
    let state = use_app_state();
    let anonymous = {
        let state = state.clone();
        move || !state.is_authenticated()
    };

    view! {
        <Show
            when=anonymous
            fallback=|| view! {
                <div class="text-center">
                    <A href="/create">
                        <Button variant=ButtonVariant::Accent size=ButtonSize::Lg>
                            "+ Create Event"
                        </Button>
                    </A>
                </div>
            }
        >
            <div class="bg-gray-800 rounded-xl p-8 text-center space-y-4">
                <p class="text-gray-300">"Sign in to create events and register as an attendee."</p>
                {
                    let state = state.clone();
                    view! {
                        <Button on_click=move |_| state.login()>"Sign In"</Button>
                    }
                }
            </div>
        </Show>
    }
}
