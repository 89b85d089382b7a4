//! Event Detail Page
//!
//! Full record for one event plus the attend/complete controls the viewer
//! is entitled to.

use leptos::*;
use leptos_router::*;

use chronox::auth::Session;
use chronox::dates::{now_millis, try_format_date_time, DateError};
use chronox::ledger::{Connector, EventLedger};
use chronox::remote::{actions, Action, EventActions, EventQuery};
use chronox::types::{attendee_label, Event, EventId, Timestamp};
use chronox::view::{principal_label, relative_label, status_label, DetailPanel, DETAIL_PRINCIPAL_CHARS};

use crate::api::GlooConnector;
use crate::components::{Button, ButtonSize, ButtonVariant, Card, Loading};
use crate::state::use_app_state;

/// Writes offered on this page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DetailAction {
    Attend,
    Complete,
}

impl From<DetailAction> for Action {
    fn from(action: DetailAction) -> Self {
        match action {
            DetailAction::Attend => Action::Attend,
            DetailAction::Complete => Action::Complete,
        }
    }
}

/// Fetch the query's current id, if any, and settle it when the reply lands
pub fn load_event(query: RwSignal<EventQuery>, connector: GlooConnector) {
    let mut id = None;
    query.update(|q| id = q.begin());
    let Some(id) = id else {
        return;
    };

    spawn_local(async move {
        let result = connector.anonymous().get_event_detail(id).await;
        query.update(|q| {
            q.settle(id, result);
        });
    });
}

#[component]
pub fn EventDetail() -> impl IntoView {
    let state = use_app_state();
    let params = use_params_map();
    let navigate = use_navigate();

    let id = create_memo(move |_| {
        params.with(|p| p.get("id").and_then(|raw| raw.parse::<EventId>().ok()))
    });

    let query = create_rw_signal(EventQuery::new());
    let actions_state = create_rw_signal(EventActions::new());
    let success = create_rw_signal(None::<String>);

    {
        let connector = state.connector.clone();
        create_effect(move |_| match id.get() {
            Some(id) => {
                let mut due = false;
                query.update(|q| due = q.set_id(Some(id)));
                if due {
                    actions_state.set(EventActions::new());
                    success.set(None);
                    load_event(query, connector.clone());
                }
            }
            None => navigate(
                "/events",
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            ),
        });
    }

    let run = {
        let state = state.clone();
        Callback::new(move |action: DetailAction| {
            let Some(id) = id.get_untracked() else {
                return;
            };
            let mut started = Ok(());
            actions_state.update(|a| started = a.begin());
            if started.is_err() {
                return;
            }
            success.set(None);

            let state = state.clone();
            spawn_local(async move {
                let identity = state.identity();
                let result = match action {
                    DetailAction::Attend => {
                        actions::attend_event(&state.connector, identity.as_ref(), id).await
                    }
                    DetailAction::Complete => {
                        actions::complete_event(&state.connector, identity.as_ref(), id).await
                    }
                };

                let action = Action::from(action);
                let mut succeeded = false;
                actions_state.update(|a| succeeded = a.settle(action, result).is_ok());
                if succeeded {
                    success.set(Some(action.success_message().to_string()));
                    load_event(query, state.connector.clone());
                }
            });
        })
    };

    let retry = {
        let connector = state.connector.clone();
        move |_| load_event(query, connector.clone())
    };

    view! {
        <div class="max-w-4xl mx-auto space-y-6">
            <A href="/events" class="text-gray-400 hover:text-white transition-colors">
                "← Back to Events"
            </A>

            {move || {
                if let Some(error) = query.with(|q| q.error().map(str::to_string)) {
                    let retry = retry.clone();
                    return view! {
                        <div class="bg-red-900/30 border border-red-700 rounded-lg p-6 text-center space-y-4">
                            <p class="text-red-300">{error}</p>
                            <Button on_click=retry>"Try Again"</Button>
                        </div>
                    }
                    .into_view();
                }

                match query.with(|q| q.event().cloned()) {
                    Some(event) => view! {
                        <EventView event=event actions_state=actions_state success=success run=run />
                    }
                    .into_view(),
                    None => view! { <Loading text="Loading event..." /> }.into_view(),
                }
            }}
        </div>
    }
}

/// Date line for the info grid. A start time chrono cannot represent fails
/// the render instead of showing placeholder text.
fn schedule_label(event: &Event, now: Timestamp) -> Result<String, DateError> {
    let when = try_format_date_time(event.start_time)?;
    Ok(match relative_label(event.start_time, event.completed, now) {
        Some(relative) => format!("{} ({})", when, relative),
        None => when,
    })
}

/// Action panel for `event`, recomputed whenever the session signs in or out
fn detail_panel(event: Event, session: RwSignal<Session>) -> Signal<DetailPanel> {
    Signal::derive(move || {
        DetailPanel::decide(&event, session.with(Session::principal), now_millis())
    })
}

#[component]
fn EventView(
    event: Event,
    actions_state: RwSignal<EventActions>,
    success: RwSignal<Option<String>>,
    run: Callback<DetailAction>,
) -> impl IntoView {
    let state = use_app_state();
    let session = state.session;
    let viewer = Signal::derive(move || session.with(Session::principal));

    let when = match schedule_label(&event, now_millis()) {
        Ok(when) => when,
        Err(e) => return Err(e),
    };
    let panel = detail_panel(event.clone(), session);
    let loading = Signal::derive(move || actions_state.with(EventActions::is_loading));
    let badge = if event.completed {
        "bg-gray-600 text-gray-200"
    } else {
        "bg-emerald-600 text-white"
    };
    let creator = event.creator;

    let attendees = if event.attendees.is_empty() {
        view! { <p class="text-gray-400">"No attendees yet. Be the first to join!"</p> }.into_view()
    } else {
        view! {
            <ul class="divide-y divide-gray-700">
                {event
                    .attendees
                    .iter()
                    .copied()
                    .enumerate()
                    .map(|(index, attendee)| view! {
                        <li class="py-2 flex items-center space-x-3 text-sm">
                            <span class="text-gray-500 w-6">{index + 1}"."</span>
                            <span class="font-mono text-gray-300">
                                {move || principal_label(&attendee, viewer.get(), DETAIL_PRINCIPAL_CHARS)}
                            </span>
                        </li>
                    })
                    .collect_view()}
            </ul>
        }
        .into_view()
    };

    let actions = move || {
        let panel = panel.get();
        let state = state.clone();
        view! {
            {panel.notice().map(|notice| view! { <p class="text-gray-300">{notice}</p> })}

            {(panel == DetailPanel::SignIn).then(|| view! {
                <Button on_click=move |_| state.login()>"Sign In"</Button>
            })}

            <div class="flex space-x-3">
                {panel.can_attend().then(|| view! {
                    <Button
                        variant=ButtonVariant::Accent
                        size=ButtonSize::Lg
                        loading=loading
                        on_click=move |_| run.call(DetailAction::Attend)
                    >
                        "Attend Event"
                    </Button>
                })}
                {panel.can_complete().then(|| view! {
                    <Button
                        size=ButtonSize::Lg
                        loading=loading
                        on_click=move |_| run.call(DetailAction::Complete)
                    >
                        "Mark as Completed"
                    </Button>
                })}
            </div>
        }
    };

    Ok(view! {
        <Card>
            <div class="flex items-start justify-between mb-6">
                <h1 class="text-3xl font-bold">{event.title.clone()}</h1>
                <span class=format!("px-3 py-1 rounded text-sm font-medium {}", badge)>
                    {status_label(event.completed)}
                </span>
            </div>

            <dl class="grid grid-cols-1 md:grid-cols-2 gap-4 text-sm">
                <InfoRow label="Location" value=event.location.clone() />
                <InfoRow label="Date & Time" value=when />
                <InfoRow label="Attendees" value=attendee_label(event.attendee_count()) />
                <InfoRow
                    label="Organizer"
                    value=Signal::derive(move || {
                        principal_label(&creator, viewer.get(), DETAIL_PRINCIPAL_CHARS)
                    })
                />
            </dl>
        </Card>

        <Card>
            <h2 class="text-xl font-semibold mb-4">
                "Attendees ("{event.attendees.len()}")"
            </h2>
            {attendees}
        </Card>

        <Card>
            <div class="space-y-4">
                {actions}

                {move || actions_state.with(|a| a.error().map(str::to_string)).map(|message| view! {
                    <div class="bg-red-900/30 border border-red-700 rounded-lg p-4 text-red-300 text-sm">
                        {message}
                    </div>
                })}
                {move || success.get().map(|message| view! {
                    <div class="bg-green-900/30 border border-green-700 rounded-lg p-4 text-green-300 text-sm">
                        {message}
                    </div>
                })}
            </div>
        </Card>

        <p class="text-xs text-gray-500 text-center">"Event ID: "{event.id.to_string()}</p>
    }
    .into_view())
}

#[component]
fn InfoRow(label: &'static str, #[prop(into)] value: MaybeSignal<String>) -> impl IntoView {
    view! {
        <div>
            <dt class="text-gray-400">{label}</dt>
            <dd class="text-white mt-1">{move || value.get()}</dd>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candid::Principal;
    use chronox::auth::Identity;

    const HOUR: Timestamp = 60 * 60 * 1000;

    fn principal(name: &str) -> Principal {
        Principal::self_authenticating(name.as_bytes())
    }

    fn open_event(start_time: Timestamp) -> Event {
        Event {
            id: EventId(7),
            title: "Meetup".to_string(),
            location: "Hall".to_string(),
            start_time,
            completed: false,
            creator: principal("alice"),
            attendees: vec![principal("bob")],
        }
    }

    #[test]
    fn test_detail_actions_map_to_remote_actions() {
        assert_eq!(Action::from(DetailAction::Attend), Action::Attend);
        assert_eq!(
            Action::from(DetailAction::Complete).success_message(),
            "Event marked as completed!"
        );
    }

    #[test]
    fn test_panel_follows_sign_in_and_sign_out() {
        let runtime = create_runtime();

        let session = create_rw_signal(Session::new());
        let panel = detail_panel(open_event(now_millis() + HOUR), session);
        assert_eq!(panel.get(), DetailPanel::SignIn);

        session.update(|s| s.settle_login(Ok(Identity::new(principal("carol")))));
        assert_eq!(panel.get(), DetailPanel::Attend);

        session.update(|s| s.settle_logout(Ok(())));
        assert_eq!(panel.get(), DetailPanel::SignIn);

        session.update(|s| s.settle_login(Ok(Identity::new(principal("alice")))));
        assert!(panel.get().can_complete());

        runtime.dispose();
    }

    #[test]
    fn test_unrepresentable_start_time_fails_the_render() {
        let now = now_millis();
        assert!(schedule_label(&open_event(now + 2 * HOUR), now).is_ok());
        assert_eq!(
            schedule_label(&open_event(Timestamp::MAX), now),
            Err(DateError::OutOfRange(Timestamp::MAX))
        );
    }
}
