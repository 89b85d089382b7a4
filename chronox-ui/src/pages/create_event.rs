//! Create Event Page
//!
//! Validated form for a new event. Requires a signed-in session.

use leptos::*;
use leptos_router::*;

use chronox::dates::{min_start_input, now_millis};
use chronox::form::{EventDraft, Field, FormErrors};
use chronox::remote::{actions, Action, EventActions};

use crate::components::{Button, ButtonSize, ButtonVariant, Card, Input};
use crate::state::use_app_state;

#[component]
pub fn CreateEvent() -> impl IntoView {
    let state = use_app_state();

    move || {
        if state.is_authenticated() {
            view! { <CreateEventForm /> }.into_view()
        } else {
            let state = state.clone();
            view! {
                <div class="max-w-md mx-auto text-center py-16 space-y-4">
                    <div class="text-5xl">"🔒"</div>
                    <h1 class="text-2xl font-bold">"Authentication Required"</h1>
                    <p class="text-gray-400">"Please sign in to create an event."</p>
                    <Button on_click=move |_| state.login()>"Sign In"</Button>
                </div>
            }
            .into_view()
        }
    }
}

#[component]
fn CreateEventForm() -> impl IntoView {
    let state = use_app_state();
    let navigate = use_navigate();

    let title = create_rw_signal(String::new());
    let location = create_rw_signal(String::new());
    let start_time = create_rw_signal(String::new());
    let errors = create_rw_signal(FormErrors::default());
    let actions_state = create_rw_signal(EventActions::new());

    let min_start = match min_start_input(now_millis()) {
        Ok(value) => Some(value),
        Err(e) => {
            web_sys::console::warn_1(&format!("No minimum start time: {}", e).into());
            None
        }
    };

    let loading = Signal::derive(move || actions_state.with(EventActions::is_loading));
    let field_error = move |field: Field| {
        Signal::derive(move || errors.with(|e| e.get(field).map(str::to_string)))
    };
    // Editing a field drops its message and any stale submit error
    let edited = move |field: Field| {
        Callback::new(move |_: ()| {
            errors.update(|e| e.clear(field));
            actions_state.update(EventActions::clear_error);
        })
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let draft = EventDraft::new(title.get(), location.get(), start_time.get());
        let payload = match draft.validate(now_millis()) {
            Ok(payload) => payload,
            Err(invalid) => {
                errors.set(invalid);
                return;
            }
        };
        errors.set(FormErrors::default());

        let mut started = Ok(());
        actions_state.update(|a| started = a.begin());
        if started.is_err() {
            return;
        }

        let state = state.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let identity = state.identity();
            let result = actions::create_event(&state.connector, identity.as_ref(), &payload).await;

            let mut settled = None;
            actions_state.update(|a| settled = Some(a.settle(Action::Create, result)));
            if let Some(Ok(id)) = settled {
                state.show_notice(Action::Create.success_message());
                navigate(&format!("/events/{}", id), Default::default());
            }
        });
    };

    view! {
        <div class="max-w-2xl mx-auto space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Create Event"</h1>
                <p class="text-gray-400 mt-1">"Publish a new event to the ledger"</p>
            </div>

            <Card>
                <form class="space-y-6" on:submit=on_submit>
                    <Input
                        label="Event Title"
                        name=Field::Title.name()
                        value=title
                        placeholder="Rust Meetup"
                        error=field_error(Field::Title)
                        disabled=loading
                        on_input=edited(Field::Title)
                    />
                    <Input
                        label="Location"
                        name=Field::Location.name()
                        value=location
                        placeholder="Community Hall, or a video link"
                        error=field_error(Field::Location)
                        disabled=loading
                        on_input=edited(Field::Location)
                    />
                    <Input
                        label="Start Time"
                        name=Field::StartTime.name()
                        value=start_time
                        input_type="datetime-local"
                        min=min_start
                        helper_text="Events must start in the future"
                        error=field_error(Field::StartTime)
                        disabled=loading
                        on_input=edited(Field::StartTime)
                    />

                    {move || actions_state.with(|a| a.error().map(str::to_string)).map(|message| view! {
                        <div class="bg-red-900/30 border border-red-700 rounded-lg p-4 text-red-300 text-sm">
                            {message}
                        </div>
                    })}

                    <div class="flex justify-end space-x-3">
                        <A href="/events">
                            <Button variant=ButtonVariant::Secondary>"Cancel"</Button>
                        </A>
                        <Button
                            variant=ButtonVariant::Accent
                            size=ButtonSize::Lg
                            button_type="submit"
                            loading=loading
                        >
                            {move || if loading.get() { "Creating..." } else { "Create Event" }}
                        </Button>
                    </div>
                </form>
            </Card>
        </div>
    }
}
