//! Input Component
//!
//! Labelled text input with an error line and optional helper text.

use leptos::*;

#[component]
pub fn Input(
    label: &'static str,
    name: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")]
    input_type: &'static str,
    #[prop(optional)]
    placeholder: &'static str,
    #[prop(optional)]
    helper_text: Option<&'static str>,
    /// Lower bound, for date/time inputs
    #[prop(optional_no_strip)]
    min: Option<String>,
    #[prop(optional, into)]
    error: MaybeSignal<Option<String>>,
    #[prop(optional, into)]
    disabled: MaybeSignal<bool>,
    /// Called after every edit
    #[prop(optional, into)]
    on_input: Option<Callback<()>>,
) -> impl IntoView {
    let has_error = move || error.with(Option::is_some);

    view! {
        <div class="space-y-1">
            <label for=name class="block text-sm font-medium text-gray-300">
                {label}
                <span class="text-red-400">" *"</span>
            </label>
            <input
                id=name
                name=name
                type=input_type
                placeholder=placeholder
                min=min
                required=true
                disabled=move || disabled.get()
                prop:value=move || value.get()
                on:input=move |ev| {
                    value.set(event_target_value(&ev));
                    if let Some(on_input) = on_input {
                        on_input.call(());
                    }
                }
                class=move || {
                    let border = if has_error() { "border-red-500" } else { "border-gray-600" };
                    format!(
                        "w-full bg-gray-700 border {} rounded-lg px-4 py-2 text-white \
                         focus:outline-none focus:border-primary-500 disabled:opacity-50",
                        border
                    )
                }
            />
            {move || match error.get() {
                Some(message) => view! { <p class="text-sm text-red-400">{message}</p> }.into_view(),
                None => helper_text
                    .map(|text| view! { <p class="text-sm text-gray-400">{text}</p> }.into_view())
                    .unwrap_or_default(),
            }}
        </div>
    }
}
