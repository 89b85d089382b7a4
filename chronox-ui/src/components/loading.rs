//! Loading Component

use leptos::*;

/// Spinner with a caption
#[component]
pub fn Loading(
    #[prop(default = "Loading...")]
    text: &'static str,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 space-y-4">
            <div class="loading-spinner w-8 h-8" />
            <p class="text-gray-400">{text}</p>
        </div>
    }
}
