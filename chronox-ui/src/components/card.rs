//! Card Component

use leptos::*;

#[component]
pub fn Card(
    #[prop(optional, into)]
    class: String,
    /// Hover styling for clickable cards
    #[prop(optional)]
    interactive: bool,
    children: Children,
) -> impl IntoView {
    let hover = if interactive {
        "hover:border-primary-500 hover:bg-gray-750 cursor-pointer transition-colors"
    } else {
        ""
    };

    view! {
        <div class=format!("bg-gray-800 border border-gray-700 rounded-lg p-6 {} {}", hover, class)>
            {children()}
        </div>
    }
}
