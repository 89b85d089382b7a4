//! Button Component

use leptos::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Accent,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonSize {
    Sm,
    #[default]
    Md,
    Lg,
}

/// Tailwind classes for a variant/size pair
pub fn button_class(variant: ButtonVariant, size: ButtonSize) -> String {
    let colors = match variant {
        ButtonVariant::Primary => "bg-primary-600 hover:bg-primary-700 text-white",
        ButtonVariant::Secondary => "bg-gray-700 hover:bg-gray-600 text-gray-100",
        ButtonVariant::Accent => "bg-emerald-600 hover:bg-emerald-700 text-white",
    };
    let padding = match size {
        ButtonSize::Sm => "px-3 py-1.5 text-sm",
        ButtonSize::Md => "px-4 py-2",
        ButtonSize::Lg => "px-6 py-3 text-lg",
    };
    format!(
        "inline-flex items-center justify-center space-x-2 rounded-lg font-medium \
         transition-colors disabled:bg-gray-600 disabled:cursor-not-allowed {} {}",
        colors, padding
    )
}

/// Button with a loading spinner; disabled while loading
#[component]
pub fn Button(
    #[prop(optional)]
    variant: ButtonVariant,
    #[prop(optional)]
    size: ButtonSize,
    #[prop(optional, into)]
    loading: MaybeSignal<bool>,
    #[prop(optional, into)]
    disabled: MaybeSignal<bool>,
    #[prop(default = "button")]
    button_type: &'static str,
    #[prop(optional, into)]
    on_click: Option<Callback<web_sys::MouseEvent>>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            type=button_type
            class=button_class(variant, size)
            disabled=move || loading.get() || disabled.get()
            on:click=move |ev| {
                if let Some(on_click) = on_click {
                    on_click.call(ev);
                }
            }
        >
            {move || loading.get().then(|| view! { <span class="loading-spinner w-4 h-4" /> })}
            <span>{children()}</span>
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_class() {
        let class = button_class(ButtonVariant::Accent, ButtonSize::Lg);
        assert!(class.contains("bg-emerald-600"));
        assert!(class.contains("px-6"));
        assert_ne!(
            button_class(ButtonVariant::Primary, ButtonSize::Md),
            button_class(ButtonVariant::Secondary, ButtonSize::Md)
        );
    }
}
