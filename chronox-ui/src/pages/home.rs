//! Home Page
//!
//! Landing page with the hero, feature list and a call to action.

use leptos::*;
use leptos_router::*;

use crate::components::{Button, ButtonSize, ButtonVariant, Card};
use crate::state::use_app_state;

#[component]
pub fn Home() -> impl IntoView {
    view! {
        <div class="space-y-16">
            <Hero />
            <Features />
            <CallToAction />
        </div>
    }
}

#[component]
fn Hero() -> impl IntoView {
    view! {
        <section class="text-center py-12 space-y-6">
            <h1 class="text-5xl font-bold">
                "Decentralized Event Management with "
                <span class="text-primary-400">"ChronoX"</span>
            </h1>
            <p class="text-xl text-gray-400 max-w-2xl mx-auto">
                "Create, discover and attend events with records kept on-chain. \
                 No central organizer, no lost guest lists."
            </p>
            <div class="flex justify-center space-x-4">
                <GetStarted />
                <A href="/events">
                    <Button variant=ButtonVariant::Secondary size=ButtonSize::Lg>
                        "Browse Events"
                    </Button>
                </A>
            </div>
        </section>
    }
}

/// Signed in: go create an event. Otherwise start sign-in.
#[component]
fn GetStarted() -> impl IntoView {
    let state = use_app_state();
    let navigate = use_navigate();
    let pending = {
        let state = state.clone();
        Signal::derive(move || state.is_pending())
    };

    let on_click = move |_| {
        if state.is_authenticated() {
            navigate("/create", Default::default());
        } else {
            state.login();
        }
    };

    view! {
        <Button variant=ButtonVariant::Accent size=ButtonSize::Lg loading=pending on_click=on_click>
            "Get Started"
        </Button>
    }
}

#[component]
fn Features() -> impl IntoView {
    let features = [
        (
            "🔐",
            "Secure Sign-In",
            "Authenticate with a cryptographic identity. No passwords to leak.",
        ),
        (
            "⛓️",
            "On-Chain Records",
            "Events and attendance live on the ledger, visible to everyone.",
        ),
        (
            "🎟️",
            "One-Click Attendance",
            "Register for an event and the organizer sees you right away.",
        ),
    ];

    view! {
        <section class="space-y-8">
            <h2 class="text-3xl font-bold text-center">"Why Choose ChronoX?"</h2>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                {features
                    .into_iter()
                    .map(|(icon, title, text)| view! {
                        <Card>
                            <div class="text-4xl mb-4">{icon}</div>
                            <h3 class="text-xl font-semibold mb-2">{title}</h3>
                            <p class="text-gray-400">{text}</p>
                        </Card>
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
fn CallToAction() -> impl IntoView {
    view! {
        <section class="bg-gray-800 rounded-xl p-10 text-center space-y-4">
            <h2 class="text-3xl font-bold">"Ready to host your next event?"</h2>
            <p class="text-gray-400">"Sign in and publish it in under a minute."</p>
            <GetStarted />
        </section>
    }
}
