//! ChronoX Web
//!
//! Decentralized event management front-end built with Leptos (WASM).
//!
//! # Features
//!
//! - Browse events and their attendance
//! - Sign in with a delegated identity
//! - Create, attend and complete events
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Session handling, fetch state, validation and view decisions
//! come from the `chronox` crate; this crate renders them and talks to the
//! gateway over gloo-net.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
