//! Habesha Hospitality Hub
//!
//! Guest feedback and admin dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Bilingual guest feedback form (English / Amharic)
//! - QR-code contextual forms for check-out, rooms, dining and amenities
//! - Staff log for verbal or observed feedback
//! - Admin dashboard with auto-refresh, rating chart and feedback list
//! - HahuBot chat widget
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the Habesha Feedback API over HTTP; form rules,
//! statistics and the dashboard refresh logic come from `habesha-core`.

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
