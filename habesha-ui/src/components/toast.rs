//! Toast Notifications
//!
//! Success and error messages from [`GlobalState`]; each can be dismissed
//! before it times out.

use leptos::*;

use crate::state::global::GlobalState;

#[component]
pub fn Toast() -> impl IntoView {
    let state = expect_context::<GlobalState>();

    view! {
        <div class="fixed top-20 right-4 z-50 space-y-2" role="status" aria-live="polite">
            {move || state.success.get().map(|text| view! {
                <ToastItem text=text tone=Tone::Success slot=state.success />
            })}
            {move || state.error.get().map(|text| view! {
                <ToastItem text=text tone=Tone::Error slot=state.error />
            })}
        </div>
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Tone {
    Success,
    Error,
}

#[component]
fn ToastItem(text: String, tone: Tone, slot: RwSignal<Option<String>>) -> impl IntoView {
    let (mark, colors) = if tone == Tone::Success {
        ("✓", "bg-emerald-600")
    } else {
        ("!", "bg-red-600")
    };

    view! {
        <div class=format!("flex items-start gap-3 {} text-white pl-4 pr-2 py-3 rounded-lg shadow-lg max-w-sm", colors)>
            <span class="font-bold">{mark}</span>
            <p class="flex-1 text-sm">{text}</p>
            <button
                class="px-1 text-white/80 hover:text-white"
                aria-label="Dismiss"
                on:click=move |_| slot.set(None)
            >
                "×"
            </button>
        </div>
    }
}
