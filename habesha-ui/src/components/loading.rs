//! Loading Component

use leptos::*;

/// Centered spinner with an optional caption
#[component]
pub fn Loading(
    #[prop(optional, into)]
    message: Option<String>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-16">
            <div class="loading-spinner w-8 h-8" />
            {message.map(|m| view! { <p class="mt-4 text-gray-500">{m}</p> })}
        </div>
    }
}

/// Inline loading spinner
#[component]
pub fn InlineLoading() -> impl IntoView {
    view! {
        <span class="inline-block loading-spinner w-4 h-4" />
    }
}
