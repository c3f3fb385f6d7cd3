//! Star Rating Input

use leptos::*;

/// Five clickable stars bound to `rating` (0 = not rated)
#[component]
pub fn StarRating(
    rating: RwSignal<u8>,
    #[prop(optional, into)]
    label: Option<String>,
    #[prop(optional)]
    required: bool,
    #[prop(optional, into)]
    error: Option<Signal<Option<String>>>,
) -> impl IntoView {
    let (hover, set_hover) = create_signal(0u8);

    view! {
        <div class="mb-4">
            {label.map(|text| view! {
                <label class="block text-sm font-medium text-gray-700 mb-2">
                    {text}
                    {required.then(|| view! { <span class="text-red-500 ml-1">"*"</span> })}
                </label>
            })}

            <div class="flex space-x-1" on:mouseleave=move |_| set_hover.set(0)>
                {(1..=5u8).map(|star| {
                    let lit = move || {
                        let shown = if hover.get() > 0 { hover.get() } else { rating.get() };
                        shown >= star
                    };
                    view! {
                        <button
                            type="button"
                            aria-label=format!("Rate {} out of 5 stars", star)
                            class=move || if lit() {
                                "text-3xl text-yellow-400 transition-colors"
                            } else {
                                "text-3xl text-gray-300 transition-colors"
                            }
                            on:click=move |_| rating.set(star)
                            on:mouseenter=move |_| set_hover.set(star)
                        >
                            "★"
                        </button>
                    }
                }).collect_view()}
            </div>

            {move || error
                .and_then(|e| e.get())
                .map(|msg| view! { <p class="text-xs text-red-600 mt-1">{msg}</p> })}
        </div>
    }
}
