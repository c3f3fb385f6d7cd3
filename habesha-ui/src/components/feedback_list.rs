//! Feedback List
//!
//! Newest-first list of guest feedback and staff logs, highlighted by
//! severity and rating.

use habesha_core::analytics::{
    display_details, display_location, rating_tone, source_heading, Highlight,
};
use habesha_core::{FeedbackEntry, FeedbackSource, Language};
use leptos::*;

#[component]
pub fn FeedbackList(
    #[prop(into)]
    entries: Signal<Vec<FeedbackEntry>>,
) -> impl IntoView {
    view! {
        <ul class="space-y-3">
            <For
                each=move || entries.get()
                key=|entry| entry.id.clone()
                children=|entry| view! { <FeedbackItem entry=entry /> }
            />
        </ul>
    }
}

#[component]
fn FeedbackItem(entry: FeedbackEntry) -> impl IntoView {
    let highlight = Highlight::classify(&entry);
    let time = entry.timestamp.format("%b %d, %Y %H:%M").to_string();
    let details = display_details(&entry).to_string();
    let location = display_location(&entry).to_string();

    let rating_badge = entry.rating.map(|rating| {
        let tone = match rating_tone(rating) {
            "error" => "bg-red-100 text-red-700",
            "success" => "bg-green-100 text-green-700",
            _ => "bg-gray-100 text-gray-700",
        };
        view! {
            <span class=format!("px-2 py-0.5 rounded text-xs font-semibold {}", tone)>
                {format!("{} ★", rating)}
            </span>
        }
    });

    let staff_tags = (entry.source == FeedbackSource::Staff).then(|| {
        let category = entry.category.map(|c| c.as_str()).unwrap_or("Uncategorized");
        let severity = entry.severity.map(|s| s.as_str()).unwrap_or("Unknown");
        view! {
            <span class="text-xs text-gray-600">
                {format!("{} · Severity: {}", category, severity)}
            </span>
        }
    });

    view! {
        <li class=format!("{} bg-white rounded-lg shadow-sm p-4", highlight.css_class())>
            <div class="flex items-center justify-between">
                <div class="flex items-center space-x-2">
                    <span class="font-semibold text-gray-800">{source_heading(entry.source)}</span>
                    {rating_badge}
                    {entry.feedback_area.clone().map(|area| view! {
                        <span class="text-xs text-emerald-700">{area}</span>
                    })}
                    {(entry.language == Some(Language::Amh)).then(|| view! {
                        <span class="text-xs text-gray-500">"(Amharic)"</span>
                    })}
                </div>
                <span class="text-xs text-gray-500">{time}</span>
            </div>

            <p class="mt-2 text-gray-700 whitespace-pre-wrap">{details}</p>

            <div class="mt-2 flex items-center justify-between">
                <span class="text-xs text-gray-500">{format!("Location: {}", location)}</span>
                {staff_tags}
            </div>
        </li>
    }
}
