//! Dashboard Summary Widgets

use habesha_core::analytics::DashboardStats;
use leptos::*;

/// The four stat cards above the chart
#[component]
pub fn DashboardWidgets(
    #[prop(into)]
    stats: Signal<DashboardStats>,
) -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
            <StatCard
                icon="📋"
                label="Total Entries"
                value=Signal::derive(move || stats.with(|s| s.total_entries.to_string()))
            />
            <StatCard
                icon="⚠️"
                label="Negative Alerts"
                value=Signal::derive(move || stats.with(|s| s.negative_entries.to_string()))
                alert=Signal::derive(move || stats.with(|s| s.negative_entries > 0))
            />
            <StatCard
                icon="⭐"
                label="Avg. Guest Rating"
                value=Signal::derive(move || stats.with(|s| s.average_display()))
            />
            <StatCard
                icon="🏷️"
                label="Top Staff Category"
                value=Signal::derive(move || stats.with(|s| s.top_category_display().to_string()))
            />
        </div>
    }
}

#[component]
fn StatCard(
    icon: &'static str,
    label: &'static str,
    value: Signal<String>,
    #[prop(optional, into)]
    alert: MaybeSignal<bool>,
) -> impl IntoView {
    view! {
        <div class="bg-white rounded-xl shadow p-4 flex items-center space-x-4">
            <span class="text-3xl">{icon}</span>
            <div>
                <p class="text-sm text-gray-500">{label}</p>
                <p class=move || if alert.get() {
                    "text-2xl font-bold text-red-600"
                } else {
                    "text-2xl font-bold text-gray-800"
                }>
                    {move || value.get()}
                </p>
            </div>
        </div>
    }
}
