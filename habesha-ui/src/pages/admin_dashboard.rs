//! Admin Dashboard Page
//!
//! Summary widgets, the guest rating chart and the feedback list. Data is
//! fetched on mount, then every [`POLL_INTERVAL_MS`] while auto-refresh is
//! on; the [`DashboardController`] decides which fetches run and which
//! results are applied.

use habesha_core::analytics::{DashboardStats, RatingDistribution};
use habesha_core::dashboard::{
    DashboardController, DashboardView, FetchTicket, RefreshRejected, RefreshTrigger,
    EMPTY_MESSAGE, POLL_INTERVAL_MS,
};
use habesha_core::FeedbackEntry;
use leptos::*;

use crate::api;
use crate::components::{DashboardWidgets, FeedbackList, InlineLoading, Loading, RatingsPieChart};
use crate::state::global::GlobalState;

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let controller = create_rw_signal(DashboardController::<FeedbackEntry>::new(true));

    // Run an accepted fetch and hand the result back to the controller
    let run = move |ticket: FetchTicket| {
        spawn_local(async move {
            let result = api::fetch_feedback().await;
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Error fetching feedback: {}", e).into());
            }

            let outcome = controller.try_update(|c| c.complete(ticket, result)).flatten();
            if let Some(outcome) = outcome {
                if outcome.is_success() {
                    state.show_success(outcome.message());
                } else {
                    state.show_error(outcome.message());
                }
            }
        });
    };

    let refresh = move |trigger: RefreshTrigger| {
        let Some(requested) = controller.try_update(|c| c.request(trigger, now_ms())) else {
            return;
        };
        match requested {
            Ok(ticket) => run(ticket),
            Err(rejected @ RefreshRejected::TooSoon { .. }) => {
                state.show_error(&rejected.to_string());
            }
            // Skipped polls and double clicks are expected
            Err(_) => {}
        }
    };

    if let Some(Ok(ticket)) = controller.try_update(|c| c.mount(now_ms())) {
        run(ticket);
    }

    let interval = gloo_timers::callback::Interval::new(POLL_INTERVAL_MS as u32, move || {
        refresh(RefreshTrigger::Poll);
    });
    on_cleanup(move || drop(interval));

    let entries = Signal::derive(move || {
        controller.with(|c| c.data().map(<[FeedbackEntry]>::to_vec).unwrap_or_default())
    });
    let stats = create_memo(move |_| entries.with(|e| DashboardStats::compute(e)));
    let distribution = create_memo(move |_| entries.with(|e| RatingDistribution::from_entries(e)));
    let view_state = create_memo(move |_| controller.with(|c| c.view()));

    view! {
        <div class="space-y-6 md:space-y-8">
            <div class="flex flex-col sm:flex-row sm:items-center sm:justify-between gap-4 border-b pb-4">
                <h1 class="text-xl sm:text-2xl font-semibold">"Admin Dashboard"</h1>

                <div class="flex items-center gap-2 flex-wrap">
                    <button
                        on:click=move |_| {
                            controller.update(|c| {
                                c.toggle_polling();
                            });
                        }
                        class="px-4 py-2 rounded-lg text-sm border border-gray-300 hover:bg-gray-100"
                    >
                        {move || if controller.with(|c| c.polling()) {
                            "⏸ Stop Auto-Refresh"
                        } else {
                            "▶ Start Auto-Refresh"
                        }}
                    </button>
                    <button
                        on:click=move |_| refresh(RefreshTrigger::Manual)
                        disabled=move || controller.with(|c| c.refresh_disabled())
                        class="px-4 py-2 rounded-lg text-sm bg-emerald-600 hover:bg-emerald-700 disabled:bg-gray-400 text-white flex items-center space-x-2"
                    >
                        {move || controller.with(|c| c.is_manual_loading()).then(|| view! { <InlineLoading /> })}
                        <span>"Refresh Now"</span>
                    </button>
                </div>
            </div>

            {move || controller.with(|c| c.error_banner()).map(|banner| view! {
                <div class="p-4 rounded-lg bg-red-50 text-red-700">
                    <p class="font-semibold">"Dashboard Update Error"</p>
                    <p class="text-sm mt-1">{banner}</p>
                </div>
            })}

            {move || match view_state.get() {
                DashboardView::Loading => view! { <Loading /> }.into_view(),
                DashboardView::Empty => view! {
                    <div class="text-center py-10 px-4">
                        <div class="text-4xl mb-4">"📭"</div>
                        <p class="font-semibold mb-1">{EMPTY_MESSAGE}</p>
                        <p class="text-sm text-gray-500">"New feedback will appear here automatically."</p>
                    </div>
                }.into_view(),
                DashboardView::Content => view! {
                    <DashboardWidgets stats=stats />
                    <div class="grid grid-cols-1 lg:grid-cols-3 gap-6 lg:gap-8 items-start">
                        <section class="lg:col-span-1 bg-white rounded-xl shadow p-6">
                            <h2 class="text-lg md:text-xl font-semibold mb-4">"Guest Rating Distribution"</h2>
                            <RatingsPieChart distribution=distribution />
                        </section>
                        <section class="lg:col-span-2">
                            <h2 class="text-lg md:text-xl font-semibold mb-4">"Recent Feedback"</h2>
                            <FeedbackList entries=entries />
                        </section>
                    </div>
                }.into_view(),
            }}
        </div>
    }
}
