//! Staff Log Page
//!
//! Staff record verbal or observed feedback on a guest's behalf.

use habesha_core::validation::validate_staff;
use habesha_core::{FormErrors, Severity, StaffCategory, StaffLog};
use leptos::*;

use crate::api;
use crate::components::InlineLoading;
use crate::state::global::GlobalState;

#[component]
pub fn StaffLogPage() -> impl IntoView {
    let state = expect_context::<GlobalState>();

    let (category, set_category) = create_signal(None::<StaffCategory>);
    let (severity, set_severity) = create_signal(None::<Severity>);
    let (location, set_location) = create_signal(String::new());
    let (details, set_details) = create_signal(String::new());
    let (errors, set_errors) = create_signal(FormErrors::new());
    let (submitting, set_submitting) = create_signal(false);

    let error_for = move |field: &'static str| {
        move || {
            errors
                .with(|e| e.get(field).map(str::to_string))
                .map(|msg| view! { <p class="text-xs text-red-600 mt-1">{msg}</p> })
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let log = StaffLog {
            category: category.get_untracked(),
            severity: severity.get_untracked(),
            location: Some(location.get_untracked()).filter(|l| !l.trim().is_empty()),
            details: details.get_untracked(),
        };
        if let Err(form_errors) = validate_staff(&log) {
            set_errors.set(form_errors);
            state.show_error("Please fill all required fields.");
            return;
        }

        set_errors.set(FormErrors::new());
        set_submitting.set(true);

        spawn_local(async move {
            match api::submit_staff(&log).await {
                Ok(_) => {
                    state.show_success("Staff log submitted!");
                    set_category.set(None);
                    set_severity.set(None);
                    set_location.set(String::new());
                    set_details.set(String::new());
                }
                Err(e) => state.show_error(&e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-xl mx-auto">
            <h1 class="text-2xl font-semibold text-center mb-6">"Staff: Log Observed Feedback"</h1>

            <form on:submit=on_submit novalidate class="bg-white rounded-xl shadow p-6 space-y-4">
                <h2 class="text-lg font-semibold">"Log Verbal/Observed Feedback"</h2>

                <div>
                    <label for="category" class="block text-sm font-medium text-gray-700 mb-1">"Category / ምድብ"</label>
                    <select
                        id="category"
                        class="w-full border rounded-lg px-3 py-2"
                        on:change=move |ev| set_category.set(event_target_value(&ev).parse().ok())
                        prop:value=move || category.get().map(|c| c.as_str()).unwrap_or_default()
                    >
                        <option value="">"Select category..."</option>
                        {StaffCategory::ALL.into_iter().map(|c| view! {
                            <option value=c.as_str()>{c.label()}</option>
                        }).collect_view()}
                    </select>
                    {error_for("category")}
                </div>

                <div>
                    <label for="severity" class="block text-sm font-medium text-gray-700 mb-1">"Severity / የክብደት መጠን"</label>
                    <select
                        id="severity"
                        class="w-full border rounded-lg px-3 py-2"
                        on:change=move |ev| set_severity.set(event_target_value(&ev).parse().ok())
                        prop:value=move || severity.get().map(|s| s.as_str()).unwrap_or_default()
                    >
                        <option value="">"Select severity..."</option>
                        {Severity::ALL.into_iter().map(|s| view! {
                            <option value=s.as_str()>{s.as_str()}</option>
                        }).collect_view()}
                    </select>
                    {error_for("severity")}
                </div>

                <div>
                    <label for="location" class="block text-sm font-medium text-gray-700 mb-1">"Room # / Location (Optional)"</label>
                    <input
                        id="location"
                        type="text"
                        placeholder="e.g., Room 205, Table 3, Lobby"
                        class="w-full border rounded-lg px-3 py-2"
                        prop:value=move || location.get()
                        on:input=move |ev| set_location.set(event_target_value(&ev))
                    />
                </div>

                <div>
                    <label for="details" class="block text-sm font-medium text-gray-700 mb-1">"Details / ዝርዝሮች"</label>
                    <textarea
                        id="details"
                        rows="4"
                        placeholder="Describe the feedback observed or heard..."
                        class="w-full border rounded-lg px-3 py-2"
                        prop:value=move || details.get()
                        on:input=move |ev| set_details.set(event_target_value(&ev))
                    />
                    {error_for("details")}
                </div>

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full bg-emerald-600 hover:bg-emerald-700 disabled:bg-gray-400 text-white rounded-lg py-3 font-semibold transition-colors flex items-center justify-center space-x-2"
                >
                    {move || if submitting.get() {
                        view! { <InlineLoading /> <span>"Submitting..."</span> }.into_view()
                    } else {
                        view! { <span>"Submit Log"</span> }.into_view()
                    }}
                </button>
            </form>
        </div>
    }
}
