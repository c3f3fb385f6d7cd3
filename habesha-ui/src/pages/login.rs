//! Login Page
//!
//! Mock login against the configured accounts; the user lands on the page
//! for their role, or on the page they were sent away from.

use habesha_core::auth::{landing_after_login, LoginRequest};
use leptos::*;
use leptos_router::*;

use crate::api;
use crate::state::global::GlobalState;

#[component]
pub fn Login() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let query = use_query_map();
    let navigate = use_navigate();

    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let request = LoginRequest {
            username: username.get_untracked(),
            password: password.get_untracked(),
        };
        if let Err(message) = request.validate() {
            set_error.set(Some(message.to_string()));
            return;
        }

        set_error.set(None);
        set_submitting.set(true);
        let from = query.with_untracked(|q| q.get("from").cloned());
        let navigate = navigate.clone();

        spawn_local(async move {
            match api::login(&request).await {
                Ok(user) => {
                    let target = landing_after_login(user.role, from.as_deref());
                    state.show_success(&format!("Welcome, {}!", user.name));
                    state.log_in(user);
                    navigate(&target, Default::default());
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-sm mx-auto mt-10 bg-white rounded-xl shadow p-6">
            <h1 class="text-2xl font-semibold text-center mb-6">"Login"</h1>

            {move || error.get().map(|msg| view! {
                <div class="mb-4 p-3 rounded bg-red-50 text-red-700 text-sm">{msg}</div>
            })}

            <form on:submit=on_submit class="space-y-4">
                <div>
                    <label for="username" class="block text-sm font-medium text-gray-700 mb-1">"Username"</label>
                    <input
                        id="username"
                        type="text"
                        class="w-full border rounded-lg px-3 py-2"
                        prop:value=move || username.get()
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label for="password" class="block text-sm font-medium text-gray-700 mb-1">"Password"</label>
                    <input
                        id="password"
                        type="password"
                        class="w-full border rounded-lg px-3 py-2"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </div>
                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full bg-emerald-600 hover:bg-emerald-700 disabled:bg-gray-400 text-white rounded-lg py-3 font-semibold transition-colors"
                >
                    {move || if submitting.get() { "Logging in..." } else { "Login" }}
                </button>
            </form>

            <p class="mt-4 text-xs text-gray-500 text-center">
                "Demo accounts: admin, staff, or user"
            </p>
        </div>
    }
}
