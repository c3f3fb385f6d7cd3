//! Navigation Component
//!
//! Header navigation bar; links depend on the logged-in role.

use habesha_core::auth::{check_access, Access, Route as Page};
use leptos::*;
use leptos_router::*;

use crate::state::global::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let navigate = use_navigate();

    let on_logout = move |_| {
        state.log_out();
        state.show_success("Logged out.");
        navigate(Page::Home.path(), Default::default());
    };

    // Only show links the current user may open
    let visible = move |page: Page| {
        state.user.with(|user| check_access(page, user.as_ref()) == Access::Granted)
    };

    view! {
        <nav class="bg-emerald-800 text-white shadow">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"🏨"</span>
                        <span class="text-xl font-bold">"Habesha Hospitality Hub"</span>
                    </A>

                    <div class="flex items-center space-x-1">
                        <Show when=move || visible(Page::GuestFeedback)>
                            <NavLink href="/feedback" label="Feedback" />
                        </Show>
                        <Show when=move || visible(Page::StaffLog)>
                            <NavLink href="/staff/log" label="Staff Log" />
                        </Show>
                        <Show when=move || visible(Page::AdminDashboard)>
                            <NavLink href="/admin/dashboard" label="Dashboard" />
                        </Show>

                        {move || match state.user.get() {
                            Some(user) => view! {
                                <span class="px-3 text-sm text-emerald-100">
                                    {format!("{} ({})", user.name, user.role)}
                                </span>
                                <button
                                    on:click=on_logout.clone()
                                    class="px-4 py-2 rounded-lg hover:bg-emerald-700 transition-colors"
                                >
                                    "Logout"
                                </button>
                            }.into_view(),
                            None => view! { <NavLink href="/login" label="Login" /> }.into_view(),
                        }}
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-4 py-2 rounded-lg text-emerald-100 hover:text-white hover:bg-emerald-700 transition-colors"
            active_class="bg-emerald-700 text-white"
        >
            {label}
        </A>
    }
}
