//! App Root Component
//!
//! Main application component with routing, role gates and global
//! providers.

use chrono::Datelike;
use habesha_core::auth::{check_access, Access, Route as Page};
use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{ChatWidget, Nav, Toast};
use crate::pages::{
    AdminDashboard, ContextualFeedback, GuestFeedback, Home, Login, NotFound, StaffLogPage,
};
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-50 text-gray-900 flex flex-col">
                <Nav />

                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    <Routes>
                        <Route path="/" view=Home />
                        <Route path="/login" view=Login />
                        <Route path="/f" view=ContextualFeedback />
                        <Route
                            path="/feedback"
                            view=|| view! { <Protected page=Page::GuestFeedback><GuestFeedback /></Protected> }
                        />
                        <Route
                            path="/staff/log"
                            view=|| view! { <Protected page=Page::StaffLog><StaffLogPage /></Protected> }
                        />
                        <Route
                            path="/admin/dashboard"
                            view=|| view! { <Protected page=Page::AdminDashboard><AdminDashboard /></Protected> }
                        />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Footer />
                <ChatWidget />
                <Toast />
            </div>
        </Router>
    }
}

/// Renders `children` only for users allowed on `page`
#[component]
fn Protected(page: Page, children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<GlobalState>();

    move || match state.user.with(|user| check_access(page, user.as_ref())) {
        Access::Granted => children().into_view(),
        Access::RedirectToLogin { from } => {
            view! { <Redirect path=format!("/login?from={}", from) /> }.into_view()
        }
        Access::RedirectHome => view! { <Redirect path=Page::Home.path() /> }.into_view(),
    }
}

/// Footer with the signed-in user and API target
#[component]
fn Footer() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let year = chrono::Utc::now().year();

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-white border-t py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm text-gray-500">
                <span>{format!("© {} Habesha Hospitality Hub", year)}</span>
                <span>
                    {move || state.user.get()
                        .map(|u| format!("Signed in as {}", u.name))
                        .unwrap_or_else(|| "Not signed in".to_string())}
                </span>
                <span class="hidden md:inline">{api::get_api_base()}</span>
            </div>
        </footer>
    }
}
