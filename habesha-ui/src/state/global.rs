//! Global Application State
//!
//! Reactive state management using Leptos signals.

use habesha_core::auth::{restore_user, User, USER_STORAGE_KEY};
use leptos::*;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Logged-in user, mirrored to local storage
    pub user: RwSignal<Option<User>>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Read the stored user, removing the entry when it cannot be parsed
fn load_user() -> Option<User> {
    let storage = local_storage()?;
    let raw = storage.get_item(USER_STORAGE_KEY).ok().flatten()?;

    match restore_user(&raw) {
        Some(user) => Some(user),
        None => {
            web_sys::console::error_1(&"Discarding unreadable stored user".into());
            let _ = storage.remove_item(USER_STORAGE_KEY);
            None
        }
    }
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        user: create_rw_signal(load_user()),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Remember the user for this and later visits
    pub fn log_in(&self, user: User) {
        if let Some(storage) = local_storage() {
            match serde_json::to_string(&user) {
                Ok(json) => {
                    let _ = storage.set_item(USER_STORAGE_KEY, &json);
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to store user: {}", e).into());
                }
            }
        }
        self.user.set(Some(user));
    }

    pub fn log_out(&self) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(USER_STORAGE_KEY);
        }
        self.user.set(None);
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
