//! Pages
//!
//! Top-level page components for each route.

pub mod admin_dashboard;
pub mod contextual;
pub mod guest_feedback;
pub mod home;
pub mod login;
pub mod not_found;
pub mod staff_log;

pub use admin_dashboard::AdminDashboard;
pub use contextual::ContextualFeedback;
pub use guest_feedback::GuestFeedback;
pub use home::Home;
pub use login::Login;
pub use not_found::NotFound;
pub use staff_log::StaffLogPage;
