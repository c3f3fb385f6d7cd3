//! # Habesha Core
//!
//! Logic shared by the Habesha Feedback API server, its CLI and the
//! WASM dashboard. Nothing in here performs I/O: every function works on
//! values handed to it, and time is passed in as epoch milliseconds so
//! the same code runs natively and in the browser.
//!
//! ## Modules
//!
//! - [`feedback`]: Feedback records, submissions and location codes
//! - [`validation`]: Form rules for guest, staff and contextual forms
//! - [`analytics`]: Dashboard statistics and rating distribution
//! - [`dashboard`]: Loading / polling / manual-refresh state machine
//! - [`session`]: QR-code feedback links and token validation payloads
//! - [`auth`]: Mock roles, route gating and login payloads
//! - [`chat`]: FAQ responder and chat transcript model
//! - [`wire`]: Error bodies returned by the API

pub mod analytics;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod feedback;
pub mod session;
pub mod validation;
pub mod wire;

pub use analytics::{DashboardStats, Highlight, RatingDistribution};
pub use auth::{check_access, Access, LoginRequest, Role, Route, User};
pub use chat::{ChatMessage, ChatReply, ChatRequest, ChatTranscript, Intent, Sender};
pub use dashboard::{
    DashboardController, DashboardView, FetchTicket, RefreshOutcome, RefreshRejected,
    RefreshTrigger,
};
pub use feedback::{
    AspectSpec, ContextualSubmission, FeedbackContext, FeedbackEntry, FeedbackSource, FormKind,
    GuestSubmission, Language, LocationCode, ParseError, Severity, StaffCategory, StaffLog,
};
pub use session::{ContextLink, LinkError, SessionInfo, TokenValidation};
pub use validation::FormErrors;
