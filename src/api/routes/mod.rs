//! API Routes
//!
//! Route handlers organized by functionality.

pub mod auth;
pub mod chat;
pub mod feedback;
pub mod health;
pub mod sessions;
