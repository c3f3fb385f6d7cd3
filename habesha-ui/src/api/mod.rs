//! API Client
//!
//! HTTP calls to the Habesha Feedback API.

pub mod client;

pub use client::*;
