//! Habesha Feedback Storage
//!
//! SQLite persistence behind the API:
//!
//! - **store**: Feedback entries and contextual session tokens
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use habesha_feedback::storage::{FeedbackStore, ListFilter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FeedbackStore::open(std::path::Path::new("./feedback.db"))?;
//!     let latest = store.list(ListFilter { source: None, limit: Some(20) })?;
//!     println!("{} entries", latest.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use store::{FeedbackStore, ListFilter, SessionToken, StoreCounts};
