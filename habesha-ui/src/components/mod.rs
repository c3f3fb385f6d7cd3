//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod chat_widget;
pub mod feedback_list;
pub mod loading;
pub mod nav;
pub mod pie_chart;
pub mod star_rating;
pub mod toast;
pub mod widgets;

pub use chat_widget::ChatWidget;
pub use feedback_list::FeedbackList;
pub use loading::{InlineLoading, Loading};
pub use nav::Nav;
pub use pie_chart::RatingsPieChart;
pub use star_rating::StarRating;
pub use toast::Toast;
pub use widgets::DashboardWidgets;
