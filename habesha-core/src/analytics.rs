//! Dashboard Analytics
//!
//! Aggregation over an already-fetched list of feedback entries: the
//! summary widgets, the guest rating distribution behind the pie chart,
//! and the per-entry highlight used by the feedback list.

use serde::{Deserialize, Serialize};

use crate::feedback::{
    FeedbackEntry, FeedbackSource, Severity, StaffCategory, NEGATIVE_RATING_THRESHOLD,
};

/// Text shown when a statistic has no data behind it
pub const NOT_AVAILABLE: &str = "N/A";

/// Text shown instead of the pie chart when no guest rated anything
pub const NO_RATINGS_MESSAGE: &str = "No guest ratings available to display.";

// ============================================
// SUMMARY WIDGETS
// ============================================

/// Figures shown in the four dashboard widgets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_entries: usize,
    pub negative_entries: usize,
    /// Mean guest `overallRating`, only counting values in 1..=5
    pub average_guest_rating: Option<f64>,
    /// Most frequent staff category; ties go to the one seen first
    pub top_staff_category: Option<StaffCategory>,
}

impl DashboardStats {
    pub fn compute(entries: &[FeedbackEntry]) -> Self {
        let negative_entries = entries.iter().filter(|e| e.is_negative).count();

        let guest_ratings: Vec<f64> = entries
            .iter()
            .filter(|e| e.source == FeedbackSource::Guest)
            .filter_map(|e| e.overall_rating)
            .filter(|r| (1.0..=5.0).contains(r))
            .collect();

        let average_guest_rating = if guest_ratings.is_empty() {
            None
        } else {
            Some(guest_ratings.iter().sum::<f64>() / guest_ratings.len() as f64)
        };

        // Counts kept in first-seen order so ties resolve to the earliest category
        let mut counts: Vec<(StaffCategory, usize)> = Vec::new();
        for category in entries
            .iter()
            .filter(|e| e.source == FeedbackSource::Staff)
            .filter_map(|e| e.category)
        {
            match counts.iter_mut().find(|(c, _)| *c == category) {
                Some((_, n)) => *n += 1,
                None => counts.push((category, 1)),
            }
        }

        let mut top_staff_category = None;
        let mut best = 0;
        for (category, n) in counts {
            if n > best {
                best = n;
                top_staff_category = Some(category);
            }
        }

        Self {
            total_entries: entries.len(),
            negative_entries,
            average_guest_rating,
            top_staff_category,
        }
    }

    /// Average rating to one decimal, or "N/A"
    pub fn average_display(&self) -> String {
        self.average_guest_rating
            .map(|avg| format!("{:.1}", avg))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn top_category_display(&self) -> &'static str {
        self.top_staff_category
            .map(|c| c.as_str())
            .unwrap_or(NOT_AVAILABLE)
    }
}

// ============================================
// RATING DISTRIBUTION
// ============================================

/// Slice labels, one per star count
pub const RATING_LABELS: [&str; 5] = [
    "1 Star ★",
    "2 Stars ★★",
    "3 Stars ★★★",
    "4 Stars ★★★★",
    "5 Stars ★★★★★",
];

/// Slice fill colours, red (1 star) through green (5 stars)
pub const SLICE_COLORS: [&str; 5] = [
    "rgba(239, 68, 68, 0.7)",
    "rgba(245, 158, 11, 0.7)",
    "rgba(234, 179, 8, 0.7)",
    "rgba(132, 204, 22, 0.7)",
    "rgba(34, 197, 94, 0.7)",
];

/// Slice border colours matching [`SLICE_COLORS`]
pub const SLICE_BORDERS: [&str; 5] = [
    "rgba(239, 68, 68, 1)",
    "rgba(245, 158, 11, 1)",
    "rgba(234, 179, 8, 1)",
    "rgba(132, 204, 22, 1)",
    "rgba(34, 197, 94, 1)",
];

/// Number of guest ratings at each star level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDistribution {
    /// `counts[0]` is 1 star, `counts[4]` is 5 stars
    pub counts: [u32; 5],
}

impl RatingDistribution {
    pub fn from_entries(entries: &[FeedbackEntry]) -> Self {
        let mut counts = [0u32; 5];
        for entry in entries.iter().filter(|e| e.source == FeedbackSource::Guest) {
            if let Some(rating @ 1..=5) = entry.rating {
                counts[usize::from(rating - 1)] += 1;
            }
        }
        Self { counts }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Share of slice `index` in percent
    pub fn percentage(&self, index: usize) -> Option<f64> {
        let total = self.total();
        let count = *self.counts.get(index)?;
        if total == 0 {
            None
        } else {
            Some(f64::from(count) / f64::from(total) * 100.0)
        }
    }

    /// Tooltip text for slice `index`, e.g. `# of Votes: 3 (42.9%)`
    pub fn slice_label(&self, index: usize) -> String {
        let count = self.counts.get(index).copied().unwrap_or(0);
        let pct = match self.percentage(index) {
            Some(p) => format!("{:.1}%", p),
            None => "0%".to_string(),
        };
        format!("# of Votes: {} ({})", count, pct)
    }
}

// ============================================
// FEEDBACK LIST
// ============================================

/// Visual emphasis of one entry in the feedback list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Highlight {
    Alert,
    Warning,
    Positive,
    Neutral,
}

impl Highlight {
    pub fn classify(entry: &FeedbackEntry) -> Self {
        let rating = entry.rating.unwrap_or(0);
        let low = entry.rating.is_some() && rating <= NEGATIVE_RATING_THRESHOLD;

        if entry.is_negative || low || entry.severity == Some(Severity::High) {
            Highlight::Alert
        } else if entry.severity == Some(Severity::Medium) {
            Highlight::Warning
        } else if rating >= 4 {
            Highlight::Positive
        } else {
            Highlight::Neutral
        }
    }

    /// CSS classes for the list item container
    pub fn css_class(&self) -> &'static str {
        match self {
            Highlight::Alert => "feedback-item alert",
            Highlight::Warning => "feedback-item warning",
            Highlight::Positive => "feedback-item positive",
            Highlight::Neutral => "feedback-item",
        }
    }
}

/// Colour tone for a star rating badge
pub fn rating_tone(rating: u8) -> &'static str {
    if rating <= NEGATIVE_RATING_THRESHOLD {
        "error"
    } else if rating >= 4 {
        "success"
    } else {
        "neutral"
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// Comment, else staff details, else a placeholder
pub fn display_details(entry: &FeedbackEntry) -> &str {
    present(entry.comment.as_ref())
        .or_else(|| present(entry.details.as_ref()))
        .unwrap_or("No details provided.")
}

/// Location, else room number, else "N/A"
pub fn display_location(entry: &FeedbackEntry) -> &str {
    present(entry.location.as_ref())
        .or_else(|| present(entry.room_number.as_ref()))
        .unwrap_or(NOT_AVAILABLE)
}

/// "Guest Feedback" or "Staff Log"
pub fn source_heading(source: FeedbackSource) -> &'static str {
    match source {
        FeedbackSource::Guest => "Guest Feedback",
        FeedbackSource::Staff => "Staff Log",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{GuestSubmission, Language, StaffLog};
    use chrono::{DateTime, Utc};

    fn ts() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn guest(rating: u8) -> FeedbackEntry {
        let sub = GuestSubmission {
            rating,
            comment: "ok".to_string(),
            room_number: None,
            language: Language::Eng,
        };
        FeedbackEntry::guest(format!("g{}", rating), ts(), &sub)
    }

    fn staff(category: StaffCategory, severity: Severity) -> FeedbackEntry {
        let log = StaffLog {
            category: Some(category),
            severity: Some(severity),
            location: None,
            details: "noted".to_string(),
        };
        FeedbackEntry::staff("s", ts(), &log)
    }

    #[test]
    fn test_stats_empty() {
        let stats = DashboardStats::compute(&[]);
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.average_display(), "N/A");
        assert_eq!(stats.top_category_display(), "N/A");
    }

    #[test]
    fn test_stats_average_and_negatives() {
        let entries = vec![
            guest(5),
            guest(4),
            guest(2),
            staff(StaffCategory::Food, Severity::High),
        ];
        let stats = DashboardStats::compute(&entries);

        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.negative_entries, 2);
        assert_eq!(stats.average_display(), "3.7");
    }

    #[test]
    fn test_stats_ignores_out_of_range_ratings() {
        let mut odd = guest(3);
        odd.overall_rating = Some(0.0);
        let stats = DashboardStats::compute(&[odd, guest(4)]);
        assert_eq!(stats.average_guest_rating, Some(4.0));
    }

    #[test]
    fn test_top_category_tie_goes_to_first_seen() {
        let entries = vec![
            staff(StaffCategory::Service, Severity::Low),
            staff(StaffCategory::Room, Severity::Low),
            staff(StaffCategory::Room, Severity::Low),
            staff(StaffCategory::Service, Severity::Low),
        ];
        let stats = DashboardStats::compute(&entries);
        assert_eq!(stats.top_staff_category, Some(StaffCategory::Service));

        let mut entries = entries;
        entries.push(staff(StaffCategory::Room, Severity::Low));
        let stats = DashboardStats::compute(&entries);
        assert_eq!(stats.top_category_display(), "Room");
    }

    #[test]
    fn test_distribution_counts_guest_ratings_only() {
        let entries = vec![
            guest(5),
            guest(5),
            guest(1),
            staff(StaffCategory::Other, Severity::Low),
        ];
        let dist = RatingDistribution::from_entries(&entries);

        assert_eq!(dist.counts, [1, 0, 0, 0, 2]);
        assert_eq!(dist.total(), 3);
        assert_eq!(dist.slice_label(4), "# of Votes: 2 (66.7%)");
        assert_eq!(dist.slice_label(1), "# of Votes: 0 (0.0%)");
    }

    #[test]
    fn test_distribution_empty() {
        let dist = RatingDistribution::from_entries(&[]);
        assert!(dist.is_empty());
        assert_eq!(dist.slice_label(0), "# of Votes: 0 (0%)");
    }

    #[test]
    fn test_highlight() {
        assert_eq!(Highlight::classify(&guest(1)), Highlight::Alert);
        assert_eq!(Highlight::classify(&guest(3)), Highlight::Neutral);
        assert_eq!(Highlight::classify(&guest(5)), Highlight::Positive);
        assert_eq!(
            Highlight::classify(&staff(StaffCategory::Room, Severity::Medium)),
            Highlight::Warning
        );
        assert_eq!(
            Highlight::classify(&staff(StaffCategory::Room, Severity::High)),
            Highlight::Alert
        );
        assert_eq!(
            Highlight::classify(&staff(StaffCategory::Room, Severity::Low)),
            Highlight::Neutral
        );
    }

    #[test]
    fn test_display_fallbacks() {
        let mut entry = staff(StaffCategory::Room, Severity::Low);
        assert_eq!(display_details(&entry), "noted");
        assert_eq!(display_location(&entry), "N/A");

        entry.details = Some(String::new());
        entry.room_number = Some("101".to_string());
        assert_eq!(display_details(&entry), "No details provided.");
        assert_eq!(display_location(&entry), "101");
    }
}
