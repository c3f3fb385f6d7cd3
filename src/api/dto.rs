//! Data Transfer Objects
//!
//! Request and response types for the API endpoints that are not shared
//! with the UI through `habesha-core`.

use chrono::{DateTime, Utc};
use habesha_core::analytics::RATING_LABELS;
use habesha_core::{DashboardStats, RatingDistribution};
use serde::{Deserialize, Serialize};

// ============================================
// FEEDBACK DTOs
// ============================================

/// Query parameters of `GET /feedback`
#[derive(Debug, Default, Deserialize)]
pub struct ListFeedbackQuery {
    /// "Guest" or "Staff" (case-insensitive)
    #[serde(default)]
    pub source: Option<String>,
    /// Maximum number of entries, capped by `api.list_limit`
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One slice of the guest rating pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSlice {
    pub stars: u8,
    pub label: String,
    pub count: u32,
    /// Share in percent, `None` when nobody rated
    pub percentage: Option<f64>,
}

/// Response of `GET /feedback/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub rating_distribution: Vec<RatingSlice>,
}

impl StatsResponse {
    pub fn new(stats: DashboardStats, distribution: &RatingDistribution) -> Self {
        let rating_distribution = RATING_LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| RatingSlice {
                stars: i as u8 + 1,
                label: label.to_string(),
                count: distribution.counts[i],
                percentage: distribution.percentage(i),
            })
            .collect();

        Self {
            stats,
            rating_distribution,
        }
    }
}

// ============================================
// SESSION TOKEN DTOs
// ============================================

/// Query parameters of `GET /feedback/validate-token`
#[derive(Debug, Default, Deserialize)]
pub struct ValidateTokenQuery {
    #[serde(default)]
    pub tok: Option<String>,
    #[serde(default)]
    pub loc: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Body of `POST /feedback/session-tokens`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenRequest {
    pub loc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_hours: Option<u32>,
}

/// Response of `POST /feedback/session-tokens`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenResponse {
    pub token: String,
    pub loc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    pub expires_at: DateTime<Utc>,
    /// Relative link to encode in the QR code
    pub link: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy or unhealthy
    pub status: String,
    /// Storage status
    pub storage: String,
    /// Active chat backend
    pub chat_backend: String,
    /// Number of stored feedback entries
    pub entries: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_shape() {
        let dist = RatingDistribution {
            counts: [0, 0, 1, 0, 3],
        };
        let stats = DashboardStats {
            total_entries: 4,
            negative_entries: 0,
            average_guest_rating: Some(4.5),
            top_staff_category: None,
        };
        let json = serde_json::to_value(StatsResponse::new(stats, &dist)).unwrap();

        assert_eq!(json["totalEntries"], 4);
        assert_eq!(json["averageGuestRating"], 4.5);
        assert_eq!(json["ratingDistribution"][4]["label"], "5 Stars ★★★★★");
        assert_eq!(json["ratingDistribution"][4]["percentage"], 75.0);
        assert_eq!(json["ratingDistribution"][2]["stars"], 3);
    }
}
