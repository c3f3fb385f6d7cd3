//! Feedback Domain Types
//!
//! Records stored by the API and the submissions that create them.
//! Guest feedback, staff logs and contextual (QR-code) feedback all end
//! up as a [`FeedbackEntry`] so the dashboard can treat them uniformly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing one of the feedback enums from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ============================================
// ENUMS
// ============================================

/// Who produced a feedback entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackSource {
    Guest,
    Staff,
}

impl FeedbackSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackSource::Guest => "Guest",
            FeedbackSource::Staff => "Staff",
        }
    }
}

impl fmt::Display for FeedbackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackSource {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "guest" => Ok(FeedbackSource::Guest),
            "staff" => Ok(FeedbackSource::Staff),
            _ => Err(ParseError::new("source", s)),
        }
    }
}

/// Language the guest filled the form in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ENG")]
    Eng,
    #[serde(rename = "AMH")]
    Amh,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Eng => "ENG",
            Language::Amh => "AMH",
        }
    }
}

impl FromStr for Language {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eng" | "en" | "english" => Ok(Language::Eng),
            "amh" | "am" | "amharic" => Ok(Language::Amh),
            _ => Err(ParseError::new("language", s)),
        }
    }
}

/// Category of an observation logged by staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffCategory {
    Room,
    Food,
    Service,
    Maintenance,
    Other,
}

impl StaffCategory {
    pub const ALL: [StaffCategory; 5] = [
        StaffCategory::Room,
        StaffCategory::Food,
        StaffCategory::Service,
        StaffCategory::Maintenance,
        StaffCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StaffCategory::Room => "Room",
            StaffCategory::Food => "Food",
            StaffCategory::Service => "Service",
            StaffCategory::Maintenance => "Maintenance",
            StaffCategory::Other => "Other",
        }
    }

    /// Bilingual label used by the staff log form
    pub fn label(&self) -> &'static str {
        match self {
            StaffCategory::Room => "Room / ክፍል",
            StaffCategory::Food => "Food / ምግብ",
            StaffCategory::Service => "Service / አገልግሎት",
            StaffCategory::Maintenance => "Maintenance / ጥገና",
            StaffCategory::Other => "Other / ሌላ",
        }
    }
}

impl fmt::Display for StaffCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StaffCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::new("category", s))
    }
}

/// How serious a staff observation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::new("severity", s))
    }
}

/// Location encoded in a QR-code feedback link (`loc` query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationCode {
    Checkout,
    Room,
    DiningTable,
    Pool,
    Lobby,
    RestroomLobby,
}

impl LocationCode {
    pub const ALL: [LocationCode; 6] = [
        LocationCode::Checkout,
        LocationCode::Room,
        LocationCode::DiningTable,
        LocationCode::Pool,
        LocationCode::Lobby,
        LocationCode::RestroomLobby,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationCode::Checkout => "checkout",
            LocationCode::Room => "room",
            LocationCode::DiningTable => "dining_table",
            LocationCode::Pool => "pool",
            LocationCode::Lobby => "lobby",
            LocationCode::RestroomLobby => "restroom_lobby",
        }
    }

    /// Locations tied to a guest's stay need a session token
    pub fn requires_token(&self) -> bool {
        matches!(self, LocationCode::Checkout | LocationCode::Room)
    }

    /// Which form a guest sees for this location
    pub fn form_kind(&self) -> FormKind {
        match self {
            LocationCode::Checkout => FormKind::Checkout,
            LocationCode::Room => FormKind::Room,
            LocationCode::DiningTable => FormKind::Dining,
            LocationCode::Pool | LocationCode::Lobby | LocationCode::RestroomLobby => {
                FormKind::Amenity
            }
        }
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationCode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationCode::ALL
            .into_iter()
            .find(|loc| loc.as_str() == s)
            .ok_or_else(|| ParseError::new("location", s))
    }
}

// ============================================
// CONTEXTUAL FORMS
// ============================================

/// One star-rated aspect of a contextual form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

const fn aspect(name: &'static str, label: &'static str, required: bool) -> AspectSpec {
    AspectSpec {
        name,
        label,
        required,
    }
}

const CHECKOUT_ASPECTS: [AspectSpec; 3] = [
    aspect("checkoutSpeed", "Speed of Check-out Process", true),
    aspect("checkoutStaffFriendliness", "Staff Friendliness (Reception)", true),
    aspect("billingAccuracy", "Billing Accuracy", true),
];

const ROOM_ASPECTS: [AspectSpec; 5] = [
    aspect("roomCleanliness", "Room Cleanliness", true),
    aspect("roomComfort", "Comfort (Bed, Temperature)", true),
    aspect("roomNoise", "Noise Level from outside/neighbors", false),
    aspect("bathroomCleanliness", "Bathroom Cleanliness", true),
    aspect("roomAmenities", "In-Room Amenities (Coffee, TV, etc.)", false),
];

const DINING_ASPECTS: [AspectSpec; 4] = [
    aspect("foodQuality", "Food Quality", true),
    aspect("serviceSpeed", "Speed of Service", false),
    aspect("staffAttentiveness", "Staff Attentiveness / Friendliness", true),
    aspect("ambianceRating", "Ambiance / Atmosphere", false),
];

const AMENITY_ASPECTS: [AspectSpec; 4] = [
    aspect("poolCleanliness", "Cleanliness (Water & Area)", true),
    aspect("seatingAvailability", "Availability of Chairs / Cabanas", false),
    aspect("towelAvailability", "Towel Availability & Quality", false),
    aspect("poolAmbiance", "Overall Atmosphere", false),
];

/// The contextual form variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormKind {
    Checkout,
    Room,
    Dining,
    Amenity,
}

impl FormKind {
    /// Star-rated aspects of this form, in display order
    pub fn aspects(&self) -> &'static [AspectSpec] {
        match self {
            FormKind::Checkout => &CHECKOUT_ASPECTS,
            FormKind::Room => &ROOM_ASPECTS,
            FormKind::Dining => &DINING_ASPECTS,
            FormKind::Amenity => &AMENITY_ASPECTS,
        }
    }

    /// Field name the form uses for its free-text comment
    pub fn comment_field(&self) -> &'static str {
        match self {
            FormKind::Checkout => "checkoutComments",
            FormKind::Room => "roomComments",
            FormKind::Dining => "diningComments",
            FormKind::Amenity => "amenityComments",
        }
    }

    /// Only the room form accepts photo attachments
    pub fn accepts_attachments(&self) -> bool {
        matches!(self, FormKind::Room)
    }

    /// Area recorded on the stored entry
    pub fn feedback_area(&self, loc: LocationCode) -> String {
        match self {
            FormKind::Checkout => "Checkout Experience".to_string(),
            FormKind::Room => "Room Experience".to_string(),
            FormKind::Dining => "Dining".to_string(),
            FormKind::Amenity => loc.as_str().to_string(),
        }
    }
}

// ============================================
// SUBMISSIONS
// ============================================

/// General guest feedback form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestSubmission {
    /// Star rating, 0 when the guest did not pick one
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default)]
    pub language: Language,
}

/// Verbal or observed feedback logged by staff on a guest's behalf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffLog {
    #[serde(default)]
    pub category: Option<StaffCategory>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub details: String,
}

/// Session a contextual form was opened under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackContext {
    pub loc: LocationCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
}

/// Location-specific form submitted after scanning a QR code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextualSubmission {
    pub context: FeedbackContext,
    /// Aspect name → stars (0 = not rated)
    #[serde(default)]
    pub ratings: BTreeMap<String, u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

impl ContextualSubmission {
    pub fn form_kind(&self) -> FormKind {
        self.context.loc.form_kind()
    }

    /// Mean of the aspects the guest actually rated
    pub fn overall_rating(&self) -> Option<f64> {
        let rated: Vec<f64> = self
            .ratings
            .values()
            .filter(|&&v| v > 0)
            .map(|&v| f64::from(v))
            .collect();

        if rated.is_empty() {
            None
        } else {
            Some(rated.iter().sum::<f64>() / rated.len() as f64)
        }
    }
}

// ============================================
// STORED ENTRY
// ============================================

/// A stored feedback record as returned by `GET /feedback`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: String,
    pub source: FeedbackSource,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<StaffCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub is_negative: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<FeedbackContext>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aspect_ratings: BTreeMap<String, u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

/// Ratings at or below this are flagged as negative
pub const NEGATIVE_RATING_THRESHOLD: u8 = 2;

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl FeedbackEntry {
    fn empty(id: String, source: FeedbackSource, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            source,
            timestamp,
            rating: None,
            overall_rating: None,
            comment: None,
            details: None,
            room_number: None,
            location: None,
            language: None,
            category: None,
            severity: None,
            is_negative: false,
            feedback_area: None,
            context: None,
            aspect_ratings: BTreeMap::new(),
            attachments: Vec::new(),
        }
    }

    /// Build a record from a validated guest form
    pub fn guest(id: impl Into<String>, timestamp: DateTime<Utc>, sub: &GuestSubmission) -> Self {
        let mut entry = Self::empty(id.into(), FeedbackSource::Guest, timestamp);
        entry.rating = Some(sub.rating);
        entry.overall_rating = Some(f64::from(sub.rating));
        entry.comment = non_blank(Some(&sub.comment));
        entry.room_number = non_blank(sub.room_number.as_deref());
        entry.language = Some(sub.language);
        entry.is_negative = sub.rating <= NEGATIVE_RATING_THRESHOLD;
        entry
    }

    /// Build a record from a validated staff log
    pub fn staff(id: impl Into<String>, timestamp: DateTime<Utc>, log: &StaffLog) -> Self {
        let mut entry = Self::empty(id.into(), FeedbackSource::Staff, timestamp);
        entry.category = log.category;
        entry.severity = log.severity;
        entry.location = non_blank(log.location.as_deref());
        entry.details = non_blank(Some(&log.details));
        entry.is_negative = log.severity == Some(Severity::High);
        entry
    }

    /// Build a record from a validated contextual form.
    ///
    /// The session token is not persisted with the entry.
    pub fn contextual(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        sub: &ContextualSubmission,
    ) -> Self {
        let kind = sub.form_kind();
        let loc = sub.context.loc;
        let mut entry = Self::empty(id.into(), FeedbackSource::Guest, timestamp);

        let overall = sub.overall_rating();
        entry.overall_rating = overall;
        entry.rating = overall.map(|v| v.round().clamp(1.0, 5.0) as u8);
        entry.is_negative = overall
            .map(|v| v <= f64::from(NEGATIVE_RATING_THRESHOLD))
            .unwrap_or(false);
        entry.comment = non_blank(sub.comments.as_deref());
        entry.feedback_area = Some(kind.feedback_area(loc));
        entry.aspect_ratings = sub
            .ratings
            .iter()
            .filter(|&(_, &v)| v > 0)
            .map(|(k, &v)| (k.clone(), v))
            .collect();
        entry.attachments = sub.attachments.clone();

        let id_in_loc = non_blank(sub.context.id.as_deref());
        if kind == FormKind::Room {
            entry.room_number = id_in_loc;
        } else {
            entry.location = Some(id_in_loc.unwrap_or_else(|| loc.as_str().to_string()));
        }

        entry.context = Some(FeedbackContext {
            token: None,
            ..sub.context.clone()
        });
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn test_location_codes() {
        assert_eq!("dining_table".parse::<LocationCode>().unwrap(), LocationCode::DiningTable);
        assert!("spa".parse::<LocationCode>().is_err());
        assert!(LocationCode::Checkout.requires_token());
        assert!(LocationCode::Room.requires_token());
        assert!(!LocationCode::Pool.requires_token());
        assert_eq!(LocationCode::Lobby.form_kind(), FormKind::Amenity);
        assert_eq!(LocationCode::RestroomLobby.form_kind(), FormKind::Amenity);
    }

    #[test]
    fn test_enum_serde_names() {
        assert_eq!(serde_json::to_string(&Language::Amh).unwrap(), "\"AMH\"");
        assert_eq!(serde_json::to_string(&FeedbackSource::Staff).unwrap(), "\"Staff\"");
        assert_eq!(
            serde_json::to_string(&LocationCode::RestroomLobby).unwrap(),
            "\"restroom_lobby\""
        );
        assert_eq!("maintenance".parse::<StaffCategory>().unwrap(), StaffCategory::Maintenance);
    }

    #[test]
    fn test_guest_entry() {
        let sub = GuestSubmission {
            rating: 2,
            comment: "  Slow wifi  ".to_string(),
            room_number: Some("   ".to_string()),
            language: Language::Eng,
        };
        let entry = FeedbackEntry::guest("a", ts(), &sub);

        assert_eq!(entry.rating, Some(2));
        assert_eq!(entry.overall_rating, Some(2.0));
        assert_eq!(entry.comment.as_deref(), Some("Slow wifi"));
        assert_eq!(entry.room_number, None);
        assert!(entry.is_negative);
    }

    #[test]
    fn test_staff_entry_negative_on_high_severity() {
        let log = StaffLog {
            category: Some(StaffCategory::Maintenance),
            severity: Some(Severity::High),
            location: Some("Room 205".to_string()),
            details: "AC leaking".to_string(),
        };
        let entry = FeedbackEntry::staff("b", ts(), &log);

        assert_eq!(entry.source, FeedbackSource::Staff);
        assert!(entry.is_negative);
        assert_eq!(entry.rating, None);
        assert_eq!(entry.location.as_deref(), Some("Room 205"));
    }

    #[test]
    fn test_contextual_entry() {
        let mut ratings = BTreeMap::new();
        ratings.insert("roomCleanliness".to_string(), 5);
        ratings.insert("roomComfort".to_string(), 4);
        ratings.insert("bathroomCleanliness".to_string(), 4);
        ratings.insert("roomNoise".to_string(), 0);

        let sub = ContextualSubmission {
            context: FeedbackContext {
                loc: LocationCode::Room,
                id: Some("305".to_string()),
                token: Some("secret".to_string()),
                guest_name: None,
            },
            ratings,
            comments: None,
            attachments: vec!["sink.jpg".to_string()],
        };
        let entry = FeedbackEntry::contextual("c", ts(), &sub);

        let overall = entry.overall_rating.unwrap();
        assert!((overall - 13.0 / 3.0).abs() < 1e-9);
        assert_eq!(entry.rating, Some(4));
        assert!(!entry.is_negative);
        assert_eq!(entry.room_number.as_deref(), Some("305"));
        assert_eq!(entry.feedback_area.as_deref(), Some("Room Experience"));
        assert!(!entry.aspect_ratings.contains_key("roomNoise"));
        assert_eq!(entry.context.unwrap().token, None);
    }

    #[test]
    fn test_amenity_area_uses_location_code() {
        let mut ratings = BTreeMap::new();
        ratings.insert("poolCleanliness".to_string(), 1);

        let sub = ContextualSubmission {
            context: FeedbackContext {
                loc: LocationCode::Lobby,
                id: None,
                token: None,
                guest_name: None,
            },
            ratings,
            comments: Some("Dirty floor".to_string()),
            attachments: Vec::new(),
        };
        let entry = FeedbackEntry::contextual("d", ts(), &sub);

        assert_eq!(entry.feedback_area.as_deref(), Some("lobby"));
        assert_eq!(entry.location.as_deref(), Some("lobby"));
        assert!(entry.is_negative);
    }

    #[test]
    fn test_entry_json_is_camel_case() {
        let sub = GuestSubmission {
            rating: 5,
            comment: "Great".to_string(),
            room_number: Some("12".to_string()),
            language: Language::Amh,
        };
        let json = serde_json::to_value(FeedbackEntry::guest("e", ts(), &sub)).unwrap();

        assert_eq!(json["roomNumber"], "12");
        assert_eq!(json["overallRating"], 5.0);
        assert_eq!(json["isNegative"], false);
        assert_eq!(json["language"], "AMH");
        assert!(json.get("severity").is_none());
    }
}
