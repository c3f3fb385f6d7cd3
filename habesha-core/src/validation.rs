//! Form Validation
//!
//! Field-level rules for the guest, staff and contextual forms. The UI
//! runs them before submitting so errors render inline, and the API runs
//! them again before anything is stored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::feedback::{ContextualSubmission, GuestSubmission, StaffLog};

/// Maximum length of guest comments and staff details
pub const MAX_COMMENT_CHARS: usize = 1000;

/// Maximum length of contextual form comments
pub const MAX_CONTEXTUAL_COMMENT_CHARS: usize = 500;

/// Maximum number of photo attachments on the room form
pub const MAX_ATTACHMENTS: usize = 3;

/// Per-field validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message for a field wins
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when no field failed
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Validate the general guest feedback form
pub fn validate_guest(sub: &GuestSubmission) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();

    if !(1..=5).contains(&sub.rating) {
        errors.add("rating", "Rating is required.");
    }

    let len = char_len(&sub.comment);
    if len == 0 {
        errors.add("comment", "Comment cannot be empty.");
    } else if len > MAX_COMMENT_CHARS {
        errors.add("comment", "Comment cannot exceed 1000 characters.");
    }

    errors.into_result()
}

/// Validate the staff observation log
pub fn validate_staff(log: &StaffLog) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();

    if log.category.is_none() {
        errors.add("category", "Category is required.");
    }
    if log.severity.is_none() {
        errors.add("severity", "Severity is required.");
    }

    let len = char_len(&log.details);
    if len == 0 {
        errors.add("details", "Details cannot be empty.");
    } else if len > MAX_COMMENT_CHARS {
        errors.add("details", "Details cannot exceed 1000 characters.");
    }

    errors.into_result()
}

/// Validate a contextual form against the aspects of its location
pub fn validate_contextual(sub: &ContextualSubmission) -> Result<(), FormErrors> {
    let kind = sub.form_kind();
    let aspects = kind.aspects();
    let mut errors = FormErrors::new();

    for name in sub.ratings.keys() {
        if !aspects.iter().any(|a| a.name == name) {
            errors.add(name.clone(), "Unknown rating field");
        }
    }

    for spec in aspects {
        let value = sub.ratings.get(spec.name).copied().unwrap_or(0);
        if value > 5 {
            errors.add(spec.name, "Rating must be between 1 and 5");
        } else if spec.required && value == 0 {
            errors.add(spec.name, "Rating required");
        }
    }

    if let Some(comments) = &sub.comments {
        if comments.chars().count() > MAX_CONTEXTUAL_COMMENT_CHARS {
            errors.add(kind.comment_field(), "Comment cannot exceed 500 characters");
        }
    }

    if !sub.attachments.is_empty() && !kind.accepts_attachments() {
        errors.add("attachments", "This form does not accept attachments");
    } else if sub.attachments.len() > MAX_ATTACHMENTS {
        errors.add("attachments", "At most 3 files can be attached");
    }

    errors.into_result()
}

/// Merge newly picked attachment names into the current selection.
///
/// Only the first [`MAX_ATTACHMENTS`] of a new batch are taken, names
/// already selected are replaced by the new pick, and the merged list is
/// capped at [`MAX_ATTACHMENTS`].
pub fn merge_attachments(current: &[String], picked: &[String]) -> Vec<String> {
    let picked: Vec<&String> = picked.iter().take(MAX_ATTACHMENTS).collect();

    current
        .iter()
        .filter(|name| !picked.contains(name))
        .chain(picked.iter().copied())
        .take(MAX_ATTACHMENTS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{FeedbackContext, Language, LocationCode, Severity, StaffCategory};

    fn guest(rating: u8, comment: &str) -> GuestSubmission {
        GuestSubmission {
            rating,
            comment: comment.to_string(),
            room_number: None,
            language: Language::Eng,
        }
    }

    fn contextual(loc: LocationCode, ratings: &[(&str, u8)]) -> ContextualSubmission {
        ContextualSubmission {
            context: FeedbackContext {
                loc,
                id: None,
                token: None,
                guest_name: None,
            },
            ratings: ratings
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            comments: None,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_guest_valid() {
        assert!(validate_guest(&guest(4, "Lovely stay")).is_ok());
    }

    #[test]
    fn test_guest_missing_rating_and_comment() {
        let errors = validate_guest(&guest(0, "   ")).unwrap_err();
        assert_eq!(errors.get("rating"), Some("Rating is required."));
        assert_eq!(errors.get("comment"), Some("Comment cannot be empty."));
    }

    #[test]
    fn test_guest_comment_too_long() {
        let long = "a".repeat(MAX_COMMENT_CHARS + 1);
        let errors = validate_guest(&guest(5, &long)).unwrap_err();
        assert_eq!(
            errors.get("comment"),
            Some("Comment cannot exceed 1000 characters.")
        );

        // Surrounding whitespace does not count
        let padded = format!("  {}  ", "a".repeat(MAX_COMMENT_CHARS));
        assert!(validate_guest(&guest(5, &padded)).is_ok());
    }

    #[test]
    fn test_staff_requires_category_severity_details() {
        let log = StaffLog {
            category: None,
            severity: None,
            location: None,
            details: String::new(),
        };
        let errors = validate_staff(&log).unwrap_err();
        assert_eq!(errors.len(), 3);

        let log = StaffLog {
            category: Some(StaffCategory::Food),
            severity: Some(Severity::Low),
            location: None,
            details: "Guest loved the injera".to_string(),
        };
        assert!(validate_staff(&log).is_ok());
    }

    #[test]
    fn test_contextual_required_aspects() {
        let sub = contextual(
            LocationCode::Checkout,
            &[("checkoutSpeed", 4), ("billingAccuracy", 0)],
        );
        let errors = validate_contextual(&sub).unwrap_err();
        assert_eq!(errors.get("checkoutStaffFriendliness"), Some("Rating required"));
        assert_eq!(errors.get("billingAccuracy"), Some("Rating required"));
        assert_eq!(errors.get("checkoutSpeed"), None);
    }

    #[test]
    fn test_contextual_optional_aspects_may_be_skipped() {
        let sub = contextual(
            LocationCode::DiningTable,
            &[("foodQuality", 5), ("staffAttentiveness", 3)],
        );
        assert!(validate_contextual(&sub).is_ok());
    }

    #[test]
    fn test_contextual_rejects_foreign_aspect_and_long_comment() {
        let mut sub = contextual(
            LocationCode::Pool,
            &[("poolCleanliness", 3), ("foodQuality", 2)],
        );
        sub.comments = Some("x".repeat(MAX_CONTEXTUAL_COMMENT_CHARS + 1));

        let errors = validate_contextual(&sub).unwrap_err();
        assert_eq!(errors.get("foodQuality"), Some("Unknown rating field"));
        assert_eq!(
            errors.get("amenityComments"),
            Some("Comment cannot exceed 500 characters")
        );
    }

    #[test]
    fn test_attachments_only_on_room_form() {
        let mut sub = contextual(LocationCode::Pool, &[("poolCleanliness", 3)]);
        sub.attachments = vec!["a.jpg".to_string()];
        assert!(validate_contextual(&sub).is_err());

        let mut sub = contextual(
            LocationCode::Room,
            &[("roomCleanliness", 3), ("roomComfort", 3), ("bathroomCleanliness", 3)],
        );
        sub.attachments = vec!["a.jpg".to_string()];
        assert!(validate_contextual(&sub).is_ok());
    }

    #[test]
    fn test_merge_attachments() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let merged = merge_attachments(&names(&["a", "b"]), &names(&["b", "c"]));
        assert_eq!(merged, names(&["a", "b", "c"]));

        let merged = merge_attachments(&names(&["a", "b", "c"]), &names(&["d"]));
        assert_eq!(merged, names(&["a", "b", "c"]));

        let merged = merge_attachments(&[], &names(&["1", "2", "3", "4"]));
        assert_eq!(merged, names(&["1", "2", "3"]));
    }

    #[test]
    fn test_form_errors_serialize_as_map() {
        let mut errors = FormErrors::new();
        errors.add("rating", "Rating is required.");
        errors.add("rating", "ignored");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["rating"], "Rating is required.");
    }
}
