//! Contextual Feedback Links
//!
//! A QR code opens `/f?loc=<code>&id=<room or table>&tok=<token>&lang=<lang>`.
//! [`ContextLink`] turns those query values into a checked link, and
//! [`TokenValidation`] is the payload of `GET /feedback/validate-token`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feedback::{FeedbackContext, Language, LocationCode};

/// Shown when token validation fails without a server message
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired feedback session token.";

/// Problems with the link itself, detected before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("Invalid feedback link: Location missing.")]
    MissingLocation,

    #[error("Invalid feedback link: Token required for '{0}' location.")]
    MissingToken(String),

    #[error("Unsupported feedback location code: {0}.")]
    UnsupportedLocation(String),
}

fn param(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A resolved QR-code feedback link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLink {
    pub loc: LocationCode,
    pub id: Option<String>,
    pub token: Option<String>,
    pub language: Option<Language>,
}

impl ContextLink {
    /// Resolve the `loc`, `id`, `tok` and `lang` query values. Blank values
    /// count as missing; an unreadable `lang` is ignored.
    pub fn from_query(
        loc: Option<&str>,
        id: Option<&str>,
        tok: Option<&str>,
        lang: Option<&str>,
    ) -> Result<Self, LinkError> {
        let raw_loc = param(loc).ok_or(LinkError::MissingLocation)?;
        let loc: LocationCode = raw_loc
            .parse()
            .map_err(|_| LinkError::UnsupportedLocation(raw_loc.clone()))?;

        let token = param(tok);
        if loc.requires_token() && token.is_none() {
            return Err(LinkError::MissingToken(raw_loc));
        }

        Ok(Self {
            loc,
            id: param(id),
            token,
            language: lang.and_then(|l| l.parse().ok()),
        })
    }

    /// Whether the token must be checked with the server before the form shows
    pub fn needs_validation(&self) -> bool {
        self.loc.requires_token()
    }

    /// Query string for `GET /feedback/validate-token`
    pub fn validation_query(&self) -> String {
        let mut query = format!(
            "tok={}&loc={}",
            urlencoding::encode(self.token.as_deref().unwrap_or_default()),
            self.loc.as_str()
        );
        if let Some(id) = &self.id {
            query.push_str("&id=");
            query.push_str(&urlencoding::encode(id));
        }
        query
    }

    /// Session context handed to the form once the link is accepted
    pub fn into_context(self, info: Option<SessionInfo>) -> FeedbackContext {
        let keep_token = self.loc.requires_token();
        let info = info.unwrap_or_default();
        FeedbackContext {
            loc: self.loc,
            id: self.id.or(info.location_id),
            token: if keep_token { self.token } else { None },
            guest_name: info.guest_name,
        }
    }
}

/// Guest details attached to a valid session token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    /// Room or table the token was issued for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

/// Response of `GET /feedback/validate-token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<SessionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TokenValidation {
    pub fn accepted(info: SessionInfo) -> Self {
        Self {
            valid: true,
            context: Some(info),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            context: None,
            message: Some(message.into()),
        }
    }

    /// Message to show for a rejected token
    pub fn failure_message(&self) -> &str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(INVALID_TOKEN_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_location() {
        assert_eq!(
            ContextLink::from_query(None, None, None, None),
            Err(LinkError::MissingLocation)
        );
        assert_eq!(
            ContextLink::from_query(Some("  "), None, None, None),
            Err(LinkError::MissingLocation)
        );
    }

    #[test]
    fn test_token_required() {
        let err = ContextLink::from_query(Some("room"), Some("305"), None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid feedback link: Token required for 'room' location."
        );
    }

    #[test]
    fn test_unsupported_location() {
        let err = ContextLink::from_query(Some("spa"), None, None, None).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported feedback location code: spa.");
    }

    #[test]
    fn test_public_location_needs_no_token() {
        let link =
            ContextLink::from_query(Some("pool"), None, Some("ignored"), Some("amh")).unwrap();
        assert!(!link.needs_validation());
        assert_eq!(link.language, Some(Language::Amh));

        let ctx = link.into_context(None);
        assert_eq!(ctx.loc, LocationCode::Pool);
        assert_eq!(ctx.token, None);
    }

    #[test]
    fn test_token_link_context() {
        let link =
            ContextLink::from_query(Some("checkout"), Some("12 B"), Some("a+b"), Some("xx")).unwrap();
        assert!(link.needs_validation());
        assert_eq!(link.language, None);
        assert_eq!(link.validation_query(), "tok=a%2Bb&loc=checkout&id=12%20B");

        let ctx = link.into_context(Some(SessionInfo {
            guest_name: Some("Abebe".to_string()),
            location_id: Some("99".to_string()),
        }));
        assert_eq!(ctx.token.as_deref(), Some("a+b"));
        assert_eq!(ctx.id.as_deref(), Some("12 B"));
        assert_eq!(ctx.guest_name.as_deref(), Some("Abebe"));
    }

    #[test]
    fn test_token_fills_missing_location_id() {
        let link = ContextLink::from_query(Some("room"), None, Some("tok"), None).unwrap();
        let ctx = link.into_context(Some(SessionInfo {
            guest_name: None,
            location_id: Some("204".to_string()),
        }));
        assert_eq!(ctx.id.as_deref(), Some("204"));
    }

    #[test]
    fn test_validation_payload() {
        let ok: TokenValidation =
            serde_json::from_str(r#"{"valid":true,"context":{"guestName":"Sara"}}"#).unwrap();
        assert!(ok.valid);
        assert_eq!(ok.context.unwrap().guest_name.as_deref(), Some("Sara"));

        let bad: TokenValidation = serde_json::from_str(r#"{"valid":false}"#).unwrap();
        assert_eq!(bad.failure_message(), INVALID_TOKEN_MESSAGE);
        assert_eq!(
            TokenValidation::rejected("Token expired").failure_message(),
            "Token expired"
        );
    }
}
