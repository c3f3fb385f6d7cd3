//! Contextual Session Tokens
//!
//! Staff mint a token when they print a checkout or room QR code; the
//! guest's link carries it as `tok`. A token is bound to one location
//! code, optionally to a room or table id, and expires after its TTL.

use chrono::{DateTime, Duration, Utc};
use habesha_core::{
    session::INVALID_TOKEN_MESSAGE, LocationCode, SessionInfo, TokenValidation,
};
use std::sync::Arc;
use thiserror::Error;

use crate::config::SessionsConfig;
use crate::storage::{FeedbackStore, SessionToken, StorageError};

pub const EXPIRED_TOKEN_MESSAGE: &str = "This feedback link has expired.";
pub const WRONG_LOCATION_MESSAGE: &str = "This feedback link does not match the location.";

/// Errors from issuing tokens
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("TTL must be between 1 and {max} hours")]
    InvalidTtl { max: u32 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Request to mint a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub loc: LocationCode,
    pub id: Option<String>,
    pub guest_name: Option<String>,
    pub ttl_hours: Option<u32>,
}

/// Issues and checks contextual session tokens
pub struct SessionManager {
    store: Arc<FeedbackStore>,
    default_ttl_hours: u32,
    max_ttl_hours: u32,
}

impl SessionManager {
    pub fn new(store: Arc<FeedbackStore>, config: &SessionsConfig) -> Self {
        Self {
            store,
            default_ttl_hours: config.token_ttl_hours,
            max_ttl_hours: config.max_ttl_hours.max(config.token_ttl_hours),
        }
    }

    /// Mint and persist a new token
    pub fn issue(&self, req: IssueRequest, now: DateTime<Utc>) -> Result<SessionToken, SessionError> {
        let ttl = req.ttl_hours.unwrap_or(self.default_ttl_hours);
        if ttl == 0 || ttl > self.max_ttl_hours {
            return Err(SessionError::InvalidTtl {
                max: self.max_ttl_hours,
            });
        }

        let token = SessionToken {
            token: uuid::Uuid::new_v4().simple().to_string(),
            loc: req.loc,
            location_id: non_blank(req.id),
            guest_name: non_blank(req.guest_name),
            created_at: now,
            expires_at: now + Duration::hours(i64::from(ttl)),
        };
        self.store.insert_token(&token)?;

        tracing::info!(
            loc = %token.loc,
            location_id = ?token.location_id,
            expires_at = %token.expires_at,
            "Issued feedback session token"
        );
        Ok(token)
    }

    /// Check a token against the link it arrived with
    pub fn validate(
        &self,
        token: &str,
        loc: LocationCode,
        id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TokenValidation, StorageError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(TokenValidation::rejected(INVALID_TOKEN_MESSAGE));
        }

        let Some(stored) = self.store.get_token(token)? else {
            tracing::debug!(loc = %loc, "Unknown feedback session token");
            return Ok(TokenValidation::rejected(INVALID_TOKEN_MESSAGE));
        };

        if stored.expires_at <= now {
            return Ok(TokenValidation::rejected(EXPIRED_TOKEN_MESSAGE));
        }
        if stored.loc != loc {
            return Ok(TokenValidation::rejected(WRONG_LOCATION_MESSAGE));
        }
        if let Some(bound) = &stored.location_id {
            let id = id.map(str::trim).filter(|v| !v.is_empty());
            if id.is_some_and(|id| id != bound) {
                return Ok(TokenValidation::rejected(WRONG_LOCATION_MESSAGE));
            }
        }

        Ok(TokenValidation::accepted(SessionInfo {
            guest_name: stored.guest_name,
            location_id: stored.location_id,
        }))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        let store = Arc::new(FeedbackStore::in_memory().unwrap());
        SessionManager::new(store, &SessionsConfig::default())
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn room_request() -> IssueRequest {
        IssueRequest {
            loc: LocationCode::Room,
            id: Some("305".to_string()),
            guest_name: Some("Abebe Kebede".to_string()),
            ttl_hours: None,
        }
    }

    #[test]
    fn test_issue_uses_default_ttl() {
        let sessions = manager();
        let token = sessions.issue(room_request(), now()).unwrap();

        assert_eq!(token.expires_at - token.created_at, Duration::hours(72));
        assert_eq!(token.token.len(), 32);
    }

    #[test]
    fn test_issue_rejects_bad_ttl() {
        let sessions = manager();
        let mut req = room_request();
        req.ttl_hours = Some(0);
        assert!(matches!(
            sessions.issue(req.clone(), now()),
            Err(SessionError::InvalidTtl { max: 720 })
        ));

        req.ttl_hours = Some(721);
        assert!(sessions.issue(req, now()).is_err());
    }

    #[test]
    fn test_validate_valid_token() {
        let sessions = manager();
        let token = sessions.issue(room_request(), now()).unwrap();

        let result = sessions
            .validate(&token.token, LocationCode::Room, Some("305"), now())
            .unwrap();
        assert!(result.valid);
        assert_eq!(
            result.context.unwrap().guest_name.as_deref(),
            Some("Abebe Kebede")
        );

        // No id on the link is accepted and the bound room comes back
        let result = sessions
            .validate(&token.token, LocationCode::Room, None, now())
            .unwrap();
        assert!(result.valid);
        assert_eq!(result.context.unwrap().location_id.as_deref(), Some("305"));
    }

    #[test]
    fn test_validate_rejections() {
        let sessions = manager();
        let token = sessions.issue(room_request(), now()).unwrap();

        let unknown = sessions
            .validate("nope", LocationCode::Room, None, now())
            .unwrap();
        assert_eq!(unknown.failure_message(), INVALID_TOKEN_MESSAGE);

        let wrong_loc = sessions
            .validate(&token.token, LocationCode::Checkout, None, now())
            .unwrap();
        assert_eq!(wrong_loc.failure_message(), WRONG_LOCATION_MESSAGE);

        let wrong_room = sessions
            .validate(&token.token, LocationCode::Room, Some("101"), now())
            .unwrap();
        assert!(!wrong_room.valid);

        let expired = sessions
            .validate(
                &token.token,
                LocationCode::Room,
                Some("305"),
                now() + Duration::hours(72),
            )
            .unwrap();
        assert_eq!(expired.failure_message(), EXPIRED_TOKEN_MESSAGE);
    }
}
