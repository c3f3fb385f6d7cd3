//! Feedback Store - SQLite persistence for feedback entries and session tokens
//!
//! Each entry is kept as its JSON document next to the columns used for
//! filtering and ordering (source, timestamp, negativity). Session tokens
//! live in their own table keyed by the token string.

use chrono::{DateTime, Utc};
use habesha_core::{FeedbackEntry, FeedbackSource, LocationCode};
use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::error::{StorageError, StorageResult};

/// Filter for [`FeedbackStore::list`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub source: Option<FeedbackSource>,
    pub limit: Option<usize>,
}

/// A contextual feedback session token as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    pub loc: LocationCode,
    /// Room or table the token is bound to, if any
    pub location_id: Option<String>,
    pub guest_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Entry counts for the health endpoint and CLI status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub total: usize,
    pub guest: usize,
    pub staff: usize,
    pub negative: usize,
    pub active_tokens: usize,
}

/// SQLite-backed feedback store
pub struct FeedbackStore {
    conn: Mutex<Connection>,
}

impl FeedbackStore {
    /// Create or open the store at `path`
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        Self::init(conn)
    }

    /// Create a throwaway in-memory store
    pub fn in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS feedback (
                id TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                timestamp_ms INTEGER NOT NULL,
                is_negative INTEGER NOT NULL,
                body TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_feedback_time ON feedback(timestamp_ms);
            CREATE INDEX IF NOT EXISTS idx_feedback_source ON feedback(source, timestamp_ms);

            CREATE TABLE IF NOT EXISTS session_tokens (
                token TEXT PRIMARY KEY,
                loc TEXT NOT NULL,
                location_id TEXT,
                guest_name TEXT,
                created_ms INTEGER NOT NULL,
                expires_ms INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_tokens_expiry ON session_tokens(expires_ms);
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    /// Store a new entry
    pub fn insert(&self, entry: &FeedbackEntry) -> StorageResult<()> {
        let body = serde_json::to_string(entry)?;
        let conn = self.conn()?;

        let result = conn.execute(
            "INSERT INTO feedback (id, source, timestamp_ms, is_negative, body)
             VALUES (?, ?, ?, ?, ?)",
            params![
                entry.id,
                entry.source.as_str(),
                entry.timestamp.timestamp_millis(),
                entry.is_negative,
                body
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StorageError::Conflict(format!("feedback {}", entry.id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Entries newest first
    pub fn list(&self, filter: ListFilter) -> StorageResult<Vec<FeedbackEntry>> {
        let conn = self.conn()?;
        let limit = filter
            .limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(-1);

        let mut stmt = conn.prepare_cached(
            "SELECT body FROM feedback
             WHERE (?1 IS NULL OR source = ?1)
             ORDER BY timestamp_ms DESC, rowid DESC
             LIMIT ?2",
        )?;

        let source = filter.source.map(|s| s.as_str());
        let rows = stmt.query_map(params![source, limit], |row| row.get::<_, String>(0))?;

        let mut entries = Vec::new();
        for body in rows {
            let body = body?;
            let entry = serde_json::from_str(&body)
                .map_err(|e| StorageError::Corruption(format!("feedback row: {}", e)))?;
            entries.push(entry);
        }
        Ok(entries)
    }

    pub fn get(&self, id: &str) -> StorageResult<Option<FeedbackEntry>> {
        let conn = self.conn()?;
        let body: Option<String> = conn
            .query_row("SELECT body FROM feedback WHERE id = ?", params![id], |row| {
                row.get(0)
            })
            .optional()?;

        body.map(|b| {
            serde_json::from_str(&b)
                .map_err(|e| StorageError::Corruption(format!("feedback {}: {}", id, e)))
        })
        .transpose()
    }

    /// Counts of stored entries and unexpired tokens
    pub fn counts(&self, now: DateTime<Utc>) -> StorageResult<StoreCounts> {
        let conn = self.conn()?;

        let (total, guest, staff, negative): (i64, i64, i64, i64) = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(source = 'Guest'), 0),
                    COALESCE(SUM(source = 'Staff'), 0),
                    COALESCE(SUM(is_negative), 0)
             FROM feedback",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

        let active_tokens: i64 = conn.query_row(
            "SELECT COUNT(*) FROM session_tokens WHERE expires_ms > ?",
            params![now.timestamp_millis()],
            |row| row.get(0),
        )?;

        let to_usize = |n: i64| usize::try_from(n).unwrap_or(0);
        Ok(StoreCounts {
            total: to_usize(total),
            guest: to_usize(guest),
            staff: to_usize(staff),
            negative: to_usize(negative),
            active_tokens: to_usize(active_tokens),
        })
    }

    /// Cheap query used by the readiness probe
    pub fn ping(&self) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    // ============================================
    // SESSION TOKENS
    // ============================================

    pub fn insert_token(&self, token: &SessionToken) -> StorageResult<()> {
        let conn = self.conn()?;
        let result = conn.execute(
            "INSERT INTO session_tokens (token, loc, location_id, guest_name, created_ms, expires_ms)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                token.token,
                token.loc.as_str(),
                token.location_id,
                token.guest_name,
                token.created_at.timestamp_millis(),
                token.expires_at.timestamp_millis()
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StorageError::Conflict("session token".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_token(&self, token: &str) -> StorageResult<Option<SessionToken>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT token, loc, location_id, guest_name, created_ms, expires_ms
                 FROM session_tokens WHERE token = ?",
                params![token],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, i64>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((token, loc, location_id, guest_name, created_ms, expires_ms)) = row else {
            return Ok(None);
        };

        let loc = loc
            .parse()
            .map_err(|e| StorageError::Corruption(format!("session token: {}", e)))?;
        let time = |ms: i64| {
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| StorageError::Corruption(format!("bad timestamp {}", ms)))
        };

        Ok(Some(SessionToken {
            token,
            loc,
            location_id,
            guest_name,
            created_at: time(created_ms)?,
            expires_at: time(expires_ms)?,
        }))
    }

    /// Delete expired tokens, returning how many were removed
    pub fn purge_expired_tokens(&self, now: DateTime<Utc>) -> StorageResult<usize> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM session_tokens WHERE expires_ms <= ?",
            params![now.timestamp_millis()],
        )?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use habesha_core::{GuestSubmission, Language, Severity, StaffCategory, StaffLog};
    use tempfile::tempdir;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000 + ms).unwrap()
    }

    fn guest(id: &str, ms: i64, rating: u8) -> FeedbackEntry {
        let sub = GuestSubmission {
            rating,
            comment: "comment".to_string(),
            room_number: None,
            language: Language::Eng,
        };
        FeedbackEntry::guest(id, at(ms), &sub)
    }

    fn staff(id: &str, ms: i64) -> FeedbackEntry {
        let log = StaffLog {
            category: Some(StaffCategory::Service),
            severity: Some(Severity::Medium),
            location: Some("Lobby".to_string()),
            details: "Guest asked for towels".to_string(),
        };
        FeedbackEntry::staff(id, at(ms), &log)
    }

    #[test]
    fn test_insert_and_list_newest_first() {
        let store = FeedbackStore::in_memory().unwrap();
        store.insert(&guest("a", 0, 5)).unwrap();
        store.insert(&staff("b", 2_000)).unwrap();
        store.insert(&guest("c", 1_000, 1)).unwrap();

        let all = store.list(ListFilter::default()).unwrap();
        let ids: Vec<_> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(all[0].category, Some(StaffCategory::Service));
    }

    #[test]
    fn test_list_filter_and_limit() {
        let store = FeedbackStore::in_memory().unwrap();
        for i in 0..5 {
            store.insert(&guest(&format!("g{}", i), i * 10, 4)).unwrap();
        }
        store.insert(&staff("s", 100)).unwrap();

        let guests = store
            .list(ListFilter {
                source: Some(FeedbackSource::Guest),
                limit: Some(2),
            })
            .unwrap();
        assert_eq!(guests.len(), 2);
        assert_eq!(guests[0].id, "g4");

        let staff_only = store
            .list(ListFilter {
                source: Some(FeedbackSource::Staff),
                limit: None,
            })
            .unwrap();
        assert_eq!(staff_only.len(), 1);
    }

    #[test]
    fn test_duplicate_id_conflicts() {
        let store = FeedbackStore::in_memory().unwrap();
        store.insert(&guest("dup", 0, 3)).unwrap();
        let err = store.insert(&guest("dup", 5, 3)).unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[test]
    fn test_counts() {
        let store = FeedbackStore::in_memory().unwrap();
        let empty = store.counts(at(0)).unwrap();
        assert_eq!(empty, StoreCounts::default());

        store.insert(&guest("a", 0, 1)).unwrap();
        store.insert(&guest("b", 1, 5)).unwrap();
        store.insert(&staff("c", 2)).unwrap();

        let counts = store.counts(at(0)).unwrap();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.guest, 2);
        assert_eq!(counts.staff, 1);
        assert_eq!(counts.negative, 1);
    }

    #[test]
    fn test_tokens_round_trip_and_purge() {
        let store = FeedbackStore::in_memory().unwrap();
        let token = SessionToken {
            token: "tok-1".to_string(),
            loc: LocationCode::Room,
            location_id: Some("305".to_string()),
            guest_name: Some("Abebe".to_string()),
            created_at: at(0),
            expires_at: at(0) + Duration::hours(72),
        };
        store.insert_token(&token).unwrap();

        assert_eq!(store.get_token("tok-1").unwrap(), Some(token.clone()));
        assert_eq!(store.get_token("missing").unwrap(), None);
        assert_eq!(store.counts(at(0)).unwrap().active_tokens, 1);

        assert!(matches!(
            store.insert_token(&token),
            Err(StorageError::Conflict(_))
        ));

        let later = at(0) + Duration::hours(73);
        assert_eq!(store.purge_expired_tokens(later).unwrap(), 1);
        assert_eq!(store.get_token("tok-1").unwrap(), None);
    }

    #[test]
    fn test_reopen_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("feedback.db");

        {
            let store = FeedbackStore::open(&path).unwrap();
            store.insert(&guest("persisted", 0, 4)).unwrap();
        }

        let store = FeedbackStore::open(&path).unwrap();
        let entry = store.get("persisted").unwrap().unwrap();
        assert_eq!(entry.rating, Some(4));
        store.ping().unwrap();
    }
}
