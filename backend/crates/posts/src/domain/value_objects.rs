//! Domain Value Objects

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};

// ============================================================================
// VoteValue
// ============================================================================

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    /// `-1` is a downvote; every other value counts as an upvote.
    pub fn normalize(raw: i32) -> Self {
        if raw == -1 {
            VoteValue::Down
        } else {
            VoteValue::Up
        }
    }

    pub fn get(self) -> i32 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }

    /// Column value in `votes.value`
    pub fn as_i16(self) -> i16 {
        self.get() as i16
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Opaque feed position: the creation time of the last post a client saw.
///
/// Encoded as unpadded base64url of the instant in microseconds since the
/// Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(DateTime<Utc>);

impl Cursor {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self(created_at)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0.timestamp_micros().to_string())
    }

    /// `None` for anything `encode` could not have produced
    pub fn decode(raw: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
        let micros: i64 = std::str::from_utf8(&bytes).ok()?.parse().ok()?;
        DateTime::from_timestamp_micros(micros).map(Self)
    }
}

// ============================================================================
// PageLimit
// ============================================================================

/// Page size after clamping to `[1, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimit(i64);

impl PageLimit {
    pub fn new(requested: Option<i64>, default: i64, max: i64) -> Self {
        Self(requested.unwrap_or(default).clamp(1, max.max(1)))
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Rows to fetch so that one extra row reveals a following page
    pub fn fetch_count(self) -> i64 {
        self.0 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_normalization() {
        assert_eq!(VoteValue::normalize(-1), VoteValue::Down);
        assert_eq!(VoteValue::normalize(1), VoteValue::Up);
        assert_eq!(VoteValue::normalize(0), VoteValue::Up);
        assert_eq!(VoteValue::normalize(7), VoteValue::Up);
        assert_eq!(VoteValue::normalize(-2), VoteValue::Up);
    }

    #[test]
    fn test_vote_column_value() {
        assert_eq!(VoteValue::Up.as_i16(), 1);
        assert_eq!(VoteValue::Down.as_i16(), -1);
    }

    #[test]
    fn test_cursor_roundtrip_keeps_microseconds() {
        let at = DateTime::from_timestamp_micros(1_700_000_000_123_456).unwrap();
        let cursor = Cursor::new(at);
        let decoded = Cursor::decode(&cursor.encode()).unwrap();
        assert_eq!(decoded.created_at(), at);
    }

    #[test]
    fn test_cursor_is_url_safe() {
        let encoded = Cursor::new(Utc::now()).encode();
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_cursor_rejects_garbage() {
        assert!(Cursor::decode("!!!").is_none());
        assert!(Cursor::decode(&URL_SAFE_NO_PAD.encode("yesterday")).is_none());
        assert!(Cursor::decode("").is_none());
    }

    #[test]
    fn test_page_limit_clamps() {
        assert_eq!(PageLimit::new(Some(500), 10, 50).get(), 50);
        assert_eq!(PageLimit::new(Some(0), 10, 50).get(), 1);
        assert_eq!(PageLimit::new(Some(-3), 10, 50).get(), 1);
        assert_eq!(PageLimit::new(None, 10, 50).get(), 10);
        assert_eq!(PageLimit::new(Some(50), 10, 50).fetch_count(), 51);
    }
}
