//! Domain Services
//!
//! Pure rules shared by every repository implementation.

use kernel::error::field::FieldError;

use crate::domain::value_objects::{PageLimit, VoteValue};

pub const MIN_TITLE_LENGTH: usize = 4;
pub const MIN_TEXT_LENGTH: usize = 4;

/// Change in points when a user with vote `prior` now votes `new`.
///
/// | prior | new  | delta |
/// |-------|------|-------|
/// | none  | up   | +1    |
/// | none  | down | -1    |
/// | up    | up   | 0     |
/// | up    | down | -2    |
/// | down  | up   | +2    |
/// | down  | down | 0     |
pub fn vote_delta(prior: Option<VoteValue>, new: VoteValue) -> i32 {
    new.get() - prior.map_or(0, VoteValue::get)
}

/// Trim a `limit + 1` fetch down to one page and report whether more follow
pub fn split_page<T>(mut rows: Vec<T>, limit: PageLimit) -> (Vec<T>, bool) {
    let has_more = rows.len() as i64 == limit.fetch_count();
    rows.truncate(limit.get() as usize);
    (rows, has_more)
}

/// First `max_chars` characters of `text`, always followed by `...`
pub fn text_snippet(text: &str, max_chars: usize) -> String {
    let mut snippet: String = text.chars().take(max_chars).collect();
    snippet.push_str("...");
    snippet
}

/// Title is checked first, then text
pub fn validate_new_post(title: &str, text: &str) -> Result<(), FieldError> {
    if title.chars().count() < MIN_TITLE_LENGTH {
        return Err(FieldError::new("title", "Title should be greater than 3!"));
    }
    if text.chars().count() < MIN_TEXT_LENGTH {
        return Err(FieldError::new("text", "Body text should be greater than 3!"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_delta_policy() {
        let cases = [
            (None, VoteValue::Up, 1),
            (None, VoteValue::Down, -1),
            (Some(VoteValue::Up), VoteValue::Up, 0),
            (Some(VoteValue::Down), VoteValue::Down, 0),
            (Some(VoteValue::Up), VoteValue::Down, -2),
            (Some(VoteValue::Down), VoteValue::Up, 2),
        ];

        for (prior, new, expected) in cases {
            assert_eq!(vote_delta(prior, new), expected, "{prior:?} -> {new:?}");
        }
    }

    #[test]
    fn test_split_page_with_extra_row() {
        let limit = PageLimit::new(Some(3), 10, 50);
        let (rows, has_more) = split_page(vec![1, 2, 3, 4], limit);
        assert_eq!(rows, vec![1, 2, 3]);
        assert!(has_more);
    }

    #[test]
    fn test_split_page_short_fetch() {
        let limit = PageLimit::new(Some(3), 10, 50);
        let (rows, has_more) = split_page(vec![1, 2], limit);
        assert_eq!(rows, vec![1, 2]);
        assert!(!has_more);

        let (rows, has_more) = split_page(vec![1, 2, 3], limit);
        assert_eq!(rows.len(), 3);
        assert!(!has_more);
    }

    #[test]
    fn test_text_snippet() {
        assert_eq!(text_snippet("short", 200), "short...");

        let long = "x".repeat(250);
        let snippet = text_snippet(&long, 200);
        assert_eq!(snippet.len(), 203);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_text_snippet_counts_characters() {
        let text = "é".repeat(10);
        assert_eq!(text_snippet(&text, 3), "ééé...");
    }

    #[test]
    fn test_validate_new_post() {
        assert!(validate_new_post("abcd", "efgh").is_ok());

        let err = validate_new_post("abc", "x").unwrap_err();
        assert_eq!(err.field(), "title");
        assert_eq!(err.message(), "Title should be greater than 3!");

        let err = validate_new_post("abcd", "xyz").unwrap_err();
        assert_eq!(err.field(), "text");
        assert_eq!(err.message(), "Body text should be greater than 3!");
    }
}
