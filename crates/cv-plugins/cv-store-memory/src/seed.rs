//! Demo records shipped with the store.
//!
//! The fixture stores each record's age instead of an absolute timestamp so
//! date-window filters keep matching no matter when the process starts.

use chrono::{DateTime, Duration, Utc};
use cv_core::error::{AppError, Result};
use cv_core::models::{Comment, Suggestion};
use serde::Deserialize;

const DEMO_FIXTURE: &str = include_str!("../fixtures/seed.json");

#[derive(Deserialize)]
struct SeedFile {
    suggestions: Vec<Aged<Suggestion>>,
    #[serde(default)]
    comments: Vec<Aged<Comment>>,
}

#[derive(Deserialize)]
struct Aged<T> {
    #[serde(default)]
    age_hours: i64,
    #[serde(flatten)]
    record: T,
}

/// Initial contents of a store, in listing order.
#[derive(Debug, Clone, Default)]
pub struct Seed {
    pub suggestions: Vec<Suggestion>,
    pub comments: Vec<Comment>,
}

impl Seed {
    /// The eight suggestions and four comments the app ships with.
    pub fn demo() -> Result<Self> {
        Self::from_json(DEMO_FIXTURE)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: SeedFile = serde_json::from_str(raw)
            .map_err(|e| AppError::Internal(format!("malformed seed fixture: {e}")))?;
        let now = Utc::now();

        let suggestions = file
            .suggestions
            .into_iter()
            .map(|aged| -> Result<Suggestion> {
                Ok(Suggestion {
                    created_at: aged_from(now, aged.age_hours)?,
                    ..aged.record
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let comments = file
            .comments
            .into_iter()
            .map(|aged| -> Result<Comment> {
                Ok(Comment {
                    created_at: aged_from(now, aged.age_hours)?,
                    ..aged.record
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { suggestions, comments })
    }
}

/// `now` minus `age_hours`, or an error when the result leaves chrono's range.
fn aged_from(now: DateTime<Utc>, age_hours: i64) -> Result<DateTime<Utc>> {
    Duration::try_hours(age_hours)
        .and_then(|age| now.checked_sub_signed(age))
        .ok_or_else(|| AppError::Internal(format!("age_hours out of range: {age_hours}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::models::{Status, Vote};

    #[test]
    fn test_demo_fixture_parses() {
        let seed = Seed::demo().unwrap();
        assert_eq!(seed.suggestions.len(), 8);
        assert_eq!(seed.comments.len(), 4);

        let first = &seed.suggestions[0];
        assert_eq!(first.id.as_str(), "1");
        assert_eq!(first.status, Status::UnderReview);
        assert_eq!(first.votes, 245);
        assert_eq!(first.user_vote, Vote::None);
        assert!(first.poll.is_none());

        let officer = seed.comments.iter().find(|c| c.id.as_str() == "c2").unwrap();
        assert!(officer.verified);
    }

    #[test]
    fn test_ages_become_timestamps() {
        let seed = Seed::from_json(
            r#"{"suggestions": [
                {"id": "a", "age_hours": 48, "title": "t", "content": "c",
                 "category": "other", "status": "open",
                 "author_id": "u", "author_name": "U"}
            ]}"#,
        )
        .unwrap();
        let age = Utc::now() - seed.suggestions[0].created_at;
        assert!(age >= Duration::hours(48));
        assert!(age < Duration::hours(49));
        assert!(seed.comments.is_empty());
    }

    #[test]
    fn test_malformed_fixture_is_internal_error() {
        let err = Seed::from_json("{\"suggestions\": 3}").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_out_of_range_age_is_internal_error() {
        for age in ["1000000000000", "9223372036854775807", "-9223372036854775808"] {
            let raw = format!(
                r#"{{"suggestions": [
                    {{"id": "a", "age_hours": {age}, "title": "t", "content": "c",
                      "category": "other", "status": "open",
                      "author_id": "u", "author_name": "U"}}
                ]}}"#
            );
            let err = Seed::from_json(&raw).unwrap_err();
            assert!(err.to_string().contains("age_hours out of range"), "{age}: {err}");
        }
    }

    #[test]
    fn test_out_of_range_comment_age_is_internal_error() {
        let err = Seed::from_json(
            r#"{"suggestions": [], "comments": [
                {"id": "c", "age_hours": 1000000000000, "suggestion_id": "a",
                 "author_id": "u", "author_name": "U", "text": "hi"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
