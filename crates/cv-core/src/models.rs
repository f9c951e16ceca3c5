//! # Domain Models
//!
//! These structs represent the core entities of CivicVoice.
//! Ids are opaque strings: fresh records get a random UUID, seeded
//! records keep the short ids they were published with (e.g. "1", "c1").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Random UUIDv4, rendered as a hyphenated string.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }
    };
}

string_id!(
    /// Identifies a session user.
    UserId
);
string_id!(
    /// Identifies a suggestion.
    SuggestionId
);
string_id!(
    /// Identifies a comment.
    CommentId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Citizen,
    Expert,
    /// May change a suggestion's status; their comments are shown as verified.
    Authority,
}

impl UserRole {
    /// Authorities are verified the moment they log in; nobody else is.
    pub fn is_verified(self) -> bool {
        matches!(self, UserRole::Authority)
    }
}

/// A logged-in person. Lives only as long as the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub verified: bool,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub badges: Vec<String>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Infrastructure,
    Education,
    Health,
    Environment,
    Transportation,
    Safety,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Infrastructure,
        Category::Education,
        Category::Health,
        Category::Environment,
        Category::Transportation,
        Category::Safety,
        Category::Other,
    ];
}

/// Triage state of a suggestion. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    #[serde(alias = "in_review")]
    UnderReview,
    Implemented,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Open,
        Status::UnderReview,
        Status::Implemented,
        Status::Rejected,
    ];
}

/// The viewer's vote on a suggestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Up,
    Down,
    #[default]
    None,
}

impl Vote {
    /// Contribution of this vote to a suggestion's tally.
    pub fn weight(self) -> i64 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
            Vote::None => 0,
        }
    }
}

/// Multiple-choice question attached to a suggestion at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub question: String,
    /// Display order of the choices.
    pub options: Vec<String>,
    #[serde(default)]
    pub votes: BTreeMap<String, u32>,
    #[serde(default)]
    pub user_voted_option: Option<String>,
}

impl Poll {
    pub fn new(question: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            question: question.into(),
            options,
            votes: BTreeMap::new(),
            user_voted_option: None,
        }
    }

    pub fn tally(&self, option: &str) -> u32 {
        self.votes.get(option).copied().unwrap_or(0)
    }

    pub fn total_votes(&self) -> u32 {
        self.votes.values().sum()
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Adds one to `option` and remembers it as the viewer's choice.
    /// A previous choice keeps its tally.
    pub fn record_vote(&mut self, option: &str) {
        *self.votes.entry(option.to_string()).or_insert(0) += 1;
        self.user_voted_option = Some(option.to_string());
    }
}

/// A citizen-submitted civic proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub status: Status,
    pub author_id: UserId,
    pub author_name: String,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Precomputed display flag; nothing is inferred at runtime.
    #[serde(default)]
    pub ai_priority: bool,
    #[serde(default)]
    pub ai_summary: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Office responsible for acting on the suggestion, if assigned.
    #[serde(default)]
    pub authority: Option<String>,
    #[serde(default)]
    pub user_vote: Vote,
    #[serde(default)]
    pub poll: Option<Poll>,
}

impl Suggestion {
    /// Applies the viewer's vote with toggle semantics and returns the change
    /// made to `votes`.
    ///
    /// Re-casting the stored vote withdraws it; any other vote replaces the
    /// stored one and moves the tally by the difference in weight, so
    /// switching Up to Down costs two.
    pub fn apply_vote(&mut self, vote: Vote) -> i64 {
        let previous = self.user_vote;
        let next = if previous == vote { Vote::None } else { vote };
        let delta = next.weight() - previous.weight();
        self.votes += delta;
        self.user_vote = next;
        delta
    }
}

/// A remark left on a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub suggestion_id: SuggestionId,
    pub author_id: UserId,
    pub author_name: String,
    pub text: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Set when the author is an authority.
    #[serde(default)]
    pub verified: bool,
}
