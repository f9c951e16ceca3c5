//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use crate::models::{Comment, Status, Suggestion, SuggestionId, User, UserRole, Vote};
use tokio::sync::watch;

/// The suggestion store contract: session user, suggestions, and comments.
///
/// Every operation is synchronous and total. Lookups by id that miss are
/// silent no-ops; the returned `bool` tells the caller whether anything
/// matched.
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait SuggestionRepo: Send + Sync {
    // Session Operations
    fn login(&self, name: &str, role: UserRole) -> User;
    fn logout(&self);
    fn current_user(&self) -> Option<User>;

    // Suggestion Operations
    /// Prepends a fully formed suggestion. Ids and zeroed tallies are the
    /// caller's job.
    fn add_suggestion(&self, suggestion: Suggestion);
    fn vote_suggestion(&self, id: &SuggestionId, vote: Vote) -> bool;
    fn update_suggestion_status(&self, id: &SuggestionId, status: Status) -> bool;
    fn vote_poll(&self, id: &SuggestionId, option: &str) -> bool;
    fn suggestions(&self) -> Vec<Suggestion>;
    fn suggestion(&self, id: &SuggestionId) -> Option<Suggestion>;

    // Comment Operations
    /// Stores the comment even when its suggestion is unknown; returns
    /// whether a suggestion's comment count was bumped.
    fn add_comment(&self, comment: Comment) -> bool;
    fn comments_for_suggestion(&self, id: &SuggestionId) -> Vec<Comment>;
    fn comments(&self) -> Vec<Comment>;

    // Observation
    /// Receivers see the current snapshot immediately and wake on every
    /// subsequent change.
    fn subscribe_user(&self) -> watch::Receiver<Option<User>>;
    fn subscribe_suggestions(&self) -> watch::Receiver<Vec<Suggestion>>;
    fn subscribe_comments(&self) -> watch::Receiver<Vec<Comment>>;
}

/// Issues session users on login.
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    /// Builds a new user with a fresh id; verified iff the role is Authority.
    fn issue_user(&self, name: &str, role: UserRole) -> User;
}
