//! # cv-store-memory Implementation
//!
//! In-memory implementation of `SuggestionRepo`.
//! Each collection lives in a `watch` channel: the sender owns the current
//! snapshot, and every mutation is applied in place and published in a
//! single step, so subscribers only ever observe committed state.

pub mod seed;

use cv_core::error::Result;
use cv_core::models::{Comment, Status, Suggestion, SuggestionId, User, UserRole, Vote};
use cv_core::traits::{IdentityProvider, SuggestionRepo};
use tokio::sync::watch;

pub use seed::Seed;

pub struct MemorySuggestionStore {
    identity: Box<dyn IdentityProvider>,
    current_user: watch::Sender<Option<User>>,
    suggestions: watch::Sender<Vec<Suggestion>>,
    comments: watch::Sender<Vec<Comment>>,
}

impl MemorySuggestionStore {
    /// An empty store with nobody logged in.
    pub fn new(identity: Box<dyn IdentityProvider>) -> Self {
        Self::from_seed(identity, Seed::default())
    }

    /// A store pre-filled with the bundled demo suggestions and comments.
    pub fn with_demo_data(identity: Box<dyn IdentityProvider>) -> Result<Self> {
        Ok(Self::from_seed(identity, Seed::demo()?))
    }

    pub fn from_seed(identity: Box<dyn IdentityProvider>, seed: Seed) -> Self {
        tracing::debug!(
            suggestions = seed.suggestions.len(),
            comments = seed.comments.len(),
            "initialising in-memory suggestion store"
        );
        let (current_user, _) = watch::channel(None);
        let (suggestions, _) = watch::channel(seed.suggestions);
        let (comments, _) = watch::channel(seed.comments);
        Self {
            identity,
            current_user,
            suggestions,
            comments,
        }
    }

    /// Runs `f` against the suggestion with `id`, publishing only if `f`
    /// reports a change. Returns whether the suggestion exists.
    fn modify_suggestion<F>(&self, id: &SuggestionId, f: F) -> bool
    where
        F: FnOnce(&mut Suggestion) -> bool,
    {
        let mut found = false;
        self.suggestions.send_if_modified(|list| {
            match list.iter_mut().find(|s| &s.id == id) {
                Some(suggestion) => {
                    found = true;
                    f(suggestion)
                }
                None => false,
            }
        });
        found
    }
}

impl SuggestionRepo for MemorySuggestionStore {
    fn login(&self, name: &str, role: UserRole) -> User {
        let user = self.identity.issue_user(name, role);
        tracing::info!(user_id = %user.id, ?role, verified = user.verified, "session started");
        self.current_user.send_replace(Some(user.clone()));
        user
    }

    fn logout(&self) {
        let mut previous = None;
        self.current_user.send_if_modified(|user| {
            previous = user.take();
            previous.is_some()
        });
        if let Some(previous) = previous {
            tracing::info!(user_id = %previous.id, "session ended");
        }
    }

    fn current_user(&self) -> Option<User> {
        self.current_user.borrow().clone()
    }

    fn add_suggestion(&self, suggestion: Suggestion) {
        tracing::debug!(suggestion_id = %suggestion.id, category = ?suggestion.category, "adding suggestion");
        self.suggestions.send_modify(|list| list.insert(0, suggestion));
    }

    fn vote_suggestion(&self, id: &SuggestionId, vote: Vote) -> bool {
        let found = self.modify_suggestion(id, |suggestion| {
            let delta = suggestion.apply_vote(vote);
            tracing::debug!(
                suggestion_id = %id,
                ?vote,
                delta,
                votes = suggestion.votes,
                user_vote = ?suggestion.user_vote,
                "vote applied"
            );
            // The per-viewer vote always changes unless None was re-cast.
            delta != 0 || vote != Vote::None
        });
        if !found {
            tracing::debug!(suggestion_id = %id, "vote ignored: unknown suggestion");
        }
        found
    }

    fn update_suggestion_status(&self, id: &SuggestionId, status: Status) -> bool {
        let found = self.modify_suggestion(id, |suggestion| {
            tracing::debug!(suggestion_id = %id, from = ?suggestion.status, to = ?status, "status updated");
            suggestion.status = status;
            true
        });
        if !found {
            tracing::debug!(suggestion_id = %id, "status update ignored: unknown suggestion");
        }
        found
    }

    fn vote_poll(&self, id: &SuggestionId, option: &str) -> bool {
        let mut has_poll = false;
        self.modify_suggestion(id, |suggestion| match suggestion.poll.as_mut() {
            Some(poll) => {
                poll.record_vote(option);
                has_poll = true;
                tracing::debug!(suggestion_id = %id, option, tally = poll.tally(option), "poll vote recorded");
                true
            }
            None => false,
        });
        if !has_poll {
            tracing::debug!(suggestion_id = %id, "poll vote ignored: no such poll");
        }
        has_poll
    }

    fn suggestions(&self) -> Vec<Suggestion> {
        self.suggestions.borrow().clone()
    }

    fn suggestion(&self, id: &SuggestionId) -> Option<Suggestion> {
        self.suggestions.borrow().iter().find(|s| &s.id == id).cloned()
    }

    fn add_comment(&self, comment: Comment) -> bool {
        let parent = comment.suggestion_id.clone();
        tracing::debug!(comment_id = %comment.id, suggestion_id = %parent, "adding comment");
        // Count first: a published comment is never ahead of its count.
        let found = self.modify_suggestion(&parent, |suggestion| {
            suggestion.comment_count += 1;
            true
        });
        self.comments.send_modify(|list| list.push(comment));

        if !found {
            tracing::warn!(suggestion_id = %parent, "comment stored for unknown suggestion");
        }
        found
    }

    fn comments_for_suggestion(&self, id: &SuggestionId) -> Vec<Comment> {
        self.comments
            .borrow()
            .iter()
            .filter(|c| &c.suggestion_id == id)
            .cloned()
            .collect()
    }

    fn comments(&self) -> Vec<Comment> {
        self.comments.borrow().clone()
    }

    fn subscribe_user(&self) -> watch::Receiver<Option<User>> {
        self.current_user.subscribe()
    }

    fn subscribe_suggestions(&self) -> watch::Receiver<Vec<Suggestion>> {
        self.suggestions.subscribe()
    }

    fn subscribe_comments(&self) -> watch::Receiver<Vec<Comment>> {
        self.comments.subscribe()
    }
}
