//! # cv-services
//!
//! Session-aware orchestration on top of a `SuggestionRepo`.
//! The store itself is permissive; this layer is where the session user,
//! roles, and input rules are checked before anything is written.

pub mod commands;
pub mod queries;

use cv_config::PollSettings;
use cv_core::error::{AppError, Result};
use cv_core::models::User;
use cv_core::traits::SuggestionRepo;
use std::sync::Arc;

pub use commands::{NewPoll, NewSuggestion};
pub use queries::{DashboardStats, DateWindow, FeedQuery, SortOrder};

/// Display name used for suggestions submitted anonymously.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Handle shared by every consumer; cloning shares the same store.
#[derive(Clone)]
pub struct CivicService {
    repo: Arc<dyn SuggestionRepo>,
    polls: PollSettings,
}

impl CivicService {
    pub fn new(repo: Arc<dyn SuggestionRepo>) -> Self {
        Self::with_poll_settings(repo, PollSettings::default())
    }

    pub fn with_poll_settings(repo: Arc<dyn SuggestionRepo>, polls: PollSettings) -> Self {
        Self { repo, polls }
    }

    /// The underlying store, for subscriptions.
    pub fn repo(&self) -> &Arc<dyn SuggestionRepo> {
        &self.repo
    }

    fn require_user(&self) -> Result<User> {
        self.repo
            .current_user()
            .ok_or_else(|| AppError::Unauthorized("log in first".into()))
    }
}
