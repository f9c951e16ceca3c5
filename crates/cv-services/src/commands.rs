//! # Commands
//!
//! Write-side operations. Each one resolves the session user, validates its
//! input, builds the record, and hands it to the store.

use crate::{CivicService, ANONYMOUS_AUTHOR};
use chrono::Utc;
use cv_core::error::{AppError, Result};
use cv_core::models::{
    Category, Comment, CommentId, Poll, Status, Suggestion, SuggestionId, User, UserRole, Vote,
};

/// Input for a new suggestion.
#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub is_anonymous: bool,
    pub location: Option<String>,
    pub poll: Option<NewPoll>,
}

impl NewSuggestion {
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
            is_anonymous: false,
            location: None,
            poll: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPoll {
    pub question: String,
    pub options: Vec<String>,
}

fn non_blank(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}

impl CivicService {
    pub fn login(&self, name: &str, role: UserRole) -> Result<User> {
        let name = non_blank("name", name)?;
        Ok(self.repo.login(&name, role))
    }

    pub fn logout(&self) {
        self.repo.logout();
    }

    fn build_poll(&self, draft: NewPoll) -> Result<Poll> {
        let question = non_blank("poll question", &draft.question)?;
        let options = draft
            .options
            .iter()
            .map(|o| non_blank("poll option", o))
            .collect::<Result<Vec<_>>>()?;

        let (min, max) = (self.polls.min_options, self.polls.max_options);
        if options.len() < min || options.len() > max {
            return Err(AppError::ValidationError(format!(
                "a poll needs between {min} and {max} options, got {}",
                options.len()
            )));
        }
        Ok(Poll::new(question, options))
    }

    /// Creates an Open suggestion authored by the session user and puts it
    /// at the top of the list.
    pub fn submit_suggestion(&self, draft: NewSuggestion) -> Result<Suggestion> {
        let user = self.require_user()?;
        let title = non_blank("title", &draft.title)?;
        let content = non_blank("content", &draft.content)?;
        let poll = draft.poll.map(|p| self.build_poll(p)).transpose()?;

        let suggestion = Suggestion {
            id: SuggestionId::generate(),
            title,
            content,
            category: draft.category,
            status: Status::Open,
            author_name: if draft.is_anonymous {
                ANONYMOUS_AUTHOR.to_string()
            } else {
                user.name.clone()
            },
            author_id: user.id,
            is_anonymous: draft.is_anonymous,
            votes: 0,
            comment_count: 0,
            created_at: Utc::now(),
            ai_priority: false,
            ai_summary: None,
            location: draft.location.filter(|l| !l.trim().is_empty()),
            authority: None,
            user_vote: Vote::None,
            poll,
        };

        tracing::info!(suggestion_id = %suggestion.id, category = ?suggestion.category, "suggestion submitted");
        self.repo.add_suggestion(suggestion.clone());
        Ok(suggestion)
    }

    /// Adds a comment by the session user. Authorities' comments are verified.
    pub fn comment(&self, suggestion_id: &SuggestionId, text: &str) -> Result<Comment> {
        let user = self.require_user()?;
        let text = non_blank("comment", text)?;
        if self.repo.suggestion(suggestion_id).is_none() {
            return Err(AppError::not_found("Suggestion", suggestion_id));
        }

        let comment = Comment {
            id: CommentId::generate(),
            suggestion_id: suggestion_id.clone(),
            author_id: user.id,
            author_name: user.name,
            text,
            created_at: Utc::now(),
            verified: user.role == UserRole::Authority,
        };
        tracing::info!(comment_id = %comment.id, suggestion_id = %suggestion_id, "comment added");
        self.repo.add_comment(comment.clone());
        Ok(comment)
    }

    /// Casts the viewer's vote and returns the updated suggestion.
    pub fn vote(&self, suggestion_id: &SuggestionId, vote: Vote) -> Result<Suggestion> {
        if !self.repo.vote_suggestion(suggestion_id, vote) {
            return Err(AppError::not_found("Suggestion", suggestion_id));
        }
        self.repo
            .suggestion(suggestion_id)
            .ok_or_else(|| AppError::not_found("Suggestion", suggestion_id))
    }

    /// Moves a suggestion to `status`. Only authorities may do this.
    pub fn change_status(&self, suggestion_id: &SuggestionId, status: Status) -> Result<Suggestion> {
        let user = self.require_user()?;
        if user.role != UserRole::Authority {
            tracing::warn!(user_id = %user.id, role = ?user.role, suggestion_id = %suggestion_id, "status change refused");
            return Err(AppError::Unauthorized(
                "only authorities can change a suggestion's status".into(),
            ));
        }
        if !self.repo.update_suggestion_status(suggestion_id, status) {
            return Err(AppError::not_found("Suggestion", suggestion_id));
        }
        tracing::info!(suggestion_id = %suggestion_id, ?status, "status changed");
        self.repo
            .suggestion(suggestion_id)
            .ok_or_else(|| AppError::not_found("Suggestion", suggestion_id))
    }

    /// Records the viewer's poll choice and returns the updated poll.
    pub fn vote_poll(&self, suggestion_id: &SuggestionId, option: &str) -> Result<Poll> {
        let poll = self
            .repo
            .suggestion(suggestion_id)
            .ok_or_else(|| AppError::not_found("Suggestion", suggestion_id))?
            .poll
            .ok_or_else(|| AppError::not_found("Poll", suggestion_id))?;
        if !poll.has_option(option) {
            return Err(AppError::ValidationError(format!(
                "'{option}' is not an option of this poll"
            )));
        }

        self.repo.vote_poll(suggestion_id, option);
        self.repo
            .suggestion(suggestion_id)
            .and_then(|s| s.poll)
            .ok_or_else(|| AppError::not_found("Poll", suggestion_id))
    }

    pub fn comments(&self, suggestion_id: &SuggestionId) -> Vec<Comment> {
        self.repo.comments_for_suggestion(suggestion_id)
    }
}
