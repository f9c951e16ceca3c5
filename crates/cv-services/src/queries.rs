//! # Queries
//!
//! Read-side views computed from store snapshots: the filtered feed, the
//! authority dashboard counters, and the profile list.

use crate::CivicService;
use chrono::{DateTime, Duration, Utc};
use cv_core::models::{Category, Status, Suggestion};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Most votes first; ties broken by discussion volume.
    #[default]
    Trending,
    MostUpvoted,
    MostRecent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateWindow {
    Last7Days,
    Last30Days,
    Last90Days,
    #[default]
    AllTime,
}

impl DateWindow {
    /// Oldest creation time still inside the window.
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let days = match self {
            DateWindow::Last7Days => 7,
            DateWindow::Last30Days => 30,
            DateWindow::Last90Days => 90,
            DateWindow::AllTime => return None,
        };
        Some(now - Duration::days(days))
    }
}

/// Filter and sort options for the suggestion feed.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub category: Option<Category>,
    /// Empty means every status.
    pub statuses: Vec<Status>,
    /// Only suggestions that carry a location.
    pub nearby_only: bool,
    pub window: DateWindow,
    pub sort: SortOrder,
}

impl FeedQuery {
    fn matches(&self, s: &Suggestion, cutoff: Option<DateTime<Utc>>) -> bool {
        self.category.map_or(true, |c| s.category == c)
            && (self.statuses.is_empty() || self.statuses.contains(&s.status))
            && (!self.nearby_only || s.location.is_some())
            && cutoff.map_or(true, |t| s.created_at >= t)
    }

    /// Filters and sorts `suggestions` as of `now`. Sorting is stable, so
    /// equal keys keep listing order.
    pub fn apply(&self, suggestions: Vec<Suggestion>, now: DateTime<Utc>) -> Vec<Suggestion> {
        let cutoff = self.window.cutoff(now);
        let mut feed: Vec<_> = suggestions
            .into_iter()
            .filter(|s| self.matches(s, cutoff))
            .collect();

        match self.sort {
            SortOrder::Trending => {
                feed.sort_by(|a, b| (b.votes, b.comment_count).cmp(&(a.votes, a.comment_count)))
            }
            SortOrder::MostUpvoted => feed.sort_by(|a, b| b.votes.cmp(&a.votes)),
            SortOrder::MostRecent => feed.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        feed
    }
}

/// Counters shown on the authority dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub open: usize,
    pub under_review: usize,
    pub implemented: usize,
    pub rejected: usize,
    pub ai_priority: usize,
    pub total_votes: i64,
    pub total_comments: u64,
}

impl DashboardStats {
    pub fn from_suggestions(suggestions: &[Suggestion]) -> Self {
        suggestions.iter().fold(Self::default(), |mut stats, s| {
            stats.total += 1;
            match s.status {
                Status::Open => stats.open += 1,
                Status::UnderReview => stats.under_review += 1,
                Status::Implemented => stats.implemented += 1,
                Status::Rejected => stats.rejected += 1,
            }
            if s.ai_priority {
                stats.ai_priority += 1;
            }
            stats.total_votes += s.votes;
            stats.total_comments += u64::from(s.comment_count);
            stats
        })
    }
}

impl CivicService {
    pub fn feed(&self, query: &FeedQuery) -> Vec<Suggestion> {
        query.apply(self.repo.suggestions(), Utc::now())
    }

    pub fn suggestions_by_category(&self, category: Option<Category>) -> Vec<Suggestion> {
        self.feed_unsorted(FeedQuery {
            category,
            ..FeedQuery::default()
        })
    }

    pub fn suggestions_by_status(&self, status: Option<Status>) -> Vec<Suggestion> {
        self.feed_unsorted(FeedQuery {
            statuses: status.into_iter().collect(),
            ..FeedQuery::default()
        })
    }

    fn feed_unsorted(&self, query: FeedQuery) -> Vec<Suggestion> {
        let cutoff = query.window.cutoff(Utc::now());
        self.repo
            .suggestions()
            .into_iter()
            .filter(|s| query.matches(s, cutoff))
            .collect()
    }

    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::from_suggestions(&self.repo.suggestions())
    }

    /// Suggestions written by the session user, anonymous ones included.
    /// Empty when nobody is logged in.
    pub fn authored_by_current_user(&self) -> Vec<Suggestion> {
        let Some(user) = self.repo.current_user() else {
            return Vec::new();
        };
        self.repo
            .suggestions()
            .into_iter()
            .filter(|s| s.author_id == user.id)
            .collect()
    }
}
