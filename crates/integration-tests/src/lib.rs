//! Shared fixtures for the end-to-end tests under `tests/`.

use chrono::Utc;
use cv_core::models::{Category, Status, Suggestion, SuggestionId, UserId, Vote};
use cv_identity_simple::SimpleIdentityProvider;
use cv_services::CivicService;
use cv_store_memory::MemorySuggestionStore;
use std::sync::Arc;

pub fn empty_store() -> Arc<MemorySuggestionStore> {
    Arc::new(MemorySuggestionStore::new(Box::new(SimpleIdentityProvider::default())))
}

pub fn demo_store() -> Arc<MemorySuggestionStore> {
    let store = MemorySuggestionStore::with_demo_data(Box::new(SimpleIdentityProvider::default()))
        .expect("bundled fixture parses");
    Arc::new(store)
}

pub fn service_over(store: &Arc<MemorySuggestionStore>) -> CivicService {
    CivicService::new(store.clone())
}

pub fn suggestion(id: &str, votes: i64) -> Suggestion {
    Suggestion {
        id: SuggestionId::new(id),
        title: format!("Suggestion {id}"),
        content: "Details".to_string(),
        category: Category::Infrastructure,
        status: Status::Open,
        author_id: UserId::new("user1"),
        author_name: "Rajesh Kumar".to_string(),
        is_anonymous: false,
        votes,
        comment_count: 0,
        created_at: Utc::now(),
        ai_priority: false,
        ai_summary: None,
        location: None,
        authority: None,
        user_vote: Vote::None,
        poll: None,
    }
}
