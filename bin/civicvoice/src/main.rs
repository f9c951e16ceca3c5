//! # CivicVoice Binary
//!
//! Assembles the store from compile-time features and plays a short session
//! against it: a citizen submits and votes, an authority triages. A background
//! task subscribes to the suggestion list and logs every snapshot it sees.

use cv_config::{LogSettings, Settings};
use cv_core::models::{Category, Status, SuggestionId, UserRole, Vote};
use cv_core::traits::SuggestionRepo;
use cv_services::{CivicService, FeedQuery, NewPoll, NewSuggestion, SortOrder};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Feature-gated imports
#[cfg(feature = "store-memory")]
use cv_store_memory::MemorySuggestionStore;

#[cfg(feature = "identity-simple")]
use cv_identity_simple::SimpleIdentityProvider;

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings.log);

    // 1. Initialize Identity Implementation
    #[cfg(feature = "identity-simple")]
    let identity = Box::new(SimpleIdentityProvider::new(&settings.identity.email_domain));

    // 2. Initialize Store Implementation
    #[cfg(feature = "store-memory")]
    let store = if settings.store.seed_demo_data {
        MemorySuggestionStore::with_demo_data(identity)?
    } else {
        MemorySuggestionStore::new(identity)
    };

    // 3. Share it (dynamic dispatch keeps the plugins swappable)
    let repo: Arc<dyn SuggestionRepo> = Arc::new(store);
    let service = CivicService::with_poll_settings(repo.clone(), settings.polls);

    let mut suggestions = repo.subscribe_suggestions();
    let watcher = tokio::spawn(async move {
        while suggestions.changed().await.is_ok() {
            let (count, top) = {
                let snapshot = suggestions.borrow_and_update();
                (snapshot.len(), snapshot.first().map(|s| (s.title.clone(), s.votes)))
            };
            tracing::info!(count, ?top, "suggestion snapshot");
        }
    });

    tracing::info!(
        suggestions = repo.suggestions().len(),
        comments = repo.comments().len(),
        "🚀 CivicVoice store ready"
    );

    run_session(&service).await?;

    let trending = service.feed(&FeedQuery {
        sort: SortOrder::Trending,
        ..FeedQuery::default()
    });
    for (rank, s) in trending.iter().take(3).enumerate() {
        tracing::info!(rank = rank + 1, id = %s.id, votes = s.votes, title = %s.title, "trending");
    }

    println!("{}", serde_json::to_string_pretty(&service.dashboard())?);

    watcher.abort();
    Ok(())
}

/// A citizen proposes something with a poll and votes; an authority
/// moves it into review and replies.
async fn run_session(service: &CivicService) -> anyhow::Result<()> {
    service.login("Sita Thapa", UserRole::Citizen)?;
    let mut draft = NewSuggestion::new(
        "Covered Bus Stops",
        "Most stops on the ring road have no shelter from rain or sun.",
        Category::Transportation,
    );
    draft.location = Some("Kathmandu".into());
    draft.poll = Some(NewPoll {
        question: "Which stretch first?".into(),
        options: vec!["Kalanki".into(), "Koteshwor".into(), "Chabahil".into()],
    });
    let created = service.submit_suggestion(draft)?;
    tokio::task::yield_now().await;

    service.vote(&created.id, Vote::Up)?;
    service.vote_poll(&created.id, "Kalanki")?;
    if let Err(e) = service.vote(&SuggestionId::new("2"), Vote::Up) {
        tracing::warn!(error = %e, "could not upvote seeded suggestion");
    }
    tokio::task::yield_now().await;

    if let Err(e) = service.change_status(&created.id, Status::UnderReview) {
        tracing::warn!(error = %e, "citizen status change rejected as expected");
    }

    service.login("District Officer", UserRole::Authority)?;
    service.change_status(&created.id, Status::UnderReview)?;
    service.comment(&created.id, "Site survey scheduled for next month.")?;
    tokio::task::yield_now().await;

    for comment in service.comments(&created.id) {
        tracing::info!(author = %comment.author_name, verified = comment.verified, text = %comment.text, "comment");
    }
    service.logout();
    Ok(())
}

#[cfg(all(test, feature = "store-memory", feature = "identity-simple"))]
mod tests {
    use super::*;

    fn service(seeded: bool) -> (Arc<MemorySuggestionStore>, CivicService) {
        let identity = Box::new(SimpleIdentityProvider::default());
        let store = if seeded {
            MemorySuggestionStore::with_demo_data(identity).unwrap()
        } else {
            MemorySuggestionStore::new(identity)
        };
        let store = Arc::new(store);
        let service = CivicService::new(store.clone());
        (store, service)
    }

    #[tokio::test]
    async fn test_session_runs_without_demo_data() {
        let (store, service) = service(false);
        run_session(&service).await.unwrap();

        let all = store.suggestions();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, Status::UnderReview);
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn test_session_upvotes_seeded_suggestion() {
        let (store, service) = service(true);
        run_session(&service).await.unwrap();

        let second = store.suggestion(&SuggestionId::new("2")).unwrap();
        assert_eq!((second.votes, second.user_vote), (190, Vote::Up));
    }
}
