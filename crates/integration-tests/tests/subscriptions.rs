use cv_core::models::{Category, SuggestionId, UserRole, Vote};
use cv_core::traits::SuggestionRepo;
use cv_services::NewSuggestion;
use integration_tests::{demo_store, service_over};
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn subscriber_sees_final_state() {
    let store = demo_store();
    let service = service_over(&store);
    let mut rx = store.subscribe_suggestions();
    assert_eq!(rx.borrow_and_update().len(), 8);

    let watcher = tokio::spawn(async move {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let latest = {
                let snapshot = rx.borrow_and_update();
                (snapshot.len(), snapshot[0].votes)
            };
            seen.push(latest);
            if latest == (9, 1) {
                break;
            }
        }
        seen
    });

    service.login("Priya Lama", UserRole::Citizen).unwrap();
    let created = service
        .submit_suggestion(NewSuggestion::new("Bus shelters", "Rain cover.", Category::Transportation))
        .unwrap();
    service.vote(&created.id, Vote::Up).unwrap();

    let seen = timeout(Duration::from_secs(2), watcher)
        .await
        .expect("watcher finished")
        .unwrap();
    // Notifications may coalesce, but the final state is always observed.
    assert!(!seen.is_empty());
    assert_eq!(seen.last(), Some(&(9, 1)));
}

#[tokio::test]
async fn late_subscriber_gets_current_snapshot() {
    let store = demo_store();
    store.vote_suggestion(&SuggestionId::new("1"), Vote::Down);

    let rx = store.subscribe_suggestions();
    assert_eq!(rx.borrow()[0].votes, 244);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn session_changes_are_published() {
    let store = demo_store();
    let service = service_over(&store);
    let mut users = store.subscribe_user();

    service.login("Krishna Bahadur", UserRole::Citizen).unwrap();
    timeout(Duration::from_secs(1), users.changed()).await.unwrap().unwrap();
    assert!(users.borrow_and_update().is_some());

    service.logout();
    timeout(Duration::from_secs(1), users.changed()).await.unwrap().unwrap();
    assert!(users.borrow_and_update().is_none());

    // Logging out twice changes nothing.
    service.logout();
    assert!(!users.has_changed().unwrap());
}
