use cv_core::error::AppError;
use cv_core::models::{Category, Status, SuggestionId, UserRole, Vote};
use cv_core::traits::SuggestionRepo;
use cv_services::{FeedQuery, NewPoll, NewSuggestion, SortOrder, ANONYMOUS_AUTHOR};
use integration_tests::{demo_store, empty_store, service_over};

#[test]
fn citizen_submits_and_authority_triages() {
    let store = empty_store();
    let service = service_over(&store);

    let citizen = service.login("Maya Gurung", UserRole::Citizen).unwrap();
    let mut draft = NewSuggestion::new(
        "Community Composting Program",
        "Reduce landfill usage.",
        Category::Environment,
    );
    draft.location = Some("Lalitpur".into());
    let created = service.submit_suggestion(draft).unwrap();
    assert_eq!(created.author_id, citizen.id);
    assert_eq!(created.author_name, "Maya Gurung");

    let err = service.change_status(&created.id, Status::UnderReview).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    service.comment(&created.id, "Happy to volunteer").unwrap();

    service.login("District Officer", UserRole::Authority).unwrap();
    let updated = service.change_status(&created.id, Status::UnderReview).unwrap();
    assert_eq!(updated.status, Status::UnderReview);

    let reply = service.comment(&created.id, "Evaluating sites.").unwrap();
    assert!(reply.verified);

    let comments = service.comments(&created.id);
    assert_eq!(comments.len(), 2);
    assert!(!comments[0].verified);
    assert_eq!(store.suggestion(&created.id).unwrap().comment_count, 2);
}

#[test]
fn anonymous_suggestion_still_shows_in_profile() {
    let store = empty_store();
    let service = service_over(&store);
    service.login("Dipak Rai", UserRole::Citizen).unwrap();

    let mut draft = NewSuggestion::new("Street lighting", "Dark alleys.", Category::Safety);
    draft.is_anonymous = true;
    let created = service.submit_suggestion(draft).unwrap();
    assert_eq!(created.author_name, ANONYMOUS_AUTHOR);

    let mine = service.authored_by_current_user();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, created.id);

    service.logout();
    assert!(service.authored_by_current_user().is_empty());
    assert!(matches!(
        service.comment(&created.id, "hello"),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn poll_voting_through_service() {
    let store = empty_store();
    let service = service_over(&store);
    service.login("Anil Sharma", UserRole::Expert).unwrap();

    let mut draft = NewSuggestion::new("Park WiFi", "Free WiFi in parks.", Category::Infrastructure);
    draft.poll = Some(NewPoll {
        question: "Which park first?".into(),
        options: vec!["Ratna Park".into(), "Shankha Park".into()],
    });
    let created = service.submit_suggestion(draft).unwrap();

    service.vote_poll(&created.id, "Ratna Park").unwrap();
    let poll = service.vote_poll(&created.id, "Shankha Park").unwrap();
    assert_eq!(poll.tally("Ratna Park"), 1);
    assert_eq!(poll.tally("Shankha Park"), 1);
    assert_eq!(poll.user_voted_option.as_deref(), Some("Shankha Park"));

    assert!(matches!(
        service.vote_poll(&created.id, "Durbar Square"),
        Err(AppError::ValidationError(_))
    ));
}

#[test]
fn voting_returns_updated_suggestion() {
    let store = demo_store();
    let service = service_over(&store);
    let id = SuggestionId::new("3");

    let up = service.vote(&id, Vote::Up).unwrap();
    assert_eq!((up.votes, up.user_vote), (157, Vote::Up));
    let down = service.vote(&id, Vote::Down).unwrap();
    assert_eq!((down.votes, down.user_vote), (155, Vote::Down));

    assert!(service.vote(&SuggestionId::new("nope"), Vote::Up).is_err());
}

#[test]
fn demo_feed_and_dashboard() {
    let store = demo_store();
    let service = service_over(&store);

    let trending = service.feed(&FeedQuery::default());
    assert_eq!(trending[0].id.as_str(), "1");
    assert_eq!(trending.len(), 8);

    let recent = service.feed(&FeedQuery {
        sort: SortOrder::MostRecent,
        ..FeedQuery::default()
    });
    assert_eq!(recent[0].id.as_str(), "1");
    assert_eq!(recent[7].id.as_str(), "8");

    let nearby = service.feed(&FeedQuery {
        nearby_only: true,
        ..FeedQuery::default()
    });
    assert_eq!(nearby.len(), 7);

    assert_eq!(service.suggestions_by_category(Some(Category::Environment)).len(), 2);
    assert_eq!(service.suggestions_by_status(Some(Status::Open)).len(), 4);
    assert_eq!(service.suggestions_by_status(None).len(), 8);

    let stats = service.dashboard();
    assert_eq!(stats.total, 8);
    assert_eq!(stats.open, 4);
    assert_eq!(stats.under_review, 3);
    assert_eq!(stats.implemented, 1);
    assert_eq!(stats.ai_priority, 4);
    assert_eq!(stats.total_votes, 1455);
}
