//! Unit tests for the mission progress engine.

use super::*;
use crate::competitions::CompetitionStatus;
use crate::config::EngineConfig;
use crate::errors::Error;
use crate::events::{CompletionListeners, DomainEventSink, MockDomainEventSink};
use crate::goals::GoalType;
use crate::testing::{club, competition, test_now, InMemoryStore};
use chrono::Duration as ChronoDuration;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn engine_with(
    store: &Arc<InMemoryStore>,
    sink: Arc<dyn DomainEventSink>,
    config: EngineConfig,
) -> MissionProgressService {
    MissionProgressService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        sink,
        &config,
    )
    .unwrap()
    .with_clock(Arc::new(test_now))
}

fn engine(store: &Arc<InMemoryStore>, sink: &MockDomainEventSink) -> MissionProgressService {
    engine_with(store, Arc::new(sink.clone()), EngineConfig::default())
}

/// One club, one EVENT_COUNT competition with goal 5 and reward 100.
fn five_events_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.add_club(club("club-a", 0));
    store.add_competition(competition("comp-1", GoalType::EventCount, 5, 100));
    store
}

#[tokio::test]
async fn test_event_count_scenario() {
    let store = five_events_store();
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);

    store.set_events("club-a", 3);
    let outcome = service.recompute_all().await.unwrap();
    assert_eq!(outcome.progress.len(), 1);
    let record = &outcome.progress[0];
    assert_eq!(record.progress, 3);
    assert!(!record.is_completed);
    assert!((record.percentage(5) - 60.0).abs() < 1e-9);
    assert_eq!(store.club_points("club-a"), 0);
    assert!(sink.is_empty());

    store.set_events("club-a", 5);
    let outcome = service.recompute_all().await.unwrap();
    let record = &outcome.progress[0];
    assert_eq!(record.progress, 5);
    assert!(record.is_completed);
    assert_eq!(outcome.summary.completed, 1);
    assert_eq!(store.club_points("club-a"), 100);

    let completed = sink.completed();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].club.id, "club-a");
    assert_eq!(completed[0].club.points, 100);
    assert_eq!(completed[0].competition.id, "comp-1");
    assert_eq!(completed[0].progress.progress, 5);
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let store = five_events_store();
    store.add_competition(competition("comp-2", GoalType::MemberCount, 10, 40));
    store.set_events("club-a", 6);
    store.set_members("club-a", 4);
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);

    let first = service.recompute_all().await.unwrap();
    let stored_after_first = store.stored_progress();
    let writes_after_first = store.writes();
    let events_after_first = sink.len();

    let second = service.recompute_all().await.unwrap();
    assert_eq!(first.progress, second.progress);
    assert_eq!(store.stored_progress(), stored_after_first);
    assert_eq!(store.writes(), writes_after_first);
    assert_eq!(sink.len(), events_after_first);
    assert_eq!(second.summary.updated, 0);
    assert_eq!(second.summary.completed, 0);
}

#[tokio::test]
async fn test_award_happens_exactly_once() {
    let store = five_events_store();
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);

    store.set_events("club-a", 4);
    service.recompute_all().await.unwrap();
    store.set_events("club-a", 5);
    service.recompute_all().await.unwrap();
    store.set_events("club-a", 9);
    service.recompute_all().await.unwrap();
    service.recompute_club("club-a").await.unwrap();

    assert_eq!(store.club_points("club-a"), 100);
    assert_eq!(store.completions(), 1);
    assert_eq!(sink.completed().len(), 1);
    assert_eq!(store.progress_of("club-a", "comp-1").unwrap().progress, 9);
}

#[tokio::test]
async fn test_completion_is_monotonic() {
    let store = Arc::new(InMemoryStore::new());
    store.add_club(club("club-a", 0));
    store.add_competition(competition("likes", GoalType::EventLikes, 10, 30));
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);

    store.set_likes("club-a", 12);
    service.recompute_all().await.unwrap();
    for likes in [3, 0, 11, 25] {
        store.set_likes("club-a", likes);
        service.recompute_all().await.unwrap();
        let record = store.progress_of("club-a", "likes").unwrap();
        assert!(record.is_completed);
        assert_eq!(record.progress, likes);
    }
    assert_eq!(store.club_points("club-a"), 30);
    assert_eq!(sink.completed().len(), 1);
}

#[tokio::test]
async fn test_concurrent_recomputes_do_not_double_award() {
    let store = five_events_store();
    store.add_club(club("club-b", 20));
    store.set_events("club-a", 5);
    store.set_events("club-b", 8);
    let sink = MockDomainEventSink::new();
    let service = Arc::new(engine(&store, &sink));

    let (a, b, c) = tokio::join!(
        service.recompute_all(),
        service.recompute_all(),
        service.recompute_club("club-a")
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    assert_eq!(store.club_points("club-a"), 100);
    assert_eq!(store.club_points("club-b"), 120);
    assert_eq!(sink.completed().len(), 2);
}

#[tokio::test]
async fn test_unavailable_club_is_skipped() {
    let store = five_events_store();
    store.add_club(club("club-b", 0));
    store.set_events("club-a", 5);
    store.set_events("club-b", 5);
    store.make_unavailable("club-b");
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);

    let outcome = service.recompute_all().await.unwrap();
    assert_eq!(outcome.summary.evaluated, 1);
    assert_eq!(outcome.summary.skipped.len(), 1);
    assert_eq!(outcome.summary.skipped[0].club_id, "club-b");
    assert!(outcome.summary.is_partial());
    assert_eq!(store.club_points("club-a"), 100);
    assert_eq!(store.club_points("club-b"), 0);
    assert_eq!(service.last_summary().unwrap(), outcome.summary);

    // Next cycle picks the club up again
    store.make_available("club-b");
    let outcome = service.recompute_all().await.unwrap();
    assert!(!outcome.summary.is_partial());
    assert_eq!(store.club_points("club-b"), 100);
}

#[tokio::test]
async fn test_single_club_refresh_keeps_other_clubs_stale() {
    let store = five_events_store();
    store.add_club(club("club-b", 0));
    store.add_club(club("club-c", 0));
    store.set_events("club-a", 2);
    store.make_unavailable("club-b");
    store.make_unavailable("club-c");
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);

    let full = service.recompute_all().await.unwrap();
    assert_eq!(full.summary.skipped.len(), 2);

    service.recompute_club("club-a").await.unwrap();
    let summary = service.last_summary().unwrap();
    assert!(summary.is_partial());
    assert_eq!(summary.clubs, 3);
    let mut stale: Vec<&str> = summary.skipped.iter().map(|p| p.club_id.as_str()).collect();
    stale.sort();
    assert_eq!(stale, vec!["club-b", "club-c"]);

    // A successful refresh of a skipped club clears only its own entry
    store.make_available("club-b");
    service.recompute_club("club-b").await.unwrap();
    let summary = service.last_summary().unwrap();
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].club_id, "club-c");
}

#[tokio::test]
async fn test_single_club_refresh_before_any_full_pass_has_no_summary() {
    let store = five_events_store();
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);

    service.recompute_club("club-a").await.unwrap();
    assert!(service.last_summary().is_none());
}

#[tokio::test]
async fn test_idle_pairs_are_stable_under_an_advancing_clock() {
    let store = five_events_store();
    store.add_competition(competition("comp-2", GoalType::MemberCount, 10, 40));
    store.set_members("club-a", 0);
    let ticks = Arc::new(AtomicI64::new(0));
    let clock_ticks = ticks.clone();
    let service = engine_with(
        &store,
        Arc::new(MockDomainEventSink::new()),
        EngineConfig::default(),
    )
    .with_clock(Arc::new(move || {
        test_now() + ChronoDuration::seconds(clock_ticks.fetch_add(1, AtomicOrdering::SeqCst))
    }));

    let first = service.recompute_all().await.unwrap();
    let second = service.recompute_all().await.unwrap();
    assert!(ticks.load(AtomicOrdering::SeqCst) >= 2);
    assert_eq!(first.progress.len(), 2);
    assert_eq!(first.progress, second.progress);
    assert_eq!(second.summary.updated, 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_lookup_times_out() {
    let store = five_events_store();
    store.set_events("club-a", 5);
    store.set_metric_delay(Some(Duration::from_secs(30)));
    let sink = MockDomainEventSink::new();
    let config = EngineConfig::default().with_lookup_timeout(Duration::from_secs(1));
    let service = engine_with(&store, Arc::new(sink.clone()), config);

    let outcome = service.recompute_all().await.unwrap();
    assert_eq!(outcome.summary.skipped.len(), 1);
    assert!(outcome.summary.skipped[0].reason.contains("timed out"));
    assert_eq!(store.club_points("club-a"), 0);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_invalid_goal_is_skipped_not_fatal() {
    let store = five_events_store();
    store.add_competition(competition("broken", GoalType::EventCount, 0, 10));
    store.set_events("club-a", 5);
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);

    let outcome = service.recompute_all().await.unwrap();
    assert_eq!(outcome.summary.skipped.len(), 1);
    assert_eq!(outcome.summary.skipped[0].competition_id, "broken");
    assert!(store.progress_of("club-a", "broken").is_none());
    assert_eq!(store.club_points("club-a"), 100);
}

#[tokio::test]
async fn test_only_open_competitions_are_tracked() {
    let store = five_events_store();
    let mut draft = competition("draft", GoalType::EventCount, 1, 10);
    draft.status = CompetitionStatus::Draft;
    let mut closed = competition("closed", GoalType::EventCount, 1, 10);
    closed.status = CompetitionStatus::Closed;
    let mut expired = competition("expired", GoalType::EventCount, 1, 10);
    expired.end_date = Some(test_now() - ChronoDuration::days(1));
    let mut running = competition("running", GoalType::EventCount, 1, 10);
    running.end_date = Some(test_now() + ChronoDuration::days(1));
    for c in [draft, closed, expired, running] {
        store.add_competition(c);
    }
    store.set_events("club-a", 2);
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);

    let outcome = service.recompute_all().await.unwrap();
    let mut tracked: Vec<&str> = outcome
        .progress
        .iter()
        .map(|p| p.competition_id.as_str())
        .collect();
    tracked.sort();
    assert_eq!(tracked, vec!["comp-1", "running"]);
    assert_eq!(store.club_points("club-a"), 10);
}

#[tokio::test]
async fn test_check_expired_missions_closes_without_awarding() {
    let store = five_events_store();
    let mut expired = competition("expired", GoalType::EventCount, 1, 500);
    expired.end_date = Some(test_now() - ChronoDuration::hours(1));
    store.add_competition(expired);
    store.set_events("club-a", 3);
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);

    let closed = service.check_expired_missions().await.unwrap();
    assert_eq!(closed, vec!["expired".to_string()]);
    assert_eq!(
        store.competition_status("expired"),
        Some(CompetitionStatus::Closed)
    );
    assert_eq!(store.competition_status("comp-1"), Some(CompetitionStatus::Activated));
    assert_eq!(store.club_points("club-a"), 0);
    assert!(sink.completed().is_empty());
    assert_eq!(sink.closed_competitions(), vec!["expired"]);

    // Nothing left to close
    assert!(service.check_expired_missions().await.unwrap().is_empty());
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_listener_failures_do_not_abort_recompute() {
    let store = five_events_store();
    store.add_club(club("club-b", 0));
    store.set_events("club-a", 5);
    store.set_events("club-b", 5);

    let listeners = Arc::new(CompletionListeners::new());
    let received = Arc::new(Mutex::new(Vec::new()));
    listeners.add_completion_listener(|_| Err(Error::Unexpected("view closed".to_string())));
    let sink_received = received.clone();
    listeners.add_completion_listener(move |event| {
        sink_received.lock().unwrap().push(event.club.id.clone());
        Ok(())
    });
    let service = engine_with(&store, listeners.clone(), EngineConfig::default());

    let outcome = service.recompute_all().await.unwrap();
    assert_eq!(outcome.summary.completed, 2);
    let mut clubs = received.lock().unwrap().clone();
    clubs.sort();
    assert_eq!(clubs, vec!["club-a", "club-b"]);
}

#[tokio::test]
async fn test_recompute_club_only_touches_that_club() {
    let store = five_events_store();
    store.add_club(club("club-b", 0));
    store.set_events("club-a", 5);
    store.set_events("club-b", 5);
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);

    let outcome = service.recompute_club("club-b").await.unwrap();
    assert_eq!(outcome.summary.clubs, 1);
    assert_eq!(store.club_points("club-b"), 100);
    assert_eq!(store.club_points("club-a"), 0);

    assert!(service.recompute_club("missing").await.is_err());
}

#[tokio::test]
async fn test_clubs_with_progress() {
    let store = five_events_store();
    store.add_competition(competition("comp-2", GoalType::MemberCount, 10, 50));
    store.add_club(club("club-b", 0));
    store.set_events("club-a", 5);
    store.set_members("club-a", 5);
    let sink = MockDomainEventSink::new();
    let service = engine(&store, &sink);
    service.recompute_all().await.unwrap();

    let club_a = service.get_club_progress("club-a").unwrap();
    assert_eq!(club_a.club.points, 100);
    assert_eq!(club_a.missions.len(), 2);
    assert_eq!(club_a.completed_missions, 1);
    assert_eq!(club_a.earned_points, 100);
    assert_eq!(club_a.total_possible_points, 150);
    assert!((club_a.overall_progress - 75.0).abs() < 1e-9);

    let all = service.get_clubs_with_progress().unwrap();
    assert_eq!(all.len(), 2);
    let club_b = all.iter().find(|c| c.club.id == "club-b").unwrap();
    assert!(club_b.missions.is_empty());
    assert_eq!(club_b.overall_progress, 0.0);
}

#[test]
fn test_invalid_config_is_fatal() {
    let store = Arc::new(InMemoryStore::new());
    let config = EngineConfig::default().with_lookup_timeout(Duration::ZERO);
    let result = MissionProgressService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(MockDomainEventSink::new()),
        &config,
    );
    assert!(matches!(result, Err(Error::InvalidConfigValue(_))));
}
