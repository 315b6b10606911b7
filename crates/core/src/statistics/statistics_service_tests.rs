//! Unit tests for the statistics aggregator.

use super::*;
use crate::competitions::{Competition, CompetitionStatus};
use crate::config::EngineConfig;
use crate::errors::{DatabaseError, Error};
use crate::goals::GoalType;
use crate::missions::MissionProgress;
use crate::testing::{club, competition, season, test_now, InMemoryStore};
use chrono::Duration;
use std::sync::Arc;

fn statistics_with(store: &Arc<InMemoryStore>, config: EngineConfig) -> StatisticsService {
    StatisticsService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        &config,
    )
    .unwrap()
    .with_clock(Arc::new(test_now))
}

fn statistics(store: &Arc<InMemoryStore>) -> StatisticsService {
    statistics_with(store, EngineConfig::default())
}

fn record(
    club_id: &str,
    competition_id: &str,
    progress: i64,
    is_completed: bool,
) -> MissionProgress {
    MissionProgress {
        club_id: club_id.to_string(),
        competition_id: competition_id.to_string(),
        progress,
        is_completed,
        last_updated: test_now(),
    }
}

fn in_season(
    id: &str,
    season_id: &str,
    goal_type: GoalType,
    goal: i64,
    reward: i64,
) -> Competition {
    let mut comp = competition(id, goal_type, goal, reward);
    comp.season_id = Some(season_id.to_string());
    comp
}

#[test]
fn test_leaderboard_breaks_ties_by_club_id() {
    let store = Arc::new(InMemoryStore::new());
    for (id, points) in [
        ("club-e", 0),
        ("club-c", 50),
        ("club-d", 10),
        ("club-a", 30),
        ("club-b", 50),
    ] {
        store.add_club(club(id, points));
    }
    let service = statistics(&store);

    let top = service.leaderboard(3).unwrap();
    let ids: Vec<&str> = top.iter().map(|e| e.club_id.as_str()).collect();
    assert_eq!(ids, vec!["club-b", "club-c", "club-a"]);
    assert_eq!(top.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(top[2].points, 30);

    // Same input, same output
    assert_eq!(service.leaderboard(3).unwrap(), top);
    assert_eq!(service.leaderboard(10).unwrap().len(), 5);
    assert!(service.leaderboard(0).unwrap().is_empty());
}

#[test]
fn test_club_without_missions_has_zero_rate() {
    let store = Arc::new(InMemoryStore::new());
    store.add_club(club("club-a", 0));
    let service = statistics(&store);

    let stats = service.club_statistics("club-a").unwrap();
    assert_eq!(stats.total_missions, 0);
    assert_eq!(stats.completed_missions, 0);
    assert_eq!(stats.completion_rate, 0.0);
    assert!(!stats.completion_rate.is_nan());
    assert_eq!(stats.rank, 1);
    assert_eq!(stats.completed_by_goal_type.len(), GoalType::ALL.len());
    assert!(stats.completed_by_goal_type.values().all(|count| *count == 0));
    assert_eq!(stats.season_points.len(), 5);
    assert!(stats.season_points.iter().all(|s| s.season_id.is_none() && s.points == 0));
}

#[test]
fn test_club_statistics_rollup() {
    let store = Arc::new(InMemoryStore::new());
    store.add_club(club("club-a", 150));
    store.add_club(club("club-b", 200));
    store.add_season(season("s-old", test_now() - Duration::days(200)));
    store.add_season(season("s-new", test_now() + Duration::days(30)));
    store.add_competition(in_season("comp-1", "s-new", GoalType::EventCount, 5, 100));
    store.add_competition(in_season("comp-2", "s-old", GoalType::EventLikes, 10, 50));
    store.add_competition(in_season("comp-3", "s-new", GoalType::MemberCount, 20, 30));
    store.put_progress(record("club-a", "comp-1", 5, true));
    store.put_progress(record("club-a", "comp-2", 12, true));
    store.put_progress(record("club-a", "comp-3", 4, false));

    let service = statistics_with(&store, EngineConfig::default().with_season_history(3));
    let stats = service.club_statistics("club-a").unwrap();

    assert_eq!(stats.total_points, 150);
    assert_eq!(stats.rank, 2);
    assert_eq!(stats.completed_missions, 2);
    assert_eq!(stats.total_missions, 3);
    assert!((stats.completion_rate - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.completed_by_goal_type[&GoalType::EventCount], 1);
    assert_eq!(stats.completed_by_goal_type[&GoalType::EventLikes], 1);
    assert_eq!(stats.completed_by_goal_type[&GoalType::MemberCount], 0);

    let seasons: Vec<(Option<&str>, i64)> = stats
        .season_points
        .iter()
        .map(|s| (s.season_id.as_deref(), s.points))
        .collect();
    assert_eq!(seasons, vec![(Some("s-new"), 100), (Some("s-old"), 50), (None, 0)]);
}

#[test]
fn test_unknown_club_is_not_found() {
    let store = Arc::new(InMemoryStore::new());
    let service = statistics(&store);
    assert!(matches!(
        service.club_statistics("ghost"),
        Err(Error::Database(DatabaseError::NotFound(_)))
    ));
}

#[test]
fn test_season_with_one_completed_competition() {
    let store = Arc::new(InMemoryStore::new());
    for id in ["club-a", "club-b", "club-c"] {
        store.add_club(club(id, 0));
    }
    store.add_season(season("s-1", test_now() + Duration::days(10)));
    store.add_competition(in_season("comp-1", "s-1", GoalType::EventCount, 5, 100));
    store.add_competition(in_season("comp-2", "s-1", GoalType::EventCount, 10, 60));
    store.add_competition(in_season("comp-3", "s-1", GoalType::EventLikes, 50, 40));
    store.add_competition(in_season("comp-4", "s-1", GoalType::MemberCount, 30, 20));

    // comp-1 is completed by both of its participants; the others are still open
    store.put_progress(record("club-a", "comp-1", 6, true));
    store.put_progress(record("club-b", "comp-1", 5, true));
    store.put_progress(record("club-a", "comp-2", 3, false));
    store.put_progress(record("club-c", "comp-3", 12, false));

    let stats = statistics(&store).season_statistics("s-1").unwrap();
    assert!(stats.is_active);
    assert_eq!(stats.total_competitions, 4);
    assert_eq!(stats.active_competitions, 4);
    assert_eq!(stats.completed_competitions, 1);
    assert_eq!(stats.total_points_distributed, 200);
    assert_eq!(stats.competitions_by_goal_type[&GoalType::EventCount], 2);
    assert_eq!(stats.competitions_by_goal_type[&GoalType::EventLikes], 1);
    assert_eq!(stats.competitions_by_goal_type[&GoalType::MemberCount], 1);

    let top: Vec<(&str, i64)> = stats
        .top_clubs
        .iter()
        .map(|e| (e.club_id.as_str(), e.points))
        .collect();
    assert_eq!(top, vec![("club-a", 100), ("club-b", 100)]);
}

#[test]
fn test_season_counts_only_open_competitions_as_active() {
    let store = Arc::new(InMemoryStore::new());
    store.add_season(season("s-1", test_now() - Duration::days(1)));
    let mut expired = in_season("comp-1", "s-1", GoalType::EventCount, 5, 100);
    expired.end_date = Some(test_now() - Duration::hours(1));
    let mut closed = in_season("comp-2", "s-1", GoalType::EventCount, 5, 100);
    closed.status = CompetitionStatus::Closed;
    let mut draft = in_season("comp-3", "s-1", GoalType::EventLikes, 5, 100);
    draft.status = CompetitionStatus::Draft;
    store.add_competition(expired);
    store.add_competition(closed);
    store.add_competition(draft);

    let stats = statistics(&store).season_statistics("s-1").unwrap();
    assert!(!stats.is_active);
    assert_eq!(stats.total_competitions, 3);
    assert_eq!(stats.active_competitions, 0);
    assert_eq!(stats.completed_competitions, 0);
    assert_eq!(stats.total_points_distributed, 0);
    assert!(stats.top_clubs.is_empty());
}

#[test]
fn test_season_top_clubs_respects_limit() {
    let store = Arc::new(InMemoryStore::new());
    store.add_season(season("s-1", test_now() + Duration::days(10)));
    store.add_competition(in_season("comp-1", "s-1", GoalType::EventCount, 1, 10));
    for i in 0..4 {
        let id = format!("club-{}", i);
        store.add_club(club(&id, 0));
        store.put_progress(record(&id, "comp-1", 1, true));
    }

    let service = statistics_with(&store, EngineConfig::default().with_top_clubs(2));
    let stats = service.season_statistics("s-1").unwrap();
    assert_eq!(stats.top_clubs.len(), 2);
    assert_eq!(stats.top_clubs[0].club_id, "club-0");
    assert_eq!(stats.top_clubs[1].rank, 2);
}

#[test]
fn test_competition_statistics() {
    let store = Arc::new(InMemoryStore::new());
    store.add_club(club("club-a", 0));
    store.add_club(club("club-b", 0));
    store.add_club(club("club-c", 0));
    store.add_competition(competition("comp-1", GoalType::EventLikes, 10, 50));
    store.put_progress(record("club-a", "comp-1", 4, false));
    store.put_progress(record("club-b", "comp-1", 12, true));
    store.put_progress(record("club-c", "comp-1", 4, false));

    let stats = statistics(&store).competition_statistics("comp-1").unwrap();
    assert_eq!(stats.participating_clubs, 3);
    assert_eq!(stats.completed_by, 1);
    assert!((stats.completion_rate - 100.0 / 3.0).abs() < 1e-9);
    assert!((stats.average_progress - 60.0).abs() < 1e-9);

    let order: Vec<&str> = stats.club_progress.iter().map(|e| e.club_id.as_str()).collect();
    assert_eq!(order, vec!["club-b", "club-a", "club-c"]);
    assert_eq!(stats.club_progress[0].percentage, 100.0);
    assert_eq!(stats.club_progress[1].club_name, "Club club-a");
}

#[test]
fn test_competition_without_participants_is_zero_safe() {
    let store = Arc::new(InMemoryStore::new());
    store.add_competition(competition("comp-1", GoalType::MemberCount, 10, 50));

    let stats = statistics(&store).competition_statistics("comp-1").unwrap();
    assert_eq!(stats.participating_clubs, 0);
    assert_eq!(stats.completion_rate, 0.0);
    assert_eq!(stats.average_progress, 0.0);
    assert!(stats.club_progress.is_empty());
}

#[test]
fn test_trends_cover_every_goal_type() {
    let store = Arc::new(InMemoryStore::new());
    store.add_competition(competition("comp-1", GoalType::EventCount, 5, 10));
    store.add_competition(competition("comp-2", GoalType::EventCount, 5, 10));
    store.put_progress(record("club-a", "comp-1", 5, true));
    store.put_progress(record("club-b", "comp-1", 1, false));
    store.put_progress(record("club-a", "comp-2", 5, true));

    let trends = statistics(&store).completion_trends_by_goal_type().unwrap();
    assert_eq!(trends.len(), GoalType::ALL.len());
    assert_eq!(trends[0].goal_type, GoalType::EventCount);
    assert_eq!(trends[0].competitions, 2);
    // (50 + 100) / 2
    assert!((trends[0].average_completion_rate - 75.0).abs() < 1e-9);

    for trend in &trends[1..] {
        assert_eq!(trend.competitions, 0);
        assert_eq!(trend.average_completion_rate, 0.0);
    }
}

#[test]
fn test_invalid_config_is_rejected() {
    let store = Arc::new(InMemoryStore::new());
    let result = StatisticsService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        &EngineConfig::default().with_top_clubs(0),
    );
    assert!(matches!(result, Err(Error::InvalidConfigValue(_))));
}
