//! In-memory repositories for tests.
//!
//! [`InMemoryStore`] implements every repository trait of the crate on top of
//! plain vectors, with knobs to make metric lookups fail or stall.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::clubs::{Club, ClubRepositoryTrait, ClubStatus};
use crate::competitions::{
    Competition, CompetitionRepositoryTrait, CompetitionStatus, NewCompetition,
};
use crate::errors::{DatabaseError, Error, Result};
use crate::goals::{ClubMetricsRepositoryTrait, GoalType};
use crate::missions::{MissionProgress, MissionProgressRepositoryTrait};
use crate::seasons::{Season, SeasonRepositoryTrait};

/// Fixed reference instant used by tests.
pub fn test_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

pub fn club(id: &str, points: i64) -> Club {
    Club {
        id: id.to_string(),
        name: format!("Club {}", id),
        points,
        status: ClubStatus::Active,
        president_id: None,
        created_at: test_now(),
    }
}

pub fn competition(id: &str, goal_type: GoalType, goal: i64, reward_points: i64) -> Competition {
    Competition {
        id: id.to_string(),
        name: format!("Competition {}", id),
        description: None,
        season_id: None,
        goal_type,
        goal,
        reward_points,
        status: CompetitionStatus::Activated,
        start_date: None,
        end_date: None,
    }
}

pub fn season(id: &str, end_date: NaiveDateTime) -> Season {
    Season {
        id: id.to_string(),
        name: format!("Season {}", id),
        description: None,
        end_date,
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    clubs: RwLock<Vec<Club>>,
    competitions: RwLock<Vec<Competition>>,
    seasons: RwLock<Vec<Season>>,
    progress: RwLock<BTreeMap<(String, String), MissionProgress>>,
    events: RwLock<HashMap<String, i64>>,
    likes: RwLock<HashMap<String, i64>>,
    members: RwLock<HashMap<String, i64>>,
    unavailable: RwLock<HashSet<String>>,
    metric_delay: RwLock<Option<Duration>>,
    writes: AtomicUsize,
    completions: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_club(&self, club: Club) {
        self.clubs.write().unwrap().push(club);
    }

    pub fn add_competition(&self, competition: Competition) {
        self.competitions.write().unwrap().push(competition);
    }

    pub fn add_season(&self, season: Season) {
        self.seasons.write().unwrap().push(season);
    }

    /// Stores a progress record directly, bypassing the engine.
    pub fn put_progress(&self, progress: MissionProgress) {
        self.progress.write().unwrap().insert(
            (progress.club_id.clone(), progress.competition_id.clone()),
            progress,
        );
    }

    pub fn set_events(&self, club_id: &str, count: i64) {
        self.events.write().unwrap().insert(club_id.to_string(), count);
    }

    pub fn set_likes(&self, club_id: &str, count: i64) {
        self.likes.write().unwrap().insert(club_id.to_string(), count);
    }

    pub fn set_members(&self, club_id: &str, count: i64) {
        self.members.write().unwrap().insert(club_id.to_string(), count);
    }

    /// Makes every metric lookup for this club fail.
    pub fn make_unavailable(&self, club_id: &str) {
        self.unavailable.write().unwrap().insert(club_id.to_string());
    }

    pub fn make_available(&self, club_id: &str) {
        self.unavailable.write().unwrap().remove(club_id);
    }

    /// Delays every metric lookup.
    pub fn set_metric_delay(&self, delay: Option<Duration>) {
        *self.metric_delay.write().unwrap() = delay;
    }

    pub fn club_points(&self, club_id: &str) -> i64 {
        self.clubs
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == club_id)
            .map(|c| c.points)
            .unwrap_or_default()
    }

    pub fn progress_of(&self, club_id: &str, competition_id: &str) -> Option<MissionProgress> {
        self.progress
            .read()
            .unwrap()
            .get(&(club_id.to_string(), competition_id.to_string()))
            .cloned()
    }

    pub fn stored_progress(&self) -> Vec<MissionProgress> {
        self.progress.read().unwrap().values().cloned().collect()
    }

    pub fn competition_status(&self, competition_id: &str) -> Option<CompetitionStatus> {
        self.competitions
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == competition_id)
            .map(|c| c.status)
    }

    /// Number of progress writes (upserts and completions).
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of completions that credited points.
    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    async fn metric(&self, source: &RwLock<HashMap<String, i64>>, club_id: &str) -> Result<i64> {
        let delay = *self.metric_delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.read().unwrap().contains(club_id) {
            return Err(Error::DataUnavailable(format!(
                "metrics for club {} unavailable",
                club_id
            )));
        }
        Ok(source.read().unwrap().get(club_id).copied().unwrap_or(0))
    }
}

fn not_found(what: &str, id: &str) -> Error {
    Error::Database(DatabaseError::NotFound(format!("{} {}", what, id)))
}

impl ClubRepositoryTrait for InMemoryStore {
    fn list_all_clubs(&self) -> Result<Vec<Club>> {
        Ok(self.clubs.read().unwrap().clone())
    }

    fn get_club(&self, club_id: &str) -> Result<Club> {
        self.clubs
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == club_id)
            .cloned()
            .ok_or_else(|| not_found("club", club_id))
    }
}

#[async_trait]
impl CompetitionRepositoryTrait for InMemoryStore {
    fn list_competitions(&self) -> Result<Vec<Competition>> {
        Ok(self.competitions.read().unwrap().clone())
    }

    fn list_activated_competitions(&self, now: NaiveDateTime) -> Result<Vec<Competition>> {
        Ok(self
            .competitions
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.is_open(now))
            .cloned()
            .collect())
    }

    fn list_competitions_by_season(&self, season_id: &str) -> Result<Vec<Competition>> {
        Ok(self
            .competitions
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.season_id.as_deref() == Some(season_id))
            .cloned()
            .collect())
    }

    fn get_competition(&self, competition_id: &str) -> Result<Competition> {
        self.competitions
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == competition_id)
            .cloned()
            .ok_or_else(|| not_found("competition", competition_id))
    }

    async fn insert_competition(&self, new_competition: NewCompetition) -> Result<Competition> {
        let mut competitions = self.competitions.write().unwrap();
        let id = new_competition
            .id
            .unwrap_or_else(|| format!("competition-{}", competitions.len() + 1));
        let competition = Competition {
            id,
            name: new_competition.name,
            description: new_competition.description,
            season_id: new_competition.season_id,
            goal_type: new_competition.goal_type,
            goal: new_competition.goal,
            reward_points: new_competition.reward_points,
            status: CompetitionStatus::Draft,
            start_date: new_competition.start_date,
            end_date: new_competition.end_date,
        };
        competitions.push(competition.clone());
        Ok(competition)
    }

    async fn update_status(
        &self,
        competition_id: &str,
        status: CompetitionStatus,
    ) -> Result<Competition> {
        let mut competitions = self.competitions.write().unwrap();
        let competition = competitions
            .iter_mut()
            .find(|c| c.id == competition_id)
            .ok_or_else(|| not_found("competition", competition_id))?;
        competition.status = status;
        Ok(competition.clone())
    }
}

impl SeasonRepositoryTrait for InMemoryStore {
    fn list_seasons(&self) -> Result<Vec<Season>> {
        let mut seasons = self.seasons.read().unwrap().clone();
        seasons.sort_by(|a, b| b.end_date.cmp(&a.end_date));
        Ok(seasons)
    }

    fn get_season(&self, season_id: &str) -> Result<Season> {
        self.seasons
            .read()
            .unwrap()
            .iter()
            .find(|s| s.id == season_id)
            .cloned()
            .ok_or_else(|| not_found("season", season_id))
    }
}

#[async_trait]
impl MissionProgressRepositoryTrait for InMemoryStore {
    fn get_progress(&self, club_id: &str, competition_id: &str) -> Result<Option<MissionProgress>> {
        Ok(self.progress_of(club_id, competition_id))
    }

    fn list_progress_for_club(&self, club_id: &str) -> Result<Vec<MissionProgress>> {
        Ok(self
            .progress
            .read()
            .unwrap()
            .values()
            .filter(|p| p.club_id == club_id)
            .cloned()
            .collect())
    }

    fn list_progress_for_competition(&self, competition_id: &str) -> Result<Vec<MissionProgress>> {
        Ok(self
            .progress
            .read()
            .unwrap()
            .values()
            .filter(|p| p.competition_id == competition_id)
            .cloned()
            .collect())
    }

    fn list_all_progress(&self) -> Result<Vec<MissionProgress>> {
        Ok(self.stored_progress())
    }

    async fn upsert_progress(&self, progress: MissionProgress) -> Result<MissionProgress> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.progress.write().unwrap();
        let key = (progress.club_id.clone(), progress.competition_id.clone());
        let stored = records
            .entry(key)
            .and_modify(|existing| {
                existing.progress = progress.progress;
                existing.last_updated = progress.last_updated;
            })
            .or_insert_with(|| MissionProgress {
                is_completed: false,
                ..progress.clone()
            });
        Ok(stored.clone())
    }

    async fn record_completion(
        &self,
        progress: MissionProgress,
        reward_points: i64,
    ) -> Result<bool> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.progress.write().unwrap();
        let mut clubs = self.clubs.write().unwrap();
        let key = (progress.club_id.clone(), progress.competition_id.clone());

        if records.get(&key).map(|p| p.is_completed).unwrap_or(false) {
            return Ok(false);
        }
        let club = clubs
            .iter_mut()
            .find(|c| c.id == progress.club_id)
            .ok_or_else(|| not_found("club", &progress.club_id))?;
        club.points += reward_points;
        records.insert(
            key,
            MissionProgress {
                is_completed: true,
                ..progress
            },
        );
        self.completions.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

#[async_trait]
impl ClubMetricsRepositoryTrait for InMemoryStore {
    async fn count_events_created_by(&self, club_id: &str) -> Result<i64> {
        self.metric(&self.events, club_id).await
    }

    async fn count_likes_on_events_of(&self, club_id: &str) -> Result<i64> {
        self.metric(&self.likes, club_id).await
    }

    async fn count_members_of(&self, club_id: &str) -> Result<i64> {
        self.metric(&self.members, club_id).await
    }
}
