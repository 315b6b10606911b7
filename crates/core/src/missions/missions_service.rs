use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use dashmap::DashMap;
use log::{debug, error, info, warn};
use tokio::sync::Mutex;

use super::missions_model::{
    evaluate_progress, ClubWithMissionProgress, MissionProgress, MissionProgressDetail,
    RecomputeOutcome, RecomputeSummary, SkippedPair,
};
use super::missions_traits::{MissionProgressRepositoryTrait, MissionServiceTrait};
use crate::clubs::{Club, ClubRepositoryTrait};
use crate::competitions::{Competition, CompetitionRepositoryTrait, CompetitionStatus};
use crate::config::EngineConfig;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::{ClubMetricsRepositoryTrait, GoalType};

/// Source of the current time, injectable for tests.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Per-pass cache of metric lookups, keyed by goal type.
type MetricCache = HashMap<GoalType, std::result::Result<i64, String>>;

/// Result of recomputing one (club, competition) pair.
struct PairOutcome {
    progress: MissionProgress,
    written: bool,
    credited: bool,
}

/// The mission progress engine.
///
/// Point awards for a club are serialized through a per-club lock, so a
/// manual refresh racing the scheduler cannot credit the same mission twice.
/// The repository's `record_completion` is the second guard.
pub struct MissionProgressService {
    club_repo: Arc<dyn ClubRepositoryTrait>,
    competition_repo: Arc<dyn CompetitionRepositoryTrait>,
    progress_repo: Arc<dyn MissionProgressRepositoryTrait>,
    metrics: Arc<dyn ClubMetricsRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    lookup_timeout: Duration,
    club_locks: DashMap<String, Arc<Mutex<()>>>,
    last_summary: RwLock<Option<RecomputeSummary>>,
    clock: Clock,
}

impl MissionProgressService {
    pub fn new(
        club_repo: Arc<dyn ClubRepositoryTrait>,
        competition_repo: Arc<dyn CompetitionRepositoryTrait>,
        progress_repo: Arc<dyn MissionProgressRepositoryTrait>,
        metrics: Arc<dyn ClubMetricsRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        config: &EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            club_repo,
            competition_repo,
            progress_repo,
            metrics,
            event_sink,
            lookup_timeout: config.lookup_timeout,
            club_locks: DashMap::new(),
            last_summary: RwLock::new(None),
            clock: Arc::new(|| Utc::now().naive_utc()),
        })
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    fn club_lock(&self, club_id: &str) -> Arc<Mutex<()>> {
        self.club_locks
            .entry(club_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn lookup_metric(
        &self,
        goal_type: GoalType,
        club_id: &str,
        cache: &mut MetricCache,
    ) -> Result<i64> {
        if let Some(cached) = cache.get(&goal_type) {
            return cached.clone().map_err(Error::DataUnavailable);
        }

        let lookup = goal_type.current_value(self.metrics.as_ref(), club_id);
        let result = match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(Error::DataUnavailable(reason))) => Err(reason),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "{} lookup for club {} timed out after {:?}",
                goal_type.as_str(),
                club_id,
                self.lookup_timeout
            )),
        };
        cache.insert(goal_type, result.clone());
        result.map_err(Error::DataUnavailable)
    }

    async fn recompute_pair(
        &self,
        club: &Club,
        competition: &Competition,
        cache: &mut MetricCache,
        now: NaiveDateTime,
    ) -> Result<PairOutcome> {
        // Goals are validated on creation; re-check instead of dividing by zero
        competition.goal().validate()?;

        let current = self
            .lookup_metric(competition.goal_type, &club.id, cache)
            .await?;
        let previous = self.progress_repo.get_progress(&club.id, &competition.id)?;
        let evaluation = evaluate_progress(previous.as_ref(), &club.id, competition, current, now);

        if evaluation.completed_now {
            let credited = self
                .progress_repo
                .record_completion(evaluation.progress.clone(), competition.reward_points)
                .await?;
            if credited {
                info!(
                    "Club {} completed competition {} ({} {} / {}), awarded {} points",
                    club.id,
                    competition.id,
                    evaluation.progress.progress,
                    competition.goal_type.as_str(),
                    competition.goal,
                    competition.reward_points
                );
                self.publish_completion(club, competition, &evaluation.progress, now);
            } else {
                debug!(
                    "Competition {} already completed by club {}, nothing credited",
                    competition.id, club.id
                );
            }
            return Ok(PairOutcome {
                progress: evaluation.progress,
                written: true,
                credited,
            });
        }

        if evaluation.changed {
            self.progress_repo
                .upsert_progress(evaluation.progress.clone())
                .await?;
        }

        Ok(PairOutcome {
            progress: evaluation.progress,
            written: evaluation.changed,
            credited: false,
        })
    }

    fn publish_completion(
        &self,
        club: &Club,
        competition: &Competition,
        progress: &MissionProgress,
        now: NaiveDateTime,
    ) {
        let club_snapshot = match self.club_repo.get_club(&club.id) {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!("Could not reload club {} after award: {}", club.id, e);
                Club {
                    points: club.points + competition.reward_points,
                    ..club.clone()
                }
            }
        };
        self.event_sink.emit(DomainEvent::mission_completed(
            club_snapshot,
            competition.clone(),
            progress.clone(),
            now,
        ));
    }

    async fn recompute_clubs(&self, clubs: Vec<Club>) -> Result<RecomputeOutcome> {
        let now = self.now();
        let competitions = self.competition_repo.list_activated_competitions(now)?;
        let mut summary = RecomputeSummary::new(now, clubs.len(), competitions.len());
        let mut progress = Vec::with_capacity(clubs.len() * competitions.len());

        debug!(
            "Recomputing {} club(s) against {} activated competition(s)",
            clubs.len(),
            competitions.len()
        );

        for club in &clubs {
            let lock = self.club_lock(&club.id);
            let _guard = lock.lock().await;
            let mut cache = MetricCache::new();

            for competition in &competitions {
                match self.recompute_pair(club, competition, &mut cache, now).await {
                    Ok(outcome) => {
                        summary.evaluated += 1;
                        if outcome.written {
                            summary.updated += 1;
                        }
                        if outcome.credited {
                            summary.completed += 1;
                        }
                        progress.push(outcome.progress);
                    }
                    Err(e) => {
                        if e.is_pair_local() {
                            warn!(
                                "Skipping club {} / competition {}: {}",
                                club.id, competition.id, e
                            );
                        } else {
                            error!(
                                "Failed to recompute club {} / competition {}: {}",
                                club.id, competition.id, e
                            );
                        }
                        summary.skipped.push(SkippedPair {
                            club_id: club.id.clone(),
                            competition_id: competition.id.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        summary.finished_at = self.now();
        if summary.is_partial() {
            warn!(
                "Recompute finished with {} skipped pair(s) out of {}",
                summary.skipped.len(),
                clubs.len() * competitions.len()
            );
        } else {
            debug!(
                "Recompute finished: {} evaluated, {} updated, {} completed",
                summary.evaluated, summary.updated, summary.completed
            );
        }

        Ok(RecomputeOutcome { progress, summary })
    }

    fn competitions_by_id(&self) -> Result<HashMap<String, Competition>> {
        Ok(self
            .competition_repo
            .list_competitions()?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect())
    }

    fn build_club_progress(
        club: Club,
        records: Vec<MissionProgress>,
        competitions: &HashMap<String, Competition>,
    ) -> ClubWithMissionProgress {
        let missions = records
            .into_iter()
            .filter_map(|record| match competitions.get(&record.competition_id) {
                Some(competition) => Some(MissionProgressDetail::new(competition.clone(), record)),
                None => {
                    warn!(
                        "Progress of club {} references unknown competition {}",
                        record.club_id, record.competition_id
                    );
                    None
                }
            })
            .collect();
        ClubWithMissionProgress::new(club, missions)
    }
}

#[async_trait]
impl MissionServiceTrait for MissionProgressService {
    async fn recompute_all(&self) -> Result<RecomputeOutcome> {
        let clubs = self.club_repo.list_all_clubs()?;
        let outcome = self.recompute_clubs(clubs).await?;
        *self
            .last_summary
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(outcome.summary.clone());
        Ok(outcome)
    }

    async fn recompute_club(&self, club_id: &str) -> Result<RecomputeOutcome> {
        let club = self.club_repo.get_club(club_id)?;
        let outcome = self.recompute_clubs(vec![club]).await?;
        // Only this club's skips are refreshed; the rest of the last full pass stands
        if let Some(last) = self
            .last_summary
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_mut()
        {
            last.refresh_club(club_id, &outcome.summary);
        }
        Ok(outcome)
    }

    async fn check_expired_missions(&self) -> Result<Vec<String>> {
        let now = self.now();
        let expired: Vec<Competition> = self
            .competition_repo
            .list_competitions()?
            .into_iter()
            .filter(|c| c.status == CompetitionStatus::Activated && c.is_expired(now))
            .collect();

        let mut closed = Vec::with_capacity(expired.len());
        for competition in expired {
            match self
                .competition_repo
                .update_status(&competition.id, CompetitionStatus::Closed)
                .await
            {
                Ok(_) => closed.push(competition.id),
                Err(e) => warn!("Failed to close expired competition {}: {}", competition.id, e),
            }
        }

        if !closed.is_empty() {
            info!("Closed {} expired competition(s)", closed.len());
            self.event_sink
                .emit(DomainEvent::competitions_closed(closed.clone()));
        }
        Ok(closed)
    }

    fn get_club_progress(&self, club_id: &str) -> Result<ClubWithMissionProgress> {
        let club = self.club_repo.get_club(club_id)?;
        let records = self.progress_repo.list_progress_for_club(club_id)?;
        let competitions = self.competitions_by_id()?;
        Ok(Self::build_club_progress(club, records, &competitions))
    }

    fn get_clubs_with_progress(&self) -> Result<Vec<ClubWithMissionProgress>> {
        let clubs = self.club_repo.list_all_clubs()?;
        let competitions = self.competitions_by_id()?;

        let mut records_by_club: HashMap<String, Vec<MissionProgress>> = HashMap::new();
        for record in self.progress_repo.list_all_progress()? {
            records_by_club
                .entry(record.club_id.clone())
                .or_default()
                .push(record);
        }

        Ok(clubs
            .into_iter()
            .map(|club| {
                let records = records_by_club.remove(&club.id).unwrap_or_default();
                Self::build_club_progress(club, records, &competitions)
            })
            .collect())
    }

    fn last_summary(&self) -> Option<RecomputeSummary> {
        self.last_summary
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
