use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use log::debug;

use super::statistics_model::{
    ClubProgressEntry, ClubStatistics, CompetitionStatistics, GoalTypeTrend, LeaderboardEntry,
    SeasonPoints, SeasonStatistics,
};
use super::statistics_traits::StatisticsServiceTrait;
use crate::clubs::{Club, ClubRepositoryTrait};
use crate::competitions::{Competition, CompetitionRepositoryTrait};
use crate::config::EngineConfig;
use crate::errors::{Error, Result};
use crate::goals::{rate_percentage, GoalType};
use crate::missions::{Clock, MissionProgress, MissionProgressRepositoryTrait};
use crate::seasons::SeasonRepositoryTrait;

/// Ordering shared by every ranking: points desc, then club ID asc.
fn by_points_then_id(a: &(String, String, i64), b: &(String, String, i64)) -> Ordering {
    b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0))
}

fn rank(mut rows: Vec<(String, String, i64)>) -> Vec<LeaderboardEntry> {
    rows.sort_by(by_points_then_id);
    rows.into_iter()
        .enumerate()
        .map(|(index, (club_id, club_name, points))| LeaderboardEntry {
            rank: index + 1,
            club_id,
            club_name,
            points,
        })
        .collect()
}

fn empty_histogram() -> BTreeMap<GoalType, usize> {
    GoalType::ALL.iter().map(|goal_type| (*goal_type, 0)).collect()
}

/// Completed and participating counts of one competition's records.
fn completion_counts(records: &[MissionProgress]) -> (usize, usize) {
    let completed = records.iter().filter(|p| p.is_completed).count();
    (completed, records.len())
}

/// Read-only statistics over the mission engine's data.
pub struct StatisticsService {
    club_repo: Arc<dyn ClubRepositoryTrait>,
    competition_repo: Arc<dyn CompetitionRepositoryTrait>,
    season_repo: Arc<dyn SeasonRepositoryTrait>,
    progress_repo: Arc<dyn MissionProgressRepositoryTrait>,
    season_history: usize,
    top_clubs: usize,
    clock: Clock,
}

impl StatisticsService {
    pub fn new(
        club_repo: Arc<dyn ClubRepositoryTrait>,
        competition_repo: Arc<dyn CompetitionRepositoryTrait>,
        season_repo: Arc<dyn SeasonRepositoryTrait>,
        progress_repo: Arc<dyn MissionProgressRepositoryTrait>,
        config: &EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            club_repo,
            competition_repo,
            season_repo,
            progress_repo,
            season_history: config.season_history,
            top_clubs: config.top_clubs,
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

    fn ranked_clubs(&self) -> Result<Vec<LeaderboardEntry>> {
        let rows = self
            .club_repo
            .list_all_clubs()?
            .into_iter()
            .map(|club| (club.id, club.name, club.points))
            .collect();
        Ok(rank(rows))
    }

    fn competitions_by_id(&self) -> Result<HashMap<String, Competition>> {
        Ok(self
            .competition_repo
            .list_competitions()?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect())
    }

    fn club_season_points(
        &self,
        records: &[MissionProgress],
        competitions: &HashMap<String, Competition>,
    ) -> Result<Vec<SeasonPoints>> {
        let mut earned_by_season: HashMap<&str, i64> = HashMap::new();
        for record in records.iter().filter(|p| p.is_completed) {
            if let Some(competition) = competitions.get(&record.competition_id) {
                if let Some(season_id) = competition.season_id.as_deref() {
                    *earned_by_season.entry(season_id).or_default() += competition.reward_points;
                }
            }
        }

        let mut series: Vec<SeasonPoints> = self
            .season_repo
            .list_seasons()?
            .into_iter()
            .take(self.season_history)
            .map(|season| SeasonPoints {
                points: earned_by_season
                    .get(season.id.as_str())
                    .copied()
                    .unwrap_or(0),
                season_id: Some(season.id),
                season_name: Some(season.name),
            })
            .collect();

        series.resize(
            self.season_history,
            SeasonPoints {
                season_id: None,
                season_name: None,
                points: 0,
            },
        );
        Ok(series)
    }
}

impl StatisticsServiceTrait for StatisticsService {
    fn club_statistics(&self, club_id: &str) -> Result<ClubStatistics> {
        let club: Club = self.club_repo.get_club(club_id)?;
        let records = self.progress_repo.list_progress_for_club(club_id)?;
        let competitions = self.competitions_by_id()?;

        let mut completed_by_goal_type = empty_histogram();
        for record in records.iter().filter(|p| p.is_completed) {
            if let Some(competition) = competitions.get(&record.competition_id) {
                *completed_by_goal_type
                    .entry(competition.goal_type)
                    .or_default() += 1;
            }
        }

        let (completed_missions, total_missions) = completion_counts(&records);
        let rank = self
            .ranked_clubs()?
            .into_iter()
            .find(|entry| entry.club_id == club.id)
            .map(|entry| entry.rank)
            .ok_or_else(|| {
                Error::Unexpected(format!("club {} missing from leaderboard", club.id))
            })?;

        Ok(ClubStatistics {
            season_points: self.club_season_points(&records, &competitions)?,
            club_id: club.id,
            club_name: club.name,
            total_points: club.points,
            completed_missions,
            total_missions,
            completion_rate: rate_percentage(completed_missions, total_missions),
            rank,
            completed_by_goal_type,
        })
    }

    fn season_statistics(&self, season_id: &str) -> Result<SeasonStatistics> {
        let season = self.season_repo.get_season(season_id)?;
        let now = self.now();
        let competitions = self.competition_repo.list_competitions_by_season(season_id)?;

        let mut competitions_by_goal_type = empty_histogram();
        let mut active_competitions = 0;
        let mut completed_competitions = 0;
        let mut total_points_distributed = 0;
        let mut earned_by_club: HashMap<String, i64> = HashMap::new();

        for competition in &competitions {
            *competitions_by_goal_type
                .entry(competition.goal_type)
                .or_default() += 1;
            if competition.is_open(now) {
                active_competitions += 1;
            }

            let records = self
                .progress_repo
                .list_progress_for_competition(&competition.id)?;
            let completers: Vec<&MissionProgress> =
                records.iter().filter(|p| p.is_completed).collect();
            if !completers.is_empty() {
                completed_competitions += 1;
            }
            for record in completers {
                total_points_distributed += competition.reward_points;
                *earned_by_club.entry(record.club_id.clone()).or_default() +=
                    competition.reward_points;
            }
        }

        let club_names: HashMap<String, String> = self
            .club_repo
            .list_all_clubs()?
            .into_iter()
            .map(|club| (club.id, club.name))
            .collect();
        let rows = earned_by_club
            .into_iter()
            .map(|(club_id, points)| {
                let club_name = club_names.get(&club_id).cloned().unwrap_or_default();
                (club_id, club_name, points)
            })
            .collect();
        let mut top_clubs = rank(rows);
        top_clubs.truncate(self.top_clubs);

        debug!(
            "Season {}: {} competitions, {} completed, {} points distributed",
            season.id,
            competitions.len(),
            completed_competitions,
            total_points_distributed
        );

        Ok(SeasonStatistics {
            is_active: season.is_active(now),
            season_id: season.id,
            season_name: season.name,
            total_competitions: competitions.len(),
            active_competitions,
            completed_competitions,
            total_points_distributed,
            top_clubs,
            competitions_by_goal_type,
        })
    }

    fn competition_statistics(&self, competition_id: &str) -> Result<CompetitionStatistics> {
        let competition = self.competition_repo.get_competition(competition_id)?;
        let records = self
            .progress_repo
            .list_progress_for_competition(competition_id)?;
        let club_names: HashMap<String, String> = self
            .club_repo
            .list_all_clubs()?
            .into_iter()
            .map(|club| (club.id, club.name))
            .collect();

        let (completed_by, participating_clubs) = completion_counts(&records);

        let mut club_progress: Vec<ClubProgressEntry> = records
            .iter()
            .map(|record| ClubProgressEntry {
                club_id: record.club_id.clone(),
                club_name: club_names.get(&record.club_id).cloned().unwrap_or_default(),
                progress: record.progress,
                percentage: record.percentage(competition.goal),
                is_completed: record.is_completed,
            })
            .collect();
        club_progress.sort_by(|a, b| {
            b.progress
                .cmp(&a.progress)
                .then_with(|| a.club_id.cmp(&b.club_id))
        });

        let average_progress = if club_progress.is_empty() {
            0.0
        } else {
            club_progress.iter().map(|e| e.percentage).sum::<f64>() / club_progress.len() as f64
        };

        Ok(CompetitionStatistics {
            competition_id: competition.id,
            competition_name: competition.name,
            goal_type: competition.goal_type,
            goal: competition.goal,
            participating_clubs,
            completed_by,
            average_progress,
            completion_rate: rate_percentage(completed_by, participating_clubs),
            club_progress,
        })
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let mut entries = self.ranked_clubs()?;
        entries.truncate(limit);
        Ok(entries)
    }

    fn completion_trends_by_goal_type(&self) -> Result<Vec<GoalTypeTrend>> {
        let competitions = self.competition_repo.list_competitions()?;

        let mut records_by_competition: HashMap<String, Vec<MissionProgress>> = HashMap::new();
        for record in self.progress_repo.list_all_progress()? {
            records_by_competition
                .entry(record.competition_id.clone())
                .or_default()
                .push(record);
        }

        let mut rates: HashMap<GoalType, Vec<f64>> = HashMap::new();
        for competition in competitions {
            let records = records_by_competition
                .get(&competition.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let (completed, participating) = completion_counts(records);
            rates
                .entry(competition.goal_type)
                .or_default()
                .push(rate_percentage(completed, participating));
        }

        Ok(GoalType::ALL
            .iter()
            .map(|goal_type| {
                let type_rates = rates.get(goal_type).map(Vec::as_slice).unwrap_or(&[]);
                let average_completion_rate = if type_rates.is_empty() {
                    0.0
                } else {
                    type_rates.iter().sum::<f64>() / type_rates.len() as f64
                };
                GoalTypeTrend {
                    goal_type: *goal_type,
                    competitions: type_rates.len(),
                    average_completion_rate,
                }
            })
            .collect())
    }
}
