//! Mission progress domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clubs::Club;
use crate::competitions::Competition;
use crate::goals::{is_goal_met, progress_percentage};

/// Progress of one club against one competition.
///
/// `progress` is the raw metric value and may exceed the goal. Once
/// `is_completed` is set it is never cleared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MissionProgress {
    pub club_id: String,
    pub competition_id: String,
    pub progress: i64,
    pub is_completed: bool,
    pub last_updated: NaiveDateTime,
}

/// Lifecycle of a [`MissionProgress`]: `NotStarted -> InProgress -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionState {
    NotStarted,
    InProgress,
    /// Terminal
    Completed,
}

impl MissionProgress {
    pub fn new(club_id: &str, competition_id: &str, now: NaiveDateTime) -> Self {
        Self {
            club_id: club_id.to_string(),
            competition_id: competition_id.to_string(),
            progress: 0,
            is_completed: false,
            last_updated: now,
        }
    }

    pub fn state(&self) -> MissionState {
        if self.is_completed {
            MissionState::Completed
        } else if self.progress > 0 {
            MissionState::InProgress
        } else {
            MissionState::NotStarted
        }
    }

    /// Progress against `goal` as a percentage clamped to `[0, 100]`.
    pub fn percentage(&self, goal: i64) -> f64 {
        progress_percentage(self.progress, goal)
    }
}

/// Outcome of comparing a fresh metric value with the stored record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProgressEvaluation {
    pub progress: MissionProgress,
    /// The stored record must be written
    pub changed: bool,
    /// First time the goal is reached
    pub completed_now: bool,
}

/// Evaluates `current` against the competition goal, starting from the stored record.
///
/// Completion is read from the *previous* record, so a completed mission never
/// reports a second transition. A pair without a stored record is only
/// persisted once its metric is positive; until then it is stamped with the
/// competition's start date so repeated passes yield the same record.
pub(crate) fn evaluate_progress(
    previous: Option<&MissionProgress>,
    club_id: &str,
    competition: &Competition,
    current: i64,
    now: NaiveDateTime,
) -> ProgressEvaluation {
    let current = current.max(0);
    let was_completed = previous.map(|p| p.is_completed).unwrap_or(false);
    let goal_met = is_goal_met(current, competition.goal);

    let changed = match previous {
        Some(p) => p.progress != current,
        None => current > 0,
    };

    let completed_now = !was_completed && goal_met;

    // A pair that was never persisted has no update time of its own
    let last_updated = match previous {
        Some(p) if !changed && !completed_now => p.last_updated,
        None if !changed && !completed_now => competition.start_date.unwrap_or_default(),
        _ => now,
    };

    ProgressEvaluation {
        progress: MissionProgress {
            club_id: club_id.to_string(),
            competition_id: competition.id.clone(),
            progress: current,
            is_completed: was_completed || goal_met,
            last_updated,
        },
        changed,
        completed_now,
    }
}

/// A progress record joined with its competition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MissionProgressDetail {
    pub competition: Competition,
    pub progress: MissionProgress,
    pub percentage: f64,
    pub state: MissionState,
}

impl MissionProgressDetail {
    pub fn new(competition: Competition, progress: MissionProgress) -> Self {
        let percentage = progress.percentage(competition.goal);
        let state = progress.state();
        Self {
            competition,
            progress,
            percentage,
            state,
        }
    }
}

/// A club with its mission records and derived totals. Built on demand, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClubWithMissionProgress {
    pub club: Club,
    pub missions: Vec<MissionProgressDetail>,
    pub completed_missions: usize,
    pub earned_points: i64,
    pub total_possible_points: i64,
    /// Average of the clamped per-mission percentages, 0 without missions
    pub overall_progress: f64,
}

impl ClubWithMissionProgress {
    pub fn new(club: Club, missions: Vec<MissionProgressDetail>) -> Self {
        let completed_missions = missions
            .iter()
            .filter(|m| m.progress.is_completed)
            .count();
        let earned_points = missions
            .iter()
            .filter(|m| m.progress.is_completed)
            .map(|m| m.competition.reward_points)
            .sum();
        let total_possible_points = missions.iter().map(|m| m.competition.reward_points).sum();
        let overall_progress = if missions.is_empty() {
            0.0
        } else {
            missions.iter().map(|m| m.percentage).sum::<f64>() / missions.len() as f64
        };

        Self {
            club,
            missions,
            completed_missions,
            earned_points,
            total_possible_points,
            overall_progress,
        }
    }
}

/// A (club, competition) pair skipped during a recompute pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkippedPair {
    pub club_id: String,
    pub competition_id: String,
    pub reason: String,
}

/// Bookkeeping of one recompute pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeSummary {
    pub started_at: NaiveDateTime,
    pub finished_at: NaiveDateTime,
    pub clubs: usize,
    pub competitions: usize,
    /// Pairs evaluated successfully
    pub evaluated: usize,
    /// Records written
    pub updated: usize,
    /// Completion transitions credited during this pass
    pub completed: usize,
    pub skipped: Vec<SkippedPair>,
}

impl RecomputeSummary {
    pub fn new(started_at: NaiveDateTime, clubs: usize, competitions: usize) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            clubs,
            competitions,
            evaluated: 0,
            updated: 0,
            completed: 0,
            skipped: Vec::new(),
        }
    }

    /// Some pairs were skipped; statistics built on this pass may be stale.
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Replaces `club_id`'s skipped pairs with those of a single-club pass.
    pub fn refresh_club(&mut self, club_id: &str, club_pass: &RecomputeSummary) {
        self.skipped.retain(|pair| pair.club_id != club_id);
        self.skipped.extend(
            club_pass
                .skipped
                .iter()
                .filter(|pair| pair.club_id == club_id)
                .cloned(),
        );
        self.finished_at = self.finished_at.max(club_pass.finished_at);
    }
}

/// Records produced by a recompute pass plus its summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeOutcome {
    pub progress: Vec<MissionProgress>,
    pub summary: RecomputeSummary,
}
