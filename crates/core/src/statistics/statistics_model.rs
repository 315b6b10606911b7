//! Statistics view models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::goals::GoalType;

/// One row of a ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub club_id: String,
    pub club_name: String,
    pub points: i64,
}

/// Points a club earned in one season. Padding entries have no season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonPoints {
    pub season_id: Option<String>,
    pub season_name: Option<String>,
    pub points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClubStatistics {
    pub club_id: String,
    pub club_name: String,
    pub total_points: i64,
    pub completed_missions: usize,
    pub total_missions: usize,
    pub completion_rate: f64,
    pub rank: usize,
    pub completed_by_goal_type: BTreeMap<GoalType, usize>,
    /// Most recent season first, always `season_history` entries long
    pub season_points: Vec<SeasonPoints>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStatistics {
    pub season_id: String,
    pub season_name: String,
    pub is_active: bool,
    pub total_competitions: usize,
    /// Activated and not past their end date
    pub active_competitions: usize,
    /// Completed by at least one club
    pub completed_competitions: usize,
    /// Sum of rewards over every completed progress record in the season
    pub total_points_distributed: i64,
    /// Ranked by points earned in this season
    pub top_clubs: Vec<LeaderboardEntry>,
    pub competitions_by_goal_type: BTreeMap<GoalType, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClubProgressEntry {
    pub club_id: String,
    pub club_name: String,
    pub progress: i64,
    pub percentage: f64,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionStatistics {
    pub competition_id: String,
    pub competition_name: String,
    pub goal_type: GoalType,
    pub goal: i64,
    /// Clubs with a progress record
    pub participating_clubs: usize,
    pub completed_by: usize,
    pub average_progress: f64,
    pub completion_rate: f64,
    /// Sorted by progress, highest first
    pub club_progress: Vec<ClubProgressEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalTypeTrend {
    pub goal_type: GoalType,
    pub competitions: usize,
    /// Mean of the per-competition completion rates, 0 without competitions
    pub average_completion_rate: f64,
}
