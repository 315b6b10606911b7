//! Competition (mission) domain models.

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::goals::{Goal, GoalType};

pub const COMPETITION_STATUS_DRAFT: &str = "DRAFT";
pub const COMPETITION_STATUS_ACTIVATED: &str = "ACTIVATED";
pub const COMPETITION_STATUS_CLOSED: &str = "CLOSED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetitionStatus {
    #[default]
    Draft,
    Activated,
    /// Terminal; excluded from progress computation
    Closed,
}

impl CompetitionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionStatus::Draft => COMPETITION_STATUS_DRAFT,
            CompetitionStatus::Activated => COMPETITION_STATUS_ACTIVATED,
            CompetitionStatus::Closed => COMPETITION_STATUS_CLOSED,
        }
    }
}

impl FromStr for CompetitionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            COMPETITION_STATUS_DRAFT => Ok(CompetitionStatus::Draft),
            COMPETITION_STATUS_ACTIVATED => Ok(CompetitionStatus::Activated),
            COMPETITION_STATUS_CLOSED => Ok(CompetitionStatus::Closed),
            _ => Err(format!("Unknown competition status: {}", s)),
        }
    }
}

/// Domain model representing a competition, also called a mission.
///
/// A competition applies implicitly to every club.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub season_id: Option<String>,
    pub goal_type: GoalType,
    pub goal: i64,
    pub reward_points: i64,
    pub status: CompetitionStatus,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl Competition {
    pub fn goal(&self) -> Goal {
        Goal::new(self.goal_type, self.goal, self.reward_points)
    }

    /// True once the end date has passed. Competitions without an end date never expire.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.end_date.map(|end| end <= now).unwrap_or(false)
    }

    /// Activated and not yet expired.
    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        self.status == CompetitionStatus::Activated && !self.is_expired(now)
    }
}

/// Input model for creating a new competition
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewCompetition {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub season_id: Option<String>,
    pub goal_type: GoalType,
    pub goal: i64,
    pub reward_points: i64,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl NewCompetition {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.reward_points < 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "reward points must not be negative, got {}",
                self.reward_points
            ))));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "start date must not be after end date".to_string(),
                )));
            }
        }
        Goal::new(self.goal_type, self.goal, self.reward_points).validate()
    }
}
