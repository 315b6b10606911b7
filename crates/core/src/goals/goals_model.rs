//! Goal model: what a competition measures and how a raw metric compares to it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_PERCENTAGE;
use crate::errors::{Error, Result};

pub const GOAL_TYPE_EVENT_COUNT: &str = "EVENT_COUNT";
pub const GOAL_TYPE_EVENT_LIKES: &str = "EVENT_LIKES";
pub const GOAL_TYPE_MEMBER_COUNT: &str = "MEMBER_COUNT";

/// The metric a competition tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    /// Number of events created by the club
    EventCount,
    /// Total likes on the club's events
    EventLikes,
    /// Number of club members
    MemberCount,
}

impl GoalType {
    pub const ALL: [GoalType; 3] = [
        GoalType::EventCount,
        GoalType::EventLikes,
        GoalType::MemberCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::EventCount => GOAL_TYPE_EVENT_COUNT,
            GoalType::EventLikes => GOAL_TYPE_EVENT_LIKES,
            GoalType::MemberCount => GOAL_TYPE_MEMBER_COUNT,
        }
    }
}

impl FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            GOAL_TYPE_EVENT_COUNT => Ok(GoalType::EventCount),
            GOAL_TYPE_EVENT_LIKES => Ok(GoalType::EventLikes),
            GOAL_TYPE_MEMBER_COUNT => Ok(GoalType::MemberCount),
            _ => Err(format!("Unknown goal type: {}", s)),
        }
    }
}

/// A competition's measurable objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub goal_type: GoalType,
    pub target: i64,
    pub reward_points: i64,
}

impl Goal {
    pub fn new(goal_type: GoalType, target: i64, reward_points: i64) -> Self {
        Self {
            goal_type,
            target,
            reward_points,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_target(self.target)?;
        if self.reward_points < 0 {
            return Err(Error::InvalidGoal(format!(
                "reward points must not be negative, got {}",
                self.reward_points
            )));
        }
        Ok(())
    }

    pub fn ratio(&self, current: i64) -> Result<f64> {
        progress_ratio(current, self.target)
    }

    pub fn is_met(&self, current: i64) -> bool {
        is_goal_met(current, self.target)
    }
}

fn validate_target(target: i64) -> Result<()> {
    if target <= 0 {
        return Err(Error::InvalidGoal(format!(
            "target must be positive, got {}",
            target
        )));
    }
    Ok(())
}

/// Fraction of the target reached, clamped to `[0, 1]`.
pub fn progress_ratio(current: i64, target: i64) -> Result<f64> {
    validate_target(target)?;
    let ratio = current.max(0) as f64 / target as f64;
    Ok(ratio.min(1.0))
}

pub fn is_goal_met(current: i64, target: i64) -> bool {
    current >= target
}

/// Percentage of the target reached, in `[0, 100]`. Invalid targets report 0.
pub fn progress_percentage(current: i64, target: i64) -> f64 {
    progress_ratio(current, target)
        .map(|ratio| ratio * MAX_PERCENTAGE)
        .unwrap_or(0.0)
}

/// `part / whole` as a percentage, 0 when `whole` is 0.
pub fn rate_percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * MAX_PERCENTAGE).min(MAX_PERCENTAGE)
}
