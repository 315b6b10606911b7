//! Club domain models.

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const CLUB_STATUS_ACTIVE: &str = "ACTIVE";
pub const CLUB_STATUS_PENDING: &str = "PENDING";
pub const CLUB_STATUS_REJECTED: &str = "REJECTED";
pub const CLUB_STATUS_INACTIVE: &str = "INACTIVE";

/// Approval state of a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClubStatus {
    Active,
    /// Waiting for the approval workflow
    #[default]
    Pending,
    Rejected,
    Inactive,
}

impl ClubStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClubStatus::Active => CLUB_STATUS_ACTIVE,
            ClubStatus::Pending => CLUB_STATUS_PENDING,
            ClubStatus::Rejected => CLUB_STATUS_REJECTED,
            ClubStatus::Inactive => CLUB_STATUS_INACTIVE,
        }
    }
}

impl FromStr for ClubStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            CLUB_STATUS_ACTIVE => Ok(ClubStatus::Active),
            CLUB_STATUS_PENDING => Ok(ClubStatus::Pending),
            CLUB_STATUS_REJECTED => Ok(ClubStatus::Rejected),
            CLUB_STATUS_INACTIVE => Ok(ClubStatus::Inactive),
            _ => Err(format!("Unknown club status: {}", s)),
        }
    }
}

/// Domain model representing a club.
///
/// `points` only grows, and only through completed missions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub name: String,
    pub points: i64,
    pub status: ClubStatus,
    pub president_id: Option<String>,
    pub created_at: NaiveDateTime,
}
