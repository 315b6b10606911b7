//! Database models for competitions.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uniclubs_core::competitions::{Competition, CompetitionStatus, NewCompetition};
use uniclubs_core::goals::GoalType;

use crate::errors::StorageError;

/// Database model for competitions
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::competitions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CompetitionDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub season_id: Option<String>,
    pub goal_type: String,
    pub goal: i64,
    pub reward_points: i64,
    pub status: String,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

/// Database model for creating a new competition
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::competitions)]
#[serde(rename_all = "camelCase")]
pub struct NewCompetitionDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub season_id: Option<String>,
    pub goal_type: String,
    pub goal: i64,
    pub reward_points: i64,
    pub status: String,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl TryFrom<CompetitionDB> for Competition {
    type Error = StorageError;

    fn try_from(db: CompetitionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            goal_type: GoalType::from_str(&db.goal_type).map_err(StorageError::InvalidValue)?,
            status: CompetitionStatus::from_str(&db.status).map_err(StorageError::InvalidValue)?,
            id: db.id,
            name: db.name,
            description: db.description,
            season_id: db.season_id,
            goal: db.goal,
            reward_points: db.reward_points,
            start_date: db.start_date,
            end_date: db.end_date,
        })
    }
}

impl NewCompetitionDB {
    /// New competitions always start as drafts.
    pub fn draft(domain: NewCompetition, id: String) -> Self {
        Self {
            id,
            name: domain.name,
            description: domain.description,
            season_id: domain.season_id,
            goal_type: domain.goal_type.as_str().to_string(),
            goal: domain.goal,
            reward_points: domain.reward_points,
            status: CompetitionStatus::Draft.as_str().to_string(),
            start_date: domain.start_date,
            end_date: domain.end_date,
        }
    }
}
