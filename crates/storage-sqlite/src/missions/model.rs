//! Database model for mission progress.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uniclubs_core::missions::MissionProgress;

/// One row per (club, competition) pair
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::mission_progress)]
#[diesel(primary_key(club_id, competition_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct MissionProgressDB {
    pub club_id: String,
    pub competition_id: String,
    pub progress: i64,
    pub is_completed: bool,
    pub last_updated: NaiveDateTime,
}

impl From<MissionProgressDB> for MissionProgress {
    fn from(db: MissionProgressDB) -> Self {
        Self {
            club_id: db.club_id,
            competition_id: db.competition_id,
            progress: db.progress,
            is_completed: db.is_completed,
            last_updated: db.last_updated,
        }
    }
}

impl From<MissionProgress> for MissionProgressDB {
    fn from(domain: MissionProgress) -> Self {
        Self {
            club_id: domain.club_id,
            competition_id: domain.competition_id,
            progress: domain.progress,
            is_completed: domain.is_completed,
            last_updated: domain.last_updated,
        }
    }
}
