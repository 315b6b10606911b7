//! Database models for clubs.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uniclubs_core::clubs::{Club, ClubStatus};

use crate::errors::StorageError;

/// Database model for clubs
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
#[diesel(table_name = crate::schema::clubs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ClubDB {
    pub id: String,
    pub name: String,
    pub points: i64,
    pub status: String,
    pub president_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ClubDB> for Club {
    type Error = StorageError;

    fn try_from(db: ClubDB) -> Result<Self, Self::Error> {
        Ok(Self {
            status: ClubStatus::from_str(&db.status).map_err(StorageError::InvalidValue)?,
            id: db.id,
            name: db.name,
            points: db.points,
            president_id: db.president_id,
            created_at: db.created_at,
        })
    }
}

impl From<Club> for ClubDB {
    fn from(domain: Club) -> Self {
        Self {
            status: domain.status.as_str().to_string(),
            id: domain.id,
            name: domain.name,
            points: domain.points,
            president_id: domain.president_id,
            created_at: domain.created_at,
        }
    }
}
