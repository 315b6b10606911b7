//! Database model for seasons.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uniclubs_core::seasons::Season;

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
#[diesel(table_name = crate::schema::seasons)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SeasonDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub end_date: NaiveDateTime,
}

impl From<SeasonDB> for Season {
    fn from(db: SeasonDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            end_date: db.end_date,
        }
    }
}

impl From<Season> for SeasonDB {
    fn from(domain: Season) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            description: domain.description,
            end_date: domain.end_date,
        }
    }
}
