use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uniclubs_core::seasons::{Season, SeasonRepositoryTrait};
use uniclubs_core::Result;

use super::model::SeasonDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::seasons;

pub struct SeasonRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SeasonRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SeasonRepository { pool, writer }
    }

    pub async fn insert_season(&self, season: Season) -> Result<Season> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Season> {
                let row = diesel::insert_into(seasons::table)
                    .values(SeasonDB::from(season))
                    .returning(SeasonDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Season::from(row))
            })
            .await
    }
}

impl SeasonRepositoryTrait for SeasonRepository {
    fn list_seasons(&self) -> Result<Vec<Season>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = seasons::table
            .select(SeasonDB::as_select())
            .order((seasons::end_date.desc(), seasons::id.asc()))
            .load::<SeasonDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Season::from).collect())
    }

    fn get_season(&self, season_id: &str) -> Result<Season> {
        let mut conn = get_connection(&self.pool)?;
        let row = seasons::table
            .find(season_id)
            .select(SeasonDB::as_select())
            .first::<SeasonDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Season::from(row))
    }
}
