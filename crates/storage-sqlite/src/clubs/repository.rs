use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uniclubs_core::clubs::{Club, ClubRepositoryTrait};
use uniclubs_core::Result;

use super::model::ClubDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::clubs;

pub struct ClubRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ClubRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ClubRepository { pool, writer }
    }

    /// Stores a club as registered by the platform.
    pub async fn insert_club(&self, club: Club) -> Result<Club> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Club> {
                let row = diesel::insert_into(clubs::table)
                    .values(ClubDB::from(club))
                    .returning(ClubDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Club::try_from(row)?)
            })
            .await
    }
}

impl ClubRepositoryTrait for ClubRepository {
    fn list_all_clubs(&self) -> Result<Vec<Club>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = clubs::table
            .select(ClubDB::as_select())
            .order(clubs::id.asc())
            .load::<ClubDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| Club::try_from(row).map_err(Into::into))
            .collect()
    }

    fn get_club(&self, club_id: &str) -> Result<Club> {
        let mut conn = get_connection(&self.pool)?;
        let row = clubs::table
            .find(club_id)
            .select(ClubDB::as_select())
            .first::<ClubDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Club::try_from(row)?)
    }
}
