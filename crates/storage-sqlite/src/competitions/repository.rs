use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uniclubs_core::competitions::{
    Competition, CompetitionRepositoryTrait, CompetitionStatus, NewCompetition,
};
use uniclubs_core::Result;
use uuid::Uuid;

use super::model::{CompetitionDB, NewCompetitionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::competitions;

pub struct CompetitionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

fn into_domain(rows: Vec<CompetitionDB>) -> Result<Vec<Competition>> {
    rows.into_iter()
        .map(|row| Competition::try_from(row).map_err(Into::into))
        .collect()
}

impl CompetitionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        CompetitionRepository { pool, writer }
    }
}

#[async_trait]
impl CompetitionRepositoryTrait for CompetitionRepository {
    fn list_competitions(&self) -> Result<Vec<Competition>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = competitions::table
            .select(CompetitionDB::as_select())
            .order(competitions::id.asc())
            .load::<CompetitionDB>(&mut conn)
            .map_err(StorageError::from)?;
        into_domain(rows)
    }

    fn list_activated_competitions(&self, now: NaiveDateTime) -> Result<Vec<Competition>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = competitions::table
            .filter(competitions::status.eq(CompetitionStatus::Activated.as_str()))
            .filter(
                competitions::end_date
                    .is_null()
                    .or(competitions::end_date.gt(now)),
            )
            .select(CompetitionDB::as_select())
            .order(competitions::id.asc())
            .load::<CompetitionDB>(&mut conn)
            .map_err(StorageError::from)?;
        into_domain(rows)
    }

    fn list_competitions_by_season(&self, season_id: &str) -> Result<Vec<Competition>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = competitions::table
            .filter(competitions::season_id.eq(season_id))
            .select(CompetitionDB::as_select())
            .order(competitions::id.asc())
            .load::<CompetitionDB>(&mut conn)
            .map_err(StorageError::from)?;
        into_domain(rows)
    }

    fn get_competition(&self, competition_id: &str) -> Result<Competition> {
        let mut conn = get_connection(&self.pool)?;
        let row = competitions::table
            .find(competition_id)
            .select(CompetitionDB::as_select())
            .first::<CompetitionDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Competition::try_from(row)?)
    }

    async fn insert_competition(&self, new_competition: NewCompetition) -> Result<Competition> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Competition> {
                let id = new_competition
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let row = diesel::insert_into(competitions::table)
                    .values(NewCompetitionDB::draft(new_competition, id))
                    .returning(CompetitionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Competition::try_from(row)?)
            })
            .await
    }

    async fn update_status(
        &self,
        competition_id: &str,
        status: CompetitionStatus,
    ) -> Result<Competition> {
        let id_owned = competition_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Competition> {
                let row = diesel::update(competitions::table.find(&id_owned))
                    .set(competitions::status.eq(status.as_str()))
                    .returning(CompetitionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Competition::try_from(row)?)
            })
            .await
    }
}
