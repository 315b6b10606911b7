use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uniclubs_core::errors::{DatabaseError, Error};
use uniclubs_core::missions::{MissionProgress, MissionProgressRepositoryTrait};
use uniclubs_core::Result;

use super::model::MissionProgressDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{clubs, mission_progress};

fn into_domain(rows: Vec<MissionProgressDB>) -> Vec<MissionProgress> {
    rows.into_iter().map(MissionProgress::from).collect()
}

pub struct MissionProgressRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MissionProgressRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        MissionProgressRepository { pool, writer }
    }
}

#[async_trait]
impl MissionProgressRepositoryTrait for MissionProgressRepository {
    fn get_progress(
        &self,
        club_id: &str,
        competition_id: &str,
    ) -> Result<Option<MissionProgress>> {
        let mut conn = get_connection(&self.pool)?;
        let row = mission_progress::table
            .find((club_id, competition_id))
            .select(MissionProgressDB::as_select())
            .first::<MissionProgressDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(MissionProgress::from))
    }

    fn list_progress_for_club(&self, club_id: &str) -> Result<Vec<MissionProgress>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = mission_progress::table
            .filter(mission_progress::club_id.eq(club_id))
            .select(MissionProgressDB::as_select())
            .order(mission_progress::competition_id.asc())
            .load::<MissionProgressDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(into_domain(rows))
    }

    fn list_progress_for_competition(&self, competition_id: &str) -> Result<Vec<MissionProgress>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = mission_progress::table
            .filter(mission_progress::competition_id.eq(competition_id))
            .select(MissionProgressDB::as_select())
            .order(mission_progress::club_id.asc())
            .load::<MissionProgressDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(into_domain(rows))
    }

    fn list_all_progress(&self) -> Result<Vec<MissionProgress>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = mission_progress::table
            .select(MissionProgressDB::as_select())
            .order((
                mission_progress::club_id.asc(),
                mission_progress::competition_id.asc(),
            ))
            .load::<MissionProgressDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(into_domain(rows))
    }

    async fn upsert_progress(&self, progress: MissionProgress) -> Result<MissionProgress> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<MissionProgress> {
                // The completion flag is only ever set by record_completion
                let row = diesel::insert_into(mission_progress::table)
                    .values(MissionProgressDB::from(progress))
                    .on_conflict((mission_progress::club_id, mission_progress::competition_id))
                    .do_update()
                    .set((
                        mission_progress::progress.eq(excluded(mission_progress::progress)),
                        mission_progress::last_updated
                            .eq(excluded(mission_progress::last_updated)),
                    ))
                    .returning(MissionProgressDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(MissionProgress::from(row))
            })
            .await
    }

    async fn record_completion(
        &self,
        progress: MissionProgress,
        reward_points: i64,
    ) -> Result<bool> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let pending = MissionProgressDB {
                    is_completed: false,
                    ..MissionProgressDB::from(progress.clone())
                };
                diesel::insert_into(mission_progress::table)
                    .values(&pending)
                    .on_conflict((mission_progress::club_id, mission_progress::competition_id))
                    .do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let flipped = diesel::update(
                    mission_progress::table
                        .filter(mission_progress::club_id.eq(&progress.club_id))
                        .filter(mission_progress::competition_id.eq(&progress.competition_id))
                        .filter(mission_progress::is_completed.eq(false)),
                )
                .set((
                    mission_progress::is_completed.eq(true),
                    mission_progress::progress.eq(progress.progress),
                    mission_progress::last_updated.eq(progress.last_updated),
                ))
                .execute(conn)
                .map_err(StorageError::from)?;

                if flipped == 0 {
                    debug!(
                        "Mission {} already completed by club {}",
                        progress.competition_id, progress.club_id
                    );
                    return Ok(false);
                }

                let credited = diesel::update(clubs::table.find(&progress.club_id))
                    .set(clubs::points.eq(clubs::points + reward_points))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if credited == 0 {
                    // Rolls back the completion flag as well
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "club {}",
                        progress.club_id
                    ))));
                }

                Ok(true)
            })
            .await
    }
}
