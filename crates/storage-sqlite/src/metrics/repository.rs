use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uniclubs_core::goals::ClubMetricsRepositoryTrait;
use uniclubs_core::{Error, Result};

use crate::db::{get_connection, DbConnection, DbPool};
use crate::errors::StorageError;
use crate::schema::{club_members, event_likes, events};

/// Read-only counters backing the goal types.
///
/// Queries run on the blocking pool so the engine's lookup timeout can
/// abandon a slow one. Every failure is reported as `DataUnavailable`.
pub struct ClubMetricsRepository {
    pool: Arc<DbPool>,
}

impl ClubMetricsRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ClubMetricsRepository { pool }
    }

    async fn count<F>(&self, what: &'static str, club_id: &str, query: F) -> Result<i64>
    where
        F: FnOnce(&mut DbConnection, &str) -> std::result::Result<i64, StorageError>
            + Send
            + 'static,
    {
        let pool = self.pool.clone();
        let owned_id = club_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<i64> {
            let mut conn = get_connection(&pool)?;
            Ok(query(&mut conn, &owned_id)?)
        })
        .await
        .map_err(|e| e.to_string())
        .and_then(|counted| counted.map_err(|e| e.to_string()))
        .map_err(|reason| {
            Error::DataUnavailable(format!("{} of club {}: {}", what, club_id, reason))
        })
    }
}

#[async_trait]
impl ClubMetricsRepositoryTrait for ClubMetricsRepository {
    async fn count_events_created_by(&self, club_id: &str) -> Result<i64> {
        self.count("events", club_id, |conn, club_id| {
            Ok(events::table
                .filter(events::club_id.eq(club_id))
                .count()
                .get_result::<i64>(conn)?)
        })
        .await
    }

    async fn count_likes_on_events_of(&self, club_id: &str) -> Result<i64> {
        self.count("likes", club_id, |conn, club_id| {
            Ok(event_likes::table
                .inner_join(events::table)
                .filter(events::club_id.eq(club_id))
                .count()
                .get_result::<i64>(conn)?)
        })
        .await
    }

    async fn count_members_of(&self, club_id: &str) -> Result<i64> {
        self.count("members", club_id, |conn, club_id| {
            Ok(club_members::table
                .filter(club_members::club_id.eq(club_id))
                .count()
                .get_result::<i64>(conn)?)
        })
        .await
    }
}
