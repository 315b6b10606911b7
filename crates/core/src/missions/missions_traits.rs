//! Mission progress repository and service traits.

use async_trait::async_trait;

use super::missions_model::{
    ClubWithMissionProgress, MissionProgress, RecomputeOutcome, RecomputeSummary,
};
use crate::errors::Result;

/// Trait defining the contract for mission progress persistence.
///
/// Records are keyed by `(club_id, competition_id)` and are only written by
/// the mission engine.
#[async_trait]
pub trait MissionProgressRepositoryTrait: Send + Sync {
    fn get_progress(&self, club_id: &str, competition_id: &str)
        -> Result<Option<MissionProgress>>;

    fn list_progress_for_club(&self, club_id: &str) -> Result<Vec<MissionProgress>>;

    fn list_progress_for_competition(&self, competition_id: &str) -> Result<Vec<MissionProgress>>;

    fn list_all_progress(&self) -> Result<Vec<MissionProgress>>;

    /// Inserts or updates the progress value and timestamp.
    ///
    /// Must never clear a stored `is_completed` flag.
    async fn upsert_progress(&self, progress: MissionProgress) -> Result<MissionProgress>;

    /// Marks the record completed and credits `reward_points` to the club, atomically.
    ///
    /// Only acts when the stored record is not completed yet. Returns `true`
    /// when this call performed the transition, `false` when the record was
    /// already completed (nothing credited).
    async fn record_completion(&self, progress: MissionProgress, reward_points: i64)
        -> Result<bool>;
}

/// Trait for the mission progress engine.
#[async_trait]
pub trait MissionServiceTrait: Send + Sync {
    /// Recomputes every club against every activated competition.
    ///
    /// Pair-local failures are skipped and listed in the summary.
    async fn recompute_all(&self) -> Result<RecomputeOutcome>;

    /// Recomputes a single club (manual refresh).
    async fn recompute_club(&self, club_id: &str) -> Result<RecomputeOutcome>;

    /// Closes activated competitions whose end date has passed. Never awards points.
    ///
    /// Returns the IDs of the competitions closed by this call.
    async fn check_expired_missions(&self) -> Result<Vec<String>>;

    fn get_club_progress(&self, club_id: &str) -> Result<ClubWithMissionProgress>;

    fn get_clubs_with_progress(&self) -> Result<Vec<ClubWithMissionProgress>>;

    /// Summary of the latest full pass, if any.
    ///
    /// A later single-club refresh only replaces that club's skipped pairs.
    fn last_summary(&self) -> Option<RecomputeSummary>;
}
