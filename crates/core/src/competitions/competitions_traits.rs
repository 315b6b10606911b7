//! Competition repository and service traits.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::competitions_model::{Competition, CompetitionStatus, NewCompetition};
use crate::errors::Result;

/// Trait defining the contract for competition persistence.
#[async_trait]
pub trait CompetitionRepositoryTrait: Send + Sync {
    /// Lists every competition regardless of status.
    fn list_competitions(&self) -> Result<Vec<Competition>>;

    /// Lists competitions with status `Activated` whose end date is null or after `now`.
    fn list_activated_competitions(&self, now: NaiveDateTime) -> Result<Vec<Competition>>;

    fn list_competitions_by_season(&self, season_id: &str) -> Result<Vec<Competition>>;

    fn get_competition(&self, competition_id: &str) -> Result<Competition>;

    /// Inserts a validated competition with status `Draft`.
    async fn insert_competition(&self, new_competition: NewCompetition) -> Result<Competition>;

    async fn update_status(
        &self,
        competition_id: &str,
        status: CompetitionStatus,
    ) -> Result<Competition>;
}

/// Trait for competition service operations
#[async_trait]
pub trait CompetitionServiceTrait: Send + Sync {
    fn get_competitions(&self) -> Result<Vec<Competition>>;
    fn get_competition(&self, competition_id: &str) -> Result<Competition>;
    async fn create_competition(&self, new_competition: NewCompetition) -> Result<Competition>;
    async fn activate_competition(&self, competition_id: &str) -> Result<Competition>;
    async fn close_competition(&self, competition_id: &str) -> Result<Competition>;
}
