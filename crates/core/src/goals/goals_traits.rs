use async_trait::async_trait;

use super::goals_model::GoalType;
use crate::errors::Result;

/// Current metric values per club, isolating the engine from storage details.
///
/// Lookups are async so the engine can bound each one with a timeout. Any
/// failure should surface as [`crate::Error::DataUnavailable`].
#[async_trait]
pub trait ClubMetricsRepositoryTrait: Send + Sync {
    async fn count_events_created_by(&self, club_id: &str) -> Result<i64>;

    async fn count_likes_on_events_of(&self, club_id: &str) -> Result<i64>;

    async fn count_members_of(&self, club_id: &str) -> Result<i64>;
}

impl GoalType {
    /// Resolves the current value of this goal's metric for a club.
    pub async fn current_value(
        &self,
        metrics: &dyn ClubMetricsRepositoryTrait,
        club_id: &str,
    ) -> Result<i64> {
        match self {
            GoalType::EventCount => metrics.count_events_created_by(club_id).await,
            GoalType::EventLikes => metrics.count_likes_on_events_of(club_id).await,
            GoalType::MemberCount => metrics.count_members_of(club_id).await,
        }
    }
}
