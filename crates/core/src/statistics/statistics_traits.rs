use super::statistics_model::{
    ClubStatistics, CompetitionStatistics, GoalTypeTrend, LeaderboardEntry, SeasonStatistics,
};
use crate::errors::Result;

/// Read-only rollups over clubs, competitions, seasons and mission progress.
pub trait StatisticsServiceTrait: Send + Sync {
    fn club_statistics(&self, club_id: &str) -> Result<ClubStatistics>;

    fn season_statistics(&self, season_id: &str) -> Result<SeasonStatistics>;

    fn competition_statistics(&self, competition_id: &str) -> Result<CompetitionStatistics>;

    /// Clubs by points, highest first; ties broken by club ID ascending.
    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>>;

    /// One entry per goal type, in [`crate::goals::GoalType::ALL`] order.
    fn completion_trends_by_goal_type(&self) -> Result<Vec<GoalTypeTrend>>;
}
