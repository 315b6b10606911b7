use super::seasons_model::Season;
use crate::errors::Result;

/// Read access to seasons.
pub trait SeasonRepositoryTrait: Send + Sync {
    /// Lists seasons ordered by end date, most recent first.
    fn list_seasons(&self) -> Result<Vec<Season>>;

    fn get_season(&self, season_id: &str) -> Result<Season>;
}
