//! Club repository trait.

use super::clubs_model::Club;
use crate::errors::Result;

/// Read access to clubs.
///
/// Point balances are never written through this trait; they are credited by
/// [`crate::missions::MissionProgressRepositoryTrait::record_completion`] in
/// the same transaction that completes a mission.
pub trait ClubRepositoryTrait: Send + Sync {
    /// Lists every club, whatever its status.
    fn list_all_clubs(&self) -> Result<Vec<Club>>;

    /// Retrieves a club by its ID.
    fn get_club(&self, club_id: &str) -> Result<Club>;
}
