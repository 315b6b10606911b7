use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::competitions_model::{Competition, CompetitionStatus, NewCompetition};
use super::competitions_traits::{CompetitionRepositoryTrait, CompetitionServiceTrait};
use crate::errors::{Error, Result, ValidationError};

pub struct CompetitionService {
    competition_repo: Arc<dyn CompetitionRepositoryTrait>,
}

impl CompetitionService {
    pub fn new(competition_repo: Arc<dyn CompetitionRepositoryTrait>) -> Self {
        CompetitionService { competition_repo }
    }
}

#[async_trait]
impl CompetitionServiceTrait for CompetitionService {
    fn get_competitions(&self) -> Result<Vec<Competition>> {
        self.competition_repo.list_competitions()
    }

    fn get_competition(&self, competition_id: &str) -> Result<Competition> {
        self.competition_repo.get_competition(competition_id)
    }

    async fn create_competition(&self, new_competition: NewCompetition) -> Result<Competition> {
        new_competition.validate()?;
        debug!(
            "Creating competition '{}' ({} >= {})",
            new_competition.name,
            new_competition.goal_type.as_str(),
            new_competition.goal
        );
        self.competition_repo
            .insert_competition(new_competition)
            .await
    }

    async fn activate_competition(&self, competition_id: &str) -> Result<Competition> {
        let competition = self.competition_repo.get_competition(competition_id)?;
        match competition.status {
            CompetitionStatus::Activated => Ok(competition),
            CompetitionStatus::Closed => Err(Error::Validation(ValidationError::InvalidInput(
                format!("competition {} is closed and cannot be reactivated", competition_id),
            ))),
            CompetitionStatus::Draft => {
                // Goals edited outside this service are re-checked before going live
                competition.goal().validate()?;
                info!("Activating competition {}", competition_id);
                self.competition_repo
                    .update_status(competition_id, CompetitionStatus::Activated)
                    .await
            }
        }
    }

    async fn close_competition(&self, competition_id: &str) -> Result<Competition> {
        let competition = self.competition_repo.get_competition(competition_id)?;
        if competition.status == CompetitionStatus::Closed {
            return Ok(competition);
        }
        info!("Closing competition {}", competition_id);
        self.competition_repo
            .update_status(competition_id, CompetitionStatus::Closed)
            .await
    }
}
