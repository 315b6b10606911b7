//! Domain event types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clubs::Club;
use crate::competitions::Competition;
use crate::missions::MissionProgress;

/// Domain events emitted by the mission engine after successful mutations.
///
/// Presentation layers subscribe to these instead of polling.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A club reached a competition goal for the first time and was credited.
    MissionCompleted(MissionCompletedEvent),

    /// Competitions whose end date passed were closed.
    CompetitionsClosed { competition_ids: Vec<String> },
}

/// Payload of a completion transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionCompletedEvent {
    pub club: Club,
    pub competition: Competition,
    pub progress: MissionProgress,
    pub completed_at: NaiveDateTime,
}

impl DomainEvent {
    /// Creates a MissionCompleted event.
    pub fn mission_completed(
        club: Club,
        competition: Competition,
        progress: MissionProgress,
        completed_at: NaiveDateTime,
    ) -> Self {
        Self::MissionCompleted(MissionCompletedEvent {
            club,
            competition,
            progress,
            completed_at,
        })
    }

    /// Creates a CompetitionsClosed event.
    pub fn competitions_closed(competition_ids: Vec<String>) -> Self {
        Self::CompetitionsClosed { competition_ids }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competitions_closed_serialization() {
        let event = DomainEvent::competitions_closed(vec!["comp1".to_string()]);

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("competitions_closed"));

        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();
        match deserialized {
            DomainEvent::CompetitionsClosed { competition_ids } => {
                assert_eq!(competition_ids, vec!["comp1"]);
            }
            _ => panic!("Expected CompetitionsClosed"),
        }
    }
}
