//! Goals module - goal model, ratio evaluation and metric lookup.

mod goals_model;
mod goals_traits;

pub use goals_model::*;
pub use goals_traits::ClubMetricsRepositoryTrait;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Error, Result};
    use async_trait::async_trait;
    use std::str::FromStr;

    #[test]
    fn test_progress_ratio_is_clamped() {
        assert_eq!(progress_ratio(3, 5).unwrap(), 0.6);
        assert_eq!(progress_ratio(8, 5).unwrap(), 1.0);
        assert_eq!(progress_ratio(-2, 5).unwrap(), 0.0);
        assert_eq!(progress_ratio(0, 5).unwrap(), 0.0);
    }

    #[test]
    fn test_progress_ratio_rejects_non_positive_target() {
        assert!(matches!(progress_ratio(3, 0), Err(Error::InvalidGoal(_))));
        assert!(matches!(progress_ratio(3, -1), Err(Error::InvalidGoal(_))));
    }

    #[test]
    fn test_is_goal_met() {
        assert!(!is_goal_met(4, 5));
        assert!(is_goal_met(5, 5));
        assert!(is_goal_met(6, 5));
    }

    #[test]
    fn test_percentages_are_zero_safe() {
        assert_eq!(progress_percentage(3, 0), 0.0);
        assert_eq!(progress_percentage(3, 5), 60.0);
        assert_eq!(rate_percentage(0, 0), 0.0);
        assert_eq!(rate_percentage(1, 4), 25.0);
    }

    #[test]
    fn test_goal_validation() {
        assert!(Goal::new(GoalType::EventCount, 5, 100).validate().is_ok());
        assert!(Goal::new(GoalType::EventCount, 5, 0).validate().is_ok());
        assert!(Goal::new(GoalType::EventCount, 0, 100).validate().is_err());
        assert!(Goal::new(GoalType::MemberCount, 5, -1).validate().is_err());
    }

    #[test]
    fn test_goal_type_strings() {
        for goal_type in GoalType::ALL {
            assert_eq!(GoalType::from_str(goal_type.as_str()).unwrap(), goal_type);
        }
        let json = serde_json::to_string(&GoalType::EventLikes).unwrap();
        assert_eq!(json, "\"EVENT_LIKES\"");
    }

    struct FixedMetrics;

    #[async_trait]
    impl ClubMetricsRepositoryTrait for FixedMetrics {
        async fn count_events_created_by(&self, _club_id: &str) -> Result<i64> {
            Ok(3)
        }
        async fn count_likes_on_events_of(&self, _club_id: &str) -> Result<i64> {
            Ok(42)
        }
        async fn count_members_of(&self, _club_id: &str) -> Result<i64> {
            Err(Error::DataUnavailable("members table offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_goal_type_dispatches_to_metric() {
        let metrics = FixedMetrics;
        assert_eq!(
            GoalType::EventCount.current_value(&metrics, "c1").await.unwrap(),
            3
        );
        assert_eq!(
            GoalType::EventLikes.current_value(&metrics, "c1").await.unwrap(),
            42
        );
        assert!(matches!(
            GoalType::MemberCount.current_value(&metrics, "c1").await,
            Err(Error::DataUnavailable(_))
        ));
    }
}
