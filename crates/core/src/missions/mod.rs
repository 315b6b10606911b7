//! Missions module - progress records, the recompute engine, and traits.

mod missions_model;
mod missions_service;
mod missions_traits;

pub use missions_model::{
    ClubWithMissionProgress, MissionProgress, MissionProgressDetail, MissionState,
    RecomputeOutcome, RecomputeSummary, SkippedPair,
};
pub(crate) use missions_model::{evaluate_progress, ProgressEvaluation};
pub use missions_service::{Clock, MissionProgressService};
pub use missions_traits::{MissionProgressRepositoryTrait, MissionServiceTrait};

#[cfg(test)]
mod missions_service_tests;
