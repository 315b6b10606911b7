//! Competitions module - domain models, services, and traits.

mod competitions_model;
mod competitions_service;
mod competitions_traits;

pub use competitions_model::*;
pub use competitions_service::CompetitionService;
pub use competitions_traits::{CompetitionRepositoryTrait, CompetitionServiceTrait};
