//! Seasons module - domain model and repository trait.

mod seasons_model;
mod seasons_traits;

pub use seasons_model::Season;
pub use seasons_traits::SeasonRepositoryTrait;
