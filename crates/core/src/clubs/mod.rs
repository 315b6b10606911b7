//! Clubs module - domain models and repository trait.

mod clubs_model;
mod clubs_traits;

pub use clubs_model::*;
pub use clubs_traits::ClubRepositoryTrait;
