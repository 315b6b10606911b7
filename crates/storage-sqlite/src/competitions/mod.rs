//! SQLite storage implementation for competitions.

mod model;
mod repository;

pub use model::{CompetitionDB, NewCompetitionDB};
pub use repository::CompetitionRepository;
