//! SQLite storage implementation for mission progress.

mod model;
mod repository;

pub use model::MissionProgressDB;
pub use repository::MissionProgressRepository;
