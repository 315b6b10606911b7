//! SQLite storage implementation for seasons.

mod model;
mod repository;

pub use model::SeasonDB;
pub use repository::SeasonRepository;
