//! SQLite storage implementation for clubs.

mod model;
mod repository;

pub use model::ClubDB;
pub use repository::ClubRepository;
