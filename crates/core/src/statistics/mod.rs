//! Statistics module - club, season and competition rollups plus the leaderboard.

mod statistics_model;
mod statistics_service;
mod statistics_traits;

pub use statistics_model::*;
pub use statistics_service::StatisticsService;
pub use statistics_traits::StatisticsServiceTrait;

#[cfg(test)]
mod statistics_service_tests;
