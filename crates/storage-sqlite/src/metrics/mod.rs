//! Metric counts over platform activity (events, likes, memberships).

mod repository;

pub use repository::ClubMetricsRepository;
