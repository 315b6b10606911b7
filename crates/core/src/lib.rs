//! UNICLUBS Core - club competitions, mission progress and leaderboards.
//!
//! This crate contains the gamification engine of the platform. It is
//! database-agnostic and defines traits that are implemented by the
//! `storage-sqlite` crate:
//!
//! - [`goals`]: goal types, ratio evaluation and the metric lookup trait
//! - [`missions`]: the recompute engine that tracks progress and awards points
//! - [`statistics`]: read-only rollups and leaderboards
//! - [`events`]: completion events and the listener fan-out
//! - [`scheduler`]: the periodic timer driving the engine

pub mod clubs;
pub mod competitions;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod goals;
pub mod missions;
pub mod scheduler;
pub mod seasons;
pub mod statistics;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::EngineConfig;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
