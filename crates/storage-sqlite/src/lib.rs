//! SQLite storage implementation for UNICLUBS.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `uniclubs-core` and contains:
//! - Database connection pooling and management
//! - Embedded Diesel migrations
//! - Repository implementations for clubs, seasons, competitions and mission progress
//! - Metric counters over events, likes and memberships
//!
//! # Architecture
//!
//! This crate is the only place where Diesel dependencies exist. The core
//! crate is database-agnostic and works with traits.
//!
//! ```text
//!      core (engine, statistics)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! Reads use pooled connections. Every write goes through the single
//! [`WriteHandle`] actor, which runs each job in an immediate transaction.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod clubs;
pub mod competitions;
pub mod metrics;
pub mod missions;
pub mod seasons;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export repositories
pub use clubs::ClubRepository;
pub use competitions::CompetitionRepository;
pub use metrics::ClubMetricsRepository;
pub use missions::MissionProgressRepository;
pub use seasons::SeasonRepository;

// Re-export from uniclubs-core for convenience
pub use uniclubs_core::errors::{DatabaseError, Error, Result};
