/// Default interval between two recompute passes, in seconds
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// Default upper bound for a single metric lookup, in milliseconds
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;

/// Number of past seasons reported in club statistics
pub const DEFAULT_SEASON_HISTORY: usize = 5;

/// Number of clubs reported in season top lists
pub const DEFAULT_TOP_CLUBS: usize = 5;

/// Upper bound for displayed percentages
pub const MAX_PERCENTAGE: f64 = 100.0;
