//! Season domain model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A time-bounded grouping of competitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub end_date: NaiveDateTime,
}

impl Season {
    /// A season is active until its end date.
    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        self.end_date > now
    }
}
