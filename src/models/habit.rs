use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Days tracked per habit, indexed Mon=0 .. Sun=6.
pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Habit {
    pub id: u64,
    pub owner_mobile: String,
    pub name: String,
    pub category: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub completed_days: [bool; DAYS_PER_WEEK],
}
