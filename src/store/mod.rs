//! The Reading Store: everything the aggregator needs from persistence.
//!
//! `SeaOrmStore` is the Postgres-backed implementation used by the server.
//! `MemoryStore` keeps rows in process and can be told to fail, which is how
//! the aggregation scenarios and HTTP error paths are exercised in tests.

mod memory;
mod sea;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::entity::{alerts, pool_readings};

pub use memory::MemoryStore;
pub use sea::SeaOrmStore;

pub type StoreResult<T> = Result<T, DbErr>;

/// Alert statuses that count as "active".
pub const ACTIVE_ALERT_STATUSES: [&str; 2] = ["open", "acknowledged"];

/// Activity flag carried by every reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Exit,
    Entry,
}

impl Activity {
    /// Value stored in `readings.activity`.
    #[must_use]
    pub const fn flag(self) -> i16 {
        match self {
            Self::Exit => 0,
            Self::Entry => 1,
        }
    }
}

/// Kinds of rows found in `pool_readings.sensor_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSensorType {
    WaterTemp,
    AmbientTemp,
    WaterQuality,
}

impl PoolSensorType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WaterTemp => "water_temp",
            Self::AmbientTemp => "ambient_temp",
            Self::WaterQuality => "water_quality",
        }
    }
}

/// Read-only queries the dashboard issues. Each call is independent; no call
/// relies on another having happened in the same request.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Count readings with the given activity flag at or after `since`.
    async fn count_activity_since(
        &self,
        since: DateTime<Utc>,
        activity: Activity,
    ) -> StoreResult<u64>;

    /// Same as [`Self::count_activity_since`], restricted to sensors whose serial
    /// number is in `serials`.
    async fn count_sensor_activity_since(
        &self,
        serials: &[String],
        since: DateTime<Utc>,
        activity: Activity,
    ) -> StoreResult<u64>;

    /// Timestamps of every reading in `[start, end]`, regardless of activity.
    async fn reading_times_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<DateTime<Utc>>>;

    /// Timestamp of the most recent reading ever stored.
    async fn latest_reading_time(&self) -> StoreResult<Option<DateTime<Utc>>>;

    /// Open or acknowledged alerts, newest first, at most `limit` rows.
    async fn active_alerts(&self, limit: u64) -> StoreResult<Vec<alerts::Model>>;

    /// Most recent pool reading of the given type.
    async fn latest_pool_reading(
        &self,
        sensor_type: PoolSensorType,
    ) -> StoreResult<Option<pool_readings::Model>>;

    async fn count_sensors(&self) -> StoreResult<u64>;

    async fn count_readings(&self) -> StoreResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_flags_match_the_readings_column() {
        assert_eq!(Activity::Entry.flag(), 1);
        assert_eq!(Activity::Exit.flag(), 0);
        assert_eq!(PoolSensorType::AmbientTemp.as_str(), "ambient_temp");
    }
}
