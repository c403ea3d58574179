use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::calc::Tier;
use crate::entity::alerts;

/// Whole-center occupancy for the current day
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CurrentStats {
    /// Entries minus exits since local midnight, clamped at zero
    pub current_people: u64,
    pub entries_today: u64,
    pub exits_today: u64,
    /// `current_people / max_capacity`, one decimal
    pub capacity_percentage: f64,
    pub max_capacity: u32,
    /// Most recent reading ever stored (null if the store is empty)
    pub last_reading: Option<DateTime<Utc>>,
    pub has_data_today: bool,
    pub timestamp: DateTime<Utc>,
}

/// Readings over the last 24 hours in six 4-hour buckets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PeopleFlow {
    /// Bucket start hours: 00:00, 04:00, ... 20:00
    pub labels: Vec<String>,
    /// Estimated people per bucket (raw readings / 2)
    pub data: Vec<u64>,
    pub period: String,
    /// Raw readings in the window
    pub total_readings: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AreaOccupancy {
    pub name: String,
    /// Entries seen by the area's sensors within the recent window
    pub current: u64,
    pub capacity: u32,
    pub percentage: f64,
    pub status: Tier,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AreasOccupancy {
    pub areas: Vec<AreaOccupancy>,
    pub total_areas: usize,
    pub last_reading: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ActiveAlert {
    pub id: i32,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub severity: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub sensor_id: Option<i32>,
    pub area: String,
}

impl ActiveAlert {
    pub(crate) fn from_model(alert: alerts::Model, area: &str) -> Self {
        Self {
            id: alert.id,
            alert_type: alert.alert_type,
            severity: alert.severity,
            message: alert.message,
            timestamp: alert.timestamp.with_timezone(&Utc),
            sensor_id: alert.sensor_id,
            area: area.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ActiveAlerts {
    pub alerts: Vec<ActiveAlert>,
    pub total: usize,
    pub timestamp: DateTime<Utc>,
}

/// Store reachability report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: String,
    pub module: String,
    pub database: String,
    pub sensors: u64,
    pub readings: u64,
    pub timestamp: DateTime<Utc>,
}
