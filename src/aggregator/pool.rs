//! Pool views. Every value here may be missing: the pool sensors are installed
//! separately from the presence network, so "no data yet" is an explicit
//! variant rather than a zero.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::calc::Tier;
use crate::entity::pool_readings;

/// A sampled value that may not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Measurement {
    Unavailable,
    Available {
        value: f64,
        recorded_at: DateTime<Utc>,
    },
}

impl Measurement {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Available { recorded_at, .. } => Some(*recorded_at),
            Self::Unavailable => None,
        }
    }

    /// Temperature measurement from a pool row. Rows without a temperature are
    /// treated as missing.
    pub(crate) fn temperature(row: Option<&pool_readings::Model>, offset: FixedOffset) -> Self {
        match row {
            Some(r) => match r.temperature {
                Some(value) => Self::Available {
                    value,
                    recorded_at: pool_reading_time(r, offset),
                },
                None => Self::Unavailable,
            },
            None => Self::Unavailable,
        }
    }
}

/// Pool rows carry a local date and time; they are interpreted at the facility offset.
pub(crate) fn pool_reading_time(row: &pool_readings::Model, offset: FixedOffset) -> DateTime<Utc> {
    row.reading_date.and_time(row.reading_time).and_utc()
        - TimeDelta::seconds(i64::from(offset.local_minus_utc()))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PoolOccupancy {
    Unavailable,
    Available {
        current_people: u64,
        entries_today: u64,
        exits_today: u64,
        occupancy_percentage: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PoolCondition {
    NoData,
    Normal,
    Warning,
    Critical,
}

impl From<Tier> for PoolCondition {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Normal => Self::Normal,
            Tier::Warning => Self::Warning,
            Tier::Critical => Self::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PoolStatus {
    pub capacity: u32,
    pub status: PoolCondition,
    pub has_data: bool,
    pub occupancy: PoolOccupancy,
    pub water_temperature: Measurement,
    pub ambient_temperature: Measurement,
    pub last_reading: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

/// Recommended band for one water-quality parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeRange {
    pub min_safe: f64,
    pub max_safe: f64,
    pub unit: &'static str,
}

pub const PH_RANGE: SafeRange = SafeRange {
    min_safe: 7.2,
    max_safe: 7.6,
    unit: "",
};

pub const CHLORINE_RANGE: SafeRange = SafeRange {
    min_safe: 1.0,
    max_safe: 3.0,
    unit: "ppm",
};

pub const ALKALINITY_RANGE: SafeRange = SafeRange {
    min_safe: 80.0,
    max_safe: 120.0,
    unit: "ppm",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParameterStatus {
    NoData,
    Low,
    Ok,
    High,
}

impl ParameterStatus {
    #[must_use]
    pub fn assess(measurement: &Measurement, range: &SafeRange) -> Self {
        match measurement {
            Measurement::Unavailable => Self::NoData,
            Measurement::Available { value, .. } if *value < range.min_safe => Self::Low,
            Measurement::Available { value, .. } if *value > range.max_safe => Self::High,
            Measurement::Available { .. } => Self::Ok,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WaterParameter {
    pub value: Measurement,
    pub status: ParameterStatus,
    pub min_safe: f64,
    pub max_safe: f64,
    pub unit: String,
}

impl WaterParameter {
    #[must_use]
    pub fn new(value: Measurement, range: &SafeRange) -> Self {
        Self {
            status: ParameterStatus::assess(&value, range),
            value,
            min_safe: range.min_safe,
            max_safe: range.max_safe,
            unit: range.unit.to_string(),
        }
    }
}

/// Overall classification used until a water-quality row exists.
pub const NO_DATA: &str = "no_data";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PoolQuality {
    pub ph: WaterParameter,
    pub chlorine: WaterParameter,
    pub alkalinity: WaterParameter,
    /// Classification of the latest water-quality reading, or `no_data`
    pub overall_status: String,
    pub has_data: bool,
    pub last_reading: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    fn available(value: f64) -> Measurement {
        Measurement::Available {
            value,
            recorded_at: Utc.with_ymd_and_hms(2025, 11, 4, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn parameter_status_compares_against_safe_band() {
        let assess = ParameterStatus::assess;
        assert_eq!(assess(&Measurement::Unavailable, &PH_RANGE), ParameterStatus::NoData);
        assert_eq!(assess(&available(7.0), &PH_RANGE), ParameterStatus::Low);
        assert_eq!(assess(&available(7.2), &PH_RANGE), ParameterStatus::Ok);
        assert_eq!(assess(&available(7.6), &PH_RANGE), ParameterStatus::Ok);
        assert_eq!(assess(&available(3.5), &CHLORINE_RANGE), ParameterStatus::High);
    }

    #[test]
    fn unavailable_measurement_serializes_as_tagged_state() {
        let json = serde_json::to_value(Measurement::Unavailable).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "unavailable" }));

        let json = serde_json::to_value(available(26.5)).unwrap();
        assert_eq!(json["state"], "available");
        assert_eq!(json["value"], 26.5);
    }

    #[test]
    fn pool_rows_are_read_at_the_facility_offset() {
        let row = pool_readings::Model {
            id: 1,
            sensor_type: "water_temp".to_string(),
            reading_date: NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(),
            reading_time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            temperature: Some(27.1),
            water_quality: None,
            created_at: None,
        };
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(
            pool_reading_time(&row, offset),
            Utc.with_ymd_and_hms(2025, 11, 4, 12, 15, 0).unwrap()
        );
    }
}
