use std::collections::HashSet;

use chrono::{FixedOffset, Offset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Widest facility offset accepted, in either direction (UTC-18:00 to UTC+18:00).
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Longest look-back for area occupancy: one week.
const MAX_AREA_WINDOW_MINUTES: i64 = 7 * 24 * 60;

/// A named physical zone of the center, watched by a fixed set of sensors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaConfig {
    pub name: String,
    pub capacity: u32,
    /// Sensor serial numbers belonging to this area
    pub sensors: Vec<String>,
}

impl AreaConfig {
    fn new(name: &str, capacity: u32, sensors: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            capacity,
            sensors: sensors.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub capacity: u32,
    /// Serial numbers of the presence sensors at the pool gate. Empty means pool
    /// occupancy is not tracked.
    pub sensors: Vec<String>,
    /// Whether the `pool_readings` table is being fed.
    pub readings_enabled: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 60,
            sensors: Vec::new(),
            readings_enabled: false,
        }
    }
}

/// Immutable facility layout handed to the aggregator at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityConfig {
    /// Maximum number of people the whole center may hold
    pub max_capacity: u32,
    /// Facility timezone as an offset from UTC, used for day and hour boundaries
    pub utc_offset_minutes: i32,
    /// How far back an entry still counts as "currently present" in an area
    pub area_window_minutes: i64,
    /// Maximum number of alerts returned by the active alerts view
    pub alert_limit: u64,
    pub areas: Vec<AreaConfig>,
    pub pool: PoolConfig,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            max_capacity: 300,
            utc_offset_minutes: 0,
            area_window_minutes: 15,
            alert_limit: 10,
            areas: vec![
                AreaConfig::new(
                    "Entrada Principal",
                    100,
                    &["LORA-ENTRADA-01", "LORA-SAIDA-01"],
                ),
                AreaConfig::new("Entrada Lateral Norte", 50, &["ZIGB-LATERAL-01"]),
                AreaConfig::new("Entrada Lateral Sul", 50, &["ZIGB-LATERAL-02"]),
                AreaConfig::new("Banheiros", 40, &["SIGF-BANHEIRO-01"]),
                AreaConfig::new("Portaria", 20, &["RFID-PORTARIA-01"]),
            ],
            pool: PoolConfig::default(),
        }
    }
}

impl FacilityConfig {
    /// Read a facility layout from a JSON file. Missing keys take the defaults.
    ///
    /// # Errors
    ///
    /// Returns a facility error if the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FacilityFile {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::FacilityParse {
            path: path.to_string(),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidFacility` describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_capacity == 0 {
            return Err(ConfigError::InvalidFacility(
                "max_capacity must be greater than zero".to_string(),
            ));
        }
        if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(ConfigError::InvalidFacility(format!(
                "utc_offset_minutes {} is outside ±{MAX_OFFSET_MINUTES}",
                self.utc_offset_minutes
            )));
        }
        if !(1..=MAX_AREA_WINDOW_MINUTES).contains(&self.area_window_minutes) {
            return Err(ConfigError::InvalidFacility(format!(
                "area_window_minutes {} is outside 1..={MAX_AREA_WINDOW_MINUTES}",
                self.area_window_minutes
            )));
        }
        if self.alert_limit == 0 {
            return Err(ConfigError::InvalidFacility(
                "alert_limit must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for area in &self.areas {
            if area.name.trim().is_empty() {
                return Err(ConfigError::InvalidFacility(
                    "area names must not be empty".to_string(),
                ));
            }
            if !seen.insert(area.name.as_str()) {
                return Err(ConfigError::InvalidFacility(format!(
                    "duplicate area name '{}'",
                    area.name
                )));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    /// Clamped to the validated range, so an unvalidated layout cannot
    /// overflow date arithmetic.
    #[must_use]
    pub fn area_window(&self) -> TimeDelta {
        TimeDelta::minutes(self.area_window_minutes.clamp(1, MAX_AREA_WINDOW_MINUTES))
    }
}
