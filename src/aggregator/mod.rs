//! The Occupancy Aggregator.
//!
//! Each operation reads from a [`ReadingStore`], applies the arithmetic in
//! [`calc`] and returns a complete view. Nothing is cached between calls; a
//! store fault fails the whole operation.

pub mod calc;
pub mod pool;
mod types;

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::FacilityConfig;
use crate::store::{Activity, PoolSensorType, ReadingStore, StoreResult};

use calc::{FLOW_LABELS, FlowHistogram, Tier, capacity_percentage, day_start, occupancy};
use pool::{
    ALKALINITY_RANGE, CHLORINE_RANGE, Measurement, NO_DATA, PH_RANGE, PoolCondition,
    PoolOccupancy, PoolQuality, PoolStatus, WaterParameter, pool_reading_time,
};

pub use types::{
    ActiveAlert, ActiveAlerts, AreaOccupancy, AreasOccupancy, CurrentStats, HealthReport,
    PeopleFlow,
};

/// Area reported for every alert; alerts are not attributed to areas yet.
// TODO: resolve the area through alerts.sensor_id -> sensors.serial_number -> FacilityConfig.areas
pub const UNATTRIBUTED_ALERT_AREA: &str = "Sistema";

const FLOW_WINDOW_HOURS: i64 = 24;

pub struct OccupancyAggregator {
    store: Arc<dyn ReadingStore>,
    facility: Arc<FacilityConfig>,
}

impl OccupancyAggregator {
    pub fn new(store: Arc<dyn ReadingStore>, facility: Arc<FacilityConfig>) -> Self {
        Self { store, facility }
    }

    pub async fn current_snapshot(&self) -> StoreResult<CurrentStats> {
        self.current_snapshot_at(Utc::now()).await
    }

    /// Occupancy since local midnight: entries minus exits, against `max_capacity`.
    pub async fn current_snapshot_at(&self, now: DateTime<Utc>) -> StoreResult<CurrentStats> {
        let since = day_start(now, self.facility.offset());

        let entries_today = self.store.count_activity_since(since, Activity::Entry).await?;
        let exits_today = self.store.count_activity_since(since, Activity::Exit).await?;
        let last_reading = self.store.latest_reading_time().await?;

        let current_people = occupancy(entries_today, exits_today);
        tracing::debug!(
            %since,
            entries_today,
            exits_today,
            current_people,
            "computed current snapshot"
        );

        Ok(CurrentStats {
            current_people,
            entries_today,
            exits_today,
            capacity_percentage: capacity_percentage(current_people, self.facility.max_capacity),
            max_capacity: self.facility.max_capacity,
            last_reading,
            has_data_today: entries_today > 0 || exits_today > 0,
            timestamp: now,
        })
    }

    pub async fn flow_last_24h(&self) -> StoreResult<PeopleFlow> {
        self.flow_last_24h_at(Utc::now()).await
    }

    /// All readings of the last 24 hours bucketed by facility-local hour.
    pub async fn flow_last_24h_at(&self, now: DateTime<Utc>) -> StoreResult<PeopleFlow> {
        let start = now - TimeDelta::hours(FLOW_WINDOW_HOURS);
        let times = self.store.reading_times_between(start, now).await?;
        let histogram = FlowHistogram::from_timestamps(&times, self.facility.offset());

        tracing::debug!(
            readings = times.len(),
            buckets = ?histogram.raw_counts(),
            "computed people flow"
        );

        Ok(PeopleFlow {
            labels: FLOW_LABELS.iter().map(|l| (*l).to_string()).collect(),
            data: histogram.estimated_people(),
            period: format!("{FLOW_WINDOW_HOURS}h"),
            total_readings: histogram.total(),
            timestamp: now,
        })
    }

    pub async fn area_occupancy(&self) -> StoreResult<AreasOccupancy> {
        self.area_occupancy_at(Utc::now()).await
    }

    /// Entries per configured area within the recent window. Independent of the
    /// day-based snapshot; the two figures need not agree.
    pub async fn area_occupancy_at(&self, now: DateTime<Utc>) -> StoreResult<AreasOccupancy> {
        let since = now - self.facility.area_window();

        let mut areas = Vec::with_capacity(self.facility.areas.len());
        for area in &self.facility.areas {
            let current = self
                .store
                .count_sensor_activity_since(&area.sensors, since, Activity::Entry)
                .await?;
            let percentage = capacity_percentage(current, area.capacity);

            areas.push(AreaOccupancy {
                name: area.name.clone(),
                current,
                capacity: area.capacity,
                percentage,
                status: Tier::from_percentage(percentage),
            });
        }

        let last_reading = self.store.latest_reading_time().await?;

        Ok(AreasOccupancy {
            total_areas: areas.len(),
            areas,
            last_reading,
            timestamp: now,
        })
    }

    pub async fn pool_status(&self) -> StoreResult<PoolStatus> {
        self.pool_status_at(Utc::now()).await
    }

    /// Pool occupancy and temperatures. Sources that are not configured are
    /// reported as unavailable without querying the store.
    pub async fn pool_status_at(&self, now: DateTime<Utc>) -> StoreResult<PoolStatus> {
        let pool = &self.facility.pool;
        let offset = self.facility.offset();

        let pool_occupancy = if pool.sensors.is_empty() {
            PoolOccupancy::Unavailable
        } else {
            let since = day_start(now, offset);
            let entries_today = self
                .store
                .count_sensor_activity_since(&pool.sensors, since, Activity::Entry)
                .await?;
            let exits_today = self
                .store
                .count_sensor_activity_since(&pool.sensors, since, Activity::Exit)
                .await?;
            let current_people = occupancy(entries_today, exits_today);

            PoolOccupancy::Available {
                current_people,
                entries_today,
                exits_today,
                occupancy_percentage: capacity_percentage(current_people, pool.capacity),
            }
        };

        let (water_temperature, ambient_temperature) = if pool.readings_enabled {
            let water = self.store.latest_pool_reading(PoolSensorType::WaterTemp).await?;
            let ambient = self.store.latest_pool_reading(PoolSensorType::AmbientTemp).await?;
            (
                Measurement::temperature(water.as_ref(), offset),
                Measurement::temperature(ambient.as_ref(), offset),
            )
        } else {
            (Measurement::Unavailable, Measurement::Unavailable)
        };

        let status = match pool_occupancy {
            PoolOccupancy::Available {
                occupancy_percentage,
                ..
            } => PoolCondition::from(Tier::from_percentage(occupancy_percentage)),
            PoolOccupancy::Unavailable => PoolCondition::NoData,
        };

        let has_data = matches!(pool_occupancy, PoolOccupancy::Available { .. })
            || water_temperature.is_available()
            || ambient_temperature.is_available();

        Ok(PoolStatus {
            capacity: pool.capacity,
            status,
            has_data,
            occupancy: pool_occupancy,
            last_reading: water_temperature
                .recorded_at()
                .into_iter()
                .chain(ambient_temperature.recorded_at())
                .max(),
            water_temperature,
            ambient_temperature,
            timestamp: now,
        })
    }

    pub async fn pool_quality(&self) -> StoreResult<PoolQuality> {
        self.pool_quality_at(Utc::now()).await
    }

    /// Water-quality parameters with their safe bands. The pool table stores a
    /// classification only, so the individual parameters stay unavailable and
    /// the classification becomes `overall_status`.
    pub async fn pool_quality_at(&self, now: DateTime<Utc>) -> StoreResult<PoolQuality> {
        let latest = if self.facility.pool.readings_enabled {
            self.store
                .latest_pool_reading(PoolSensorType::WaterQuality)
                .await?
        } else {
            None
        };

        let classified = latest
            .as_ref()
            .and_then(|row| row.water_quality.clone().map(|q| (q, row)));
        let (overall_status, last_reading) = match classified {
            Some((quality, row)) => (
                quality,
                Some(pool_reading_time(row, self.facility.offset())),
            ),
            None => (NO_DATA.to_string(), None),
        };

        Ok(PoolQuality {
            ph: WaterParameter::new(Measurement::Unavailable, &PH_RANGE),
            chlorine: WaterParameter::new(Measurement::Unavailable, &CHLORINE_RANGE),
            alkalinity: WaterParameter::new(Measurement::Unavailable, &ALKALINITY_RANGE),
            has_data: last_reading.is_some(),
            overall_status,
            last_reading,
            timestamp: now,
        })
    }

    pub async fn active_alerts(&self) -> StoreResult<ActiveAlerts> {
        self.active_alerts_at(Utc::now()).await
    }

    /// Open and acknowledged alerts, newest first, capped at `alert_limit`.
    pub async fn active_alerts_at(&self, now: DateTime<Utc>) -> StoreResult<ActiveAlerts> {
        let alerts: Vec<ActiveAlert> = self
            .store
            .active_alerts(self.facility.alert_limit)
            .await?
            .into_iter()
            .map(|a| ActiveAlert::from_model(a, UNATTRIBUTED_ALERT_AREA))
            .collect();

        Ok(ActiveAlerts {
            total: alerts.len(),
            alerts,
            timestamp: now,
        })
    }

    pub async fn health_probe(&self) -> StoreResult<HealthReport> {
        self.health_probe_at(Utc::now()).await
    }

    /// Count sensors and readings to confirm the store answers.
    pub async fn health_probe_at(&self, now: DateTime<Utc>) -> StoreResult<HealthReport> {
        let sensors = self.store.count_sensors().await?;
        let readings = self.store.count_readings().await?;

        Ok(HealthReport {
            status: "healthy".to_string(),
            module: "dashboard".to_string(),
            database: "connected".to_string(),
            sensors,
            readings,
            timestamp: now,
        })
    }
}
