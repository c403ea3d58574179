use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use sea_orm::{DbErr, RuntimeErr};

use super::{ACTIVE_ALERT_STATUSES, Activity, PoolSensorType, ReadingStore, StoreResult};
use crate::entity::{alerts, pool_readings, readings, sensors};

/// In-process Reading Store holding plain entity models.
///
/// Rows are added through the `add_*` helpers. `fail_with` makes every
/// subsequent query return a connection error until `recover` is called.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sensors: Mutex<Vec<sensors::Model>>,
    readings: Mutex<Vec<readings::Model>>,
    alerts: Mutex<Vec<alerts::Model>>,
    pool_readings: Mutex<Vec<pool_readings::Model>>,
    fault: Mutex<Option<String>>,
    pool_queries: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn utc(t: DateTime<Utc>) -> DateTime<FixedOffset> {
    t.fixed_offset()
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sensor and return its id. Registering an existing serial
    /// returns the existing id.
    pub fn add_sensor(&self, serial_number: &str, protocol: &str) -> i32 {
        let mut sensors = lock(&self.sensors);
        if let Some(existing) = sensors.iter().find(|s| s.serial_number == serial_number) {
            return existing.id;
        }
        let id = i32::try_from(sensors.len()).unwrap_or(i32::MAX - 1) + 1;
        sensors.push(sensors::Model {
            id,
            serial_number: serial_number.to_string(),
            location: None,
            protocol: protocol.to_string(),
            status: "active".to_string(),
            created_at: None,
        });
        id
    }

    /// Store a reading for the sensor with `serial_number`, registering the
    /// sensor on first use.
    pub fn add_reading(&self, serial_number: &str, timestamp: DateTime<Utc>, activity: Activity) {
        let sensor_id = self.add_sensor(serial_number, "lora");
        let mut readings = lock(&self.readings);
        let id = i64::try_from(readings.len()).unwrap_or(i64::MAX - 1) + 1;
        readings.push(readings::Model {
            id,
            sensor_id,
            timestamp: utc(timestamp),
            activity: activity.flag(),
            sensor_metadata: None,
            message_id: None,
            gateway_id: None,
        });
    }

    /// Store an alert and return its id.
    pub fn add_alert(
        &self,
        alert_type: &str,
        severity: &str,
        message: &str,
        timestamp: DateTime<Utc>,
        status: &str,
        sensor_id: Option<i32>,
    ) -> i32 {
        let mut alerts = lock(&self.alerts);
        let id = i32::try_from(alerts.len()).unwrap_or(i32::MAX - 1) + 1;
        alerts.push(alerts::Model {
            id,
            alert_type: alert_type.to_string(),
            severity: severity.to_string(),
            message: message.to_string(),
            timestamp: utc(timestamp),
            status: status.to_string(),
            sensor_id,
        });
        id
    }

    pub fn add_pool_reading(
        &self,
        sensor_type: PoolSensorType,
        reading_date: NaiveDate,
        reading_time: NaiveTime,
        temperature: Option<f64>,
        water_quality: Option<&str>,
    ) {
        let mut rows = lock(&self.pool_readings);
        let id = i32::try_from(rows.len()).unwrap_or(i32::MAX - 1) + 1;
        rows.push(pool_readings::Model {
            id,
            sensor_type: sensor_type.as_str().to_string(),
            reading_date,
            reading_time,
            temperature,
            water_quality: water_quality.map(str::to_string),
            created_at: None,
        });
    }

    /// Make every following query fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *lock(&self.fault) = Some(message.to_string());
    }

    pub fn recover(&self) {
        *lock(&self.fault) = None;
    }

    /// Number of `latest_pool_reading` calls served so far.
    pub fn pool_queries(&self) -> u64 {
        self.pool_queries.load(Ordering::Relaxed)
    }

    fn check_fault(&self) -> StoreResult<()> {
        match lock(&self.fault).as_ref() {
            Some(message) => Err(DbErr::Conn(RuntimeErr::Internal(message.clone()))),
            None => Ok(()),
        }
    }

    fn sensor_ids_for(&self, serials: &[String]) -> Vec<i32> {
        lock(&self.sensors)
            .iter()
            .filter(|s| serials.contains(&s.serial_number))
            .map(|s| s.id)
            .collect()
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    async fn count_activity_since(
        &self,
        since: DateTime<Utc>,
        activity: Activity,
    ) -> StoreResult<u64> {
        self.check_fault()?;
        let count = lock(&self.readings)
            .iter()
            .filter(|r| r.timestamp >= since && r.activity == activity.flag())
            .count();
        Ok(count as u64)
    }

    async fn count_sensor_activity_since(
        &self,
        serials: &[String],
        since: DateTime<Utc>,
        activity: Activity,
    ) -> StoreResult<u64> {
        self.check_fault()?;
        let ids = self.sensor_ids_for(serials);
        let count = lock(&self.readings)
            .iter()
            .filter(|r| {
                ids.contains(&r.sensor_id) && r.timestamp >= since && r.activity == activity.flag()
            })
            .count();
        Ok(count as u64)
    }

    async fn reading_times_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<DateTime<Utc>>> {
        self.check_fault()?;
        Ok(lock(&self.readings)
            .iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .map(|r| r.timestamp.with_timezone(&Utc))
            .collect())
    }

    async fn latest_reading_time(&self) -> StoreResult<Option<DateTime<Utc>>> {
        self.check_fault()?;
        Ok(lock(&self.readings)
            .iter()
            .map(|r| r.timestamp.with_timezone(&Utc))
            .max())
    }

    async fn active_alerts(&self, limit: u64) -> StoreResult<Vec<alerts::Model>> {
        self.check_fault()?;
        let mut active: Vec<alerts::Model> = lock(&self.alerts)
            .iter()
            .filter(|a| ACTIVE_ALERT_STATUSES.contains(&a.status.as_str()))
            .cloned()
            .collect();
        active.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        active.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(active)
    }

    async fn latest_pool_reading(
        &self,
        sensor_type: PoolSensorType,
    ) -> StoreResult<Option<pool_readings::Model>> {
        self.pool_queries.fetch_add(1, Ordering::Relaxed);
        self.check_fault()?;
        Ok(lock(&self.pool_readings)
            .iter()
            .filter(|p| p.sensor_type == sensor_type.as_str())
            .max_by_key(|p| (p.reading_date, p.reading_time))
            .cloned())
    }

    async fn count_sensors(&self) -> StoreResult<u64> {
        self.check_fault()?;
        Ok(lock(&self.sensors).len() as u64)
    }

    async fn count_readings(&self) -> StoreResult<u64> {
        self.check_fault()?;
        Ok(lock(&self.readings).len() as u64)
    }
}
