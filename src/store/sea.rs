use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Statement,
    prelude::DateTimeWithTimeZone, sea_query::JoinType,
};

use super::{ACTIVE_ALERT_STATUSES, Activity, PoolSensorType, ReadingStore, StoreResult};
use crate::entity::{alerts, pool_readings, readings, sensors};

/// Result of asking the database for the newest reading time
#[derive(Debug, FromQueryResult)]
struct MaxTimeRow {
    max_time: Option<DateTime<Utc>>,
}

/// Reading Store backed by the Postgres tables created by the `migration` crate.
#[derive(Debug)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReadingStore for SeaOrmStore {
    async fn count_activity_since(
        &self,
        since: DateTime<Utc>,
        activity: Activity,
    ) -> StoreResult<u64> {
        readings::Entity::find()
            .filter(readings::Column::Timestamp.gte(since))
            .filter(readings::Column::Activity.eq(activity.flag()))
            .count(&self.db)
            .await
    }

    async fn count_sensor_activity_since(
        &self,
        serials: &[String],
        since: DateTime<Utc>,
        activity: Activity,
    ) -> StoreResult<u64> {
        // `IN ()` is not valid SQL
        if serials.is_empty() {
            return Ok(0);
        }

        readings::Entity::find()
            .join(JoinType::InnerJoin, readings::Relation::Sensor.def())
            .filter(sensors::Column::SerialNumber.is_in(serials.iter().cloned()))
            .filter(readings::Column::Timestamp.gte(since))
            .filter(readings::Column::Activity.eq(activity.flag()))
            .count(&self.db)
            .await
    }

    async fn reading_times_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<DateTime<Utc>>> {
        let times: Vec<DateTimeWithTimeZone> = readings::Entity::find()
            .select_only()
            .column(readings::Column::Timestamp)
            .filter(readings::Column::Timestamp.gte(start))
            .filter(readings::Column::Timestamp.lte(end))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(times.into_iter().map(|t| t.with_timezone(&Utc)).collect())
    }

    async fn latest_reading_time(&self) -> StoreResult<Option<DateTime<Utc>>> {
        let row = MaxTimeRow::find_by_statement(Statement::from_string(
            self.db.get_database_backend(),
            "SELECT MAX(timestamp) AS max_time FROM readings",
        ))
        .one(&self.db)
        .await?;

        Ok(row.and_then(|r| r.max_time))
    }

    async fn active_alerts(&self, limit: u64) -> StoreResult<Vec<alerts::Model>> {
        alerts::Entity::find()
            .filter(alerts::Column::Status.is_in(ACTIVE_ALERT_STATUSES))
            .order_by_desc(alerts::Column::Timestamp)
            .limit(limit)
            .all(&self.db)
            .await
    }

    async fn latest_pool_reading(
        &self,
        sensor_type: PoolSensorType,
    ) -> StoreResult<Option<pool_readings::Model>> {
        pool_readings::Entity::find()
            .filter(pool_readings::Column::SensorType.eq(sensor_type.as_str()))
            .order_by_desc(pool_readings::Column::ReadingDate)
            .order_by_desc(pool_readings::Column::ReadingTime)
            .one(&self.db)
            .await
    }

    async fn count_sensors(&self) -> StoreResult<u64> {
        sensors::Entity::find().count(&self.db).await
    }

    async fn count_readings(&self) -> StoreResult<u64> {
        readings::Entity::find().count(&self.db).await
    }
}
