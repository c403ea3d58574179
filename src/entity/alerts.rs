use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Alert rows are written by the external monitoring process; this service only reads them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub alert_type: String,
    pub severity: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub timestamp: DateTimeWithTimeZone,
    /// open / acknowledged / resolved
    pub status: String,
    pub sensor_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sensors::Entity",
        from = "Column::SensorId",
        to = "super::sensors::Column::Id"
    )]
    Sensor,
}

impl Related<super::sensors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sensor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
