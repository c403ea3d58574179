use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pool_readings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// water_temp / ambient_temp / water_quality
    pub sensor_type: String,
    pub reading_date: Date,
    pub reading_time: Time,
    pub temperature: Option<f64>,
    pub water_quality: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
