use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== SENSORS ==========
        manager
            .create_table(
                Table::create()
                    .table(Sensors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sensors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Sensors::SerialNumber)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Sensors::Location).string_len(128))
                    .col(ColumnDef::new(Sensors::Protocol).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Sensors::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Sensors::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== READINGS ==========
        manager
            .create_table(
                Table::create()
                    .table(Readings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Readings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Readings::SensorId).integer().not_null())
                    .col(
                        ColumnDef::new(Readings::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Readings::Activity).small_integer().not_null())
                    .col(ColumnDef::new(Readings::SensorMetadata).json_binary())
                    .col(ColumnDef::new(Readings::MessageId).string_len(64))
                    .col(ColumnDef::new(Readings::GatewayId).string_len(64))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_readings_sensor")
                            .from(Readings::Table, Readings::SensorId)
                            .to(Sensors::Table, Sensors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_readings_timestamp")
                    .table(Readings::Table)
                    .col(Readings::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_readings_sensor_timestamp")
                    .table(Readings::Table)
                    .col(Readings::SensorId)
                    .col(Readings::Timestamp)
                    .to_owned(),
            )
            .await?;

        // ========== ALERTS ==========
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alerts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alerts::AlertType).string_len(64).not_null())
                    .col(ColumnDef::new(Alerts::Severity).string_len(16).not_null())
                    .col(ColumnDef::new(Alerts::Message).text().not_null())
                    .col(
                        ColumnDef::new(Alerts::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alerts::Status)
                            .string_len(16)
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(Alerts::SensorId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alerts_sensor")
                            .from(Alerts::Table, Alerts::SensorId)
                            .to(Sensors::Table, Sensors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alerts_status_timestamp")
                    .table(Alerts::Table)
                    .col(Alerts::Status)
                    .col(Alerts::Timestamp)
                    .to_owned(),
            )
            .await?;

        // ========== POOL READINGS ==========
        manager
            .create_table(
                Table::create()
                    .table(PoolReadings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PoolReadings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PoolReadings::SensorType).string_len(32).not_null())
                    .col(ColumnDef::new(PoolReadings::ReadingDate).date().not_null())
                    .col(ColumnDef::new(PoolReadings::ReadingTime).time().not_null())
                    .col(ColumnDef::new(PoolReadings::Temperature).double())
                    .col(ColumnDef::new(PoolReadings::WaterQuality).string_len(32))
                    .col(
                        ColumnDef::new(PoolReadings::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pool_readings_type_date_time")
                    .table(PoolReadings::Table)
                    .col(PoolReadings::SensorType)
                    .col(PoolReadings::ReadingDate)
                    .col(PoolReadings::ReadingTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PoolReadings::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alerts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Readings::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sensors::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sensors {
    Table,
    Id,
    SerialNumber,
    Location,
    Protocol,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Readings {
    Table,
    Id,
    SensorId,
    Timestamp,
    Activity,
    SensorMetadata,
    MessageId,
    GatewayId,
}

#[derive(DeriveIden)]
enum Alerts {
    Table,
    Id,
    AlertType,
    Severity,
    Message,
    Timestamp,
    Status,
    SensorId,
}

#[derive(DeriveIden)]
enum PoolReadings {
    Table,
    Id,
    SensorType,
    ReadingDate,
    ReadingTime,
    Temperature,
    WaterQuality,
    CreatedAt,
}
