use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== BUILDINGS ==========
        // Identifiers come from the uploaded sheets, never generated here
        manager
            .create_table(
                Table::create()
                    .table(Buildings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Buildings::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Buildings::Name).text().not_null())
                    .to_owned(),
            )
            .await?;

        // ========== METERS ==========
        manager
            .create_table(
                Table::create()
                    .table(Meters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Meters::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Meters::BuildingId).integer().not_null())
                    // 0 = water, 1 = natural gas, 2 = electricity
                    .col(ColumnDef::new(Meters::Fuel).integer().not_null().default(0))
                    // 0 = m3, 1 = kWh
                    .col(ColumnDef::new(Meters::Unit).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meters_building")
                            .from(Meters::Table, Meters::BuildingId)
                            .to(Buildings::Table, Buildings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meters_building")
                    .table(Meters::Table)
                    .col(Meters::BuildingId)
                    .to_owned(),
            )
            .await?;

        // ========== METER READINGS ==========
        // Replaced wholesale on every upload
        manager
            .create_table(
                Table::create()
                    .table(MeterReadings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MeterReadings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MeterReadings::Value)
                            .decimal_len(12, 6)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MeterReadings::MeterId).integer().not_null())
                    .col(
                        ColumnDef::new(MeterReadings::DateTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meter_readings_meter")
                            .from(MeterReadings::Table, MeterReadings::MeterId)
                            .to(Meters::Table, Meters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meter_readings_meter_time")
                    .table(MeterReadings::Table)
                    .col(MeterReadings::MeterId)
                    .col(MeterReadings::DateTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeterReadings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Meters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Buildings::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Buildings {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Meters {
    Table,
    Id,
    BuildingId,
    Fuel,
    Unit,
}

#[derive(DeriveIden)]
pub enum MeterReadings {
    Table,
    Id,
    Value,
    MeterId,
    DateTime,
}
