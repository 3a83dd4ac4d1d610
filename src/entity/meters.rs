use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Fuel, Unit};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub building_id: i32,
    pub fuel: Fuel,
    pub unit: Unit,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::buildings::Entity",
        from = "Column::BuildingId",
        to = "super::buildings::Column::Id",
        on_delete = "Cascade"
    )]
    Building,
    #[sea_orm(has_many = "super::meter_readings::Entity")]
    MeterReadings,
}

impl Related<super::buildings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Building.def()
    }
}

impl Related<super::meter_readings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeterReadings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
