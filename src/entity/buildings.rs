use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "buildings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meters::Entity")]
    Meters,
}

impl Related<super::meters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meters.def()
    }
}

impl Related<super::meter_readings::Entity> for Entity {
    fn to() -> RelationDef {
        super::meters::Relation::MeterReadings.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::meters::Relation::Building.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
