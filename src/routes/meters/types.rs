use sea_orm::ActiveEnum;
use serde::Serialize;
use utoipa::ToSchema;

use crate::entity::meters;

/// Meter with fuel and unit as both stored code and display label
#[derive(Debug, Serialize, ToSchema)]
pub struct MeterResponse {
    pub id: i32,
    pub building_id: i32,
    /// 0 = water, 1 = natural gas, 2 = electricity
    pub fuel: i32,
    pub fuel_name: String,
    /// 0 = m3, 1 = kWh
    pub unit: i32,
    pub unit_name: String,
}

impl From<meters::Model> for MeterResponse {
    fn from(m: meters::Model) -> Self {
        Self {
            id: m.id,
            building_id: m.building_id,
            fuel: m.fuel.to_value(),
            fuel_name: m.fuel.label().to_string(),
            unit: m.unit.to_value(),
            unit_name: m.unit.label().to_string(),
        }
    }
}
