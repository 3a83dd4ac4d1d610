pub mod buildings;
pub mod meter_readings;
pub mod meters;
pub mod sea_orm_active_enums;

pub use sea_orm_active_enums::{Fuel, LabelError, Unit};
