use serde::Serialize;
use utoipa::ToSchema;

use crate::entity::buildings;

#[derive(Debug, Serialize, ToSchema)]
pub struct BuildingResponse {
    pub id: i32,
    pub name: String,
}

impl From<buildings::Model> for BuildingResponse {
    fn from(b: buildings::Model) -> Self {
        Self {
            id: b.id,
            name: b.name,
        }
    }
}
