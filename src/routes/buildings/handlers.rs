use axum::{
    Json,
    extract::{Path, State},
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::common::AppState;
use crate::entity::buildings;
use crate::error::AppResult;
use crate::routes::resolve_building;

use super::types::BuildingResponse;

/// All buildings ordered by id
pub(crate) async fn fetch_buildings(db: &DatabaseConnection) -> AppResult<Vec<buildings::Model>> {
    Ok(buildings::Entity::find()
        .order_by_asc(buildings::Column::Id)
        .all(db)
        .await?)
}

/// List all buildings
#[utoipa::path(
    get,
    path = "/api/buildings",
    responses(
        (status = 200, description = "Buildings retrieved successfully", body = Vec<BuildingResponse>),
    ),
    tag = "buildings"
)]
pub async fn list_buildings(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BuildingResponse>>> {
    let response = fetch_buildings(&state.db)
        .await?
        .into_iter()
        .map(BuildingResponse::from)
        .collect();

    Ok(Json(response))
}

/// Get a specific building by ID
#[utoipa::path(
    get,
    path = "/api/buildings/{building_id}",
    params(
        ("building_id" = i32, Path, description = "Building ID"),
    ),
    responses(
        (status = 200, description = "Building retrieved successfully", body = BuildingResponse),
        (status = 404, description = "Building not found"),
    ),
    tag = "buildings"
)]
pub async fn get_building(
    State(state): State<AppState>,
    Path(building_id): Path<i32>,
) -> AppResult<Json<BuildingResponse>> {
    let building = resolve_building(&state.db, building_id).await?;
    Ok(Json(building.into()))
}
