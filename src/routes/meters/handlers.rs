use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::common::AppState;
use crate::entity::meters;
use crate::error::AppResult;
use crate::routes::resolve_meter;

use super::types::MeterResponse;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MetersQuery {
    /// Filter by building ID
    pub building_id: Option<i32>,
}

pub(crate) async fn fetch_meters(
    db: &DatabaseConnection,
    building_id: Option<i32>,
) -> AppResult<Vec<meters::Model>> {
    let mut db_query = meters::Entity::find();

    if let Some(building_id) = building_id {
        db_query = db_query.filter(meters::Column::BuildingId.eq(building_id));
    }

    Ok(db_query
        .order_by_asc(meters::Column::Id)
        .all(db)
        .await?)
}

/// List all meters
#[utoipa::path(
    get,
    path = "/api/meters",
    params(MetersQuery),
    responses(
        (status = 200, description = "Meters retrieved successfully", body = Vec<MeterResponse>),
    ),
    tag = "meters"
)]
pub async fn list_meters(
    State(state): State<AppState>,
    Query(query): Query<MetersQuery>,
) -> AppResult<Json<Vec<MeterResponse>>> {
    let response = fetch_meters(&state.db, query.building_id)
        .await?
        .into_iter()
        .map(MeterResponse::from)
        .collect();

    Ok(Json(response))
}

/// Get a specific meter by ID
#[utoipa::path(
    get,
    path = "/api/meters/{meter_id}",
    params(
        ("meter_id" = i32, Path, description = "Meter ID"),
    ),
    responses(
        (status = 200, description = "Meter retrieved successfully", body = MeterResponse),
        (status = 404, description = "Meter not found"),
    ),
    tag = "meters"
)]
pub async fn get_meter(
    State(state): State<AppState>,
    Path(meter_id): Path<i32>,
) -> AppResult<Json<MeterResponse>> {
    let meter = resolve_meter(&state.db, meter_id).await?;
    Ok(Json(meter.into()))
}
