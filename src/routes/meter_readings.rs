use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::AppState;
use crate::entity::meter_readings;
use crate::error::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct MeterReadingResponse {
    pub id: i32,
    pub meter_id: i32,
    pub value: Decimal,
    pub date_time: DateTime<Utc>,
}

impl From<meter_readings::Model> for MeterReadingResponse {
    fn from(r: meter_readings::Model) -> Self {
        Self {
            id: r.id,
            meter_id: r.meter_id,
            value: r.value,
            date_time: r.date_time,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MeterReadingsQuery {
    /// Filter by meter ID
    pub meter_id: Option<i32>,
}

/// Readings ordered by time, then meter
pub(crate) async fn fetch_meter_readings(
    db: &DatabaseConnection,
    meter_id: Option<i32>,
) -> AppResult<Vec<meter_readings::Model>> {
    let mut db_query = meter_readings::Entity::find();

    if let Some(meter_id) = meter_id {
        db_query = db_query.filter(meter_readings::Column::MeterId.eq(meter_id));
    }

    Ok(db_query
        .order_by_asc(meter_readings::Column::DateTime)
        .order_by_asc(meter_readings::Column::MeterId)
        .all(db)
        .await?)
}

/// List meter readings
#[utoipa::path(
    get,
    path = "/api/meter_readings",
    params(MeterReadingsQuery),
    responses(
        (status = 200, description = "Meter readings retrieved successfully", body = Vec<MeterReadingResponse>),
    ),
    tag = "meter_readings"
)]
pub async fn list_meter_readings(
    State(state): State<AppState>,
    Query(query): Query<MeterReadingsQuery>,
) -> AppResult<Json<Vec<MeterReadingResponse>>> {
    let response = fetch_meter_readings(&state.db, query.meter_id)
        .await?
        .into_iter()
        .map(MeterReadingResponse::from)
        .collect();

    Ok(Json(response))
}
