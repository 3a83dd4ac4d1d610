use axum::{Json, extract::State};

use crate::common::AppState;
use crate::error::AppResult;
use crate::reports::ChartData;
use crate::services::cache;

/// Daily consumption per building
///
/// Readings are summed per building per calendar day (UTC). Every dataset is
/// aligned with `labels`; days without readings for a building are `null`.
/// Colours are picked at random whenever the chart is rebuilt.
#[utoipa::path(
    get,
    path = "/api/charts/daily_consumption",
    responses(
        (status = 200, description = "Chart data computed successfully", body = ChartData),
    ),
    tag = "charts"
)]
pub async fn daily_consumption(State(state): State<AppState>) -> AppResult<Json<ChartData>> {
    let chart = cache::daily_consumption(&state).await?;
    Ok(Json(ChartData::clone(&chart)))
}
