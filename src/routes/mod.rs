pub mod buildings;
pub mod charts;
pub mod health;
pub mod meter_readings;
pub mod meters;
pub mod pages;
pub mod uploads;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use sea_orm::{DatabaseConnection, EntityTrait};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::entity::{buildings as building_entity, meters as meter_entity};
use crate::error::{AppError, AppResult};

/// Look up a building by id
pub async fn resolve_building(
    db: &DatabaseConnection,
    id: i32,
) -> AppResult<building_entity::Model> {
    building_entity::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Building '{id}' not found")))
}

/// Look up a meter by id
pub async fn resolve_meter(db: &DatabaseConnection, id: i32) -> AppResult<meter_entity::Model> {
    meter_entity::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Meter '{id}' not found")))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        buildings::list_buildings,
        buildings::get_building,
        meters::list_meters,
        meters::get_meter,
        meter_readings::list_meter_readings,
        charts::daily_consumption,
        uploads::upload_files,
    ),
    components(
        schemas(
            buildings::BuildingResponse,
            meters::MeterResponse,
            meter_readings::MeterReadingResponse,
            crate::reports::ChartData,
            crate::reports::ChartDataset,
            uploads::UploadResultResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "buildings", description = "Buildings"),
        (name = "meters", description = "Meters and their fuel and unit"),
        (name = "meter_readings", description = "Raw consumption readings"),
        (name = "charts", description = "Aggregated consumption"),
        (name = "uploads", description = "CSV data uploads"),
    ),
    info(
        title = "Energy Consumption API",
        description = "Building energy and water consumption from uploaded meter data",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    tracing::info!(max_upload_bytes = upload_limit, "Upload size limit configured");

    let api_routes = Router::new()
        .route("/buildings", get(buildings::list_buildings))
        .route("/buildings/{building_id}", get(buildings::get_building))
        .route("/meters", get(meters::list_meters))
        .route("/meters/{meter_id}", get(meters::get_meter))
        .route("/meter_readings", get(meter_readings::list_meter_readings))
        .route("/charts/daily_consumption", get(charts::daily_consumption))
        .route("/uploads", post(uploads::upload_files));

    let page_routes = Router::new()
        .route("/", get(pages::index))
        .route(
            "/data_upload",
            get(pages::data_upload_form).post(pages::data_upload),
        )
        .route("/buildings", get(pages::building_list))
        .route("/buildings/{building_id}", get(pages::building_detail))
        .route("/meters", get(pages::meter_list))
        .route("/meters/{meter_id}", get(pages::meter_detail))
        .route("/meter_readings", get(pages::meter_reading_list))
        .route("/water_chart", get(charts::daily_consumption));

    // Health check routes
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_limit))
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
