//! Operator-facing HTML pages: the chart, the upload form and the data lists.

mod html;

use axum::{
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use std::fmt::Write;

use crate::common::AppState;
use crate::entity::buildings as building_entity;
use crate::error::{AppError, AppResult};
use crate::ingest::{UploadKind, UploadOutcome};
use crate::routes::buildings::fetch_buildings;
use crate::routes::meter_readings::fetch_meter_readings;
use crate::routes::meters::fetch_meters;
use crate::routes::uploads::{collect_files, process_files};
use crate::routes::{resolve_building, resolve_meter};

pub use html::escape;
use html::{link, page, table};

const CHART_BODY: &str = r##"
<div class="card">
    <canvas id="consumption-chart" height="120"></canvas>
    <p id="chart-status" class="empty">Loading chart...</p>
</div>
<script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
<script>
    const status = document.getElementById('chart-status');

    fetch('/water_chart')
        .then(res => {
            if (!res.ok) throw new Error(`HTTP ${res.status}`);
            return res.json();
        })
        .then(chart => {
            if (chart.datasets.length === 0) {
                status.textContent = 'No meter readings uploaded yet.';
                return;
            }
            status.remove();
            new Chart(document.getElementById('consumption-chart'), {
                type: 'bar',
                data: chart,
                options: {
                    responsive: true,
                    scales: { y: { beginAtZero: true } },
                },
            });
        })
        .catch(err => {
            status.textContent = `Failed to load chart: ${err.message}`;
        });
</script>
"##;

fn not_found(message: &str) -> Response {
    let body = format!(r#"<p class="empty">{}</p>"#, escape(message));
    (StatusCode::NOT_FOUND, Html(page("Not found", &body))).into_response()
}

/// Daily consumption chart
pub async fn index() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Html(page("Daily consumption", CHART_BODY)),
    )
}

fn upload_form(outcomes: &[UploadOutcome]) -> String {
    let mut body = String::from(
        r#"<form method="post" action="/data_upload" enctype="multipart/form-data">"#,
    );

    for kind in UploadKind::ALL {
        let _ = write!(
            body,
            r#"
<div class="card">
    <h2>{title} data</h2>
    <p class="columns">Columns: {columns} (the first line is treated as a header)</p>"#,
            title = kind.title(),
            columns = kind.columns(),
        );
        if let Some(warning) = kind.warning() {
            let _ = write!(body, r#"<p class="warning">{warning}</p>"#);
        }
        let _ = write!(
            body,
            r#"<input type="file" name="{field}" accept=".csv">"#,
            field = kind.field_name(),
        );

        for outcome in outcomes.iter().filter(|o| o.kind == kind) {
            let class = if outcome.is_success() { "ok" } else { "failed" };
            let _ = write!(
                body,
                r#"<p class="result {class}">{file}: {message}</p>"#,
                file = escape(&outcome.file_name),
                message = escape(&outcome.message()),
            );
            if outcome.is_success() {
                let _ = write!(body, "<p>{}</p>", link(kind.view_path(), "View data"));
            }
        }
        body.push_str("\n</div>");
    }

    body.push_str("\n<button type=\"submit\">Upload</button>\n</form>");
    body
}

/// Upload form
pub async fn data_upload_form() -> Html<String> {
    Html(page("Upload data", &upload_form(&[])))
}

/// Process submitted files and show one result line per file
pub async fn data_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Html<String>> {
    let files = collect_files(multipart).await?;
    let outcomes = process_files(&state, files).await;

    Ok(Html(page("Upload data", &upload_form(&outcomes))))
}

fn building_rows(buildings: &[building_entity::Model]) -> Vec<Vec<String>> {
    buildings
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                link(&format!("/buildings/{}", b.id), &b.name),
            ]
        })
        .collect()
}

/// All buildings
pub async fn building_list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let buildings = fetch_buildings(&state.db).await?;
    let body = table(&["Id", "Name"], &building_rows(&buildings));
    Ok(Html(page("Buildings", &body)))
}

fn meter_rows(meters: &[crate::entity::meters::Model]) -> Vec<Vec<String>> {
    meters
        .iter()
        .map(|m| {
            vec![
                link(&format!("/meters/{}", m.id), &m.id.to_string()),
                link(
                    &format!("/buildings/{}", m.building_id),
                    &m.building_id.to_string(),
                ),
                escape(m.fuel.label()),
                escape(m.unit.label()),
            ]
        })
        .collect()
}

/// One building and its meters
pub async fn building_detail(
    State(state): State<AppState>,
    Path(building_id): Path<i32>,
) -> AppResult<Response> {
    let building = match resolve_building(&state.db, building_id).await {
        Ok(building) => building,
        Err(AppError::NotFound(message)) => return Ok(not_found(&message)),
        Err(e) => return Err(e),
    };
    let meters = fetch_meters(&state.db, Some(building.id)).await?;

    let body = format!(
        "<p>Id: {id}</p>\n<h2>Meters</h2>\n{meters}",
        id = building.id,
        meters = table(&["Meter", "Building", "Fuel", "Unit"], &meter_rows(&meters)),
    );
    Ok(Html(page(&building.name, &body)).into_response())
}

/// All meters
pub async fn meter_list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let meters = fetch_meters(&state.db, None).await?;
    let body = table(&["Meter", "Building", "Fuel", "Unit"], &meter_rows(&meters));
    Ok(Html(page("Meters", &body)))
}

fn reading_rows(readings: &[crate::entity::meter_readings::Model]) -> Vec<Vec<String>> {
    readings
        .iter()
        .map(|r| {
            vec![
                link(&format!("/meters/{}", r.meter_id), &r.meter_id.to_string()),
                r.value.to_string(),
                r.date_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            ]
        })
        .collect()
}

/// One meter and its readings
pub async fn meter_detail(
    State(state): State<AppState>,
    Path(meter_id): Path<i32>,
) -> AppResult<Response> {
    let meter = match resolve_meter(&state.db, meter_id).await {
        Ok(meter) => meter,
        Err(AppError::NotFound(message)) => return Ok(not_found(&message)),
        Err(e) => return Err(e),
    };
    let readings = fetch_meter_readings(&state.db, Some(meter.id)).await?;

    let building = link(
        &format!("/buildings/{}", meter.building_id),
        &meter.building_id.to_string(),
    );
    let readings = table(
        &["Meter", "Consumption", "Date time (UTC)"],
        &reading_rows(&readings),
    );
    let body = format!(
        "<p>Building: {building}</p>\n\
         <p>Fuel: {fuel}</p>\n\
         <p>Unit: {unit}</p>\n\
         <h2>Readings</h2>\n{readings}",
        fuel = escape(meter.fuel.label()),
        unit = escape(meter.unit.label()),
    );
    Ok(Html(page(&format!("Meter {}", meter.id), &body)).into_response())
}

/// All meter readings
pub async fn meter_reading_list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let readings = fetch_meter_readings(&state.db, None).await?;
    let body = table(
        &["Meter", "Consumption", "Date time (UTC)"],
        &reading_rows(&readings),
    );
    Ok(Html(page("Meter readings", &body)))
}
