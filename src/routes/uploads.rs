use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::AppResult;
use crate::ingest::{self, UploadKind, UploadOutcome};
use crate::services::cache;

/// One file taken from a multipart submission
#[derive(Debug)]
pub struct UploadedFile {
    pub kind: UploadKind,
    pub file_name: String,
    pub bytes: Bytes,
}

/// Collect the recognised file fields of a submission, in processing order.
///
/// Unknown fields are ignored, as are file inputs left empty by the browser.
pub async fn collect_files(mut multipart: Multipart) -> AppResult<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(kind) = field.name().and_then(UploadKind::from_field_name) else {
            continue;
        };
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        files.push(UploadedFile {
            kind,
            file_name,
            bytes,
        });
    }

    // Buildings before meters before readings, whatever the form order
    files.sort_by_key(|f| f.kind);
    Ok(files)
}

/// Ingest each file independently; a failure never stops the rest.
pub async fn process_files(state: &AppState, files: Vec<UploadedFile>) -> Vec<UploadOutcome> {
    let mut outcomes = Vec::with_capacity(files.len());

    for file in files {
        let result = ingest::ingest_csv(&state.db, file.kind, &file.file_name, &file.bytes).await;

        match &result {
            Ok(rows) => {
                tracing::info!(
                    kind = ?file.kind,
                    file_name = %file.file_name,
                    rows,
                    "Upload succeeded"
                );
                cache::invalidate_all(state);
            }
            Err(e) => {
                tracing::warn!(
                    kind = ?file.kind,
                    file_name = %file.file_name,
                    error = %e,
                    "Upload rejected"
                );
            }
        }

        outcomes.push(UploadOutcome {
            kind: file.kind,
            file_name: file.file_name,
            result,
        });
    }

    outcomes
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResultResponse {
    /// Form field the file was sent in
    pub field: String,
    pub file_name: String,
    pub success: bool,
    /// Rows written (absent on failure)
    pub rows: Option<usize>,
    pub message: String,
}

impl From<&UploadOutcome> for UploadResultResponse {
    fn from(o: &UploadOutcome) -> Self {
        Self {
            field: o.kind.field_name().to_string(),
            file_name: o.file_name.clone(),
            success: o.is_success(),
            rows: o.rows(),
            message: o.message(),
        }
    }
}

/// Upload CSV files
///
/// Multipart form with any of the fields `building_data` (`id, name`),
/// `meter_data` (`building id, id, fuel, unit`) and `meter_reading_data`
/// (`consumption, meter id, date time`). The first line of each file is a
/// header and is skipped. Each file is applied atomically and reported
/// separately. A meter reading upload replaces every existing reading.
#[utoipa::path(
    post,
    path = "/api/uploads",
    request_body(content_type = "multipart/form-data", description = "CSV files keyed by upload kind"),
    responses(
        (status = 200, description = "Per-file upload results", body = Vec<UploadResultResponse>),
        (status = 400, description = "Malformed multipart body"),
    ),
    tag = "uploads"
)]
pub async fn upload_files(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Vec<UploadResultResponse>>> {
    let files = collect_files(multipart).await?;
    let outcomes = process_files(&state, files).await;

    Ok(Json(outcomes.iter().map(UploadResultResponse::from).collect()))
}
