use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set,
    TransactionTrait, sea_query::OnConflict,
};
use serde::Deserialize;
use std::collections::BTreeSet;

use super::parse::{parse_id, parse_timestamp, parse_value};
use crate::entity::{Fuel, LabelError, Unit, buildings, meter_readings, meters};

/// Batch size for bulk inserts
const BATCH_SIZE: usize = 1000;

/// `id, name`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildingRow {
    pub id: String,
    pub name: String,
}

/// `building id, id, fuel, unit`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeterRow {
    pub building_id: String,
    pub meter_id: String,
    pub fuel: String,
    pub unit: String,
}

/// `consumption, meter id, date time`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeterReadingRow {
    pub value: String,
    pub meter_id: String,
    pub date_time: String,
}

/// Why an upload was rejected. Every variant means nothing was written.
///
/// `row` is the 1-based position of the offending data row (header excluded).
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("row {row}: {field} '{value}' is not a whole number")]
    MalformedNumber {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {row}: building {building_id} does not exist")]
    BuildingNotFound { row: usize, building_id: i32 },

    #[error("meter {0} does not exist")]
    MeterNotFound(i32),

    #[error("row {row}: {source}")]
    UnrecognizedLabel { row: usize, source: LabelError },

    #[error("row {row}: '{value}' is not a valid date time")]
    InvalidTimestamp { row: usize, value: String },

    #[error("row {row}: value '{value}' is invalid ({reason})")]
    InvalidValue {
        row: usize,
        value: String,
        reason: &'static str,
    },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

fn number(row: usize, field: &'static str, raw: &str) -> Result<i32, UploadError> {
    parse_id(raw).ok_or_else(|| UploadError::MalformedNumber {
        row,
        field,
        value: raw.to_string(),
    })
}

/// Commit `txn` if `result` succeeded, roll it back otherwise.
async fn finish<T>(
    txn: DatabaseTransaction,
    result: Result<T, UploadError>,
) -> Result<T, UploadError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(error = %rollback_err, "Failed to roll back upload");
            }
            Err(e)
        }
    }
}

/// Create or rename buildings by id.
///
/// Rows with an empty id are skipped. Returns the number of buildings written.
///
/// # Errors
///
/// Any malformed id aborts the whole batch; no building is written.
pub async fn upload_buildings<C: TransactionTrait>(
    db: &C,
    rows: &[BuildingRow],
) -> Result<usize, UploadError> {
    let txn = db.begin().await?;
    let result = write_buildings(&txn, rows).await;
    finish(txn, result).await
}

async fn write_buildings(
    txn: &DatabaseTransaction,
    rows: &[BuildingRow],
) -> Result<usize, UploadError> {
    let mut written = 0;

    for (i, row) in rows.iter().enumerate() {
        if row.id.trim().is_empty() {
            continue;
        }
        let id = number(i + 1, "building id", &row.id)?;

        let building = buildings::ActiveModel {
            id: Set(id),
            name: Set(row.name.clone()),
        };
        buildings::Entity::insert(building)
            .on_conflict(
                OnConflict::column(buildings::Column::Id)
                    .update_column(buildings::Column::Name)
                    .to_owned(),
            )
            .exec_without_returning(txn)
            .await?;
        written += 1;
    }

    tracing::debug!(written, "Buildings written");
    Ok(written)
}

/// Create or update meters by id.
///
/// Every row's building must exist and its fuel and unit labels must be known,
/// even when the meter id is empty (such rows are otherwise skipped).
///
/// # Errors
///
/// A missing building, malformed id or unknown label aborts the whole batch.
pub async fn upload_meters<C: TransactionTrait>(
    db: &C,
    rows: &[MeterRow],
) -> Result<usize, UploadError> {
    let txn = db.begin().await?;
    let result = write_meters(&txn, rows).await;
    finish(txn, result).await
}

async fn write_meters(txn: &DatabaseTransaction, rows: &[MeterRow]) -> Result<usize, UploadError> {
    let mut written = 0;

    for (i, row) in rows.iter().enumerate() {
        let row_no = i + 1;

        let building_id = number(row_no, "building id", &row.building_id)?;
        let building = buildings::Entity::find_by_id(building_id)
            .one(txn)
            .await?
            .ok_or(UploadError::BuildingNotFound {
                row: row_no,
                building_id,
            })?;

        let fuel = Fuel::from_label(&row.fuel)
            .map_err(|source| UploadError::UnrecognizedLabel { row: row_no, source })?;
        let unit = Unit::from_label(&row.unit)
            .map_err(|source| UploadError::UnrecognizedLabel { row: row_no, source })?;

        if row.meter_id.trim().is_empty() {
            continue;
        }
        let meter_id = number(row_no, "meter id", &row.meter_id)?;

        let meter = meters::ActiveModel {
            id: Set(meter_id),
            building_id: Set(building.id),
            fuel: Set(fuel),
            unit: Set(unit),
        };
        meters::Entity::insert(meter)
            .on_conflict(
                OnConflict::column(meters::Column::Id)
                    .update_columns([
                        meters::Column::BuildingId,
                        meters::Column::Fuel,
                        meters::Column::Unit,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(txn)
            .await?;
        written += 1;
    }

    tracing::debug!(written, "Meters written");
    Ok(written)
}

/// A validated reading row, ready to insert.
#[derive(Debug, Clone, PartialEq)]
struct ParsedReading {
    value: Decimal,
    meter_id: i32,
    date_time: DateTime<Utc>,
}

/// Replace the entire reading set with `rows`.
///
/// Rows are validated before the transaction opens; inside it, every
/// referenced meter is checked, all existing readings are deleted and the new
/// ones inserted in batches.
///
/// # Errors
///
/// Any invalid row or unknown meter aborts the upload with the previous
/// readings left untouched.
pub async fn upload_meter_readings<C: TransactionTrait>(
    db: &C,
    rows: &[MeterReadingRow],
) -> Result<usize, UploadError> {
    let readings = rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_reading(i + 1, row))
        .collect::<Result<Vec<_>, _>>()?;

    let txn = db.begin().await?;
    let result = replace_readings(&txn, &readings).await;
    finish(txn, result).await
}

fn parse_reading(row_no: usize, row: &MeterReadingRow) -> Result<ParsedReading, UploadError> {
    let value = parse_value(&row.value).map_err(|reason| UploadError::InvalidValue {
        row: row_no,
        value: row.value.clone(),
        reason,
    })?;
    let meter_id = number(row_no, "meter id", &row.meter_id)?;
    let date_time =
        parse_timestamp(&row.date_time).ok_or_else(|| UploadError::InvalidTimestamp {
            row: row_no,
            value: row.date_time.clone(),
        })?;

    Ok(ParsedReading {
        value,
        meter_id,
        date_time,
    })
}

async fn replace_readings(
    txn: &DatabaseTransaction,
    readings: &[ParsedReading],
) -> Result<usize, UploadError> {
    let referenced: BTreeSet<i32> = readings.iter().map(|r| r.meter_id).collect();

    if !referenced.is_empty() {
        let known: BTreeSet<i32> = meters::Entity::find()
            .filter(meters::Column::Id.is_in(referenced.iter().copied()))
            .all(txn)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        if let Some(missing) = referenced.difference(&known).next() {
            return Err(UploadError::MeterNotFound(*missing));
        }
    }

    let deleted = meter_readings::Entity::delete_many().exec(txn).await?;

    for chunk in readings.chunks(BATCH_SIZE) {
        let models = chunk.iter().map(|r| meter_readings::ActiveModel {
            id: NotSet,
            value: Set(r.value),
            meter_id: Set(r.meter_id),
            date_time: Set(r.date_time),
        });
        meter_readings::Entity::insert_many(models)
            .exec_without_returning(txn)
            .await?;
    }

    tracing::debug!(
        deleted = deleted.rows_affected,
        inserted = readings.len(),
        "Meter readings replaced"
    );
    Ok(readings.len())
}
