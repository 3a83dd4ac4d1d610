//! Integration tests for the three upload functions against SQLite.
//!
//! Run with: cargo test --test uploaders_test

mod common;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use std::str::FromStr;

use energy_consumption::entity::{Fuel, Unit, buildings, meter_readings, meters};
use energy_consumption::ingest::{
    BuildingRow, MeterReadingRow, MeterRow, UploadError, upload_buildings,
    upload_meter_readings, upload_meters,
};

fn building(id: &str, name: &str) -> BuildingRow {
    BuildingRow {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn meter(building_id: &str, meter_id: &str, fuel: &str, unit: &str) -> MeterRow {
    MeterRow {
        building_id: building_id.to_string(),
        meter_id: meter_id.to_string(),
        fuel: fuel.to_string(),
        unit: unit.to_string(),
    }
}

fn reading(value: &str, meter_id: &str, date_time: &str) -> MeterReadingRow {
    MeterReadingRow {
        value: value.to_string(),
        meter_id: meter_id.to_string(),
        date_time: date_time.to_string(),
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn all_buildings(db: &DatabaseConnection) -> Vec<buildings::Model> {
    buildings::Entity::find()
        .order_by_asc(buildings::Column::Id)
        .all(db)
        .await
        .unwrap()
}

async fn all_meters(db: &DatabaseConnection) -> Vec<meters::Model> {
    meters::Entity::find()
        .order_by_asc(meters::Column::Id)
        .all(db)
        .await
        .unwrap()
}

async fn all_readings(db: &DatabaseConnection) -> Vec<meter_readings::Model> {
    meter_readings::Entity::find()
        .order_by_asc(meter_readings::Column::DateTime)
        .all(db)
        .await
        .unwrap()
}

/// Two buildings, one meter in each.
async fn seed(db: &DatabaseConnection) {
    upload_buildings(db, &[building("1", "Library"), building("2", "Gym")])
        .await
        .unwrap();
    upload_meters(
        db,
        &[
            meter("1", "10", "Water", "m3"),
            meter("2", "20", "Electricity", "kWh"),
        ],
    )
    .await
    .unwrap();
}

// ============================================================================
// Buildings
// ============================================================================

#[tokio::test]
async fn buildings_are_created() {
    let db = common::setup_db().await;

    let written = upload_buildings(&db, &[building("1", "Library"), building("2", "Gym")])
        .await
        .unwrap();

    assert_eq!(written, 2);
    let stored = all_buildings(&db).await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, 1);
    assert_eq!(stored[0].name, "Library");
    assert_eq!(stored[1].name, "Gym");
}

#[tokio::test]
async fn malformed_building_id_writes_nothing() {
    let db = common::setup_db().await;

    let err = upload_buildings(&db, &[building("1", "Library"), building("Wrong format", "Gym")])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UploadError::MalformedNumber { row: 2, field: "building id", .. }
    ));
    assert!(all_buildings(&db).await.is_empty());
}

#[tokio::test]
async fn existing_building_is_renamed_in_place() {
    let db = common::setup_db().await;
    upload_buildings(&db, &[building("1", "Library")]).await.unwrap();

    upload_buildings(&db, &[building("1", "Main Library")])
        .await
        .unwrap();

    let stored = all_buildings(&db).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Main Library");
}

#[tokio::test]
async fn rows_with_empty_building_id_are_skipped() {
    let db = common::setup_db().await;

    let written = upload_buildings(&db, &[building("", "Nowhere"), building("3", "Hall")])
        .await
        .unwrap();

    assert_eq!(written, 1);
    let stored = all_buildings(&db).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, 3);
}

// ============================================================================
// Meters
// ============================================================================

#[tokio::test]
async fn meters_are_created_with_fuel_and_unit() {
    let db = common::setup_db().await;
    upload_buildings(&db, &[building("1", "Library")]).await.unwrap();

    let written = upload_meters(
        &db,
        &[
            meter("1", "10", "Water", "m3"),
            meter("1", "11", "Natural Gas", "kWh"),
        ],
    )
    .await
    .unwrap();

    assert_eq!(written, 2);
    let stored = all_meters(&db).await;
    assert_eq!(stored[0].building_id, 1);
    assert_eq!(stored[0].fuel, Fuel::Water);
    assert_eq!(stored[0].unit, Unit::CubicMetres);
    assert_eq!(stored[1].fuel, Fuel::NaturalGas);
    assert_eq!(stored[1].unit, Unit::KilowattHours);
}

#[tokio::test]
async fn meter_for_missing_building_writes_nothing() {
    let db = common::setup_db().await;
    upload_buildings(&db, &[building("1", "Library")]).await.unwrap();

    let err = upload_meters(
        &db,
        &[meter("1", "10", "Water", "m3"), meter("99", "11", "Water", "m3")],
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        UploadError::BuildingNotFound { row: 2, building_id: 99 }
    ));
    assert!(all_meters(&db).await.is_empty());
}

#[tokio::test]
async fn unknown_fuel_or_unit_label_writes_nothing() {
    let db = common::setup_db().await;
    upload_buildings(&db, &[building("1", "Library")]).await.unwrap();

    let err = upload_meters(
        &db,
        &[meter("1", "10", "Water", "m3"), meter("1", "11", "Steam", "m3")],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, UploadError::UnrecognizedLabel { row: 2, .. }));
    assert!(err.to_string().contains("Steam"));

    let err = upload_meters(
        &db,
        &[meter("1", "10", "Water", "m3"), meter("1", "11", "Water", "litres")],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, UploadError::UnrecognizedLabel { row: 2, .. }));

    assert!(all_meters(&db).await.is_empty());
}

#[tokio::test]
async fn existing_meter_is_updated() {
    let db = common::setup_db().await;
    seed(&db).await;

    upload_meters(&db, &[meter("2", "10", "Natural Gas", "kWh")])
        .await
        .unwrap();

    let stored = all_meters(&db).await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, 10);
    assert_eq!(stored[0].building_id, 2);
    assert_eq!(stored[0].fuel, Fuel::NaturalGas);
}

#[tokio::test]
async fn meter_rows_without_id_are_validated_then_skipped() {
    let db = common::setup_db().await;
    upload_buildings(&db, &[building("1", "Library")]).await.unwrap();

    let written = upload_meters(&db, &[meter("1", "", "Water", "m3")])
        .await
        .unwrap();
    assert_eq!(written, 0);

    let err = upload_meters(&db, &[meter("1", "", "Steam", "m3")])
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::UnrecognizedLabel { .. }));
}

// ============================================================================
// Meter readings
// ============================================================================

#[tokio::test]
async fn readings_replace_everything() {
    let db = common::setup_db().await;
    seed(&db).await;

    upload_meter_readings(
        &db,
        &[
            reading("1.5", "10", "2020-01-01 00:00"),
            reading("2.5", "20", "2020-01-01 00:30"),
        ],
    )
    .await
    .unwrap();

    let written = upload_meter_readings(&db, &[reading("7.25", "20", "2020-02-01 12:00")])
        .await
        .unwrap();

    assert_eq!(written, 1);
    let stored = all_readings(&db).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].meter_id, 20);
    assert_eq!(stored[0].value.round_dp(6), dec("7.25"));
    assert_eq!(
        stored[0].date_time,
        Utc.with_ymd_and_hms(2020, 2, 1, 12, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn new_readings_leave_only_the_uploaded_rows() {
    let db = common::setup_db().await;
    seed(&db).await;
    upload_meter_readings(&db, &[reading("1", "10", "2010-01-01T00:00")])
        .await
        .unwrap();

    upload_meter_readings(
        &db,
        &[
            reading("100.1", "10", "2020-01-01 00:00"),
            reading("200.2", "10", "2020-01-01 00:30"),
        ],
    )
    .await
    .unwrap();

    let stored = all_readings(&db).await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].value.round_dp(6), dec("100.1"));
    assert_eq!(
        stored[0].date_time,
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(stored[1].value.round_dp(6), dec("200.2"));
    assert_eq!(
        stored[1].date_time,
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 30, 0).unwrap()
    );
}

#[tokio::test]
async fn invalid_timestamp_keeps_previous_readings() {
    let db = common::setup_db().await;
    seed(&db).await;
    upload_meter_readings(&db, &[reading("1.5", "10", "2020-01-01 00:00")])
        .await
        .unwrap();

    let err = upload_meter_readings(
        &db,
        &[
            reading("3", "10", "2020-01-02 00:00"),
            reading("4", "10", "not a time"),
        ],
    )
    .await
    .unwrap_err();

    assert!(matches!(err, UploadError::InvalidTimestamp { row: 2, .. }));
    let stored = all_readings(&db).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].value.round_dp(6), dec("1.5"));
}

#[tokio::test]
async fn unknown_meter_keeps_previous_readings() {
    let db = common::setup_db().await;
    seed(&db).await;
    upload_meter_readings(&db, &[reading("1.5", "10", "2020-01-01 00:00")])
        .await
        .unwrap();

    let err = upload_meter_readings(
        &db,
        &[
            reading("3", "10", "2020-01-02 00:00"),
            reading("4", "404", "2020-01-02 00:30"),
        ],
    )
    .await
    .unwrap_err();

    assert!(matches!(err, UploadError::MeterNotFound(404)));
    assert_eq!(all_readings(&db).await.len(), 1);
}

#[tokio::test]
async fn malformed_value_keeps_previous_readings() {
    let db = common::setup_db().await;
    seed(&db).await;
    upload_meter_readings(&db, &[reading("1.5", "10", "2020-01-01 00:00")])
        .await
        .unwrap();

    let err = upload_meter_readings(&db, &[reading("lots", "10", "2020-01-02 00:00")])
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::InvalidValue { row: 1, .. }));

    let err = upload_meter_readings(&db, &[reading("1000000", "10", "2020-01-02 00:00")])
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::InvalidValue { row: 1, .. }));

    assert_eq!(all_readings(&db).await.len(), 1);
}

#[tokio::test]
async fn values_are_rounded_to_six_places() {
    let db = common::setup_db().await;
    seed(&db).await;

    upload_meter_readings(&db, &[reading("1.23456789", "10", "2020-01-01 00:00")])
        .await
        .unwrap();

    let stored = all_readings(&db).await;
    assert_eq!(stored[0].value.round_dp(6), dec("1.234568"));
}

#[tokio::test]
async fn empty_reading_upload_clears_readings() {
    let db = common::setup_db().await;
    seed(&db).await;
    upload_meter_readings(&db, &[reading("1.5", "10", "2020-01-01 00:00")])
        .await
        .unwrap();

    let written = upload_meter_readings(&db, &[]).await.unwrap();

    assert_eq!(written, 0);
    assert!(all_readings(&db).await.is_empty());
}

#[tokio::test]
async fn large_reading_sets_are_inserted_in_batches() {
    let db = common::setup_db().await;
    seed(&db).await;

    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let rows: Vec<MeterReadingRow> = (0..2500)
        .map(|i| {
            let at = start + chrono::Duration::minutes(30 * i);
            reading("0.5", "10", &at.format("%Y-%m-%d %H:%M").to_string())
        })
        .collect();

    let written = upload_meter_readings(&db, &rows).await.unwrap();

    assert_eq!(written, 2500);
    assert_eq!(all_readings(&db).await.len(), 2500);
}
