//! Daily consumption per building, shaped for a Chart.js dataset list.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    ConnectionTrait, EntityTrait, FromQueryResult, JoinType, QueryOrder, QuerySelect,
    RelationTrait,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use utoipa::ToSchema;

use crate::entity::{buildings, meter_readings, meters};

/// One reading joined to the building that owns its meter.
#[derive(Debug, Clone, FromQueryResult)]
pub struct BuildingReading {
    pub building_id: i32,
    pub building_name: String,
    pub value: Decimal,
    pub date_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartData {
    /// Distinct reading dates, ascending
    #[schema(value_type = Vec<String>)]
    pub labels: Vec<NaiveDate>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    /// Building name
    pub label: String,
    /// Daily totals, index-aligned with `labels` (null where the building has no readings)
    pub data: Vec<Option<Decimal>>,
    pub background_color: String,
    pub fill: bool,
}

/// Load every reading together with its building.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn load_building_readings<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<BuildingReading>, sea_orm::DbErr> {
    meter_readings::Entity::find()
        .select_only()
        .column(meter_readings::Column::Value)
        .column(meter_readings::Column::DateTime)
        .column_as(buildings::Column::Id, "building_id")
        .column_as(buildings::Column::Name, "building_name")
        .join(JoinType::InnerJoin, meter_readings::Relation::Meter.def())
        .join(JoinType::InnerJoin, meters::Relation::Building.def())
        .order_by_asc(meter_readings::Column::DateTime)
        .into_model::<BuildingReading>()
        .all(db)
        .await
}

/// Sum readings per building per calendar date (UTC).
///
/// `colour` is called once per building, in building id order.
pub fn daily_consumption<I, F>(readings: I, mut colour: F) -> ChartData
where
    I: IntoIterator<Item = BuildingReading>,
    F: FnMut() -> String,
{
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    // building_id -> (name, date -> total)
    let mut per_building: BTreeMap<i32, (String, BTreeMap<NaiveDate, Decimal>)> = BTreeMap::new();

    for reading in readings {
        let date = reading.date_time.date_naive();
        dates.insert(date);

        let (_, totals) = per_building
            .entry(reading.building_id)
            .or_insert_with(|| (reading.building_name, BTreeMap::new()));
        *totals.entry(date).or_default() += reading.value;
    }

    let labels: Vec<NaiveDate> = dates.into_iter().collect();

    let datasets = per_building
        .into_values()
        .map(|(name, totals)| ChartDataset {
            label: name,
            data: labels.iter().map(|date| totals.get(date).copied()).collect(),
            background_color: colour(),
            fill: false,
        })
        .collect();

    ChartData { labels, datasets }
}

/// A random, semi-transparent `rgba(...)` colour.
#[must_use]
pub fn random_colour() -> String {
    let mut rng = rand::rng();
    format!(
        "rgba({}, {}, {}, 0.6)",
        rng.random::<u8>(),
        rng.random::<u8>(),
        rng.random::<u8>()
    )
}

/// Build the chart from the current contents of the database.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn build_daily_consumption<C: ConnectionTrait>(
    db: &C,
) -> Result<ChartData, sea_orm::DbErr> {
    let readings = load_building_readings(db).await?;
    Ok(daily_consumption(readings, random_colour))
}
