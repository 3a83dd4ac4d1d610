//! Integer-coded choices stored on `meters`, with their display labels.
//!
//! Uploaded sheets and rendered pages use the labels; the database stores the
//! codes. Label lookup is an exact, case-sensitive match.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Fuel {
    #[sea_orm(num_value = 0)]
    Water,
    #[sea_orm(num_value = 1)]
    NaturalGas,
    #[sea_orm(num_value = 2)]
    Electricity,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Unit {
    #[sea_orm(num_value = 0)]
    CubicMetres,
    #[sea_orm(num_value = 1)]
    KilowattHours,
}

/// A label that matches none of the known choices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind} label '{label}'")]
pub struct LabelError {
    pub kind: &'static str,
    pub label: String,
}

impl Fuel {
    const LABELS: [(Self, &'static str); 3] = [
        (Self::Water, "Water"),
        (Self::NaturalGas, "Natural Gas"),
        (Self::Electricity, "Electricity"),
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        Self::LABELS
            .iter()
            .find(|(fuel, _)| *fuel == self)
            .map_or("", |(_, label)| label)
    }

    /// # Errors
    ///
    /// Returns `LabelError` if `label` is not one of the fuel labels.
    pub fn from_label(label: &str) -> Result<Self, LabelError> {
        Self::LABELS
            .iter()
            .find(|(_, l)| *l == label)
            .map(|(fuel, _)| *fuel)
            .ok_or_else(|| LabelError {
                kind: "fuel",
                label: label.to_string(),
            })
    }
}

impl Unit {
    const LABELS: [(Self, &'static str); 2] =
        [(Self::CubicMetres, "m3"), (Self::KilowattHours, "kWh")];

    #[must_use]
    pub fn label(self) -> &'static str {
        Self::LABELS
            .iter()
            .find(|(unit, _)| *unit == self)
            .map_or("", |(_, label)| label)
    }

    /// # Errors
    ///
    /// Returns `LabelError` if `label` is not one of the unit labels.
    pub fn from_label(label: &str) -> Result<Self, LabelError> {
        Self::LABELS
            .iter()
            .find(|(_, l)| *l == label)
            .map(|(unit, _)| *unit)
            .ok_or_else(|| LabelError {
                kind: "unit",
                label: label.to_string(),
            })
    }
}
