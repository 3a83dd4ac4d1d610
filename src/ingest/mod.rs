//! CSV ingestion: turns uploaded files into building, meter and reading writes.
//!
//! Each file is one [`UploadKind`]. The first line is a header and is always
//! discarded; remaining rows are read by position, so header wording does not
//! matter. Each upload function runs in its own transaction, so a failing file
//! never leaves partial data behind and never affects other files.

mod parse;
pub mod uploaders;

use sea_orm::TransactionTrait;
use serde::de::DeserializeOwned;

pub use parse::{parse_id, parse_timestamp, parse_value};
pub use uploaders::{
    BuildingRow, MeterReadingRow, MeterRow, UploadError, upload_buildings,
    upload_meter_readings, upload_meters,
};

/// Message shown for files that are not `.csv`
pub const NOT_CSV_MESSAGE: &str =
    "Your data upload was unsuccessful. Make sure you are uploading a csv file";

/// The three upload forms, in the order their files are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UploadKind {
    Buildings,
    Meters,
    MeterReadings,
}

impl UploadKind {
    pub const ALL: [Self; 3] = [Self::Buildings, Self::Meters, Self::MeterReadings];

    /// Multipart field carrying this kind of file
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Buildings => "building_data",
            Self::Meters => "meter_data",
            Self::MeterReadings => "meter_reading_data",
        }
    }

    #[must_use]
    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.field_name() == name)
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Buildings => "Building",
            Self::Meters => "Meter",
            Self::MeterReadings => "Meter Reading",
        }
    }

    /// Expected columns, as shown on the upload form
    #[must_use]
    pub fn columns(self) -> &'static str {
        match self {
            Self::Buildings => "id, name",
            Self::Meters => "building id, id, fuel, unit",
            Self::MeterReadings => "consumption, meter id, date time",
        }
    }

    #[must_use]
    pub fn warning(self) -> Option<&'static str> {
        match self {
            Self::MeterReadings => {
                Some("This will overwrite all meter reading data in the system.")
            }
            _ => None,
        }
    }

    /// Page listing what this kind of upload writes
    #[must_use]
    pub fn view_path(self) -> &'static str {
        match self {
            Self::Buildings => "/buildings",
            Self::Meters => "/meters",
            Self::MeterReadings => "/meter_readings",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("'{0}' is not a .csv file")]
    NotCsv(String),

    #[error("file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("file is empty")]
    Empty,

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Read data rows by position, skipping the header line.
///
/// Fields are trimmed and `|` is the quote character.
///
/// # Errors
///
/// Returns `IngestError::Empty` when there is no header line, or
/// `IngestError::Csv` for a malformed or short row.
pub fn parse_rows<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote(b'|')
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    if records.next().transpose()?.is_none() {
        return Err(IngestError::Empty);
    }

    records
        .map(|record| -> Result<T, IngestError> { Ok(record?.deserialize(None)?) })
        .collect()
}

/// Validate, parse and write one uploaded file. Returns the number of rows written.
///
/// # Errors
///
/// Returns an error if the file is not a `.csv`, cannot be decoded or parsed,
/// or the upload function rejects it. Nothing is written in any error case.
pub async fn ingest_csv<C: TransactionTrait>(
    db: &C,
    kind: UploadKind,
    file_name: &str,
    bytes: &[u8],
) -> Result<usize, IngestError> {
    if !file_name.ends_with(".csv") {
        return Err(IngestError::NotCsv(file_name.to_string()));
    }

    let text = std::str::from_utf8(bytes)?;

    let written = match kind {
        UploadKind::Buildings => upload_buildings(db, &parse_rows::<BuildingRow>(text)?).await?,
        UploadKind::Meters => upload_meters(db, &parse_rows::<MeterRow>(text)?).await?,
        UploadKind::MeterReadings => {
            upload_meter_readings(db, &parse_rows::<MeterReadingRow>(text)?).await?
        }
    };
    Ok(written)
}

/// Result of one file from a multi-file submission.
#[derive(Debug)]
pub struct UploadOutcome {
    pub kind: UploadKind,
    pub file_name: String,
    pub result: Result<usize, IngestError>,
}

impl UploadOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    #[must_use]
    pub fn rows(&self) -> Option<usize> {
        self.result.as_ref().ok().copied()
    }

    /// Operator-facing result line
    #[must_use]
    pub fn message(&self) -> String {
        match &self.result {
            Ok(1) => "Success! Uploaded 1 row.".to_string(),
            Ok(n) => format!("Success! Uploaded {n} rows."),
            Err(IngestError::NotCsv(_)) => NOT_CSV_MESSAGE.to_string(),
            Err(e) => format!("Unsuccessful upload attempt: {e}"),
        }
    }
}
