//! CSV checkpoints written between pipeline stages.
//!
//! Each stage reads the previous stage's file and writes its own, so a run
//! can be resumed from any point.

use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::LedgerResult;

pub const MOVIE_INFO: &str = "df_imdb.csv";
pub const DOMESTIC_BOXOFFICE: &str = "domestic_boxoffice.csv";
pub const INTERNATIONAL_BOXOFFICE: &str = "international_boxoffice.csv";
pub const WORLDWIDE_BOXOFFICE: &str = "worldwide_boxoffice.csv";
pub const MOVIE_BUDGETS: &str = "movie_budgets.csv";
pub const CLEAN_AWARDS: &str = "kaggle_clean.csv";
pub const BOXOFFICE: &str = "boxoffice.csv";
pub const CLEAN_BUDGETS: &str = "movie_budgets_clean.csv";
pub const FINANCIAL_DATA: &str = "financial_data.csv";
pub const FINAL_DATASET: &str = "final_dataset.csv";

/// Write records as CSV with a header row, creating parent directories.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> LedgerResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_to(file, records)?;
    tracing::info!("wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Read every record of a CSV checkpoint.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> LedgerResult<Vec<T>> {
    let file = std::fs::File::open(path)?;
    let records = read_from(file)?;
    tracing::debug!("read {} rows from {}", records.len(), path.display());
    Ok(records)
}

pub fn write_to<W: Write, T: Serialize>(writer: W, records: &[T]) -> LedgerResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_from<R: Read, T: DeserializeOwned>(reader: R) -> LedgerResult<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for record in rdr.deserialize() {
        records.push(record?);
    }
    Ok(records)
}
