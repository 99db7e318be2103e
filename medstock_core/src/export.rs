//! CSV export of the inventory with depletion forecasts.

use crate::{Medication, Result, ISO_DATE_FORMAT};
use chrono::NaiveDate;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    position: usize,
    name: &'a str,
    stock: u32,
    daily_intake: u32,
    sleeping: bool,
    end_date: String,
    buy_date: String,
}

/// Write the inventory as CSV to any writer; returns the number of rows
pub fn write_csv<W: std::io::Write>(
    medications: &[Medication],
    today: NaiveDate,
    buy_lead_days: u32,
    writer: W,
) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);

    for (idx, med) in medications.iter().enumerate() {
        let prediction = med.predict_end_date(today, buy_lead_days);
        writer.serialize(CsvRow {
            position: idx + 1,
            name: &med.name,
            stock: med.stock,
            daily_intake: med.daily_intake,
            sleeping: med.is_sleeping_med,
            end_date: prediction.end_label(ISO_DATE_FORMAT),
            buy_date: prediction.buy_label(ISO_DATE_FORMAT),
        })?;
    }

    writer.flush()?;
    Ok(medications.len())
}

/// Export the inventory to a CSV file, replacing any existing file
pub fn export_csv(
    medications: &[Medication],
    today: NaiveDate,
    buy_lead_days: u32,
    path: &Path,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::File::create(path)?;
    let count = write_csv(medications, today, buy_lead_days, file)?;
    tracing::info!("Exported {} medications to {:?}", count, path);
    Ok(count)
}
