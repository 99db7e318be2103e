//! Manual inventory operations shared by the command line and the menu.
//!
//! Indexes handed in by users are 1-based, matching what `list` prints.

use crate::{Error, Medication, Prediction, Result};
use chrono::NaiveDate;

/// A manual change to one medication's stock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockEdit {
    /// Pills bought or found
    Add(u32),
    /// Pills lost or taken outside the schedule
    Remove(u32),
    /// Recount: overwrite with an exact number
    Set(u32),
}

/// Translate a 1-based position into a vector index
pub fn resolve_index(medications: &[Medication], position: usize) -> Result<usize> {
    if position == 0 || position > medications.len() {
        return Err(Error::InvalidInput(format!(
            "No medication at position {} (have {})",
            position,
            medications.len()
        )));
    }
    Ok(position - 1)
}

/// Append a new medication and return its 1-based position
pub fn add_medication(medications: &mut Vec<Medication>, medication: Medication) -> usize {
    tracing::info!(
        "Adding {} (stock {}, daily {})",
        medication.name,
        medication.stock,
        medication.daily_intake
    );
    medications.push(medication);
    medications.len()
}

/// Apply a manual stock edit to the medication at `position`
pub fn edit_stock(
    medications: &mut [Medication],
    position: usize,
    edit: StockEdit,
) -> Result<&Medication> {
    let idx = resolve_index(medications, position)?;
    let med = &mut medications[idx];

    match edit {
        StockEdit::Add(n) => med.update_stock(i64::from(n)),
        StockEdit::Remove(n) => med.update_stock(-i64::from(n)),
        StockEdit::Set(n) => med.set_stock(n),
    }

    tracing::info!("Edited {} ({:?}), stock now {}", med.name, edit, med.stock);
    Ok(&*med)
}

/// Remove and return the medication at `position`
pub fn remove_medication(medications: &mut Vec<Medication>, position: usize) -> Result<Medication> {
    let idx = resolve_index(medications, position)?;
    let removed = medications.remove(idx);
    tracing::info!("Removed {}", removed.name);
    Ok(removed)
}

/// Skip today's dose of every sleeping medication
///
/// Returns the names of the medications whose dose was credited back.
pub fn skip_sleeping_medications(medications: &mut [Medication], today: NaiveDate) -> Vec<String> {
    medications
        .iter_mut()
        .filter_map(|med| med.skip_dose(today).then(|| med.name.clone()))
        .collect()
}

/// Forecast every medication, preserving list order
pub fn predictions(
    medications: &[Medication],
    today: NaiveDate,
    buy_lead_days: u32,
) -> Vec<(&Medication, Prediction)> {
    medications
        .iter()
        .map(|med| (med, med.predict_end_date(today, buy_lead_days)))
        .collect()
}
