//! Low-stock alert thresholds.
//!
//! Alerts fire on an exact stock match against a fixed table; any stock
//! outside the table stays silent.

use crate::{Alert, Medication, Prediction, Severity, ISO_DATE_FORMAT};
use chrono::NaiveDate;

/// Stock levels that trigger an alert, highest first
pub const ALERT_THRESHOLDS: [u32; 7] = [10, 5, 4, 3, 2, 1, 0];

/// Severity for an exact stock count, if it is on the alert table
pub fn severity_for(stock: u32) -> Option<Severity> {
    match stock {
        10 => Some(Severity::Reminder),
        5 | 4 => Some(Severity::Critical),
        3 => Some(Severity::Severe),
        2 => Some(Severity::Urgent),
        1 => Some(Severity::Extreme),
        0 => Some(Severity::Maximum),
        _ => None,
    }
}

/// Build the alert for a medication, or `None` when its stock is not on the table
///
/// The 10-pill reminder embeds the purchase date from the depletion forecast;
/// as-needed medications have none, so their reminder only asks for a restock.
pub fn alert_for(med: &Medication, today: NaiveDate, buy_lead_days: u32) -> Option<Alert> {
    let severity = severity_for(med.stock)?;
    let name = &med.name;

    let (title, body) = match med.stock {
        10 => match med.predict_end_date(today, buy_lead_days) {
            Prediction::AsNeeded => (
                "Medication Reminder",
                format!("⚠️ Only 10 pills of {} left. Restock when convenient.", name),
            ),
            dated => (
                "Medication Reminder",
                format!(
                    "⚠️ Only 10 pills of {} left. Buy by {}.",
                    name,
                    dated.buy_label(ISO_DATE_FORMAT)
                ),
            ),
        },
        5 => (
            "Critical Alert",
            format!("⚠️ Critical! Only 5 pills of {} left. Restock now!", name),
        ),
        4 => (
            "Critical Alert",
            format!("⚠️ Only 4 pills of {} left. Don't forget to buy more!", name),
        ),
        3 => (
            "Severe Alert",
            format!("⚠️ Attention! Only 3 pills of {} left. Buy urgently!", name),
        ),
        2 => (
            "Urgent Alert",
            format!("⚠️ Urgent! Only 2 pills of {} left. Restock right away!", name),
        ),
        1 => (
            "Extreme Alert",
            format!("🚨 Only 1 pill of {} left! Buy it TODAY!", name),
        ),
        _ => (
            "OUT OF MEDICATION!",
            format!("🚨 No pills of {} left! You need to buy more NOW!", name),
        ),
    };

    Some(Alert {
        medication: name.clone(),
        severity,
        stock: med.stock,
        title: title.to_string(),
        body,
    })
}
