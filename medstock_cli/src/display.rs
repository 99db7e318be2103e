//! Text rendering shared by the subcommands and the interactive menu.

use chrono::NaiveDate;
use medstock_core::alert_log::AlertLogEntry;
use medstock_core::inventory::predictions;
use medstock_core::{Delivery, Medication, Prediction, ReconcileReport, RunKind};
use std::io::{self, Write};

/// Human-facing date format
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

pub fn print_list<W: Write>(out: &mut W, medications: &[Medication]) -> io::Result<()> {
    if medications.is_empty() {
        writeln!(out, "No medications registered.")?;
        return Ok(());
    }

    writeln!(out, "Registered medications:")?;
    for (idx, med) in medications.iter().enumerate() {
        let mut tags = Vec::new();
        if med.is_as_needed() {
            tags.push("as needed".to_string());
        } else {
            tags.push(format!("{}/day", med.daily_intake));
        }
        if med.is_sleeping_med {
            tags.push("sleep".to_string());
        }
        writeln!(
            out,
            "{} - {}: {} pills left ({})",
            idx + 1,
            med.name,
            med.stock,
            tags.join(", ")
        )?;
    }
    Ok(())
}

pub fn print_predictions<W: Write>(
    out: &mut W,
    medications: &[Medication],
    today: NaiveDate,
    buy_lead_days: u32,
) -> io::Result<()> {
    if medications.is_empty() {
        writeln!(out, "No medications registered.")?;
        return Ok(());
    }

    for (med, prediction) in predictions(medications, today, buy_lead_days) {
        writeln!(out, "{}:", med.name)?;
        match prediction {
            Prediction::AsNeeded => {
                writeln!(out, "  {}", prediction.end_label(DISPLAY_DATE_FORMAT))?;
            }
            Prediction::Dated { .. } => {
                writeln!(out, "  Runs out: {}", prediction.end_label(DISPLAY_DATE_FORMAT))?;
                writeln!(out, "  Buy by: {}", prediction.buy_label(DISPLAY_DATE_FORMAT))?;
            }
        }
    }
    Ok(())
}

pub fn delivery_label(delivery: &Delivery) -> String {
    match delivery {
        Delivery::Sent => "sent".into(),
        Delivery::Failed { reason } => format!("failed ({})", reason),
        Delivery::Disabled => "not sent, notifications disabled".into(),
        Delivery::Suppressed => "not sent, dry run".into(),
    }
}

pub fn print_report<W: Write>(out: &mut W, report: &ReconcileReport) -> io::Result<()> {
    match report.kind {
        RunKind::Empty => {
            writeln!(out, "No medications registered.")?;
            return Ok(());
        }
        RunKind::FirstRun => writeln!(out, "First run: no stock adjustment.")?,
        RunKind::SameDay => writeln!(out, "Already ran today: no stock adjustment.")?,
        RunKind::LastRunInFuture => writeln!(
            out,
            "Last run date is after today: no stock adjustment."
        )?,
        RunKind::Elapsed { days } => {
            writeln!(out, "{} day(s) since last run: stock adjusted.", days)?
        }
    }

    for med in &report.medications {
        writeln!(out, "{}: {} pills remaining", med.name, med.stock)?;
    }

    if !report.alerts.is_empty() {
        writeln!(out)?;
        writeln!(out, "Alerts:")?;
        for dispatched in &report.alerts {
            let alert = &dispatched.alert;
            writeln!(
                out,
                "  [{}] {}: {} ({})",
                alert.severity,
                alert.title,
                alert.body,
                delivery_label(&dispatched.delivery)
            )?;
        }
    }
    Ok(())
}

pub fn print_history<W: Write>(out: &mut W, entries: &[AlertLogEntry]) -> io::Result<()> {
    if entries.is_empty() {
        writeln!(out, "No alerts logged yet.")?;
        return Ok(());
    }

    for entry in entries {
        writeln!(
            out,
            "{} [{}] {} ({} left): {}",
            entry.date,
            entry.severity,
            entry.medication,
            entry.stock,
            delivery_label(&entry.delivery)
        )?;
    }
    Ok(())
}
