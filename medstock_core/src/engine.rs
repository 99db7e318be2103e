//! Daily reconciliation engine.
//!
//! Once per day the engine catches the inventory up with the calendar:
//! - Work out how many days passed since the last recorded run
//! - Deduct that many days of scheduled intake from every medication
//! - Push one alert per medication whose stock sits on the alert table
//! - Persist the inventory and record today as the last run
//!
//! The current date and the store are parameters, so runs are fully
//! reproducible.

use crate::{
    alerts::alert_for, Delivery, DispatchedAlert, MedicationStore, Notifier, ReconcileReport,
    Result, RunKind,
};
use chrono::NaiveDate;

/// Knobs for a reconciliation run
#[derive(Clone, Debug)]
pub struct ReconcileOptions {
    pub buy_lead_days: u32,
    /// Compute everything but neither notify nor persist
    pub dry_run: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            buy_lead_days: 10,
            dry_run: false,
        }
    }
}

/// Classify a run from the last recorded run date
///
/// Only a strictly earlier date deducts intake, so running twice on the
/// same day deducts once and a first run deducts nothing.
pub fn classify_run(last_run: Option<NaiveDate>, today: NaiveDate) -> RunKind {
    let Some(last) = last_run else {
        return RunKind::FirstRun;
    };

    let days = (today - last).num_days();
    if days == 0 {
        RunKind::SameDay
    } else if days < 0 {
        RunKind::LastRunInFuture
    } else {
        RunKind::Elapsed {
            days: u32::try_from(days).unwrap_or(u32::MAX),
        }
    }
}

/// Run the daily reconciliation against `store`
///
/// Notification failures are logged and recorded in the report; they never
/// stop the inventory and the last-run date from being saved.
pub fn run_daily(
    store: &mut dyn MedicationStore,
    notifier: &dyn Notifier,
    today: NaiveDate,
    options: &ReconcileOptions,
) -> Result<ReconcileReport> {
    let mut medications = store.load_medications()?;

    // The last-run file is left unread (and unchecked) when there is nothing to reconcile
    if medications.is_empty() {
        tracing::info!("No medications registered, nothing to reconcile");
        return Ok(ReconcileReport {
            today,
            last_run: None,
            kind: RunKind::Empty,
            medications,
            alerts: Vec::new(),
            persisted: false,
        });
    }

    let last_run = store.load_last_run()?;
    let kind = classify_run(last_run, today);

    match kind {
        RunKind::FirstRun => {
            tracing::info!("First run, no elapsed days to deduct");
        }
        RunKind::SameDay => {
            tracing::info!("Already reconciled today, stock left unchanged");
        }
        RunKind::LastRunInFuture => {
            tracing::warn!(
                "Last run {:?} is after today {}, stock left unchanged",
                last_run,
                today
            );
        }
        RunKind::Elapsed { days } => {
            tracing::info!("{} day(s) since last run, adjusting stock", days);
            for med in medications.iter_mut() {
                let taken = med.consume_days(days);
                if taken > 0 {
                    tracing::debug!("{}: -{} -> {}", med.name, taken, med.stock);
                }
            }
        }
        RunKind::Empty => {}
    }

    let mut alerts = Vec::new();
    for med in &medications {
        let Some(alert) = alert_for(med, today, options.buy_lead_days) else {
            continue;
        };

        let delivery = if options.dry_run {
            Delivery::Suppressed
        } else {
            dispatch(notifier, &alert.title, &alert.body)
        };
        alerts.push(DispatchedAlert { alert, delivery });
    }

    if !options.dry_run {
        store.save_medications(&medications)?;
        store.save_last_run(today)?;
    }

    Ok(ReconcileReport {
        today,
        last_run,
        kind,
        medications,
        alerts,
        persisted: !options.dry_run,
    })
}

/// Hand one alert to the notifier, turning any failure into a logged outcome
fn dispatch(notifier: &dyn Notifier, title: &str, body: &str) -> Delivery {
    if !notifier.is_enabled() {
        tracing::info!("[{}] {}", title, body);
        return Delivery::Disabled;
    }

    match notifier.send(title, body) {
        Ok(()) => {
            tracing::info!("Notification sent: {}", title);
            Delivery::Sent
        }
        Err(e) => {
            tracing::warn!("Failed to send notification {:?}: {}", title, e);
            Delivery::Failed {
                reason: e.to_string(),
            }
        }
    }
}
