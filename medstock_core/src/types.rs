//! Core domain types for the medstock system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Medication records
//! - Depletion forecasts
//! - Alerts and their delivery outcome
//! - Reconciliation run reports

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used on disk and inside notification bodies
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Medication Types
// ============================================================================

/// A medication tracked in the household inventory
///
/// Records carry no identifier; their position in the stored list is the
/// only index.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medication {
    pub name: String,
    /// Remaining doses
    pub stock: u32,
    /// Doses taken per day; zero means as-needed
    pub daily_intake: u32,
    #[serde(default)]
    pub is_sleeping_med: bool,
    /// Last day the dose was skipped through the skip action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_skipped: Option<NaiveDate>,
}

// ============================================================================
// Forecast Types
// ============================================================================

/// Reason shown instead of an end date for as-needed medications
pub const AS_NEEDED_END: &str = "As-needed use, no depletion forecast.";

/// Reason shown instead of a purchase date for as-needed medications
pub const AS_NEEDED_BUY: &str = "As-needed use, no purchase date.";

/// Depletion forecast for one medication
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prediction {
    /// No scheduled intake, so nothing to forecast
    AsNeeded,
    /// Stock runs out on `end_date`; buy by `buy_date` (may already be past)
    Dated {
        end_date: NaiveDate,
        buy_date: NaiveDate,
    },
}

impl Prediction {
    /// End date rendered with `fmt`, or the as-needed reason
    pub fn end_label(&self, fmt: &str) -> String {
        match self {
            Prediction::AsNeeded => AS_NEEDED_END.to_string(),
            Prediction::Dated { end_date, .. } => end_date.format(fmt).to_string(),
        }
    }

    /// Buy date rendered with `fmt`, or the as-needed reason
    pub fn buy_label(&self, fmt: &str) -> String {
        match self {
            Prediction::AsNeeded => AS_NEEDED_BUY.to_string(),
            Prediction::Dated { buy_date, .. } => buy_date.format(fmt).to_string(),
        }
    }
}

// ============================================================================
// Alert Types
// ============================================================================

/// Severity of a low-stock alert, ordered from mildest to worst
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Reminder,
    Critical,
    Severe,
    Urgent,
    Extreme,
    Maximum,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Reminder => "reminder",
            Severity::Critical => "critical",
            Severity::Severe => "severe",
            Severity::Urgent => "urgent",
            Severity::Extreme => "extreme",
            Severity::Maximum => "maximum",
        };
        f.write_str(label)
    }
}

/// A notification ready to be pushed
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    pub medication: String,
    pub severity: Severity,
    pub stock: u32,
    pub title: String,
    pub body: String,
}

/// What happened when an alert was handed to the notifier
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Delivery {
    /// Provider accepted the push
    Sent,
    /// Provider rejected it or the transport failed
    Failed { reason: String },
    /// No notifier configured; alert was only logged
    Disabled,
    /// Dry run, nothing was sent
    Suppressed,
}

/// An alert together with its delivery outcome
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchedAlert {
    pub alert: Alert,
    pub delivery: Delivery,
}

// ============================================================================
// Reconciliation Types
// ============================================================================

/// How the current run relates to the previous one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunKind {
    /// Nothing in the inventory, run skipped
    Empty,
    /// No last-run date recorded yet
    FirstRun,
    /// Already reconciled today
    SameDay,
    /// Last run lies in the future (clock moved backwards)
    LastRunInFuture,
    /// `days` whole days elapsed since the last run
    Elapsed { days: u32 },
}

impl RunKind {
    /// Number of days of intake to deduct in this run
    pub fn days_to_deduct(&self) -> u32 {
        match self {
            RunKind::Elapsed { days } => *days,
            _ => 0,
        }
    }
}

/// Result of a reconciliation run
#[derive(Clone, Debug)]
pub struct ReconcileReport {
    pub today: NaiveDate,
    /// Last recorded run before this one
    ///
    /// Always `None` for `RunKind::Empty`: an empty inventory returns before
    /// the last-run file is read.
    pub last_run: Option<NaiveDate>,
    pub kind: RunKind,
    /// Inventory after the run
    pub medications: Vec<Medication>,
    pub alerts: Vec<DispatchedAlert>,
    /// Whether records and last-run date were written
    pub persisted: bool,
}

impl ReconcileReport {
    /// Number of alerts the provider rejected or could not receive
    pub fn failed_alerts(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| matches!(a.delivery, Delivery::Failed { .. }))
            .count()
    }
}
