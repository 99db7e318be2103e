#![forbid(unsafe_code)]

//! Core domain model and business logic for the medstock system.
//!
//! This crate provides:
//! - Domain types (medications, forecasts, alerts, run reports)
//! - Stock arithmetic and depletion forecasting
//! - Daily reconciliation engine
//! - Persistence (medication store, last-run date, alert log, CSV export)
//! - Push notification delivery

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod medication;
pub mod inventory;
pub mod alerts;
pub mod notify;
pub mod store;
pub mod alert_log;
pub mod export;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use inventory::StockEdit;
pub use notify::{notifier_from_config, Notifier};
pub use store::{FileStore, MedicationStore, MemoryStore};
pub use alert_log::{AlertSink, JsonlAlertLog};
pub use engine::{run_daily, ReconcileOptions};
