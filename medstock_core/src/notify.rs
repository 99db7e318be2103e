//! Push notification delivery.
//!
//! One POST per alert, no retries. Callers treat any error as non-fatal.

use crate::config::{NotifyConfig, ACCESS_TOKEN_ENV};
use crate::{Error, Result};
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

/// Something that can push a title/body note to the user
pub trait Notifier {
    fn send(&self, title: &str, body: &str) -> Result<()>;

    /// Disabled notifiers are skipped instead of called
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Request body for the push endpoint
#[derive(Serialize)]
struct PushNote<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    body: &'a str,
}

/// Pushbullet-style HTTP notifier
pub struct PushNotifier {
    endpoint: String,
    access_token: String,
    client: reqwest::blocking::Client,
}

impl PushNotifier {
    pub fn new(endpoint: &str, access_token: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            access_token,
            client,
        })
    }
}

impl Notifier for PushNotifier {
    fn send(&self, title: &str, body: &str) -> Result<()> {
        let note = PushNote {
            kind: "note",
            title,
            body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Access-Token", &self.access_token)
            .json(&note)
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(Error::Notify {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Push accepted: {}", title);
        Ok(())
    }
}

/// Stand-in used when no access token is configured
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn send(&self, title: &str, _body: &str) -> Result<()> {
        tracing::info!("Notifications disabled, not sending: {}", title);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// In-memory notifier that records every push, optionally failing them
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    sent: std::cell::RefCell<Vec<(String, String)>>,
    fail_status: Option<u16>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send is recorded and then rejected with `status`
    pub fn failing(status: u16) -> Self {
        Self {
            sent: Default::default(),
            fail_status: Some(status),
        }
    }

    /// Titles and bodies in the order they were sent
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.borrow().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn send(&self, title: &str, body: &str) -> Result<()> {
        self.sent.borrow_mut().push((title.to_string(), body.to_string()));
        match self.fail_status {
            Some(status) => Err(Error::Notify {
                status,
                body: "rejected".into(),
            }),
            None => Ok(()),
        }
    }
}

/// Build the notifier described by the configuration
///
/// The token is read from `PUSHBULLET_API_KEY` first and from the config file
/// second. Without a token, or with notifications switched off, alerts are
/// only logged.
pub fn notifier_from_config(config: &NotifyConfig) -> Result<Box<dyn Notifier>> {
    if !config.enabled {
        tracing::info!("Notifications switched off in config");
        return Ok(Box::new(DisabledNotifier));
    }

    match config.resolve_token(std::env::var(ACCESS_TOKEN_ENV).ok()) {
        Some(token) => Ok(Box::new(PushNotifier::new(
            &config.endpoint,
            token,
            config.timeout_secs,
        )?)),
        None => {
            tracing::warn!(
                "No access token found in {} or config, notifications disabled",
                ACCESS_TOKEN_ENV
            );
            Ok(Box::new(DisabledNotifier))
        }
    }
}
