//! Realtime-Database Sink and Control Source
//!
//! ## Endpoints
//!
//! The store is a Firebase-style realtime database spoken over plain REST:
//!
//! - `POST {base}/{logs}.json` — append a result record (history)
//! - `PUT  {base}/{latest}.json` — overwrite the realtime view
//! - `GET  {base}/{controls}.json` — read the actuator switch state
//!
//! Authentication, when configured, rides as the `auth` query parameter.
//! Calls are blocking (ureq); async callers run them on a blocking task.
//!
//! ## Traits
//!
//! [`StateSink`] and [`ControlSource`] are the seams the bridge programs
//! against. [`RtdbClient`] implements both; [`MemorySink`] implements the
//! sink for tests and for running without cloud credentials.

use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use crate::records::ResultRecord;
use crate::ConnectorError;

/// HTTP timeout for store round-trips
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Append-only history plus a "latest" overwrite view
pub trait StateSink: Send + Sync {
    /// Push one record onto the history log
    fn append(&self, record: &ResultRecord) -> Result<(), ConnectorError>;

    /// Overwrite the realtime view with the newest record
    fn set_latest(&self, record: &ResultRecord) -> Result<(), ConnectorError>;
}

/// Remote actuator switch state
pub trait ControlSource: Send + Sync {
    /// Read the current switch state
    fn fetch_controls(&self) -> Result<ControlState, ConnectorError>;
}

/// Desired actuator state as stored by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlState {
    /// Water pump switch
    pub pump: bool,
    /// Aerator fan switch
    pub aerator: bool,
}

impl ControlState {
    /// Decode from the stored JSON, treating anything but `1`/`true` as off
    pub fn from_value(value: &Value) -> Self {
        fn on(value: &Value, field: &str) -> bool {
            match value.get(field) {
                Some(Value::Number(n)) => n.as_i64() == Some(1),
                Some(Value::Bool(b)) => *b,
                _ => false,
            }
        }

        Self {
            pump: on(value, "pump"),
            aerator: on(value, "aerator"),
        }
    }
}

/// Realtime-database connection settings
#[derive(Debug, Clone)]
pub struct RtdbConfig {
    /// Database root URL (no trailing slash required)
    pub base_url: String,
    /// History path
    pub logs_path: String,
    /// Realtime view path
    pub latest_path: String,
    /// Actuator switch path
    pub controls_path: String,
    /// Optional auth token, sent as the `auth` query parameter
    pub auth_token: Option<String>,
}

impl RtdbConfig {
    /// Settings for a database root, with the deployed path names
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            logs_path: "sensor_logs".into(),
            latest_path: "sensor_now".into(),
            controls_path: "controls".into(),
            auth_token: None,
        }
    }

    /// Attach an auth token
    pub fn with_auth(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_owned());
        self
    }
}

/// Blocking REST client for the realtime database
pub struct RtdbClient {
    agent: ureq::Agent,
    config: RtdbConfig,
}

impl RtdbClient {
    /// Validate the configuration and build the HTTP agent
    pub fn new(config: RtdbConfig) -> Result<Self, ConnectorError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(ConnectorError::Config(format!(
                "database URL must be http(s): {}",
                config.base_url
            )));
        }

        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Ok(Self { agent, config })
    }

    fn endpoint(&self, path: &str) -> String {
        match &self.config.auth_token {
            Some(token) => format!("{}/{}.json?auth={}", self.config.base_url, path, token),
            None => format!("{}/{}.json", self.config.base_url, path),
        }
    }

    fn body(record: &ResultRecord) -> Result<String, ConnectorError> {
        serde_json::to_string(record).map_err(|e| ConnectorError::MalformedPayload(e.to_string()))
    }
}

impl StateSink for RtdbClient {
    fn append(&self, record: &ResultRecord) -> Result<(), ConnectorError> {
        let url = self.endpoint(&self.config.logs_path);
        self.agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&Self::body(record)?)
            .map_err(|e| ConnectorError::Protocol(e.to_string()))?;
        Ok(())
    }

    fn set_latest(&self, record: &ResultRecord) -> Result<(), ConnectorError> {
        let url = self.endpoint(&self.config.latest_path);
        self.agent
            .put(&url)
            .set("Content-Type", "application/json")
            .send_string(&Self::body(record)?)
            .map_err(|e| ConnectorError::Protocol(e.to_string()))?;
        Ok(())
    }
}

impl ControlSource for RtdbClient {
    fn fetch_controls(&self) -> Result<ControlState, ConnectorError> {
        let url = self.endpoint(&self.config.controls_path);
        let text = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| ConnectorError::Protocol(e.to_string()))?
            .into_string()
            .map_err(|e| ConnectorError::Protocol(e.to_string()))?;

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ConnectorError::MalformedPayload(e.to_string()))?;
        if value.is_null() {
            log::debug!("controls node absent; treating both actuators as off");
        }
        // An absent controls node reads as JSON null: everything off
        Ok(ControlState::from_value(&value))
    }
}

/// In-memory sink for tests and credential-less runs
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ResultRecord>>,
    latest: Mutex<Option<ResultRecord>>,
}

impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the appended history
    pub fn history(&self) -> Vec<ResultRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Snapshot of the realtime view
    pub fn latest(&self) -> Option<ResultRecord> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl StateSink for MemorySink {
    fn append(&self, record: &ResultRecord) -> Result<(), ConnectorError> {
        self.records
            .lock()
            .map_err(|_| ConnectorError::Protocol("sink lock poisoned".into()))?
            .push(record.clone());
        Ok(())
    }

    fn set_latest(&self, record: &ResultRecord) -> Result<(), ConnectorError> {
        *self
            .latest
            .lock()
            .map_err(|_| ConnectorError::Protocol("sink lock poisoned".into()))? =
            Some(record.clone());
        Ok(())
    }
}
