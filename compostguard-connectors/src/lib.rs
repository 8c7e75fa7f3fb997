//! IoT Connectors for Field-to-Cloud Plumbing
//!
//! ## Overview
//!
//! Everything around the inference engine is thin I/O glue, and it lives
//! here: the MQTT link that carries telemetry in and control commands out,
//! and the realtime-database sink that keeps the append-only history and
//! the "latest" overwrite view. The engine never sees any of this — the
//! bridge binary wires readings through the engine and hands results to
//! these connectors.
//!
//! ## Connector Responsibilities
//!
//! ### MQTT ([`mqtt`])
//!
//! - Subscribe to the telemetry topic; re-subscribe on every reconnect
//!   (brokers drop sessions more often than their QoS story suggests)
//! - Lenient payload decoding: a field that is missing or non-numeric
//!   defaults (temperature 0, moisture 0, pH 7) instead of dropping the
//!   reading
//! - Publish actuator commands to the control topic
//!
//! ### Realtime database ([`rtdb`])
//!
//! - `POST {base}/{logs}.json` — append one result record to history
//! - `PUT {base}/{latest}.json` — overwrite the realtime view
//! - `GET {base}/{controls}.json` — poll the actuator switch state
//!
//! All database calls are blocking (ureq); callers on an async runtime run
//! them on a blocking task.
//!
//! ## Failure Semantics
//!
//! Connector errors never poison the pipeline: a failed database write or a
//! dropped MQTT connection is logged and retried on the next event. Only
//! configuration errors (bad URL, bad topic) are surfaced at startup.

#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "mqtt")]
pub mod mqtt;

#[cfg(feature = "rtdb")]
pub mod rtdb;

pub mod records;

// Re-export common types
#[cfg(feature = "mqtt")]
pub use mqtt::{ControlCommand, MqttConfig, MqttLink, MqttPublisher, TelemetryReading};

#[cfg(feature = "rtdb")]
pub use rtdb::{ControlSource, ControlState, MemorySink, RtdbClient, StateSink};

pub use records::ResultRecord;

use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Link is down; retry after the transport reconnects
    #[error("Not connected")]
    NotConnected,

    /// Payload could not be decoded at all (field-level problems are
    /// handled by defaulting, not by this error)
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Transport-level failure (MQTT or HTTP)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid connector configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Async trait for outbound connectors
#[cfg(feature = "std")]
#[async_trait::async_trait]
pub trait AsyncConnector: Send {
    /// Transport-specific error type
    type Error;

    /// Send a payload to a named destination (topic, path, ...)
    async fn send(&mut self, destination: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Check if the transport considers itself connected
    fn is_connected(&self) -> bool;

    /// Get connection statistics
    fn stats(&self) -> ConnectionStats;
}

/// Connection statistics common to all connectors
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Total messages sent successfully
    pub messages_sent: u64,
    /// Total messages failed to send
    pub messages_failed: u64,
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Number of reconnections
    pub reconnections: u32,
    /// Last error message
    pub last_error: Option<String>,
}
