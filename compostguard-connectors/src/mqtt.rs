//! MQTT Link for Telemetry Ingestion and Control Publishing
//!
//! One connection serves both directions: the monitor publishes sensor
//! readings on the telemetry topic, and the bridge publishes actuator
//! commands on the control topic. The connection splits into two halves so
//! an event loop borrow never blocks the publish side:
//!
//! - [`MqttLink`] owns the event loop; the caller polls it (usually inside
//!   a `tokio::select!`) and re-subscribes on every `ConnAck`, because
//!   brokers lose sessions more often than their QoS story suggests.
//! - [`MqttPublisher`] is a cheap cloneable handle for subscribing and
//!   publishing, safe to use from any task.
//!
//! ## Payload Leniency
//!
//! Field monitors ship firmware revisions that disagree on payload details
//! (string-encoded numbers, missing fields). Decoding therefore defaults at
//! the field level — temperature and moisture to 0, pH to neutral 7 —
//! instead of rejecting the reading. Only a payload that is not a JSON
//! object at all is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, MqttOptions, QoS};
use serde_json::{json, Value};

use crate::{AsyncConnector, ConnectionStats, ConnectorError};

// Re-exported so callers can match on event-loop results without a direct
// rumqttc dependency
pub use rumqttc::{ConnectionError, Event, Packet};

/// MQTT link configuration
#[derive(Debug, Clone)]
pub struct MqttConfig {
    /// Broker host name
    pub broker: String,
    /// Broker port
    pub port: u16,
    /// Client identifier
    pub client_id: String,
    /// Topic carrying sensor readings
    pub telemetry_topic: String,
    /// Topic carrying actuator commands
    pub control_topic: String,
    /// Keep-alive interval in seconds
    pub keep_alive_secs: u64,
}

impl Default for MqttConfig {
    /// Historical deployment defaults (public HiveMQ broker)
    fn default() -> Self {
        Self {
            broker: "broker.hivemq.com".into(),
            port: 1883,
            client_id: "compostguard-bridge".into(),
            telemetry_topic: "talha/sensor".into(),
            control_topic: "talha/control".into(),
            keep_alive_secs: 30,
        }
    }
}

/// One sensor reading as decoded from a telemetry payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryReading {
    /// Temperature in °C (defaults to 0 when absent/malformed)
    pub temperature: f32,
    /// Moisture content in % (defaults to 0 when absent/malformed)
    pub moisture: f32,
    /// Acidity (defaults to neutral 7 when absent/malformed)
    pub ph: f32,
}

/// Extract a numeric field, accepting numbers and numeric strings
fn lenient_f32(value: &Value, field: &str, default: f32) -> f32 {
    match value.get(field) {
        Some(Value::Number(n)) => n.as_f64().map(|v| v as f32).unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

impl TelemetryReading {
    /// Decode a telemetry payload with field-level defaulting
    ///
    /// Fails only when the payload is not a JSON object; individual bad
    /// fields substitute their defaults.
    pub fn from_payload(payload: &[u8]) -> Result<Self, ConnectorError> {
        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| ConnectorError::MalformedPayload(e.to_string()))?;
        if !value.is_object() {
            return Err(ConnectorError::MalformedPayload(
                "payload is not a JSON object".into(),
            ));
        }

        Ok(Self {
            temperature: lenient_f32(&value, "suhu", 0.0),
            moisture: lenient_f32(&value, "moisture", 0.0),
            ph: lenient_f32(&value, "ph", 7.0),
        })
    }
}

/// Actuator command published on the control topic
///
/// Wire format matches the monitor firmware: integer flags, and `auto: 0`
/// whenever the command originates from a remote toggle (remote control
/// always forces manual mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlCommand {
    /// Water pump on/off
    pub pump: bool,
    /// Aerator fan on/off
    pub aerator: bool,
    /// Monitor-side automatic mode
    pub auto_mode: bool,
}

impl ControlCommand {
    /// Encode to the firmware's JSON wire format
    pub fn to_payload(&self) -> Vec<u8> {
        let body = json!({
            "pump": self.pump as u8,
            "aerator": self.aerator as u8,
            "auto": self.auto_mode as u8,
        });
        body.to_string().into_bytes()
    }
}

/// Event-loop half of the connection
///
/// Owns connection-level state; publishing happens through handles from
/// [`MqttLink::publisher`].
pub struct MqttLink {
    eventloop: rumqttc::EventLoop,
    client: AsyncClient,
    config: MqttConfig,
    connected: Arc<AtomicBool>,
    ever_connected: bool,
    reconnections: u32,
}

impl MqttLink {
    /// Build the client; the connection is established lazily by `poll`
    pub fn connect(config: MqttConfig) -> Self {
        let mut options = MqttOptions::new(&config.client_id, &config.broker, config.port);
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

        let (client, eventloop) = AsyncClient::new(options, 20);
        Self {
            eventloop,
            client,
            config,
            connected: Arc::new(AtomicBool::new(false)),
            ever_connected: false,
            reconnections: 0,
        }
    }

    /// The configuration this link was built with
    pub fn config(&self) -> &MqttConfig {
        &self.config
    }

    /// Number of reconnects observed since startup
    pub fn reconnections(&self) -> u32 {
        self.reconnections
    }

    /// A cloneable publish/subscribe handle sharing this connection
    pub fn publisher(&self) -> MqttPublisher {
        MqttPublisher {
            client: self.client.clone(),
            config: self.config.clone(),
            connected: self.connected.clone(),
            stats: ConnectionStats::default(),
        }
    }

    /// Drive the connection; also tracks connect/disconnect transitions
    pub async fn poll(&mut self) -> Result<Event, ConnectionError> {
        match self.eventloop.poll().await {
            Ok(event) => {
                match &event {
                    Event::Incoming(Packet::ConnAck(_)) => {
                        if self.ever_connected {
                            self.reconnections += 1;
                            log::info!(
                                "mqtt session re-established (reconnect #{})",
                                self.reconnections
                            );
                        } else {
                            log::debug!("mqtt session established with {}", self.config.broker);
                        }
                        self.connected.store(true, Ordering::Relaxed);
                        self.ever_connected = true;
                    }
                    Event::Incoming(Packet::Disconnect) => {
                        log::warn!("mqtt broker sent disconnect");
                        self.connected.store(false, Ordering::Relaxed);
                    }
                    _ => {}
                }
                Ok(event)
            }
            Err(e) => {
                self.connected.store(false, Ordering::Relaxed);
                Err(e)
            }
        }
    }
}

/// Publish/subscribe half of the connection
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
    config: MqttConfig,
    connected: Arc<AtomicBool>,
    stats: ConnectionStats,
}

impl MqttPublisher {
    /// Subscribe to the telemetry topic (call after every `ConnAck`)
    pub async fn subscribe_telemetry(&self) -> Result<(), ConnectorError> {
        self.client
            .subscribe(&self.config.telemetry_topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| ConnectorError::Protocol(e.to_string()))
    }

    /// Publish an actuator command on the control topic
    pub async fn publish_control(&mut self, command: &ControlCommand) -> Result<(), ConnectorError> {
        let topic = self.config.control_topic.clone();
        self.send(&topic, &command.to_payload()).await
    }
}

#[async_trait::async_trait]
impl AsyncConnector for MqttPublisher {
    type Error = ConnectorError;

    async fn send(&mut self, destination: &str, data: &[u8]) -> Result<(), Self::Error> {
        match self
            .client
            .publish(destination, QoS::AtLeastOnce, false, data.to_vec())
            .await
        {
            Ok(()) => {
                self.stats.messages_sent += 1;
                self.stats.bytes_sent += data.len() as u64;
                Ok(())
            }
            Err(e) => {
                self.stats.messages_failed += 1;
                self.stats.last_error = Some(e.to_string());
                Err(ConnectorError::Protocol(e.to_string()))
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    fn stats(&self) -> ConnectionStats {
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_decodes_plain_numbers() {
        let reading =
            TelemetryReading::from_payload(br#"{"suhu": 45.5, "moisture": 46, "ph": 7.2}"#)
                .unwrap();
        assert_eq!(reading.temperature, 45.5);
        assert_eq!(reading.moisture, 46.0);
        assert_eq!(reading.ph, 7.2);
    }

    #[test]
    fn missing_and_malformed_fields_default() {
        // String-encoded number accepted, null pH defaults to neutral
        let reading =
            TelemetryReading::from_payload(br#"{"suhu": "31.5", "ph": null}"#).unwrap();
        assert_eq!(reading.temperature, 31.5);
        assert_eq!(reading.moisture, 0.0);
        assert_eq!(reading.ph, 7.0);

        // Garbage strings also default
        let garbage =
            TelemetryReading::from_payload(br#"{"suhu": "hot", "moisture": {}, "ph": []}"#)
                .unwrap();
        assert_eq!(garbage.temperature, 0.0);
        assert_eq!(garbage.moisture, 0.0);
        assert_eq!(garbage.ph, 7.0);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(TelemetryReading::from_payload(b"not json").is_err());
        assert!(TelemetryReading::from_payload(b"[1, 2, 3]").is_err());
        assert!(TelemetryReading::from_payload(b"42").is_err());
    }

    #[test]
    fn control_command_wire_format() {
        let cmd = ControlCommand {
            pump: true,
            aerator: false,
            auto_mode: false,
        };
        let value: Value = serde_json::from_slice(&cmd.to_payload()).unwrap();
        assert_eq!(value["pump"], 1);
        assert_eq!(value["aerator"], 0);
        assert_eq!(value["auto"], 0);
    }

    #[test]
    fn config_defaults_match_deployment() {
        let config = MqttConfig::default();
        assert_eq!(config.broker, "broker.hivemq.com");
        assert_eq!(config.telemetry_topic, "talha/sensor");
        assert_eq!(config.control_topic, "talha/control");
    }

    #[tokio::test]
    async fn publish_queues_before_first_connack() {
        // Publishes enqueue on the client channel even before the event
        // loop has been polled; the link still reports not-connected
        let link = MqttLink::connect(MqttConfig::default());
        let mut publisher = link.publisher();
        publisher.send("talha/control", b"{}").await.unwrap();

        assert!(!publisher.is_connected());
        let stats = publisher.stats();
        assert_eq!(stats.messages_sent, 1);
        assert_eq!(stats.bytes_sent, 2);
    }
}
