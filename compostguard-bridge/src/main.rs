//! Bridge entry point: reads env config, loads the rule file and model
//! bundle, connects MQTT and the realtime store, then runs the event loop.
//!
//! Per incoming reading: decode leniently → predict ammonia (required model)
//! → classify maturity (best effort) → fuzzy inference → write the result
//! record to history and the realtime view.
//!
//! Resilience rules:
//! - Missing/invalid rule file → empty rule base, keep running (the safety
//!   override still fires on high ammonia)
//! - Missing ammonia regressor → fatal at startup (no score without it)
//! - MQTT re-subscribe on every reconnect
//! - Store write failures are logged and retried on the next reading
//! - Remote control polling publishes actuator commands only on change,
//!   always forcing manual mode at the monitor

use std::env;
use std::sync::Arc;

use log::{debug, error, info, warn};

use compostguard_connectors::{
    mqtt::{ControlCommand, Event, MqttConfig, MqttLink, Packet, TelemetryReading},
    rtdb::{ControlSource, ControlState, MemorySink, RtdbClient, RtdbConfig, StateSink},
    ResultRecord,
};
use compostguard_core::{config::RuleFile, profile, FuzzyEngine};
use compostguard_ml::{bundle::ModelSet, ModelBundle};

/// How often the remote control state is polled, unless overridden
const DEFAULT_CONTROL_POLL_SECS: u64 = 3;

/// Bridge configuration from environment variables
#[derive(Debug, Clone)]
struct BridgeConfig {
    mqtt: MqttConfig,
    rules_path: String,
    model_path: String,
    rtdb_url: Option<String>,
    rtdb_auth: Option<String>,
    control_poll_secs: u64,
}

impl BridgeConfig {
    fn from_env() -> Self {
        let mut mqtt = MqttConfig::default();
        if let Ok(host) = env::var("MQTT_HOST") {
            mqtt.broker = host;
        }
        if let Some(port) = env::var("MQTT_PORT").ok().and_then(|s| s.parse().ok()) {
            mqtt.port = port;
        }
        if let Ok(topic) = env::var("MQTT_TELEMETRY_TOPIC") {
            mqtt.telemetry_topic = topic;
        }
        if let Ok(topic) = env::var("MQTT_CONTROL_TOPIC") {
            mqtt.control_topic = topic;
        }

        Self {
            mqtt,
            rules_path: env::var("RULES_PATH").unwrap_or_else(|_| "kompos_config.json".into()),
            model_path: env::var("MODEL_PATH").unwrap_or_else(|_| "prediksi.json".into()),
            rtdb_url: env::var("RTDB_URL").ok(),
            rtdb_auth: env::var("RTDB_AUTH").ok(),
            control_poll_secs: env::var("CONTROL_POLL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CONTROL_POLL_SECS),
        }
    }
}

/// Run one reading through the full prediction + inference pipeline
fn process_reading(
    engine: &FuzzyEngine,
    models: &ModelSet,
    reading: &TelemetryReading,
    timestamp: i64,
) -> Result<ResultRecord, compostguard_ml::MlError> {
    let ammonia =
        models
            .ammonia
            .estimate(reading.temperature, reading.moisture, reading.ph)?;

    // Maturity is best effort: a broken classifier degrades to "unknown"
    let maturity = match &models.maturity {
        Some(classifier) => {
            match classifier.classify(reading.temperature, reading.moisture, reading.ph, ammonia) {
                Ok(m) => Some(m),
                Err(e) => {
                    warn!("maturity classification failed: {e}");
                    None
                }
            }
        }
        None => None,
    };

    // The predicted ammonia value feeds the odor variable
    let assessment = engine.evaluate(&[
        ("suhu", reading.temperature),
        ("kelembapan", reading.moisture),
        ("ph", reading.ph),
        ("bau", ammonia),
    ]);

    Ok(ResultRecord::from_parts(
        reading.temperature,
        reading.moisture,
        reading.ph,
        ammonia,
        &assessment,
        maturity,
        timestamp,
    ))
}

/// Load the rule base, falling back to empty on any failure
fn load_rules(path: &str) -> Vec<compostguard_core::Rule> {
    match RuleFile::load(path) {
        Ok(file) => {
            let rules = file.into_rules();
            info!("loaded {} rules from {path}", rules.len());
            rules
        }
        Err(e) => {
            warn!("could not load rule file {path}: {e}; continuing with an empty rule base");
            Vec::new()
        }
    }
}

/// Write a record to the sink (history + latest) on a blocking task
async fn store_record(sink: Arc<dyn StateSink>, record: ResultRecord) {
    let result = tokio::task::spawn_blocking(move || {
        sink.append(&record)?;
        sink.set_latest(&record)
    })
    .await;

    match result {
        Ok(Ok(())) => debug!("record stored"),
        Ok(Err(e)) => error!("store write failed: {e}"),
        Err(e) => error!("store task panicked: {e}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BridgeConfig::from_env();

    // ── Rule base (fail-soft) ───────────────────────────────────────
    let rules = load_rules(&config.rules_path);
    let engine = FuzzyEngine::new(profile::compost().with_rules(rules))?;
    for check in engine.compile_report().skipped() {
        warn!("rule skipped: {check:?}");
    }
    info!("fuzzy engine ready: {} rules compiled", engine.rule_count());

    // ── Models (ammonia required, maturity optional) ────────────────
    let models = ModelBundle::load(&config.model_path)?.into_models()?;
    info!(
        "models loaded from {} (maturity classifier: {})",
        config.model_path,
        if models.maturity.is_some() { "present" } else { "absent" }
    );

    // ── State sink ──────────────────────────────────────────────────
    let (sink, controls): (Arc<dyn StateSink>, Option<Arc<RtdbClient>>) = match &config.rtdb_url {
        Some(url) => {
            let mut rtdb_config = RtdbConfig::new(url);
            if let Some(token) = &config.rtdb_auth {
                rtdb_config = rtdb_config.with_auth(token);
            }
            let client = Arc::new(RtdbClient::new(rtdb_config)?);
            info!("realtime database sink: {url}");
            (client.clone(), Some(client))
        }
        None => {
            warn!("RTDB_URL not set; results stay in memory and remote control is disabled");
            (Arc::new(MemorySink::new()), None)
        }
    };

    // ── MQTT ────────────────────────────────────────────────────────
    let mut link = MqttLink::connect(config.mqtt.clone());
    let mut publisher = link.publisher();
    publisher.subscribe_telemetry().await?;
    info!(
        "subscribed to {} on {}:{}",
        config.mqtt.telemetry_topic, config.mqtt.broker, config.mqtt.port
    );

    // ── Signal handling ─────────────────────────────────────────────
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    // ── Main event loop ─────────────────────────────────────────────
    let mut control_ticker =
        tokio::time::interval(std::time::Duration::from_secs(config.control_poll_secs));
    let mut last_controls: Option<ControlState> = None;

    let exit_reason: &str;

    loop {
        tokio::select! {
            event = link.poll() => {
                match event {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        let reading = match TelemetryReading::from_payload(&publish.payload) {
                            Ok(r) => r,
                            Err(e) => {
                                warn!("dropping telemetry payload: {e}");
                                continue;
                            }
                        };
                        info!(
                            "reading: T={}°C MC={}% pH={}",
                            reading.temperature, reading.moisture, reading.ph
                        );

                        let timestamp = chrono::Utc::now().timestamp_millis();
                        match process_reading(&engine, &models, &reading, timestamp) {
                            Ok(record) => {
                                info!(
                                    "ammonia {:.2} ppm, score {:.2} ({}), maturity {}",
                                    record.ammonia, record.score, record.fuzzy_label,
                                    record.maturity
                                );
                                store_record(sink.clone(), record).await;
                            }
                            Err(e) => error!("prediction failed for reading: {e}"),
                        }
                    }

                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        // Re-subscribe on every (re)connect — the broker may
                        // have dropped our session
                        if let Err(e) = publisher.subscribe_telemetry().await {
                            error!("re-subscribe failed: {e}");
                        }
                    }

                    Ok(_) => {}

                    Err(e) => {
                        error!("mqtt error: {e}; retrying");
                        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                    }
                }
            }

            _ = control_ticker.tick() => {
                let Some(client) = controls.clone() else { continue };
                let fetched =
                    tokio::task::spawn_blocking(move || client.fetch_controls()).await;

                match fetched {
                    Ok(Ok(state)) => {
                        if last_controls != Some(state) {
                            let command = ControlCommand {
                                pump: state.pump,
                                aerator: state.aerator,
                                // Remote toggles always force manual mode
                                auto_mode: false,
                            };
                            match publisher.publish_control(&command).await {
                                Ok(()) => {
                                    info!(
                                        "control change forwarded: pump={} aerator={}",
                                        state.pump, state.aerator
                                    );
                                    last_controls = Some(state);
                                }
                                Err(e) => error!("control publish failed: {e}"),
                            }
                        }
                    }
                    Ok(Err(e)) => debug!("control poll failed: {e}"),
                    Err(e) => error!("control poll task panicked: {e}"),
                }
            }

            _ = &mut ctrl_c => {
                exit_reason = "SIGINT";
                break;
            }

            _ = sigterm.recv() => {
                exit_reason = "SIGTERM";
                break;
            }
        }
    }

    info!("shutting down ({exit_reason})");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use compostguard_core::{Antecedent, Rule};

    const BUNDLE: &str = r#"{
        "ammonia_regressor": {
            "trees": [ { "nodes": [
                { "kind": "split", "feature": 0, "threshold": 50.0, "left": 1, "right": 2 },
                { "kind": "leaf", "value": 4.0 },
                { "kind": "leaf", "value": 70.0 }
            ] } ]
        },
        "maturity_classifier": {
            "trees": [ { "nodes": [
                { "kind": "split", "feature": 3, "threshold": 15.0, "left": 1, "right": 2 },
                { "kind": "leaf", "value": 1.0 },
                { "kind": "leaf", "value": 0.0 }
            ] } ]
        }
    }"#;

    fn test_engine() -> FuzzyEngine {
        let rules = vec![Rule::new(
            vec![
                Antecedent::new("suhu", "ideal"),
                Antecedent::new("kelembapan", "sedang"),
                Antecedent::new("ph", "netral"),
            ],
            "sangat_baik",
        )];
        FuzzyEngine::new(profile::compost().with_rules(rules)).unwrap()
    }

    fn test_models() -> ModelSet {
        ModelBundle::from_json(BUNDLE).unwrap().into_models().unwrap()
    }

    #[test]
    fn healthy_reading_scores_very_good() {
        let reading = TelemetryReading {
            temperature: 45.0,
            moisture: 46.0,
            ph: 7.0,
        };
        let record = process_reading(&test_engine(), &test_models(), &reading, 1_000).unwrap();

        assert_eq!(record.ammonia, 4.0);
        assert_eq!(record.fuzzy_label, "very_good");
        assert!(record.score > 90.0);
        assert_eq!(record.maturity, "mature");
        assert_eq!(record.timestamp, 1_000);
    }

    #[test]
    fn hot_reading_trips_the_ammonia_override() {
        // Temperature over the split threshold drives predicted ammonia to
        // 70 ppm, deep in the danger plateau
        let reading = TelemetryReading {
            temperature: 60.0,
            moisture: 46.0,
            ph: 7.0,
        };
        let record = process_reading(&test_engine(), &test_models(), &reading, 2_000).unwrap();

        assert_eq!(record.ammonia, 70.0);
        assert_eq!(record.fuzzy_label, "poor");
        assert!(record.score <= 45.0);
        assert_eq!(record.maturity, "immature");
    }

    #[test]
    fn config_defaults_without_env() {
        let config = BridgeConfig::from_env();
        assert_eq!(config.rules_path, "kompos_config.json");
        assert_eq!(config.model_path, "prediksi.json");
        assert_eq!(config.control_poll_secs, DEFAULT_CONTROL_POLL_SECS);
    }
}
