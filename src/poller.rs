use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::Utc;
use chrono_tz::Tz;
use rumqttc::QoS;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    mqtt::{Publisher, Topics},
    payload::{ConnectionStatus, HumidityPayload, TemperaturePayload, to_json},
    sensor::{Reading, Sensor},
};

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub topics: Topics,

    pub sensor_id: String,

    pub timezone: Tz,

    pub interval: Duration,

    pub retry_delay: Duration,
}

#[derive(Debug)]
pub enum PollOutcome {
    Skipped,
    Published(Reading),
    PublishFailed,
}

/// Reads the sensor and publishes both payloads. Never fails: problems are logged and
/// folded into the outcome.
pub async fn poll_once<S, P>(sensor: &mut S, publisher: &P, config: &PollConfig) -> PollOutcome
where
    S: Sensor,
    P: Publisher,
{
    let values = match sensor.read().await {
        Ok(Some(values)) => values,
        Ok(None) => {
            debug!("no valid sensor reading, skipping");
            return PollOutcome::Skipped;
        }
        Err(err) => {
            warn!("failed to read sensor: {err:#}");
            return PollOutcome::Skipped;
        }
    };

    let reading = values.at(Utc::now().with_timezone(&config.timezone));
    info!(
        "measured at {}: temperature {:.2} C, humidity {:.2} %",
        reading.measured_at.format("%Y-%m-%d %H:%M:%S"),
        reading.temperature_celsius,
        reading.humidity_percent
    );

    if let Err(err) = publish_reading(publisher, config, &reading).await {
        warn!("failed to publish reading: {err:#}");
        return PollOutcome::PublishFailed;
    }

    PollOutcome::Published(reading)
}

async fn publish_reading<P: Publisher>(
    publisher: &P,
    config: &PollConfig,
    reading: &Reading,
) -> Result<()> {
    let temperature = to_json(&TemperaturePayload::new(
        reading.temperature_celsius,
        &config.sensor_id,
    ))?;
    publish_logged(publisher, &config.topics.temperature, temperature)
        .await
        .context("failed to publish temperature")?;

    let humidity = to_json(&HumidityPayload::new(
        reading.humidity_percent,
        &config.sensor_id,
    ))?;
    publish_logged(publisher, &config.topics.humidity, humidity)
        .await
        .context("failed to publish humidity")?;

    Ok(())
}

async fn publish_logged<P: Publisher>(publisher: &P, topic: &str, payload: Vec<u8>) -> Result<()> {
    info!("updating {topic}: {}", String::from_utf8_lossy(&payload));
    publisher.publish(topic, QoS::AtMostOnce, payload).await
}

/// Publishes a connection status on the connection topic.
pub async fn announce<P: Publisher>(
    publisher: &P,
    topic: &str,
    status: &ConnectionStatus<'_>,
) -> Result<()> {
    let payload = to_json(status)?;
    publisher
        .publish(topic, QoS::AtLeastOnce, payload)
        .await
        .context("failed to publish connection status")
}

/// Polls forever: `retry_delay` after a skipped read, `interval` after anything else.
pub async fn run<S, P>(sensor: &mut S, publisher: &P, config: &PollConfig)
where
    S: Sensor,
    P: Publisher,
{
    loop {
        let delay = match poll_once(sensor, publisher, config).await {
            PollOutcome::Skipped => config.retry_delay,
            PollOutcome::Published(_) | PollOutcome::PublishFailed => config.interval,
        };

        sleep(delay).await;
    }
}
