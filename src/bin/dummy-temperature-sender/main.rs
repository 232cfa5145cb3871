mod args;

use std::{process::ExitCode, time::Duration};

use anyhow::{Context as _, Result};
use args::Args;
use chrono::Utc;
use clap::Parser as _;
use dht_publisher::{
    logging,
    mqtt::{self, Publisher},
    payload::{TemperaturePayload, to_json},
};
use rumqttc::{MqttOptions, QoS};
use tokio::time::interval;
use tracing::{error, info, warn};

const CLIENT_ID: &str = "dummy-temperature-sender";
const SEND_INTERVAL: Duration = Duration::from_secs(2);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);
const MIN_TEMPERATURE: u32 = 10;
const MAX_TEMPERATURE: u32 = 25;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    if let Err(e) = run().await {
        error!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();

    info!(
        "sending dummy temperature data to {} every {} seconds",
        args.topic,
        SEND_INTERVAL.as_secs()
    );
    info!("press Ctrl+C to stop");

    let (client, driver) = mqtt::connect(MqttOptions::new(CLIENT_ID, args.host, args.port));

    let mut ticker = interval(SEND_INTERVAL);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                break;
            }
        }

        let temperature = dummy_temperature();
        let payload = to_json(&TemperaturePayload {
            temperature: temperature.to_string(),
            sensor_id: &args.sensor_id,
        })?;

        match Publisher::publish(&client, &args.topic, QoS::AtLeastOnce, payload).await {
            Ok(()) => info!("sent temperature {temperature} to {}", args.topic),
            Err(err) => warn!("{err:#}"),
        }
    }

    mqtt::disconnect(&client, driver, SHUTDOWN_TIMEOUT).await;

    Ok(())
}

// Spread over MIN..=MAX using the sub-second clock.
fn dummy_temperature() -> u32 {
    let span = MAX_TEMPERATURE - MIN_TEMPERATURE + 1;
    MIN_TEMPERATURE + Utc::now().timestamp_subsec_micros() % span
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_temperature_stays_in_range() {
        for _ in 0..100 {
            let temperature = dummy_temperature();
            assert!((MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature));
        }
    }
}
