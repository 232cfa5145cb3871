mod args;

use std::{process::ExitCode, time::Duration};

use anyhow::{Context as _, Result};
use args::{Args, SensorSource};
use clap::Parser as _;
use dht_publisher::{
    logging,
    mqtt::{self, Broker},
    payload::{ConnectionStatus, to_json},
    poller::{self, PollConfig},
    sensor::{IioSensor, Sensor, SimulatedSensor},
};
use rumqttc::AsyncClient;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

const KEEP_ALIVE_MARGIN: Duration = Duration::from_secs(10);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

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
    let config = args.poll_config();

    match args.sensor {
        SensorSource::Iio => {
            let sensor = IioSensor::new(&args.iio_device).context("failed to open IIO sensor")?;
            publish(&args, sensor, config).await
        }
        SensorSource::Simulated => publish(&args, SimulatedSensor::new(), config).await,
    }
}

async fn publish<S: Sensor>(args: &Args, mut sensor: S, config: PollConfig) -> Result<()> {
    let broker = Broker {
        host: args.mqtt_host.clone(),
        port: args.mqtt_port,
        keep_alive: config.interval + KEEP_ALIVE_MARGIN,
        credentials: args.credentials(),
    };

    let offline = to_json(&ConnectionStatus::offline(&config.sensor_id))?;
    let options = mqtt::mqtt_options(&broker, &args.client_id, &config.topics.connection, offline);

    info!("temperature data topic {}", config.topics.temperature);
    info!("humidity data topic {}", config.topics.humidity);
    info!("connection topic {}", config.topics.connection);
    info!(
        "publishing sensor measurements to {}:{} every {} seconds",
        broker.host, broker.port, args.interval_secs
    );

    let (client, driver) = mqtt::connect(options);

    poller::announce(
        &client,
        &config.topics.connection,
        &ConnectionStatus::online(&config.sensor_id),
    )
    .await?;

    tokio::select! {
        () = poller::run(&mut sensor, &client, &config) => {}
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for Ctrl-C")?;
            info!("shutting down");
        }
    }

    shutdown(&client, driver, &config).await
}

// A clean disconnect suppresses the last will, so the offline status is sent explicitly.
// Neither step waits on the request queue, so shutdown ends within SHUTDOWN_TIMEOUT even
// while the broker is unreachable.
async fn shutdown(client: &AsyncClient, driver: JoinHandle<()>, config: &PollConfig) -> Result<()> {
    if let Err(err) = poller::announce(
        client,
        &config.topics.connection,
        &ConnectionStatus::offline(&config.sensor_id),
    )
    .await
    {
        warn!("{err:#}");
    }

    mqtt::disconnect(client, driver, SHUTDOWN_TIMEOUT).await;

    Ok(())
}
