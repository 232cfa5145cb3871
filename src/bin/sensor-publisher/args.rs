use std::{path::PathBuf, time::Duration};

use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use dht_publisher::{mqtt::Topics, poller::PollConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SensorSource {
    /// DHT11/DHT22 through the kernel `dht11` IIO driver
    Iio,
    /// Synthetic values for hosts without a sensor
    Simulated,
}

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "MQTT_HOST", default_value = "test.mosquitto.org")]
    pub mqtt_host: String,

    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    pub mqtt_port: u16,

    #[arg(long, env = "MQTT_USER")]
    pub mqtt_user: Option<String>,

    #[arg(long, env = "MQTT_PASS", requires = "mqtt_user")]
    pub mqtt_pass: Option<String>,

    #[arg(long, env = "MQTT_CLIENT_ID", default_value = "temp-humidity-sensor-1")]
    pub client_id: String,

    #[arg(long, env = "SENSOR_ID", default_value = "sensor-1")]
    pub sensor_id: String,

    #[arg(long, env = "BASE_TOPIC", default_value = "iot-car-gd")]
    pub base_topic: String,

    #[arg(long, env = "TEMPERATURE_TOPIC")]
    pub temperature_topic: Option<String>,

    #[arg(long, env = "HUMIDITY_TOPIC")]
    pub humidity_topic: Option<String>,

    #[arg(long, env = "CONNECTION_TOPIC")]
    pub connection_topic: Option<String>,

    /// Seconds between published readings
    #[arg(long, env = "INTERVAL_SECS", default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,

    /// Seconds to wait before reading again after a failed read
    #[arg(long, env = "RETRY_DELAY_SECS", default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
    pub retry_delay_secs: u64,

    #[arg(long, env = "SENSOR_SOURCE", value_enum, default_value_t = SensorSource::Iio)]
    pub sensor: SensorSource,

    #[arg(long, env = "IIO_DEVICE", default_value = "/sys/bus/iio/devices/iio:device0")]
    pub iio_device: PathBuf,

    #[arg(long, env = "TZ", default_value = "UTC")]
    pub timezone: Tz,
}

impl Args {
    pub fn topics(&self) -> Topics {
        let mut topics = Topics::from_base(&self.base_topic);

        if let Some(topic) = &self.temperature_topic {
            topics.temperature = topic.clone();
        }
        if let Some(topic) = &self.humidity_topic {
            topics.humidity = topic.clone();
        }
        if let Some(topic) = &self.connection_topic {
            topics.connection = topic.clone();
        }

        topics
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            topics: self.topics(),
            sensor_id: self.sensor_id.clone(),
            timezone: self.timezone,
            interval: Duration::from_secs(self.interval_secs),
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }

    pub fn credentials(&self) -> Option<(String, String)> {
        let user = self.mqtt_user.clone()?;
        Some((user, self.mqtt_pass.clone().unwrap_or_default()))
    }
}
