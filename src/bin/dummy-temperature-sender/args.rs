use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Host of the MQTT broker
    #[arg(long, env = "MQTT_HOST")]
    pub host: String,

    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    pub port: u16,

    /// Topic to send data to
    #[arg(long, env = "MQTT_TOPIC")]
    pub topic: String,

    #[arg(long, env = "SENSOR_ID", default_value = "random-id-12")]
    pub sensor_id: String,
}
