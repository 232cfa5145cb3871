use anyhow::{Context as _, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperaturePayload<'a> {
    pub temperature: String,

    pub sensor_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HumidityPayload<'a> {
    pub humidity: String,

    pub sensor_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus<'a> {
    pub activated: bool,

    pub sensor_id: &'a str,
}

impl<'a> TemperaturePayload<'a> {
    pub fn new(temperature_celsius: f32, sensor_id: &'a str) -> Self {
        Self {
            temperature: format_value(temperature_celsius),
            sensor_id,
        }
    }
}

impl<'a> HumidityPayload<'a> {
    pub fn new(humidity_percent: f32, sensor_id: &'a str) -> Self {
        Self {
            humidity: format_value(humidity_percent),
            sensor_id,
        }
    }
}

impl<'a> ConnectionStatus<'a> {
    pub fn online(sensor_id: &'a str) -> Self {
        Self {
            activated: true,
            sensor_id,
        }
    }

    pub fn offline(sensor_id: &'a str) -> Self {
        Self {
            activated: false,
            sensor_id,
        }
    }
}

pub fn to_json<T: Serialize>(payload: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(payload).context("failed to serialize payload")
}

// Shortest round-trip form, keeping a trailing ".0" on whole numbers.
fn format_value(v: f32) -> String {
    format!("{v:?}")
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn parse(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn temperature_payload_shape() {
        let bytes = to_json(&TemperaturePayload::new(21.5, "sensor-1")).unwrap();

        assert_eq!(
            parse(&bytes),
            json!({"temperature": "21.5", "sensorId": "sensor-1"})
        );
    }

    #[test]
    fn humidity_payload_shape() {
        let bytes = to_json(&HumidityPayload::new(48.0, "sensor-1")).unwrap();

        assert_eq!(
            parse(&bytes),
            json!({"humidity": "48.0", "sensorId": "sensor-1"})
        );
    }

    #[test]
    fn connection_status_shape() {
        let online = to_json(&ConnectionStatus::online("sensor-1")).unwrap();
        let offline = to_json(&ConnectionStatus::offline("sensor-1")).unwrap();

        assert_eq!(
            parse(&online),
            json!({"activated": true, "sensorId": "sensor-1"})
        );
        assert_eq!(
            parse(&offline),
            json!({"activated": false, "sensorId": "sensor-1"})
        );
    }

    #[test]
    fn values_use_shortest_decimal_form() {
        assert_eq!(format_value(22100.0 / 1000.0), "22.1");
        assert_eq!(format_value(-3.5), "-3.5");
        assert_eq!(format_value(100.0), "100.0");
    }
}
