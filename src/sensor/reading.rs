use anyhow::{Result, bail};
use chrono::DateTime;
use chrono_tz::Tz;

// DHT22 operating range.
const MIN_TEMPERATURE_CELSIUS: f32 = -40.0;
const MAX_TEMPERATURE_CELSIUS: f32 = 125.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorValues {
    pub temperature_celsius: f32,

    pub humidity_percent: f32,
}

#[derive(Debug, Clone)]
pub struct Reading {
    pub measured_at: DateTime<Tz>,

    pub temperature_celsius: f32,

    pub humidity_percent: f32,
}

impl SensorValues {
    pub fn check_range(self) -> Result<Self> {
        if !(MIN_TEMPERATURE_CELSIUS..=MAX_TEMPERATURE_CELSIUS).contains(&self.temperature_celsius)
        {
            bail!(
                "temperature out of range: expected {MIN_TEMPERATURE_CELSIUS}-{MAX_TEMPERATURE_CELSIUS}, got {}",
                self.temperature_celsius
            );
        }

        if !(0.0..=100.0).contains(&self.humidity_percent) {
            bail!(
                "humidity out of range: expected 0-100, got {}",
                self.humidity_percent
            );
        }

        Ok(self)
    }

    pub fn at(self, measured_at: DateTime<Tz>) -> Reading {
        Reading {
            measured_at,
            temperature_celsius: self.temperature_celsius,
            humidity_percent: self.humidity_percent,
        }
    }
}
