use anyhow::Result;

use crate::sensor::{Sensor, SensorValues};

/// Stand-in for hosts without a sensor attached. Values drift in small steps and repeat.
#[derive(Debug, Default)]
pub struct SimulatedSensor {
    tick: u64,
}

impl SimulatedSensor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sensor for SimulatedSensor {
    async fn read(&mut self) -> Result<Option<SensorValues>> {
        let tick = self.tick;
        self.tick = self.tick.wrapping_add(1);

        Ok(Some(SensorValues {
            temperature_celsius: 20.0 + (tick % 8) as f32 * 0.5,
            humidity_percent: 42.0 + (tick % 6) as f32,
        }))
    }
}
