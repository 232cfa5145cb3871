mod iio;
mod reading;
mod simulated;

pub use iio::*;
pub use reading::*;
pub use simulated::*;

use anyhow::Result;

/// A source of temperature/humidity values.
///
/// `Ok(None)` means the device answered but produced no valid measurement, which is
/// routine for DHT sensors whose single-wire timing is easily disturbed. `Err` means the
/// source itself could not be used.
pub trait Sensor {
    fn read(&mut self) -> impl Future<Output = Result<Option<SensorValues>>>;
}
