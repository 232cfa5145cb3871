use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use tracing::debug;

use crate::sensor::{Sensor, SensorValues};

// Ref: https://www.kernel.org/doc/Documentation/ABI/testing/sysfs-bus-iio
const TEMPERATURE_FILE: &str = "in_temp_input";
const HUMIDITY_FILE: &str = "in_humidityrelative_input";

/// DHT11/DHT22 sensor exposed by the kernel `dht11` IIO driver, e.g.
/// `/sys/bus/iio/devices/iio:device0`. Both attributes are reported in thousandths.
#[derive(Debug)]
pub struct IioSensor {
    temperature_path: PathBuf,
    humidity_path: PathBuf,
}

impl IioSensor {
    pub fn new(device_dir: impl AsRef<Path>) -> Result<Self> {
        let device_dir = device_dir.as_ref();
        if !device_dir.is_dir() {
            bail!("IIO device directory not found: {}", device_dir.display());
        }

        Ok(Self {
            temperature_path: device_dir.join(TEMPERATURE_FILE),
            humidity_path: device_dir.join(HUMIDITY_FILE),
        })
    }
}

impl Sensor for IioSensor {
    async fn read(&mut self) -> Result<Option<SensorValues>> {
        let Some(temperature_milli) = read_milli(&self.temperature_path).await? else {
            return Ok(None);
        };
        let Some(humidity_milli) = read_milli(&self.humidity_path).await? else {
            return Ok(None);
        };

        let values = SensorValues {
            temperature_celsius: temperature_milli as f32 / 1000f32,
            humidity_percent: humidity_milli as f32 / 1000f32,
        };

        match values.check_range() {
            Ok(values) => Ok(Some(values)),
            Err(err) => {
                debug!("discarding sensor values: {err:#}");
                Ok(None)
            }
        }
    }
}

async fn read_milli(path: &Path) -> Result<Option<i32>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
        // The driver answers EIO/ETIMEDOUT when a transfer is garbled.
        Err(err) => {
            debug!("sensor transfer failed: {}: {err}", path.display());
            return Ok(None);
        }
    };

    let value = raw
        .trim()
        .parse()
        .with_context(|| format!("failed to parse sensor value: {:?}", raw.trim()))?;

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::process;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            static COUNTER: AtomicU32 = AtomicU32::new(0);
            let path = std::env::temp_dir().join(format!(
                "dht-publisher-iio-{}-{}",
                process::id(),
                COUNTER.fetch_add(1, Ordering::Relaxed)
            ));
            fs::create_dir_all(&path).unwrap();
            Self(path)
        }

        fn write(&self, name: &str, contents: &str) {
            fs::write(self.0.join(name), contents).unwrap();
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn rejects_missing_device_dir() {
        let dir = TempDir::new();
        let err = IioSensor::new(dir.0.join("iio:device9")).unwrap_err();
        assert!(err.to_string().contains("IIO device directory not found"));
    }

    #[tokio::test]
    async fn reads_milli_units() {
        let dir = TempDir::new();
        dir.write(TEMPERATURE_FILE, "22100\n");
        dir.write(HUMIDITY_FILE, "48500\n");

        let mut sensor = IioSensor::new(&dir.0).unwrap();
        let values = sensor.read().await.unwrap().unwrap();

        assert_eq!(values.temperature_celsius, 22.1);
        assert_eq!(values.humidity_percent, 48.5);
    }

    #[tokio::test]
    async fn out_of_range_values_are_discarded() {
        let dir = TempDir::new();
        dir.write(TEMPERATURE_FILE, "22100\n");
        dir.write(HUMIDITY_FILE, "127000\n");

        let mut sensor = IioSensor::new(&dir.0).unwrap();

        assert!(sensor.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_attribute_is_an_error() {
        let dir = TempDir::new();
        dir.write(TEMPERATURE_FILE, "22100\n");

        let mut sensor = IioSensor::new(&dir.0).unwrap();

        assert!(sensor.read().await.is_err());
    }

    #[tokio::test]
    async fn garbage_value_is_an_error() {
        let dir = TempDir::new();
        dir.write(TEMPERATURE_FILE, "not a number\n");
        dir.write(HUMIDITY_FILE, "48500\n");

        let mut sensor = IioSensor::new(&dir.0).unwrap();
        let err = sensor.read().await.unwrap_err();

        assert!(format!("{err:#}").contains("failed to parse sensor value"));
    }
}
