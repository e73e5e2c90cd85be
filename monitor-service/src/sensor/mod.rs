//! Analog sensor access.
//!
//! The current-transformer sensor hangs off a bus-attached ADC that the
//! kernel exposes through IIO sysfs attributes, so "reading the sensor" is
//! reading and parsing a small attribute file. The [`AnalogInput`] trait is
//! the seam between that hardware detail and the sampling arithmetic.

mod power;

pub use power::PowerMeter;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Errors raised while reading the ADC.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to parse value from {path}: {detail}")]
    Parse { path: String, detail: String },

    /// The expected IIO attribute does not exist — wrong device directory,
    /// or the ADC driver is not loaded.
    #[error("adc channel attribute not found: {path}")]
    NotAvailable { path: String },
}

/// One raw ADC read. Counts may be negative on differential channels.
pub trait AnalogInput: Send {
    fn read_raw(&mut self) -> Result<i32, SensorError>;
}

/// An IIO voltage channel, e.g.
/// `/sys/bus/iio/devices/iio:device0/in_voltage0_raw`.
pub struct IioChannel {
    raw_path: PathBuf,
}

impl IioChannel {
    pub fn new(device_dir: &Path, channel: u32) -> Result<Self, SensorError> {
        let raw_path = device_dir.join(format!("in_voltage{channel}_raw"));
        if !raw_path.exists() {
            return Err(SensorError::NotAvailable {
                path: raw_path.display().to_string(),
            });
        }
        Ok(Self { raw_path })
    }
}

impl AnalogInput for IioChannel {
    fn read_raw(&mut self) -> Result<i32, SensorError> {
        let content = fs::read_to_string(&self.raw_path).map_err(|source| SensorError::Read {
            path: self.raw_path.display().to_string(),
            source,
        })?;

        let trimmed = content.trim();
        trimmed.parse::<i32>().map_err(|_| SensorError::Parse {
            path: self.raw_path.display().to_string(),
            detail: format!("expected integer counts, got '{trimmed}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_attribute_is_not_available() {
        let err = IioChannel::new(Path::new("/nonexistent/iio:device9"), 0)
            .err()
            .expect("constructor must fail");
        assert!(matches!(err, SensorError::NotAvailable { .. }));
    }

    #[test]
    fn reads_and_parses_raw_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("in_voltage0_raw"), "12345\n").expect("write attr");

        let mut chan = IioChannel::new(dir.path(), 0).expect("channel");
        assert_eq!(chan.read_raw().expect("read"), 12345);
    }

    #[test]
    fn garbage_attribute_content_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("in_voltage0_raw"), "not-a-number\n").expect("write attr");

        let mut chan = IioChannel::new(dir.path(), 0).expect("channel");
        assert!(matches!(chan.read_raw(), Err(SensorError::Parse { .. })));
    }
}
