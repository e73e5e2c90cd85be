use std::f64::consts::SQRT_2;

use crate::config::SensorConfig;

use super::{AnalogInput, SensorError};

/// Turns bursts of raw ADC counts into a power estimate in watts.
///
/// Each burst takes a fixed number of raw samples, converts each to volts as
/// a fraction of the full-scale reference, and keeps the peak. Assuming a
/// sinusoidal signal, `rms = peak / sqrt(2)`; the calibration factor maps
/// RMS volts to amps for the specific sensor/burden-resistor pair, and the
/// fixed line voltage maps amps to watts.
pub struct PowerMeter<A> {
    input: A,
    full_scale: i32,
    reference_voltage: f64,
    calibration_factor: f64,
    line_voltage: f64,
    burst_samples: u32,
}

impl<A: AnalogInput> PowerMeter<A> {
    pub fn new(input: A, cfg: &SensorConfig) -> Self {
        Self {
            input,
            full_scale: cfg.full_scale,
            reference_voltage: cfg.reference_voltage,
            calibration_factor: cfg.calibration_factor,
            line_voltage: cfg.line_voltage,
            burst_samples: cfg.burst_samples,
        }
    }

    /// One complete measurement cycle: burst-read, peak-detect, convert.
    ///
    /// A burst in which no sample rises above zero volts reads as exactly
    /// 0 W rather than producing an undefined peak.
    pub fn sample_watts(&mut self) -> Result<f64, SensorError> {
        let mut peak = 0.0_f64;
        for _ in 0..self.burst_samples {
            let raw = self.input.read_raw()?;
            let volts = f64::from(raw) / f64::from(self.full_scale) * self.reference_voltage;
            if volts > peak {
                peak = volts;
            }
        }

        let rms = if peak > 0.0 { peak / SQRT_2 } else { 0.0 };
        let current = rms * self.calibration_factor;
        Ok(current.abs() * self.line_voltage / 1000.0)
    }
}
