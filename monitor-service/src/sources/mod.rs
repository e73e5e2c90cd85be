pub mod adc_power;

pub use adc_power::AdcPowerSource;
