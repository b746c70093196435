//! Ricker wavelet (second derivative of a Gaussian).
//!
//! ```text
//! arg    = π · frequency · (time − shift − delay)
//! ricker = amplitude · (1 − 2·arg²) · exp(−arg²)
//! ```
//!
//! `frequency` is the peak frequency of the wavelet's spectrum.

use std::f64::consts::PI;

use cemsim_core::{ConfigError, SourceDescriptor, SourceModel};

/// Zero-mean wavelet peaking at `delay`.
#[derive(Clone, Debug, PartialEq)]
pub struct RickerWavelet {
    index: usize,
    amplitude: f64,
    peak_frequency: f64,
    delay: f64,
}

impl RickerWavelet {
    /// Discriminator for this model.
    pub const KIND: &'static str = "ricker";

    /// Build from explicit parameters.
    pub fn new(amplitude: f64, peak_frequency: f64, delay: f64, index: usize) -> Self {
        Self {
            index,
            amplitude,
            peak_frequency,
            delay,
        }
    }

    /// Build from a configuration descriptor. `pulse_width` is ignored.
    pub fn from_descriptor(desc: &SourceDescriptor) -> Result<Self, ConfigError> {
        if desc.frequency <= 0.0 {
            return Err(ConfigError::InvalidField {
                field: "source.frequency",
                reason: format!(
                    "ricker sources need a positive peak frequency, got {}",
                    desc.frequency
                ),
            });
        }
        Ok(Self::new(
            desc.amplitude,
            desc.frequency,
            desc.delay,
            desc.index,
        ))
    }
}

impl SourceModel for RickerWavelet {
    fn excitation(&self, time: f64, shift: f64) -> f64 {
        let arg = PI * self.peak_frequency * (time - shift - self.delay);
        let arg2 = arg * arg;
        self.amplitude * (1.0 - 2.0 * arg2) * (-arg2).exp()
    }

    fn source_type(&self) -> &str {
        Self::KIND
    }

    fn injection_index(&self) -> usize {
        self.index
    }
}
