//! Continuous-wave tone switched on at `delay`.

use std::f64::consts::PI;

use cemsim_core::{ConfigError, SourceDescriptor, SourceModel};

/// `amplitude · sin(2π · frequency · τ)` for `τ = time − shift − delay ≥ 0`, zero before.
///
/// Starting from zero phase keeps the switch-on continuous.
#[derive(Clone, Debug, PartialEq)]
pub struct ContinuousWave {
    index: usize,
    amplitude: f64,
    frequency: f64,
    delay: f64,
}

impl ContinuousWave {
    /// Discriminator for this model.
    pub const KIND: &'static str = "cw";

    /// Build from explicit parameters.
    pub fn new(amplitude: f64, frequency: f64, delay: f64, index: usize) -> Self {
        Self {
            index,
            amplitude,
            frequency,
            delay,
        }
    }

    /// Build from a configuration descriptor. `pulse_width` is ignored.
    pub fn from_descriptor(desc: &SourceDescriptor) -> Result<Self, ConfigError> {
        if desc.frequency <= 0.0 {
            return Err(ConfigError::InvalidField {
                field: "source.frequency",
                reason: format!("cw sources need a positive frequency, got {}", desc.frequency),
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

impl SourceModel for ContinuousWave {
    fn excitation(&self, time: f64, shift: f64) -> f64 {
        let tau = time - shift - self.delay;
        if tau < 0.0 {
            return 0.0;
        }
        self.amplitude * (2.0 * PI * self.frequency * tau).sin()
    }

    fn source_type(&self) -> &str {
        Self::KIND
    }

    fn injection_index(&self) -> usize {
        self.index
    }
}
