//! Gaussian-enveloped pulses.
//!
//! ```text
//! τ = time − shift − delay
//! gaussian(τ)           = amplitude · exp(−τ² / width²)
//! modulated_gaussian(τ) = amplitude · cos(2π · frequency · τ) · exp(−τ² / width²)
//! ```

use std::f64::consts::PI;

use cemsim_core::{ConfigError, SourceDescriptor, SourceModel};

fn require_width(desc: &SourceDescriptor) -> Result<f64, ConfigError> {
    if desc.pulse_width > 0.0 {
        Ok(desc.pulse_width)
    } else {
        Err(ConfigError::InvalidField {
            field: "source.pulse_width",
            reason: format!(
                "{} sources need a positive pulse width, got {}",
                desc.kind, desc.pulse_width
            ),
        })
    }
}

/// A carrier at `frequency` under a Gaussian envelope centered at `delay`.
#[derive(Clone, Debug, PartialEq)]
pub struct ModulatedGaussianPulse {
    index: usize,
    amplitude: f64,
    frequency: f64,
    pulse_width: f64,
    pulse_width2: f64,
    delay: f64,
}

impl ModulatedGaussianPulse {
    /// Discriminator for this model.
    pub const KIND: &'static str = "modulated_gaussian";

    /// Build from explicit parameters, unchecked.
    ///
    /// A non-positive `pulse_width` makes [`excitation`](SourceModel::excitation)
    /// non-finite at the delay; [`from_descriptor`](Self::from_descriptor)
    /// rejects it.
    pub fn new(amplitude: f64, frequency: f64, pulse_width: f64, delay: f64, index: usize) -> Self {
        Self {
            index,
            amplitude,
            frequency,
            pulse_width,
            pulse_width2: pulse_width * pulse_width,
            delay,
        }
    }

    /// Build from a configuration descriptor.
    pub fn from_descriptor(desc: &SourceDescriptor) -> Result<Self, ConfigError> {
        let width = require_width(desc)?;
        Ok(Self::new(
            desc.amplitude,
            desc.frequency,
            width,
            desc.delay,
            desc.index,
        ))
    }

    /// Envelope width in steps.
    pub fn pulse_width(&self) -> f64 {
        self.pulse_width
    }
}

impl SourceModel for ModulatedGaussianPulse {
    fn excitation(&self, time: f64, shift: f64) -> f64 {
        let tau = time - shift - self.delay;
        self.amplitude
            * (2.0 * PI * self.frequency * tau).cos()
            * (-(tau * tau) / self.pulse_width2).exp()
    }

    fn source_type(&self) -> &str {
        Self::KIND
    }

    fn injection_index(&self) -> usize {
        self.index
    }
}

/// A bare Gaussian pulse centered at `delay`.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianPulse {
    index: usize,
    amplitude: f64,
    pulse_width2: f64,
    delay: f64,
}

impl GaussianPulse {
    /// Discriminator for this model.
    pub const KIND: &'static str = "gaussian";

    /// Build from explicit parameters, unchecked.
    ///
    /// A non-positive `pulse_width` makes [`excitation`](SourceModel::excitation)
    /// non-finite at the delay; [`from_descriptor`](Self::from_descriptor)
    /// rejects it.
    pub fn new(amplitude: f64, pulse_width: f64, delay: f64, index: usize) -> Self {
        Self {
            index,
            amplitude,
            pulse_width2: pulse_width * pulse_width,
            delay,
        }
    }

    /// Build from a configuration descriptor. `frequency` is ignored.
    pub fn from_descriptor(desc: &SourceDescriptor) -> Result<Self, ConfigError> {
        let width = require_width(desc)?;
        Ok(Self::new(desc.amplitude, width, desc.delay, desc.index))
    }
}

impl SourceModel for GaussianPulse {
    fn excitation(&self, time: f64, shift: f64) -> f64 {
        let tau = time - shift - self.delay;
        self.amplitude * (-(tau * tau) / self.pulse_width2).exp()
    }

    fn source_type(&self) -> &str {
        Self::KIND
    }

    fn injection_index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn closed_form(a: f64, f: f64, w: f64, d: f64, t: f64) -> f64 {
        a * (2.0 * PI * f * (t - d)).cos() * (-((t - d) * (t - d)) / (w * w)).exp()
    }

    #[test]
    fn peak_at_delay() {
        let src = ModulatedGaussianPulse::new(2.5, 0.05, 10.0, 30.0, 4);
        assert_eq!(src.excitation(30.0, 0.0), 2.5);
        assert_eq!(src.injection_index(), 4);
        assert_eq!(src.source_type(), "modulated_gaussian");
    }

    #[test]
    fn shift_moves_evaluation_point() {
        let src = ModulatedGaussianPulse::new(1.0, 0.05, 10.0, 30.0, 0);
        assert_eq!(src.excitation(31.0, 1.0), src.excitation(30.0, 0.0));
        assert_eq!(src.excitation(29.5, -0.5), src.excitation(30.0, 0.0));
    }

    #[test]
    fn envelope_decays_far_from_delay() {
        let src = ModulatedGaussianPulse::new(1.0, 0.05, 10.0, 30.0, 0);
        assert!(src.excitation(200.0, 0.0).abs() < 1e-100);
    }

    #[test]
    fn zero_width_rejected() {
        let desc = SourceDescriptor {
            kind: "modulated_gaussian".into(),
            amplitude: 1.0,
            frequency: 0.05,
            pulse_width: 0.0,
            delay: 30.0,
            index: 0,
        };
        match ModulatedGaussianPulse::from_descriptor(&desc) {
            Err(ConfigError::InvalidField { field, .. }) => assert_eq!(field, "source.pulse_width"),
            other => panic!("expected InvalidField, got {other:?}"),
        }
        let negative = SourceDescriptor {
            kind: "gaussian".into(),
            pulse_width: -2.0,
            ..desc
        };
        match GaussianPulse::from_descriptor(&negative) {
            Err(ConfigError::InvalidField { field, .. }) => assert_eq!(field, "source.pulse_width"),
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn unchecked_zero_width_is_not_finite_at_delay() {
        let src = GaussianPulse::new(1.0, 0.0, 30.0, 0);
        assert!(!src.excitation(30.0, 0.0).is_finite());
    }

    #[test]
    fn gaussian_is_unmodulated() {
        let src = GaussianPulse::new(1.0, 10.0, 30.0, 0);
        let m = ModulatedGaussianPulse::new(1.0, 0.0, 10.0, 30.0, 0);
        for t in 0..60 {
            let t = t as f64;
            assert_eq!(src.excitation(t, 0.0), m.excitation(t, 0.0));
        }
    }

    proptest! {
        #[test]
        fn modulated_gaussian_matches_closed_form(
            a in -10.0f64..10.0,
            f in 0.0f64..0.5,
            w in 0.5f64..50.0,
            d in 0.0f64..100.0,
            t in 0u32..500,
        ) {
            let src = ModulatedGaussianPulse::new(a, f, w, d, 0);
            let t = t as f64;
            let got = src.excitation(t, 0.0);
            let want = closed_form(a, f, w, d, t);
            prop_assert!((got - want).abs() <= 1e-12 * want.abs().max(1.0));
        }

        #[test]
        fn excitation_is_repeatable_in_any_order(
            times in prop::collection::vec(0u32..400, 1..32),
        ) {
            let src = ModulatedGaussianPulse::new(1.0, 0.05, 10.0, 30.0, 0);
            let first: Vec<u64> = times.iter().map(|&t| src.excitation(t as f64, 0.0).to_bits()).collect();
            let second: Vec<u64> = times.iter().rev().map(|&t| src.excitation(t as f64, 0.0).to_bits()).collect();
            let reversed: Vec<u64> = second.into_iter().rev().collect();
            prop_assert_eq!(first, reversed);
        }
    }
}
