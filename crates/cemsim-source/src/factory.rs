//! Configuration-driven source selection.

use std::fmt;

use cemsim_core::{ConfigError, SourceDescriptor, SourceModel};
use tracing::debug;

use crate::continuous::ContinuousWave;
use crate::gaussian::{GaussianPulse, ModulatedGaussianPulse};
use crate::ricker::RickerWavelet;

/// Registered source models.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// [`ModulatedGaussianPulse`].
    ModulatedGaussian,
    /// [`GaussianPulse`].
    Gaussian,
    /// [`RickerWavelet`].
    Ricker,
    /// [`ContinuousWave`].
    ContinuousWave,
}

impl SourceKind {
    /// Resolve a `source.kind` discriminator.
    pub fn from_discriminator(kind: &str) -> Result<Self, ConfigError> {
        match kind {
            ModulatedGaussianPulse::KIND => Ok(Self::ModulatedGaussian),
            GaussianPulse::KIND => Ok(Self::Gaussian),
            RickerWavelet::KIND => Ok(Self::Ricker),
            ContinuousWave::KIND => Ok(Self::ContinuousWave),
            other => Err(ConfigError::UnknownSource {
                kind: other.to_string(),
            }),
        }
    }

    /// The discriminator string for this kind.
    pub fn discriminator(self) -> &'static str {
        match self {
            Self::ModulatedGaussian => ModulatedGaussianPulse::KIND,
            Self::Gaussian => GaussianPulse::KIND,
            Self::Ricker => RickerWavelet::KIND,
            Self::ContinuousWave => ContinuousWave::KIND,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.discriminator())
    }
}

/// Build the source model named by `desc.kind`.
///
/// Pure selection: no I/O. Fails with [`ConfigError::UnknownSource`] for
/// an unregistered kind, or [`ConfigError::InvalidField`] when the
/// descriptor lacks a parameter the chosen model needs.
pub fn create_source(desc: &SourceDescriptor) -> Result<Box<dyn SourceModel>, ConfigError> {
    let kind = SourceKind::from_discriminator(&desc.kind)?;
    debug!(source = %kind, index = desc.index, "selected source model");
    Ok(match kind {
        SourceKind::ModulatedGaussian => Box::new(ModulatedGaussianPulse::from_descriptor(desc)?),
        SourceKind::Gaussian => Box::new(GaussianPulse::from_descriptor(desc)?),
        SourceKind::Ricker => Box::new(RickerWavelet::from_descriptor(desc)?),
        SourceKind::ContinuousWave => Box::new(ContinuousWave::from_descriptor(desc)?),
    })
}
