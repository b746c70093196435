//! Configuration-driven engine selection.

use std::fmt;

use cemsim_core::{ComputationalEngine, ConfigError, Configuration};
use cemsim_source::create_source;
use tracing::debug;

use crate::yee::{Boundary, Injection, Yee1D};

/// Registered engine kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineKind {
    /// Lossless [`Yee1D`].
    Fdtd1d,
    /// [`Yee1D`] with an electric-loss region from `engine.loss_start`.
    Fdtd1dLossy,
}

impl EngineKind {
    /// Resolve an `engine.kind` discriminator.
    pub fn from_discriminator(kind: &str) -> Result<Self, ConfigError> {
        match kind {
            "fdtd1d" => Ok(Self::Fdtd1d),
            "fdtd1d_lossy" => Ok(Self::Fdtd1dLossy),
            other => Err(ConfigError::UnknownEngine {
                kind: other.to_string(),
            }),
        }
    }

    /// The discriminator string for this kind.
    pub fn discriminator(self) -> &'static str {
        match self {
            Self::Fdtd1d => "fdtd1d",
            Self::Fdtd1dLossy => "fdtd1d_lossy",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.discriminator())
    }
}

/// Build the engine named by `config.engine.kind`, with its source.
///
/// Pure selection: no I/O. Unknown engine or source kinds fail with
/// [`ConfigError::UnknownEngine`] / [`ConfigError::UnknownSource`];
/// inconsistent parameters fail with [`ConfigError::InvalidField`].
pub fn create_engine(config: &Configuration) -> Result<Box<dyn ComputationalEngine>, ConfigError> {
    let params = &config.engine;
    let kind = EngineKind::from_discriminator(&params.kind)?;
    let boundary = Boundary::from_discriminator(&params.boundary)?;
    let injection = Injection::from_discriminator(&params.injection)?;

    if kind == EngineKind::Fdtd1d && params.loss != 0.0 {
        return Err(ConfigError::InvalidField {
            field: "engine.loss",
            reason: format!(
                "\"fdtd1d\" is lossless; use \"fdtd1d_lossy\" for loss {}",
                params.loss
            ),
        });
    }

    let source = create_source(&config.source)?;
    debug!(
        engine = %kind,
        grid_size = params.grid_size,
        courant = params.courant,
        ?boundary,
        ?injection,
        "selected engine"
    );

    let mut builder = Yee1D::builder(params.grid_size, source)
        .name(kind.discriminator())
        .courant(params.courant)
        .impedance(params.impedance)
        .boundary(boundary)
        .injection(injection);
    if kind == EngineKind::Fdtd1dLossy {
        builder = builder.loss(params.loss, params.loss_start);
    }
    Ok(Box::new(builder.build()?))
}
