//! Configuration-driven storage backend selection.

use std::fmt;

use cemsim_core::{ConfigError, Configuration, DataLogger};
use tracing::debug;

use crate::binary::BinaryLogger;
use crate::memory::MemoryLogger;

/// Registered storage backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoggerKind {
    /// [`BinaryLogger`].
    Binary,
    /// [`MemoryLogger`].
    Memory,
}

impl LoggerKind {
    /// Resolve an `output.logger` discriminator.
    pub fn from_discriminator(kind: &str) -> Result<Self, ConfigError> {
        match kind {
            BinaryLogger::KIND => Ok(Self::Binary),
            MemoryLogger::KIND => Ok(Self::Memory),
            other => Err(ConfigError::UnknownLogger {
                kind: other.to_string(),
            }),
        }
    }

    /// The discriminator string for this kind.
    pub fn discriminator(self) -> &'static str {
        match self {
            Self::Binary => BinaryLogger::KIND,
            Self::Memory => MemoryLogger::KIND,
        }
    }
}

impl fmt::Display for LoggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.discriminator())
    }
}

/// Build the logger named by `config.output.logger`.
///
/// Pure selection: the returned logger has no open target until
/// [`DataLogger::create_file`] is called.
pub fn create_logger(config: &Configuration) -> Result<Box<dyn DataLogger>, ConfigError> {
    let kind = LoggerKind::from_discriminator(&config.output.logger)?;
    debug!(logger = %kind, "selected storage backend");
    Ok(match kind {
        LoggerKind::Binary => Box::new(BinaryLogger::new()),
        LoggerKind::Memory => Box::new(MemoryLogger::new()),
    })
}
