//! Error types for the cemsim field simulator.
//!
//! Organized by subsystem: configuration (parsing, validation and factory
//! selection), engine (numerical instability), and storage (the data
//! logger). The orchestrator wraps these in its own `SimError`.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::field::FieldComponent;
use crate::id::StepIndex;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while reading, validating or resolving configuration.
///
/// All of these are fatal and occur before any simulation work or
/// storage write.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Unreadable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        reason: String,
    },
    /// The configuration file is not valid TOML or does not match the schema.
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser message, including the offending key where known.
        detail: String,
    },
    /// A field is present but its value is out of range.
    InvalidField {
        /// Dotted key of the offending field (e.g. `"source.index"`).
        field: &'static str,
        /// Description of the violated constraint.
        reason: String,
    },
    /// `start_time` is not strictly below `stop_time`.
    InvalidTimeBounds {
        /// Configured first step.
        start: u64,
        /// Configured stop step (exclusive).
        stop: u64,
    },
    /// No engine is registered under this discriminator.
    UnknownEngine {
        /// The unrecognized `engine.kind`.
        kind: String,
    },
    /// No source model is registered under this discriminator.
    UnknownSource {
        /// The unrecognized `source.kind`.
        kind: String,
    },
    /// No storage backend is registered under this discriminator.
    UnknownLogger {
        /// The unrecognized `output.logger`.
        kind: String,
    },
    /// A field component name is not recognized.
    UnknownComponent {
        /// The unrecognized name.
        name: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { path, reason } => {
                write!(f, "cannot read configuration {}: {reason}", path.display())
            }
            Self::Parse { path, detail } => {
                write!(f, "invalid configuration {}: {detail}", path.display())
            }
            Self::InvalidField { field, reason } => write!(f, "invalid {field}: {reason}"),
            Self::InvalidTimeBounds { start, stop } => {
                write!(f, "start_time ({start}) must be below stop_time ({stop})")
            }
            Self::UnknownEngine { kind } => write!(f, "unknown engine kind '{kind}'"),
            Self::UnknownSource { kind } => write!(f, "unknown source kind '{kind}'"),
            Self::UnknownLogger { kind } => write!(f, "unknown logger kind '{kind}'"),
            Self::UnknownComponent { name } => write!(f, "unknown field component '{name}'"),
        }
    }
}

impl Error for ConfigError {}

// ── EngineError ────────────────────────────────────────────────────

/// A non-finite value detected in a field after an update.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericalError {
    /// Component holding the bad value.
    pub component: FieldComponent,
    /// Step whose update produced it.
    pub step: StepIndex,
    /// Index of the first non-finite cell.
    pub cell_index: usize,
    /// The offending value (NaN or infinite).
    pub value: f64,
}

impl fmt::Display for NumericalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "non-finite {} value {} at cell {} after step {}",
            self.component, self.value, self.cell_index, self.step
        )
    }
}

impl Error for NumericalError {}

/// Errors from a computational engine.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    /// The field update became unstable.
    Numerical(NumericalError),
    /// The engine does not hold the requested component.
    ComponentUnavailable {
        /// The requested component.
        component: FieldComponent,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numerical(e) => write!(f, "numerical instability: {e}"),
            Self::ComponentUnavailable { component } => {
                write!(f, "engine does not provide component {component}")
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Numerical(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NumericalError> for EngineError {
    fn from(e: NumericalError) -> Self {
        Self::Numerical(e)
    }
}

// ── StorageError ───────────────────────────────────────────────────

/// Errors from a data logger or its storage container.
#[derive(Debug)]
pub enum StorageError {
    /// The storage target could not be created, opened, read or extended.
    Io(io::Error),
    /// The file does not start with the container magic bytes.
    InvalidMagic,
    /// The container format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the file.
        found: u8,
    },
    /// A record could not be decoded (truncated or corrupt data).
    MalformedRecord {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The header was already written; it is a one-time entry.
    HeaderAlreadyWritten,
    /// The container has no header record.
    HeaderMissing,
    /// No storage target is open on this logger.
    NotOpen,
    /// An append carried no values.
    EmptyWrite {
        /// Dataset the empty write was aimed at.
        dataset: String,
    },
    /// The named dataset does not exist.
    DatasetNotFound {
        /// Storage path of the dataset.
        dataset: String,
    },
    /// The requested storage file does not exist.
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },
    /// The record index is past the end of the dataset.
    RecordNotFound {
        /// Storage path of the dataset.
        dataset: String,
        /// Requested record index.
        index: usize,
        /// Number of complete records stored.
        available: usize,
    },
    /// The backend cannot perform this operation.
    Unsupported {
        /// Description of the unsupported operation.
        operation: String,
    },
}

impl StorageError {
    /// Whether this is a dataset, file or record lookup failure.
    ///
    /// Not-found errors are fatal for the read that raised them only.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DatasetNotFound { .. } | Self::FileNotFound { .. } | Self::RecordNotFound { .. }
        )
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"CEML\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported container version {found}")
            }
            Self::MalformedRecord { detail } => write!(f, "malformed record: {detail}"),
            Self::HeaderAlreadyWritten => write!(f, "header already written"),
            Self::HeaderMissing => write!(f, "container has no header"),
            Self::NotOpen => write!(f, "no storage target is open"),
            Self::EmptyWrite { dataset } => write!(f, "empty write to dataset {dataset}"),
            Self::DatasetNotFound { dataset } => write!(f, "dataset {dataset} not found"),
            Self::FileNotFound { path } => write!(f, "file {} not found", path.display()),
            Self::RecordNotFound {
                dataset,
                index,
                available,
            } => write!(
                f,
                "record {index} not found in dataset {dataset} ({available} records stored)"
            ),
            Self::Unsupported { operation } => write!(f, "unsupported operation: {operation}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
