//! The orchestrator's error type.

use std::error::Error;
use std::fmt;

use cemsim_core::{ConfigError, Dataset, EngineError, StepIndex, StorageError};

use crate::simulation::RunState;

/// Errors from constructing or running a [`Simulation`](crate::Simulation).
#[derive(Debug)]
pub enum SimError {
    /// Configuration could not be read, validated or resolved.
    Config(ConfigError),
    /// The output target could not be created or the header written.
    Storage(StorageError),
    /// The engine failed while advancing to or reporting `step`.
    EngineFailed {
        /// Step at which the failure occurred.
        step: StepIndex,
        /// The engine's error.
        reason: EngineError,
    },
    /// The logger failed to append the snapshot of `step`.
    LoggerFailed {
        /// Step whose snapshot could not be stored.
        step: StepIndex,
        /// Dataset the append was aimed at.
        dataset: Dataset,
        /// The logger's error.
        reason: StorageError,
    },
    /// A [`SimulationBuilder`](crate::SimulationBuilder) was built without
    /// a required part.
    NotInitialized {
        /// The missing part (`"configuration"`, `"engine"` or `"logger"`).
        missing: &'static str,
    },
    /// `run()` was called on a simulation that already finished or aborted.
    NotReady {
        /// The simulation's current state.
        state: RunState,
    },
}

impl SimError {
    /// The step a loop failure occurred at, if this is one.
    pub fn step(&self) -> Option<StepIndex> {
        match self {
            Self::EngineFailed { step, .. } | Self::LoggerFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Storage(e) => write!(f, "storage error: {e}"),
            Self::EngineFailed { step, reason } => {
                write!(f, "engine failed at step {step}: {reason}")
            }
            Self::LoggerFailed {
                step,
                dataset,
                reason,
            } => write!(f, "logger failed at step {step} writing {dataset}: {reason}"),
            Self::NotInitialized { missing } => {
                write!(f, "simulation is missing its {missing}")
            }
            Self::NotReady { state } => write!(f, "simulation cannot run: it is {state}"),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::EngineFailed { reason, .. } => Some(reason),
            Self::LoggerFailed { reason, .. } => Some(reason),
            Self::NotInitialized { .. } | Self::NotReady { .. } => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StorageError> for SimError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
