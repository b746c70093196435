//! Core types and traits for the cemsim field simulator.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! abstractions every other crate in the workspace builds on: the step
//! clock, field components and dataset names, the configuration model,
//! the error taxonomy, and the three capability traits
//! ([`ComputationalEngine`], [`SourceModel`], [`DataLogger`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod error;
pub mod field;
pub mod id;
pub mod traits;

pub use config::{Configuration, EngineParams, OutputParams, SourceDescriptor};
pub use error::{ConfigError, EngineError, NumericalError, StorageError};
pub use field::{ComponentList, Dataset, FieldComponent};
pub use id::StepIndex;
pub use traits::{ComputationalEngine, DataLogger, Header, SourceModel};
