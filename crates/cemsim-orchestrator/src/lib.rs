//! Simulation lifecycle for the cemsim field simulator.
//!
//! [`Simulation::new`] reads a TOML configuration, selects the engine and
//! storage backend through their factories, creates the output target and
//! writes its header. [`Simulation::run`] then drives the fixed-step loop.
//! [`SimulationBuilder`] assembles a simulation from parts instead.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod error;
pub mod simulation;

pub use builder::SimulationBuilder;
pub use error::SimError;
pub use simulation::{RunState, RunSummary, Simulation};
