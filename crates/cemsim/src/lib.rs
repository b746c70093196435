//! cemsim: a one-dimensional FDTD electromagnetic field simulator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all cemsim sub-crates. For most users, adding `cemsim` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cemsim::prelude::*;
//!
//! let config = Configuration::parse(r#"
//!     start_time = 0
//!     stop_time = 50
//!
//!     [engine]
//!     kind = "fdtd1d"
//!     grid_size = 100
//!
//!     [source]
//!     kind = "modulated_gaussian"
//!     amplitude = 1.0
//!     frequency = 0.05
//!     pulse_width = 10.0
//!     delay = 30.0
//!     index = 50
//!
//!     [output]
//!     logger = "memory"
//! "#).unwrap();
//!
//! let mut sim = Simulation::from_config(config).unwrap();
//! let summary = sim.run().unwrap();
//! assert_eq!(summary.steps_executed, 50);
//! assert_eq!(sim.logger().read_record(49, &Dataset::EField).unwrap().len(), 100);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cemsim-core` | Configuration, field components, errors, capability traits |
//! | [`source`] | `cemsim-source` | Excitation models and the source factory |
//! | [`engine`] | `cemsim-engine` | The Yee-grid FDTD engine and the engine factory |
//! | [`logger`] | `cemsim-logger` | `cemlog` storage, logger backends and the logger factory |
//! | [`orchestrator`] | `cemsim-orchestrator` | `Simulation`, its builder and run loop |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, errors and traits (`cemsim-core`).
pub use cemsim_core as types;

/// Excitation models (`cemsim-source`).
pub use cemsim_source as source;

/// Computational engines (`cemsim-engine`).
///
/// [`engine::Yee1D`] and its builder, plus physical constants in
/// [`engine::constants`].
pub use cemsim_engine as engine;

/// Field storage (`cemsim-logger`).
///
/// Write with [`logger::BinaryLogger`], read finished runs with
/// [`logger::StorageReader`].
pub use cemsim_logger as logger;

/// Simulation lifecycle (`cemsim-orchestrator`).
pub use cemsim_orchestrator as orchestrator;

/// Common imports for typical cemsim usage.
///
/// ```rust
/// use cemsim::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use cemsim_core::{
        ComputationalEngine, Configuration, DataLogger, Dataset, FieldComponent, Header,
        SourceModel, StepIndex,
    };

    // Errors
    pub use cemsim_core::{ConfigError, EngineError, NumericalError, StorageError};

    // Factories
    pub use cemsim_engine::create_engine;
    pub use cemsim_logger::create_logger;
    pub use cemsim_source::create_source;

    // Storage
    pub use cemsim_logger::{BinaryLogger, MemoryLogger, StorageReader};

    // Orchestration
    pub use cemsim_orchestrator::{RunState, RunSummary, SimError, Simulation, SimulationBuilder};
}
