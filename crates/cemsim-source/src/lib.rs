//! Excitation source models for the cemsim field simulator.
//!
//! Every model implements [`SourceModel`](cemsim_core::SourceModel): a
//! stateless, deterministic function of `(time, shift)`. Parameters are
//! fixed at construction from a
//! [`SourceDescriptor`](cemsim_core::SourceDescriptor).
//!
//! | `source.kind` | Model |
//! |---------------|-------|
//! | `modulated_gaussian` | [`ModulatedGaussianPulse`] |
//! | `gaussian` | [`GaussianPulse`] |
//! | `ricker` | [`RickerWavelet`] |
//! | `cw` | [`ContinuousWave`] |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod continuous;
pub mod factory;
pub mod gaussian;
pub mod ricker;

pub use continuous::ContinuousWave;
pub use factory::{create_source, SourceKind};
pub use gaussian::{GaussianPulse, ModulatedGaussianPulse};
pub use ricker::RickerWavelet;
