//! Computational engines for the cemsim field simulator.
//!
//! Provides [`Yee1D`], a one-dimensional finite-difference time-domain
//! engine on a staggered Yee grid, and [`create_engine`], the factory
//! that maps `engine.kind` to a boxed
//! [`ComputationalEngine`](cemsim_core::ComputationalEngine).
//!
//! | `engine.kind` | Engine |
//! |---------------|--------|
//! | `fdtd1d` | [`Yee1D`], lossless background |
//! | `fdtd1d_lossy` | [`Yee1D`], electric loss from `engine.loss_start` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod factory;
pub mod sentinel;
pub mod yee;

pub use cemsim_core::constants;
pub use factory::{create_engine, EngineKind};
pub use yee::{Boundary, Injection, Yee1D, Yee1DBuilder};
