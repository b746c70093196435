//! Capability traits for the three pluggable subsystems.
//!
//! The orchestrator depends only on these traits. Concrete engines,
//! sources and loggers are chosen by the factories in their own crates
//! and handed over as `Box<dyn Trait>`.

use std::path::Path;

use indexmap::IndexMap;

use crate::config::Configuration;
use crate::error::{EngineError, StorageError};
use crate::field::{ComponentList, Dataset, FieldComponent};
use crate::id::StepIndex;

/// A numerical method that owns and advances field state.
///
/// # Contract
///
/// - `advance()` is a pure function of prior internal state and the step
///   index: two engines built from the same configuration and advanced
///   through the same steps hold bit-identical fields.
/// - `current_field()` returns exactly [`grid_size()`](Self::grid_size)
///   values for every component listed by [`components()`](Self::components).
/// - Only the engine mutates its fields; callers get read-only views.
pub trait ComputationalEngine: Send {
    /// Human-readable name for logging and error reporting.
    fn name(&self) -> &str;

    /// Number of cells per component.
    fn grid_size(&self) -> usize;

    /// Components this engine can report.
    fn components(&self) -> ComponentList;

    /// Advance the fields by one step, injecting the excitation for `step`.
    ///
    /// Returns [`EngineError::Numerical`] if the update produced a
    /// non-finite value.
    fn advance(&mut self, step: StepIndex) -> Result<(), EngineError>;

    /// Read-only snapshot of one component's current values.
    fn current_field(&self, component: FieldComponent) -> Result<&[f64], EngineError>;
}

/// A time-varying excitation.
///
/// Implementations hold no mutable state; calling `excitation()`
/// repeatedly, or out of order, always yields the same value.
///
/// # Examples
///
/// ```
/// use cemsim_core::SourceModel;
///
/// struct Step { at: f64 }
///
/// impl SourceModel for Step {
///     fn excitation(&self, time: f64, shift: f64) -> f64 {
///         if time - shift >= self.at { 1.0 } else { 0.0 }
///     }
///     fn source_type(&self) -> &str { "step" }
///     fn injection_index(&self) -> usize { 0 }
/// }
///
/// let s = Step { at: 3.0 };
/// assert_eq!(s.excitation(2.0, 0.0), 0.0);
/// assert_eq!(s.excitation(4.0, 1.0), 1.0);
/// ```
pub trait SourceModel: Send {
    /// Excitation value evaluated at `time - shift` (both in steps).
    fn excitation(&self, time: f64, shift: f64) -> f64;

    /// Discriminator matching `source.kind` in the configuration.
    fn source_type(&self) -> &str;

    /// Grid cell where the excitation is injected.
    fn injection_index(&self) -> usize;
}

/// Metadata record written once at the head of an output target.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// Flat key/value attributes (crate version, bounds, kinds), in write order.
    pub attributes: IndexMap<String, String>,
    /// The full configuration the run was started with.
    pub configuration: Configuration,
}

/// Durable, append-only storage for field history.
///
/// # Append discipline
///
/// For N `write_data` calls of sizes s₁..sₙ on one dataset, the stored
/// length is Σsᵢ and [`read_vector()`](Self::read_vector) returns the
/// concatenation of all writes in call order. Existing elements are never
/// rewritten. A dataset is created on its first write, and its record
/// length (used by [`read_record()`](Self::read_record)) is that first
/// write's length.
///
/// Writes are visible to subsequent reads as soon as the call returns.
pub trait DataLogger: Send {
    /// Backend discriminator matching `output.logger`.
    fn backend(&self) -> &str;

    /// Create (or truncate) the storage target and make it the open target.
    fn create_file(&mut self, path: &Path) -> Result<(), StorageError>;

    /// Record simulation metadata. Allowed once per target.
    fn write_header(&mut self, configuration: &Configuration) -> Result<(), StorageError>;

    /// Read the header back from the open target.
    fn read_header(&self) -> Result<Header, StorageError>;

    /// Append `values` to `dataset`, creating it on first write.
    fn write_data(&mut self, values: &[f64], dataset: &Dataset) -> Result<(), StorageError>;

    /// Append `values` to `dataset` and `time` to its companion time series.
    ///
    /// The snapshot is written first, so a time stamp is only ever stored
    /// for a snapshot that is already durable.
    fn write_data_at(
        &mut self,
        values: &[f64],
        time: f64,
        dataset: &Dataset,
    ) -> Result<(), StorageError> {
        self.write_data(values, dataset)?;
        self.write_data(&[time], &dataset.time_series())
    }

    /// Full content of `dataset` on the open target.
    fn read_vector(&self, dataset: &Dataset) -> Result<Vec<f64>, StorageError>;

    /// The `index`-th record of `dataset` on the open target.
    fn read_record(&self, index: usize, dataset: &Dataset) -> Result<Vec<f64>, StorageError>;

    /// Full content of `dataset` in another storage file of this backend.
    fn read_vector_from(&self, path: &Path, dataset: &Dataset) -> Result<Vec<f64>, StorageError>;

    /// The `index`-th record of `dataset` in another storage file of this backend.
    fn read_record_from(
        &self,
        path: &Path,
        index: usize,
        dataset: &Dataset,
    ) -> Result<Vec<f64>, StorageError>;

    /// Logical length of `dataset`, or `None` if it does not exist.
    fn dataset_len(&self, dataset: &Dataset) -> Option<u64>;

    /// Datasets on the open target, in creation order.
    fn datasets(&self) -> Vec<Dataset>;

    /// Flush and release the open target. Further writes fail with
    /// [`StorageError::NotOpen`].
    fn close(&mut self) -> Result<(), StorageError>;
}
