//! Reusable mock engines, sources and loggers.
//!
//! - [`MockEngine`]: fills every cell with the step index, optionally
//!   failing at a chosen step.
//! - [`ConstSource`]: a constant excitation.
//! - [`FailingLogger`]: an in-memory logger that fails after N appends.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cemsim_core::{
    ComponentList, ComputationalEngine, Configuration, DataLogger, Dataset, EngineError,
    FieldComponent, Header, NumericalError, SourceModel, StepIndex, StorageError,
};
use indexmap::IndexMap;
use smallvec::smallvec;

// ── MockEngine ──────────────────────────────────────────────────────

/// Engine whose fields equal the last step index in every cell.
///
/// Makes logged snapshots traceable: record `k` of a run starting at
/// step 0 holds `k` everywhere. The call counter is shared so it stays
/// readable after the engine is boxed into a simulation.
pub struct MockEngine {
    pub name: String,
    e: Vec<f64>,
    h: Vec<f64>,
    fail_at: Option<StepIndex>,
    calls: Arc<AtomicUsize>,
}

impl MockEngine {
    pub fn new(grid_size: usize) -> Self {
        Self {
            name: "mock".to_string(),
            e: vec![0.0; grid_size],
            h: vec![0.0; grid_size],
            fail_at: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Report a numerical error (NaN in cell 0) when advancing to `step`.
    pub fn failing_at(mut self, step: StepIndex) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Shared count of `advance()` calls, including a failing one.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl ComputationalEngine for MockEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn grid_size(&self) -> usize {
        self.e.len()
    }

    fn components(&self) -> ComponentList {
        smallvec![FieldComponent::Electric, FieldComponent::Magnetic]
    }

    fn advance(&mut self, step: StepIndex) -> Result<(), EngineError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_at == Some(step) {
            return Err(NumericalError {
                component: FieldComponent::Electric,
                step,
                cell_index: 0,
                value: f64::NAN,
            }
            .into());
        }
        let v = step.as_time();
        self.e.fill(v);
        self.h.fill(-v);
        Ok(())
    }

    fn current_field(&self, component: FieldComponent) -> Result<&[f64], EngineError> {
        Ok(match component {
            FieldComponent::Electric => &self.e,
            FieldComponent::Magnetic => &self.h,
        })
    }
}

// ── ConstSource ─────────────────────────────────────────────────────

/// Excitation fixed at `value`, injected at `index`.
pub struct ConstSource {
    pub value: f64,
    pub index: usize,
}

impl SourceModel for ConstSource {
    fn excitation(&self, _time: f64, _shift: f64) -> f64 {
        self.value
    }

    fn source_type(&self) -> &str {
        "const"
    }

    fn injection_index(&self) -> usize {
        self.index
    }
}

// ── FailingLogger ───────────────────────────────────────────────────

/// In-memory logger that accepts `succeed_count` appends, then fails
/// every further append with an I/O error.
///
/// Reads see only the appends that succeeded.
pub struct FailingLogger {
    pub succeed_count: usize,
    path: Option<PathBuf>,
    header: Option<Header>,
    data: IndexMap<Dataset, Vec<f64>>,
    writes: Arc<AtomicUsize>,
}

impl FailingLogger {
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            path: None,
            header: None,
            data: IndexMap::new(),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared count of `write_data` calls, successful or not.
    pub fn write_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.writes)
    }
}

impl DataLogger for FailingLogger {
    fn backend(&self) -> &str {
        "failing"
    }

    fn create_file(&mut self, path: &Path) -> Result<(), StorageError> {
        self.path = Some(path.to_path_buf());
        self.header = None;
        self.data.clear();
        Ok(())
    }

    fn write_header(&mut self, configuration: &Configuration) -> Result<(), StorageError> {
        if self.path.is_none() {
            return Err(StorageError::NotOpen);
        }
        if self.header.is_some() {
            return Err(StorageError::HeaderAlreadyWritten);
        }
        self.header = Some(Header {
            attributes: IndexMap::new(),
            configuration: configuration.clone(),
        });
        Ok(())
    }

    fn read_header(&self) -> Result<Header, StorageError> {
        self.header.clone().ok_or(StorageError::HeaderMissing)
    }

    fn write_data(&mut self, values: &[f64], dataset: &Dataset) -> Result<(), StorageError> {
        if self.path.is_none() {
            return Err(StorageError::NotOpen);
        }
        let n = self.writes.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(StorageError::Io(std::io::Error::other(format!(
                "deliberate failure after {} successful writes",
                self.succeed_count
            ))));
        }
        self.data
            .entry(dataset.clone())
            .or_default()
            .extend_from_slice(values);
        Ok(())
    }

    fn read_vector(&self, dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        self.data
            .get(dataset)
            .cloned()
            .ok_or_else(|| StorageError::DatasetNotFound {
                dataset: dataset.path(),
            })
    }

    fn read_record(&self, _index: usize, _dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        Err(StorageError::Unsupported {
            operation: "read_record on FailingLogger".to_string(),
        })
    }

    fn read_vector_from(&self, path: &Path, _dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        Err(StorageError::FileNotFound {
            path: path.to_path_buf(),
        })
    }

    fn read_record_from(
        &self,
        path: &Path,
        _index: usize,
        _dataset: &Dataset,
    ) -> Result<Vec<f64>, StorageError> {
        Err(StorageError::FileNotFound {
            path: path.to_path_buf(),
        })
    }

    fn dataset_len(&self, dataset: &Dataset) -> Option<u64> {
        self.data.get(dataset).map(|v| v.len() as u64)
    }

    fn datasets(&self) -> Vec<Dataset> {
        self.data.keys().cloned().collect()
    }

    fn close(&mut self) -> Result<(), StorageError> {
        self.path = None;
        Ok(())
    }
}
