//! The configuration model and its TOML front end.
//!
//! [`Configuration`] is produced once before a run and never mutated
//! afterwards. Discriminators (`engine.kind`, `source.kind`,
//! `output.logger`, `engine.boundary`, `engine.injection`) stay strings
//! here; the factories resolve them and reject unknown values.
//!
//! ```toml
//! start_time = 0
//! stop_time = 400
//!
//! [engine]
//! kind = "fdtd1d"
//! grid_size = 200
//!
//! [source]
//! kind = "modulated_gaussian"
//! amplitude = 1.0
//! frequency = 0.05
//! pulse_width = 10.0
//! delay = 30.0
//! index = 50
//!
//! [output]
//! path = "fields.cem"
//! components = ["E"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::free_space_impedance;
use crate::error::ConfigError;
use crate::field::{ComponentList, FieldComponent};
use crate::id::StepIndex;

fn default_courant() -> f64 {
    1.0
}

fn default_impedance() -> f64 {
    free_space_impedance()
}

fn default_boundary() -> String {
    "absorbing".to_string()
}

fn default_injection() -> String {
    "soft".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("fields.cem")
}

fn default_logger() -> String {
    "binary".to_string()
}

fn default_components() -> Vec<String> {
    vec!["E".to_string()]
}

// ── EngineParams ───────────────────────────────────────────────────

/// Grid and numerical-method parameters for the computational engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineParams {
    /// Engine discriminator (e.g. `"fdtd1d"`).
    pub kind: String,
    /// Number of cells per field component.
    pub grid_size: usize,
    /// Courant number `c·Δt/Δx`. Default: 1.0.
    #[serde(default = "default_courant")]
    pub courant: f64,
    /// Characteristic impedance of the background medium. Default: free space.
    #[serde(default = "default_impedance")]
    pub impedance: f64,
    /// Grid termination (`"absorbing"` or `"pec"`). Default: `"absorbing"`.
    #[serde(default = "default_boundary")]
    pub boundary: String,
    /// How the excitation enters the grid (`"soft"` or `"tfsf"`). Default: `"soft"`.
    #[serde(default = "default_injection")]
    pub injection: String,
    /// Electric loss factor for lossy engines. Default: 0.0.
    #[serde(default)]
    pub loss: f64,
    /// First cell of the lossy region. Default: 0.
    #[serde(default)]
    pub loss_start: usize,
}

// ── SourceDescriptor ───────────────────────────────────────────────

/// Parameters of the excitation source. One descriptor backs one source model.
///
/// Times are in steps and frequencies in cycles per step, so every
/// component reads the shared step clock identically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceDescriptor {
    /// Source discriminator (e.g. `"modulated_gaussian"`).
    pub kind: String,
    /// Peak amplitude.
    pub amplitude: f64,
    /// Carrier (or peak) frequency in cycles per step. Default: 0.0.
    #[serde(default)]
    pub frequency: f64,
    /// Gaussian envelope width in steps.
    #[serde(default)]
    pub pulse_width: f64,
    /// Envelope center (time delay) in steps.
    #[serde(default)]
    pub delay: f64,
    /// Grid cell where the excitation is injected.
    pub index: usize,
}

// ── OutputParams ───────────────────────────────────────────────────

/// Where and how field history is persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputParams {
    /// Output container path. Default: `fields.cem`.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    /// Storage backend discriminator (`"binary"` or `"memory"`). Default: `"binary"`.
    #[serde(default = "default_logger")]
    pub logger: String,
    /// Field components appended each step. Default: `["E"]`.
    #[serde(default = "default_components")]
    pub components: Vec<String>,
    /// Co-write a time stamp series with every snapshot. Default: false.
    #[serde(default)]
    pub record_time: bool,
}

impl Default for OutputParams {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            logger: default_logger(),
            components: default_components(),
            record_time: false,
        }
    }
}

// ── Configuration ──────────────────────────────────────────────────

/// Complete, immutable description of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// First step index (inclusive).
    pub start_time: u64,
    /// Last step index (exclusive).
    pub stop_time: u64,
    /// Engine selection and grid parameters.
    pub engine: EngineParams,
    /// Excitation source parameters.
    pub source: SourceDescriptor,
    /// Output target and logging options.
    #[serde(default)]
    pub output: OutputParams,
}

impl Configuration {
    /// Read, parse and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse_with_origin(&text, path)
    }

    /// Parse and validate a TOML configuration held in memory.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Self::parse_with_origin(text, Path::new("<memory>"))
    }

    fn parse_with_origin(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            detail: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML. Used to embed the configuration in output headers.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<serialize>"),
            detail: e.to_string(),
        })
    }

    /// Check structural invariants.
    ///
    /// Discriminators are not checked here; the factories own that.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Non-empty time window.
        if self.start_time >= self.stop_time {
            return Err(ConfigError::InvalidTimeBounds {
                start: self.start_time,
                stop: self.stop_time,
            });
        }
        // 2. Grid must hold at least two cells (one H cell between two E cells).
        let e = &self.engine;
        if e.grid_size < 2 {
            return Err(ConfigError::InvalidField {
                field: "engine.grid_size",
                reason: format!("must be at least 2, got {}", e.grid_size),
            });
        }
        // 3. Courant number in (0, 1].
        if !e.courant.is_finite() || e.courant <= 0.0 || e.courant > 1.0 {
            return Err(ConfigError::InvalidField {
                field: "engine.courant",
                reason: format!("must be in (0, 1], got {}", e.courant),
            });
        }
        if !e.impedance.is_finite() || e.impedance <= 0.0 {
            return Err(ConfigError::InvalidField {
                field: "engine.impedance",
                reason: format!("must be finite and positive, got {}", e.impedance),
            });
        }
        if !e.loss.is_finite() || e.loss < 0.0 || e.loss >= 1.0 {
            return Err(ConfigError::InvalidField {
                field: "engine.loss",
                reason: format!("must be in [0, 1), got {}", e.loss),
            });
        }
        if e.loss_start >= e.grid_size {
            return Err(ConfigError::InvalidField {
                field: "engine.loss_start",
                reason: format!(
                    "must be below grid_size ({}), got {}",
                    e.grid_size, e.loss_start
                ),
            });
        }
        // 4. Source parameters.
        let s = &self.source;
        if !s.amplitude.is_finite() {
            return Err(ConfigError::InvalidField {
                field: "source.amplitude",
                reason: format!("must be finite, got {}", s.amplitude),
            });
        }
        if !s.frequency.is_finite() || s.frequency < 0.0 {
            return Err(ConfigError::InvalidField {
                field: "source.frequency",
                reason: format!("must be finite and non-negative, got {}", s.frequency),
            });
        }
        if !s.pulse_width.is_finite() || s.pulse_width < 0.0 {
            return Err(ConfigError::InvalidField {
                field: "source.pulse_width",
                reason: format!("must be finite and non-negative, got {}", s.pulse_width),
            });
        }
        if !s.delay.is_finite() {
            return Err(ConfigError::InvalidField {
                field: "source.delay",
                reason: format!("must be finite, got {}", s.delay),
            });
        }
        if s.index >= e.grid_size {
            return Err(ConfigError::InvalidField {
                field: "source.index",
                reason: format!("must be below grid_size ({}), got {}", e.grid_size, s.index),
            });
        }
        // 5. Output components.
        if self.output.components.is_empty() {
            return Err(ConfigError::InvalidField {
                field: "output.components",
                reason: "at least one component must be logged".to_string(),
            });
        }
        self.logged_components()?;
        Ok(())
    }

    /// Number of steps the run will execute.
    pub fn step_count(&self) -> u64 {
        self.stop_time.saturating_sub(self.start_time)
    }

    /// The step indices of the run, in order.
    pub fn steps(&self) -> impl Iterator<Item = StepIndex> {
        (self.start_time..self.stop_time).map(StepIndex)
    }

    /// Resolve `output.components` into field components, in configured order.
    pub fn logged_components(&self) -> Result<ComponentList, ConfigError> {
        let mut out = ComponentList::new();
        for name in &self.output.components {
            let component: FieldComponent = name.parse()?;
            if !out.contains(&component) {
                out.push(component);
            }
        }
        Ok(out)
    }

    /// Replace the output path, keeping everything else.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.path = path.into();
        self
    }
}
