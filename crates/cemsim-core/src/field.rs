//! Field components and dataset names.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::ConfigError;

/// One physical field component held by an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldComponent {
    /// Electric field (`E`).
    Electric,
    /// Magnetic field (`H`).
    Magnetic,
}

impl FieldComponent {
    /// Short configuration name (`"E"` or `"H"`).
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Electric => "E",
            Self::Magnetic => "H",
        }
    }

    /// The dataset this component is logged under.
    pub fn dataset(self) -> Dataset {
        match self {
            Self::Electric => Dataset::EField,
            Self::Magnetic => Dataset::HField,
        }
    }
}

impl fmt::Display for FieldComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for FieldComponent {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "E" | "EField" | "electric" => Ok(Self::Electric),
            "H" | "HField" | "magnetic" => Ok(Self::Magnetic),
            other => Err(ConfigError::UnknownComponent {
                name: other.to_string(),
            }),
        }
    }
}

/// Components an engine exposes or a run logs. Never more than a handful.
pub type ComponentList = SmallVec<[FieldComponent; 2]>;

/// Name of a growable series in the output container.
///
/// Dispatch on dataset identity goes through this enum; the storage path
/// string is derived from it only at the storage boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Electric-field snapshots (`/EField`).
    EField,
    /// Magnetic-field snapshots (`/HField`).
    HField,
    /// Any other series, addressed by its storage path.
    Named(String),
}

impl Dataset {
    /// Storage path of this dataset. Always begins with `/`.
    pub fn path(&self) -> String {
        match self {
            Self::EField => "/EField".to_string(),
            Self::HField => "/HField".to_string(),
            Self::Named(name) if name.starts_with('/') => name.clone(),
            Self::Named(name) => format!("/{name}"),
        }
    }

    /// Companion series holding one time stamp per time-stamped write.
    pub fn time_series(&self) -> Dataset {
        Dataset::Named(format!("{}/time", self.path()))
    }

    /// Resolve a storage path back into a dataset.
    pub fn from_path(path: &str) -> Self {
        match path.trim_start_matches('/') {
            "EField" => Self::EField,
            "HField" => Self::HField,
            _ => Self::Named(path.to_string()),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
