//! Test utilities and mock types for cemsim development.
//!
//! Provides configuration fixtures ([`sample_config`],
//! [`SAMPLE_CONFIG_TOML`]) and mock implementations of the capability
//! traits, re-exported from [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::path::Path;

use cemsim_core::Configuration;

pub use fixtures::{ConstSource, FailingLogger, MockEngine};

/// A small, valid run: 200 cells, 120 steps, modulated Gaussian at cell 50.
pub const SAMPLE_CONFIG_TOML: &str = r#"
start_time = 0
stop_time = 120

[engine]
kind = "fdtd1d"
grid_size = 200

[source]
kind = "modulated_gaussian"
amplitude = 1.0
frequency = 0.05
pulse_width = 10.0
delay = 30.0
index = 50

[output]
path = "fields.cem"
components = ["E"]
"#;

/// [`SAMPLE_CONFIG_TOML`], parsed.
pub fn sample_config() -> Configuration {
    match Configuration::parse(SAMPLE_CONFIG_TOML) {
        Ok(config) => config,
        Err(e) => panic!("sample configuration must parse: {e}"),
    }
}

/// Write `config` as TOML to `dir/name` and return the path.
pub fn write_config(dir: &Path, name: &str, config: &Configuration) -> std::path::PathBuf {
    let path = dir.join(name);
    let text = match config.to_toml() {
        Ok(text) => text,
        Err(e) => panic!("configuration must serialize: {e}"),
    };
    if let Err(e) = std::fs::write(&path, text) {
        panic!("cannot write {}: {e}", path.display());
    }
    path
}
