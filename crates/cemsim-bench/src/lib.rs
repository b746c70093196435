//! Benchmark profiles for the cemsim field simulator.
//!
//! - [`reference_profile`]: 1 000 cells, 1 000 steps, both components logged
//! - [`stress_profile`]: 100 000 cells, 200 steps

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cemsim_core::Configuration;
use cemsim_test_utils::sample_config;

/// Reference profile: 1 000 cells driven at the center for 1 000 steps.
pub fn reference_profile() -> Configuration {
    let mut config = sample_config();
    config.stop_time = 1_000;
    config.engine.grid_size = 1_000;
    config.source.index = 500;
    config.output.components = vec!["E".into(), "H".into()];
    config
}

/// Stress profile: 100 000 cells for 200 steps, lossy far half.
pub fn stress_profile() -> Configuration {
    let mut config = sample_config();
    config.stop_time = 200;
    config.engine.kind = "fdtd1d_lossy".into();
    config.engine.grid_size = 100_000;
    config.engine.loss = 0.01;
    config.engine.loss_start = 50_000;
    config.source.index = 25_000;
    config
}
