//! Integration tests: configuration file → simulation → `cemlog` output.

use std::fs;

use cemsim_core::{ConfigError, Dataset, StepIndex};
use cemsim_logger::{BinaryLogger, StorageReader};
use cemsim_orchestrator::{RunState, SimError, Simulation};
use cemsim_test_utils::{sample_config, write_config, MockEngine};
use tempfile::TempDir;

// ── Loop bound ──────────────────────────────────────────────────

#[test]
fn five_steps_store_five_snapshots() {
    let dir = TempDir::new().unwrap();
    let mut config = sample_config();
    config.stop_time = 5;
    let input = write_config(dir.path(), "run.toml", &config);
    let output = dir.path().join("out.cem");

    let mut sim = Simulation::new(&input, &output).unwrap();
    let summary = sim.run().unwrap();
    assert_eq!(summary.steps_executed, 5);
    assert_eq!(summary.snapshots_appended, 5);
    sim.close().unwrap();

    let reader = StorageReader::open(&output).unwrap();
    assert_eq!(reader.record_count(&Dataset::EField), Some(5));
    assert_eq!(reader.dataset_len(&Dataset::EField), Some(5 * 200));
    assert_eq!(reader.dataset_len(&Dataset::HField), None);
    let header = reader.header().unwrap();
    assert_eq!(header.configuration.stop_time, 5);
    assert_eq!(header.configuration.output.path, output);
}

#[test]
fn stored_snapshots_match_a_direct_engine_run() {
    let dir = TempDir::new().unwrap();
    let mut config = sample_config();
    config.output.components = vec!["E".into(), "H".into()];
    let input = write_config(dir.path(), "run.toml", &config);
    let output = dir.path().join("out.cem");
    let mut sim = Simulation::new(&input, &output).unwrap();
    sim.run().unwrap();

    let mut engine = cemsim_engine::create_engine(&config).unwrap();
    let reader = StorageReader::open(&output).unwrap();
    for step in config.steps() {
        engine.advance(step).unwrap();
        let k = (step.0 - config.start_time) as usize;
        for component in [
            cemsim_core::FieldComponent::Electric,
            cemsim_core::FieldComponent::Magnetic,
        ] {
            let stored = reader.read_record(k, &component.dataset()).unwrap();
            assert_eq!(stored, engine.current_field(component).unwrap(), "step {step}");
        }
    }
}

// ── Fail-fast construction ──────────────────────────────────────

#[test]
fn unknown_engine_never_creates_output() {
    let dir = TempDir::new().unwrap();
    let mut config = sample_config();
    config.engine.kind = "fdtd3d".into();
    let input = write_config(dir.path(), "run.toml", &config);
    let output = dir.path().join("out.cem");

    match Simulation::new(&input, &output) {
        Err(SimError::Config(ConfigError::UnknownEngine { kind })) => assert_eq!(kind, "fdtd3d"),
        other => panic!("expected UnknownEngine, got {other:?}"),
    }
    assert!(!output.exists());
}

#[test]
fn unknown_logger_never_creates_output() {
    let dir = TempDir::new().unwrap();
    let mut config = sample_config();
    config.output.logger = "hdf5".into();
    let input = write_config(dir.path(), "run.toml", &config);
    let output = dir.path().join("out.cem");

    assert!(matches!(
        Simulation::new(&input, &output),
        Err(SimError::Config(ConfigError::UnknownLogger { .. }))
    ));
    assert!(!output.exists());
}

#[test]
fn missing_input_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.toml");
    assert!(matches!(
        Simulation::new(&input, &dir.path().join("out.cem")),
        Err(SimError::Config(ConfigError::Unreadable { .. }))
    ));
}

#[test]
fn malformed_input_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.toml");
    fs::write(&input, "start_time = \"soon\"\n").unwrap();
    assert!(matches!(
        Simulation::new(&input, &dir.path().join("out.cem")),
        Err(SimError::Config(ConfigError::Parse { .. }))
    ));
}

#[test]
fn unwritable_output_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let input = write_config(dir.path(), "run.toml", &sample_config());
    let output = dir.path().join("missing-dir").join("out.cem");
    assert!(matches!(
        Simulation::new(&input, &output),
        Err(SimError::Storage(_))
    ));
}

// ── Partial-result preservation ─────────────────────────────────

#[test]
fn failure_at_step_k_leaves_exactly_k_snapshots() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.cem");
    let mut config = sample_config();
    config.engine.grid_size = 16;
    config.source.index = 8;
    config.stop_time = 50;

    let mut sim = Simulation::builder()
        .configuration(config)
        .engine(Box::new(MockEngine::new(16).failing_at(StepIndex(7))))
        .logger(Box::new(BinaryLogger::new()))
        .output_path(&output)
        .build()
        .unwrap();
    match sim.run() {
        Err(e @ SimError::EngineFailed { .. }) => assert_eq!(e.step(), Some(StepIndex(7))),
        other => panic!("expected EngineFailed, got {other:?}"),
    }
    assert_eq!(sim.state(), RunState::Aborted);
    drop(sim);

    let reader = StorageReader::open(&output).unwrap();
    assert_eq!(reader.record_count(&Dataset::EField), Some(7));
    assert_eq!(reader.dataset_len(&Dataset::EField), Some(7 * 16));
    assert_eq!(reader.read_record(6, &Dataset::EField).unwrap(), vec![6.0; 16]);
}

// ── Time-stamped output ─────────────────────────────────────────

#[test]
fn record_time_stores_step_times() {
    let dir = TempDir::new().unwrap();
    let mut config = sample_config();
    config.start_time = 10;
    config.stop_time = 14;
    config.output.record_time = true;
    config.output.components = vec!["H".into()];
    let input = write_config(dir.path(), "run.toml", &config);
    let output = dir.path().join("out.cem");

    let mut sim = Simulation::new(&input, &output).unwrap();
    sim.run().unwrap();
    sim.close().unwrap();

    let reader = StorageReader::open(&output).unwrap();
    assert_eq!(
        reader.read_vector(&Dataset::HField.time_series()).unwrap(),
        vec![10.0, 11.0, 12.0, 13.0]
    );
    assert_eq!(reader.record_count(&Dataset::HField), Some(4));
}

#[test]
fn memory_backend_runs_without_touching_disk() {
    let dir = TempDir::new().unwrap();
    let mut config = sample_config();
    config.output.logger = "memory".into();
    let input = write_config(dir.path(), "run.toml", &config);
    let output = dir.path().join("out.cem");

    let mut sim = Simulation::new(&input, &output).unwrap();
    let summary = sim.run().unwrap();
    assert_eq!(summary.steps_executed, config.step_count());
    assert_eq!(
        sim.logger().dataset_len(&Dataset::EField),
        Some(config.step_count() * 200)
    );
    assert!(!output.exists());
}
