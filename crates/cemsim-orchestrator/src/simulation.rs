//! The simulation run loop.
//!
//! A [`Simulation`] exclusively owns one engine and one logger. Each call
//! to [`run()`](Simulation::run) drives the engine from `start_time` to
//! `stop_time`, appending a snapshot of every logged component after each
//! step:
//!
//! ```text
//! for step in start_time..stop_time:
//!     engine.advance(step)
//!     for component in logged components:
//!         logger.write_data(engine.current_field(component), component.dataset())
//! ```
//!
//! The first failure aborts the loop. Everything appended before it stays
//! in the output and is authoritative; nothing of the failing step is
//! stored.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use cemsim_core::{
    ComponentList, ComputationalEngine, Configuration, DataLogger, FieldComponent, StepIndex,
};
use cemsim_engine::create_engine;
use cemsim_logger::create_logger;
use tracing::{info, trace, warn};

use crate::builder::SimulationBuilder;
use crate::error::SimError;

// Fails to compile if a field stops being Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Simulation>();
    }
};

// ── RunState ────────────────────────────────────────────────────

/// Lifecycle of a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, header written, not yet run.
    Ready,
    /// `run()` completed every step.
    Completed,
    /// `run()` stopped at a failure.
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        })
    }
}

// ── RunSummary ──────────────────────────────────────────────────

/// Outcome of a successful [`Simulation::run()`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of `advance()` calls.
    pub steps_executed: u64,
    /// Number of snapshot appends (one per step and logged component).
    pub snapshots_appended: u64,
    /// Wall-clock time for the whole loop, in microseconds.
    pub elapsed_us: u64,
}

// ── Simulation ──────────────────────────────────────────────────

/// A configured, ready-to-run simulation.
///
/// Built by [`new()`](Simulation::new) from a configuration file, or by
/// [`SimulationBuilder`] from parts. There is no empty or default
/// simulation: by the time one exists its output target has been created
/// and its header written.
pub struct Simulation {
    pub(crate) config: Configuration,
    pub(crate) engine: Box<dyn ComputationalEngine>,
    pub(crate) logger: Box<dyn DataLogger>,
    pub(crate) components: ComponentList,
    pub(crate) state: RunState,
}

impl Simulation {
    /// Read `input` as TOML, build engine and logger, and create `output`.
    ///
    /// `output` replaces `output.path` from the file. Configuration is
    /// fully resolved before the output is touched, so a bad engine, source
    /// or logger kind never creates a file.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] for an unreadable or invalid configuration;
    /// [`SimError::Storage`] if the output cannot be created.
    pub fn new(input: &Path, output: &Path) -> Result<Self, SimError> {
        let config = Configuration::load(input)?.with_output_path(output);
        Self::from_config(config)
    }

    /// Build from an already-parsed configuration, writing to `config.output.path`.
    pub fn from_config(config: Configuration) -> Result<Self, SimError> {
        config.validate()?;
        let engine = create_engine(&config)?;
        let logger = create_logger(&config)?;
        SimulationBuilder::new()
            .configuration(config)
            .engine(engine)
            .logger(logger)
            .build()
    }

    /// Create a builder for assembling a simulation from parts.
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    /// Run every step from `start_time` up to, not including, `stop_time`.
    ///
    /// # Errors
    ///
    /// - [`SimError::NotReady`] if the simulation already ran.
    /// - [`SimError::EngineFailed`] / [`SimError::LoggerFailed`] at the
    ///   first failing step; the simulation is then [`RunState::Aborted`].
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        if self.state != RunState::Ready {
            return Err(SimError::NotReady { state: self.state });
        }
        info!(
            engine = self.engine.name(),
            start = self.config.start_time,
            stop = self.config.stop_time,
            components = self.components.len(),
            "run started"
        );

        let started = Instant::now();
        let mut summary = RunSummary::default();
        let record_time = self.config.output.record_time;
        for step in self.config.steps() {
            trace!(step = step.0, "advancing");
            let appended = run_step(
                self.engine.as_mut(),
                self.logger.as_mut(),
                &self.components,
                step,
                record_time,
            );
            match appended {
                Ok(n) => {
                    summary.steps_executed += 1;
                    summary.snapshots_appended += n;
                }
                Err(e) => {
                    self.state = RunState::Aborted;
                    warn!(
                        step = step.0,
                        completed = summary.steps_executed,
                        error = %e,
                        "run aborted"
                    );
                    return Err(e);
                }
            }
        }
        summary.elapsed_us = started.elapsed().as_micros() as u64;
        self.state = RunState::Completed;
        info!(
            steps = summary.steps_executed,
            snapshots = summary.snapshots_appended,
            elapsed_us = summary.elapsed_us,
            "run finished"
        );
        Ok(summary)
    }

    /// Flush and release the output target.
    pub fn close(mut self) -> Result<(), SimError> {
        self.logger.close()?;
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The configuration this simulation was built from.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Components logged after every step, in configured order.
    pub fn components(&self) -> &[FieldComponent] {
        &self.components
    }

    /// Read-only access to the engine.
    pub fn engine(&self) -> &dyn ComputationalEngine {
        self.engine.as_ref()
    }

    /// Read-only access to the logger, for reading results back.
    pub fn logger(&self) -> &dyn DataLogger {
        self.logger.as_ref()
    }
}

/// Advance one step and append its snapshots. Returns the number appended.
fn run_step(
    engine: &mut dyn ComputationalEngine,
    logger: &mut dyn DataLogger,
    components: &ComponentList,
    step: StepIndex,
    record_time: bool,
) -> Result<u64, SimError> {
    engine
        .advance(step)
        .map_err(|reason| SimError::EngineFailed { step, reason })?;
    for &component in components {
        let field = engine
            .current_field(component)
            .map_err(|reason| SimError::EngineFailed { step, reason })?;
        let dataset = component.dataset();
        let written = if record_time {
            logger.write_data_at(field, step.as_time(), &dataset)
        } else {
            logger.write_data(field, &dataset)
        };
        written.map_err(|reason| SimError::LoggerFailed {
            step,
            dataset,
            reason,
        })?;
    }
    Ok(components.len() as u64)
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("engine", &self.engine.name())
            .field("logger", &self.logger.backend())
            .field("components", &self.components)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cemsim_core::Dataset;
    use cemsim_logger::MemoryLogger;
    use cemsim_test_utils::{sample_config, FailingLogger, MockEngine};
    use proptest::prelude::*;
    use std::sync::atomic::Ordering;

    fn mock_sim(config: Configuration, engine: MockEngine) -> Simulation {
        Simulation::builder()
            .configuration(config)
            .engine(Box::new(engine))
            .logger(Box::new(MemoryLogger::new()))
            .build()
            .unwrap()
    }

    fn short_config(start: u64, stop: u64) -> Configuration {
        let mut config = sample_config();
        config.start_time = start;
        config.stop_time = stop;
        config.engine.grid_size = 4;
        config.source.index = 1;
        config
    }

    #[test]
    fn five_steps_append_five_snapshots() {
        let mut sim = mock_sim(short_config(0, 5), MockEngine::new(4));
        let summary = sim.run().unwrap();
        assert_eq!(summary.steps_executed, 5);
        assert_eq!(summary.snapshots_appended, 5);
        assert_eq!(sim.state(), RunState::Completed);
        for k in 0..5 {
            assert_eq!(
                sim.logger().read_record(k, &Dataset::EField).unwrap(),
                vec![k as f64; 4]
            );
        }
        assert!(sim.logger().read_record(5, &Dataset::EField).is_err());
    }

    #[test]
    fn both_components_logged_in_order() {
        let mut config = short_config(2, 4);
        config.output.components = vec!["E".into(), "H".into()];
        let mut sim = mock_sim(config, MockEngine::new(4));
        let summary = sim.run().unwrap();
        assert_eq!(summary.snapshots_appended, 4);
        assert_eq!(
            sim.components(),
            &[FieldComponent::Electric, FieldComponent::Magnetic]
        );
        assert_eq!(
            sim.logger().read_vector(&Dataset::HField).unwrap(),
            vec![-2.0, -2.0, -2.0, -2.0, -3.0, -3.0, -3.0, -3.0]
        );
    }

    #[test]
    fn second_run_refused() {
        let mut sim = mock_sim(short_config(0, 2), MockEngine::new(4));
        sim.run().unwrap();
        assert!(matches!(
            sim.run(),
            Err(SimError::NotReady {
                state: RunState::Completed
            })
        ));
    }

    #[test]
    fn engine_failure_keeps_prior_snapshots() {
        let engine = MockEngine::new(4).failing_at(StepIndex(3));
        let advances = engine.call_counter();
        let mut sim = mock_sim(short_config(0, 10), engine);
        match sim.run() {
            Err(SimError::EngineFailed { step, .. }) => assert_eq!(step, StepIndex(3)),
            other => panic!("expected EngineFailed, got {other:?}"),
        }
        assert_eq!(advances.load(Ordering::Relaxed), 4);
        assert_eq!(sim.state(), RunState::Aborted);
        assert_eq!(sim.logger().dataset_len(&Dataset::EField), Some(12));
        assert!(matches!(sim.run(), Err(SimError::NotReady { .. })));
    }

    #[test]
    fn logger_failure_reports_step_and_dataset() {
        let mut config = short_config(0, 10);
        config.output.components = vec!["E".into(), "H".into()];
        // Step 0 writes E and H, step 1 writes E, then H fails.
        let logger = FailingLogger::new(3);
        let writes = logger.write_counter();
        let mut sim = Simulation::builder()
            .configuration(config)
            .engine(Box::new(MockEngine::new(4)))
            .logger(Box::new(logger))
            .build()
            .unwrap();
        match sim.run() {
            Err(SimError::LoggerFailed { step, dataset, .. }) => {
                assert_eq!(step, StepIndex(1));
                assert_eq!(dataset, Dataset::HField);
            }
            other => panic!("expected LoggerFailed, got {other:?}"),
        }
        assert_eq!(sim.logger().dataset_len(&Dataset::EField), Some(8));
        assert_eq!(sim.logger().dataset_len(&Dataset::HField), Some(4));
        assert_eq!(writes.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn record_time_writes_companion_series() {
        let mut config = short_config(3, 6);
        config.output.record_time = true;
        let mut sim = mock_sim(config, MockEngine::new(4));
        sim.run().unwrap();
        assert_eq!(
            sim.logger()
                .read_vector(&Dataset::EField.time_series())
                .unwrap(),
            vec![3.0, 4.0, 5.0]
        );
    }

    proptest! {
        #[test]
        fn loop_runs_exactly_stop_minus_start_steps(start in 0u64..50, len in 1u64..40) {
            let engine = MockEngine::new(4);
            let advances = engine.call_counter();
            let mut sim = mock_sim(short_config(start, start + len), engine);
            let summary = sim.run().unwrap();
            prop_assert_eq!(summary.steps_executed, len);
            prop_assert_eq!(advances.load(Ordering::Relaxed) as u64, len);
            prop_assert_eq!(sim.logger().dataset_len(&Dataset::EField), Some(len * 4));
            let last = sim.logger().read_record(len as usize - 1, &Dataset::EField).unwrap();
            prop_assert_eq!(last, vec![(start + len - 1) as f64; 4]);
        }
    }
}
