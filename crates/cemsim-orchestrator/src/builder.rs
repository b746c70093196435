//! Assembling a [`Simulation`] from parts.

use std::path::PathBuf;

use cemsim_core::{ComputationalEngine, ConfigError, Configuration, DataLogger};
use tracing::{debug, info};

use crate::error::SimError;
use crate::simulation::{RunState, Simulation};

/// The uninitialized state of a simulation.
///
/// Collects a configuration, an engine and a logger; [`build()`](Self::build)
/// refuses to produce a [`Simulation`] until all three are present, then
/// creates the output target and writes its header.
///
/// # Examples
///
/// ```no_run
/// use cemsim_core::Configuration;
/// use cemsim_engine::create_engine;
/// use cemsim_logger::MemoryLogger;
/// use cemsim_orchestrator::Simulation;
///
/// let config = Configuration::load("run.toml".as_ref())?;
/// let mut sim = Simulation::builder()
///     .engine(create_engine(&config)?)
///     .logger(Box::new(MemoryLogger::new()))
///     .configuration(config)
///     .build()?;
/// sim.run()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Default)]
pub struct SimulationBuilder {
    config: Option<Configuration>,
    engine: Option<Box<dyn ComputationalEngine>>,
    logger: Option<Box<dyn DataLogger>>,
    output: Option<PathBuf>,
}

impl SimulationBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the run configuration.
    pub fn configuration(mut self, config: Configuration) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the engine.
    pub fn engine(mut self, engine: Box<dyn ComputationalEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set the logger. It must not have an open target yet.
    pub fn logger(mut self, logger: Box<dyn DataLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Override `output.path` from the configuration.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Validate the parts, create the output target and write the header.
    ///
    /// # Errors
    ///
    /// - [`SimError::NotInitialized`] naming the first missing part.
    /// - [`SimError::Config`] if the configuration is invalid or the engine
    ///   does not match it (grid size, logged components).
    /// - [`SimError::Storage`] if the target cannot be created.
    pub fn build(self) -> Result<Simulation, SimError> {
        let mut config = self
            .config
            .ok_or(SimError::NotInitialized {
                missing: "configuration",
            })?;
        let engine = self
            .engine
            .ok_or(SimError::NotInitialized { missing: "engine" })?;
        let mut logger = self
            .logger
            .ok_or(SimError::NotInitialized { missing: "logger" })?;
        if let Some(path) = self.output {
            config.output.path = path;
        }

        config.validate()?;
        if engine.grid_size() != config.engine.grid_size {
            return Err(SimError::Config(ConfigError::InvalidField {
                field: "engine.grid_size",
                reason: format!(
                    "engine {} has {} cells, configuration says {}",
                    engine.name(),
                    engine.grid_size(),
                    config.engine.grid_size
                ),
            }));
        }
        let components = config.logged_components()?;
        let available = engine.components();
        if let Some(missing) = components.iter().find(|c| !available.contains(c)) {
            return Err(SimError::Config(ConfigError::InvalidField {
                field: "output.components",
                reason: format!("engine {} does not provide {missing}", engine.name()),
            }));
        }

        logger.create_file(&config.output.path)?;
        logger.write_header(&config)?;
        debug!(path = %config.output.path.display(), "header written");
        info!(
            engine = engine.name(),
            logger = logger.backend(),
            grid_size = engine.grid_size(),
            output = %config.output.path.display(),
            "simulation ready"
        );

        Ok(Simulation {
            config,
            engine,
            logger,
            components,
            state: RunState::Ready,
        })
    }
}
