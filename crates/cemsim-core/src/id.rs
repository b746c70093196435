//! The simulation clock.

use std::fmt;

/// Discrete simulated-time counter driving the orchestration loop.
///
/// This is the single shared clock: the engine evaluates its source at
/// [`as_time()`](StepIndex::as_time), and time-stamped logger writes
/// record the same value. Steps are dimensionless; one step is one
/// field update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepIndex(pub u64);

impl StepIndex {
    /// Simulation time corresponding to this step, in steps.
    pub fn as_time(self) -> f64 {
        self.0 as f64
    }

    /// The following step.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StepIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepIndex {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_matches_index() {
        assert_eq!(StepIndex(0).as_time(), 0.0);
        assert_eq!(StepIndex(17).as_time(), 17.0);
        assert_eq!(StepIndex(17).next(), StepIndex(18));
    }
}
