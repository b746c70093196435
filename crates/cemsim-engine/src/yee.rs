//! One-dimensional FDTD on a staggered Yee grid.
//!
//! `E` and `H` both hold `grid_size` cells; `H[m]` sits between `E[m]`
//! and `E[m+1]`. Each step is a leapfrog pair with per-cell coefficients:
//!
//! ```text
//! H[m] = chyh[m]·H[m] + chye[m]·(E[m+1] − E[m])      m in 0..N-1
//! E[m] = ceze[m]·E[m] + cezh[m]·(H[m] − H[m−1])      m in 1..N-1
//! ```
//!
//! Lossless cells use `chyh = 1`, `chye = S/η`, `ceze = 1`, `cezh = S·η`
//! (S = Courant number, η = impedance). Lossy cells scale the electric
//! coefficients by the loss factor `l`: `ceze = (1−l)/(1+l)`,
//! `cezh = S·η/(1+l)`.
//!
//! Both `E` end cells are set by the boundary: first-order Mur
//! ([`Boundary::Absorbing`], exact at S = 1) or a perfect electric
//! conductor ([`Boundary::Pec`]). The last `H` cell has no right-hand
//! neighbour; it mirrors `H[N−2]` under the absorbing boundary and stays
//! zero under PEC.
//!
//! Constructed via the builder pattern: [`Yee1D::builder`].

use cemsim_core::constants::free_space_impedance;
use cemsim_core::{
    ComponentList, ComputationalEngine, ConfigError, EngineError, FieldComponent, SourceModel,
    StepIndex,
};
use smallvec::smallvec;

use crate::sentinel::check_finite;

/// Grid termination at both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// First-order Mur absorbing boundary.
    Absorbing,
    /// Perfect electric conductor: `E = 0` at both ends.
    Pec,
}

impl Boundary {
    /// Resolve an `engine.boundary` discriminator.
    pub fn from_discriminator(s: &str) -> Result<Self, ConfigError> {
        match s {
            "absorbing" | "mur" => Ok(Self::Absorbing),
            "pec" => Ok(Self::Pec),
            other => Err(ConfigError::InvalidField {
                field: "engine.boundary",
                reason: format!("expected \"absorbing\" or \"pec\", got \"{other}\""),
            }),
        }
    }
}

/// How the source excitation enters the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Injection {
    /// Additive source: `E[i] += excitation(t, 0)`.
    Soft,
    /// Total-field/scattered-field boundary between `H[i−1]` and `E[i]`.
    ///
    /// `H[i−1] −= excitation(t, 0)/η` and `E[i] += excitation(t + ½, −½)`,
    /// launching a one-way wave towards increasing `m`.
    Tfsf,
}

impl Injection {
    /// Resolve an `engine.injection` discriminator.
    pub fn from_discriminator(s: &str) -> Result<Self, ConfigError> {
        match s {
            "soft" => Ok(Self::Soft),
            "tfsf" => Ok(Self::Tfsf),
            other => Err(ConfigError::InvalidField {
                field: "engine.injection",
                reason: format!("expected \"soft\" or \"tfsf\", got \"{other}\""),
            }),
        }
    }
}

/// A one-dimensional Yee-grid FDTD engine.
pub struct Yee1D {
    name: String,
    e: Vec<f64>,
    h: Vec<f64>,
    ceze: Vec<f64>,
    cezh: Vec<f64>,
    chyh: Vec<f64>,
    chye: Vec<f64>,
    impedance: f64,
    mur: f64,
    boundary: Boundary,
    injection: Injection,
    source: Box<dyn SourceModel>,
    steps_taken: u64,
}

/// Builder for [`Yee1D`].
///
/// Required: `grid_size` and a source, both given to [`Yee1D::builder`].
pub struct Yee1DBuilder {
    name: String,
    grid_size: usize,
    source: Box<dyn SourceModel>,
    courant: f64,
    impedance: f64,
    boundary: Boundary,
    injection: Injection,
    loss: f64,
    loss_start: usize,
}

impl Yee1D {
    /// Create a builder for a grid of `grid_size` cells driven by `source`.
    pub fn builder(grid_size: usize, source: Box<dyn SourceModel>) -> Yee1DBuilder {
        Yee1DBuilder {
            name: "fdtd1d".to_string(),
            grid_size,
            source,
            courant: 1.0,
            impedance: free_space_impedance(),
            boundary: Boundary::Absorbing,
            injection: Injection::Soft,
            loss: 0.0,
            loss_start: 0,
        }
    }

    /// Background impedance used by the update coefficients.
    pub fn impedance(&self) -> f64 {
        self.impedance
    }

    /// Number of completed `advance()` calls.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// The source driving this engine.
    pub fn source(&self) -> &dyn SourceModel {
        &*self.source
    }

    /// Grid termination in use.
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Total electromagnetic energy on the grid in normalised units
    /// (`½Σ(E² + η²H²)`), useful for stability diagnostics.
    pub fn energy(&self) -> f64 {
        let z2 = self.impedance * self.impedance;
        0.5 * self
            .e
            .iter()
            .zip(&self.h)
            .map(|(e, h)| e * e + z2 * h * h)
            .sum::<f64>()
    }

    fn update_h(&mut self, time: f64) {
        let n = self.e.len();
        for m in 0..n - 1 {
            self.h[m] = self.chyh[m] * self.h[m] + self.chye[m] * (self.e[m + 1] - self.e[m]);
        }
        self.h[n - 1] = match self.boundary {
            Boundary::Absorbing => self.h[n - 2],
            Boundary::Pec => 0.0,
        };
        if self.injection == Injection::Tfsf {
            let i = self.source.injection_index();
            self.h[i - 1] -= self.source.excitation(time, 0.0) / self.impedance;
        }
    }

    fn update_e(&mut self, time: f64) {
        let n = self.e.len();
        let (left_old, left_inner_old) = (self.e[0], self.e[1]);
        let (right_old, right_inner_old) = (self.e[n - 1], self.e[n - 2]);

        for m in 1..n - 1 {
            self.e[m] = self.ceze[m] * self.e[m] + self.cezh[m] * (self.h[m] - self.h[m - 1]);
        }

        match self.boundary {
            Boundary::Absorbing => {
                self.e[0] = left_inner_old + self.mur * (self.e[1] - left_old);
                self.e[n - 1] = right_inner_old + self.mur * (self.e[n - 2] - right_old);
            }
            Boundary::Pec => {
                self.e[0] = 0.0;
                self.e[n - 1] = 0.0;
            }
        }

        let i = self.source.injection_index();
        match self.injection {
            Injection::Soft => self.e[i] += self.source.excitation(time, 0.0),
            Injection::Tfsf => self.e[i] += self.source.excitation(time + 0.5, -0.5),
        }
    }
}

impl Yee1DBuilder {
    /// Engine name reported in logs (default: `"fdtd1d"`).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Courant number (default: 1.0). Must be in (0, 1].
    pub fn courant(mut self, courant: f64) -> Self {
        self.courant = courant;
        self
    }

    /// Background impedance (default: free space). Must be > 0.
    pub fn impedance(mut self, impedance: f64) -> Self {
        self.impedance = impedance;
        self
    }

    /// Grid termination (default: [`Boundary::Absorbing`]).
    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Source injection mode (default: [`Injection::Soft`]).
    pub fn injection(mut self, injection: Injection) -> Self {
        self.injection = injection;
        self
    }

    /// Electric loss factor applied from cell `start` onwards (default: none).
    pub fn loss(mut self, loss: f64, start: usize) -> Self {
        self.loss = loss;
        self.loss_start = start;
        self
    }

    /// Build the engine, validating all parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] if:
    /// - `grid_size` is below 2
    /// - `courant` is outside (0, 1] or `impedance` is not positive
    /// - `loss` is outside [0, 1) or `loss_start` is off the grid
    /// - the source index is off the grid, or on a boundary cell with TFSF injection
    pub fn build(self) -> Result<Yee1D, ConfigError> {
        let n = self.grid_size;
        if n < 2 {
            return Err(ConfigError::InvalidField {
                field: "engine.grid_size",
                reason: format!("must be at least 2, got {n}"),
            });
        }
        if !(self.courant > 0.0 && self.courant <= 1.0) {
            return Err(ConfigError::InvalidField {
                field: "engine.courant",
                reason: format!("must be in (0, 1], got {}", self.courant),
            });
        }
        if !(self.impedance > 0.0 && self.impedance.is_finite()) {
            return Err(ConfigError::InvalidField {
                field: "engine.impedance",
                reason: format!("must be finite and positive, got {}", self.impedance),
            });
        }
        if !(self.loss >= 0.0 && self.loss < 1.0) {
            return Err(ConfigError::InvalidField {
                field: "engine.loss",
                reason: format!("must be in [0, 1), got {}", self.loss),
            });
        }
        if self.loss_start >= n {
            return Err(ConfigError::InvalidField {
                field: "engine.loss_start",
                reason: format!("must be below grid_size ({n}), got {}", self.loss_start),
            });
        }
        let index = self.source.injection_index();
        if index >= n {
            return Err(ConfigError::InvalidField {
                field: "source.index",
                reason: format!("must be below grid_size ({n}), got {index}"),
            });
        }
        if self.injection == Injection::Tfsf && (index == 0 || index == n - 1) {
            return Err(ConfigError::InvalidField {
                field: "source.index",
                reason: format!("TFSF injection needs an interior cell (1..{}), got {index}", n - 1),
            });
        }

        let s = self.courant;
        let z = self.impedance;
        let mut ceze = vec![1.0; n];
        let mut cezh = vec![s * z; n];
        if self.loss > 0.0 {
            for m in self.loss_start..n {
                ceze[m] = (1.0 - self.loss) / (1.0 + self.loss);
                cezh[m] = s * z / (1.0 + self.loss);
            }
        }

        Ok(Yee1D {
            name: self.name,
            e: vec![0.0; n],
            h: vec![0.0; n],
            ceze,
            cezh,
            chyh: vec![1.0; n],
            chye: vec![s / z; n],
            impedance: z,
            mur: (s - 1.0) / (s + 1.0),
            boundary: self.boundary,
            injection: self.injection,
            source: self.source,
            steps_taken: 0,
        })
    }
}

impl ComputationalEngine for Yee1D {
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
        let time = step.as_time();
        self.update_h(time);
        self.update_e(time);
        check_finite(&self.e, FieldComponent::Electric, step)?;
        check_finite(&self.h, FieldComponent::Magnetic, step)?;
        self.steps_taken += 1;
        Ok(())
    }

    fn current_field(&self, component: FieldComponent) -> Result<&[f64], EngineError> {
        Ok(match component {
            FieldComponent::Electric => &self.e,
            FieldComponent::Magnetic => &self.h,
        })
    }
}

impl std::fmt::Debug for Yee1D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Yee1D")
            .field("name", &self.name)
            .field("grid_size", &self.e.len())
            .field("boundary", &self.boundary)
            .field("injection", &self.injection)
            .field("source", &self.source.source_type())
            .field("steps_taken", &self.steps_taken)
            .finish()
    }
}
