//! Physical constants (SI).

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Permittivity of free space, F/m.
pub const EPSILON_0: f64 = 8.854_187_82e-12;

/// Permeability of free space, H/m.
pub const MU_0: f64 = 1.256_637_06e-6;

/// Characteristic impedance of free space, `sqrt(μ₀/ε₀)` ≈ 376.73 Ω.
pub fn free_space_impedance() -> f64 {
    (MU_0 / EPSILON_0).sqrt()
}
