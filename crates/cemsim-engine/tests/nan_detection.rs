//! Integration test: non-finite values surface as
//! `EngineError::Numerical` naming the step and cell.

use cemsim_core::{ComputationalEngine, EngineError, FieldComponent, SourceModel, StepIndex};
use cemsim_engine::{Injection, Yee1D};
use cemsim_test_utils::ConstSource;

// ── NaN-producing source ─────────────────────────────────────────────

/// Finite until `bad_from`, NaN afterwards.
struct NanAfter {
    bad_from: f64,
    index: usize,
}

impl SourceModel for NanAfter {
    fn excitation(&self, time: f64, shift: f64) -> f64 {
        if time - shift >= self.bad_from {
            f64::NAN
        } else {
            0.25
        }
    }

    fn source_type(&self) -> &str {
        "nan_after"
    }

    fn injection_index(&self) -> usize {
        self.index
    }
}

#[test]
fn nan_reported_at_the_step_it_appears() {
    let mut engine = Yee1D::builder(32, Box::new(NanAfter { bad_from: 7.0, index: 10 }))
        .build()
        .unwrap();
    for t in 0..7 {
        engine.advance(StepIndex(t)).unwrap();
    }
    let err = engine.advance(StepIndex(7)).unwrap_err();
    match err {
        EngineError::Numerical(e) => {
            assert_eq!(e.step, StepIndex(7));
            assert_eq!(e.component, FieldComponent::Electric);
            assert_eq!(e.cell_index, 10);
            assert!(e.value.is_nan());
        }
        other => panic!("expected Numerical, got {other:?}"),
    }
}

#[test]
fn tfsf_electric_correction_looks_half_a_step_ahead() {
    let mut engine = Yee1D::builder(32, Box::new(NanAfter { bad_from: 3.0, index: 12 }))
        .injection(Injection::Tfsf)
        .build()
        .unwrap();
    for t in 0..2 {
        engine.advance(StepIndex(t)).unwrap();
    }
    // Step 2: the E correction evaluates at time 3 and is already NaN.
    match engine.advance(StepIndex(2)).unwrap_err() {
        EngineError::Numerical(e) => {
            assert_eq!(e.component, FieldComponent::Electric);
            assert_eq!(e.cell_index, 12);
        }
        other => panic!("expected Numerical, got {other:?}"),
    }
}

#[test]
fn bounded_constant_drive_never_trips_the_check() {
    let mut engine = Yee1D::builder(64, Box::new(ConstSource { value: 1e-3, index: 32 }))
        .build()
        .unwrap();
    for t in 0..500 {
        engine.advance(StepIndex(t)).unwrap();
    }
    assert_eq!(engine.steps_taken(), 500);
}
