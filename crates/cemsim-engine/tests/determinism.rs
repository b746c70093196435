//! Integration test: engines built from the same configuration and
//! advanced through the same steps hold bit-identical fields.

use cemsim_core::{ComputationalEngine, Configuration, FieldComponent};
use cemsim_engine::create_engine;
use cemsim_test_utils::sample_config;
use proptest::prelude::*;

fn run(config: &Configuration) -> Box<dyn ComputationalEngine> {
    let mut engine = create_engine(config).unwrap();
    for step in config.steps() {
        engine.advance(step).unwrap();
    }
    engine
}

fn bits(engine: &dyn ComputationalEngine, component: FieldComponent) -> Vec<u64> {
    engine
        .current_field(component)
        .unwrap()
        .iter()
        .map(|v| v.to_bits())
        .collect()
}

#[test]
fn repeated_runs_match_for_every_source_kind() {
    for kind in ["modulated_gaussian", "gaussian", "ricker", "cw"] {
        let mut config = sample_config();
        config.source.kind = kind.into();
        let a = run(&config);
        let b = run(&config);
        for component in [FieldComponent::Electric, FieldComponent::Magnetic] {
            assert_eq!(bits(&*a, component), bits(&*b, component), "{kind}/{component}");
        }
    }
}

#[test]
fn field_lengths_match_grid_size() {
    let config = sample_config();
    let engine = run(&config);
    for component in engine.components() {
        assert_eq!(
            engine.current_field(component).unwrap().len(),
            config.engine.grid_size
        );
    }
}

#[test]
fn nonzero_start_time_shifts_the_excitation() {
    let base = sample_config();
    let mut late = sample_config();
    late.start_time = 40;
    late.stop_time = 120;
    // Same stop step, but the late run skips the leading edge of the pulse.
    let a = run(&base);
    let b = run(&late);
    assert_ne!(
        bits(&*a, FieldComponent::Electric),
        bits(&*b, FieldComponent::Electric)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn determinism_holds_for_arbitrary_grids(
        grid_size in 8usize..128,
        steps in 1u64..150,
        index_frac in 0.2f64..0.8,
        tfsf in any::<bool>(),
    ) {
        let mut config = sample_config();
        config.engine.grid_size = grid_size;
        config.stop_time = steps;
        config.source.index = ((grid_size as f64) * index_frac) as usize;
        if tfsf {
            config.engine.injection = "tfsf".into();
        }
        let a = run(&config);
        let b = run(&config);
        prop_assert_eq!(bits(&*a, FieldComponent::Electric), bits(&*b, FieldComponent::Electric));
        prop_assert_eq!(bits(&*a, FieldComponent::Magnetic), bits(&*b, FieldComponent::Magnetic));
    }
}
