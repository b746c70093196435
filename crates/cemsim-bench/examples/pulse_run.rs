//! Run the reference profile end to end and print where the pulse went.
//!
//! ```text
//! cargo run -p cemsim-bench --example pulse_run
//! ```

use cemsim_bench::reference_profile;
use cemsim_core::Dataset;
use cemsim_logger::StorageReader;
use cemsim_orchestrator::Simulation;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("pulse.cem");
    let config = reference_profile().with_output_path(&output);

    let mut sim = Simulation::from_config(config)?;
    let summary = sim.run()?;
    sim.close()?;
    println!(
        "{} steps, {} snapshots in {} us",
        summary.steps_executed, summary.snapshots_appended, summary.elapsed_us
    );

    let reader = StorageReader::open(&output)?;
    let records = reader.record_count(&Dataset::EField).unwrap_or(0);
    for k in (0..records as usize).step_by(100) {
        let e = reader.read_record(k, &Dataset::EField)?;
        let (peak_cell, peak) = e
            .iter()
            .enumerate()
            .fold((0, 0.0f64), |best, (m, v)| if v.abs() > best.1 { (m, v.abs()) } else { best });
        println!("step {k:4}: |E| peaks at cell {peak_cell:4} ({peak:.3})");
    }
    Ok(())
}
