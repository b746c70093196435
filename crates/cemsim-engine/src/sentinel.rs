//! Non-finite value detection after a field update.

use cemsim_core::{FieldComponent, NumericalError, StepIndex};

/// Return an error for the first non-finite value in `values`.
pub fn check_finite(
    values: &[f64],
    component: FieldComponent,
    step: StepIndex,
) -> Result<(), NumericalError> {
    match values.iter().position(|v| !v.is_finite()) {
        None => Ok(()),
        Some(cell_index) => Err(NumericalError {
            component,
            step,
            cell_index,
            value: values[cell_index],
        }),
    }
}
