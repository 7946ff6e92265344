use crate::error::{LossError, Result};
use crate::math::matrix::Matrix;

/// Checks the inputs shared by both loss strategies.
///
/// Runs before any arithmetic: W and X hold the data their shapes claim,
/// W is (D, C), X is (N, D), `y` has N labels in [0, C), and `reg` is finite
/// and non-negative.
pub fn check_inputs(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<()> {
    w.check_consistent()?;
    x.check_consistent()?;
    if x.cols != w.rows {
        return Err(LossError::ShapeMismatch {
            what: "data columns vs weight rows",
            expected: w.rows,
            actual: x.cols,
        });
    }
    if y.len() != x.rows {
        return Err(LossError::ShapeMismatch {
            what: "label count vs data rows",
            expected: x.rows,
            actual: y.len(),
        });
    }
    if x.rows == 0 {
        return Err(LossError::EmptyBatch);
    }
    if w.cols == 0 {
        return Err(LossError::NoClasses);
    }
    if !reg.is_finite() || reg < 0.0 {
        return Err(LossError::InvalidRegularization(reg));
    }
    if let Some((index, &label)) = y.iter().enumerate().find(|(_, &l)| l >= w.cols) {
        return Err(LossError::LabelOutOfRange {
            index,
            label,
            num_classes: w.cols,
        });
    }
    Ok(())
}
