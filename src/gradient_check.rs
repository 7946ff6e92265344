use log::{debug, warn};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Relative error above which a sampled entry is logged as suspicious.
const WARN_REL_ERROR: f64 = 1e-5;

/// One sampled comparison between numerical and analytic gradients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradCheckSample {
    pub row: usize,
    pub col: usize,
    pub numerical: f64,
    pub analytic: f64,
    pub rel_error: f64,
}

/// |a - b| / max(|a| + |b|, tiny). Two zeros compare as 0.
pub fn rel_error(a: f64, b: f64) -> f64 {
    (a - b).abs() / (a.abs() + b.abs()).max(f64::MIN_POSITIVE)
}

/// Centered finite difference of `f(w + h·e_ij)` and `f(w - h·e_ij)` for one entry.
fn centered_difference<F>(f: &F, w: &Matrix, row: usize, col: usize, h: f64) -> f64
where
    F: Fn(&Matrix) -> f64,
{
    let mut probe = w.clone();
    let original = w.get(row, col);

    probe.set(row, col, original + h);
    let fxph = f(&probe);
    probe.set(row, col, original - h);
    let fxmh = f(&probe);

    (fxph - fxmh) / (2.0 * h)
}

/// Numerical gradient of `f` at `w`, one entry at a time.
///
/// Costs two evaluations of `f` per entry of `w`; meant for small matrices.
pub fn eval_numerical_gradient<F>(f: F, w: &Matrix, h: f64) -> Matrix
where
    F: Fn(&Matrix) -> f64,
{
    let mut grad = Matrix::zeros(w.rows, w.cols);
    for i in 0..w.rows {
        for j in 0..w.cols {
            grad.set(i, j, centered_difference(&f, w, i, j, h));
        }
    }
    grad
}

/// Compares `analytic` against centered differences at `num_checks` randomly
/// chosen entries of `w`.
///
/// Returns one sample per check. Entries whose relative error exceeds `1e-5`
/// are logged at `warn` level; the caller decides what tolerance to enforce.
///
/// # Panics
/// Panics if `analytic` and `w` differ in shape, or `w` is empty.
pub fn grad_check_sparse<F, R>(
    f: F,
    w: &Matrix,
    analytic: &Matrix,
    num_checks: usize,
    h: f64,
    rng: &mut R,
) -> Vec<GradCheckSample>
where
    F: Fn(&Matrix) -> f64,
    R: Rng + ?Sized,
{
    assert_eq!(w.shape(), analytic.shape(), "gradient shape must match weights");
    assert!(w.rows > 0 && w.cols > 0, "cannot sample from an empty matrix");

    (0..num_checks)
        .map(|_| {
            let row = rng.gen_range(0..w.rows);
            let col = rng.gen_range(0..w.cols);
            let numerical = centered_difference(&f, w, row, col, h);
            let analytic = analytic.get(row, col);
            let rel_error = rel_error(numerical, analytic);

            if rel_error > WARN_REL_ERROR {
                warn!("grad check ({row}, {col}): numerical={numerical} analytic={analytic} rel_error={rel_error:e}");
            } else {
                debug!("grad check ({row}, {col}): rel_error={rel_error:e}");
            }

            GradCheckSample { row, col, numerical, analytic, rel_error }
        })
        .collect()
}
