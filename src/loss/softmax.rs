use log::{debug, trace};
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::loss::strategy::LossStrategy;
use crate::loss::validate::check_inputs;
use crate::math::matrix::Matrix;

/// Loss and gradient returned by one evaluation.
///
/// `grad` always has the shape of the weight matrix it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxOutput {
    pub loss: f64,
    pub grad: Matrix,
}

impl SoftmaxOutput {
    pub fn into_pair(self) -> (f64, Matrix) {
        (self.loss, self.grad)
    }
}

/// Softmax cross-entropy loss of a linear classifier and its gradient w.r.t. `w`.
///
/// # Arguments
/// - `w`        — weights, shape (D, C)
/// - `x`        — mini-batch, shape (N, D)
/// - `y`        — N labels, each in [0, C)
/// - `reg`      — L2 strength; adds `0.5·reg·Σw²` to the loss
/// - `strategy` — loop-based or whole-matrix evaluation
///
/// # Errors
/// Shape, label and regularization problems are reported before any
/// computation runs; see [`LossError`](crate::error::LossError).
pub fn softmax_loss(
    w: &Matrix,
    x: &Matrix,
    y: &[usize],
    reg: f64,
    strategy: LossStrategy,
) -> Result<SoftmaxOutput> {
    match strategy {
        LossStrategy::Naive      => softmax_loss_naive(w, x, y, reg),
        LossStrategy::Vectorized => softmax_loss_vectorized(w, x, y, reg),
    }
}

/// Loop-based evaluation: one example at a time, one class at a time.
///
/// Per example i with scores f = x_i·W shifted so that max(f) = 0:
///   L_i = -f[y_i] + ln Σ_j e^{f_j}
///   ∂L_i/∂W[:, j] = (e^{f_j} / Σ_k e^{f_k} - 1{j = y_i}) · x_i
pub fn softmax_loss_naive(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<SoftmaxOutput> {
    check_inputs(w, x, y, reg)?;

    let num_train = x.rows;
    let num_classes = w.cols;
    let dim = w.rows;
    debug!("softmax_loss_naive: N={num_train} D={dim} C={num_classes} reg={reg}");

    let mut loss = 0.0;
    let mut dw = Matrix::zeros(dim, num_classes);

    for (i, &label) in y.iter().enumerate() {
        let xi = x.row(i);

        let mut f = vec![0.0; num_classes];
        for (j, score) in f.iter_mut().enumerate() {
            for d in 0..dim {
                *score += xi[d] * w.data[d][j];
            }
        }

        // Shift so the largest score is 0; exp() can then only underflow.
        let max = f.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for score in f.iter_mut() {
            *score -= max;
        }

        let p: f64 = f.iter().map(|s| s.exp()).sum();
        let example_loss = -f[label] + p.ln();
        trace!("example {i}: label={label} loss={example_loss}");
        loss += example_loss;

        for d in 0..dim {
            dw.data[d][label] -= xi[d];
        }
        for (j, score) in f.iter().enumerate() {
            let prob = score.exp() / p;
            for d in 0..dim {
                dw.data[d][j] += prob * xi[d];
            }
        }
    }

    let n = num_train as f64;
    loss /= n;
    loss += 0.5 * reg * w.sum_squares();

    for d in 0..dim {
        for j in 0..num_classes {
            dw.data[d][j] = dw.data[d][j] / n + reg * w.data[d][j];
        }
    }

    debug!("softmax_loss_naive: loss={loss}");
    Ok(SoftmaxOutput { loss, grad: dw })
}

/// Whole-matrix evaluation.
///
///   F = X·W, shifted row-wise so every row max is 0
///   P = exp(F) / rowsum(exp(F))
///   L = mean_i(-ln P[i, y_i]) + 0.5·reg·Σw²
///   dW = Xᵀ·(P - 1{y}) / N + reg·W
///
/// `-ln P[i, y_i]` is taken as `ln rowsum(exp(F))[i] - F[i, y_i]`, which stays
/// finite even when `P[i, y_i]` underflows to zero.
pub fn softmax_loss_vectorized(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<SoftmaxOutput> {
    check_inputs(w, x, y, reg)?;

    let num_train = x.rows;
    debug!("softmax_loss_vectorized: N={num_train} D={} C={} reg={reg}", w.rows, w.cols);

    let scores = x * w;
    let shifted = scores.zip_rows(&scores.row_max(), |s, m| s - m);
    let exp_scores = shifted.map(f64::exp);
    let sums = exp_scores.row_sum();
    let probs = exp_scores.zip_rows(&sums, |e, s| e / s);

    let data_loss: f64 = y.iter().enumerate()
        .map(|(i, &label)| sums[i].ln() - shifted.data[i][label])
        .sum();

    let mut indicator = Matrix::zeros(num_train, w.cols);
    for (i, &label) in y.iter().enumerate() {
        indicator.set(i, label, 1.0);
    }

    let n = num_train as f64;
    let loss = data_loss / n + 0.5 * reg * w.sum_squares();
    let dw = &(&x.transpose() * &(&probs - &indicator)).scale(1.0 / n) + &w.scale(reg);

    debug!("softmax_loss_vectorized: loss={loss}");
    Ok(SoftmaxOutput { loss, grad: dw })
}
