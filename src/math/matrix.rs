use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::ops::{Add, Sub, Mul};

use crate::error::{LossError, Result};

/// Dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Uniform samples in [-1, 1).
    pub fn random(rows: usize, cols: usize) -> Matrix {
        let mut rng = rand::thread_rng();
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() * 2.0 - 1.0;
            }
        }

        res
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Both uniforms live in (0, 1] so ln() never sees 0.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Samples from N(0, scale²) with a caller-supplied generator, so seeded
    /// problems are reproducible.
    ///
    /// A small `scale` (e.g. `1e-3`) gives near-uniform class scores, which
    /// puts the initial softmax loss close to `ln(cols)`.
    pub fn randn_scaled<R: Rng + ?Sized>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * scale;
            }
        }
        res
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Builds a matrix from rows.
    ///
    /// # Panics
    /// Panics if the rows have differing lengths. Use [`Matrix::try_from_data`]
    /// for untrusted input.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        match Matrix::try_from_data(data) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }

    /// Fallible counterpart of [`Matrix::from_data`]: rejects ragged rows and
    /// rows of length zero.
    pub fn try_from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, Vec::len);
        if !data.is_empty() && cols == 0 {
            return Err(LossError::InvalidMatrix("rows must not be empty".into()));
        }
        if let Some((i, row)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(LossError::InvalidMatrix(format!(
                "row {i} has {} columns, expected {cols}",
                row.len()
            )));
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data,
        })
    }

    /// Confirms `data` really holds `rows` rows of `cols` entries each.
    ///
    /// A matrix built through the constructors always passes; one assembled
    /// field by field (or deserialized) may not.
    pub fn check_consistent(&self) -> Result<()> {
        if self.data.len() != self.rows {
            return Err(LossError::InvalidMatrix(format!(
                "declared {} rows but holds {}",
                self.rows,
                self.data.len()
            )));
        }
        if let Some((i, row)) = self.data.iter().enumerate().find(|(_, r)| r.len() != self.cols) {
            return Err(LossError::InvalidMatrix(format!(
                "row {i} has {} columns, expected {}",
                row.len(),
                self.cols
            )));
        }
        Ok(())
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row][col] = value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i]
    }

    /// Largest entry of each row, as a column vector of length `rows`.
    pub fn row_max(&self) -> Vec<f64> {
        self.data.iter()
            .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .collect()
    }

    /// Combines every entry of row `i` with `per_row[i]`, e.g. to subtract a
    /// row-wise max or divide by a row-wise sum.
    pub fn zip_rows<F>(&self, per_row: &[f64], functor: F) -> Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        assert_eq!(per_row.len(), self.rows, "Matrices are of incorrect sizes");
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(per_row)
                .map(|(row, &v)| row.iter().map(|&x| functor(x, v)).collect())
                .collect(),
        }
    }

    /// Sum of each row.
    pub fn row_sum(&self) -> Vec<f64> {
        self.data.iter().map(|row| row.iter().sum()).collect()
    }

    /// Σ a_ij², i.e. the sum of the Hadamard square.
    pub fn sum_squares(&self) -> f64 {
        self.data.iter().flatten().map(|x| x * x).sum()
    }

    /// Largest absolute element-wise difference between two same-shape matrices.
    pub fn max_abs_diff(&self, other: &Matrix) -> f64 {
        assert_eq!(self.shape(), other.shape(), "Matrices are of incorrect sizes");
        self.data.iter().flatten()
            .zip(other.data.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|x| x.is_finite())
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] + rhs.data[i][j];
            }
        }

        res
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res =  Matrix::zeros(self.rows, rhs.cols);

        // i-k-j order walks both operands row by row.
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.data[i][k];
                for j in 0..rhs.cols {
                    res.data[i][j] += a * rhs.data[k][j];
                }
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn matmul_matches_hand_computed_product() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_data(vec![vec![5.0, 6.0], vec![7.0, 8.0]]);
        let c = &a * &b;
        assert_eq!(c.data, vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
    }

    #[test]
    #[should_panic(expected = "incorrect sizes")]
    fn matmul_rejects_inner_dimension_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        let _ = &a * &b;
    }

    #[test]
    fn transpose_swaps_shape() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0, 3.0]]);
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 1));
        assert_eq!(t.get(2, 0), 3.0);
    }

    #[test]
    fn try_from_data_rejects_ragged_rows() {
        let err = Matrix::try_from_data(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, LossError::InvalidMatrix(_)));
    }

    #[test]
    fn try_from_data_rejects_empty_rows() {
        let err = Matrix::try_from_data(vec![vec![]]).unwrap_err();
        assert!(matches!(err, LossError::InvalidMatrix(_)));
    }

    #[test]
    fn check_consistent_catches_mismatched_fields() {
        assert_eq!(Matrix::zeros(2, 3).check_consistent(), Ok(()));

        let short = Matrix { rows: 3, cols: 2, data: vec![vec![0.0; 2]; 2] };
        assert!(matches!(short.check_consistent(), Err(LossError::InvalidMatrix(_))));

        let ragged: Matrix =
            serde_json::from_str(r#"{"rows":2,"cols":2,"data":[[1.0,0.0],[0.0]]}"#).unwrap();
        assert!(matches!(ragged.check_consistent(), Err(LossError::InvalidMatrix(_))));
    }

    #[test]
    fn row_reductions() {
        let a = Matrix::from_data(vec![vec![1.0, -4.0, 2.0], vec![-1.0, -3.0, -2.0]]);
        assert_eq!(a.row_max(), vec![2.0, -1.0]);
        assert_eq!(a.row_sum(), vec![-1.0, -6.0]);
        assert_eq!(a.sum_squares(), 1.0 + 16.0 + 4.0 + 1.0 + 9.0 + 4.0);
    }

    #[test]
    fn zip_rows_broadcasts_across_columns() {
        let a = Matrix::from_data(vec![vec![1.0, 3.0], vec![10.0, 4.0]]);
        let shifted = a.zip_rows(&a.row_max(), |x, m| x - m);
        assert_eq!(shifted.data, vec![vec![-2.0, 0.0], vec![0.0, -6.0]]);
    }

    #[test]
    fn max_abs_diff_picks_largest_gap() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0]]);
        let b = Matrix::from_data(vec![vec![1.5, -1.0]]);
        assert_eq!(a.max_abs_diff(&b), 3.0);
    }

    #[test]
    fn randn_scaled_is_reproducible_for_a_seed() {
        let a = Matrix::randn_scaled(4, 3, 0.01, &mut StdRng::seed_from_u64(7));
        let b = Matrix::randn_scaled(4, 3, 0.01, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.data.iter().flatten().all(|x| x.abs() < 0.1));
    }
}
