//! Dense row-major matrices and the least-squares kernel shared by every estimator.
//!
//! Householder QR with rank detection, `(X'X)^-1` diagonals for standard errors,
//! and Cholesky log-determinants for information criteria. No BLAS.

use std::ops::{Index, IndexMut};

use causeway_core::constants::RANK_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Failures of the numerical kernel. Callers map these to their own errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LinalgError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(&'static str),

    #[error("underdetermined system: {rows} rows, {cols} columns")]
    Underdetermined { rows: usize, cols: usize },

    #[error("design matrix is rank deficient at column {column}")]
    RankDeficient { column: usize },

    #[error("matrix is not positive definite")]
    NotPositiveDefinite,
}

/// A dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Wrap row-major data. Panics if `data.len() != rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), rows * cols, "row-major data has wrong length");
        Self { rows, cols, data }
    }

    /// Build from equal-length rows. Panics on ragged input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            assert_eq!(row.len(), cols, "ragged rows");
            data.extend_from_slice(row);
        }
        Self {
            rows: rows.len(),
            cols,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.rows).map(|i| self[(i, j)]).collect()
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn transpose(&self) -> Self {
        let mut t = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                t[(j, i)] = self[(i, j)];
            }
        }
        t
    }

    /// Matrix product. Panics if the inner dimensions differ.
    pub fn matmul(&self, other: &Matrix) -> Self {
        assert_eq!(self.cols, other.rows, "inner dimensions differ");
        let mut out = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self[(i, k)];
                if a == 0.0 {
                    continue;
                }
                for j in 0..other.cols {
                    out[(i, j)] += a * other[(k, j)];
                }
            }
        }
        out
    }

    /// Matrix-vector product.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.cols, v.len(), "vector length differs from column count");
        (0..self.rows)
            .map(|i| self.row(i).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }

    /// Element-wise `self += other`.
    pub fn add_assign(&mut self, other: &Matrix) {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols), "shape mismatch");
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
    }

    /// `self' * self`.
    pub fn gram(&self) -> Self {
        let mut g = Self::zeros(self.cols, self.cols);
        for r in 0..self.rows {
            let row = self.row(r);
            for i in 0..self.cols {
                for j in i..self.cols {
                    g[(i, j)] += row[i] * row[j];
                }
            }
        }
        for i in 0..self.cols {
            for j in 0..i {
                g[(i, j)] = g[(j, i)];
            }
        }
        g
    }

    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.data {
            *v *= factor;
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}

/// Result of a multi-response least-squares fit `Y = X B + U`.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    /// `B`, one column per response.
    pub coefficients: Matrix,
    /// `U`, one column per response.
    pub residuals: Matrix,
    r: Matrix,
}

impl LeastSquares {
    pub fn nobs(&self) -> usize {
        self.residuals.rows()
    }

    pub fn n_params(&self) -> usize {
        self.coefficients.rows()
    }

    /// Residual sum of squares of response `col`.
    pub fn rss(&self, col: usize) -> f64 {
        (0..self.residuals.rows())
            .map(|i| self.residuals[(i, col)].powi(2))
            .sum()
    }

    /// `U'U`.
    pub fn residual_cross_product(&self) -> Matrix {
        self.residuals.gram()
    }

    /// Diagonal of `(X'X)^-1`, from `R^-1 R^-T`.
    pub fn xtx_inverse_diagonal(&self) -> Vec<f64> {
        let p = self.r.rows();
        let mut rinv = Matrix::zeros(p, p);
        for j in 0..p {
            rinv[(j, j)] = 1.0 / self.r[(j, j)];
            for i in (0..j).rev() {
                let s: f64 = ((i + 1)..=j).map(|k| self.r[(i, k)] * rinv[(k, j)]).sum();
                rinv[(i, j)] = -s / self.r[(i, i)];
            }
        }
        (0..p)
            .map(|i| (i..p).map(|j| rinv[(i, j)].powi(2)).sum())
            .collect()
    }
}

/// Solve `min ||Y - X B||` by Householder QR.
///
/// Fails with `RankDeficient` when a pivot falls below `RANK_TOLERANCE`
/// times the largest column norm of `X`.
pub fn least_squares(x: &Matrix, y: &Matrix) -> Result<LeastSquares, LinalgError> {
    let (n, p) = (x.rows(), x.cols());
    if y.rows() != n {
        return Err(LinalgError::DimensionMismatch("X and Y row counts differ"));
    }
    if n < p {
        return Err(LinalgError::Underdetermined { rows: n, cols: p });
    }

    let scale = (0..p)
        .map(|j| (0..n).map(|i| x[(i, j)].powi(2)).sum::<f64>().sqrt())
        .fold(0.0, f64::max);
    let tol = RANK_TOLERANCE * scale;

    let mut a = x.clone();
    let mut b = y.clone();
    let mut v = vec![0.0; n];

    for j in 0..p {
        let norm = (j..n).map(|i| a[(i, j)].powi(2)).sum::<f64>().sqrt();
        if !norm.is_finite() || norm <= tol {
            return Err(LinalgError::RankDeficient { column: j });
        }
        let alpha = if a[(j, j)] > 0.0 { -norm } else { norm };
        for i in j..n {
            v[i] = a[(i, j)];
        }
        v[j] -= alpha;
        let vnorm2: f64 = (j..n).map(|i| v[i] * v[i]).sum();

        for c in j..a.cols() {
            reflect(&mut a, c, &v, j, vnorm2);
        }
        for c in 0..b.cols() {
            reflect(&mut b, c, &v, j, vnorm2);
        }
    }

    let mut r = Matrix::zeros(p, p);
    for i in 0..p {
        for j in i..p {
            r[(i, j)] = a[(i, j)];
        }
    }

    let mut coefficients = Matrix::zeros(p, y.cols());
    for c in 0..y.cols() {
        for i in (0..p).rev() {
            let s: f64 = ((i + 1)..p).map(|k| r[(i, k)] * coefficients[(k, c)]).sum();
            coefficients[(i, c)] = (b[(i, c)] - s) / r[(i, i)];
        }
    }

    let fitted = x.matmul(&coefficients);
    let mut residuals = y.clone();
    for i in 0..n {
        for c in 0..y.cols() {
            residuals[(i, c)] -= fitted[(i, c)];
        }
    }

    Ok(LeastSquares {
        coefficients,
        residuals,
        r,
    })
}

/// Apply the reflector `I - 2 v v' / v'v` (support `start..`) to column `c`.
fn reflect(m: &mut Matrix, c: usize, v: &[f64], start: usize, vnorm2: f64) {
    let n = m.rows();
    let dot: f64 = (start..n).map(|i| v[i] * m[(i, c)]).sum();
    let s = 2.0 * dot / vnorm2;
    if s == 0.0 {
        return;
    }
    for i in start..n {
        m[(i, c)] -= s * v[i];
    }
}

/// `ln det(M)` of a symmetric positive-definite matrix via Cholesky.
pub fn log_det_spd(m: &Matrix) -> Result<f64, LinalgError> {
    let k = m.rows();
    if m.cols() != k {
        return Err(LinalgError::DimensionMismatch("matrix is not square"));
    }
    let max_diag = (0..k).map(|i| m[(i, i)].abs()).fold(0.0, f64::max);
    let tol = RANK_TOLERANCE * max_diag;

    let mut l = Matrix::zeros(k, k);
    let mut log_det = 0.0;
    for j in 0..k {
        let d = m[(j, j)] - (0..j).map(|c| l[(j, c)].powi(2)).sum::<f64>();
        if !d.is_finite() || d <= tol {
            return Err(LinalgError::NotPositiveDefinite);
        }
        let ljj = d.sqrt();
        l[(j, j)] = ljj;
        log_det += 2.0 * ljj.ln();
        for i in (j + 1)..k {
            let s = m[(i, j)] - (0..j).map(|c| l[(i, c)] * l[(j, c)]).sum::<f64>();
            l[(i, j)] = s / ljj;
        }
    }
    Ok(log_det)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_exact_line_fit() {
        // y = 2 + 3x
        let x = Matrix::from_rows(&[
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![1.0, 2.0],
            vec![1.0, 3.0],
        ]);
        let y = Matrix::from_row_major(4, 1, vec![2.0, 5.0, 8.0, 11.0]);
        let fit = least_squares(&x, &y).unwrap();
        assert!(approx(fit.coefficients[(0, 0)], 2.0));
        assert!(approx(fit.coefficients[(1, 0)], 3.0));
        assert!(fit.rss(0) < 1e-20);
    }

    #[test]
    fn test_noisy_fit_matches_normal_equations() {
        let x = Matrix::from_rows(&[
            vec![1.0, 1.0],
            vec![1.0, 2.0],
            vec![1.0, 3.0],
            vec![1.0, 4.0],
        ]);
        let y = Matrix::from_row_major(4, 1, vec![6.0, 5.0, 7.0, 10.0]);
        let fit = least_squares(&x, &y).unwrap();
        // Closed form: slope 1.4, intercept 3.5.
        assert!(approx(fit.coefficients[(0, 0)], 3.5));
        assert!(approx(fit.coefficients[(1, 0)], 1.4));
        assert!(approx(fit.rss(0), 4.2));

        // (X'X)^-1 = [[1.5, -0.5], [-0.5, 0.2]]
        let diag = fit.xtx_inverse_diagonal();
        assert!(approx(diag[0], 1.5));
        assert!(approx(diag[1], 0.2));
    }

    #[test]
    fn test_collinear_columns_are_rank_deficient() {
        let x = Matrix::from_rows(&[
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
        ]);
        let y = Matrix::from_row_major(3, 1, vec![1.0, 2.0, 3.0]);
        assert_eq!(
            least_squares(&x, &y).unwrap_err(),
            LinalgError::RankDeficient { column: 1 }
        );
    }

    #[test]
    fn test_underdetermined_rejected() {
        let x = Matrix::zeros(2, 3);
        let y = Matrix::zeros(2, 1);
        assert!(matches!(
            least_squares(&x, &y),
            Err(LinalgError::Underdetermined { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_log_det_of_diagonal_and_singular() {
        let m = Matrix::from_rows(&[vec![2.0, 0.0], vec![0.0, 8.0]]);
        assert!(approx(log_det_spd(&m).unwrap(), 16.0_f64.ln()));

        let m = Matrix::from_rows(&[vec![4.0, 2.0], vec![2.0, 3.0]]);
        assert!(approx(log_det_spd(&m).unwrap(), 8.0_f64.ln()));

        let singular = Matrix::from_rows(&[vec![1.0, 1.0], vec![1.0, 1.0]]);
        assert_eq!(log_det_spd(&singular), Err(LinalgError::NotPositiveDefinite));
    }

    #[test]
    fn test_matmul_and_transpose() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let i = Matrix::identity(2);
        assert_eq!(a.matmul(&i), a);
        assert_eq!(a.transpose().transpose(), a);
        assert_eq!(a.gram(), a.transpose().matmul(&a));
        assert_eq!(a.mul_vec(&[1.0, 1.0]), vec![3.0, 7.0]);
    }
}
