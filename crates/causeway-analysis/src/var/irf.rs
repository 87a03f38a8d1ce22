//! Impulse responses from the MA representation of a fitted VAR.

use super::types::VarModelResult;
use crate::linalg::Matrix;

impl VarModelResult {
    /// MA coefficient matrices `Phi_0..=Phi_steps`.
    ///
    /// `Phi_0 = I`, `Phi_i = sum_{j=1..min(i,p)} Phi_{i-j} A_j`. Entry `(r, c)`
    /// of `Phi_i` is the response of variable `r` after `i` steps to a unit
    /// shock in variable `c`.
    pub fn impulse_responses(&self, steps: usize) -> Vec<Matrix> {
        let k = self.n_variables();
        let p = self.lag_order;
        let mut phis: Vec<Matrix> = Vec::with_capacity(steps + 1);
        phis.push(Matrix::identity(k));
        for i in 1..=steps {
            let mut phi = Matrix::zeros(k, k);
            for j in 1..=i.min(p) {
                if let Some(a) = self.coefficient_matrix(j) {
                    phi.add_assign(&phis[i - j].matmul(a));
                }
            }
            phis.push(phi);
        }
        phis
    }
}
