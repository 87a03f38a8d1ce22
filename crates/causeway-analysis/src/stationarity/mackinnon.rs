//! MacKinnon (1994) approximate p-values for the Dickey-Fuller tau statistic.
//!
//! Single series, regression with constant only.

use statrs::distribution::{ContinuousCDF, Normal};

/// Above this statistic the p-value is 1.
const TAU_MAX: f64 = 2.74;
/// Below this statistic the p-value is 0.
const TAU_MIN: f64 = -18.83;
/// Switch point between the small-p and large-p surfaces.
const TAU_STAR: f64 = -1.61;

/// Polynomial coefficients, increasing powers, for `stat <= TAU_STAR`.
const TAU_SMALLP: [f64; 3] = [2.1659, 1.4412, 0.038269];
/// Polynomial coefficients, increasing powers, for `stat > TAU_STAR`.
const TAU_LARGEP: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Approximate p-value of an ADF t-statistic.
pub fn mackinnon_p_value(stat: f64) -> f64 {
    if stat.is_nan() {
        return 1.0;
    }
    if stat > TAU_MAX {
        return 1.0;
    }
    if stat < TAU_MIN {
        return 0.0;
    }
    let coefficients: &[f64] = if stat <= TAU_STAR {
        &TAU_SMALLP
    } else {
        &TAU_LARGEP
    };
    let z = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * stat + c);
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.cdf(z),
        Err(_) => 1.0,
    }
}
