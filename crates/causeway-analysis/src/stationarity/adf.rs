//! Augmented Dickey-Fuller test with a constant term.
//!
//! `dy_t = a + g * y_{t-1} + sum_{i=1..p} d_i * dy_{t-i} + e_t`, H0: `g = 0`.
//! The augmentation lag `p` is chosen by AIC over `0..=max_lag` on a common
//! sample, then the regression is refit on all usable rows at that lag.

use causeway_core::constants::ADF_MIN_OBSERVATIONS;

use super::mackinnon::mackinnon_p_value;
use super::types::AdfError;
use crate::linalg::{least_squares, LeastSquares, Matrix};

const PERFECT_FIT_TOLERANCE: f64 = 1e-20;

/// Result of one ADF test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
    /// t-statistic of `g`.
    pub statistic: f64,
    pub p_value: f64,
    pub used_lag: usize,
    /// Observations in the final regression.
    pub nobs: usize,
}

/// Schwert's rule `ceil(12 * (n/100)^(1/4))`, capped so the autolag sample
/// keeps more rows than parameters.
pub fn adf_max_lag(n: usize) -> usize {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    schwert.min((n / 2).saturating_sub(2))
}

/// Run the ADF test on `series`.
pub fn adf_test(series: &[f64]) -> Result<AdfResult, AdfError> {
    let n = series.len();
    if n < ADF_MIN_OBSERVATIONS {
        return Err(AdfError::TooShort {
            observations: n,
            required: ADF_MIN_OBSERVATIONS,
        });
    }

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let max_lag = adf_max_lag(n);
    let lag = select_lag(series, &diff, max_lag)?;

    let fit = regress(series, &diff, lag, lag).map_err(|_| AdfError::Degenerate)?;
    if is_perfect_fit(&fit, &diff[lag..]) {
        return Err(AdfError::Degenerate);
    }
    let nobs = fit.nobs();
    let dof = nobs - fit.n_params();
    let sigma2 = fit.rss(0) / dof as f64;
    let se = (sigma2 * fit.xtx_inverse_diagonal()[0]).sqrt();
    let gamma = fit.coefficients[(0, 0)];

    let statistic = gamma / se;
    if statistic.is_nan() {
        return Err(AdfError::Degenerate);
    }

    Ok(AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        used_lag: lag,
        nobs,
    })
}

/// AIC lag search. Every candidate uses the sample trimmed by `max_lag`;
/// ties go to the smaller lag and singular candidates are skipped.
fn select_lag(series: &[f64], diff: &[f64], max_lag: usize) -> Result<usize, AdfError> {
    if max_lag == 0 {
        return Ok(0);
    }
    let mut best: Option<(usize, f64)> = None;
    for lag in 0..=max_lag {
        let Ok(fit) = regress(series, diff, lag, max_lag) else {
            continue;
        };
        if is_perfect_fit(&fit, &diff[max_lag..]) {
            continue;
        }
        let nobs = fit.nobs() as f64;
        let rss = fit.rss(0);
        let llf = -nobs / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (rss / nobs).ln() + 1.0);
        let aic = -2.0 * llf + 2.0 * fit.n_params() as f64;
        if best.map_or(true, |(_, b)| aic < b) {
            best = Some((lag, aic));
        }
    }
    best.map(|(lag, _)| lag).ok_or(AdfError::Degenerate)
}

/// Residuals at rounding level relative to the response.
fn is_perfect_fit(fit: &LeastSquares, response: &[f64]) -> bool {
    let scale: f64 = response.iter().map(|v| v * v).sum();
    fit.rss(0) <= PERFECT_FIT_TOLERANCE * scale
}

/// OLS of `dy_t` on `[y_{t-1}, dy_{t-1}, .., dy_{t-lag}, 1]` for
/// `t` in `trim..diff.len()`. Column 0 is the level term.
fn regress(
    series: &[f64],
    diff: &[f64],
    lag: usize,
    trim: usize,
) -> Result<LeastSquares, crate::linalg::LinalgError> {
    let nobs = diff.len().saturating_sub(trim);
    let cols = lag + 2;
    let mut x = Matrix::zeros(nobs, cols);
    let mut y = Matrix::zeros(nobs, 1);
    for (row, t) in (trim..diff.len()).enumerate() {
        x[(row, 0)] = series[t];
        for i in 1..=lag {
            x[(row, i)] = diff[t - i];
        }
        x[(row, cols - 1)] = 1.0;
        y[(row, 0)] = diff[t];
    }
    if nobs <= cols {
        return Err(crate::linalg::LinalgError::Underdetermined {
            rows: nobs,
            cols,
        });
    }
    least_squares(&x, &y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_lag_follows_schwert_rule() {
        assert_eq!(adf_max_lag(100), 12);
        assert_eq!(adf_max_lag(500), 18);
        // Capped by the sample size.
        assert_eq!(adf_max_lag(10), 3);
        assert_eq!(adf_max_lag(4), 0);
    }

    #[test]
    fn test_too_short_series_rejected() {
        assert_eq!(
            adf_test(&[1.0, 2.0, 3.0]),
            Err(AdfError::TooShort {
                observations: 3,
                required: ADF_MIN_OBSERVATIONS
            })
        );
    }

    #[test]
    fn test_white_noise_rejects_unit_root() {
        let series = test_fixtures::white_noise(300, 11);
        let result = adf_test(&series).unwrap();
        assert!(result.p_value < 0.01, "p = {}", result.p_value);
        assert!(result.statistic < -3.43);
    }

    #[test]
    fn test_random_walk_keeps_unit_root() {
        // A 5% test falsely rejects about one walk in twenty.
        let kept = (0..20u64)
            .filter(|seed| {
                let series = test_fixtures::random_walk(300, 100.0, *seed);
                adf_test(&series).unwrap().p_value >= 0.05
            })
            .count();
        assert!(kept >= 15, "only {kept} of 20 walks kept the unit root");
    }

    #[test]
    fn test_linear_trend_is_degenerate() {
        let series: Vec<f64> = (0..50).map(|t| t as f64).collect();
        assert_eq!(adf_test(&series), Err(AdfError::Degenerate));
    }
}
