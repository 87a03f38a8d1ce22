//! Restricted vs unrestricted OLS F-tests over every ordered variable pair.
//!
//! Restricted: effect on its own lags `1..=L` plus intercept.
//! Unrestricted: adds the cause's lags `1..=L`.
//! `F = ((RSS_r - RSS_u) / L) / (RSS_u / (n - 2L - 1))`, `n = T - L`,
//! p-value from the `F(L, n - 2L - 1)` survival function via `statrs`.

use std::time::Instant;

use causeway_core::config::GrangerConfig;
use causeway_core::errors::VerdictError;
use causeway_core::tracing::metrics;
use causeway_core::TimeSeriesPanel;
use rayon::prelude::*;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use super::types::{CausalityVerdict, LagPValue};
use crate::linalg::{least_squares, Matrix};

/// Screens all `N x (N - 1)` ordered pairs of a panel in parallel.
#[derive(Debug, Clone, Copy)]
pub struct GrangerScreener {
    max_lag: usize,
    significance_level: f64,
    threads: usize,
}

impl GrangerScreener {
    pub fn new(max_lag: usize, significance_level: f64) -> Self {
        Self {
            max_lag,
            significance_level,
            threads: 0,
        }
    }

    /// Screener for a panel of `n_variables`, with the configured
    /// multiple-testing correction folded into the threshold.
    pub fn from_config(config: &GrangerConfig, n_variables: usize) -> Self {
        let tests = n_variables * n_variables.saturating_sub(1);
        let level = config
            .effective_correction()
            .adjust(config.effective_significance_level(), tests);
        Self::new(config.effective_max_lag(), level).with_threads(config.effective_threads())
    }

    /// Run on a dedicated pool of `threads` workers; 0 uses the global pool.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn significance_level(&self) -> f64 {
        self.significance_level
    }

    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    /// Screen every ordered pair. Verdicts come back ordered by cause, then
    /// effect, in panel order, whatever the thread scheduling.
    pub fn screen(&self, panel: &TimeSeriesPanel) -> Vec<CausalityVerdict> {
        let span = tracing::info_span!(
            "granger_screen",
            variables = panel.n_variables(),
            max_lag = self.max_lag,
            significance_level = self.significance_level,
            pairs_screened = tracing::field::Empty,
            degenerate_pairs = tracing::field::Empty,
            screen_time_ms = tracing::field::Empty,
        );
        let _guard = span.enter();
        let start = Instant::now();

        let k = panel.n_variables();
        let pairs: Vec<(usize, usize)> = (0..k)
            .flat_map(|c| (0..k).filter(move |&e| e != c).map(move |e| (c, e)))
            .collect();

        let run = || {
            pairs
                .par_iter()
                .map(|&(c, e)| (c, e, self.test_pair(panel, c, e)))
                .collect::<Vec<_>>()
        };
        let mut results = if self.threads > 0 {
            match rayon::ThreadPoolBuilder::new().num_threads(self.threads).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    tracing::warn!(error = %e, threads = self.threads, "falling back to global rayon pool");
                    run()
                }
            }
        } else {
            run()
        };
        results.sort_by_key(|(c, e, _)| (*c, *e));
        let verdicts: Vec<CausalityVerdict> = results.into_iter().map(|(_, _, v)| v).collect();

        let degenerate = verdicts.iter().filter(|v| v.is_degenerate()).count();
        let significant = verdicts.iter().filter(|v| v.significant).count();
        span.record(metrics::PAIRS_SCREENED, verdicts.len());
        span.record(metrics::DEGENERATE_PAIRS, degenerate);
        span.record(metrics::SCREEN_TIME, start.elapsed().as_millis() as u64);
        if degenerate > 0 {
            tracing::warn!(degenerate, "some pairs could not be tested");
        }
        tracing::info!(
            pairs = verdicts.len(),
            significant,
            degenerate,
            "Granger screen complete"
        );
        verdicts
    }

    fn test_pair(&self, panel: &TimeSeriesPanel, c: usize, e: usize) -> CausalityVerdict {
        let cause = panel.column_at(c);
        let effect = panel.column_at(e);
        let names = panel.variables();

        let lag_profile: Vec<LagPValue> = (1..=self.max_lag)
            .map(|lag| match f_test(cause, effect, lag) {
                Ok(t) => LagPValue {
                    lag,
                    statistic: t.statistic,
                    p_value: t.p_value,
                },
                Err(_) => LagPValue {
                    lag,
                    statistic: 0.0,
                    p_value: 1.0,
                },
            })
            .collect();

        let df_denominator = denominator_dof(effect.len(), self.max_lag).max(0) as usize;
        let verdict = |statistic, p_value, significant, error| CausalityVerdict {
            cause: names[c].clone(),
            effect: names[e].clone(),
            lag: self.max_lag,
            statistic,
            p_value,
            significant,
            error,
            df_numerator: self.max_lag,
            df_denominator,
            lag_profile: lag_profile.clone(),
        };

        match f_test(cause, effect, self.max_lag) {
            Ok(t) => verdict(
                t.statistic,
                t.p_value,
                t.p_value < self.significance_level,
                None,
            ),
            Err(err) => {
                tracing::debug!(cause = %names[c], effect = %names[e], "pair model degenerate");
                verdict(0.0, 1.0, false, Some(err))
            }
        }
    }
}

/// `screen(panel, max_lag, significance_level)` on the global pool.
pub fn screen(
    panel: &TimeSeriesPanel,
    max_lag: usize,
    significance_level: f64,
) -> Vec<CausalityVerdict> {
    GrangerScreener::new(max_lag, significance_level).screen(panel)
}

#[derive(Debug, Clone, Copy)]
struct FTest {
    statistic: f64,
    p_value: f64,
}

fn denominator_dof(t: usize, lag: usize) -> i64 {
    t as i64 - lag as i64 - 2 * lag as i64 - 1
}

/// Granger F-test of `cause -> effect` at one lag.
fn f_test(cause: &[f64], effect: &[f64], lag: usize) -> Result<FTest, VerdictError> {
    let t = effect.len();
    let df_den = denominator_dof(t, lag);
    if lag == 0 || df_den <= 0 {
        return Err(VerdictError::ModelDegenerate);
    }
    let n = t - lag;

    let mut restricted = Matrix::zeros(n, 1 + lag);
    let mut unrestricted = Matrix::zeros(n, 1 + 2 * lag);
    let mut y = Matrix::zeros(n, 1);
    for (row, s) in (lag..t).enumerate() {
        restricted[(row, 0)] = 1.0;
        unrestricted[(row, 0)] = 1.0;
        for l in 1..=lag {
            restricted[(row, l)] = effect[s - l];
            unrestricted[(row, l)] = effect[s - l];
            unrestricted[(row, lag + l)] = cause[s - l];
        }
        y[(row, 0)] = effect[s];
    }

    let rss_r = least_squares(&restricted, &y)
        .map_err(|_| VerdictError::ModelDegenerate)?
        .rss(0);
    let rss_u = least_squares(&unrestricted, &y)
        .map_err(|_| VerdictError::ModelDegenerate)?
        .rss(0);

    // An exact unrestricted fit caps the statistic at f64::MAX so verdicts
    // and snapshots stay representable in JSON.
    if rss_u == 0.0 {
        if rss_r > 0.0 {
            return Ok(FTest {
                statistic: f64::MAX,
                p_value: 0.0,
            });
        }
        return Err(VerdictError::ModelDegenerate);
    }

    let statistic =
        (((rss_r - rss_u) / lag as f64) / (rss_u / df_den as f64)).clamp(0.0, f64::MAX);
    let dist = FisherSnedecor::new(lag as f64, df_den as f64)
        .map_err(|_| VerdictError::ModelDegenerate)?;
    let p_value = dist.sf(statistic).clamp(0.0, 1.0);
    if !p_value.is_finite() {
        return Err(VerdictError::ModelDegenerate);
    }
    Ok(FTest { statistic, p_value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_variables_two_verdicts() {
        let panel = test_fixtures::white_noise_panel(&["a", "b"], 120, 3);
        let verdicts = screen(&panel, 2, 0.05);
        assert_eq!(verdicts.len(), 2);
        assert_eq!((verdicts[0].cause.as_str(), verdicts[0].effect.as_str()), ("a", "b"));
        assert_eq!((verdicts[1].cause.as_str(), verdicts[1].effect.as_str()), ("b", "a"));
    }

    #[test]
    fn test_n_by_n_minus_one_in_panel_order() {
        let panel = test_fixtures::white_noise_panel(&["z", "a", "m", "b"], 80, 5);
        let verdicts = screen(&panel, 1, 0.05);
        assert_eq!(verdicts.len(), 12);
        let order: Vec<(String, String)> = verdicts
            .iter()
            .map(|v| (v.cause.clone(), v.effect.clone()))
            .collect();
        let names = ["z", "a", "m", "b"];
        let mut expected = Vec::new();
        for c in names {
            for e in names {
                if c != e {
                    expected.push((c.to_string(), e.to_string()));
                }
            }
        }
        assert_eq!(order, expected);
    }

    #[test]
    fn test_lead_lag_detected() {
        let panel = test_fixtures::lead_lag_panel(300, 0.1, 21);
        let verdicts = screen(&panel, 2, 0.05);
        let forward = verdicts
            .iter()
            .find(|v| v.cause == "leader" && v.effect == "follower")
            .unwrap();
        assert!(forward.significant);
        assert!(forward.p_value < 0.05);
        assert!(forward.error.is_none());
        assert_eq!(forward.df_numerator, 2);
        assert_eq!(forward.df_denominator, 300 - 2 - 4 - 1);
        assert_eq!(forward.lag_profile.len(), 2);
        assert!(forward.lag_profile[0].p_value < 0.05);
    }

    #[test]
    fn test_noiseless_lead_lag_keeps_statistic_finite() {
        let panel = test_fixtures::lead_lag_panel(120, 0.0, 4);
        let verdicts = screen(&panel, 1, 0.05);
        let forward = verdicts
            .iter()
            .find(|v| v.cause == "leader" && v.effect == "follower")
            .unwrap();
        assert!(forward.error.is_none());
        assert!(forward.significant);
        assert!(forward.statistic.is_finite());
        assert!(forward.p_value < 1e-10);

        let snapshot = crate::graph::build(&verdicts).snapshot();
        let json = snapshot.to_json().unwrap();
        assert!(!json.contains("null"));
        assert_eq!(crate::graph::GraphSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_constant_variable_yields_degenerate_pairs() {
        let panel = test_fixtures::white_noise_panel(&["a", "b"], 60, 7);
        let panel = test_fixtures::with_constant(&panel, "flat", 4.0);
        let verdicts = screen(&panel, 2, 0.05);
        assert_eq!(verdicts.len(), 6);
        for v in &verdicts {
            if v.cause == "flat" || v.effect == "flat" {
                assert_eq!(v.error, Some(VerdictError::ModelDegenerate));
                assert!(!v.significant);
                assert_eq!(v.p_value, 1.0);
                assert_eq!(v.statistic, 0.0);
            } else {
                assert!(v.error.is_none());
            }
        }
    }

    #[test]
    fn test_too_few_rows_degenerate_not_fatal() {
        // T = 6, L = 2: n - 2L - 1 = 4 - 5 < 0.
        let panel = test_fixtures::white_noise_panel(&["a", "b"], 6, 1);
        let verdicts = screen(&panel, 2, 0.05);
        assert!(verdicts.iter().all(|v| v.is_degenerate()));
        assert!(verdicts.iter().all(|v| v.df_denominator == 0));
    }

    #[test]
    fn test_dedicated_pool_matches_global_pool() {
        let panel = test_fixtures::white_noise_panel(&["a", "b", "c"], 150, 13);
        let global = GrangerScreener::new(3, 0.05).screen(&panel);
        let pooled = GrangerScreener::new(3, 0.05).with_threads(2).screen(&panel);
        assert_eq!(global, pooled);
    }

    #[test]
    fn test_bonferroni_divides_threshold() {
        let config = GrangerConfig {
            significance_level: Some(0.06),
            correction: Some(causeway_core::types::MultipleTestingCorrection::Bonferroni),
            ..Default::default()
        };
        let screener = GrangerScreener::from_config(&config, 3);
        assert!((screener.significance_level() - 0.01).abs() < 1e-12);
    }
}
