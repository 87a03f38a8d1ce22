//! Synthetic panels and fixture files for Causeway tests and benchmarks.
//!
//! Generators are deterministic: same seed, same panel.

use std::path::PathBuf;

use causeway_core::TimeSeriesPanel;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Root directory of the workspace `test-fixtures` folder.
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").join("panels").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Absolute path to a fixture file, e.g. `fixture_path("panels/macro_daily.csv")`.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Standard normal draws.
pub struct Gaussian {
    rng: StdRng,
    normal: Normal<f64>,
}

impl Gaussian {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            normal: Normal::new(0.0, 1.0).expect("unit normal"),
        }
    }

    pub fn next(&mut self) -> f64 {
        self.normal.sample(&mut self.rng)
    }

    pub fn series(&mut self, len: usize, scale: f64) -> Vec<f64> {
        (0..len).map(|_| scale * self.next()).collect()
    }
}

/// `len` draws of Gaussian white noise.
pub fn white_noise(len: usize, seed: u64) -> Vec<f64> {
    Gaussian::new(seed).series(len, 1.0)
}

/// Cumulative sum of Gaussian shocks starting at `start`.
pub fn random_walk(len: usize, start: f64, seed: u64) -> Vec<f64> {
    let mut g = Gaussian::new(seed);
    let mut level = start;
    (0..len)
        .map(|_| {
            level += g.next();
            level
        })
        .collect()
}

/// Panel of independent white-noise variables.
pub fn white_noise_panel(names: &[&str], len: usize, seed: u64) -> TimeSeriesPanel {
    let columns = names
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, white_noise(len, seed.wrapping_add(i as u64 * 7919))))
        .collect();
    TimeSeriesPanel::from_columns(columns).expect("valid white-noise panel")
}

/// Two-variable panel where `follower[t] = leader[t - 1] + noise_scale * e[t]`.
///
/// `leader` is white noise, so both series are stationary.
pub fn lead_lag_panel(len: usize, noise_scale: f64, seed: u64) -> TimeSeriesPanel {
    let mut g = Gaussian::new(seed);
    let leader = g.series(len, 1.0);
    let mut follower = Vec::with_capacity(len);
    follower.push(noise_scale * g.next());
    for t in 1..len {
        follower.push(leader[t - 1] + noise_scale * g.next());
    }
    TimeSeriesPanel::from_columns(vec![("leader", leader), ("follower", follower)])
        .expect("valid lead-lag panel")
}

/// Simulate `y_t = c + A y_{t-1} + e_t` with unit-variance shocks scaled by `shock_scale`.
///
/// `coefficients` is row-major `k x k`. A burn-in of 100 steps is discarded.
pub fn var1_panel(
    names: &[&str],
    intercept: &[f64],
    coefficients: &[f64],
    shock_scale: f64,
    len: usize,
    seed: u64,
) -> TimeSeriesPanel {
    let k = names.len();
    assert_eq!(intercept.len(), k, "intercept length");
    assert_eq!(coefficients.len(), k * k, "coefficient matrix size");

    let burn_in = 100;
    let mut g = Gaussian::new(seed);
    let mut state = vec![0.0; k];
    let mut columns = vec![Vec::with_capacity(len); k];
    for t in 0..(burn_in + len) {
        let next: Vec<f64> = (0..k)
            .map(|i| {
                let ar: f64 = (0..k).map(|j| coefficients[i * k + j] * state[j]).sum();
                intercept[i] + ar + shock_scale * g.next()
            })
            .collect();
        state = next;
        if t >= burn_in {
            for (col, v) in columns.iter_mut().zip(&state) {
                col.push(*v);
            }
        }
    }
    TimeSeriesPanel::from_columns(names.iter().copied().zip(columns).collect())
        .expect("valid VAR(1) panel")
}

/// Append a zero-variance column to an existing panel.
pub fn with_constant(panel: &TimeSeriesPanel, name: &str, value: f64) -> TimeSeriesPanel {
    let mut columns: Vec<(String, Vec<f64>)> = panel
        .columns()
        .map(|(n, c)| (n.to_string(), c.to_vec()))
        .collect();
    columns.push((name.to_string(), vec![value; panel.len()]));
    TimeSeriesPanel::new(panel.index().to_vec(), columns).expect("valid panel with constant")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_are_deterministic() {
        assert_eq!(white_noise(50, 3), white_noise(50, 3));
        assert_ne!(white_noise(50, 3), white_noise(50, 4));
        assert_eq!(random_walk(20, 10.0, 1), random_walk(20, 10.0, 1));
    }

    #[test]
    fn test_lead_lag_follower_tracks_leader() {
        let panel = lead_lag_panel(100, 0.0, 9);
        let leader = panel.column("leader").unwrap();
        let follower = panel.column("follower").unwrap();
        for t in 1..100 {
            assert_eq!(follower[t], leader[t - 1]);
        }
    }

    #[test]
    fn test_var1_panel_shape() {
        let panel = var1_panel(&["x", "y"], &[0.0, 0.0], &[0.5, 0.0, 0.3, 0.2], 1.0, 200, 5);
        assert_eq!(panel.len(), 200);
        assert_eq!(panel.variables(), &["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_with_constant_appends_flat_column() {
        let panel = white_noise_panel(&["a", "b"], 30, 1);
        let panel = with_constant(&panel, "flat", 2.5);
        assert_eq!(panel.n_variables(), 3);
        assert!(panel.column("flat").unwrap().iter().all(|v| *v == 2.5));
    }
}
