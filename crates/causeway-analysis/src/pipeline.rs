//! End-to-end orchestration: select -> normalize -> VAR -> Granger -> graph.
//!
//! One `CausewayConfig` is threaded through every stage. Fatal failures come
//! back as `PipelineError` tagged with the stage; per-pair screening
//! failures stay inside the verdicts.

use std::path::Path;
use std::time::Instant;

use causeway_core::errors::{PipelineError, PipelineStage};
use causeway_core::tracing::metrics;
use causeway_core::{CausewayConfig, TimeSeriesPanel};

use crate::granger::{CausalityVerdict, GrangerScreener};
use crate::graph::{CausalGraph, CausalGraphBuilder, GraphSnapshot};
use crate::ingest::{load_panel_csv, IngestOptions};
use crate::linalg::Matrix;
use crate::stationarity::{NormalizedPanel, StationarityNormalizer, StationarityReport};
use crate::var::{VarEstimator, VarForecast, VarModelResult};

/// Everything one pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Variables the run modeled, in panel order.
    pub variables: Vec<String>,
    /// Rows of the input panel.
    pub observations: usize,
    /// Whether the input timestamps were unevenly spaced.
    pub irregular_index: bool,
    pub stationarity: StationarityReport,
    /// `None` when fewer than two non-constant variables remained.
    pub var_model: Option<VarModelResult>,
    pub verdicts: Vec<CausalityVerdict>,
    pub graph: CausalGraph,
    /// `Phi_0..=Phi_steps` of the VAR; empty without a model.
    pub impulse_responses: Vec<Matrix>,
    /// Forecast of the stationary (possibly differenced) variables.
    pub forecast: Option<VarForecast>,
    pub granger_max_lag: usize,
    /// Per-test threshold after any multiple-testing correction.
    pub significance_level: f64,
}

impl PipelineReport {
    pub fn significant_verdicts(&self) -> impl Iterator<Item = &CausalityVerdict> {
        self.verdicts.iter().filter(|v| v.significant)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.graph.snapshot()
    }
}

/// Runs the full relationship-discovery pipeline.
#[derive(Debug, Clone, Default)]
pub struct CausalPipeline {
    config: CausewayConfig,
}

impl CausalPipeline {
    pub fn new(config: CausewayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CausewayConfig {
        &self.config
    }

    /// Load the panel from a CSV file, then run.
    pub fn run_csv(&self, path: &Path) -> Result<PipelineReport, PipelineError> {
        let options = IngestOptions::from_config(&self.config);
        let ingested = load_panel_csv(path, &options)?;
        self.run(&ingested.panel)
    }

    pub fn run(&self, panel: &TimeSeriesPanel) -> Result<PipelineReport, PipelineError> {
        let span = tracing::info_span!(
            "pipeline",
            variables = panel.n_variables(),
            observations = panel.len(),
            pipeline_time_ms = tracing::field::Empty,
        );
        let _guard = span.enter();
        let start = Instant::now();

        // Selection
        let selected = if self.config.variables.is_empty() {
            panel.clone()
        } else {
            panel
                .select(&self.config.variables)
                .map_err(|e| PipelineError::data_quality(PipelineStage::Selection, e))?
        };
        let irregular_index = !selected.is_regular();
        if irregular_index {
            tracing::warn!("panel index is irregularly spaced; lags are counted in rows");
        }

        // Stationarity
        let NormalizedPanel {
            panel: stationary,
            report: stationarity,
        } = if self.config.stationarity.effective_test_stationarity() {
            StationarityNormalizer::from_config(&self.config.stationarity)
                .normalize(&selected)
                .map_err(|e| PipelineError::data_quality(PipelineStage::Stationarity, e))?
        } else {
            tracing::info!("stationarity testing disabled; panel passed through");
            NormalizedPanel {
                report: StationarityReport::untested(&selected),
                panel: selected.clone(),
            }
        };

        // Estimation
        let constants = stationarity.constant_variables();
        let modeled = stationary
            .without(&constants)
            .ok()
            .filter(|p| p.n_variables() >= 2);
        let var_model = match &modeled {
            Some(modeled) => Some(VarEstimator::from_config(&self.config.var).fit(modeled)?),
            None => {
                tracing::warn!(
                    excluded = ?constants,
                    "fewer than two non-constant variables; skipping VAR estimation"
                );
                None
            }
        };

        // Screening
        let screener = GrangerScreener::from_config(&self.config.granger, stationary.n_variables());
        let verdicts = screener.screen(&stationary);

        // Graph
        let graph = CausalGraphBuilder::new()
            .with_variables(selected.variables().iter().cloned())
            .build(&verdicts);

        // Post-estimation
        let mut impulse_responses = Vec::new();
        let mut forecast = None;
        if let (Some(model), Some(modeled)) = (&var_model, &modeled) {
            let irf_steps = self.config.var.effective_irf_steps();
            if irf_steps > 0 {
                impulse_responses = model.impulse_responses(irf_steps);
            }
            let forecast_steps = self.config.var.effective_forecast_steps();
            if forecast_steps > 0 {
                forecast = Some(
                    model
                        .forecast(modeled, forecast_steps)
                        .map_err(|e| PipelineError::data_quality(PipelineStage::Estimation, e))?,
                );
            }
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        span.record(metrics::PIPELINE_TIME, elapsed_ms);
        tracing::info!(
            verdicts = verdicts.len(),
            edges = graph.edge_count(),
            selected_lag = ?var_model.as_ref().map(|m| m.lag_order),
            elapsed_ms,
            "pipeline run complete"
        );

        Ok(PipelineReport {
            variables: selected.variables().to_vec(),
            observations: selected.len(),
            irregular_index,
            stationarity,
            var_model,
            verdicts,
            graph,
            impulse_responses,
            forecast,
            granger_max_lag: screener.max_lag(),
            significance_level: screener.significance_level(),
        })
    }
}
