use criterion::{criterion_group, criterion_main, Criterion};

use causeway_analysis::granger::GrangerScreener;
use causeway_analysis::var::VarEstimator;
use causeway_analysis::CausalPipeline;
use causeway_core::{CausewayConfig, InformationCriterion};

/// Ten white-noise variables, 500 rows: 90 ordered pairs to screen.
fn ten_variable_panel() -> causeway_core::TimeSeriesPanel {
    let names: Vec<String> = (0..10).map(|i| format!("v{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    test_fixtures::white_noise_panel(&refs, 500, 42)
}

fn bench_granger_screen(c: &mut Criterion) {
    let panel = ten_variable_panel();
    let screener = GrangerScreener::new(5, 0.05);

    c.bench_function("granger_screen_90_pairs_lag_5", |b| {
        b.iter(|| screener.screen(&panel));
    });
}

fn bench_var_fit(c: &mut Criterion) {
    let panel = ten_variable_panel();
    let estimator = VarEstimator::new(5, InformationCriterion::Aic);

    c.bench_function("var_fit_10_vars_max_lag_5", |b| {
        b.iter(|| estimator.fit(&panel));
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let panel = test_fixtures::lead_lag_panel(1000, 0.5, 7);
    let pipeline = CausalPipeline::new(CausewayConfig::default());

    c.bench_function("pipeline_lead_lag_1k_rows", |b| {
        b.iter(|| pipeline.run(&panel));
    });
}

criterion_group!(benches, bench_granger_screen, bench_var_fit, bench_full_pipeline);
criterion_main!(benches);
