//! End-to-end pipeline tests on synthetic panels and the CSV fixture.

use causeway_analysis::granger::screen;
use causeway_analysis::stationarity::StationarityStatus;
use causeway_analysis::CausalPipeline;
use causeway_core::config::{GrangerConfig, StationarityConfig, VarConfig};
use causeway_core::errors::{CausewayErrorCode, PipelineError, PipelineStage, VerdictError};
use causeway_core::types::MultipleTestingCorrection;
use causeway_core::CausewayConfig;

fn config_with_lags(var_max_lag: usize, granger_max_lag: usize) -> CausewayConfig {
    CausewayConfig {
        var: VarConfig {
            max_lag: Some(var_max_lag),
            ..Default::default()
        },
        granger: GrangerConfig {
            max_lag: Some(granger_max_lag),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_lead_lag_relationship_becomes_an_edge() {
    let panel = test_fixtures::lead_lag_panel(400, 0.2, 11);
    let report = CausalPipeline::new(config_with_lags(4, 2)).run(&panel).unwrap();

    assert_eq!(report.verdicts.len(), 2);
    let forward = report
        .verdicts
        .iter()
        .find(|v| v.cause == "leader" && v.effect == "follower")
        .unwrap();
    assert!(forward.significant);
    assert!(forward.p_value < 0.05);

    let edge = report.graph.edge("leader", "follower").unwrap();
    assert_eq!(edge.lag, 2);
    assert!((edge.weight - (1.0 - forward.p_value)).abs() < 1e-12);
    assert_eq!(report.graph.node_count(), 2);
}

#[test]
fn test_white_noise_false_positive_rate_is_near_nominal() {
    let trials = 40;
    let mut false_positives = 0;
    let mut tests = 0;
    for seed in 0..trials {
        let panel = test_fixtures::white_noise_panel(&["a", "b"], 500, 1000 + seed);
        let verdicts = screen(&panel, 2, 0.05);
        tests += verdicts.len();
        false_positives += verdicts.iter().filter(|v| v.significant).count();
    }
    assert_eq!(tests, 80);
    // Nominal rate 5% gives 4 expected rejections.
    assert!(false_positives <= 12, "{false_positives} of {tests} rejected");
}

#[test]
fn test_runs_are_deterministic() {
    let panel = test_fixtures::var1_panel(
        &["x", "y", "z"],
        &[0.0, 0.1, -0.1],
        &[0.5, 0.2, 0.0, 0.0, 0.4, 0.0, 0.3, 0.0, 0.2],
        1.0,
        250,
        8,
    );
    let pipeline = CausalPipeline::new(config_with_lags(3, 2));
    let first = pipeline.run(&panel).unwrap();
    let second = pipeline.run(&panel).unwrap();

    assert_eq!(first.verdicts, second.verdicts);
    assert_eq!(first.snapshot(), second.snapshot());
    assert_eq!(
        first.var_model.as_ref().map(|m| m.lag_order),
        second.var_model.as_ref().map(|m| m.lag_order)
    );
}

#[test]
fn test_var_lag_within_configured_range() {
    let panel = test_fixtures::white_noise_panel(&["a", "b", "c"], 300, 4);
    let report = CausalPipeline::new(config_with_lags(4, 2)).run(&panel).unwrap();
    let model = report.var_model.unwrap();
    assert!((1..=4).contains(&model.lag_order));
    assert_eq!(report.impulse_responses.len(), 11);
    let forecast = report.forecast.unwrap();
    assert_eq!(forecast.steps(), 5);
    assert_eq!(forecast.variables, model.variables);
}

#[test]
fn test_constant_variable_does_not_abort_the_run() {
    let panel = test_fixtures::white_noise_panel(&["a", "b"], 200, 6);
    let panel = test_fixtures::with_constant(&panel, "flat", 2.5);
    let report = CausalPipeline::new(config_with_lags(3, 2)).run(&panel).unwrap();

    assert_eq!(
        report.stationarity.get("flat").unwrap().status,
        StationarityStatus::Constant
    );
    let model = report.var_model.unwrap();
    assert_eq!(model.variables, vec!["a".to_string(), "b".to_string()]);

    assert_eq!(report.verdicts.len(), 6);
    for v in report.verdicts.iter().filter(|v| v.cause == "flat" || v.effect == "flat") {
        assert_eq!(v.error, Some(VerdictError::ModelDegenerate));
        assert!(!v.significant);
    }
    assert!(report.graph.contains_node("flat"));
}

#[test]
fn test_single_informative_variable_skips_var() {
    let panel = test_fixtures::white_noise_panel(&["a"], 120, 2);
    let panel = test_fixtures::with_constant(&panel, "flat", 0.0);
    let report = CausalPipeline::new(config_with_lags(2, 2)).run(&panel).unwrap();
    assert!(report.var_model.is_none());
    assert!(report.impulse_responses.is_empty());
    assert!(report.forecast.is_none());
    assert_eq!(report.verdicts.len(), 2);
}

#[test]
fn test_unknown_variable_fails_at_selection() {
    let panel = test_fixtures::white_noise_panel(&["a", "b"], 100, 1);
    let config = CausewayConfig {
        variables: vec!["a".into(), "missing".into()],
        ..Default::default()
    };
    let err = CausalPipeline::new(config).run(&panel).unwrap_err();
    assert_eq!(err.stage(), PipelineStage::Selection);
    assert_eq!(err.variables(), vec!["missing".to_string()]);
    assert_eq!(err.error_code(), "DATA_QUALITY_ERROR");
}

#[test]
fn test_too_short_panel_fails_at_stationarity() {
    let panel = test_fixtures::white_noise_panel(&["a", "b"], 3, 1);
    let err = CausalPipeline::default().run(&panel).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::DataQuality {
            stage: PipelineStage::Stationarity,
            ..
        }
    ));
}

#[test]
fn test_disabled_stationarity_passes_levels_through() {
    let walk = test_fixtures::random_walk(200, 100.0, 3);
    let noise = test_fixtures::white_noise(200, 5);
    let panel =
        causeway_core::TimeSeriesPanel::from_columns(vec![("walk", walk), ("noise", noise)]).unwrap();
    let config = CausewayConfig {
        stationarity: StationarityConfig {
            test_stationarity: Some(false),
            ..Default::default()
        },
        ..config_with_lags(2, 2)
    };
    let report = CausalPipeline::new(config).run(&panel).unwrap();
    assert_eq!(report.stationarity.differencing_count("walk"), Some(0));
    assert_eq!(
        report.stationarity.get("walk").unwrap().status,
        StationarityStatus::Untested
    );
    let model = report.var_model.unwrap();
    assert_eq!(model.nobs + model.lag_order, 200);
}

#[test]
fn test_bonferroni_tightens_reported_threshold() {
    let panel = test_fixtures::white_noise_panel(&["a", "b", "c"], 150, 9);
    let config = CausewayConfig {
        granger: GrangerConfig {
            max_lag: Some(2),
            significance_level: Some(0.06),
            correction: Some(MultipleTestingCorrection::Bonferroni),
            ..Default::default()
        },
        ..Default::default()
    };
    let report = CausalPipeline::new(config).run(&panel).unwrap();
    assert!((report.significance_level - 0.01).abs() < 1e-12);
    for v in &report.verdicts {
        assert_eq!(v.significant, v.p_value < 0.01);
    }
}

#[test]
fn test_csv_fixture_runs_end_to_end() {
    let path = test_fixtures::fixture_path("panels/macro_daily.csv");
    let report = CausalPipeline::new(config_with_lags(3, 2)).run_csv(&path).unwrap();

    assert_eq!(
        report.variables,
        vec!["sp500".to_string(), "us10y".to_string(), "gold".to_string()]
    );
    // Two rows carry a missing or unparsable value.
    assert_eq!(report.observations, 118);
    // Weekends break the daily spacing.
    assert!(report.irregular_index);
    assert_eq!(report.verdicts.len(), 6);
    assert_eq!(
        report.graph.edge_count(),
        report.significant_verdicts().count()
    );

    let json = report.snapshot().to_json().unwrap();
    assert!(json.contains("\"nodes\""));
}
