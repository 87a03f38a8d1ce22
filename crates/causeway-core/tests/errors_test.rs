//! Tests for the Causeway error taxonomy.

use causeway_core::errors::*;

#[test]
fn test_all_errors_have_error_code() {
    let config = ConfigError::FileNotFound { path: "/tmp".into() };
    assert_eq!(config.error_code(), "CONFIG_ERROR");

    let quality = DataQualityError::EmptyPanel;
    assert_eq!(quality.error_code(), "DATA_QUALITY_ERROR");

    let insufficient = EstimationError::InsufficientData {
        observations: 10,
        variables: 3,
        max_lag: 4,
    };
    assert_eq!(insufficient.error_code(), "INSUFFICIENT_DATA");

    let singular = EstimationError::SingularMatrix {
        max_lag: 2,
        variables: vec!["flat".into()],
    };
    assert_eq!(singular.error_code(), "SINGULAR_MATRIX");

    let ingest = IngestError::NoRows { path: "x.csv".into() };
    assert_eq!(ingest.error_code(), "INGEST_ERROR");

    let storage = StorageError::RunNotFound { run_id: 7 };
    assert_eq!(storage.error_code(), "RUN_NOT_FOUND");
}

#[test]
fn test_messages_carry_context() {
    let err = EstimationError::InsufficientData {
        observations: 10,
        variables: 3,
        max_lag: 4,
    };
    let msg = err.to_string();
    assert!(msg.contains("10 observations"));
    assert!(msg.contains("3 variables"));

    let err = EstimationError::SingularMatrix {
        max_lag: 2,
        variables: vec!["flat".into(), "dup".into()],
    };
    assert!(err.to_string().contains("flat, dup"));

    let err = DataQualityError::TooFewObservations {
        variable: "gdp".into(),
        observations: 2,
        required: 3,
    };
    assert_eq!(
        err.coded_string(),
        "[DATA_QUALITY_ERROR] variable 'gdp' has 2 observations, at least 3 required"
    );
}

#[test]
fn test_pipeline_error_reports_stage_and_variables() {
    let err = PipelineError::data_quality(
        PipelineStage::Stationarity,
        DataQualityError::TooFewObservations {
            variable: "oil".into(),
            observations: 1,
            required: 3,
        },
    );
    assert_eq!(err.stage(), PipelineStage::Stationarity);
    assert_eq!(err.variables(), vec!["oil".to_string()]);
    assert!(err.to_string().starts_with("stationarity stage"));

    let err: PipelineError = EstimationError::SingularMatrix {
        max_lag: 3,
        variables: vec!["flat".into()],
    }
    .into();
    assert_eq!(err.stage(), PipelineStage::Estimation);
    assert_eq!(err.variables(), vec!["flat".to_string()]);
    assert_eq!(err.error_code(), "SINGULAR_MATRIX");
}

#[test]
fn test_from_conversions() {
    let err: PipelineError = ConfigError::ValidationFailed {
        field: "var.max_lag".into(),
        message: "bad".into(),
    }
    .into();
    assert!(matches!(err, PipelineError::Config(_)));

    let err: EstimationError = DataQualityError::UnknownVariable("z".into()).into();
    assert!(matches!(err, EstimationError::DataQuality(_)));

    let err: PipelineError = StorageError::SqliteError { message: "x".into() }.into();
    assert_eq!(err.stage(), PipelineStage::Storage);
}

#[test]
fn test_verdict_error_serializes_snake_case() {
    let err = VerdictError::ModelDegenerate;
    assert_eq!(err.to_string(), "model_degenerate");
    assert_eq!(err.error_code(), "MODEL_DEGENERATE");
    assert_eq!(serde_json::to_string(&err).unwrap(), "\"model_degenerate\"");
    assert_eq!(VerdictError::parse(err.as_str()), Some(err));
}
