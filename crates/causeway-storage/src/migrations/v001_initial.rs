//! V001: runs, stationarity, verdicts, per-lag profiles, edges, VAR models.

pub const MIGRATION_SQL: &str = r#"
-- One row per pipeline run. Child tables cascade on delete.
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at INTEGER NOT NULL,
    variables_json TEXT NOT NULL,
    observations INTEGER NOT NULL,
    irregular_index INTEGER NOT NULL,
    trimmed_rows INTEGER NOT NULL,
    granger_max_lag INTEGER NOT NULL,
    significance_level REAL NOT NULL,
    var_lag_order INTEGER,
    criterion TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_runs_created ON runs(created_at);

CREATE TABLE IF NOT EXISTS stationarity (
    run_id INTEGER NOT NULL REFERENCES runs(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    variable TEXT NOT NULL,
    differencing_count INTEGER NOT NULL,
    adf_statistic REAL,
    p_value REAL,
    used_lag INTEGER,
    status TEXT NOT NULL,
    PRIMARY KEY (run_id, variable)
) STRICT;

-- position keeps the screener's cause-then-effect order.
CREATE TABLE IF NOT EXISTS verdicts (
    run_id INTEGER NOT NULL REFERENCES runs(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    cause TEXT NOT NULL,
    effect TEXT NOT NULL,
    lag INTEGER NOT NULL,
    statistic REAL NOT NULL,
    p_value REAL NOT NULL,
    significant INTEGER NOT NULL,
    error TEXT,
    df_numerator INTEGER NOT NULL,
    df_denominator INTEGER NOT NULL,
    PRIMARY KEY (run_id, cause, effect)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_verdicts_significant
    ON verdicts(run_id) WHERE significant = 1;

CREATE TABLE IF NOT EXISTS verdict_lags (
    run_id INTEGER NOT NULL,
    cause TEXT NOT NULL,
    effect TEXT NOT NULL,
    lag INTEGER NOT NULL,
    statistic REAL NOT NULL,
    p_value REAL NOT NULL,
    PRIMARY KEY (run_id, cause, effect, lag),
    FOREIGN KEY (run_id, cause, effect)
        REFERENCES verdicts(run_id, cause, effect) ON DELETE CASCADE
) STRICT;

CREATE TABLE IF NOT EXISTS edges (
    run_id INTEGER NOT NULL REFERENCES runs(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    cause TEXT NOT NULL,
    effect TEXT NOT NULL,
    weight REAL NOT NULL,
    lag INTEGER NOT NULL,
    p_value REAL NOT NULL,
    statistic REAL NOT NULL,
    PRIMARY KEY (run_id, cause, effect)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_edges_effect ON edges(run_id, effect);

-- Fitted VAR, impulse responses, and forecast as JSON documents.
CREATE TABLE IF NOT EXISTS var_models (
    run_id INTEGER PRIMARY KEY REFERENCES runs(id) ON DELETE CASCADE,
    lag_order INTEGER NOT NULL,
    criterion TEXT NOT NULL,
    nobs INTEGER NOT NULL,
    model_json TEXT NOT NULL,
    irf_json TEXT NOT NULL,
    forecast_json TEXT
) STRICT;
"#;
