//! Config-driven persistence of a finished run.

use std::path::Path;

use causeway_analysis::PipelineReport;
use causeway_core::errors::StorageError;
use causeway_core::CausewayConfig;

use crate::ResultStore;

/// Save `report` when `output.persist` is on. Relative database paths
/// resolve against `root`. Returns the run id if the report was stored.
pub fn persist_if_configured(
    config: &CausewayConfig,
    root: &Path,
    report: &PipelineReport,
) -> Result<Option<i64>, StorageError> {
    if !config.output.effective_persist() {
        tracing::debug!("persistence disabled; run not stored");
        return Ok(None);
    }
    let path = root.join(config.output.effective_database_path());
    let store = ResultStore::open(&path)?;
    let run_id = store.save_report(report)?;
    tracing::info!(path = %path.display(), run_id, "run stored");
    Ok(Some(run_id))
}
