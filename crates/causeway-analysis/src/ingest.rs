//! CSV ingest: a merged panel file into a `TimeSeriesPanel`.
//!
//! One header row, one date column, numeric value columns. Rows with a
//! missing or unparsable value in any selected column are dropped and
//! counted; the remaining rows are sorted by date.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use causeway_core::config::CausewayConfig;
use causeway_core::constants::DEFAULT_DATE_COLUMN;
use causeway_core::errors::IngestError;
use causeway_core::TimeSeriesPanel;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Which columns to read.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub date_column: String,
    /// Value columns in output order. Empty means every non-date column.
    pub columns: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            columns: Vec::new(),
        }
    }
}

impl IngestOptions {
    pub fn from_config(config: &CausewayConfig) -> Self {
        Self {
            date_column: config.input.effective_date_column().to_string(),
            columns: config.variables.clone(),
        }
    }

    pub fn with_date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = column.into();
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// A loaded panel plus row accounting.
#[derive(Debug, Clone)]
pub struct IngestedPanel {
    pub panel: TimeSeriesPanel,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// Load a panel from a CSV file.
pub fn load_panel_csv(path: &Path, options: &IngestOptions) -> Result<IngestedPanel, IngestError> {
    let source = path.display().to_string();
    let file = File::open(path).map_err(|e| IngestError::Open {
        path: source.clone(),
        message: e.to_string(),
    })?;
    read_panel_csv(file, &source, options)
}

/// Load a panel from any CSV reader. `source` names the input in errors.
pub fn read_panel_csv<R: Read>(
    reader: R,
    source: &str,
    options: &IngestOptions,
) -> Result<IngestedPanel, IngestError> {
    let csv_error = |e: csv::Error| IngestError::Csv {
        path: source.to_string(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let position = |column: &str| headers.iter().position(|h| h == column);

    let date_idx = position(&options.date_column).ok_or_else(|| IngestError::MissingColumn {
        path: source.to_string(),
        column: options.date_column.clone(),
    })?;

    let names: Vec<String> = if options.columns.is_empty() {
        headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(_, h)| h.to_string())
            .collect()
    } else {
        options.columns.clone()
    };
    let mut value_idx = Vec::with_capacity(names.len());
    for name in &names {
        let idx = position(name).ok_or_else(|| IngestError::MissingColumn {
            path: source.to_string(),
            column: name.clone(),
        })?;
        value_idx.push(idx);
    }

    let mut rows: Vec<(NaiveDateTime, Vec<f64>)> = Vec::new();
    let mut rows_read = 0;
    let mut rows_dropped = 0;
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows_read += 1;

        let Some(timestamp) = record.get(date_idx).and_then(parse_timestamp) else {
            rows_dropped += 1;
            continue;
        };
        let values: Option<Vec<f64>> = value_idx
            .iter()
            .map(|&i| record.get(i).and_then(parse_value))
            .collect();
        match values {
            Some(values) => rows.push((timestamp, values)),
            None => rows_dropped += 1,
        }
    }

    if rows.is_empty() {
        return Err(IngestError::NoRows {
            path: source.to_string(),
        });
    }

    rows.sort_by_key(|(ts, _)| *ts);
    if let Some(pair) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(IngestError::DuplicateTimestamp {
            path: source.to_string(),
            timestamp: pair[0].0.to_string(),
        });
    }

    let index: Vec<NaiveDateTime> = rows.iter().map(|(ts, _)| *ts).collect();
    let columns: Vec<(String, Vec<f64>)> = names
        .into_iter()
        .enumerate()
        .map(|(j, name)| (name, rows.iter().map(|(_, v)| v[j]).collect()))
        .collect();
    let panel = TimeSeriesPanel::new(index, columns)?;

    if rows_dropped > 0 {
        tracing::warn!(source, rows_dropped, "dropped rows with missing or unparsable values");
    }
    tracing::info!(
        source,
        rows = panel.len(),
        variables = panel.n_variables(),
        regular = panel.is_regular(),
        "panel loaded"
    );

    Ok(IngestedPanel {
        panel,
        rows_read,
        rows_dropped,
    })
}

/// Parse `%Y-%m-%d`, `%Y-%m-%d %H:%M:%S`, or RFC 3339 (converted to UTC).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}

fn parse_value(s: &str) -> Option<f64> {
    let v: f64 = s.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str, options: &IngestOptions) -> Result<IngestedPanel, IngestError> {
        read_panel_csv(csv.as_bytes(), "inline.csv", options)
    }

    #[test]
    fn test_sorts_rows_and_drops_incomplete() {
        let csv = "\
date,sp500,gold
2024-01-03,4700.5,2040.1
2024-01-01,4690.0,
2024-01-02,4695.2,2035.0
2024-01-04,NaN,2041.0
";
        let out = read(csv, &IngestOptions::default()).unwrap();
        assert_eq!(out.rows_read, 4);
        assert_eq!(out.rows_dropped, 2);
        assert_eq!(out.panel.len(), 2);
        assert_eq!(out.panel.column("sp500").unwrap(), &[4695.2, 4700.5]);
        assert_eq!(out.panel.variables(), &["sp500".to_string(), "gold".to_string()]);
    }

    #[test]
    fn test_selects_requested_columns_in_order() {
        let csv = "day,a,b,c\n2024-01-01,1,2,3\n2024-01-02,4,5,6\n";
        let options = IngestOptions::default()
            .with_date_column("day")
            .with_columns(["c", "a"]);
        let out = read(csv, &options).unwrap();
        assert_eq!(out.panel.variables(), &["c".to_string(), "a".to_string()]);
        assert_eq!(out.panel.column("c").unwrap(), &[3.0, 6.0]);
    }

    #[test]
    fn test_missing_columns_reported() {
        let csv = "when,a\n2024-01-01,1\n";
        assert!(matches!(
            read(csv, &IngestOptions::default()),
            Err(IngestError::MissingColumn { column, .. }) if column == "date"
        ));
        let options = IngestOptions::default().with_date_column("when").with_columns(["zz"]);
        assert!(matches!(
            read(csv, &options),
            Err(IngestError::MissingColumn { column, .. }) if column == "zz"
        ));
    }

    #[test]
    fn test_duplicate_timestamps_rejected() {
        let csv = "date,a\n2024-01-01,1\n2024-01-01,2\n";
        assert!(matches!(
            read(csv, &IngestOptions::default()),
            Err(IngestError::DuplicateTimestamp { .. })
        ));
    }

    #[test]
    fn test_no_usable_rows() {
        let csv = "date,a\n2024-01-01,\nnot-a-date,3\n";
        assert!(matches!(
            read(csv, &IngestOptions::default()),
            Err(IngestError::NoRows { .. })
        ));
    }

    #[test]
    fn test_timestamp_formats() {
        let midnight = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-03-01"), Some(midnight));
        assert_eq!(
            parse_timestamp("2024-03-01 15:30:00"),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(15, 30, 0)
        );
        assert_eq!(
            parse_timestamp("2024-03-01T02:00:00+02:00"),
            Some(midnight)
        );
        assert_eq!(parse_timestamp("03/01/2024"), None);
    }
}
