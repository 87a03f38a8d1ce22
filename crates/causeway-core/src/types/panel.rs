//! `TimeSeriesPanel`: one value per named variable per timestamp.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::DataQualityError;

/// A column-oriented multivariate time series on a shared time index.
///
/// Invariants, enforced at construction:
/// - at least one variable, names unique
/// - every column has exactly `index.len()` values
/// - every value is finite
/// - timestamps strictly increasing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPanel {
    index: Vec<NaiveDateTime>,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl TimeSeriesPanel {
    /// Build a panel from an index and `(name, values)` columns.
    pub fn new<S: Into<String>>(
        index: Vec<NaiveDateTime>,
        columns: Vec<(S, Vec<f64>)>,
    ) -> Result<Self, DataQualityError> {
        if columns.is_empty() {
            return Err(DataQualityError::EmptyPanel);
        }

        for (row, pair) in index.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(DataQualityError::UnorderedIndex { row: row + 1 });
            }
        }

        let mut names: Vec<String> = Vec::with_capacity(columns.len());
        let mut values: Vec<Vec<f64>> = Vec::with_capacity(columns.len());
        for (name, column) in columns {
            let name = name.into();
            if names.contains(&name) {
                return Err(DataQualityError::DuplicateVariable(name));
            }
            if column.len() != index.len() {
                return Err(DataQualityError::LengthMismatch {
                    variable: name,
                    expected: index.len(),
                    actual: column.len(),
                });
            }
            if let Some(row) = column.iter().position(|v| !v.is_finite()) {
                return Err(DataQualityError::NonFiniteValue { variable: name, row });
            }
            names.push(name);
            values.push(column);
        }

        Ok(Self {
            index,
            names,
            columns: values,
        })
    }

    /// Build a panel on a synthetic daily index starting at the Unix epoch.
    pub fn from_columns<S: Into<String>>(
        columns: Vec<(S, Vec<f64>)>,
    ) -> Result<Self, DataQualityError> {
        let len = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        Self::new(daily_index(len), columns)
    }

    /// Number of observations (rows).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of variables (columns).
    pub fn n_variables(&self) -> usize {
        self.names.len()
    }

    pub fn variables(&self) -> &[String] {
        &self.names
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Column position of a variable.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.position(name).map(|i| self.columns[i].as_slice())
    }

    /// Column by position. Panics if `i >= n_variables()`.
    pub fn column_at(&self, i: usize) -> &[f64] {
        &self.columns[i]
    }

    /// Iterate `(name, values)` in panel order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Value at `(row, column)`.
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.columns[col][row]
    }

    /// A new panel holding only `names`, in the order given.
    pub fn select(&self, names: &[String]) -> Result<Self, DataQualityError> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let column = self
                .column(name)
                .ok_or_else(|| DataQualityError::UnknownVariable(name.clone()))?;
            columns.push((name.clone(), column.to_vec()));
        }
        Self::new(self.index.clone(), columns)
    }

    /// A new panel without `names`. Unknown names are ignored.
    pub fn without(&self, names: &[String]) -> Result<Self, DataQualityError> {
        let keep: Vec<String> = self
            .names
            .iter()
            .filter(|n| !names.contains(n))
            .cloned()
            .collect();
        self.select(&keep)
    }

    /// A new panel with the first `rows` observations removed.
    pub fn skip_rows(&self, rows: usize) -> Self {
        let rows = rows.min(self.len());
        Self {
            index: self.index[rows..].to_vec(),
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c[rows..].to_vec()).collect(),
        }
    }

    /// Whether consecutive timestamps are evenly spaced.
    pub fn is_regular(&self) -> bool {
        let mut steps = self.index.windows(2).map(|w| w[1] - w[0]);
        match steps.next() {
            Some(first) => steps.all(|s| s == first),
            None => true,
        }
    }
}

fn daily_index(len: usize) -> Vec<NaiveDateTime> {
    let start = NaiveDateTime::default();
    (0..len).map(|i| start + Duration::days(i as i64)).collect()
}
