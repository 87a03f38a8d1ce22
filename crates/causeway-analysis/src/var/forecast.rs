//! Recursive point forecasts.

use causeway_core::errors::DataQualityError;
use causeway_core::TimeSeriesPanel;

use super::types::{VarForecast, VarModelResult};

impl VarModelResult {
    /// Forecast `steps` periods past the end of `panel`.
    ///
    /// `panel` must contain every model variable and at least `lag_order`
    /// rows; extra variables are ignored.
    pub fn forecast(
        &self,
        panel: &TimeSeriesPanel,
        steps: usize,
    ) -> Result<VarForecast, DataQualityError> {
        let k = self.n_variables();
        let p = self.lag_order;

        let mut columns = Vec::with_capacity(k);
        for name in &self.variables {
            let column = panel
                .column(name)
                .ok_or_else(|| DataQualityError::UnknownVariable(name.clone()))?;
            if column.len() < p {
                return Err(DataQualityError::TooFewObservations {
                    variable: name.clone(),
                    observations: column.len(),
                    required: p,
                });
            }
            columns.push(column);
        }

        // history[0] is the most recent observation.
        let t = panel.len();
        let mut history: Vec<Vec<f64>> = (1..=p)
            .map(|lag| columns.iter().map(|c| c[t - lag]).collect())
            .collect();

        let mut values = Vec::with_capacity(steps);
        for _ in 0..steps {
            let mut next = self.intercept.clone();
            for (i, past) in history.iter().enumerate() {
                let Some(a) = self.coefficient_matrix(i + 1) else {
                    continue;
                };
                for (n, c) in next.iter_mut().zip(a.mul_vec(past)) {
                    *n += c;
                }
            }
            if p > 0 {
                history.pop();
                history.insert(0, next.clone());
            }
            values.push(next);
        }

        Ok(VarForecast {
            variables: self.variables.clone(),
            values,
        })
    }
}
