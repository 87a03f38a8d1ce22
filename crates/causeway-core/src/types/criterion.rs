//! Model-selection and multiple-testing enums shared by config and analysis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Information criterion used to select the VAR lag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InformationCriterion {
    /// Akaike: penalty 2 per parameter.
    #[default]
    Aic,
    /// Schwarz/Bayesian: penalty ln(n) per parameter.
    Bic,
    /// Hannan-Quinn: penalty 2 ln(ln(n)) per parameter.
    Hqic,
}

impl InformationCriterion {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aic => "aic",
            Self::Bic => "bic",
            Self::Hqic => "hqic",
        }
    }

    /// Penalty per free parameter for an estimation sample of `nobs` rows.
    pub fn penalty(&self, nobs: usize) -> f64 {
        let n = nobs as f64;
        match self {
            Self::Aic => 2.0,
            Self::Bic => n.ln(),
            Self::Hqic => 2.0 * n.ln().ln(),
        }
    }
}

impl fmt::Display for InformationCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InformationCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aic" => Ok(Self::Aic),
            "bic" | "sc" => Ok(Self::Bic),
            "hqic" | "hq" => Ok(Self::Hqic),
            other => Err(format!("unknown information criterion '{other}'")),
        }
    }
}

/// Threshold adjustment applied across the N x (N - 1) Granger tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultipleTestingCorrection {
    /// Each pair is tested at the configured level.
    #[default]
    None,
    /// The level is divided by the number of ordered pairs.
    Bonferroni,
}

impl MultipleTestingCorrection {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bonferroni => "bonferroni",
        }
    }

    /// The per-test threshold for `tests` simultaneous tests.
    pub fn adjust(&self, significance_level: f64, tests: usize) -> f64 {
        match self {
            Self::None => significance_level,
            Self::Bonferroni if tests > 1 => significance_level / tests as f64,
            Self::Bonferroni => significance_level,
        }
    }
}

impl FromStr for MultipleTestingCorrection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "bonferroni" => Ok(Self::Bonferroni),
            other => Err(format!("unknown correction '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criterion_parse() {
        assert_eq!("AIC".parse::<InformationCriterion>(), Ok(InformationCriterion::Aic));
        assert_eq!("hq".parse::<InformationCriterion>(), Ok(InformationCriterion::Hqic));
        assert!("fpe".parse::<InformationCriterion>().is_err());
    }

    #[test]
    fn test_penalty_ordering_large_sample() {
        // For n > e^2 (~7.4), BIC penalizes harder than AIC.
        let n = 200;
        assert!(InformationCriterion::Bic.penalty(n) > InformationCriterion::Aic.penalty(n));
        assert!(InformationCriterion::Hqic.penalty(n) > InformationCriterion::Aic.penalty(n));
        assert!(InformationCriterion::Bic.penalty(n) > InformationCriterion::Hqic.penalty(n));
    }

    #[test]
    fn test_bonferroni_adjust() {
        assert_eq!(MultipleTestingCorrection::None.adjust(0.05, 12), 0.05);
        assert!((MultipleTestingCorrection::Bonferroni.adjust(0.06, 12) - 0.005).abs() < 1e-12);
        assert_eq!(MultipleTestingCorrection::Bonferroni.adjust(0.05, 0), 0.05);
    }
}
