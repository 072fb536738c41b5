//! Analysis configuration.
//!
//! Every threshold the pipeline applies lives here, independently
//! configurable: the significance and strength gates are tuned empirically,
//! not derived, so neither is hard-coded anywhere downstream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strata_core::point::MetricKey;

use crate::error::{EngineError, Result};

// ─── Lookback ────────────────────────────────────────────────────────────────

/// How far back to read the user's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum Lookback {
  /// The user's entire history.
  All,
  /// A fixed trailing window ending today, inclusive.
  Days(u32),
}

// ─── Goodness ────────────────────────────────────────────────────────────────

/// Whether a higher reading of a metric is good news or bad news.
///
/// Consulted by the narrative renderer when phrasing cross-domain
/// relationships ("better" vs "worse"). Defaults to
/// [`Goodness::HigherIsBetter`]; metrics like stress or resting heart rate
/// should carry an override.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Goodness {
  #[default]
  HigherIsBetter,
  LowerIsBetter,
}

// ─── AnalysisConfig ──────────────────────────────────────────────────────────

/// All knobs of one analysis run.
///
/// `Default` is the bulk profile (all history, overlap floor 5);
/// [`AnalysisConfig::weekly`] is the short-window profile the scheduled
/// batch uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
  pub lookback: Lookback,

  /// Minimum overlapping dates before a pair is evaluated at all.
  /// Pearson's test is unreliable on tiny samples; 5 for bulk runs over
  /// long windows, 3 for the trailing-week batch.
  pub min_overlap: usize,

  /// Significance gate: a pair survives only if `p < significance_p`.
  pub significance_p: f64,

  /// Strength gate: a pair survives only if `|r| > min_abs_r`.
  pub min_abs_r: f64,

  /// At most this many insights per polarity (positive / negative).
  pub top_n_per_polarity: usize,

  /// Per-metric goodness overrides, keyed by the `domain_metric` display
  /// form of the metric key (e.g. `"reflection_stress"`).
  pub directions: BTreeMap<String, Goodness>,
}

impl Default for AnalysisConfig {
  fn default() -> Self {
    Self {
      lookback:           Lookback::All,
      min_overlap:        5,
      significance_p:     0.05,
      min_abs_r:          0.3,
      top_n_per_polarity: 3,
      directions:         BTreeMap::new(),
    }
  }
}

impl AnalysisConfig {
  /// Profile for the scheduled weekly batch: trailing seven days with the
  /// lower overlap floor.
  pub fn weekly() -> Self {
    Self {
      lookback: Lookback::Days(7),
      min_overlap: 3,
      ..Self::default()
    }
  }

  /// Reject malformed thresholds before any work happens.
  pub fn validate(&self) -> Result<()> {
    if !(self.significance_p > 0.0 && self.significance_p < 1.0) {
      return Err(EngineError::InvalidConfig(format!(
        "significance_p must be in (0, 1), got {}",
        self.significance_p
      )));
    }
    if !(0.0..1.0).contains(&self.min_abs_r) {
      return Err(EngineError::InvalidConfig(format!(
        "min_abs_r must be in [0, 1), got {}",
        self.min_abs_r
      )));
    }
    if self.min_overlap < 3 {
      return Err(EngineError::InvalidConfig(format!(
        "min_overlap must be at least 3, got {}",
        self.min_overlap
      )));
    }
    if self.top_n_per_polarity == 0 {
      return Err(EngineError::InvalidConfig(
        "top_n_per_polarity must be at least 1".to_owned(),
      ));
    }
    if let Lookback::Days(0) = self.lookback {
      return Err(EngineError::InvalidConfig(
        "lookback window must span at least one day".to_owned(),
      ));
    }
    Ok(())
  }

  /// The goodness direction for a metric, honouring any configured override.
  pub fn goodness_of(&self, key: &MetricKey) -> Goodness {
    self
      .directions
      .get(&key.to_string())
      .copied()
      .unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use strata_core::point::Domain;

  use super::*;

  #[test]
  fn default_is_the_bulk_profile() {
    let cfg = AnalysisConfig::default();
    assert_eq!(cfg.lookback, Lookback::All);
    assert_eq!(cfg.min_overlap, 5);
    assert_eq!(cfg.significance_p, 0.05);
    assert_eq!(cfg.min_abs_r, 0.3);
    assert_eq!(cfg.top_n_per_polarity, 3);
  }

  #[test]
  fn weekly_narrows_window_and_overlap_floor() {
    let cfg = AnalysisConfig::weekly();
    assert_eq!(cfg.lookback, Lookback::Days(7));
    assert_eq!(cfg.min_overlap, 3);
    assert!(cfg.validate().is_ok());
  }

  #[test]
  fn validate_rejects_malformed_thresholds() {
    let mut cfg = AnalysisConfig::default();
    cfg.significance_p = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = AnalysisConfig::default();
    cfg.min_abs_r = 1.0;
    assert!(cfg.validate().is_err());

    let mut cfg = AnalysisConfig::default();
    cfg.min_overlap = 2;
    assert!(cfg.validate().is_err());

    let mut cfg = AnalysisConfig::default();
    cfg.top_n_per_polarity = 0;
    assert!(cfg.validate().is_err());
  }

  #[test]
  fn goodness_defaults_high_and_honours_overrides() {
    let mut cfg = AnalysisConfig::default();
    let stress = MetricKey::new(Domain::Reflection, "stress");
    assert_eq!(cfg.goodness_of(&stress), Goodness::HigherIsBetter);

    cfg
      .directions
      .insert("reflection_stress".to_owned(), Goodness::LowerIsBetter);
    assert_eq!(cfg.goodness_of(&stress), Goodness::LowerIsBetter);
  }
}
