//! Insight selection — significance and strength gating, polarity ranking.

use std::cmp::Ordering;

use crate::{config::AnalysisConfig, correlate::CorrelationRecord};

/// Survivors of the gates, ranked and truncated per polarity.
#[derive(Debug, Clone, Default)]
pub struct Selection {
  /// Positive correlations, strongest first, at most `top_n_per_polarity`.
  pub positive: Vec<CorrelationRecord>,
  /// Negative correlations, strongest first, at most `top_n_per_polarity`.
  pub negative: Vec<CorrelationRecord>,
}

impl Selection {
  pub fn len(&self) -> usize {
    self.positive.len() + self.negative.len()
  }

  pub fn is_empty(&self) -> bool {
    self.positive.is_empty() && self.negative.is_empty()
  }

  /// Positives then negatives — the order insights are persisted in.
  pub fn iter(&self) -> impl Iterator<Item = &CorrelationRecord> {
    self.positive.iter().chain(self.negative.iter())
  }
}

/// Apply the significance and strength gates jointly, then keep the top N
/// per polarity.
///
/// Both inequalities are strict: a record sitting exactly on a threshold
/// (`p == significance_p` or `|r| == min_abs_r`) is discarded entirely, not
/// demoted.
pub fn select(
  records: &[CorrelationRecord],
  cfg: &AnalysisConfig,
) -> Selection {
  let mut positive = Vec::new();
  let mut negative = Vec::new();

  for record in records {
    let survives = record.p_value < cfg.significance_p
      && record.coefficient.abs() > cfg.min_abs_r;
    if !survives {
      continue;
    }
    if record.coefficient > 0.0 {
      positive.push(record.clone());
    } else {
      negative.push(record.clone());
    }
  }

  rank(&mut positive);
  rank(&mut negative);
  positive.truncate(cfg.top_n_per_polarity);
  negative.truncate(cfg.top_n_per_polarity);

  Selection { positive, negative }
}

/// Descending `|r|`; ties break by smaller p, then by the key pair's lexical
/// order, so selection stays deterministic under floating-point equality.
fn rank(records: &mut [CorrelationRecord]) {
  records.sort_by(|a, b| {
    b.coefficient
      .abs()
      .partial_cmp(&a.coefficient.abs())
      .unwrap_or(Ordering::Equal)
      .then_with(|| {
        a.p_value
          .partial_cmp(&b.p_value)
          .unwrap_or(Ordering::Equal)
      })
      .then_with(|| (&a.key_a, &a.key_b).cmp(&(&b.key_a, &b.key_b)))
  });
}
