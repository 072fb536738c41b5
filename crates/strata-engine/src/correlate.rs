//! Pairwise Pearson correlation over the metric series table.

use statrs::distribution::{ContinuousCDF, StudentsT};
use strata_core::point::MetricKey;

use crate::series::MetricSeries;

// ─── CorrelationRecord ───────────────────────────────────────────────────────

/// One computed pairwise relationship. Transient — exists only during an
/// analysis run, never persisted.
///
/// Symmetric by construction: only the `key_a < key_b` orientation is ever
/// produced, so `(a, b)` and `(b, a)` cannot both appear in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationRecord {
  pub key_a:       MetricKey,
  pub key_b:       MetricKey,
  /// Signed Pearson coefficient in `[-1, 1]`.
  pub coefficient: f64,
  /// Two-sided p-value in `[0, 1]`.
  pub p_value:     f64,
  /// Overlapping dates the pair was computed on.
  pub sample_size: usize,
}

/// Outcome of one pairwise sweep: the records plus skip diagnostics.
#[derive(Debug, Clone, Default)]
pub struct PairwiseOutcome {
  pub records: Vec<CorrelationRecord>,
  /// Pairs with enough overlap to reach the Pearson computation.
  pub pairs_tested: usize,
  /// Pairs dropped for overlap below the configured minimum.
  pub skipped_overlap: usize,
  /// Pairs dropped for zero variance or an otherwise non-finite result.
  pub skipped_degenerate: usize,
}

// ─── Pairwise sweep ──────────────────────────────────────────────────────────

/// Correlate every unordered pair of metric columns that share at least
/// `min_overlap` dates.
///
/// The overlap is an inner join on date: rows missing either value are
/// excluded from that pair's computation, so different pairs may use
/// different (overlapping but not identical) date sets.
///
/// Iteration is a double loop over the sorted key list with `i < j`, so
/// re-running on unchanged data yields bit-identical output ordering.
pub fn pairwise(series: &MetricSeries, min_overlap: usize) -> PairwiseOutcome {
  let columns: Vec<_> = series.iter().collect();
  let mut outcome = PairwiseOutcome::default();

  for i in 0..columns.len() {
    let (key_a, column_a) = columns[i];
    for &(key_b, column_b) in &columns[i + 1..] {
      let mut xs = Vec::new();
      let mut ys = Vec::new();
      for (date, x) in column_a {
        if let Some(y) = column_b.get(date) {
          xs.push(*x);
          ys.push(*y);
        }
      }

      if xs.len() < min_overlap {
        outcome.skipped_overlap += 1;
        continue;
      }
      outcome.pairs_tested += 1;

      match pearson(&xs, &ys) {
        Some((coefficient, p_value)) => {
          outcome.records.push(CorrelationRecord {
            key_a:       key_a.clone(),
            key_b:       key_b.clone(),
            coefficient,
            p_value,
            sample_size: xs.len(),
          });
        }
        None => {
          outcome.skipped_degenerate += 1;
          tracing::debug!(%key_a, %key_b, "skipping degenerate pair");
        }
      }
    }
  }

  outcome
}

// ─── Pearson ─────────────────────────────────────────────────────────────────

/// Pearson r and its two-sided p-value (Student's t test, `df = n − 2`).
///
/// Returns `None` when either column has zero variance over the joined
/// dates, or when any intermediate value is non-finite. Callers must skip
/// such pairs — a NaN never travels downstream.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
  let n = xs.len() as f64;
  let mut sum_x = 0.0;
  let mut sum_y = 0.0;
  let mut sum_xx = 0.0;
  let mut sum_yy = 0.0;
  let mut sum_xy = 0.0;
  for (x, y) in xs.iter().zip(ys.iter()) {
    sum_x += *x;
    sum_y += *y;
    sum_xx += x * x;
    sum_yy += y * y;
    sum_xy += x * y;
  }

  let denom_x = n * sum_xx - sum_x * sum_x;
  let denom_y = n * sum_yy - sum_y * sum_y;
  if denom_x <= 0.0 || denom_y <= 0.0 {
    return None;
  }

  let r = (n * sum_xy - sum_x * sum_y) / (denom_x * denom_y).sqrt();
  if !r.is_finite() {
    return None;
  }
  let r = r.clamp(-1.0, 1.0);

  let df = n - 2.0;
  if df <= 0.0 {
    return None;
  }
  // Guard the |r| → 1 limit; the t statistic diverges and p goes to 0.
  let denom = (1.0 - r * r).max(1e-12);
  let t = r * (df / denom).sqrt();

  let dist = StudentsT::new(0.0, 1.0, df).ok()?;
  let p = (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0);
  if !p.is_finite() {
    return None;
  }

  Some((r, p))
}
