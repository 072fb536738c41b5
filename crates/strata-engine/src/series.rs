//! Series extraction — reshaping raw log points into per-metric time series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use strata_core::point::{LogPoint, MetricKey};

/// A user's log reshaped into one date-indexed column per metric key.
///
/// Built fresh per analysis run, never persisted. Sparse by construction: a
/// missing `(date, metric)` combination stays missing. Nothing is
/// forward-filled or zero-filled here — synthetic values would corrupt the
/// correlation math downstream, so any filling is strictly a
/// presentation-layer concern.
///
/// Both maps are `BTreeMap`s, so iteration over keys and dates is always
/// sorted and re-runs on unchanged data produce identical output.
#[derive(Debug, Clone, Default)]
pub struct MetricSeries {
  columns: BTreeMap<MetricKey, BTreeMap<NaiveDate, f64>>,
}

impl MetricSeries {
  /// Build the table from raw points.
  ///
  /// Multiple observations of one metric on one date are averaged.
  /// Note-only points carry no numeric value and are excluded — they stay
  /// available to the journal-summary collaborator, but never enter the
  /// numeric series.
  pub fn from_points(points: &[LogPoint]) -> Self {
    let mut sums: BTreeMap<MetricKey, BTreeMap<NaiveDate, (f64, u32)>> =
      BTreeMap::new();

    for point in points {
      let Some(value) = point.value else { continue };
      let cell = sums
        .entry(point.metric_key())
        .or_default()
        .entry(point.date)
        .or_insert((0.0, 0));
      cell.0 += value;
      cell.1 += 1;
    }

    let columns = sums
      .into_iter()
      .map(|(key, days)| {
        let column = days
          .into_iter()
          .map(|(date, (sum, count))| (date, sum / f64::from(count)))
          .collect();
        (key, column)
      })
      .collect();

    Self { columns }
  }

  /// Number of metric columns.
  pub fn metric_count(&self) -> usize {
    self.columns.len()
  }

  pub fn is_empty(&self) -> bool {
    self.columns.is_empty()
  }

  /// Columns in sorted key order.
  pub fn iter(
    &self,
  ) -> impl Iterator<Item = (&MetricKey, &BTreeMap<NaiveDate, f64>)> {
    self.columns.iter()
  }

  /// One column, if the metric was observed at all.
  pub fn column(&self, key: &MetricKey) -> Option<&BTreeMap<NaiveDate, f64>> {
    self.columns.get(key)
  }
}
