//! Narrative rendering — one human-readable sentence per selected record.

use strata_core::point::MetricKey;

use crate::{
  config::{AnalysisConfig, Goodness},
  correlate::CorrelationRecord,
};

/// Render a selected correlation as a descriptive sentence.
///
/// Pure function of the record and the configured goodness table; it never
/// touches storage. The strength banding only ever fires for records past
/// the selector's `|r| > 0.3` gate, so "weak" here means the real,
/// expected 0.3–0.5 band — weak but selected.
pub fn describe(record: &CorrelationRecord, cfg: &AnalysisConfig) -> String {
  let r = record.coefficient;
  let strength = strength_of(r);
  let direction = if r > 0.0 { "positive" } else { "negative" };

  let body = if record.key_a.domain == record.key_b.domain {
    format!(
      "{} and {} show a {} {} correlation",
      title_case(&record.key_a.metric),
      humanize(&record.key_b.metric),
      strength,
      direction,
    )
  } else {
    format!(
      "Higher {} in {} is associated with {} {} in {}",
      humanize(&record.key_a.metric),
      record.key_a.domain,
      quality_word(r, cfg.goodness_of(&record.key_b)),
      humanize(&record.key_b.metric),
      record.key_b.domain,
    )
  };

  let qualifier = if record.p_value < 0.01 {
    "highly significant"
  } else {
    "significant"
  };

  format!(
    "{} (r = {:.2}, {:.1}% strength, {})",
    body,
    r,
    r.abs() * 100.0,
    qualifier,
  )
}

/// How the change in metric B reads for the user, given the direction of
/// the relationship and whether higher B is good news.
///
/// Positive r pairs higher A with higher B; negative r pairs higher A with
/// lower B. Whether that is "better" or "worse" depends on the metric —
/// more sleep is good, more stress is not — which is why goodness is a
/// per-metric configuration rather than an assumption.
fn quality_word(r: f64, goodness_b: Goodness) -> &'static str {
  match (r > 0.0, goodness_b) {
    (true, Goodness::HigherIsBetter) => "better",
    (true, Goodness::LowerIsBetter) => "worse",
    (false, Goodness::HigherIsBetter) => "worse",
    (false, Goodness::LowerIsBetter) => "better",
  }
}

fn strength_of(r: f64) -> &'static str {
  let abs = r.abs();
  if abs > 0.7 {
    "strong"
  } else if abs > 0.5 {
    "moderate"
  } else {
    "weak"
  }
}

/// `"max_grade"` → `"max grade"`.
fn humanize(metric: &str) -> String {
  metric.replace('_', " ")
}

/// `"max_grade"` → `"Max Grade"`.
fn title_case(metric: &str) -> String {
  metric
    .split('_')
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}
