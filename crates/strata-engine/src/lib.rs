//! The Strata correlation-and-insight engine.
//!
//! Transforms a user's irregular, multi-domain time-series log into a
//! ranked set of statistically significant pairwise relationships and
//! renders each as a human-readable statement. Every relationship is an
//! observational, symmetric correlation with an explicit significance and
//! strength filter — never a causal claim.
//!
//! The pipeline is a chain of pure transforms over value types:
//!
//! ```text
//! raw points → series extraction → pairwise correlation → selection
//!            → narration → insight replacement (the only side effect)
//! ```
//!
//! The engine performs no network I/O. Journal summarization is a separate
//! collaborator that lives outside this crate entirely.

pub mod config;
pub mod correlate;
pub mod error;
pub mod narrate;
pub mod run;
pub mod select;
pub mod series;

pub use config::{AnalysisConfig, Goodness, Lookback};
pub use correlate::{CorrelationRecord, PairwiseOutcome};
pub use error::{EngineError, Result};
pub use run::{BatchReport, RunReport};
pub use series::MetricSeries;

#[cfg(test)]
mod tests;
