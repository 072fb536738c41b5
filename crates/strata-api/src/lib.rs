//! JSON REST API for Strata.
//!
//! Exposes an axum [`Router`] backed by any [`strata_core::store::LogStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", strata_api::api_router(state))
//! ```

pub mod analysis;
pub mod error;
pub mod insights;
pub mod points;
pub mod summarize;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use strata_core::store::LogStore;

pub use error::ApiError;
pub use summarize::{Summarizer, SummarizerConfig};

/// Shared state for all handlers.
pub struct AppState<S> {
  pub store:      Arc<S>,
  pub summarizer: Arc<Summarizer>,
}

// Manual impl: `#[derive(Clone)]` would demand `S: Clone`, which the Arc
// makes unnecessary.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      summarizer: Arc::clone(&self.summarizer),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: LogStore + 'static,
{
  Router::new()
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    .route(
      "/users/{id}/journal-summary",
      get(users::journal_summary::<S>),
    )
    // Log points
    .route("/points", get(points::list::<S>).post(points::create::<S>))
    // Insights
    .route("/insights", get(insights::list::<S>))
    // On-demand analysis
    .route("/analysis/{user_id}", post(analysis::run::<S>))
    .with_state(state)
}
