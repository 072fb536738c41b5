//! `strata` — command-line entry points for the Strata life log.
//!
//! # Usage
//!
//! ```
//! strata serve --config strata.toml
//! strata analyze 4f8a…-…            # on-demand run for one user
//! strata analyze-all --weekly       # the scheduled batch (cron calls this)
//! ```
//!
//! Scheduling itself stays external — point cron (or any scheduler) at
//! `strata analyze-all --weekly`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use strata_api::{AppState, Summarizer, SummarizerConfig};
use strata_engine::{AnalysisConfig, BatchReport, Lookback, RunReport, run};
use strata_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
  name = "strata",
  about = "Daily life log with cross-domain correlation insights"
)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Run the JSON API server.
  Serve {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "strata.toml")]
    config: PathBuf,
  },

  /// Run the correlation pipeline for a single user.
  Analyze {
    user_id: Uuid,

    /// Path to the SQLite store.
    #[arg(long, env = "STRATA_STORE", default_value = "strata.db")]
    store: PathBuf,

    /// Trailing window in days; omit to analyze all history.
    #[arg(long)]
    days: Option<u32>,

    /// Minimum overlapping dates before a metric pair is evaluated.
    #[arg(long, default_value_t = 5)]
    min_overlap: usize,

    /// Significance gate; pairs survive only below this p-value.
    #[arg(long, default_value_t = 0.05)]
    significance_p: f64,

    /// Strength gate; pairs survive only above this |r|.
    #[arg(long, default_value_t = 0.3)]
    min_abs_r: f64,

    /// Insights kept per polarity.
    #[arg(long, default_value_t = 3)]
    top_n: usize,
  },

  /// Run the batch pipeline over every known user.
  AnalyzeAll {
    /// Path to the SQLite store.
    #[arg(long, env = "STRATA_STORE", default_value = "strata.db")]
    store: PathBuf,

    /// Use the weekly profile: trailing 7 days, overlap floor 3.
    #[arg(long)]
    weekly: bool,
  },
}

// ─── Server config file ───────────────────────────────────────────────────────

/// Shape of the TOML configuration file read by `strata serve`.
/// Every field can also come from the environment with a `STRATA_` prefix.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ServerConfig {
  host:       String,
  port:       u16,
  store_path: PathBuf,
  summarizer: SummarizerConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_owned(),
      port:       8080,
      store_path: PathBuf::from("strata.db"),
      summarizer: SummarizerConfig::default(),
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match cli.command {
    Command::Serve { config } => serve(config).await,
    Command::Analyze {
      user_id,
      store,
      days,
      min_overlap,
      significance_p,
      min_abs_r,
      top_n,
    } => {
      let cfg = AnalysisConfig {
        lookback: days.map_or(Lookback::All, Lookback::Days),
        min_overlap,
        significance_p,
        min_abs_r,
        top_n_per_polarity: top_n,
        ..AnalysisConfig::default()
      };
      analyze_one(store, user_id, cfg).await
    }
    Command::AnalyzeAll { store, weekly } => {
      let cfg = if weekly {
        AnalysisConfig::weekly()
      } else {
        AnalysisConfig::default()
      };
      analyze_all(store, cfg).await
    }
  }
}

// ─── Serve ────────────────────────────────────────────────────────────────────

async fn serve(config_path: PathBuf) -> anyhow::Result<()> {
  let settings = config::Config::builder()
    .add_source(config::File::from(config_path).required(false))
    .add_source(config::Environment::with_prefix("STRATA").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;

  let state = AppState {
    store:      Arc::new(store),
    summarizer: Arc::new(Summarizer::new(server_cfg.summarizer.clone())),
  };

  let app = axum::Router::new()
    .nest("/api", strata_api::api_router(state))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

// ─── Analyze ──────────────────────────────────────────────────────────────────

async fn analyze_one(
  store_path: PathBuf,
  user_id: Uuid,
  cfg: AnalysisConfig,
) -> anyhow::Result<()> {
  let store = open_store(&store_path).await?;
  let report = run::run_for_user(&store, user_id, &cfg)
    .await
    .context("analysis failed")?;
  print_report(&report);
  Ok(())
}

async fn analyze_all(
  store_path: PathBuf,
  cfg: AnalysisConfig,
) -> anyhow::Result<()> {
  let store = open_store(&store_path).await?;
  let report = run::run_for_all_users(&store, &cfg)
    .await
    .context("batch analysis failed")?;
  print_batch_report(&report);
  Ok(())
}

async fn open_store(path: &Path) -> anyhow::Result<SqliteStore> {
  SqliteStore::open(path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))
}

fn print_report(report: &RunReport) {
  println!("Analysis for user {}", report.user_id);
  println!("  points analyzed:          {}", report.total_points);
  println!("  metrics:                  {}", report.total_metrics);
  println!("  pairs tested:             {}", report.pairs_tested);
  println!("  significant correlations: {}", report.significant_count);

  let (positive, negative) = report.insights.split_at(report.positive_count);

  if !positive.is_empty() {
    println!("\nTop positive correlations:");
    for (index, insight) in positive.iter().enumerate() {
      println!("  {}. {}", index + 1, insight.description);
      println!("     score: {:.3}", insight.correlation_score);
    }
  }
  if !negative.is_empty() {
    println!("\nTop negative correlations:");
    for (index, insight) in negative.iter().enumerate() {
      println!("  {}. {}", index + 1, insight.description);
      println!("     score: {:.3}", insight.correlation_score);
    }
  }
}

fn print_batch_report(report: &BatchReport) {
  println!("Batch analysis complete");
  println!("  users processed: {}", report.users_processed);
  println!("  users skipped:   {}", report.users_skipped);
  println!("  users failed:    {}", report.users_failed);
  println!("  insights written: {}", report.insights_written);
}
