//! `fretboard`: browse a guitar storefront backend whose GraphQL schema is
//! not known in advance.
//!
//! # Usage
//!
//! ```text
//! fretboard brands
//! fretboard --diagnostics models 7
//! fretboard --json model 101
//! fretboard --config shop.toml serve
//! ```

mod browse;
mod output;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use fretboard_core::{Resolver, catalog::Catalog, fallback::StaticFallback};
use fretboard_graphql::HttpExecutor;
use settings::Settings;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "fretboard", version, about = "Resilient GraphQL catalog browser")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "fretboard.toml", global = true)]
  config: PathBuf,

  /// GraphQL endpoint; overrides the config file and FRETBOARD_ENDPOINT.
  #[arg(long, global = true)]
  endpoint: Option<String>,

  /// Print the full resolution report as JSON.
  #[arg(long, global = true)]
  json: bool,

  /// Print every candidate attempt after the results.
  #[arg(long, global = true)]
  diagnostics: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List all brands.
  Brands,
  /// List the models of one brand.
  Models { brand_id: String },
  /// Show one model's detail page.
  Model { model_id: String },
  /// Serve the JSON API.
  Serve,
  /// Read brand ids from stdin; each new id supersedes the previous one.
  Browse,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so stdout stays clean for `--json`.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config, cli.endpoint.clone())?;

  let executor = HttpExecutor::new(settings.http()).context("failed to build HTTP client")?;
  tracing::debug!(endpoint = executor.endpoint(), "resolver ready");
  let fallback = if settings.fallback { StaticFallback::sample() } else { StaticFallback::default() };
  let resolver = Resolver::new(Arc::new(executor), Arc::new(fallback))
    .with_models_catalog(Catalog::models_for_brand_with(settings.sort_placement));


  match cli.command {
    Command::Brands => {
      let cancel = cancel_on_ctrl_c();
      let report = resolver.resolve_all_brands(&cancel).await?;
      output::print_report(&report, cli.json, cli.diagnostics)?;
    }
    Command::Models { brand_id } => {
      let cancel = cancel_on_ctrl_c();
      let report = resolver.resolve_models_for_brand(&brand_id, &cancel).await?;
      output::print_report(&report, cli.json, cli.diagnostics)?;
    }
    Command::Model { model_id } => {
      let cancel = cancel_on_ctrl_c();
      let report = resolver.resolve_model_details(&model_id, &cancel).await?;
      output::print_report(&report, cli.json, cli.diagnostics)?;
    }
    Command::Serve => serve(&settings, resolver).await?,
    Command::Browse => browse::run(resolver, cli.json, cli.diagnostics).await?,
  }

  Ok(())
}

async fn serve(settings: &Settings, resolver: Resolver<HttpExecutor>) -> anyhow::Result<()> {
  let app = fretboard_api::api_router(resolver);
  let address = format!("{}:{}", settings.host, settings.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
    })
    .await
    .context("server error")?;

  Ok(())
}

/// A token cancelled when the user presses Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
  let token = CancellationToken::new();
  let guard = token.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      guard.cancel();
    }
  });
  token
}
