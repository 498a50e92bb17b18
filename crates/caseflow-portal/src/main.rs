//! Caseflow server binary.
//!
//! Reads `caseflow.toml` (or the path given with `--config`) and
//! `CASEFLOW_*` environment variables, builds the in-memory stores and
//! serves the portal over HTTP.
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `CASEFLOW_BRANDING__AGENCY_NAME`.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for a staff account:
//!
//! ```
//! cargo run -p caseflow-portal -- --hash-password
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use caseflow_portal::{AppState, config::PortalConfig};
use caseflow_store_memory::{MemorySessionStore, MemoryStore};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::{
  request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
  trace::TraceLayer,
};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Ethics commission case intake and tracking")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "caseflow.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

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

  if cli.hash_password {
    let password = rpassword_or_stdin()?;
    let hash = caseflow_service::hash_password(&password).context("failed to hash password")?;
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("CASEFLOW")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let portal_cfg: PortalConfig = settings
    .try_deserialize()
    .context("failed to deserialise PortalConfig")?;

  let store = if portal_cfg.seed_demo_data {
    MemoryStore::with_demo_data()
  } else {
    MemoryStore::new()
  };
  let users = MemorySessionStore::with_demo_user();

  if portal_cfg.demo_mode {
    info!("demo mode enabled: staff logins accept any password");
  }

  let address = portal_cfg.address();
  let state = AppState::new(Arc::new(store), Arc::new(users), portal_cfg);
  let app = caseflow_portal::router(state)
    .layer(TraceLayer::new_for_http())
    .layer(PropagateRequestIdLayer::x_request_id())
    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

  info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn rpassword_or_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
