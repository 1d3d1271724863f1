//! psn - Politisian dashboard client
//!
//! Resolves user identity through the tiered fallback chain and prints
//! the resulting dashboard view state as JSON.
//!
//! # Examples
//!
//! ```bash
//! # Resolve against a local service
//! psn --server http://127.0.0.1:8080 --session-token <token> --pretty
//! ```

mod cli;

use crate::cli::Cli;

use psn_client::backup::BackupCache;
use psn_client::config::ClientConfig;
use psn_client::logging::setup_logging;
use psn_client::presenter::RecoveryPresenter;
use psn_client::profile::ResolutionOutcome;
use psn_client::resolver::{ProfileResolver, ResolverError};
use psn_client::transport::{HttpLoader, HttpTransport};

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("Error creating data directory {}: {}", data_dir.display(), e);
        return ExitCode::FAILURE;
    }

    let config = match ClientConfig::load_or_create(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = setup_logging(&data_dir, &config.logging) {
        eprintln!("Warning: logging setup failed: {}", e);
    }

    info!("Starting psn v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", data_dir);

    let base_url = cli
        .server
        .clone()
        .unwrap_or_else(|| config.endpoints.base_url.clone());
    let session_token = cli.session_token.as_deref();

    let transport = HttpTransport::new(&base_url, session_token, config.tier_timeout());
    let cache = BackupCache::new(&data_dir);
    let resolver = Arc::new(ProfileResolver::new(
        transport,
        cache,
        config.tier_timeout(),
    ));

    let loader = Arc::new(HttpLoader::new(HttpTransport::new(
        &base_url,
        session_token,
        config.tier_timeout(),
    )));
    let presenter = RecoveryPresenter::new(
        loader,
        config.degraded_retry_delay(),
        config.stale_banner(),
    );

    presenter.mark_resolving();

    // Ctrl-C cancels the in-flight resolution instead of aborting
    // mid-write.
    let resolver_for_signal = resolver.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            resolver_for_signal.cancel().await;
        }
    });

    let outcome = match resolver.resolve().await {
        Ok(outcome) => outcome,
        Err(ResolverError::Cancelled) => {
            eprintln!("Resolution cancelled");
            return ExitCode::FAILURE;
        }
    };

    let degraded = matches!(outcome, ResolutionOutcome::PartiallyResolved(_));
    presenter.present(outcome);

    // A degraded dashboard schedules one dependent refresh; give it
    // time to run before the process exits.
    if degraded {
        tokio::time::sleep(config.degraded_retry_delay() + Duration::from_millis(500)).await;
    }

    let state = presenter.state();
    let output = if cli.pretty {
        serde_json::to_string_pretty(&state)
    } else {
        serde_json::to_string(&state)
    };

    match output {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing view state: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Default data directory, scoped per platform.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("politisian")
}
