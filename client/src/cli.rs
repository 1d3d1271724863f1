use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "psn")]
#[command(about = "Politisian dashboard client")]
#[command(version)]
pub struct Cli {
    /// Service URL (overrides the configured endpoint)
    #[arg(long)]
    pub server: Option<String>,

    /// Session token, sent as the session_token cookie
    #[arg(long)]
    pub session_token: Option<String>,

    /// Data directory (default: platform data dir + "politisian")
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Pretty-print the resulting view state
    #[arg(long)]
    pub pretty: bool,
}
