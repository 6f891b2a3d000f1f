use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{dispatch, Cli};

/// Logs go to stderr so reports and `--json` output on stdout stay clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    dispatch(cli.command)
}
