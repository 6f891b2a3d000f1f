use clap::{Args, Parser, Subcommand};
use infra_verify::config::ConfigOverrides;
use infra_verify::validation::clap_output_key_validator;
use infra_verify::verify::units::clap_unit_validator;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "infra-verify")]
#[command(about = "Verify outputs of already-applied infrastructure", long_about = None)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where outputs are read from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Config file (default: ./infra-verify.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the applied configuration (default: ../)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Tool executable, e.g. terraform or tofu
    #[arg(long, value_name = "BIN")]
    pub binary: Option<String>,

    /// Read the state file directly instead of invoking the tool
    /// (defaults to <DIR>/terraform.tfstate)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub state: Option<Option<PathBuf>>,

    /// Per-command timeout in seconds (default: 120)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl SourceArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            terraform_dir: self.dir.clone(),
            binary: self.binary.clone(),
            state: self.state.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run verification units (all units when none are named)
    Run {
        /// Units to run: compute, database, storage
        #[arg(value_parser = clap_unit_validator)]
        units: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List verification units and their required outputs
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a single required output
    Output {
        /// Output key (letters, digits, underscore, dash)
        #[arg(value_parser = clap_output_key_validator)]
        key: String,

        /// Print sensitive values instead of redacting them
        #[arg(long)]
        show_sensitive: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// List every output in applied state
    Outputs {
        #[command(flatten)]
        source: SourceArgs,
    },
}
