//! Harness configuration
//!
//! Values come from three layers, later layers winning:
//! 1. `infra-verify.toml` (or an explicit `--config` path), if present
//! 2. `INFRA_VERIFY_*` environment variables
//! 3. command-line flags (applied by the CLI)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::keys::env;
use crate::outputs::{OutputSource, StateFile, TerraformCli, DEFAULT_BINARY, DEFAULT_STATE_FILE};

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "infra-verify.toml";

/// Configuration directory relative to the harness (its parent)
pub const DEFAULT_TERRAFORM_DIR: &str = "../";

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Where outputs are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Invoke the tool's `output` command
    #[default]
    Cli,
    /// Read the state file directly
    State,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Cli => write!(f, "cli"),
            SourceKind::State => write!(f, "state"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cli" => Ok(SourceKind::Cli),
            "state" => Ok(SourceKind::State),
            _ => bail!("Invalid output source: {s}. Use: cli, state"),
        }
    }
}

/// Command-line overrides, applied after the file and environment layers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub terraform_dir: Option<PathBuf>,
    pub binary: Option<String>,
    /// `Some(None)` selects the state source at its default path
    pub state: Option<Option<PathBuf>>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifyConfig {
    /// Directory holding the applied configuration
    pub terraform_dir: PathBuf,
    /// Tool executable, e.g. `terraform` or `tofu`
    pub binary: String,
    pub source: SourceKind,
    /// State file path; defaults to `terraform.tfstate` inside `terraform_dir`
    pub state_file: Option<PathBuf>,
    pub command_timeout_secs: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            terraform_dir: PathBuf::from(DEFAULT_TERRAFORM_DIR),
            binary: DEFAULT_BINARY.to_string(),
            source: SourceKind::default(),
            state_file: None,
            command_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl VerifyConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse infra-verify config")
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load file and environment layers.
    ///
    /// An explicit path must exist; otherwise `infra-verify.toml` in the
    /// working directory is used when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_file(path)?,
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::load_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(env::DIR) {
            self.terraform_dir = PathBuf::from(dir);
        }
        if let Some(binary) = get(env::BINARY) {
            self.binary = binary;
        }
        if let Some(source) = get(env::SOURCE) {
            self.source = source
                .parse()
                .with_context(|| format!("Invalid {}", env::SOURCE))?;
        }
        if let Some(state_file) = get(env::STATE_FILE) {
            self.state_file = Some(PathBuf::from(state_file));
        }
        if let Some(secs) = get(env::TIMEOUT_SECS) {
            self.command_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: '{secs}'", env::TIMEOUT_SECS))?;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(dir) = &overrides.terraform_dir {
            self.terraform_dir = dir.clone();
        }
        if let Some(binary) = &overrides.binary {
            self.binary = binary.clone();
        }
        if let Some(state) = &overrides.state {
            self.source = SourceKind::State;
            if let Some(path) = state {
                self.state_file = Some(path.clone());
            }
        }
        if let Some(secs) = overrides.timeout_secs {
            self.command_timeout_secs = secs;
        }
    }

    /// Load every layer, command-line overrides last
    pub fn resolve(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = Self::load(explicit)?;
        config.apply_overrides(overrides);
        config.validate()?;
        tracing::debug!(?config, "resolved configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.command_timeout_secs == 0 {
            bail!("command_timeout_secs must be greater than zero");
        }
        if self.binary.trim().is_empty() {
            bail!("binary cannot be empty");
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Resolved state file location
    pub fn state_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| self.terraform_dir.join(DEFAULT_STATE_FILE))
    }

    /// Build the configured output source
    pub fn build_source(&self) -> Box<dyn OutputSource> {
        match self.source {
            SourceKind::Cli => Box::new(
                TerraformCli::new(&self.terraform_dir)
                    .with_binary(&self.binary)
                    .with_timeout(self.command_timeout()),
            ),
            SourceKind::State => Box::new(StateFile::new(self.state_path())),
        }
    }
}
