//! Per-tier configuration file path construction
//!
//! Each tier maps to a fixed base location:
//! - global: `/etc/<name>/`
//! - user:   `<home>/.<name>/`
//! - local:  the working directory (bare file name)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::env::EnvSource;
use crate::errors::{ConfigError, Result};
use crate::options::Options;
use crate::template::stage_file_name;

/// Stages accepted when [`Options::allowed_stages`] is unset.
pub const DEFAULT_ALLOWED_STAGES: [&str; 5] =
    ["production", "staging", "development", "local", "test"];

/// The three fixed configuration tiers, ordered lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Global,
    User,
    Local,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Global => "global",
            Tier::User => "user",
            Tier::Local => "local",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "global" => Ok(Tier::Global),
            "user" => Ok(Tier::User),
            "local" => Ok(Tier::Local),
            other => Err(ConfigError::UnsupportedTier(other.to_string())),
        }
    }
}

/// Resolve the configuration file path for one tier.
///
/// Validates `stage` against the active allow-list, renders the file name
/// from `options.file_name_template` (falling back to `<stage>.conf.json`),
/// and joins it onto the tier's base directory. Pure given its inputs; the
/// only process state consulted is the home directory from `env`.
pub fn config_path(
    tier: Tier,
    name: &str,
    stage: &str,
    options: &Options,
    env: &dyn EnvSource,
) -> Result<PathBuf> {
    let allowed = match &options.allowed_stages {
        Some(list) => list.iter().any(|s| s == stage),
        None => DEFAULT_ALLOWED_STAGES.contains(&stage),
    };
    if !allowed {
        return Err(ConfigError::UnsupportedStage(stage.to_string()));
    }

    let file_name = stage_file_name(options.file_name_template.as_deref(), stage)?
        .unwrap_or_else(|| format!("{}.conf.json", stage));

    let path = match tier {
        Tier::Global => PathBuf::from("/etc").join(name).join(file_name),
        Tier::User => env
            .home_dir()
            .ok_or(ConfigError::NoHomeDir)?
            .join(format!(".{}", name))
            .join(file_name),
        Tier::Local => PathBuf::from(file_name),
    };

    debug!("Resolved {} config path: {}", tier, path.display());
    Ok(path)
}
