//! Top-level factory
//!
//! Determines the active stage, resolves the three tier paths, and registers
//! every source into a fresh [`LayeredStore`].

use tracing::{debug, info};

use crate::env::{EnvSource, ProcessEnv};
use crate::errors::Result;
use crate::options::Options;
use crate::paths::{config_path, Tier};
use crate::store::{LayeredStore, StoreBuilder};

/// Environment variable selecting the active stage.
pub const STAGE_VAR: &str = "APP_STAGE";

const DEFAULT_STAGE: &str = "development";
const DEFAULT_ENV_SEPARATOR: &str = "_";

/// Build the layered configuration store for `name`.
///
/// Reads the real process environment and command-line arguments. Any
/// stage or template validation failure propagates unchanged; no partial
/// store is returned.
pub fn create(name: &str, options: Options) -> Result<LayeredStore> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    create_with(name, options, &ProcessEnv, args)
}

/// Build the store against an injected environment and argument list.
///
/// This is the seam tests use to run deterministically; [`create`] forwards
/// to it with [`ProcessEnv`] and the real argv.
pub fn create_with<I, S>(
    name: &str,
    options: Options,
    env: &dyn EnvSource,
    args: I,
) -> Result<LayeredStore>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let stage = active_stage(&options, env);
    debug!("Resolving tiered config for '{}', stage '{}'", name, stage);

    // Fixed tier order; any failure aborts with no partial store.
    let global = config_path(Tier::Global, name, &stage, &options, env)?;
    let user = config_path(Tier::User, name, &stage, &options, env)?;
    let local = config_path(Tier::Local, name, &stage, &options, env)?;

    let separator = options
        .env_separator
        .as_deref()
        .unwrap_or(DEFAULT_ENV_SEPARATOR);

    let store = StoreBuilder::new()
        .with_arg_list(args)
        .with_env(separator, env)
        .with_file(Tier::Local, &local)?
        .with_file(Tier::User, &user)?
        .with_file(Tier::Global, &global)?
        .build();

    info!("Layered configuration ready for '{}' (stage '{}')", name, stage);
    Ok(store)
}

/// Stage precedence: `APP_STAGE` variable, then `default_stage`, then the
/// fixed `development` fallback.
fn active_stage(options: &Options, env: &dyn EnvSource) -> String {
    env.var(STAGE_VAR)
        .or_else(|| options.default_stage.clone())
        .unwrap_or_else(|| DEFAULT_STAGE.to_string())
}
