//! stageconf - Stage-aware layered configuration
//!
//! Resolves application configuration from command-line arguments, process
//! environment variables, and three tiered JSON files, merged in precedence
//! order (highest first):
//!
//! 1. Command-line arguments
//! 2. Environment variables (names split into nested keys on a separator)
//! 3. Local file: `<stage>.conf.json` in the working directory
//! 4. User file: `<home>/.<name>/<stage>.conf.json`
//! 5. Global file: `/etc/<name>/<stage>.conf.json`
//!
//! The active stage comes from the `APP_STAGE` variable, then
//! [`Options::default_stage`], then `development`. Missing files are treated
//! as empty sources; invalid stages, tiers, and file-name templates are
//! errors surfaced before any store is returned.
//!
//! ```no_run
//! let config = stageconf::create("myprogram", stageconf::Options::default())?;
//! let port = config.get("server.port");
//! # Ok::<(), stageconf::ConfigError>(())
//! ```

pub mod env;
pub mod errors;
pub mod factory;
pub mod options;
pub mod paths;
pub mod store;
pub mod template;

pub use env::{EnvSource, MockEnv, ProcessEnv};
pub use errors::{ConfigError, Result};
pub use factory::{create, create_with, STAGE_VAR};
pub use options::Options;
pub use paths::{config_path, Tier, DEFAULT_ALLOWED_STAGES};
pub use store::{LayeredStore, StoreBuilder};
pub use template::{stage_file_name, STAGE_PLACEHOLDER};
