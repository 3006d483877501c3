//! Layered key/value store
//!
//! Sources are registered in decreasing precedence order:
//! 1. Command-line arguments (highest)
//! 2. Environment variables
//! 3. Local config file
//! 4. User config file
//! 5. Global config file (lowest)
//!
//! `get` walks the sources in that order and returns the first value found.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::env::EnvSource;
use crate::errors::{ConfigError, Result};
use crate::paths::Tier;

/// Read-only merged view over the registered sources.
///
/// Built once via [`StoreBuilder`]; every factory call produces an
/// independent instance, so concurrent stores never share state.
#[derive(Debug, Clone)]
pub struct LayeredStore {
    sources: Vec<Source>,
}

#[derive(Debug, Clone)]
struct Source {
    name: String,
    values: Value,
}

impl LayeredStore {
    /// Look up a value by dotted key path (`"database.host"`).
    ///
    /// Returns the value from the highest-precedence source that defines the
    /// key, or `None` when no source does.
    pub fn get(&self, key: &str) -> Option<Value> {
        for source in &self.sources {
            if let Some(value) = lookup(&source.values, key) {
                debug!("Key '{}' resolved from {} source", key, source.name);
                return Some(value.clone());
            }
        }
        None
    }

    /// Convenience accessor for string values.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Names of the registered sources, highest precedence first.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }
}

fn lookup<'a>(values: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = values;
    for part in key.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Builder registering sources in decreasing precedence order.
///
/// File contents are read eagerly at registration; a file that does not
/// exist contributes an empty source rather than an error.
#[derive(Debug, Default)]
pub struct StoreBuilder {
    sources: Vec<Source>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the process command-line arguments.
    pub fn with_args(self) -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        self.with_arg_list(args)
    }

    /// Register an explicit argument list.
    ///
    /// Recognizes `--key value` and `--key=value`; dots in the key produce
    /// nested objects, values parse as JSON scalars when possible and fall
    /// back to plain strings. A trailing `--flag` with no value is `true`.
    pub fn with_arg_list<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut values = Value::Object(Map::new());

        let mut i = 0;
        while i < args.len() {
            if let Some(key) = args[i].strip_prefix("--") {
                if let Some((key, raw)) = key.split_once('=') {
                    insert_nested(&mut values, &key_path(key), parse_scalar(raw));
                } else if i + 1 < args.len() && !args[i + 1].starts_with("--") {
                    insert_nested(&mut values, &key_path(key), parse_scalar(&args[i + 1]));
                    i += 1;
                } else {
                    insert_nested(&mut values, &key_path(key), Value::Bool(true));
                }
            }
            i += 1;
        }

        self.sources.push(Source {
            name: "argv".to_string(),
            values,
        });
        self
    }

    /// Register environment variables, splitting names on `separator` into
    /// nested key paths. Name segments are kept verbatim.
    pub fn with_env(mut self, separator: &str, env: &dyn EnvSource) -> Self {
        let mut values = Value::Object(Map::new());
        for (name, value) in env.vars() {
            let path: Vec<String> = if separator.is_empty() {
                vec![name]
            } else {
                name.split(separator).map(str::to_string).collect()
            };
            insert_nested(&mut values, &path, Value::String(value));
        }

        debug!("Registered environment source with separator '{}'", separator);
        self.sources.push(Source {
            name: "env".to_string(),
            values,
        });
        self
    }

    /// Register one tier's JSON config file.
    pub fn with_file(mut self, tier: Tier, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let values = read_json_file(path)?;
        self.sources.push(Source {
            name: tier.to_string(),
            values,
        });
        Ok(self)
    }

    /// Finalize into a read-only store.
    pub fn build(self) -> LayeredStore {
        LayeredStore {
            sources: self.sources,
        }
    }
}

fn read_json_file(path: &Path) -> Result<Value> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let values: Value = serde_json::from_str(&content)?;
            debug!("Loaded config file: {}", path.display());
            Ok(values)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Config file not found, treating as empty: {}", path.display());
            Ok(Value::Object(Map::new()))
        }
        Err(e) => Err(ConfigError::Io(e)),
    }
}

fn key_path(key: &str) -> Vec<String> {
    key.split('.').map(str::to_string).collect()
}

/// `true`, `42`, `1.5` and `null` become typed values; everything else stays
/// a string.
fn parse_scalar(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::Null)) => v,
        _ => Value::String(raw.to_string()),
    }
}

/// Insert `leaf` at `path`, creating intermediate objects as needed.
///
/// A scalar in an intermediate position is replaced by an object; an object
/// already sitting at the leaf position is kept over an incoming scalar, so
/// the outcome does not depend on iteration order.
fn insert_nested(root: &mut Value, path: &[String], leaf: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for part in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        if let Value::Object(map) = current {
            current = map
                .entry(part.clone())
                .or_insert_with(|| Value::Object(Map::new()));
        }
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        let keep_existing =
            matches!(map.get(last), Some(existing) if existing.is_object() && !leaf.is_object());
        if !keep_existing {
            map.insert(last.clone(), leaf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write_json(dir: &TempDir, name: &str, value: Value) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_disjoint_keys_all_visible() {
        let dir = TempDir::new().unwrap();
        let global = write_json(&dir, "global.json", json!({"fromGlobal": 1}));
        let user = write_json(&dir, "user.json", json!({"fromUser": 2}));
        let local = write_json(&dir, "local.json", json!({"fromLocal": 3}));

        let store = StoreBuilder::new()
            .with_file(Tier::Local, &local)
            .unwrap()
            .with_file(Tier::User, &user)
            .unwrap()
            .with_file(Tier::Global, &global)
            .unwrap()
            .build();

        assert_eq!(store.get("fromGlobal"), Some(json!(1)));
        assert_eq!(store.get("fromUser"), Some(json!(2)));
        assert_eq!(store.get("fromLocal"), Some(json!(3)));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_higher_tier_wins_on_overlap() {
        let dir = TempDir::new().unwrap();
        let global = write_json(&dir, "global.json", json!({"shared": "global", "only": "g"}));
        let user = write_json(&dir, "user.json", json!({"shared": "user"}));
        let local = write_json(&dir, "local.json", json!({"shared": "local"}));

        let store = StoreBuilder::new()
            .with_file(Tier::Local, &local)
            .unwrap()
            .with_file(Tier::User, &user)
            .unwrap()
            .with_file(Tier::Global, &global)
            .unwrap()
            .build();

        assert_eq!(store.get("shared"), Some(json!("local")));
        assert_eq!(store.get("only"), Some(json!("g")));
    }

    #[test]
    fn test_argv_beats_env_beats_files() {
        let dir = TempDir::new().unwrap();
        let local = write_json(&dir, "local.json", json!({"port": 1, "host": "file"}));

        let env = MockEnv::from_pairs([("port", "2")]);
        let store = StoreBuilder::new()
            .with_arg_list(["--port", "3"])
            .with_env("_", &env)
            .with_file(Tier::Local, &local)
            .unwrap()
            .build();

        assert_eq!(store.get("port"), Some(json!(3)));
        assert_eq!(store.get("host"), Some(json!("file")));
    }

    #[test]
    fn test_env_beats_files() {
        let dir = TempDir::new().unwrap();
        let local = write_json(&dir, "local.json", json!({"host": "file"}));

        let env = MockEnv::from_pairs([("host", "env")]);
        let store = StoreBuilder::new()
            .with_arg_list(Vec::<String>::new())
            .with_env("_", &env)
            .with_file(Tier::Local, &local)
            .unwrap()
            .build();

        assert_eq!(store.get("host"), Some(json!("env")));
    }

    #[test]
    fn test_env_names_split_on_separator() {
        let env = MockEnv::from_pairs([("DB_HOST", "localhost"), ("DB_PORT", "5432")]);
        let store = StoreBuilder::new().with_env("_", &env).build();

        assert_eq!(store.get("DB.HOST"), Some(json!("localhost")));
        assert_eq!(store.get("DB.PORT"), Some(json!("5432")));
        assert_eq!(store.get("DB_HOST"), None);
    }

    #[test]
    fn test_custom_env_separator() {
        let env = MockEnv::from_pairs([("APP___LOG___LEVEL", "debug")]);
        let store = StoreBuilder::new().with_env("___", &env).build();

        assert_eq!(store.get("APP.LOG.LEVEL"), Some(json!("debug")));
    }

    #[test]
    fn test_argv_forms() {
        let store = StoreBuilder::new()
            .with_arg_list(["--name=svc", "--db.port", "5432", "--verbose"])
            .build();

        assert_eq!(store.get("name"), Some(json!("svc")));
        assert_eq!(store.get("db.port"), Some(json!(5432)));
        assert_eq!(store.get("verbose"), Some(json!(true)));
    }

    #[test]
    fn test_missing_file_is_empty_source() {
        let dir = TempDir::new().unwrap();
        let store = StoreBuilder::new()
            .with_file(Tier::Local, dir.path().join("does-not-exist.json"))
            .unwrap()
            .build();

        assert_eq!(store.get("anything"), None);
        assert_eq!(store.source_names(), vec!["local"]);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = StoreBuilder::new().with_file(Tier::Local, &path).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_nested_file_lookup() {
        let dir = TempDir::new().unwrap();
        let local = write_json(
            &dir,
            "local.json",
            json!({"database": {"pool": {"size": 8}}}),
        );

        let store = StoreBuilder::new()
            .with_file(Tier::Local, &local)
            .unwrap()
            .build();

        assert_eq!(store.get("database.pool.size"), Some(json!(8)));
        assert_eq!(store.get("database.pool"), Some(json!({"size": 8})));
        assert_eq!(store.get("database.pool.size.extra"), None);
    }

    #[test]
    fn test_get_str_stringifies() {
        let store = StoreBuilder::new().with_arg_list(["--port", "8080"]).build();
        assert_eq!(store.get_str("port"), Some("8080".to_string()));
    }
}
