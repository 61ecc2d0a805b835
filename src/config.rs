//! Application configuration.
//!
//! Values come from three layers, later ones winning: keys compiled into the
//! binary, the process environment, then `config.<mode>.json` in the app
//! directory. Resolution itself is a pure function of those layers.

use crate::connection::ConnectionConfig;
use crate::core::{BenchError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DB_HOST: &str = "APP_DB_HOST";
pub const DB_USER: &str = "APP_DB_USER";
pub const DB_PASS: &str = "APP_DB_PASS";
pub const DB_PORT: &str = "APP_DB_PORT";
pub const DB_NAME: &str = "APP_DB_NAME";
pub const DB_MAX_OPEN_CONNECTIONS: &str = "APP_DB_MAX_OPEN_CONNECTIONS";
pub const DB_MAX_IDLE_CONNECTIONS: &str = "APP_DB_MAX_IDLE_CONNECTIONS";
pub const DB_CONNECT_TIMEOUT_MS: &str = "APP_DB_CONNECT_TIMEOUT_MS";

/// Directory holding `config.<mode>.json`
pub const APP_DIR: &str = "APP_DIR";

pub const KEYS: [&str; 8] = [
    DB_HOST,
    DB_USER,
    DB_PASS,
    DB_PORT,
    DB_NAME,
    DB_MAX_OPEN_CONNECTIONS,
    DB_MAX_IDLE_CONNECTIONS,
    DB_CONNECT_TIMEOUT_MS,
];

/// One configuration layer
pub type Layer = BTreeMap<String, String>;

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_host: String,
    pub db_user: String,
    pub db_pass: String,
    pub db_port: u16,
    pub db_name: String,
    /// 0 selects the pool default
    pub db_max_open_connections: u32,
    /// 0 selects the pool default
    pub db_max_idle_connections: u32,
    /// 0 selects the connect default
    pub db_connect_timeout_ms: u64,
}

impl AppConfig {
    /// Merge the layers and parse the result
    pub fn resolve(compiled: &Layer, env: &Layer, file: &Layer) -> Result<Self> {
        let mut merged = Layer::new();
        for layer in [compiled, env, file] {
            for (key, value) in layer {
                if !value.is_empty() {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }

        let get = |key: &str| merged.get(key).cloned();
        let db_user = get(DB_USER).unwrap_or_default();

        Ok(Self {
            db_host: get(DB_HOST).unwrap_or_else(|| "127.0.0.1".to_string()),
            db_pass: get(DB_PASS).unwrap_or_default(),
            db_port: parse_or(&merged, DB_PORT, 3306)?,
            db_name: get(DB_NAME).unwrap_or_else(|| db_user.clone()),
            db_user,
            db_max_open_connections: parse_or(&merged, DB_MAX_OPEN_CONNECTIONS, 0)?,
            db_max_idle_connections: parse_or(&merged, DB_MAX_IDLE_CONNECTIONS, 0)?,
            db_connect_timeout_ms: parse_or(&merged, DB_CONNECT_TIMEOUT_MS, 0)?,
        })
    }

    /// Load from all three layers; `dir` falls back to `$APP_DIR`, then `.`
    pub fn load(dir: Option<&Path>, mode: &str) -> Result<Self> {
        let env = env_snapshot();
        let dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => env
                .get(APP_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        let file = load_file(&dir, mode)?;
        Self::resolve(&compiled_defaults(), &env, &file)
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig::new(&self.db_user, &self.db_pass)
            .host(&self.db_host)
            .port(self.db_port)
            .database(&self.db_name)
            .max_open_connections(self.db_max_open_connections)
            .max_idle_connections(self.db_max_idle_connections)
            .connect_timeout(Duration::from_millis(self.db_connect_timeout_ms))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("db_host", &self.db_host)
            .field("db_user", &self.db_user)
            .field("db_pass", &"***")
            .field("db_port", &self.db_port)
            .field("db_name", &self.db_name)
            .field("db_max_open_connections", &self.db_max_open_connections)
            .field("db_max_idle_connections", &self.db_max_idle_connections)
            .field("db_connect_timeout_ms", &self.db_connect_timeout_ms)
            .finish()
    }
}

fn parse_or<T: std::str::FromStr>(layer: &Layer, key: &str, default: T) -> Result<T> {
    match layer.get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| BenchError::config(format!("{} must be a number, got '{}'", key, raw))),
        None => Ok(default),
    }
}

/// Keys baked in at build time, e.g. `APP_DB_HOST=db cargo build`
pub fn compiled_defaults() -> Layer {
    let baked = [
        (DB_HOST, option_env!("APP_DB_HOST")),
        (DB_USER, option_env!("APP_DB_USER")),
        (DB_PASS, option_env!("APP_DB_PASS")),
        (DB_PORT, option_env!("APP_DB_PORT")),
        (DB_NAME, option_env!("APP_DB_NAME")),
        (DB_MAX_OPEN_CONNECTIONS, option_env!("APP_DB_MAX_OPEN_CONNECTIONS")),
        (DB_MAX_IDLE_CONNECTIONS, option_env!("APP_DB_MAX_IDLE_CONNECTIONS")),
        (DB_CONNECT_TIMEOUT_MS, option_env!("APP_DB_CONNECT_TIMEOUT_MS")),
    ];
    baked
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v.to_string())))
        .collect()
}

/// `APP_*` variables of the current process
pub fn env_snapshot() -> Layer {
    std::env::vars()
        .filter(|(key, _)| key.starts_with("APP_"))
        .collect()
}

/// Read `<dir>/config.<mode>.json`, a flat object of string values.
///
/// A missing file is an empty layer.
pub fn load_file(dir: &Path, mode: &str) -> Result<Layer> {
    let path = dir.join(format!("config.{}.json", mode));
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Layer::new()),
        Err(err) => {
            return Err(BenchError::config(format!(
                "failed to read {}: {}",
                path.display(),
                err
            )));
        }
    };

    serde_json::from_str::<Layer>(&raw).map_err(|err| {
        BenchError::config(format!("{} is not a flat JSON object of strings: {}", path.display(), err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(pairs: &[(&str, &str)]) -> Layer {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_later_layers_win() {
        let compiled = layer(&[(DB_HOST, "compiled"), (DB_USER, "root"), (DB_PORT, "3306")]);
        let env = layer(&[(DB_HOST, "env"), (DB_PORT, "3307")]);
        let file = layer(&[(DB_HOST, "file")]);

        let config = AppConfig::resolve(&compiled, &env, &file).unwrap();
        assert_eq!(config.db_host, "file");
        assert_eq!(config.db_port, 3307);
        assert_eq!(config.db_user, "root");
    }

    #[test]
    fn test_empty_values_do_not_override() {
        let env = layer(&[(DB_USER, "bench")]);
        let file = layer(&[(DB_USER, "")]);
        let config = AppConfig::resolve(&Layer::new(), &env, &file).unwrap();
        assert_eq!(config.db_user, "bench");
    }

    #[test]
    fn test_unset_values_fall_back() {
        let config = AppConfig::resolve(&Layer::new(), &layer(&[(DB_USER, "bench")]), &Layer::new()).unwrap();
        assert_eq!(config.db_host, "127.0.0.1");
        assert_eq!(config.db_port, 3306);
        assert_eq!(config.db_name, "bench");
        assert_eq!(config.db_max_open_connections, 0);
        assert_eq!(config.db_connect_timeout_ms, 0);
    }

    #[test]
    fn test_bad_number_is_config_error() {
        let env = layer(&[(DB_MAX_OPEN_CONNECTIONS, "many")]);
        let err = AppConfig::resolve(&Layer::new(), &env, &Layer::new()).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
        assert!(err.to_string().contains(DB_MAX_OPEN_CONNECTIONS));
    }

    #[test]
    fn test_connection_config_mapping() {
        let env = layer(&[
            (DB_USER, "bench"),
            (DB_PASS, "pw"),
            (DB_NAME, "shop"),
            (DB_MAX_IDLE_CONNECTIONS, "5"),
            (DB_CONNECT_TIMEOUT_MS, "1500"),
        ]);
        let conn = AppConfig::resolve(&Layer::new(), &env, &Layer::new())
            .unwrap()
            .connection_config()
            .with_defaults();
        assert_eq!(conn.database, "shop");
        assert_eq!(conn.max_idle_connections, 5);
        assert_eq!(conn.max_open_connections, 2);
        assert_eq!(conn.connect_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.dev.json"),
            r#"{"APP_DB_HOST": "10.0.0.5", "APP_DB_PORT": "3310"}"#,
        )
        .unwrap();

        let file = load_file(dir.path(), "dev").unwrap();
        assert_eq!(file.get(DB_HOST).map(String::as_str), Some("10.0.0.5"));

        assert!(load_file(dir.path(), "prod").unwrap().is_empty());
    }

    #[test]
    fn test_load_file_rejects_nested_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.dev.json"), r#"{"APP_DB_PORT": 3310}"#).unwrap();
        assert!(matches!(load_file(dir.path(), "dev"), Err(BenchError::Config(_))));
    }

    #[test]
    fn test_debug_masks_password() {
        let env = layer(&[(DB_PASS, "hunter2")]);
        let config = AppConfig::resolve(&Layer::new(), &env, &Layer::new()).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
