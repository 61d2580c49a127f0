//! Runtime configuration read from `FIELDMAP_*` environment variables.
//!
//! `main` loads an optional `.env` file with `dotenvy` before calling
//! [`Config::from_env`]. Every setting has a default; a value that cannot be
//! parsed is logged and replaced by its default.

use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// SQLite file holding saved templates.
    pub db_path: PathBuf,
    /// Where uploaded CSV data sources are kept.
    pub data_dir: PathBuf,
    /// Where batch fill jobs write their PDFs.
    pub output_dir: PathBuf,
    pub open_browser: bool,
    /// Maximum JSON body size in megabytes. PDFs travel base64-encoded, so
    /// this bounds the size of document accepted by the fill endpoints.
    pub json_limit_mb: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            db_path: PathBuf::from("fieldmap.sqlite"),
            data_dir: PathBuf::from("./data"),
            output_dir: PathBuf::from("./pdfs"),
            open_browser: true,
            json_limit_mb: 25,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        Config {
            host: lookup("FIELDMAP_HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "FIELDMAP_PORT", defaults.port),
            db_path: lookup("FIELDMAP_DB").map(PathBuf::from).unwrap_or(defaults.db_path),
            data_dir: lookup("FIELDMAP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            output_dir: lookup("FIELDMAP_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            open_browser: match lookup("FIELDMAP_OPEN_BROWSER") {
                Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                    warn!("FIELDMAP_OPEN_BROWSER={:?} is not a boolean, using default", raw);
                    defaults.open_browser
                }),
                None => defaults.open_browser,
            },
            json_limit_mb: parsed(&lookup, "FIELDMAP_JSON_LIMIT_MB", defaults.json_limit_mb),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn json_limit_bytes(&self) -> usize {
        self.json_limit_mb.saturating_mul(1024 * 1024)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{}={:?} is not valid, using default", key, raw);
            default
        }),
        None => default,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("FIELDMAP_HOST", "0.0.0.0"),
            ("FIELDMAP_PORT", "9090"),
            ("FIELDMAP_DB", "/tmp/x.sqlite"),
            ("FIELDMAP_OPEN_BROWSER", "off"),
            ("FIELDMAP_JSON_LIMIT_MB", "5"),
        ]);
        assert_eq!(config.url(), "http://0.0.0.0:9090");
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.sqlite"));
        assert!(!config.open_browser);
        assert_eq!(config.json_limit_bytes(), 5 * 1024 * 1024);
    }

    #[test]
    fn huge_json_limit_saturates() {
        let config = config_from(&[("FIELDMAP_JSON_LIMIT_MB", &usize::MAX.to_string())]);
        assert_eq!(config.json_limit_bytes(), usize::MAX);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[
            ("FIELDMAP_PORT", "eighty"),
            ("FIELDMAP_OPEN_BROWSER", "maybe"),
        ]);
        assert_eq!(config.port, 8080);
        assert!(config.open_browser);
    }
}
