//! Runtime configuration from environment variables

use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

use crate::artifacts::ArtifactConfig;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: Level,
    pub artifacts: ArtifactConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: Level::INFO,
            artifacts: ArtifactConfig::default(),
        }
    }
}

impl Config {
    /// Read `HOST`, `PORT`, `LOG_LEVEL`, `MODEL_DIR`, `MODEL_YOUNG`,
    /// `MODEL_REST`, `SCALER_YOUNG` and `SCALER_REST`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Some(level) = lookup("LOG_LEVEL").and_then(|l| Level::from_str(&l).ok()) {
            config.log_level = level;
        }

        let artifacts = &mut config.artifacts;
        if let Some(dir) = lookup("MODEL_DIR") {
            artifacts.model_dir = PathBuf::from(dir);
        }
        let files = [
            ("MODEL_YOUNG", &mut artifacts.model_young),
            ("MODEL_REST", &mut artifacts.model_rest),
            ("SCALER_YOUNG", &mut artifacts.scaler_young),
            ("SCALER_REST", &mut artifacts.scaler_rest),
        ];
        for (key, slot) in files {
            if let Some(file) = lookup(key) {
                *slot = file;
            }
        }

        config
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.artifacts, ArtifactConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("LOG_LEVEL", "debug"),
            ("MODEL_DIR", "/srv/model"),
            ("MODEL_REST", "model_rest.onnx"),
        ]));

        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.artifacts.model_dir, PathBuf::from("/srv/model"));
        assert_eq!(config.artifacts.model_rest, "model_rest.onnx");
        assert_eq!(config.artifacts.model_young, "model_young.json");
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = Config::from_lookup(lookup(&[("PORT", "eighty"), ("LOG_LEVEL", "loud")]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, Level::INFO);
    }
}
