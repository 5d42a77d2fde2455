use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Startup configuration: where to listen and how many worker loops to run.
///
/// Consumed once at server construction. Loaded from an optional YAML file
/// with environment overrides on top; every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address to bind the listening socket to
    pub listen_addr: String,
    /// Port to bind the listening socket to
    pub listen_port: u16,
    /// Number of worker event loops; must be at least 1
    pub worker_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 7000,
            worker_threads: 3,
        }
    }
}

impl Config {
    /// Reads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Loads configuration for the process.
    ///
    /// Starts from the file named by `HERALD_CONFIG` (defaults when unset),
    /// then applies `HERALD_LISTEN_ADDR`, `HERALD_LISTEN_PORT`, and
    /// `HERALD_WORKER_THREADS` overrides. An override that does not parse is
    /// an error, not a silent fallback.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("HERALD_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("HERALD_LISTEN_ADDR") {
            cfg.listen_addr = addr;
        }
        if let Ok(port) = std::env::var("HERALD_LISTEN_PORT") {
            cfg.listen_port = port
                .parse()
                .context("HERALD_LISTEN_PORT is not a valid port number")?;
        }
        if let Ok(threads) = std::env::var("HERALD_WORKER_THREADS") {
            cfg.worker_threads = threads
                .parse()
                .context("HERALD_WORKER_THREADS is not a valid thread count")?;
        }

        Ok(cfg)
    }
}
