//! Configuration for the traffic visualizer, loaded from `/etc/ntv.toml`
//! with a fallback to `./ntv.toml` and then to built-in defaults. Every
//! field is optional in the file.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const ETC_PATH: &str = "/etc/ntv.toml";
const LOCAL_PATH: &str = "ntv.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read configuration file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Unable to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct NtvConfig {
    /// Base URL of the capture daemon's REST API.
    pub api_url: String,
    /// Seconds between snapshot polls while capture is running.
    pub poll_interval_secs: u64,
    /// How long a connection stays "active" after it was last observed.
    pub active_window_ms: u64,
    /// Per-bucket ceiling on the packets-per-second chart.
    pub bucket_cap: u64,
    /// Number of buckets shown on the packets-per-second chart.
    pub chart_buckets: usize,
    /// Row limit for the packet, port and alert panes.
    pub top_n: usize,
    /// Addresses treated as local in addition to whatever the daemon reports.
    pub extra_local_ips: Vec<String>,
}

impl Default for NtvConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_secs: 5,
            active_window_ms: 30_000,
            bucket_cap: 50,
            chart_buckets: 5,
            top_n: 5,
            extra_local_ips: Vec::new(),
        }
    }
}

impl NtvConfig {
    /// Loads the system config file, then the working-directory one. A
    /// missing file is not an error; a malformed one is.
    pub fn load() -> Result<Self, ConfigError> {
        for candidate in [ETC_PATH, LOCAL_PATH] {
            if Path::new(candidate).exists() {
                log::info!("Loading configuration from {candidate}");
                return Self::load_from(Path::new(candidate));
            }
        }
        log::info!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NtvConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.active_window_ms, 30_000);
        assert_eq!(config.bucket_cap, 50);
        assert_eq!(config.chart_buckets, 5);
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: NtvConfig =
            toml::from_str("api_url = \"http://10.0.0.2:5000\"\npoll_interval_secs = 2\n")
                .unwrap();
        assert_eq!(config.api_url, "http://10.0.0.2:5000");
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.bucket_cap, 50);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let result: Result<NtvConfig, _> = toml::from_str("poll_interval_secs = \"soon\"");
        assert!(result.is_err());
    }
}
