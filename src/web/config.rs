use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::fetch::DEFAULT_BASE_URL;
use crate::scheduler::Region;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub screening: ScreeningConfig,
    /// Run against the simulated population instead of a live source.
    #[serde(default)]
    pub demo: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory holding the prebuilt static frontend, if any.
    #[serde(default)]
    pub frontend: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Falls back to the N2YO_API_KEY environment variable when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_radius_km")]
    pub radius_km: u32,
    #[serde(default = "default_timeout", deserialize_with = "duration_str")]
    pub timeout: Duration,
    #[serde(default = "default_regions")]
    pub regions: Vec<Region>,
}

impl UpstreamConfig {
    /// Resolved api key: explicit config wins, then the environment.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("N2YO_API_KEY").ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    #[serde(default = "default_sweep_interval", deserialize_with = "duration_str")]
    pub sweep_interval: Duration,
    #[serde(
        default = "default_refresh_interval",
        deserialize_with = "duration_str"
    )]
    pub refresh_interval: Duration,
    #[serde(
        default = "default_broadcast_interval",
        deserialize_with = "duration_str"
    )]
    pub broadcast_interval: Duration,
    #[serde(default = "default_sweep_parallel")]
    pub sweep_parallel: usize,
    #[serde(default = "default_refresh_parallel")]
    pub refresh_parallel: usize,
    #[serde(default = "default_sweep_pause", deserialize_with = "duration_str")]
    pub sweep_pause: Duration,
    #[serde(default = "default_refresh_pause", deserialize_with = "duration_str")]
    pub refresh_pause: Duration,
    /// Seconds of positions requested per refresh fetch.
    #[serde(default = "default_position_window")]
    pub position_window: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreeningConfig {
    #[serde(default = "default_threshold_km")]
    pub threshold_km: f64,
    #[serde(default = "default_leo_max_alt_km")]
    pub leo_max_alt_km: f64,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_radius_km() -> u32 {
    5000
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Six strategic seed points: three equatorial, three northern.
fn default_regions() -> Vec<Region> {
    vec![
        Region { lat: 0.0, lng: 0.0 },
        Region {
            lat: 0.0,
            lng: 120.0,
        },
        Region {
            lat: 0.0,
            lng: 240.0,
        },
        Region {
            lat: 45.0,
            lng: 60.0,
        },
        Region {
            lat: 45.0,
            lng: 180.0,
        },
        Region {
            lat: 45.0,
            lng: 300.0,
        },
    ]
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(90)
}

fn default_refresh_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_broadcast_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_sweep_parallel() -> usize {
    4
}

fn default_refresh_parallel() -> usize {
    50
}

fn default_sweep_pause() -> Duration {
    Duration::from_millis(500)
}

fn default_refresh_pause() -> Duration {
    Duration::from_millis(100)
}

fn default_position_window() -> u32 {
    60
}

fn default_threshold_km() -> f64 {
    5.0
}

fn default_leo_max_alt_km() -> f64 {
    2000.0
}

fn duration_str<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            frontend: None,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            radius_km: default_radius_km(),
            timeout: default_timeout(),
            regions: default_regions(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            sweep_interval: default_sweep_interval(),
            refresh_interval: default_refresh_interval(),
            broadcast_interval: default_broadcast_interval(),
            sweep_parallel: default_sweep_parallel(),
            refresh_parallel: default_refresh_parallel(),
            sweep_pause: default_sweep_pause(),
            refresh_pause: default_refresh_pause(),
            position_window: default_position_window(),
        }
    }
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            threshold_km: default_threshold_km(),
            leo_max_alt_km: default_leo_max_alt_km(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.upstream.regions.len(), 6);
        assert_eq!(config.poll.sweep_interval, Duration::from_secs(90));
        assert_eq!(config.poll.sweep_parallel, 4);
        assert_eq!(config.screening.threshold_km, 5.0);
        assert!(!config.demo);
    }

    #[test]
    fn humantime_durations_parse() {
        let yaml = r#"
poll:
  sweep_interval: 2m
  refresh_interval: 3s
  sweep_pause: 250ms
demo: true
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.poll.sweep_interval, Duration::from_secs(120));
        assert_eq!(config.poll.refresh_interval, Duration::from_secs(3));
        assert_eq!(config.poll.sweep_pause, Duration::from_millis(250));
        assert!(config.demo);
    }

    #[test]
    fn explicit_regions_override_defaults() {
        let yaml = r#"
upstream:
  api_key: abc123
  regions:
    - { lat: 10.0, lng: 20.0 }
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.upstream.regions.len(), 1);
        assert_eq!(config.upstream.regions[0].lat, 10.0);
        assert_eq!(config.upstream.api_key(), Some("abc123".to_string()));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_yaml::from_str::<Config>("nonsense: 1").is_err());
    }
}
