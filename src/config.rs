//! Configuration for the point cloud recorder.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default capture window length in seconds.
pub const DEFAULT_DURATION_SECS: f64 = 20.0;

/// Default topic identifier to subscribe to.
pub const DEFAULT_TOPIC: &str = "/yrl_cloud";

/// Main configuration for the recorder.
///
/// Output paths default relative to the working directory; the config file
/// itself lives in the platform config directory. No environment variables
/// are consulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Length of the capture window
    #[serde(with = "duration_serde")]
    pub duration: Duration,

    /// Topic identifier passed to the source subscription
    pub topic: String,

    /// Destination of the intermediate capture record
    pub capture_output_path: PathBuf,

    /// Destination of the binary blob
    pub binary_output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs_f64(DEFAULT_DURATION_SECS),
            topic: DEFAULT_TOPIC.to_string(),
            capture_output_path: PathBuf::from("pointcloud_capture.json"),
            binary_output_path: PathBuf::from("points.bin"),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::Io(e.to_string()))?;
            let config: Config =
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pointcloud-recorder")
            .join("config.json")
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {e}"),
            ConfigError::Parse(e) => write!(f, "Parse error: {e}"),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde support for Duration as fractional seconds.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.duration, Duration::from_secs(20));
        assert_eq!(config.topic, "/yrl_cloud");
        assert_eq!(
            config.capture_output_path,
            PathBuf::from("pointcloud_capture.json")
        );
        assert_eq!(config.binary_output_path, PathBuf::from("points.bin"));
    }

    #[test]
    fn test_duration_round_trips_as_fractional_seconds() {
        let mut config = Config::default();
        config.duration = Duration::from_millis(2500);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("2.5"));

        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.duration, Duration::from_millis(2500));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let json = r#"{
            "duration": -1.0,
            "topic": "/yrl_cloud",
            "capture_output_path": "pointcloud_capture.json",
            "binary_output_path": "points.bin"
        }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }
}
