use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const DEFAULT_BROKER: &str = "test.mosquitto.org";
pub const DEFAULT_PORT: u16 = 1883;
pub const DEFAULT_TOPIC: &str = "temp";

/// Startup defaults for the UI text fields.
///
/// Read once from `<config dir>/mqttview/config.toml` when present. This only
/// pre-fills the form; the connection core never reads it and a broken or
/// missing file just means the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub broker: String,
    pub port: u16,
    pub topic: String,
    pub publish_topic: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            broker: DEFAULT_BROKER.to_string(),
            port: DEFAULT_PORT,
            topic: DEFAULT_TOPIC.to_string(),
            publish_topic: DEFAULT_TOPIC.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            debug!("No config directory available, using defaults");
            return AppConfig::default();
        };

        match fs::read_to_string(&path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Unable to parse {}: {}", path.display(), e);
                    AppConfig::default()
                }
            },
            Err(_) => {
                debug!("No config file at {}, using defaults", path.display());
                AppConfig::default()
            }
        }
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mqttview").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_test_broker() {
        let config = AppConfig::default();
        assert_eq!(config.broker, "test.mosquitto.org");
        assert_eq!(config.port, 1883);
        assert_eq!(config.topic, "temp");
        assert_eq!(config.publish_topic, "temp");
    }

    #[test]
    fn partial_toml_falls_back_per_field() {
        let config: AppConfig = toml::from_str("broker = \"broker.local\"").unwrap();
        assert_eq!(config.broker, "broker.local");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.topic, DEFAULT_TOPIC);
    }

    #[test]
    fn full_toml_round_trips() {
        let config = AppConfig {
            broker: "broker.local".to_string(),
            port: 8883,
            topic: "sensors/out".to_string(),
            publish_topic: "sensors/in".to_string(),
        };
        let raw = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.port, 8883);
        assert_eq!(parsed.publish_topic, "sensors/in");
    }
}
