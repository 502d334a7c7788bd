use thiserror::Error;

/// Raw connection parameters as entered in the UI.
///
/// Nothing here is trusted: the port is still a string and any field may be
/// blank. [`ConnectionConfig::validate`] produces the [`Endpoint`] the link
/// layer actually connects with, or a [`ConfigError`] describing the defect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub broker: String,
    pub port: String,
    pub topic: String,
}

/// Validated broker endpoint for one connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub topic: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Broker address required")]
    EmptyBroker,

    #[error("Topic required")]
    EmptyTopic,

    #[error("Invalid port '{0}'")]
    InvalidPort(String),
}

impl ConnectionConfig {
    pub fn new(
        broker: impl Into<String>,
        port: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        ConnectionConfig {
            broker: broker.into(),
            port: port.into(),
            topic: topic.into(),
        }
    }

    /// Checks all fields before any network activity happens.
    ///
    /// The port must parse as an integer in 1-65535; broker and topic must be
    /// non-empty after trimming.
    pub fn validate(&self) -> Result<Endpoint, ConfigError> {
        let host = self.broker.trim();
        if host.is_empty() {
            return Err(ConfigError::EmptyBroker);
        }

        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(ConfigError::EmptyTopic);
        }

        let raw_port = self.port.trim();
        let port = raw_port
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| ConfigError::InvalidPort(raw_port.to_string()))?;

        Ok(Endpoint {
            host: host.to_string(),
            port,
            topic: topic.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(broker: &str, port: &str, topic: &str) -> ConnectionConfig {
        ConnectionConfig::new(broker, port, topic)
    }

    #[test]
    fn accepts_valid_config() {
        let endpoint = config("test.mosquitto.org", "1883", "temp")
            .validate()
            .unwrap();
        assert_eq!(endpoint.host, "test.mosquitto.org");
        assert_eq!(endpoint.port, 1883);
        assert_eq!(endpoint.topic, "temp");
    }

    #[test]
    fn trims_whitespace_from_fields() {
        let endpoint = config("  broker.local ", " 1883 ", " temp ")
            .validate()
            .unwrap();
        assert_eq!(endpoint.host, "broker.local");
        assert_eq!(endpoint.topic, "temp");
    }

    #[test]
    fn rejects_empty_broker() {
        assert_eq!(
            config("   ", "1883", "temp").validate(),
            Err(ConfigError::EmptyBroker)
        );
    }

    #[test]
    fn rejects_empty_topic() {
        assert_eq!(
            config("broker.local", "1883", "").validate(),
            Err(ConfigError::EmptyTopic)
        );
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert_eq!(
            config("broker.local", "abc", "temp").validate(),
            Err(ConfigError::InvalidPort("abc".to_string()))
        );
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert_eq!(
            config("broker.local", "70000", "temp").validate(),
            Err(ConfigError::InvalidPort("70000".to_string()))
        );
    }

    #[test]
    fn rejects_port_zero() {
        assert_eq!(
            config("broker.local", "0", "temp").validate(),
            Err(ConfigError::InvalidPort("0".to_string()))
        );
    }
}
