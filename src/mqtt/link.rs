use std::time::Duration;

use rumqttc::{AsyncClient, ConnectReturnCode, EventLoop, MqttOptions, QoS};
use thiserror::Error;
use tracing::debug;

use super::config::Endpoint;

const CLIENT_ID: &str = "mqttview";
const REQUEST_CAP: usize = 100;
const KEEP_ALIVE: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Subscribe error: {0}")]
    Subscribe(String),

    #[error("Publish error: {0}")]
    Publish(String),
}

/// One live broker session.
///
/// Wraps the rumqttc client handle together with the per-attempt context: the
/// topic to subscribe after the connect ack and the attempt id that identifies
/// this link against callbacks from superseded ones. A fresh link is opened
/// for every connect attempt and never reused.
#[derive(Clone)]
pub struct BrokerLink {
    client: AsyncClient,
    topic: String,
    attempt: u64,
}

impl BrokerLink {
    /// Builds the session handle and its event loop. No network activity
    /// happens until the event loop is polled.
    pub fn open(endpoint: Endpoint, attempt: u64) -> (Self, EventLoop) {
        let mut options = MqttOptions::new(CLIENT_ID, endpoint.host, endpoint.port);
        options.set_keep_alive(KEEP_ALIVE);

        let (client, event_loop) = AsyncClient::new(options, REQUEST_CAP);

        let link = BrokerLink {
            client,
            topic: endpoint.topic,
            attempt,
        };
        (link, event_loop)
    }

    /// Queues a subscribe request for the configured topic.
    pub fn subscribe(&self) -> Result<(), LinkError> {
        self.client
            .try_subscribe(&self.topic, QoS::AtMostOnce)
            .map_err(|e| LinkError::Subscribe(e.to_string()))
    }

    /// Queues a publish without waiting for any acknowledgment.
    pub fn publish(&self, topic: &str, payload: &str) -> Result<(), LinkError> {
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload)
            .map_err(|e| LinkError::Publish(e.to_string()))
    }

    /// Requests a clean session close. Best-effort: a failed close still ends
    /// with the link dropped, so the error is only logged.
    pub fn close(&self) {
        if let Err(e) = self.client.try_disconnect() {
            debug!("Ignoring error from session close: {}", e);
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }
}

/// Numeric MQTT connect return code, kept verbatim for diagnostics.
pub fn return_code(code: ConnectReturnCode) -> u8 {
    match code {
        ConnectReturnCode::Success => 0,
        ConnectReturnCode::RefusedProtocolVersion => 1,
        ConnectReturnCode::BadClientId => 2,
        ConnectReturnCode::ServiceUnavailable => 3,
        ConnectReturnCode::BadUserNamePassword => 4,
        ConnectReturnCode::NotAuthorized => 5,
    }
}
