//! Connection lifecycle state machine.
//!
//! [`ConnectionController`] owns at most one [`BrokerLink`] at a time and is
//! the only place that reads or writes the link slot. The GUI-facing calls
//! (`connect`, `disconnect`, `publish`) never block on the network: `connect`
//! spawns a background task that drives the rumqttc event loop for the
//! lifetime of the session, and everything that task observes comes back in
//! through the callback handlers below.
//!
//! Both disconnect paths (an explicit `disconnect()` and the event loop
//! terminating on its own) converge on the same "no link owned" state. Each
//! link carries an attempt id; a callback whose link no longer matches the
//! owned slot belongs to a superseded session and is discarded, so a late
//! disconnect event cannot contradict a user-initiated disconnect that
//! already happened.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rumqttc::{Event, EventLoop, Packet};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use super::config::ConnectionConfig;
use super::events::{EventSink, OutboundMessage};
use super::link::{return_code, BrokerLink};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Connected,
    Disconnected(DisconnectReason),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The user pressed Disconnect.
    UserRequested,
    /// The broker ended the session cleanly.
    Clean,
    /// The session ended without being asked to.
    Unexpected(String),
}

#[derive(Default)]
struct Inner {
    state: ConnectionState,
    link: Option<BrokerLink>,
    attempt: u64,
}

impl Inner {
    /// Whether `link` is still the owned one. False for callbacks arriving
    /// from a superseded connection attempt.
    fn owns(&self, link: &BrokerLink) -> bool {
        self.link
            .as_ref()
            .map(|owned| owned.attempt() == link.attempt())
            .unwrap_or(false)
    }
}

/// Single-connection MQTT front-end controller.
///
/// Cloning is cheap and shares the same state; one clone lives in the UI and
/// one in each background connection task. Nothing here returns errors to the
/// caller: every failure is reported through the [`EventSink`], and the
/// machine is reentrant, so any terminal state accepts a fresh `connect`.
#[derive(Clone)]
pub struct ConnectionController {
    inner: Arc<Mutex<Inner>>,
    sink: EventSink,
    runtime: Handle,
}

impl ConnectionController {
    pub fn new(sink: EventSink, runtime: Handle) -> Self {
        ConnectionController {
            inner: Arc::new(Mutex::new(Inner::default())),
            sink,
            runtime,
        }
    }

    /// Starts a connection attempt in the background and returns immediately.
    ///
    /// Rejected without side effects when a link is already owned or the
    /// config does not validate; in both cases only a status is emitted.
    pub fn connect(&self, config: &ConnectionConfig) {
        if let Some((link, event_loop)) = self.begin_attempt(config) {
            let controller = self.clone();
            self.runtime.spawn(async move {
                controller.run_link(link, event_loop).await;
            });
        }
    }

    /// Closes the current session, if any. Safe to call at any time; redundant
    /// calls only re-emit the disconnected status.
    pub fn disconnect(&self) {
        let mut inner = self.inner.lock();
        let Some(link) = inner.link.take() else {
            drop(inner);
            debug!("Disconnect requested with no active connection");
            self.sink.set_status("🔌 Disconnected");
            return;
        };
        inner.state = ConnectionState::Disconnected(DisconnectReason::UserRequested);
        drop(inner);

        // Best-effort close; the event loop notices the session ending, but
        // its callbacks now target a link that is no longer owned.
        link.close();
        info!("Disconnected on user request");
        self.sink.set_status("🔌 Disconnected");
        self.sink.append_log("Disconnected from MQTT broker");
    }

    /// Hands the message to the live link, fire-and-forget.
    pub fn publish(&self, msg: &OutboundMessage) {
        let link = {
            let inner = self.inner.lock();
            match inner.state {
                ConnectionState::Connected => inner.link.clone(),
                _ => None,
            }
        };
        let Some(link) = link else {
            self.sink.set_status("❌ Not connected");
            return;
        };

        if msg.payload.trim().is_empty() {
            self.sink.set_status("⚠️ Message empty");
            return;
        }

        match link.publish(&msg.topic, &msg.payload) {
            Ok(()) => {
                debug!(topic = %msg.topic, "Queued publish");
                self.sink
                    .append_log(format!("📤 Published: '{}' to '{}'", msg.payload, msg.topic));
            }
            Err(e) => {
                warn!("Publish failed: {}", e);
                self.sink.append_log(format!("Publish failed: {}", e));
            }
        }
    }

    /// Snapshot of the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.inner.lock().state.clone()
    }

    /// Guard, validation and link creation for one attempt, all under a single
    /// lock so two racing connect calls cannot both claim the slot.
    fn begin_attempt(&self, config: &ConnectionConfig) -> Option<(BrokerLink, EventLoop)> {
        let mut inner = self.inner.lock();

        if inner.link.is_some() {
            drop(inner);
            warn!("Connect requested while a connection is already active");
            self.sink.set_status("⚠️ Already connected");
            return None;
        }

        let endpoint = match config.validate() {
            Ok(endpoint) => endpoint,
            Err(e) => {
                drop(inner);
                warn!("Rejecting connect request: {}", e);
                self.sink.set_status(format!("❌ {}", e));
                return None;
            }
        };

        inner.attempt += 1;
        let (link, event_loop) = BrokerLink::open(endpoint, inner.attempt);
        inner.link = Some(link.clone());
        inner.state = ConnectionState::Connecting;
        drop(inner);

        info!(topic = %link.topic(), "Connecting to MQTT broker");
        self.sink.set_status("🔌 Connecting...");
        Some((link, event_loop))
    }

    /// Background task body: waits for the connect ack, then processes events
    /// until the session ends. Sole caller of the three handlers below.
    async fn run_link(self, link: BrokerLink, mut event_loop: EventLoop) {
        let ack = tokio::time::timeout(HANDSHAKE_TIMEOUT, async {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(ack))) => break Ok(ack.code),
                    Ok(_) => continue,
                    Err(e) => break Err(e),
                }
            }
        })
        .await;

        let session_up = match ack {
            Ok(Ok(code)) => self.on_connect_ack(&link, return_code(code)),
            Ok(Err(e)) => {
                self.fail_attempt(&link, e.to_string());
                false
            }
            Err(_) => {
                self.fail_attempt(
                    &link,
                    format!(
                        "no response from broker within {}s",
                        HANDSHAKE_TIMEOUT.as_secs()
                    ),
                );
                false
            }
        };
        if !session_up {
            return;
        }

        loop {
            match event_loop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    self.on_message(&link, &publish.payload);
                }
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    self.on_disconnect(&link, None);
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    self.on_disconnect(&link, Some(e.to_string()));
                    break;
                }
            }
        }
    }

    /// Connect ack arrived. Code 0 brings the session up and subscribes the
    /// configured topic; anything else leaves the session unusable.
    /// Returns whether the event loop should keep running.
    fn on_connect_ack(&self, link: &BrokerLink, code: u8) -> bool {
        let mut inner = self.inner.lock();
        if !inner.owns(link) {
            debug!("Discarding connect ack from superseded link");
            return false;
        }

        if code == 0 {
            inner.state = ConnectionState::Connected;
            drop(inner);

            info!("Connected to MQTT broker");
            self.sink.set_status("✅ Connected");
            self.sink.append_log("Connected to MQTT broker");

            match link.subscribe() {
                Ok(()) => {
                    self.sink
                        .append_log(format!("Subscribed to '{}'", link.topic()));
                }
                Err(e) => {
                    warn!("Subscribe failed: {}", e);
                    self.sink.append_log(format!("Subscribe failed: {}", e));
                }
            }
            true
        } else {
            inner.link = None;
            inner.state = ConnectionState::Failed(format!("connect refused (code {})", code));
            drop(inner);

            error!(code, "Broker refused connection");
            self.sink
                .set_status(format!("❌ Connect failed (code {})", code));
            self.sink.append_log(format!("Connection failed: {}", code));
            false
        }
    }

    /// Inbound message on a subscribed topic.
    fn on_message(&self, link: &BrokerLink, payload: &[u8]) {
        {
            let inner = self.inner.lock();
            if !inner.owns(link) {
                debug!("Discarding message from superseded link");
                return;
            }
        }
        let text = String::from_utf8_lossy(payload);
        debug!("Received message: {}", text);
        self.sink.append_log(format!("📨 {}", text));
    }

    /// The event loop ended. `error` is `None` for a clean session end.
    fn on_disconnect(&self, link: &BrokerLink, error: Option<String>) {
        let mut inner = self.inner.lock();
        if !inner.owns(link) {
            debug!("Discarding disconnect from superseded link");
            return;
        }
        inner.link = None;

        match error {
            None => {
                inner.state = ConnectionState::Disconnected(DisconnectReason::Clean);
                drop(inner);
                info!("Disconnected from MQTT broker");
                self.sink.set_status("🔌 Disconnected");
                self.sink.append_log("Disconnected from MQTT broker");
            }
            Some(e) => {
                inner.state =
                    ConnectionState::Disconnected(DisconnectReason::Unexpected(e.clone()));
                drop(inner);
                warn!("Disconnected unexpectedly: {}", e);
                self.sink.set_status("❌ Disconnected unexpectedly");
                self.sink.append_log(format!("Disconnected unexpectedly: {}", e));
            }
        }
    }

    /// Transport-level failure before the session came up.
    fn fail_attempt(&self, link: &BrokerLink, error: String) {
        let mut inner = self.inner.lock();
        if !inner.owns(link) {
            debug!("Discarding connect error from superseded link");
            return;
        }
        inner.link = None;
        inner.state = ConnectionState::Failed(error.clone());
        drop(inner);

        error!("Connection error: {}", error);
        self.sink.set_status("❌ Connection error");
        self.sink.append_log(format!("Connection error: {}", error));
    }
}
