use chrono::NaiveDateTime;
use std::fmt;
use tokio::sync::mpsc;
use tracing::warn;

/// A single timestamped line in the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub text: String,
}

impl LogEntry {
    pub fn now(text: impl Into<String>) -> Self {
        LogEntry {
            timestamp: chrono::Local::now().naive_local(),
            text: text.into(),
        }
    }

    pub fn render(&self) -> String {
        format!("{} {}", self.timestamp.format("[%Y-%m-%d %H:%M:%S]"), self.text)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// A message composed by the user, alive only for the duration of a publish call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: String,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Status(String),
    Log(LogEntry),
}

/// Sending half of the UI update channel.
///
/// The connection controller and its background task report everything through
/// this handle; the UI owns the receiver and drains it on its own frame loop.
/// Sends are fire-and-forget: a full or closed channel drops the update with a
/// warning instead of blocking the sender.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<UiEvent>,
}

impl EventSink {
    pub fn new(tx: mpsc::Sender<UiEvent>) -> Self {
        EventSink { tx }
    }

    pub fn set_status(&self, text: impl Into<String>) {
        self.send(UiEvent::Status(text.into()));
    }

    pub fn append_log(&self, text: impl Into<String>) {
        self.send(UiEvent::Log(LogEntry::now(text)));
    }

    fn send(&self, event: UiEvent) {
        if let Err(e) = self.tx.try_send(event) {
            warn!("Dropping UI update: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_entry_renders_bracketed_timestamp() {
        let entry = LogEntry::now("Connected to MQTT broker");
        let rendered = entry.render();
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with("] Connected to MQTT broker"));
    }

    #[tokio::test]
    async fn sink_delivers_status_and_log_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let sink = EventSink::new(tx);

        sink.set_status("🔌 Connecting...");
        sink.append_log("Connected to MQTT broker");

        assert_eq!(
            rx.try_recv().unwrap(),
            UiEvent::Status("🔌 Connecting...".to_string())
        );
        match rx.try_recv().unwrap() {
            UiEvent::Log(entry) => assert_eq!(entry.text, "Connected to MQTT broker"),
            other => panic!("expected log entry, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let (tx, _rx) = mpsc::channel(1);
        let sink = EventSink::new(tx);

        sink.set_status("first");
        // Channel is full now; this must not block or panic.
        sink.set_status("second");
    }
}
