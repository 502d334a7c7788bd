pub mod config;
pub mod mqtt;
pub mod ui;

use crate::config::AppConfig;
use crate::mqtt::controller::ConnectionController;
use crate::mqtt::events::EventSink;
use crate::ui::MqttViewApp;
use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let defaults = AppConfig::load();

    // The UI drains this channel each frame; the connection core and its
    // background task only ever write into it.
    let (event_tx, event_rx) = mpsc::channel(100);
    let controller = ConnectionController::new(
        EventSink::new(event_tx),
        tokio::runtime::Handle::current(),
    );

    info!("Starting UI");
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title("MQTT Client")
        .with_inner_size(egui::vec2(800.0, 500.0));

    eframe::run_native(
        "MQTT Client",
        native_options,
        Box::new(|cc| Ok(Box::new(MqttViewApp::new(cc, controller, event_rx, defaults)))),
    )
    .map_err(|e| eyre!("Failed to run UI: {e}"))?;

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
