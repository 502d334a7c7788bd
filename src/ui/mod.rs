//! # MQTT Client User Interface
//!
//! Single-screen eframe/egui front-end over the connection core. The layout
//! mirrors a classic debugging client: connection settings on top, a publish
//! form below it, and a scrolling message log filling the rest of the window.
//!
//! ## Backend Communication
//!
//! The UI holds one [`ConnectionController`] clone and the receiving half of
//! the UI event channel. Button handlers call straight into the controller
//! (all of its operations are non-blocking), and every frame starts by
//! draining the event channel into local state. The background network task
//! never touches the UI directly - status text and log lines arrive here as
//! [`UiEvent`] values and are rendered on the next frame, so all egui access
//! stays on the UI thread.
//!
//! ## State Ownership
//!
//! The UI owns only presentation state: the text field contents, the last
//! status line, and the accumulated log. Connection state is read from the
//! controller snapshot where needed (status indicator, shutdown hook); the
//! controller stays the single authority on the session lifecycle.

pub mod common;

use eframe::egui::{self, Button, RichText, ScrollArea, TextEdit, Vec2};
use eframe::glow;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::AppConfig;
use crate::mqtt::controller::{ConnectionController, ConnectionState};
use crate::mqtt::events::{LogEntry, OutboundMessage, UiEvent};
use crate::mqtt::config::ConnectionConfig;

use self::common::{section_frame, UiColors};

pub struct MqttViewApp {
    controller: ConnectionController,
    events: mpsc::Receiver<UiEvent>,

    // Connection form
    broker: String,
    port: String,
    topic: String,

    // Publish form
    publish_topic: String,
    message: String,

    // Presentation state fed by the event channel
    status: String,
    log: Vec<LogEntry>,
}

impl MqttViewApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        controller: ConnectionController,
        events: mpsc::Receiver<UiEvent>,
        defaults: AppConfig,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        MqttViewApp {
            controller,
            events,
            broker: defaults.broker,
            port: defaults.port.to_string(),
            topic: defaults.topic,
            publish_topic: defaults.publish_topic,
            message: String::new(),
            status: "Not connected".to_string(),
            log: vec![LogEntry::now("Not connected")],
        }
    }

    /// Moves pending backend updates into presentation state.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                UiEvent::Status(text) => self.status = text,
                UiEvent::Log(entry) => self.log.push(entry),
            }
        }
    }

    fn connection_section(&mut self, ui: &mut egui::Ui) {
        section_frame().show(ui, |ui| {
            ui.label(RichText::new("Connection Settings").color(UiColors::ACCENT));

            ui.horizontal(|ui| {
                ui.label(RichText::new("Broker:").color(UiColors::TEXT));
                ui.add(
                    TextEdit::singleline(&mut self.broker)
                        .desired_width(280.0)
                        .text_color(UiColors::LOG_FG),
                );
                ui.label(RichText::new("Port:").color(UiColors::TEXT));
                ui.add(
                    TextEdit::singleline(&mut self.port)
                        .desired_width(60.0)
                        .text_color(UiColors::LOG_FG),
                );
            });

            ui.horizontal(|ui| {
                ui.label(RichText::new("Topic:").color(UiColors::TEXT));
                ui.add(
                    TextEdit::singleline(&mut self.topic)
                        .desired_width(360.0)
                        .text_color(UiColors::LOG_FG),
                );
            });

            ui.horizontal(|ui| {
                let connect = Button::new(RichText::new("Connect").color(egui::Color32::BLACK))
                    .fill(UiColors::CONNECT)
                    .min_size(Vec2::new(110.0, 24.0));
                let disconnect =
                    Button::new(RichText::new("Disconnect").color(egui::Color32::WHITE))
                        .fill(UiColors::DISCONNECT)
                        .min_size(Vec2::new(110.0, 24.0));

                if ui.add(connect).clicked() {
                    self.controller.connect(&ConnectionConfig::new(
                        self.broker.clone(),
                        self.port.clone(),
                        self.topic.clone(),
                    ));
                }
                if ui.add(disconnect).clicked() {
                    self.controller.disconnect();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let dot_color = match self.controller.state() {
                        ConnectionState::Connected => UiColors::CONNECT,
                        _ => UiColors::DISCONNECT,
                    };
                    ui.colored_label(dot_color, "\u{2B24}");
                    ui.colored_label(UiColors::ACCENT, &self.status);
                });
            });
        });
    }

    fn publish_section(&mut self, ui: &mut egui::Ui) {
        section_frame().show(ui, |ui| {
            ui.label(RichText::new("Publish Message").color(UiColors::ACCENT));

            ui.horizontal(|ui| {
                ui.label(RichText::new("Publish Topic:").color(UiColors::TEXT));
                ui.add(
                    TextEdit::singleline(&mut self.publish_topic)
                        .desired_width(320.0)
                        .text_color(UiColors::LOG_FG),
                );
            });

            ui.horizontal(|ui| {
                ui.label(RichText::new("Message:").color(UiColors::TEXT));
                ui.add(
                    TextEdit::singleline(&mut self.message)
                        .desired_width(320.0)
                        .text_color(UiColors::LOG_FG),
                );

                let publish = Button::new(RichText::new("Publish").color(egui::Color32::BLACK))
                    .fill(UiColors::ACCENT)
                    .min_size(Vec2::new(110.0, 24.0));
                if ui.add(publish).clicked() {
                    self.controller.publish(&OutboundMessage {
                        topic: self.publish_topic.trim().to_string(),
                        payload: self.message.trim().to_string(),
                    });
                }
            });
        });
    }

    fn log_section(&mut self, ui: &mut egui::Ui) {
        section_frame().show(ui, |ui| {
            ui.label(RichText::new("Message Log").color(UiColors::ACCENT));

            egui::Frame::new()
                .fill(UiColors::ENTRY_BG)
                .inner_margin(4)
                .show(ui, |ui| {
                    ui.set_min_size(ui.available_size());
                    ScrollArea::vertical()
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in &self.log {
                                ui.label(
                                    RichText::new(entry.render())
                                        .monospace()
                                        .color(UiColors::LOG_FG),
                                );
                            }
                        });
                });
        });
    }
}

impl eframe::App for MqttViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(UiColors::MAIN_BG).inner_margin(12))
            .show(ctx, |ui| {
                ui.ctx().request_repaint_after(Duration::from_millis(33));
                self.connection_section(ui);
                self.publish_section(ui);
                self.log_section(ui);
            });
    }

    /// Closes the session cleanly when the window is closed with a live link.
    fn on_exit(&mut self, _gl: Option<&glow::Context>) {
        match self.controller.state() {
            ConnectionState::Connecting | ConnectionState::Connected => {
                info!("Window closing with live connection, disconnecting");
                self.controller.disconnect();
            }
            _ => {}
        }
    }
}
