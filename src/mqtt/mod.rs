//! # MQTT Connection Module
//!
//! Implements the single-connection MQTT client core: the connection state
//! machine, the background task that owns the live session, and the event
//! routing that turns broker callbacks into UI updates.
//!
//! ## Module Architecture
//!
//! ```text
//! mqtt/
//! ├── config.rs      - Connection parameters and validation
//! ├── events.rs      - UI update channel types (status, log, outbound message)
//! ├── link.rs        - Session adapter over the rumqttc client
//! └── controller.rs  - Connection state machine and callback handling
//! ```
//!
//! ## Design Philosophy
//!
//! - **One owner per session**: the controller holds at most one live link and
//!   every read or write of that slot goes through its lock
//! - **Non-blocking surface**: connect, disconnect and publish return
//!   immediately; the network runs on its own tokio task
//! - **Nothing raises to the caller**: failures are reported through the UI
//!   event channel, and every reconnect is an explicit, fresh connect

pub mod config;
pub mod controller;
pub mod events;
pub mod link;
