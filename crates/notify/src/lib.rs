//! Completion callbacks for finished pool tasks.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable callback delivery
//! - `WebhookNotifier`, a one-shot JSON POST over `reqwest`
//! - `ChannelNotifier`, an in-process notifier that forwards payloads to a channel

pub mod channel;
pub mod traits;
pub mod webhook;

pub use channel::ChannelNotifier;
pub use traits::{CallbackPayload, Notifier, NotifyError};
pub use webhook::WebhookNotifier;
