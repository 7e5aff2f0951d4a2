//! In-process notifier backed by an unbounded channel.

use tokio::sync::mpsc;

use crate::traits::{CallbackPayload, Notifier, NotifyError};

/// Forwards every callback to an `mpsc` receiver instead of the network.
///
/// Useful for embedding the pool in another process, and for observing
/// deliveries in tests.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<CallbackPayload>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CallbackPayload>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait::async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, payload: &CallbackPayload) -> Result<(), NotifyError> {
        self.tx.send(payload.clone()).map_err(|_| NotifyError::Closed)
    }

    fn channel_name(&self) -> &str {
        "channel"
    }
}
