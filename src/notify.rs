//! User-facing error messages (the storefront's toasts).

use tokio::sync::mpsc;
use tracing::warn;

/// Fire-and-forget sink for messages shown to the shopper.
pub trait NotificationSink: Send + Sync {
    fn report_error(&self, message: &str);
}

impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    fn report_error(&self, message: &str) {
        (**self).report_error(message);
    }
}

/// Reports messages as warnings on the `cart::notice` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn report_error(&self, message: &str) {
        warn!(target: "cart::notice", "{message}");
    }
}

/// Forwards messages to a receiver, e.g. a UI toast queue.
///
/// Messages are dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelNotifier {
    fn report_error(&self, message: &str) {
        let _ = self.sender.send(message.to_string());
    }
}
