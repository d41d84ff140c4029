//! Channel type definitions for outbound notifications

use tokio::sync::mpsc;

use super::types::OutboundMessage;

/// Default channel buffer size
pub const DEFAULT_CHANNEL_SIZE: usize = 256;

/// Create a new notification channel with the default buffer size
pub fn create_message_channel() -> (mpsc::Sender<OutboundMessage>, mpsc::Receiver<OutboundMessage>) {
    mpsc::channel(DEFAULT_CHANNEL_SIZE)
}

/// Create a new notification channel with a custom buffer size
pub fn create_message_channel_with_size(
    size: usize,
) -> (mpsc::Sender<OutboundMessage>, mpsc::Receiver<OutboundMessage>) {
    mpsc::channel(size)
}
