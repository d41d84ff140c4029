//! Notifier implementations

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use crate::common::errors::{Result, WatchError};
use crate::common::traits::Notifier;
use crate::common::types::{OutboundMessage, OwnerId};

/// Writes alerts to the log
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, owner: &OwnerId, message: &str) -> Result<()> {
        info!(owner = %owner, "{}", message);
        Ok(())
    }
}

/// Forwards alerts over an mpsc channel to whatever delivers them
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::Sender<OutboundMessage>,
}

impl ChannelNotifier {
    pub fn new(sender: mpsc::Sender<OutboundMessage>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, owner: &OwnerId, message: &str) -> Result<()> {
        self.sender
            .send(OutboundMessage {
                owner_id: owner.clone(),
                text: message.to_string(),
            })
            .await
            .map_err(|e| WatchError::ChannelSend(e.to_string()))
    }
}
