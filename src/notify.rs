//! This module provides the transport announcements are delivered through.

use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use crate::StdResult;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The channel doesn't exist or the bot can't post in it. Sending again
    /// won't help until the destination is reconfigured.
    #[error("Channel {0} is invalid or inaccessible")]
    InvalidChannel(i64),
    #[error("Send failed: {0}")]
    Transient(String),
}

impl DeliveryError {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::InvalidChannel(_))
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, channel_id: i64, content: &str) -> StdResult<(), DeliveryError>;
}

/// Posts announcements as plain Discord messages.
pub struct DiscordNotifier {
    http: Arc<serenity::Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn deliver(&self, channel_id: i64, content: &str) -> StdResult<(), DeliveryError> {
        let id = u64::try_from(channel_id)
            .ok()
            .filter(|&id| id != 0)
            .ok_or(DeliveryError::InvalidChannel(channel_id))?;

        serenity::ChannelId::new(id)
            .say(&*self.http, content)
            .await
            .map(|_| ())
            .map_err(|err| classify(channel_id, err))
    }
}

fn classify(channel_id: i64, err: serenity::Error) -> DeliveryError {
    match &err {
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(res))
            if matches!(res.status_code.as_u16(), 403 | 404) =>
        {
            DeliveryError::InvalidChannel(channel_id)
        }
        _ => DeliveryError::Transient(err.to_string()),
    }
}
