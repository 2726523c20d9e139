//! The bot owner as a direct-message recipient for escalated failures.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::CreateMessage;
use poise::serenity_prelude::Http;
use poise::serenity_prelude::UserId;

use crate::bot::context::OwnerContact;

/// Reaches the bot owner through Discord direct messages.
pub struct DiscordOwner {
    http: Arc<Http>,
    owner_id: UserId,
}

impl DiscordOwner {
    pub fn new(http: Arc<Http>, owner_id: UserId) -> Self {
        Self { http, owner_id }
    }
}

#[async_trait]
impl OwnerContact for DiscordOwner {
    async fn send(&self, text: &str) -> Result<(), serenity::Error> {
        self.owner_id
            .direct_message(&self.http, CreateMessage::new().content(text))
            .await?;
        info!("Sent error report to owner {}.", self.owner_id);
        Ok(())
    }
}
