//! [`InvocationContext`] implementations backed by poise and serenity.

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::CreateInteractionResponse;
use poise::serenity_prelude::CreateInteractionResponseMessage;
use poise::serenity_prelude::CreateMessage;

use crate::bot::Context;
use crate::bot::context::InvocationContext;

/// A command invocation seen through poise.
pub struct PoiseInvocation<'a> {
    ctx: Context<'a>,
}

impl<'a> PoiseInvocation<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<'a> InvocationContext for PoiseInvocation<'a> {
    fn author(&self) -> String {
        self.ctx.author().name.clone()
    }

    fn channel(&self) -> String {
        let channel_id = self.ctx.channel_id();
        self.ctx
            .guild()
            .and_then(|guild| guild.channels.get(&channel_id).map(|c| c.name.clone()))
            .unwrap_or_else(|| channel_id.to_string())
    }

    fn guild(&self) -> Option<String> {
        let guild_id = self.ctx.guild_id()?;
        Some(
            self.ctx
                .guild()
                .map(|guild| guild.name.clone())
                .unwrap_or_else(|| guild_id.to_string()),
        )
    }

    fn command_name(&self) -> String {
        self.ctx.command().qualified_name.clone()
    }

    fn is_slash_command(&self) -> bool {
        matches!(self.ctx, poise::Context::Application(_))
    }

    fn message_content(&self) -> String {
        if let poise::Context::Prefix(prefix) = self.ctx {
            return prefix.msg.content.clone();
        }
        self.ctx.invocation_string()
    }

    fn has_local_error_handler(&self) -> bool {
        self.ctx.command().on_error.is_some()
    }

    fn group_has_error_handler(&self) -> bool {
        self.ctx
            .parent_commands()
            .iter()
            .any(|parent| parent.on_error.is_some())
    }

    async fn reply(&self, text: &str) -> Result<(), serenity::Error> {
        self.ctx.reply(text).await?;
        Ok(())
    }

    async fn send_help(&self) -> Result<(), serenity::Error> {
        let command = self.ctx.command().qualified_name.clone();
        poise::builtins::help(
            self.ctx,
            Some(&command),
            poise::builtins::HelpConfiguration::default(),
        )
        .await
    }

    async fn reply_to_author(&self, text: &str) -> Result<(), serenity::Error> {
        self.ctx
            .author()
            .direct_message(
                self.ctx.serenity_context(),
                CreateMessage::new().content(text),
            )
            .await?;
        Ok(())
    }
}

/// A message that looked like a command but matched none.
pub struct MessageInvocation<'a> {
    ctx: &'a serenity::Context,
    msg: &'a serenity::Message,
    command: String,
}

impl<'a> MessageInvocation<'a> {
    pub fn new(ctx: &'a serenity::Context, msg: &'a serenity::Message, msg_content: &str) -> Self {
        let command = msg_content
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        Self { ctx, msg, command }
    }
}

#[async_trait]
impl<'a> InvocationContext for MessageInvocation<'a> {
    fn author(&self) -> String {
        self.msg.author.name.clone()
    }

    fn channel(&self) -> String {
        self.msg
            .guild(&self.ctx.cache)
            .and_then(|guild| {
                guild
                    .channels
                    .get(&self.msg.channel_id)
                    .map(|c| c.name.clone())
            })
            .unwrap_or_else(|| self.msg.channel_id.to_string())
    }

    fn guild(&self) -> Option<String> {
        let guild_id = self.msg.guild_id?;
        Some(
            self.msg
                .guild(&self.ctx.cache)
                .map(|guild| guild.name.clone())
                .unwrap_or_else(|| guild_id.to_string()),
        )
    }

    fn command_name(&self) -> String {
        self.command.clone()
    }

    fn is_slash_command(&self) -> bool {
        false
    }

    fn message_content(&self) -> String {
        self.msg.content.clone()
    }

    fn has_local_error_handler(&self) -> bool {
        false
    }

    fn group_has_error_handler(&self) -> bool {
        false
    }

    async fn reply(&self, text: &str) -> Result<(), serenity::Error> {
        self.msg.reply(self.ctx, text).await?;
        Ok(())
    }

    async fn send_help(&self) -> Result<(), serenity::Error> {
        Ok(())
    }

    async fn reply_to_author(&self, text: &str) -> Result<(), serenity::Error> {
        self.msg
            .author
            .direct_message(self.ctx, CreateMessage::new().content(text))
            .await?;
        Ok(())
    }
}

/// A slash command interaction that matched no registered command, usually
/// one left over from a previous registration.
pub struct InteractionInvocation<'a> {
    ctx: &'a serenity::Context,
    interaction: &'a serenity::CommandInteraction,
}

impl<'a> InteractionInvocation<'a> {
    pub fn new(ctx: &'a serenity::Context, interaction: &'a serenity::CommandInteraction) -> Self {
        Self { ctx, interaction }
    }
}

#[async_trait]
impl<'a> InvocationContext for InteractionInvocation<'a> {
    fn author(&self) -> String {
        self.interaction.user.name.clone()
    }

    fn channel(&self) -> String {
        let channel_id = self.interaction.channel_id;
        self.interaction
            .guild_id
            .and_then(|guild_id| guild_id.to_guild_cached(&self.ctx.cache))
            .and_then(|guild| guild.channels.get(&channel_id).map(|c| c.name.clone()))
            .unwrap_or_else(|| channel_id.to_string())
    }

    fn guild(&self) -> Option<String> {
        let guild_id = self.interaction.guild_id?;
        Some(
            guild_id
                .to_guild_cached(&self.ctx.cache)
                .map(|guild| guild.name.clone())
                .unwrap_or_else(|| guild_id.to_string()),
        )
    }

    fn command_name(&self) -> String {
        self.interaction.data.name.clone()
    }

    fn is_slash_command(&self) -> bool {
        true
    }

    fn message_content(&self) -> String {
        format!("/{}", self.interaction.data.name)
    }

    fn has_local_error_handler(&self) -> bool {
        false
    }

    fn group_has_error_handler(&self) -> bool {
        false
    }

    async fn reply(&self, text: &str) -> Result<(), serenity::Error> {
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(text)
                .ephemeral(true),
        );
        self.interaction.create_response(self.ctx, response).await
    }

    async fn send_help(&self) -> Result<(), serenity::Error> {
        Ok(())
    }

    async fn reply_to_author(&self, text: &str) -> Result<(), serenity::Error> {
        self.interaction
            .user
            .direct_message(self.ctx, CreateMessage::new().content(text))
            .await?;
        Ok(())
    }
}
