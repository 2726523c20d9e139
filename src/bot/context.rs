//! Collaborators the event cog talks to.
//!
//! The cog never touches poise or serenity types directly, it only sees an
//! [`InvocationContext`] for the command at hand and an [`OwnerContact`] for
//! escalations.

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

/// Read-only view of one command invocation plus the replies the cog may send
/// back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvocationContext: Send + Sync {
    fn author(&self) -> String;
    fn channel(&self) -> String;
    /// `None` in private messages.
    fn guild(&self) -> Option<String>;
    fn command_name(&self) -> String;
    fn is_slash_command(&self) -> bool;
    /// Raw message text for prefix commands, the rendered invocation for slash
    /// commands.
    fn message_content(&self) -> String;

    /// The command registered its own error handler.
    fn has_local_error_handler(&self) -> bool;
    /// A parent command group registered an error handler.
    fn group_has_error_handler(&self) -> bool;

    async fn reply(&self, text: &str) -> Result<(), serenity::Error>;
    async fn send_help(&self) -> Result<(), serenity::Error>;
    /// Sends `text` to the author in private messages.
    async fn reply_to_author(&self, text: &str) -> Result<(), serenity::Error>;
}

/// The bot owner, reachable through direct messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnerContact: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), serenity::Error>;
}
