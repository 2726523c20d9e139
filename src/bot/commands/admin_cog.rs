//! Commands for server admins and the bot owner.

use poise::Command;

use crate::bot::Context;
use crate::bot::Data;
use crate::bot::Error;
use crate::bot::checks::require_admin_role;
use crate::bot::commands::Cog;

pub struct AdminCog;

impl AdminCog {
    /// List the commands disabled by configuration
    #[poise::command(
        prefix_command,
        slash_command,
        guild_only,
        check = "require_admin_role"
    )]
    pub async fn disabled(ctx: Context<'_>) -> Result<(), Error> {
        let disabled = &ctx.data().config.disabled_commands;
        let message = if disabled.is_empty() {
            "No commands are disabled.".to_string()
        } else {
            let names: Vec<String> = disabled.iter().map(|name| format!("`{}`", name)).collect();
            format!("Disabled commands: {}", names.join(", "))
        };

        ctx.reply(message).await?;
        Ok(())
    }

    /// Register application commands (owner only)
    #[poise::command(prefix_command, owners_only, hide_in_help)]
    pub async fn register(ctx: Context<'_>) -> Result<(), Error> {
        poise::builtins::register_application_commands_buttons(ctx).await?;
        Ok(())
    }
}

impl Cog for AdminCog {
    fn commands(&self) -> Vec<Command<Data, Error>> {
        vec![Self::disabled(), Self::register()]
    }
}
