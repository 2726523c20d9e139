//! General purpose commands.

use std::time::Instant;

use poise::Command;
use poise::CreateReply;
use poise::builtins::HelpConfiguration;

use crate::bot::Context;
use crate::bot::Data;
use crate::bot::Error;
use crate::bot::commands::Cog;

pub struct MetaCog;

impl MetaCog {
    /// Check that the bot is responsive
    #[poise::command(prefix_command, slash_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
        let start_time = Instant::now();
        let reply = ctx.say(":ping_pong: Pong!").await?;

        reply
            .edit(
                ctx,
                CreateReply::default().content(format!(
                    ":ping_pong: Pong! Took {}ms",
                    start_time.elapsed().as_millis()
                )),
            )
            .await?;

        Ok(())
    }

    /// Repeat a message back
    #[poise::command(prefix_command, slash_command)]
    pub async fn echo(
        ctx: Context<'_>,
        #[description = "Text to repeat"]
        #[rest]
        text: String,
    ) -> Result<(), Error> {
        ctx.say(text).await?;
        Ok(())
    }

    /// Show help for all commands or a single one
    #[poise::command(prefix_command, slash_command, track_edits)]
    pub async fn help(
        ctx: Context<'_>,
        #[description = "Command to show help for"]
        #[rest]
        command: Option<String>,
    ) -> Result<(), Error> {
        let extra_text_at_bottom = format!(
            "Type {}help <command> for more info on a command.",
            ctx.prefix()
        );
        poise::builtins::help(
            ctx,
            command.as_deref(),
            HelpConfiguration {
                extra_text_at_bottom: &extra_text_at_bottom,
                ..Default::default()
            },
        )
        .await?;
        Ok(())
    }
}

impl Cog for MetaCog {
    fn commands(&self) -> Vec<Command<Data, Error>> {
        vec![Self::ping(), Self::echo(), Self::help()]
    }
}
