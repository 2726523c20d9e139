//! Discord bot setup and framework wiring.

pub mod checks;
pub mod commands;
pub mod context;
pub mod error;
pub mod error_handler;
pub mod event_cog;
pub mod failure;
pub mod invocation;
pub mod owner;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use anyhow::Result;
use anyhow::anyhow;
use log::error;
use log::info;
use poise::Framework;
use poise::FrameworkOptions;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::ClientBuilder;
use poise::serenity_prelude::GatewayIntents;
use poise::serenity_prelude::Http;
use poise::serenity_prelude::UserId;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

use crate::bot::commands::Cog;
use crate::bot::commands::Cogs;
use crate::bot::error::BotError;
use crate::bot::error_handler::ErrorHandler;
use crate::bot::event_cog::EventCog;
use crate::bot::invocation::PoiseInvocation;
use crate::bot::owner::DiscordOwner;
use crate::config::Config;

/// Data shared across bot commands and contexts.
pub struct Data {
    pub config: Arc<Config>,
    pub cog: EventCog,
    pub start_time: Instant,
}

/// Discord bot client and framework.
pub struct Bot {
    client_builder: Option<ClientBuilder>,
}

impl Bot {
    /// Creates a new bot with the event cog reporting to the configured owner.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        info!("Initializing bot...");

        let http = Arc::new(Http::new(&config.discord_token));
        let owner = Arc::new(DiscordOwner::new(http, UserId::new(config.owner_id)));
        let data = Data {
            config: config.clone(),
            cog: EventCog::new(owner),
            start_time: Instant::now(),
        };

        let framework = Self::create_framework(&config, data);
        let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
        let client_builder = ClientBuilder::new(&config.discord_token, intents).framework(framework);

        Ok(Self {
            client_builder: Some(client_builder),
        })
    }

    /// Starts the bot client in a background task.
    pub fn start(&mut self) -> Result<()> {
        info!("Starting bot client...");
        let client_builder = self
            .client_builder
            .take()
            .ok_or_else(|| anyhow!("Bot client already started"))?;

        tokio::spawn(async move {
            info!("Connecting bot to Discord...");
            let mut client = match client_builder.await {
                Ok(client) => client,
                Err(e) => {
                    error!("Failed to build Discord client: {}", e);
                    return;
                }
            };

            if let Err(e) = client.start().await {
                error!("Bot client crashed: {}", e);
            }
        });

        info!("Bot client start initiated.");
        Ok(())
    }

    /// Creates the Poise framework with commands, hooks and configuration.
    fn create_framework(config: &Config, data: Data) -> Framework<Data, Error> {
        let cogs = Cogs;
        let options = FrameworkOptions::<Data, Error> {
            commands: cogs.commands(),
            on_error: |error| Box::pin(Self::on_error(error)),
            pre_command: |ctx| Box::pin(Self::pre_command(ctx)),
            command_check: Some(|ctx| Box::pin(Self::command_check(ctx))),
            event_handler: |ctx, event, framework, data| {
                Box::pin(Self::on_event(ctx, event, framework, data))
            },
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                edit_tracker: Some(Arc::new(poise::EditTracker::for_timespan(
                    Duration::from_secs(3600),
                ))),
                ..Default::default()
            },
            owners: HashSet::from([UserId::new(config.owner_id)]),
            ..Default::default()
        };

        poise::Framework::builder()
            .options(options)
            .setup(move |_ctx, ready, _framework| {
                Box::pin(async move {
                    info!("Logged in as {}.", ready.user.name);
                    Ok(data)
                })
            })
            .build()
    }

    /// Logs every invocation before the command runs.
    async fn pre_command(ctx: Context<'_>) {
        ctx.data().cog.on_invocation(&PoiseInvocation::new(ctx));
    }

    /// Rejects commands disabled by configuration.
    async fn command_check(ctx: Context<'_>) -> Result<bool, Error> {
        let command = &ctx.command().qualified_name;
        if ctx.data().config.is_disabled(command) {
            return Err(BotError::CommandDisabled {
                command: command.clone(),
            }
            .into());
        }
        Ok(true)
    }

    async fn on_event(
        _ctx: &serenity::Context,
        event: &serenity::FullEvent,
        _framework: poise::FrameworkContext<'_, Data, Error>,
        data: &Data,
    ) -> Result<(), Error> {
        if let serenity::FullEvent::Ready { data_about_bot } = event {
            info!(
                "{} is connected to {} guild(s), up in {:.2}s.",
                data_about_bot.user.name,
                data_about_bot.guilds.len(),
                data.start_time.elapsed().as_secs_f64()
            );
        }
        Ok(())
    }

    /// Handles framework errors by delegating to the error handler.
    async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
        ErrorHandler::handle(error).await;
    }
}
