//! Listener that logs command invocations and answers command failures.
//!
//! Known failures get a canned reply in the channel (or nothing at all),
//! everything else is logged and reported to the bot owner in a direct
//! message.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::Utc;
use log::debug;
use log::error;
use log::info;
use uuid::Uuid;

use crate::bot::Error;
use crate::bot::context::InvocationContext;
use crate::bot::context::OwnerContact;
use crate::bot::failure::Cause;
use crate::bot::failure::CheckKind;
use crate::bot::failure::CommandFailure;
use crate::bot::failure::EventFailure;
use crate::bot::failure::FailureKind;
use crate::bot::failure::UserInputKind;

/// Discord rejects messages longer than this many characters.
pub const MESSAGE_LIMIT: usize = 2000;

/// Longest invocation text quoted back to the owner.
const TRIGGER_LIMIT: usize = 300;

/// How a failure was dealt with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handling {
    Suppressed,
    Replied,
    EscalatedToOwner,
}

pub struct EventCog {
    owner: Arc<dyn OwnerContact>,
}

impl EventCog {
    pub fn new(owner: Arc<dyn OwnerContact>) -> Self {
        Self { owner }
    }

    /// Called before a prefix command runs.
    pub fn on_command(&self, ctx: &dyn InvocationContext) {
        info!(
            "Command received: @{} triggered '{}' in #{} of '{}' with '{}'",
            ctx.author(),
            ctx.command_name(),
            ctx.channel(),
            guild_label(ctx),
            ctx.message_content()
        );
    }

    /// Called before a slash command runs.
    pub fn on_slash_command(&self, ctx: &dyn InvocationContext) {
        info!(
            "Slash command received: @{} triggered '{}' in #{} of '{}'",
            ctx.author(),
            ctx.command_name(),
            ctx.channel(),
            guild_label(ctx)
        );
    }

    /// Logs an invocation in the form matching how it was triggered.
    pub fn on_invocation(&self, ctx: &dyn InvocationContext) {
        if ctx.is_slash_command() {
            self.on_slash_command(ctx);
        } else {
            self.on_command(ctx);
        }
    }

    /// Answers a command the framework refused before it ran.
    ///
    /// The pre-command hook never fires for these, so the invocation is logged
    /// here before the failure.
    pub async fn on_command_rejected(
        &self,
        ctx: &dyn InvocationContext,
        failure: CommandFailure,
    ) -> Result<Handling, Error> {
        self.on_invocation(ctx);
        self.on_command_error(ctx, failure).await
    }

    /// Answers a failed command.
    ///
    /// Errors from sending the answer (or from notifying the owner) are
    /// returned to the caller untouched.
    pub async fn on_command_error(
        &self,
        ctx: &dyn InvocationContext,
        failure: CommandFailure,
    ) -> Result<Handling, Error> {
        let command = ctx.command_name();
        info!("Handling exception in command {}: {}", command, failure);

        if ctx.has_local_error_handler() || ctx.group_has_error_handler() {
            return Ok(Handling::Suppressed);
        }

        let cause = failure.into_cause();
        match &cause.kind {
            FailureKind::CommandNotFound => {
                info!("Ignoring exception: {}", cause.detail);
                Ok(Handling::Suppressed)
            }
            FailureKind::UserInput(UserInputKind::MissingArgument { param }) => {
                ctx.reply(&format!("Missing arguments: {}", param)).await?;
                Ok(Handling::Replied)
            }
            FailureKind::UserInput(UserInputKind::Other) => {
                ctx.reply(&format!("Bad argument(s), error details: `{}`", cause.detail))
                    .await?;
                ctx.send_help().await?;
                Ok(Handling::Replied)
            }
            FailureKind::Check(CheckKind::MissingRole { role }) => {
                ctx.reply(&format!(
                    "You require the role {} to run this command.",
                    role
                ))
                .await?;
                Ok(Handling::Replied)
            }
            FailureKind::Check(CheckKind::NotOwner) => Ok(Handling::Suppressed),
            FailureKind::Check(CheckKind::Other) => {
                ctx.reply(&format!("A pre-command check failed: `{}`", cause.detail))
                    .await?;
                Ok(Handling::Replied)
            }
            FailureKind::Disabled => {
                ctx.reply(&format!("{} has been disabled.", command)).await?;
                Ok(Handling::Replied)
            }
            FailureKind::NoPrivateMessage => {
                let text = format!("{} can not be used in Private Messages.", command);
                match ctx.reply_to_author(&text).await {
                    Ok(()) => Ok(Handling::Replied),
                    Err(e) => {
                        debug!("Could not message @{} privately: {}", ctx.author(), e);
                        Ok(Handling::Suppressed)
                    }
                }
            }
            FailureKind::Unclassified => self.escalate(ctx, &command, &cause).await,
        }
    }

    /// Reports a failure raised outside of any command to the owner.
    pub async fn on_error(&self, failure: EventFailure) -> Result<Handling, Error> {
        let trace = failure.trace();
        error!(
            "Error detected, event is '{}', args is '{:?}', kwargs is '{:?}'\n{}",
            failure.event, failure.args, failure.kwargs, trace
        );

        let header = format!("Error detected at `{}`:", timestamp());
        let footer = format!(
            "The event associated with this error was `{}`",
            failure.event
        );
        self.owner
            .send(&compose_report(&header, &trace, &footer))
            .await?;
        Ok(Handling::EscalatedToOwner)
    }

    async fn escalate(
        &self,
        ctx: &dyn InvocationContext,
        command: &str,
        cause: &Cause,
    ) -> Result<Handling, Error> {
        let reference = Uuid::new_v4();
        error!(
            "Ignoring unhandled exception in {} (ref {}):\n{}",
            command, reference, cause.trace
        );

        let header = format!(
            "Exception unhandled in `{}` at `{}` (ref `{}`):",
            command,
            timestamp(),
            reference
        );
        let content = ctx.message_content();
        let footer = format!(
            "This was triggered by `{}`",
            truncate(&content, TRIGGER_LIMIT)
        );
        self.owner
            .send(&compose_report(&header, &cause.trace, &footer))
            .await?;
        Ok(Handling::EscalatedToOwner)
    }
}

fn guild_label(ctx: &dyn InvocationContext) -> String {
    ctx.guild().unwrap_or_else(|| "Direct Message".to_string())
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f UTC").to_string()
}

/// Builds an owner report with the trace in a code block, shortening the trace
/// so the whole message fits in [`MESSAGE_LIMIT`].
fn compose_report(header: &str, trace: &str, footer: &str) -> String {
    const FENCE_OPEN: &str = "```\n";
    const FENCE_CLOSE: &str = "```";

    let frame = header.chars().count()
        + footer.chars().count()
        + FENCE_OPEN.len()
        + FENCE_CLOSE.len();
    let budget = MESSAGE_LIMIT.saturating_sub(frame);
    format!(
        "{}{}{}{}{}",
        header,
        FENCE_OPEN,
        truncate(trace, budget),
        FENCE_CLOSE,
        footer
    )
}

fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    const ELLIPSIS: &str = "...";

    if text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    if max_chars >= ELLIPSIS.len() {
        out.push_str(ELLIPSIS);
    }
    Cow::Owned(out)
}
