//! Routes poise framework errors into the event cog.

use log::debug;
use log::error;
use poise::FrameworkError;
use tracing::Instrument;
use tracing::Span;
use tracing::info_span;

use crate::bot::Context;
use crate::bot::Data;
use crate::bot::Error;
use crate::bot::context::InvocationContext;
use crate::bot::event_cog::EventCog;
use crate::bot::failure::Cause;
use crate::bot::failure::CheckKind;
use crate::bot::failure::CommandFailure;
use crate::bot::failure::EventFailure;
use crate::bot::failure::FailureKind;
use crate::bot::failure::UserInputKind;
use crate::bot::invocation::InteractionInvocation;
use crate::bot::invocation::MessageInvocation;
use crate::bot::invocation::PoiseInvocation;

/// Translates framework errors and hands them to [`EventCog`].
pub struct ErrorHandler;

impl ErrorHandler {
    /// Handles a framework error. Failures while answering are only logged.
    pub async fn handle(error: FrameworkError<'_, Data, Error>) {
        if let Err(e) = Self::dispatch(error).await {
            error!("Error while handling error: {}", e);
        }
    }

    async fn dispatch(error: FrameworkError<'_, Data, Error>) -> Result<(), Error> {
        match error {
            FrameworkError::Command { error, ctx, .. } => {
                Self::command_failure(ctx, CommandFailure::Invoke { original: error }).await
            }
            FrameworkError::ArgumentParse { error, ctx, .. } => {
                let kind = if error.is::<poise::TooFewArguments>() {
                    Self::missing_parameter(ctx).map_or(UserInputKind::Other, |param| {
                        UserInputKind::MissingArgument { param }
                    })
                } else {
                    UserInputKind::Other
                };
                let failure = CommandFailure::raised(FailureKind::UserInput(kind), error.to_string());
                Self::command_failure(ctx, failure).await
            }
            FrameworkError::SubcommandRequired { ctx, .. } => {
                let subcommands: Vec<&str> = ctx
                    .command()
                    .subcommands
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect();
                let failure = CommandFailure::raised(
                    FailureKind::UserInput(UserInputKind::Other),
                    format!("A subcommand is required: {}", subcommands.join(", ")),
                );
                Self::rejected_command(ctx, failure).await
            }
            FrameworkError::CommandCheckFailed { error, ctx, .. } => {
                let failure = match error {
                    Some(error) => CommandFailure::Raised(Cause::from_error(&error)),
                    None => CommandFailure::raised(
                        FailureKind::Check(CheckKind::Other),
                        format!(
                            "The check functions for command {} failed.",
                            ctx.command().qualified_name
                        ),
                    ),
                };
                Self::rejected_command(ctx, failure).await
            }
            FrameworkError::CooldownHit {
                remaining_cooldown,
                ctx,
                ..
            } => {
                let failure = CommandFailure::raised(
                    FailureKind::Check(CheckKind::Other),
                    format!(
                        "You are on cooldown. Try again in {:.2}s",
                        remaining_cooldown.as_secs_f32()
                    ),
                );
                Self::rejected_command(ctx, failure).await
            }
            FrameworkError::MissingBotPermissions {
                missing_permissions,
                ctx,
                ..
            } => {
                let failure = CommandFailure::raised(
                    FailureKind::Check(CheckKind::Other),
                    format!(
                        "Bot requires {} permission(s) to run this command.",
                        missing_permissions
                    ),
                );
                Self::rejected_command(ctx, failure).await
            }
            FrameworkError::MissingUserPermissions {
                missing_permissions,
                ctx,
                ..
            } => {
                let detail = match missing_permissions {
                    Some(permissions) => format!(
                        "You are missing {} permission(s) to run this command.",
                        permissions
                    ),
                    None => "Your permissions could not be verified.".to_string(),
                };
                let failure =
                    CommandFailure::raised(FailureKind::Check(CheckKind::Other), detail);
                Self::rejected_command(ctx, failure).await
            }
            FrameworkError::NotAnOwner { ctx, .. } => {
                let failure = CommandFailure::raised(
                    FailureKind::Check(CheckKind::NotOwner),
                    "You do not own this bot.",
                );
                Self::rejected_command(ctx, failure).await
            }
            FrameworkError::GuildOnly { ctx, .. } => {
                let failure = CommandFailure::raised(
                    FailureKind::NoPrivateMessage,
                    "This command cannot be used in private messages.",
                );
                Self::rejected_command(ctx, failure).await
            }
            FrameworkError::DmOnly { ctx, .. } => {
                let failure = CommandFailure::raised(
                    FailureKind::Check(CheckKind::Other),
                    "This command can only be used in private messages.",
                );
                Self::rejected_command(ctx, failure).await
            }
            FrameworkError::NsfwOnly { ctx, .. } => {
                let failure = CommandFailure::raised(
                    FailureKind::Check(CheckKind::Other),
                    "This command can only be used in NSFW channels.",
                );
                Self::rejected_command(ctx, failure).await
            }
            FrameworkError::CommandPanic { payload, ctx, .. } => {
                let failure = CommandFailure::raised(
                    FailureKind::Unclassified,
                    format!(
                        "Command panicked: {}",
                        payload.as_deref().unwrap_or("<no payload>")
                    ),
                );
                Self::command_failure(ctx, failure).await
            }
            FrameworkError::CommandStructureMismatch {
                description, ctx, ..
            } => {
                let failure = CommandFailure::raised(
                    FailureKind::Unclassified,
                    format!("Command structure mismatch: {}", description),
                );
                Self::command_failure(poise::Context::Application(ctx), failure).await
            }
            FrameworkError::UnknownCommand {
                ctx,
                msg,
                msg_content,
                framework,
                ..
            } => {
                let invocation = MessageInvocation::new(ctx, msg, msg_content);
                let failure = not_found(&invocation.command_name());
                framework
                    .user_data
                    .cog
                    .on_command_error(&invocation, failure)
                    .await?;
                Ok(())
            }
            FrameworkError::UnknownInteraction {
                ctx,
                framework,
                interaction,
                ..
            } => {
                let invocation = InteractionInvocation::new(ctx, interaction);
                let failure = not_found(&invocation.command_name());
                framework
                    .user_data
                    .cog
                    .on_command_error(&invocation, failure)
                    .await?;
                Ok(())
            }
            FrameworkError::EventHandler {
                error,
                event,
                framework,
                ..
            } => {
                let failure =
                    EventFailure::new(event.snake_case_name(), error).arg(format!("{:?}", event));
                Self::event_failure(&framework.user_data.cog, failure).await
            }
            FrameworkError::DynamicPrefix { error, ctx, msg, .. } => {
                let failure = EventFailure::new("dynamic_prefix", error)
                    .arg(msg.content.clone())
                    .kwarg("channel_id", ctx.channel_id.to_string());
                Self::event_failure(&ctx.framework.user_data.cog, failure).await
            }
            FrameworkError::Setup { error, .. } => {
                // User data does not exist yet, so there is no cog to report through.
                error!("Framework setup failed: {}", error);
                Ok(())
            }
            other => {
                poise::builtins::on_error(other).await?;
                Ok(())
            }
        }
    }

    /// A failure raised while or after the command ran, so `pre_command`
    /// already logged the invocation.
    async fn command_failure(ctx: Context<'_>, failure: CommandFailure) -> Result<(), Error> {
        let invocation = PoiseInvocation::new(ctx);
        let handling = ctx
            .data()
            .cog
            .on_command_error(&invocation, failure)
            .instrument(failure_span(&invocation))
            .await?;
        debug!(
            "Failure in command `{}` handled: {:?}",
            ctx.command().qualified_name,
            handling
        );
        Ok(())
    }

    /// A failure raised by the framework's own gates (checks, permissions,
    /// cooldowns, guild and DM restrictions) before `pre_command` ran.
    async fn rejected_command(ctx: Context<'_>, failure: CommandFailure) -> Result<(), Error> {
        let invocation = PoiseInvocation::new(ctx);
        let handling = ctx
            .data()
            .cog
            .on_command_rejected(&invocation, failure)
            .instrument(failure_span(&invocation))
            .await?;
        debug!(
            "Rejected command `{}` handled: {:?}",
            ctx.command().qualified_name,
            handling
        );
        Ok(())
    }

    async fn event_failure(cog: &EventCog, failure: EventFailure) -> Result<(), Error> {
        let span = info_span!("event_failure", event = %failure.event);
        cog.on_error(failure).instrument(span).await?;
        Ok(())
    }

    /// The first required parameter the author left out of a prefix command.
    fn missing_parameter(ctx: Context<'_>) -> Option<String> {
        let args = match ctx {
            poise::Context::Prefix(prefix) => prefix.args,
            _ => "",
        };
        let parameters = ctx
            .command()
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.required));
        first_missing_parameter(parameters, args).map(str::to_string)
    }
}

/// Span wrapping everything logged while a command failure is handled.
fn failure_span(invocation: &dyn InvocationContext) -> Span {
    info_span!(
        "command_failure",
        command = %invocation.command_name(),
        author = %invocation.author()
    )
}

fn not_found(name: &str) -> CommandFailure {
    CommandFailure::raised(
        FailureKind::CommandNotFound,
        format!("Command \"{}\" is not found", name),
    )
}

fn first_missing_parameter<'a>(
    parameters: impl IntoIterator<Item = (&'a str, bool)>,
    args: &str,
) -> Option<&'a str> {
    let supplied = count_arguments(args);
    parameters
        .into_iter()
        .skip(supplied)
        .find(|(_, required)| *required)
        .map(|(name, _)| name)
}

/// Counts prefix arguments the way poise pops them: whitespace separated, a
/// double-quoted run (with `\"` escapes) is one argument, an unterminated
/// quote swallows the rest.
fn count_arguments(args: &str) -> usize {
    let mut count = 0;
    let mut rest = args.trim_start();
    while !rest.is_empty() {
        count += 1;
        rest = match rest.strip_prefix('"') {
            Some(quoted) => closing_quote(quoted).map_or("", |end| &quoted[end + 1..]),
            None => rest.find(char::is_whitespace).map_or("", |end| &rest[end..]),
        };
        rest = rest.trim_start();
    }
    count
}

/// Byte offset of the first unescaped `"` in `text`.
fn closing_quote(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::context::MockInvocationContext;

    #[test]
    fn test_first_missing_parameter_without_args() {
        let parameters = [("user", true), ("reason", false)];
        assert_eq!(first_missing_parameter(parameters, ""), Some("user"));
    }

    #[test]
    fn test_first_missing_parameter_skips_supplied() {
        let parameters = [("user", true), ("days", true), ("reason", false)];
        assert_eq!(
            first_missing_parameter(parameters, "@someone"),
            Some("days")
        );
    }

    #[test]
    fn test_first_missing_parameter_ignores_optional() {
        let parameters = [("user", true), ("reason", false)];
        assert_eq!(first_missing_parameter(parameters, "@someone"), None);
    }

    #[test]
    fn test_first_missing_parameter_quoted_argument_counts_once() {
        let parameters = [("user", true), ("reason", true)];
        assert_eq!(
            first_missing_parameter(parameters, "\"John Smith\""),
            Some("reason")
        );
        assert_eq!(
            first_missing_parameter(parameters, "\"John Smith\" spamming"),
            None
        );
    }

    #[test]
    fn test_count_arguments() {
        assert_eq!(count_arguments(""), 0);
        assert_eq!(count_arguments("   "), 0);
        assert_eq!(count_arguments("a  b\tc"), 3);
        assert_eq!(count_arguments("\"a b\" c"), 2);
        assert_eq!(count_arguments(r#""say \"hi\" now" later"#), 2);
        assert_eq!(count_arguments("\"never closed and more"), 1);
    }

    #[test]
    fn test_unknown_command_is_not_found() {
        let cause = not_found("stale").into_cause();
        assert_eq!(cause.kind, FailureKind::CommandNotFound);
        assert_eq!(cause.detail, "Command \"stale\" is not found");
    }

    #[test]
    fn test_failure_span_carries_command() {
        let mut ctx = MockInvocationContext::new();
        ctx.expect_command_name().return_const("ban".to_string());
        ctx.expect_author().return_const("alice".to_string());

        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let span = failure_span(&ctx);
            assert_eq!(span.metadata().map(|m| m.name()), Some("command_failure"));
            assert!(span.field("command").is_some());
            assert!(span.field("author").is_some());
        });
    }
}
