use crate::bot::failure::CheckKind;
use crate::bot::failure::FailureKind;
use crate::bot::failure::UserInputKind;

/// Errors raised by commands and checks that the event cog knows how to
/// answer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BotError {
    #[error("Invalid argument for {parameter}: {reason}")]
    InvalidCommandArgument { parameter: String, reason: String },

    #[error("{param} is a required argument that is missing.")]
    MissingArgument { param: String },

    #[error("Role {role} is required to run this command.")]
    MissingRole { role: String },

    #[error("You do not own this bot.")]
    NotOwner,

    #[error("{0}")]
    CheckFailed(String),

    #[error("Command {command} is disabled.")]
    CommandDisabled { command: String },

    #[error("This command cannot be used in private messages.")]
    GuildOnlyCommand,

    #[error("Command \"{name}\" is not found")]
    CommandNotFound { name: String },
}

impl BotError {
    /// The failure category this error is answered as.
    pub fn kind(&self) -> FailureKind {
        match self {
            BotError::InvalidCommandArgument { .. } => FailureKind::UserInput(UserInputKind::Other),
            BotError::MissingArgument { param } => {
                FailureKind::UserInput(UserInputKind::MissingArgument {
                    param: param.clone(),
                })
            }
            BotError::MissingRole { role } => {
                FailureKind::Check(CheckKind::MissingRole { role: role.clone() })
            }
            BotError::NotOwner => FailureKind::Check(CheckKind::NotOwner),
            BotError::CheckFailed(_) => FailureKind::Check(CheckKind::Other),
            BotError::CommandDisabled { .. } => FailureKind::Disabled,
            BotError::GuildOnlyCommand => FailureKind::NoPrivateMessage,
            BotError::CommandNotFound { .. } => FailureKind::CommandNotFound,
        }
    }
}
