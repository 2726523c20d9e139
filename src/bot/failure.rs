//! Tagged failures handed to the event cog.

use std::backtrace::Backtrace;
use std::backtrace::BacktraceStatus;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write;

use crate::bot::Error;
use crate::bot::error::BotError;

/// Category of a failed command, in the order the event cog checks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    CommandNotFound,
    UserInput(UserInputKind),
    Check(CheckKind),
    Disabled,
    NoPrivateMessage,
    Unclassified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInputKind {
    MissingArgument { param: String },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKind {
    MissingRole { role: String },
    NotOwner,
    Other,
}

/// The underlying cause of a command failure.
#[derive(Debug)]
pub struct Cause {
    pub kind: FailureKind,
    pub detail: String,
    pub trace: String,
}

impl Cause {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let trace = format!("Error: {}{}", detail, capture_backtrace());
        Self {
            kind,
            detail,
            trace,
        }
    }

    /// Classifies an error returned from a command body or a check.
    ///
    /// Only [`BotError`] carries a known category, everything else is
    /// unclassified.
    pub fn from_error(error: &Error) -> Self {
        let kind = error
            .downcast_ref::<BotError>()
            .map_or(FailureKind::Unclassified, BotError::kind);
        Self {
            kind,
            detail: error.to_string(),
            trace: format_trace(&**error),
        }
    }
}

/// A failure reported for one command invocation.
#[derive(Debug)]
pub enum CommandFailure {
    /// The command body returned an error.
    Invoke { original: Error },
    /// The framework refused to run the command.
    Raised(Cause),
}

impl CommandFailure {
    pub fn raised(kind: FailureKind, detail: impl Into<String>) -> Self {
        CommandFailure::Raised(Cause::new(kind, detail))
    }

    /// Unwraps an invocation failure down to the error the command returned.
    pub fn into_cause(self) -> Cause {
        match self {
            CommandFailure::Invoke { original } => Cause::from_error(&original),
            CommandFailure::Raised(cause) => cause,
        }
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandFailure::Invoke { original } => {
                write!(f, "Command raised an exception: {}", original)
            }
            CommandFailure::Raised(cause) => f.write_str(&cause.detail),
        }
    }
}

/// A failure raised outside of a command, while handling a gateway event or
/// framework hook.
#[derive(Debug)]
pub struct EventFailure {
    pub event: String,
    pub args: Vec<String>,
    pub kwargs: BTreeMap<String, String>,
    pub error: Error,
}

impl EventFailure {
    pub fn new(event: impl Into<String>, error: Error) -> Self {
        Self {
            event: event.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
            error,
        }
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    pub fn trace(&self) -> String {
        format_trace(&*self.error)
    }
}

/// Formats an error with its source chain, followed by the current stack
/// backtrace when `RUST_BACKTRACE` enables capturing.
pub fn format_trace(error: &(dyn std::error::Error + 'static)) -> String {
    let mut out = format!("Error: {}", error);
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(out, "\nCaused by: {}", cause);
        source = cause.source();
    }
    out.push_str(&capture_backtrace());
    out
}

fn capture_backtrace() -> String {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => format!("\n\nStack backtrace:\n{}", backtrace),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer {
        #[source]
        inner: std::io::Error,
    }

    #[test]
    fn test_bot_errors_keep_their_kind() {
        let error: Error = Box::new(BotError::MissingRole {
            role: "Admin".to_string(),
        });
        let cause = Cause::from_error(&error);
        assert_eq!(
            cause.kind,
            FailureKind::Check(CheckKind::MissingRole {
                role: "Admin".to_string()
            })
        );
        assert_eq!(cause.detail, "Role Admin is required to run this command.");
    }

    #[test]
    fn test_foreign_errors_are_unclassified() {
        let error: Error = "x".into();
        let cause = Cause::from_error(&error);
        assert_eq!(cause.kind, FailureKind::Unclassified);
        assert!(cause.trace.starts_with("Error: x"));
    }

    #[test]
    fn test_invoke_failure_unwraps_original() {
        let failure = CommandFailure::Invoke {
            original: Box::new(BotError::GuildOnlyCommand),
        };
        assert_eq!(
            failure.to_string(),
            "Command raised an exception: This command cannot be used in private messages."
        );
        assert_eq!(failure.into_cause().kind, FailureKind::NoPrivateMessage);
    }

    #[test]
    fn test_trace_follows_source_chain() {
        let error = Outer {
            inner: std::io::Error::other("disk on fire"),
        };
        let trace = format_trace(&error);
        assert!(trace.starts_with("Error: outer failure\nCaused by: disk on fire"));
    }

    #[test]
    fn test_event_failure_builder() {
        let failure = EventFailure::new("message", "boom".into())
            .arg("hello")
            .kwarg("guild", "1");
        assert_eq!(failure.args, vec!["hello"]);
        assert_eq!(failure.kwargs.get("guild").map(String::as_str), Some("1"));
        assert!(failure.trace().starts_with("Error: boom"));
    }
}
