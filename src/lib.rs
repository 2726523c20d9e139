//! goss-bot - A Discord bot event cog.
//!
//! The event cog logs every command invocation, answers known command
//! failures with a short reply in the channel and reports anything unexpected
//! to the bot owner in a direct message.

pub mod bot;
pub mod config;
pub mod error;
pub mod logging;
