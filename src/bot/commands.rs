//! Bot commands, grouped into cogs.

pub mod admin_cog;
pub mod meta_cog;

use poise::Command;

pub use admin_cog::AdminCog;
pub use meta_cog::MetaCog;

use crate::bot::Data;
use crate::bot::Error;

pub trait Cog {
    fn commands(&self) -> Vec<Command<Data, Error>>;
}

pub struct Cogs;

impl Cog for Cogs {
    fn commands(&self) -> Vec<Command<Data, Error>> {
        let meta_cog = MetaCog;
        let admin_cog = AdminCog;

        meta_cog
            .commands()
            .into_iter()
            .chain(admin_cog.commands())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cogs_register_every_command() {
        let names: Vec<String> = Cogs.commands().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["ping", "echo", "help", "disabled", "register"]);
    }

    #[test]
    fn test_echo_requires_text() {
        let echo = MetaCog::echo();
        let params: Vec<(&str, bool)> = echo
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.required))
            .collect();
        assert_eq!(params, [("text", true)]);
    }
}
