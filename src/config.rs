//! Environment based configuration.

use std::path::PathBuf;

use crate::error::AppError;

/// Runtime configuration, read from the process environment (and `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    /// Discord user id of the bot owner. Unhandled errors are sent here.
    pub owner_id: u64,
    pub prefix: String,
    pub logs_path: PathBuf,
    /// Role name required by the admin commands.
    pub admin_role: String,
    pub disabled_commands: Vec<String>,
}

impl Config {
    /// Loads the configuration from environment variables.
    pub fn load() -> Result<Self, AppError> {
        let owner_id = required("OWNER_ID")?;
        let owner_id = owner_id
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| AppError::InvalidConfig {
                key: "OWNER_ID".to_string(),
                msg: format!("\"{}\" is not a Discord user id", owner_id),
            })?;

        Ok(Self {
            discord_token: required("DISCORD_TOKEN")?,
            owner_id,
            prefix: optional("COMMAND_PREFIX", "!"),
            logs_path: PathBuf::from(optional("LOGS_PATH", "logs")),
            admin_role: optional("ADMIN_ROLE", "Admin"),
            disabled_commands: parse_list(&optional("DISABLED_COMMANDS", "")),
        })
    }

    /// Whether `command` (a qualified command name) is disabled.
    pub fn is_disabled(&self, command: &str) -> bool {
        self.disabled_commands
            .iter()
            .any(|disabled| disabled.eq_ignore_ascii_case(command))
    }
}

fn required(key: &str) -> Result<String, AppError> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::MissingConfig {
            key: key.to_string(),
        })
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 6] = [
        "DISCORD_TOKEN",
        "OWNER_ID",
        "COMMAND_PREFIX",
        "LOGS_PATH",
        "ADMIN_ROLE",
        "DISABLED_COMMANDS",
    ];

    fn clear_env() {
        for key in KEYS {
            // SAFETY: tests touching the environment run serially.
            unsafe { std::env::remove_var(key) };
        }
    }

    fn set_env(key: &str, value: &str) {
        // SAFETY: tests touching the environment run serially.
        unsafe { std::env::set_var(key, value) };
    }

    #[test]
    #[serial_test::serial]
    fn test_load_uses_defaults() {
        clear_env();
        set_env("DISCORD_TOKEN", "token");
        set_env("OWNER_ID", "1234");

        let config = Config::load().unwrap();
        assert_eq!(config.owner_id, 1234);
        assert_eq!(config.prefix, "!");
        assert_eq!(config.logs_path, PathBuf::from("logs"));
        assert_eq!(config.admin_role, "Admin");
        assert!(config.disabled_commands.is_empty());
    }

    #[test]
    #[serial_test::serial]
    fn test_load_missing_token() {
        clear_env();
        set_env("OWNER_ID", "1234");

        match Config::load() {
            Err(AppError::MissingConfig { key }) => assert_eq!(key, "DISCORD_TOKEN"),
            other => panic!("Expected MissingConfig, got {:?}", other),
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_load_rejects_invalid_owner() {
        clear_env();
        set_env("DISCORD_TOKEN", "token");
        set_env("OWNER_ID", "not-a-number");

        assert!(matches!(
            Config::load(),
            Err(AppError::InvalidConfig { key, .. }) if key == "OWNER_ID"
        ));

        set_env("OWNER_ID", "0");
        assert!(Config::load().is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_disabled_commands() {
        clear_env();
        set_env("DISCORD_TOKEN", "token");
        set_env("OWNER_ID", "1234");
        set_env("DISABLED_COMMANDS", " ping, ,echo ");

        let config = Config::load().unwrap();
        assert_eq!(config.disabled_commands, vec!["ping", "echo"]);
        assert!(config.is_disabled("PING"));
        assert!(!config.is_disabled("help"));
    }
}
