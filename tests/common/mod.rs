use std::sync::Mutex;

use async_trait::async_trait;
use goss_bot::bot::context::InvocationContext;
use goss_bot::bot::context::OwnerContact;
use poise::serenity_prelude as serenity;

/// Records everything the event cog sends back for one invocation.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingContext {
    pub command: String,
    pub content: String,
    pub guild: Option<String>,
    pub fail_private: bool,
    pub replies: Mutex<Vec<String>>,
    pub private_replies: Mutex<Vec<String>>,
    pub help_sent: Mutex<u32>,
}

#[allow(dead_code)]
impl RecordingContext {
    pub fn new(command: &str, content: &str) -> Self {
        Self {
            command: command.to_string(),
            content: content.to_string(),
            guild: Some("Goss".to_string()),
            ..Default::default()
        }
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }

    pub fn private_replies(&self) -> Vec<String> {
        self.private_replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl InvocationContext for RecordingContext {
    fn author(&self) -> String {
        "alice".to_string()
    }

    fn channel(&self) -> String {
        "general".to_string()
    }

    fn guild(&self) -> Option<String> {
        self.guild.clone()
    }

    fn command_name(&self) -> String {
        self.command.clone()
    }

    fn is_slash_command(&self) -> bool {
        self.content.starts_with('/')
    }

    fn message_content(&self) -> String {
        self.content.clone()
    }

    fn has_local_error_handler(&self) -> bool {
        false
    }

    fn group_has_error_handler(&self) -> bool {
        false
    }

    async fn reply(&self, text: &str) -> Result<(), serenity::Error> {
        self.replies.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn send_help(&self) -> Result<(), serenity::Error> {
        *self.help_sent.lock().unwrap() += 1;
        Ok(())
    }

    async fn reply_to_author(&self, text: &str) -> Result<(), serenity::Error> {
        self.private_replies.lock().unwrap().push(text.to_string());
        if self.fail_private {
            return Err(serenity::Error::Other("Cannot send messages to this user"));
        }
        Ok(())
    }
}

/// Owner that keeps the direct messages it receives.
#[derive(Default)]
pub struct RecordingOwner {
    pub messages: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingOwner {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl OwnerContact for RecordingOwner {
    async fn send(&self, text: &str) -> Result<(), serenity::Error> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
