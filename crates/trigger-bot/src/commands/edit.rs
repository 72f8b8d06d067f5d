//! Editresponse command - replaces the trigger and reply of a saved response.

use crate::commands::add::{parse_entry, CONFIRM_REPLY_CHARS};
use crate::commands::{titled, CommandHandler, GUILD_ONLY_REPLY};
use crate::error::AppResult;
use crate::pagination::truncate;
use async_trait::async_trait;
use responses_store::ResponsesManager;
use signal_client::BotMessage;
use tracing::warn;

pub struct EditResponseHandler {
    manager: ResponsesManager,
    prefix: String,
}

impl EditResponseHandler {
    pub fn new(manager: ResponsesManager, prefix: &str) -> Self {
        Self {
            manager,
            prefix: prefix.to_string(),
        }
    }
}

#[async_trait]
impl CommandHandler for EditResponseHandler {
    fn name(&self) -> &str {
        "editresponse"
    }

    fn aliases(&self) -> &[&str] {
        &["updateresponse", "modresponse"]
    }

    fn description(&self) -> &str {
        "Change the trigger and reply of a saved response (admins only)."
    }

    fn usage(&self) -> &str {
        "editresponse <name> <trigger> <response...>"
    }

    fn guild_only(&self) -> bool {
        true
    }

    fn requires_admin(&self) -> bool {
        true
    }

    async fn execute(&self, message: &BotMessage, args: &[String]) -> AppResult<String> {
        let Some(guild_id) = message.guild_id() else {
            return Ok(GUILD_ONLY_REPLY.into());
        };

        let Some((name, trigger, response)) = parse_entry(args) else {
            return Ok(titled(
                "Invalid usage",
                &[format!("Usage: {}{}", self.prefix, self.usage())],
            ));
        };

        match self.manager.edit(guild_id, name, trigger, &response).await {
            Ok(()) => Ok(titled(
                "Response updated",
                &[
                    format!("{} has been updated.", name),
                    format!("Trigger: {}", trigger),
                    format!("Reply: {}", truncate(&response, CONFIRM_REPLY_CHARS)),
                ],
            )),
            Err(e) if e.is_user_error() => {
                warn!("editresponse rejected: {}", e);
                Ok(titled("Failed to update", &[e.to_string()]))
            }
            Err(e) => Err(e.into()),
        }
    }
}
