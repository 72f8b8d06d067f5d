//! Removeresponse command - deletes a saved response by name.

use crate::commands::{titled, CommandHandler, GUILD_ONLY_REPLY};
use crate::error::AppResult;
use async_trait::async_trait;
use responses_store::ResponsesManager;
use signal_client::BotMessage;
use tracing::warn;

pub struct RemoveResponseHandler {
    manager: ResponsesManager,
    prefix: String,
}

impl RemoveResponseHandler {
    pub fn new(manager: ResponsesManager, prefix: &str) -> Self {
        Self {
            manager,
            prefix: prefix.to_string(),
        }
    }
}

#[async_trait]
impl CommandHandler for RemoveResponseHandler {
    fn name(&self) -> &str {
        "removeresponse"
    }

    fn aliases(&self) -> &[&str] {
        &["removeres", "delresponse", "deleteresponse"]
    }

    fn description(&self) -> &str {
        "Remove a saved response by name (admins only)."
    }

    fn usage(&self) -> &str {
        "removeresponse <name>"
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

        let Some(name) = args.first().filter(|n| !n.is_empty()) else {
            return Ok(titled(
                "Invalid usage",
                &[format!("Usage: {}{}", self.prefix, self.usage())],
            ));
        };

        match self.manager.remove(guild_id, name).await {
            Ok(()) => Ok(titled(
                "Response removed",
                &[format!("{} has been removed.", name)],
            )),
            Err(e) if e.is_user_error() => {
                warn!("removeresponse rejected: {}", e);
                Ok(titled("Failed to remove", &[e.to_string()]))
            }
            Err(e) => Err(e.into()),
        }
    }
}
