//! Addresponse command - stores a named trigger-response pair.

use crate::commands::{titled, CommandHandler, GUILD_ONLY_REPLY};
use crate::error::AppResult;
use crate::pagination::truncate;
use async_trait::async_trait;
use responses_store::ResponsesManager;
use signal_client::BotMessage;
use tracing::warn;

/// Longest reply echoed back in a confirmation.
pub(crate) const CONFIRM_REPLY_CHARS: usize = 1024;

pub struct AddResponseHandler {
    manager: ResponsesManager,
    prefix: String,
}

impl AddResponseHandler {
    pub fn new(manager: ResponsesManager, prefix: &str) -> Self {
        Self {
            manager,
            prefix: prefix.to_string(),
        }
    }
}

/// Split `<name> <trigger> <response...>`; `None` when any part is missing.
pub(crate) fn parse_entry(args: &[String]) -> Option<(&str, &str, String)> {
    let [name, trigger, rest @ ..] = args else {
        return None;
    };
    let response = rest.join(" ");

    if name.is_empty() || trigger.is_empty() || response.trim().is_empty() {
        return None;
    }
    Some((name.as_str(), trigger.as_str(), response))
}

#[async_trait]
impl CommandHandler for AddResponseHandler {
    fn name(&self) -> &str {
        "addresponse"
    }

    fn description(&self) -> &str {
        "Add a named trigger-response pair (admins only)."
    }

    fn usage(&self) -> &str {
        "addresponse <name> <trigger> <response...>"
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
                &[
                    format!("Usage: {}{}", self.prefix, self.usage()),
                    format!("Example: {}addresponse greet hello Hello there, welcome!", self.prefix),
                ],
            ));
        };

        match self.manager.add(guild_id, name, trigger, &response).await {
            Ok(_) => Ok(titled(
                "Response added",
                &[
                    format!("{} has been saved.", name),
                    format!("Trigger: {}", trigger),
                    format!("Reply: {}", truncate(&response, CONFIRM_REPLY_CHARS)),
                    format!("Added by {}", message.author()),
                ],
            )),
            Err(e) if e.is_user_error() => {
                warn!("addresponse rejected: {}", e);
                Ok(titled("Failed to add response", &[e.to_string()]))
            }
            Err(e) => Err(e.into()),
        }
    }
}
