//! Responsepanel command - lists a group's saved responses, newest first.

use crate::commands::{titled, CommandHandler, GUILD_ONLY_REPLY};
use crate::error::AppResult;
use crate::pagination::{paginate, truncate};
use async_trait::async_trait;
use responses_store::ResponsesManager;
use signal_client::BotMessage;

const PER_PAGE: usize = 6;
const PANEL_REPLY_CHARS: usize = 256;

pub struct ResponsePanelHandler {
    manager: ResponsesManager,
}

impl ResponsePanelHandler {
    pub fn new(manager: ResponsesManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl CommandHandler for ResponsePanelHandler {
    fn name(&self) -> &str {
        "responsepanel"
    }

    fn aliases(&self) -> &[&str] {
        &["responses", "responselist", "rp"]
    }

    fn description(&self) -> &str {
        "Show all saved responses for this group, a page at a time."
    }

    fn usage(&self) -> &str {
        "responsepanel [page]"
    }

    fn guild_only(&self) -> bool {
        true
    }

    async fn execute(&self, message: &BotMessage, args: &[String]) -> AppResult<String> {
        let Some(guild_id) = message.guild_id() else {
            return Ok(GUILD_ONLY_REPLY.into());
        };

        let records = self.manager.list(guild_id).await?;
        if records.is_empty() {
            return Ok(titled(
                "No responses",
                &["There are no saved responses for this group yet.".into()],
            ));
        }

        let page = paginate(&records, PER_PAGE, args.first().map(String::as_str));

        let mut lines = vec![format!("Total responses: {}", records.len())];
        for record in page.items {
            lines.push(format!(
                "• {}\n  Trigger: {}\n  Reply: {}",
                record.name,
                record.trigger,
                truncate(&record.response, PANEL_REPLY_CHARS)
            ));
        }
        lines.push(page.footer());

        Ok(titled("Response Panel", &lines))
    }
}
