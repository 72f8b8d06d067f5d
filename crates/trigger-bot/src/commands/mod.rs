//! Bot command handlers.

mod add;
mod edit;
mod help;
mod panel;
mod ping;
mod registry;
mod remove;

pub use add::AddResponseHandler;
pub use edit::EditResponseHandler;
pub use help::HelpHandler;
pub use panel::ResponsePanelHandler;
pub use ping::PingHandler;
pub use registry::CommandRegistry;
pub use remove::RemoveResponseHandler;

use crate::error::AppResult;
use async_trait::async_trait;
use responses_store::ResponsesManager;
use signal_client::BotMessage;
use std::sync::Arc;

pub const GUILD_ONLY_REPLY: &str = "This command can only be used inside a group.";

/// Command handler trait.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name (e.g., "help", "addresponse").
    fn name(&self) -> &str;

    /// Alternative names that invoke the same command.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    fn description(&self) -> &str;

    /// Usage line without the prefix (e.g., "help [page]").
    fn usage(&self) -> &str {
        self.name()
    }

    /// Refuse to run outside a group.
    fn guild_only(&self) -> bool {
        false
    }

    /// Only configured admins may run this command.
    fn requires_admin(&self) -> bool {
        false
    }

    /// Execute the command with the whitespace-split arguments after its name.
    async fn execute(&self, message: &BotMessage, args: &[String]) -> AppResult<String>;
}

/// Help listing entry for a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub usage: String,
}

impl CommandInfo {
    pub fn of(handler: &dyn CommandHandler) -> Self {
        Self {
            name: handler.name().to_string(),
            aliases: handler.aliases().iter().map(|a| a.to_string()).collect(),
            description: handler.description().to_string(),
            usage: handler.usage().to_string(),
        }
    }
}

/// Everything handlers need, shared across registry reloads.
#[derive(Clone)]
pub struct CommandContext {
    pub manager: ResponsesManager,
    pub prefix: String,
}

/// Build the full command set.
pub fn build_handlers(ctx: &CommandContext) -> Vec<Arc<dyn CommandHandler>> {
    let mut handlers: Vec<Arc<dyn CommandHandler>> = vec![
        Arc::new(AddResponseHandler::new(ctx.manager.clone(), &ctx.prefix)),
        Arc::new(EditResponseHandler::new(ctx.manager.clone(), &ctx.prefix)),
        Arc::new(RemoveResponseHandler::new(ctx.manager.clone(), &ctx.prefix)),
        Arc::new(ResponsePanelHandler::new(ctx.manager.clone())),
        Arc::new(PingHandler::new(ctx.manager.clone())),
    ];

    let mut catalog: Vec<CommandInfo> = handlers.iter().map(|h| CommandInfo::of(h.as_ref())).collect();
    catalog.push(HelpHandler::info());
    handlers.push(Arc::new(HelpHandler::new(catalog, &ctx.prefix)));

    handlers
}

/// Split arguments on whitespace, keeping double-quoted spans together.
pub fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if has_token {
        args.push(current);
    }
    args
}

/// Render a titled reply, one line per body entry.
pub(crate) fn titled(title: &str, lines: &[String]) -> String {
    let mut out = format!("**{}**", title);
    for line in lines {
        out.push('\n');
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args_on_whitespace() {
        assert_eq!(
            split_args("greet  hello\tHi there!"),
            vec!["greet", "hello", "Hi", "there!"]
        );
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn test_split_args_keeps_quoted_spans() {
        assert_eq!(
            split_args(r#"greet "good morning" Morning to you"#),
            vec!["greet", "good morning", "Morning", "to", "you"]
        );
        assert_eq!(split_args(r#"a "" b"#), vec!["a", "", "b"]);
    }

    #[test]
    fn test_titled() {
        assert_eq!(titled("No responses", &[]), "**No responses**");
        assert_eq!(
            titled("Response removed", &["greet has been removed.".into()]),
            "**Response removed**\ngreet has been removed."
        );
    }
}
