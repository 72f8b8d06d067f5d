//! Help command - displays available commands.

use crate::commands::{titled, CommandHandler, CommandInfo};
use crate::error::AppResult;
use crate::pagination::paginate;
use async_trait::async_trait;
use signal_client::BotMessage;

const PER_PAGE: usize = 8;
const NAME: &str = "help";
const ALIASES: &[&str] = &["commands", "h"];
const DESCRIPTION: &str = "Show a list of commands and basic usage.";
const USAGE: &str = "help [page]";

pub struct HelpHandler {
    catalog: Vec<CommandInfo>,
    prefix: String,
}

impl HelpHandler {
    /// `catalog` should include the help command itself.
    pub fn new(mut catalog: Vec<CommandInfo>, prefix: &str) -> Self {
        catalog.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            catalog,
            prefix: prefix.to_string(),
        }
    }

    pub fn info() -> CommandInfo {
        CommandInfo {
            name: NAME.into(),
            aliases: ALIASES.iter().map(|a| a.to_string()).collect(),
            description: DESCRIPTION.into(),
            usage: USAGE.into(),
        }
    }

    fn render(&self, requested: Option<&str>) -> String {
        let page = paginate(&self.catalog, PER_PAGE, requested);

        let mut lines = Vec::with_capacity(page.items.len() + 1);
        for info in page.items {
            let mut entry = format!("• {}\n  {}", info.name, info.description);
            if !info.aliases.is_empty() {
                entry.push_str(&format!("\n  Aliases: {}", info.aliases.join(", ")));
            }
            entry.push_str(&format!("\n  Usage: {}{}", self.prefix, info.usage));
            lines.push(entry);
        }
        lines.push(page.footer());

        titled("Commands", &lines)
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    fn name(&self) -> &str {
        NAME
    }

    fn aliases(&self) -> &[&str] {
        ALIASES
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn usage(&self) -> &str {
        USAGE
    }

    async fn execute(&self, _message: &BotMessage, args: &[String]) -> AppResult<String> {
        Ok(self.render(args.first().map(String::as_str)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str) -> CommandInfo {
        CommandInfo {
            name: name.into(),
            aliases: Vec::new(),
            description: format!("{} things", name),
            usage: name.into(),
        }
    }

    #[test]
    fn test_catalog_is_sorted() {
        let help = HelpHandler::new(vec![info("zeta"), HelpHandler::info(), info("alpha")], "!");
        let names: Vec<_> = help.catalog.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["alpha", "help", "zeta"]);
    }

    #[test]
    fn test_render_shows_aliases_and_prefixed_usage() {
        let help = HelpHandler::new(vec![HelpHandler::info()], "?");
        let text = help.render(None);

        assert!(text.starts_with("**Commands**"));
        assert!(text.contains("Aliases: commands, h"));
        assert!(text.contains("Usage: ?help [page]"));
        assert!(text.ends_with("Page 1/1"));
    }

    #[test]
    fn test_render_pages() {
        let catalog: Vec<_> = (0..10).map(|i| info(&format!("cmd{:02}", i))).collect();
        let help = HelpHandler::new(catalog, "!");

        let first = help.render(None);
        assert!(first.contains("cmd07"));
        assert!(!first.contains("cmd08"));
        assert!(first.ends_with("Page 1/2"));

        let second = help.render(Some("5"));
        assert!(second.contains("cmd09"));
        assert!(second.ends_with("Page 2/2"));
    }
}
