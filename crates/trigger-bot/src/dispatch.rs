//! Routes incoming messages to commands or stored trigger responses.

use crate::commands::{
    build_handlers, split_args, titled, CommandContext, CommandHandler, CommandRegistry,
    GUILD_ONLY_REPLY,
};
use crate::config::BotConfig;
use responses_store::{MatchMode, ResponsesManager};
use signal_client::BotMessage;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

pub const HANDLER_ERROR_REPLY: &str = "Sorry, something went wrong.";

pub struct Dispatcher {
    registry: RwLock<CommandRegistry>,
    manager: ResponsesManager,
    prefix: String,
    match_mode: MatchMode,
    admins: Vec<String>,
}

impl Dispatcher {
    pub fn new(manager: ResponsesManager, bot: &BotConfig) -> Self {
        let ctx = CommandContext {
            manager: manager.clone(),
            prefix: bot.prefix.clone(),
        };
        let registry = CommandRegistry::new(move || build_handlers(&ctx));

        Self {
            registry: RwLock::new(registry),
            manager,
            prefix: bot.prefix.clone(),
            match_mode: bot.match_mode,
            admins: bot.admins.clone(),
        }
    }

    /// Rebuild the command set. Returns the number of commands loaded.
    pub async fn reload_commands(&self) -> usize {
        self.registry.write().await.reload()
    }

    /// Produce the reply for `message`, if any.
    ///
    /// Prefixed messages naming a known command run that command. Anything
    /// else sent in a group is checked against the group's triggers.
    #[instrument(skip(self, message), fields(source = %message.source))]
    pub async fn handle(&self, message: &BotMessage) -> Option<String> {
        if message.is_from_self() {
            return None;
        }

        if let Some(rest) = message.text.trim().strip_prefix(self.prefix.as_str()) {
            let mut args = split_args(rest);
            if !args.is_empty() {
                let command = args.remove(0).to_lowercase();
                let handler = self.registry.read().await.get(&command);

                if let Some(handler) = handler {
                    return Some(self.run(handler, message, &args).await);
                }
                debug!("Unknown command: {}", command);
            }
        }

        self.reply_to_trigger(message).await
    }

    async fn run(
        &self,
        handler: Arc<dyn CommandHandler>,
        message: &BotMessage,
        args: &[String],
    ) -> String {
        if handler.guild_only() && !message.is_group() {
            return GUILD_ONLY_REPLY.into();
        }

        if handler.requires_admin() && !self.is_admin(&message.source) {
            warn!("{} denied {} (not an admin)", handler.name(), message.source);
            return titled(
                "Insufficient permissions",
                &["Only bot admins can manage responses.".into()],
            );
        }

        info!("Running command {}", handler.name());
        match handler.execute(message, args).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Handler error in {}: {}", handler.name(), e);
                HANDLER_ERROR_REPLY.into()
            }
        }
    }

    /// An empty admin list lets everyone manage responses.
    fn is_admin(&self, source: &str) -> bool {
        self.admins.is_empty() || self.admins.iter().any(|a| a == source)
    }

    async fn reply_to_trigger(&self, message: &BotMessage) -> Option<String> {
        let guild_id = message.guild_id()?;

        match self
            .manager
            .find_match(guild_id, &message.text, self.match_mode)
            .await
        {
            Ok(found) => found.map(|record| {
                debug!("Trigger {} fired in {}", record.name, guild_id);
                record.response
            }),
            Err(e) => {
                error!("Trigger lookup failed for {}: {}", guild_id, e);
                None
            }
        }
    }
}
