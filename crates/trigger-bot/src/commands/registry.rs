//! Name and alias lookup for command handlers.

use crate::commands::CommandHandler;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

type HandlerFactory = Box<dyn Fn() -> Vec<Arc<dyn CommandHandler>> + Send + Sync>;

/// Maps every command name and alias to its handler.
///
/// The handler set comes from a factory so the registry can be rebuilt at
/// runtime with [`CommandRegistry::reload`].
pub struct CommandRegistry {
    factory: HandlerFactory,
    handlers: Vec<Arc<dyn CommandHandler>>,
    lookup: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Vec<Arc<dyn CommandHandler>> + Send + Sync + 'static,
    {
        let mut registry = Self {
            factory: Box::new(factory),
            handlers: Vec::new(),
            lookup: HashMap::new(),
        };
        registry.reload();
        registry
    }

    /// Rebuild every handler from the factory. Returns the command count.
    pub fn reload(&mut self) -> usize {
        let handlers = (self.factory)();
        let mut lookup: HashMap<String, Arc<dyn CommandHandler>> = HashMap::new();

        for handler in &handlers {
            let keys = std::iter::once(handler.name()).chain(handler.aliases().iter().copied());
            for key in keys {
                let key = key.to_lowercase();
                if let Some(previous) = lookup.insert(key.clone(), handler.clone()) {
                    warn!(
                        "Command key '{}' of {} replaces {}",
                        key,
                        handler.name(),
                        previous.name()
                    );
                }
            }
        }

        self.handlers = handlers;
        self.lookup = lookup;

        info!("Registered {} command handlers", self.handlers.len());
        self.handlers.len()
    }

    /// Look up a handler by lowercase name or alias.
    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.lookup.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
