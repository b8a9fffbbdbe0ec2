//! Command unit registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::CommandHandler;

/// A candidate command unit as supplied by a [`HandlerSource`].
///
/// Only definitions that carry a handler and are not marked abstract get
/// registered. Helper units without a handler are skipped.
pub struct HandlerDefinition {
    name: String,
    handler: Option<Arc<dyn CommandHandler>>,
    is_abstract: bool,
}

impl HandlerDefinition {
    /// A callable command unit.
    pub fn command(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.into(),
            handler: Some(Arc::new(handler)),
            is_abstract: false,
        }
    }

    /// A unit that exists in the source but offers no command.
    pub fn helper(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler: None,
            is_abstract: false,
        }
    }

    /// A unit that only makes sense as a base for others.
    pub fn abstract_base(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.into(),
            handler: Some(Arc::new(handler)),
            is_abstract: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handler, if this definition is registrable.
    fn into_registrable(self) -> Option<(String, Arc<dyn CommandHandler>)> {
        if self.is_abstract {
            return None;
        }
        Some((self.name, self.handler?))
    }
}

/// Where command units come from. Asked again on every reload.
pub trait HandlerSource: Send + Sync {
    fn definitions(&self) -> Vec<HandlerDefinition>;
}

/// Mapping from command name (case-sensitive) to command unit.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Build a registry from candidate definitions.
    pub fn build(definitions: Vec<HandlerDefinition>) -> Self {
        let mut registry = Self::default();
        registry.rebuild(definitions);
        registry
    }

    /// Replace every registration.
    ///
    /// Current units are released and dropped before the new set goes in;
    /// nothing carries over from the previous mapping.
    pub fn rebuild(&mut self, definitions: Vec<HandlerDefinition>) {
        for handler in self.handlers.values() {
            handler.release();
        }
        self.handlers.clear();

        for definition in definitions {
            let name = definition.name().to_string();
            let Some((name, handler)) = definition.into_registrable() else {
                debug!(name = %name, "Skipping definition without command");
                continue;
            };
            if self.handlers.contains_key(&name) {
                warn!(name = %name, "Duplicate command definition ignored");
                continue;
            }
            self.handlers.insert(name, handler);
        }

        info!(count = self.handlers.len(), "Command registry built");
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
