//! Command Manager.
//!
//! Keyboard bindings for the user commands, with conflict detection
//! and platform-specific modifier key adaptation.

use std::collections::HashMap;

use crate::types::command::UserCommand;
use crate::types::errors::CommandError;

/// Trait defining command binding operations.
pub trait CommandManagerTrait {
    fn resolve(&self, name: &str) -> Result<UserCommand, CommandError>;
    fn bind(&mut self, name: &str, keys: &str) -> Result<(), CommandError>;
    fn unbind(&mut self, name: &str) -> Result<(), CommandError>;
    fn get_binding(&self, command: UserCommand) -> Option<&str>;
    fn command_for_keys(&self, keys: &str) -> Option<UserCommand>;
    fn list_bindings(&self) -> &HashMap<UserCommand, String>;
    fn reset_to_defaults(&mut self);
    fn has_conflict(&self, keys: &str, exclude: Option<UserCommand>) -> Option<UserCommand>;
    fn get_default_bindings(&self) -> HashMap<UserCommand, String>;
}

/// In-memory command bindings.
pub struct CommandManager {
    bindings: HashMap<UserCommand, String>,
}

impl CommandManager {
    pub fn new() -> Self {
        let mut mgr = Self {
            bindings: HashMap::new(),
        };
        mgr.bindings = mgr.get_default_bindings();
        mgr
    }

    /// Adapts modifier keys for the current platform.
    fn adapt_for_platform(keys: &str) -> String {
        if cfg!(target_os = "macos") {
            keys.replace("Ctrl+", "Cmd+")
        } else {
            keys.to_string()
        }
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandManagerTrait for CommandManager {
    fn resolve(&self, name: &str) -> Result<UserCommand, CommandError> {
        UserCommand::parse(name).ok_or_else(|| CommandError::UnknownCommand(name.to_string()))
    }

    fn bind(&mut self, name: &str, keys: &str) -> Result<(), CommandError> {
        let command = self.resolve(name)?;
        if keys.trim().is_empty() {
            return Err(CommandError::InvalidKeys("Keys cannot be empty".to_string()));
        }

        if let Some(conflicting) = self.has_conflict(keys, Some(command)) {
            return Err(CommandError::Conflict(format!(
                "'{}' is already bound to '{}'",
                keys,
                conflicting.as_str()
            )));
        }

        self.bindings
            .insert(command, Self::adapt_for_platform(keys));
        Ok(())
    }

    fn unbind(&mut self, name: &str) -> Result<(), CommandError> {
        let command = self.resolve(name)?;
        self.bindings
            .remove(&command)
            .map(|_| ())
            .ok_or_else(|| CommandError::UnknownCommand(format!("{} has no binding", name)))
    }

    fn get_binding(&self, command: UserCommand) -> Option<&str> {
        self.bindings.get(&command).map(|s| s.as_str())
    }

    fn command_for_keys(&self, keys: &str) -> Option<UserCommand> {
        self.has_conflict(keys, None)
    }

    fn list_bindings(&self) -> &HashMap<UserCommand, String> {
        &self.bindings
    }

    fn reset_to_defaults(&mut self) {
        self.bindings = self.get_default_bindings();
    }

    fn has_conflict(&self, keys: &str, exclude: Option<UserCommand>) -> Option<UserCommand> {
        let adapted = Self::adapt_for_platform(keys);
        self.bindings
            .iter()
            .find(|(command, bound)| **bound == adapted && Some(**command) != exclude)
            .map(|(command, _)| *command)
    }

    fn get_default_bindings(&self) -> HashMap<UserCommand, String> {
        let defaults = [
            (UserCommand::SuspendCurrentTab, "Ctrl+Shift+S"),
            (UserCommand::SuspendAllTabs, "Ctrl+Shift+X"),
            (UserCommand::SuspendAllButCurrentTab, "Ctrl+Shift+O"),
            (UserCommand::UnsuspendAllTabs, "Ctrl+Shift+U"),
        ];

        defaults
            .into_iter()
            .map(|(c, k)| (c, Self::adapt_for_platform(k)))
            .collect()
    }
}
