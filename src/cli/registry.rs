use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// A shell command: its name, help text, and handler.
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Commands in the order they appear in `help`. Later entries with a taken name are ignored.
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn from_entries(entries: impl IntoIterator<Item = CommandEntry>) -> Self {
        let mut registry = Self {
            entries: Vec::new(),
        };
        for entry in entries {
            if registry.get(entry.name).is_none() {
                registry.entries.push(entry);
            }
        }
        registry
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn keeps_first_registration_and_order() {
        let registry = CommandRegistry::from_entries([
            CommandEntry::new("run", "first", "run", noop),
            CommandEntry::new("due", "due", "due", noop),
            CommandEntry::new("run", "second", "run", noop),
        ]);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["run", "due"]);
        assert_eq!(registry.get("run").map(|e| e.description), Some("first"));
        assert!(registry.get("missing").is_none());
    }
}
