use clap::Command;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Groups shown by `dbxlink commands list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    /// Send, get and remove.
    Transfer,
    /// Linked-account status and profile.
    Account,
    /// Configuration and introspection.
    System,
}

impl CommandCategory {
    /// Returns all category variants in display order.
    pub fn all() -> &'static [CommandCategory] {
        &[
            CommandCategory::Transfer,
            CommandCategory::Account,
            CommandCategory::System,
        ]
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandCategory::Transfer => write!(f, "transfer"),
            CommandCategory::Account => write!(f, "account"),
            CommandCategory::System => write!(f, "system"),
        }
    }
}

/// Metadata for a registered command.
#[derive(Debug, Clone)]
pub struct CommandMeta {
    pub name: String,
    pub category: CommandCategory,
    pub description: String,
    pub aliases: Vec<String>,
    pub hidden: bool,
    pub deprecated: bool,
    pub command: Command,
}

/// Statistics about the command registry.
#[derive(Debug, Serialize)]
pub struct RegistryStats {
    pub total: usize,
    pub hidden: usize,
    pub deprecated: usize,
    pub per_category: HashMap<CommandCategory, usize>,
}

/// Centralized command registration and categorization system.
pub struct CommandRegistry {
    commands: HashMap<String, CommandMeta>,
    root: Command,
}

impl CommandRegistry {
    /// Creates a new registry with the given root command.
    pub fn new(root: Command) -> Self {
        Self {
            commands: HashMap::new(),
            root,
        }
    }

    /// Registers a command. Returns an error if a command with the same name already exists.
    pub fn register(&mut self, meta: CommandMeta) -> crate::errors::Result<()> {
        if self.commands.contains_key(&meta.name) {
            return Err(crate::errors::DbxError::Command(format!(
                "duplicate command name: {}",
                meta.name
            )));
        }
        self.commands.insert(meta.name.clone(), meta);
        Ok(())
    }

    /// Returns all commands in the given category.
    pub fn get_by_category(&self, cat: CommandCategory) -> Vec<&CommandMeta> {
        self.commands
            .values()
            .filter(|m| m.category == cat)
            .collect()
    }

    /// Human-readable listing of commands grouped by category.
    pub fn render_listing(&self) -> String {
        let mut out = String::new();
        for cat in CommandCategory::all() {
            let mut cmds = self.get_by_category(*cat);
            if cmds.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{}:\n", cat));
            cmds.sort_by(|a, b| a.name.cmp(&b.name));
            for cmd in cmds {
                let suffix = if cmd.deprecated {
                    " [deprecated]"
                } else if cmd.hidden {
                    " [hidden]"
                } else {
                    ""
                };
                out.push_str(&format!("  {:<20} {}{}\n", cmd.name, cmd.description, suffix));
            }
        }
        out
    }

    /// JSON listing of commands grouped by category.
    pub fn listing_json(&self) -> serde_json::Value {
        let mut output: HashMap<String, Vec<CommandJsonEntry>> = HashMap::new();
        for cat in CommandCategory::all() {
            let cmds = self.get_by_category(*cat);
            if cmds.is_empty() {
                continue;
            }
            let mut entries: Vec<CommandJsonEntry> = cmds
                .iter()
                .map(|m| CommandJsonEntry {
                    name: m.name.clone(),
                    description: m.description.clone(),
                    aliases: m.aliases.clone(),
                    hidden: m.hidden,
                    deprecated: m.deprecated,
                })
                .collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            output.insert(cat.to_string(), entries);
        }
        serde_json::to_value(&output).unwrap_or(serde_json::Value::Null)
    }

    /// Returns statistics about the registry.
    pub fn stats(&self) -> RegistryStats {
        let mut per_category: HashMap<CommandCategory, usize> = HashMap::new();
        let mut hidden = 0;
        let mut deprecated = 0;

        for meta in self.commands.values() {
            *per_category.entry(meta.category).or_insert(0) += 1;
            if meta.hidden {
                hidden += 1;
            }
            if meta.deprecated {
                deprecated += 1;
            }
        }

        RegistryStats {
            total: self.commands.len(),
            hidden,
            deprecated,
            per_category,
        }
    }

    /// Validates the registry and returns a list of issues found.
    ///
    /// Checks for:
    /// - Duplicate names (prevented at registration, but checked for completeness)
    /// - Commands without a category (all commands have one by construction)
    /// - Empty categories (categories with zero commands)
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        // Check for duplicate names (track via a separate set)
        let mut seen = std::collections::HashSet::new();
        for name in self.commands.keys() {
            if !seen.insert(name.clone()) {
                issues.push(format!("duplicate command name: {}", name));
            }
        }

        // Check for empty categories
        for cat in CommandCategory::all() {
            if self.get_by_category(*cat).is_empty() {
                issues.push(format!("empty category: {}", cat));
            }
        }

        issues
    }

    /// Consumes the registry and builds the final clap Command with all subcommands attached.
    pub fn build_root(self) -> Command {
        let mut metas: Vec<CommandMeta> = self.commands.into_values().collect();
        metas.sort_by(|a, b| a.name.cmp(&b.name));
        let mut root = self.root;
        for meta in metas {
            let mut cmd = meta.command;
            if !meta.aliases.is_empty() {
                cmd = cmd.visible_aliases(meta.aliases);
            }
            if meta.hidden {
                cmd = cmd.hide(true);
            }
            root = root.subcommand(cmd);
        }
        root
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns a sorted list of all registered command names.
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns true if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// JSON-serializable entry for command listing.
#[derive(Debug, Serialize)]
struct CommandJsonEntry {
    name: String,
    description: String,
    aliases: Vec<String>,
    hidden: bool,
    deprecated: bool,
}

/// Builder for constructing `CommandMeta` instances.
pub struct CommandBuilder {
    name: String,
    category: Option<CommandCategory>,
    description: String,
    aliases: Vec<String>,
    hidden: bool,
    deprecated: bool,
    command: Option<Command>,
}

impl CommandBuilder {
    /// Creates a new builder with the given command name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            category: None,
            description: String::new(),
            aliases: Vec::new(),
            hidden: false,
            deprecated: false,
            command: None,
        }
    }

    /// Creates a builder from an existing clap Command, extracting name and description.
    pub fn from_clap(cmd: Command) -> Self {
        let name = cmd.get_name().to_string();
        let description = cmd
            .get_about()
            .map(|s| s.to_string())
            .unwrap_or_default();
        Self {
            name,
            category: None,
            description,
            aliases: Vec::new(),
            hidden: false,
            deprecated: false,
            command: Some(cmd),
        }
    }

    /// Sets the command category.
    pub fn category(mut self, cat: CommandCategory) -> Self {
        self.category = Some(cat);
        self
    }

    /// Sets the command description.
    pub fn description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Sets the command aliases.
    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Marks the command as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Marks the command as deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Builds the `CommandMeta`. Defaults category to `System` if not set.
    /// Creates a basic clap Command if none was provided via `from_clap`.
    pub fn build(self) -> CommandMeta {
        let category = self.category.unwrap_or(CommandCategory::System);
        let command = self.command.unwrap_or_else(|| {
            let mut cmd = Command::new(self.name.clone());
            if !self.description.is_empty() {
                cmd = cmd.about(self.description.clone());
            }
            cmd
        });

        CommandMeta {
            name: self.name,
            category,
            description: self.description,
            aliases: self.aliases,
            hidden: self.hidden,
            deprecated: self.deprecated,
            command,
        }
    }
}
