//! Command registry and name resolution.
//!
//! The registry is a fixed mapping from canonical command name to handler,
//! built once at startup and read-only afterwards. Resolution normalizes a
//! raw token (first character uppercased, remainder lowercased, prefixed
//! with an internal marker) so `ps`, `PS` and `Ps` all select the same
//! entry; an empty token never resolves.

use crate::context::Cli;
use crate::error::Result;
use std::collections::HashMap;


/// A unit of behavior bound to one command name. Receives the shared
/// context and the residual arguments, and returns the command outcome.
pub type CommandHandler = fn(&mut Cli, &[String]) -> Result<()>;

/// The closed set of supported subcommand names.
pub const SUPPORTED_COMMANDS: &[&str] = &[
    "attach", "build", "commit", "cp", "diff", "events", "export", "help", "history", "images",
    "import", "info", "inspect", "kill", "load", "login", "logout", "logs", "pause", "port", "ps",
    "pull", "push", "restart", "rm", "rmi", "run", "save", "search", "start", "stop", "tag", "top",
    "unpause", "version", "wait",
];

/// Internal marker prefixed to every canonical key.
const KEY_PREFIX: &str = "Cmd";

/// Normalizes a raw command token into its canonical lookup key.
///
/// Returns `None` for the empty token, which must never resolve to a
/// default command.
///
/// # Examples
///
/// ```
/// use stevedore::commands::canonical_key;
///
/// assert_eq!(canonical_key("ps").as_deref(), Some("CmdPs"));
/// assert_eq!(canonical_key("PS").as_deref(), Some("CmdPs"));
/// assert_eq!(canonical_key(""), None);
/// ```
pub fn canonical_key(name: &str) -> Option<String> {
    let mut chars = name.chars();
    let first = chars.next()?;
    let mut key = String::from(KEY_PREFIX);
    key.extend(first.to_uppercase());
    key.push_str(&chars.as_str().to_lowercase());
    Some(key)
}

/// Builder for a [`CommandRegistry`].
///
/// Registration is validated at construction time: names outside
/// [`SUPPORTED_COMMANDS`] are rejected, and a key may never end up mapped
/// to two different handlers. Re-registering a name with the handler it
/// already maps to is a harmless no-op.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<String, CommandHandler>,
}

impl RegistryBuilder {
    /// Registers a handler for a command name.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or not a supported command, or if the name
    /// is already registered with a different handler. These are
    /// construction-time programming errors, never dispatch-time behavior.
    pub fn command(mut self, name: &str, handler: CommandHandler) -> Self {
        let key = canonical_key(name)
            .unwrap_or_else(|| panic!("command name must not be empty"));
        let supported = SUPPORTED_COMMANDS
            .iter()
            .any(|cmd| canonical_key(cmd).as_deref() == Some(key.as_str()));
        if !supported {
            panic!("'{name}' is not a supported command");
        }

        match self.entries.get(&key) {
            Some(existing) if std::ptr::fn_addr_eq(*existing, handler) => {}
            Some(_) => panic!("command '{name}' is already registered with a different handler"),
            None => {
                self.entries.insert(key, handler);
            }
        }
        self
    }

    /// Finalizes the registry.
    ///
    /// # Panics
    ///
    /// Panics unless a `help` handler was registered; the dispatcher's
    /// not-found fallback requires one.
    pub fn build(self) -> CommandRegistry {
        let help = self
            .entries
            .get("CmdHelp")
            .copied()
            .unwrap_or_else(|| panic!("a help command must be registered"));
        CommandRegistry {
            entries: self.entries,
            help,
        }
    }
}

/// The fixed command-name to handler mapping. Built once via
/// [`CommandRegistry::builder`]; read-only afterwards.
pub struct CommandRegistry {
    entries: HashMap<String, CommandHandler>,
    help: CommandHandler,
}

impl CommandRegistry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Resolves a raw command token to its handler, or `None` when the
    /// token is empty or names no registered command.
    pub fn resolve(&self, name: &str) -> Option<CommandHandler> {
        let key = canonical_key(name)?;
        self.entries.get(&key).copied()
    }

    /// The registered help handler, used as the dispatcher's fallback.
    pub fn help(&self) -> CommandHandler {
        self.help
    }

    /// The number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no commands are registered. Unreachable through the
    /// builder, which requires help, but kept for the usual pairing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("CommandRegistry").field("keys", &keys).finish()
    }
}
