//! Command dispatch.
//!
//! A single synchronous decision: resolve the first token of the argument
//! vector against the registry and hand the remaining tokens to the matched
//! handler, or fall back to help. No retries, no partial-failure state.

use crate::commands::CommandRegistry;
use crate::context::Cli;
use crate::error::Result;

#[cfg(test)]
mod tests;

/// Routes an argument vector to the matching command handler.
#[derive(Debug)]
pub struct Dispatcher {
    registry: CommandRegistry,
}

impl Dispatcher {
    /// Creates a dispatcher over a finalized registry.
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher resolves against.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatches an invocation.
    ///
    /// - Empty `args`: the help handler runs with no arguments.
    /// - `args[0]` resolves: its handler runs with `args[1..]` and its
    ///   outcome is propagated unchanged.
    /// - `args[0]` does not resolve: a `Command not found` diagnostic names
    ///   the token, then the help handler runs with `args[1..]`.
    ///
    /// The not-found diagnostic goes to the output channel, not the error
    /// channel. That routing is part of the observed contract.
    pub fn dispatch(&self, cli: &mut Cli, args: &[String]) -> Result<()> {
        let Some((name, rest)) = args.split_first() else {
            return (self.registry.help())(cli, &[]);
        };

        match self.registry.resolve(name) {
            Some(handler) => handler(cli, rest),
            None => {
                writeln!(cli.out(), "Error: Command not found: {name}")?;
                (self.registry.help())(cli, rest)
            }
        }
    }
}
