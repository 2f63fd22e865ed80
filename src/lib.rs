//! Stevedore - command dispatch for a container-engine CLI
//!
//! Stevedore is the client front-end of a container-engine command line: it
//! maps a typed subcommand token to a registered handler, builds the shared
//! client context once per process, and gives handlers a uniform flag-set
//! factory and registry-credential loader. Handler bodies (daemon RPC,
//! image operations, container lifecycle) are supplied by the embedding
//! application and reached only through the dispatch contract.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::io::Write;
//! use stevedore::{Cli, CommandRegistry, Dispatcher, OutStream, Result};
//!
//! fn cmd_help(cli: &mut Cli, _args: &[String]) -> Result<()> {
//!     writeln!(cli.out(), "Usage: stevedore [OPTIONS] COMMAND [arg...]")?;
//!     Ok(())
//! }
//!
//! fn cmd_version(cli: &mut Cli, _args: &[String]) -> Result<()> {
//!     writeln!(cli.out(), "stevedore version {}", stevedore::version())?;
//!     Ok(())
//! }
//!
//! fn main() -> Result<()> {
//!     let registry = CommandRegistry::builder()
//!         .command("help", cmd_help)
//!         .command("version", cmd_version)
//!         .build();
//!
//!     let mut cli = Cli::new(
//!         None,
//!         OutStream::stdout(),
//!         Some(OutStream::stderr()),
//!         "tcp",
//!         "127.0.0.1:4243",
//!         None,
//!     );
//!
//!     let args: Vec<String> = std::env::args().skip(1).collect();
//!     Dispatcher::new(registry).dispatch(&mut cli, &args)
//! }
//! ```
//!
//! # Main Types
//!
//! - [`Cli`] - The shared client context built once at process start
//! - [`CommandRegistry`] - The fixed command-name to handler mapping
//! - [`Dispatcher`] - Resolves the first token and routes to a handler
//! - [`FlagSet`] - Per-subcommand flags with uniform usage output
//! - [`ConfigFile`] - Registry credentials loaded from the user's home

#![warn(clippy::all)]

/// Returns the stevedore crate version.
///
/// # Examples
///
/// ```
/// let version = stevedore::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod flagset;

// Re-export commonly used types for convenience
pub use commands::{CommandHandler, CommandRegistry, RegistryBuilder, SUPPORTED_COMMANDS};
pub use config::{AuthConfig, ConfigFile};
pub use context::{Cli, OutStream, Scheme, TlsConfig};
pub use dispatch::Dispatcher;
pub use error::{CliError, Result};
pub use flagset::{FlagSet, USAGE_EXIT_CODE};
