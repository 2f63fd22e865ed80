//! Per-subcommand flag sets with uniform usage output.
//!
//! Every handler assembles its flags through this factory so that parse
//! failures and help requests print the same standardized usage block:
//! the usage line, the command description, and the enumerated flag
//! defaults, written to the error channel before the process exits with
//! [`USAGE_EXIT_CODE`].

use crate::context::Cli;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};


/// Exit status used uniformly for usage-printing failures.
pub const USAGE_EXIT_CODE: i32 = 2;

/// A flag-parsing handle for one subcommand.
///
/// Built from [`Cli::subcmd`], populated by the handler with its flags, and
/// consumed by [`FlagSet::parse`]. A hidden flag counts as deprecated: it
/// still parses, but it is left out of the usage block and of the
/// `[OPTIONS]` decision.
#[derive(Debug, Clone)]
pub struct FlagSet {
    program: String,
    name: String,
    signature: String,
    description: String,
    cmd: Command,
}

impl FlagSet {
    /// Creates a flag set for `<program> <name>`.
    pub fn new(
        program: impl Into<String>,
        name: impl Into<String>,
        signature: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let cmd = Command::new(name.clone()).no_binary_name(true);
        Self {
            program: program.into(),
            name,
            signature: signature.into(),
            description: description.into(),
            cmd,
        }
    }

    /// Registers a flag.
    pub fn arg(mut self, arg: Arg) -> Self {
        self.cmd = self.cmd.arg(arg);
        self
    }

    /// Registers a boolean flag, off by default.
    ///
    /// # Examples
    ///
    /// ```
    /// use stevedore::FlagSet;
    ///
    /// let flags = FlagSet::new("stevedore", "ps", "", "List containers")
    ///     .flag_bool("all", Some('a'), "Show all containers");
    /// assert!(flags.usage().contains("[OPTIONS]"));
    /// ```
    pub fn flag_bool(self, long: &str, short: Option<char>, help: &str) -> Self {
        // The default is set explicitly so the usage block can enumerate it
        // without building the command first.
        let mut arg = Arg::new(long.to_string())
            .long(long.to_string())
            .action(ArgAction::SetTrue)
            .default_value("false")
            .help(help.to_string());
        if let Some(short) = short {
            arg = arg.short(short);
        }
        self.arg(arg)
    }

    /// Registers a string flag with a default value.
    pub fn flag_string(self, long: &str, short: Option<char>, default: &str, help: &str) -> Self {
        let mut arg = Arg::new(long.to_string())
            .long(long.to_string())
            .action(ArgAction::Set)
            .default_value(default.to_string())
            .help(help.to_string());
        if let Some(short) = short {
            arg = arg.short(short);
        }
        self.arg(arg)
    }

    /// The number of registered flags that are not deprecated (hidden).
    pub fn flag_count_undeprecated(&self) -> usize {
        self.cmd
            .get_arguments()
            .filter(|arg| arg.get_id() != "help" && !arg.is_hide_set())
            .count()
    }

    /// Renders the standardized usage block.
    ///
    /// The `[OPTIONS] ` fragment appears in the usage line iff at least one
    /// non-deprecated flag is registered.
    pub fn usage(&self) -> String {
        let options = if self.flag_count_undeprecated() > 0 {
            "[OPTIONS] "
        } else {
            ""
        };
        let mut text = format!(
            "\nUsage: {} {} {}{}\n\n{}\n\n",
            self.program, self.name, options, self.signature, self.description
        );

        for arg in self.cmd.get_arguments() {
            if arg.get_id() == "help" || arg.is_hide_set() {
                continue;
            }
            let mut line = String::from("  ");
            if let Some(short) = arg.get_short() {
                line.push('-');
                line.push(short);
                line.push_str(", ");
            }
            if let Some(long) = arg.get_long() {
                line.push_str("--");
                line.push_str(long);
            }
            let defaults: Vec<String> = arg
                .get_default_values()
                .iter()
                .map(|v| v.to_string_lossy().into_owned())
                .collect();
            if !defaults.is_empty() {
                line.push('=');
                line.push_str(&defaults.join(","));
            }
            if let Some(help) = arg.get_help() {
                line.push_str(": ");
                line.push_str(&help.to_string());
            }
            text.push_str(&line);
            text.push('\n');
        }
        text
    }

    /// Parses the residual arguments of an invocation.
    ///
    /// On success the matches are returned. On a parse failure the
    /// offending error's first line and the usage block are written to the
    /// error channel and the process exits with [`USAGE_EXIT_CODE`]; an
    /// explicit help request prints only the usage block and exits the
    /// same way.
    pub fn parse(self, cli: &mut Cli, args: &[String]) -> ArgMatches {
        match self.cmd.clone().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(err) => {
                let usage = self.usage();
                let out = cli.err();
                if err.kind() != ErrorKind::DisplayHelp {
                    let message = err.to_string();
                    if let Some(line) = message.lines().find(|l| !l.trim().is_empty()) {
                        let _ = writeln!(out, "{line}");
                    }
                }
                let _ = out.write_all(usage.as_bytes());
                let _ = out.flush();
                std::process::exit(USAGE_EXIT_CODE);
            }
        }
    }
}
