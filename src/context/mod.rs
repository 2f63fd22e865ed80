//! Shared client context threaded through dispatch and into handlers.
//!
//! The [`Cli`] context is built once at process start and holds the
//! process-lifetime configuration: I/O streams, connection protocol and
//! address, TLS settings, terminal status, and the lazily loaded registry
//! credential file. Handlers borrow it for the duration of a single call.

use crate::config::ConfigFile;
use crate::error::{CliError, Result};
use crate::flagset::FlagSet;
use std::env;
use std::fmt;
use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::path::Path;


/// URI scheme inferred from the TLS configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TLS settings for the daemon connection.
///
/// Presence of this configuration on the context switches the inferred
/// scheme to `https`; the fields themselves are consumed by handlers that
/// open connections, which is outside this layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// CA certificate to trust when verifying the daemon
    pub ca_file: Option<String>,
    /// Client certificate presented to the daemon
    pub cert_file: Option<String>,
    /// Private key for the client certificate
    pub key_file: Option<String>,
    /// Skip daemon certificate verification
    pub insecure_skip_verify: bool,
}

/// An output channel paired with the file descriptor backing it, if any.
///
/// Terminal capability is probed once at construction, where the concrete
/// stream type is still known; after that the stream is used purely as a
/// writer.
pub struct OutStream {
    writer: Box<dyn Write>,
    fd: Option<RawFd>,
    terminal: bool,
}

impl OutStream {
    /// Wraps the process's standard output.
    pub fn stdout() -> Self {
        let out = io::stdout();
        Self {
            terminal: out.is_terminal(),
            fd: Some(out.as_raw_fd()),
            writer: Box::new(out),
        }
    }

    /// Wraps the process's standard error.
    pub fn stderr() -> Self {
        let err = io::stderr();
        Self {
            terminal: err.is_terminal(),
            fd: Some(err.as_raw_fd()),
            writer: Box::new(err),
        }
    }

    /// Wraps an open file, probing it for terminal capability.
    pub fn file(file: File) -> Self {
        Self {
            terminal: file.is_terminal(),
            fd: Some(file.as_raw_fd()),
            writer: Box::new(file),
        }
    }

    /// Wraps an arbitrary writer. Such a stream has no file descriptor and
    /// is never a terminal.
    pub fn from_writer<W: Write + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            fd: None,
            terminal: false,
        }
    }

    /// Returns the file descriptor backing this stream, if any.
    pub fn raw_fd(&self) -> Option<RawFd> {
        self.fd
    }

    /// Returns true if the stream is backed by a terminal device.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

impl Write for OutStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl fmt::Debug for OutStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutStream")
            .field("fd", &self.fd)
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

/// The shared client context.
///
/// Built once by [`Cli::new`] and passed by mutable reference into every
/// invoked handler for the duration of that single call. The only mutation
/// after construction is the credential-file cache filled by
/// [`Cli::load_config_file`].
pub struct Cli {
    proto: String,
    addr: String,
    tls: Option<TlsConfig>,
    scheme: Scheme,
    is_terminal: bool,
    terminal_fd: Option<RawFd>,
    config_file: Option<ConfigFile>,
    input: Option<Box<dyn Read>>,
    out: OutStream,
    err: Option<OutStream>,
}

impl Cli {
    /// Builds a client context from the provided streams and connection
    /// parameters.
    ///
    /// Derivations:
    /// - the scheme is `https` iff a TLS configuration is present;
    /// - terminal detection succeeds only when an input stream is provided
    ///   and the output stream is backed by a terminal device, and the
    ///   terminal file descriptor is recorded only in that case;
    /// - when no error stream is supplied, the error channel falls back to
    ///   the output channel.
    ///
    /// # Examples
    ///
    /// ```
    /// use stevedore::{Cli, OutStream, Scheme};
    ///
    /// let cli = Cli::new(
    ///     None,
    ///     OutStream::from_writer(Vec::new()),
    ///     None,
    ///     "tcp",
    ///     "127.0.0.1:4243",
    ///     None,
    /// );
    /// assert_eq!(cli.scheme(), Scheme::Http);
    /// assert!(!cli.is_terminal());
    /// ```
    pub fn new(
        input: Option<Box<dyn Read>>,
        out: OutStream,
        err: Option<OutStream>,
        proto: impl Into<String>,
        addr: impl Into<String>,
        tls: Option<TlsConfig>,
    ) -> Self {
        let scheme = if tls.is_some() {
            Scheme::Https
        } else {
            Scheme::Http
        };

        let is_terminal = input.is_some() && out.is_terminal();
        let terminal_fd = if is_terminal { out.raw_fd() } else { None };

        Self {
            proto: proto.into(),
            addr: addr.into(),
            tls,
            scheme,
            is_terminal,
            terminal_fd,
            config_file: None,
            input,
            out,
            err,
        }
    }

    /// The network protocol for the daemon connection (e.g. `tcp`, `unix`).
    pub fn proto(&self) -> &str {
        &self.proto
    }

    /// The network address for the daemon connection.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// The inferred URI scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The TLS configuration, if one was supplied.
    pub fn tls_config(&self) -> Option<&TlsConfig> {
        self.tls.as_ref()
    }

    /// True when the context was constructed with an input stream and a
    /// terminal-backed output stream.
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// The output stream's file descriptor, recorded only when terminal
    /// detection succeeded.
    pub fn terminal_fd(&self) -> Option<RawFd> {
        self.terminal_fd
    }

    /// The cached credential configuration, if one has been loaded.
    pub fn config_file(&self) -> Option<&ConfigFile> {
        self.config_file.as_ref()
    }

    /// The input stream, if one was supplied.
    pub fn input(&mut self) -> Option<&mut (dyn Read + '_)> {
        match &mut self.input {
            Some(input) => Some(input.as_mut()),
            None => None,
        }
    }

    /// The output channel.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    /// The error channel. Falls back to the output channel when no separate
    /// error stream was supplied, so diagnostics always have somewhere to
    /// go.
    pub fn err(&mut self) -> &mut dyn Write {
        match &mut self.err {
            Some(err) => err,
            None => &mut self.out,
        }
    }

    /// Creates a flag set for a subcommand, bound to this program's name.
    ///
    /// Every handler builds its flags through this factory so usage output
    /// stays uniform across commands. See [`FlagSet`].
    pub fn subcmd(&self, name: &str, signature: &str, description: &str) -> FlagSet {
        FlagSet::new(env!("CARGO_PKG_NAME"), name, signature, description)
    }

    /// Loads the registry credential file from the location derived from
    /// the `HOME` environment variable and caches it on the context.
    ///
    /// Failure is non-fatal at this layer: a warning is written to the
    /// error channel and the error is returned for the caller to judge.
    /// The previously cached value is left in place on failure. Calling
    /// again re-reads the file and overwrites the cache.
    pub fn load_config_file(&mut self) -> Result<()> {
        match env::var("HOME") {
            Ok(home) => self.load_config_from(Path::new(&home)),
            Err(_) => {
                let err = CliError::config("HOME environment variable is not set", None);
                let _ = writeln!(self.err(), "WARNING: {err}");
                Err(err)
            }
        }
    }

    /// Like [`Cli::load_config_file`], but reads from an explicit home
    /// directory instead of consulting the environment.
    pub fn load_config_from(&mut self, home: &Path) -> Result<()> {
        match ConfigFile::load(home) {
            Ok(config) => {
                self.config_file = Some(config);
                Ok(())
            }
            Err(err) => {
                let _ = writeln!(self.err(), "WARNING: {err}");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("proto", &self.proto)
            .field("addr", &self.addr)
            .field("scheme", &self.scheme)
            .field("is_terminal", &self.is_terminal)
            .field("terminal_fd", &self.terminal_fd)
            .finish_non_exhaustive()
    }
}
