use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use stevedore::{
    AuthConfig, Cli, CliError, CommandRegistry, ConfigFile, Dispatcher, OutStream, Result, Scheme,
    SUPPORTED_COMMANDS, TlsConfig,
};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

fn cmd_help(cli: &mut Cli, args: &[String]) -> Result<()> {
    writeln!(cli.out(), "Usage: stevedore [OPTIONS] COMMAND [arg...]")?;
    if !args.is_empty() {
        writeln!(cli.out(), "help for: {}", args.join(" "))?;
    }
    Ok(())
}

fn cmd_ps(cli: &mut Cli, args: &[String]) -> Result<()> {
    let flags = cli
        .subcmd("ps", "", "List containers")
        .flag_bool("all", Some('a'), "Show all containers");
    let matches = flags.parse(cli, args);
    writeln!(cli.out(), "ps all={}", matches.get_flag("all"))?;
    Ok(())
}

fn cmd_login(cli: &mut Cli, _args: &[String]) -> Result<()> {
    match cli.config_file() {
        Some(config) if !config.is_empty() => {
            writeln!(cli.out(), "already logged in")?;
            Ok(())
        }
        _ => Err(CliError::command("no credentials loaded")),
    }
}

fn dispatcher() -> Dispatcher {
    let registry = CommandRegistry::builder()
        .command("help", cmd_help)
        .command("ps", cmd_ps)
        .command("login", cmd_login)
        .build();
    Dispatcher::new(registry)
}

fn buffer_cli(out: &SharedBuf, err: &SharedBuf) -> Cli {
    Cli::new(
        None,
        OutStream::from_writer(out.clone()),
        Some(OutStream::from_writer(err.clone())),
        "tcp",
        "127.0.0.1:4243",
        None,
    )
}

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_ps_receives_tail_arguments_and_parses_flags() {
    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);

    dispatcher().dispatch(&mut cli, &args(&["ps", "-a"])).unwrap();
    assert_eq!(out.contents(), "ps all=true\n");
}

#[test]
fn test_empty_invocation_falls_back_to_help() {
    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);

    dispatcher().dispatch(&mut cli, &[]).unwrap();
    assert_eq!(
        out.contents(),
        "Usage: stevedore [OPTIONS] COMMAND [arg...]\n"
    );
}

#[test]
fn test_unknown_command_diagnoses_then_helps_with_tail() {
    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);

    dispatcher()
        .dispatch(&mut cli, &args(&["bogus", "x", "y"]))
        .unwrap();

    let output = out.contents();
    assert!(output.starts_with("Error: Command not found: bogus\n"));
    assert!(output.contains("help for: x y"));
    assert_eq!(err.contents(), "");
}

#[test]
fn test_credentials_flow_from_home_into_a_handler() {
    let home = tempfile::tempdir().unwrap();
    let mut config = ConfigFile::default();
    config.set_auth(
        "https://registry.example.com/v1/",
        AuthConfig::new("user", "secret", None::<&str>),
    );
    config.save(home.path()).unwrap();

    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);

    // Without loaded credentials the handler fails through the dispatch
    // contract.
    let result = dispatcher().dispatch(&mut cli, &args(&["login"]));
    assert!(matches!(result, Err(CliError::Command { .. })));

    cli.load_config_from(home.path()).unwrap();
    dispatcher().dispatch(&mut cli, &args(&["login"])).unwrap();
    assert!(out.contents().contains("already logged in"));
}

#[test]
fn test_tls_presence_switches_scheme() {
    let cli = Cli::new(
        None,
        OutStream::from_writer(Vec::new()),
        None,
        "tcp",
        "127.0.0.1:4243",
        Some(TlsConfig {
            ca_file: Some("/etc/stevedore/ca.pem".to_string()),
            ..TlsConfig::default()
        }),
    );
    assert_eq!(cli.scheme(), Scheme::Https);
    assert_eq!(cli.scheme().as_str(), "https");
}

#[test]
fn test_every_supported_command_is_dispatchable_when_registered() {
    fn cmd_echo(cli: &mut Cli, args: &[String]) -> Result<()> {
        writeln!(cli.out(), "ran:{}", args.join(","))?;
        Ok(())
    }

    let mut builder = CommandRegistry::builder();
    for name in SUPPORTED_COMMANDS {
        builder = builder.command(name, cmd_echo);
    }
    let dispatcher = Dispatcher::new(builder.build());

    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);
    for name in SUPPORTED_COMMANDS {
        dispatcher
            .dispatch(&mut cli, &args(&[name, "arg1"]))
            .unwrap();
    }

    let output = out.contents();
    assert_eq!(output.matches("ran:arg1\n").count(), SUPPORTED_COMMANDS.len());
    assert!(!output.contains("Command not found"));
}
