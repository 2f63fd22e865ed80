use super::*;
use crate::context::OutStream;
use crate::error::CliError;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

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

fn cmd_help(cli: &mut Cli, args: &[String]) -> crate::error::Result<()> {
    writeln!(cli.out(), "help:{}", args.join(","))?;
    Ok(())
}

fn cmd_ps(cli: &mut Cli, args: &[String]) -> crate::error::Result<()> {
    writeln!(cli.out(), "ps:{}", args.join(","))?;
    Ok(())
}

fn cmd_wait(_cli: &mut Cli, _args: &[String]) -> crate::error::Result<()> {
    Err(CliError::command("no such container: web"))
}

fn dispatcher() -> Dispatcher {
    let registry = CommandRegistry::builder()
        .command("help", cmd_help)
        .command("ps", cmd_ps)
        .command("wait", cmd_wait)
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
fn test_dispatch_routes_tail_arguments_to_handler() {
    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);

    dispatcher().dispatch(&mut cli, &args(&["ps", "-a"])).unwrap();
    assert_eq!(out.contents(), "ps:-a\n");
    assert_eq!(err.contents(), "");
}

#[test]
fn test_dispatch_is_case_insensitive_on_the_command_token() {
    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);

    dispatcher().dispatch(&mut cli, &args(&["PS", "-a", "-q"])).unwrap();
    assert_eq!(out.contents(), "ps:-a,-q\n");
}

#[test]
fn test_dispatch_empty_invocation_runs_help_with_no_arguments() {
    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);

    dispatcher().dispatch(&mut cli, &[]).unwrap();
    assert_eq!(out.contents(), "help:\n");
}

#[test]
fn test_dispatch_empty_invocation_matches_explicit_help() {
    let (out1, err1) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out1, &err1);
    dispatcher().dispatch(&mut cli, &[]).unwrap();

    let (out2, err2) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out2, &err2);
    dispatcher().dispatch(&mut cli, &args(&["help"])).unwrap();

    assert_eq!(out1.contents(), out2.contents());
}

#[test]
fn test_dispatch_unknown_command_reports_and_falls_back_to_help() {
    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);

    dispatcher()
        .dispatch(&mut cli, &args(&["bogus", "x", "y"]))
        .unwrap();

    let output = out.contents();
    assert!(output.contains("Error: Command not found: bogus"));
    // Help receives only the tail arguments, not the full vector.
    assert!(output.contains("help:x,y"));
    // The diagnostic goes to the output channel, not the error channel.
    assert_eq!(err.contents(), "");
}

#[test]
fn test_dispatch_empty_token_is_treated_as_unknown() {
    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);

    dispatcher().dispatch(&mut cli, &args(&["", "x"])).unwrap();
    let output = out.contents();
    assert!(output.contains("Error: Command not found: "));
    assert!(output.contains("help:x"));
}

#[test]
fn test_dispatch_propagates_handler_failure_unchanged() {
    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);

    let result = dispatcher().dispatch(&mut cli, &args(&["wait", "web"]));
    match result {
        Err(CliError::Command { message, .. }) => {
            assert_eq!(message, "no such container: web");
        }
        other => panic!("Expected Command error, got {other:?}"),
    }
}

#[test]
fn test_dispatch_supported_but_unregistered_command_falls_back() {
    let (out, err) = (SharedBuf::default(), SharedBuf::default());
    let mut cli = buffer_cli(&out, &err);

    dispatcher().dispatch(&mut cli, &args(&["build", "."])).unwrap();
    let output = out.contents();
    assert!(output.contains("Error: Command not found: build"));
    assert!(output.contains("help:."));
}
