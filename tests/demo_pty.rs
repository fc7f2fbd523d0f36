// tests/demo_pty.rs

//! Drives the demo binary through a real pseudo-terminal.

use rexpect::session::spawn_command;
use std::process::Command;

const TIMEOUT_MS: u64 = 10_000;

#[test]
fn demo_binary_dispatches_typed_commands() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_debug-console"));
    cmd.env("RUST_LOG", "off");
    let mut session = spawn_command(cmd, Some(TIMEOUT_MS)).expect("spawn demo");

    session.exp_string("debug console ready").expect("ready banner");

    session.send("echo hello pty\r").expect("send echo");
    session.flush().expect("flush");
    // The typed line is echoed too, so match on the command's own output line.
    session.exp_string("\r\nhello pty\r\n").expect("echo output");

    session.send("bogus\r").expect("send bogus");
    session.flush().expect("flush");
    session.exp_string("'bogus' not found").expect("not found message");

    session.send("exit\r").expect("send exit");
    session.flush().expect("flush");
    session.exp_string("bye").expect("goodbye");
    session.exp_eof().expect("process exits");
}
