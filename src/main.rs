// src/main.rs

//! Interactive demo host for the debug console.
//!
//! By default the console talks over this process's own terminal. With
//! `--pty` it opens a pseudo-terminal instead and prints the device path to
//! attach to, e.g. `screen /dev/pts/7`.

use debug_console::transport::{PtyTransport, StdioTransport};
use debug_console::{Console, ConsoleConfig, Transport};

use anyhow::Context;
use log::{info, warn};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Environment variable naming an optional JSON config file.
const CONFIG_ENV_VAR: &str = "DEBUG_CONSOLE_CONFIG";
const DEFAULT_LIST_COMMAND: &str = "ls";
const PUMP_INTERVAL: Duration = Duration::from_micros(250);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config = load_config()?;
    let use_pty = std::env::args().skip(1).any(|arg| arg == "--pty");

    if use_pty {
        let pty = PtyTransport::open().context("Failed to open pty transport")?;
        println!("Opened PTS {}", pty.slave_path());
        println!(" - Run \"screen {}\" to connect", pty.slave_path());
        println!(" - Type \"exit\" in the console to quit");
        run(pty, &config)
    } else {
        let mut stdio = StdioTransport::new().context("Failed to set up stdio transport")?;
        stdio.write_bytes(b"debug console ready, press Enter for a prompt\r\n");
        stdio.flush();
        run(stdio, &config)
    }
}

fn load_config() -> anyhow::Result<ConsoleConfig> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => {
            let config = ConsoleConfig::load(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?;
            info!("Configuration loaded from {:?}.", path);
            Ok(config)
        }
        None => {
            info!("{} not set, using default configuration.", CONFIG_ENV_VAR);
            Ok(ConsoleConfig::default())
        }
    }
}

fn run<T: Transport>(transport: T, config: &ConsoleConfig) -> anyhow::Result<()> {
    let mut console = Console::with_config(transport, config);

    let running = Rc::new(Cell::new(true));
    let exit_flag = Rc::clone(&running);
    let _exit = console.register("exit", move |ctx, _args| {
        ctx.puts("bye\n");
        exit_flag.set(false);
    })?;

    let _echo = console.register("echo", |ctx, args| {
        let words: Vec<&str> = args.iter().skip(1).collect();
        ctx.puts(&words.join(" "));
        ctx.newline();
    })?;

    let list_name = config
        .list_command
        .as_deref()
        .unwrap_or(DEFAULT_LIST_COMMAND);
    let _list = match console.register_list_command(list_name) {
        Ok(command) => Some(command),
        Err(e) => {
            warn!("Built-in list command not registered: {}", e);
            None
        }
    };

    info!("Commands registered: {:?}", console.command_names());
    info!("Starting pump loop...");
    while running.get() {
        console.pump();
        std::thread::sleep(PUMP_INTERVAL);
    }

    info!("Exit requested. Shutting down.");
    Ok(())
}
