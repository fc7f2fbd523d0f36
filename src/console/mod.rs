// src/console/mod.rs

//! The console engine: owns the buffers and the registry, and exposes the
//! host-facing API. The byte-level state machine lives in `state.rs`.

mod state;

pub use state::State;

use crate::builtins;
use crate::config::ConsoleConfig;
use crate::error::Result;
use crate::escape::EscapeDecoder;
use crate::line::{ArgSlots, Args, LineBuffer};
use crate::registry::{self, Command, CommandContext, CommandId, Registry};
use crate::term::{Mode, Terminal};
use crate::transport::Transport;
use bitflags::bitflags;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Prompt written when no custom prompt is set.
pub const DEFAULT_PROMPT: &str = " # ";

bitflags! {
    /// Behaviour switches applied with [`Console::configure`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ConsoleFlags: u8 {
        /// Echo accepted input bytes back to the terminal.
        const LOCAL_ECHO = 1 << 0;
    }
}

impl Default for ConsoleFlags {
    fn default() -> Self {
        ConsoleFlags::LOCAL_ECHO
    }
}

/// A debug console bound to one transport.
///
/// Not thread-safe: pump it, register commands and drop it from a single
/// task.
pub struct Console<T> {
    registry: Rc<RefCell<Registry>>,
    line: LineBuffer,
    args: ArgSlots,
    transport: T,
    snoop: Option<u8>,
    state: State,
    escape: EscapeDecoder,
    flags: ConsoleFlags,
    mode: Mode,
    prompt: Option<String>,
}

impl<T: Transport> Console<T> {
    /// Creates a console with no commands, in ANSI mode with local echo on.
    ///
    /// `max_line_length` is raised to at least 16 and `max_arg_count` to at
    /// least 1. All buffers are allocated here; pumping never allocates.
    pub fn new(transport: T, max_line_length: usize, max_arg_count: usize) -> Self {
        let line = LineBuffer::new(max_line_length);
        let args = ArgSlots::new(max_arg_count);
        debug!(
            "console created: line capacity {}, arg capacity {}",
            line.capacity(),
            args.capacity()
        );
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            line,
            args,
            transport,
            snoop: None,
            state: State::WaitForClient,
            escape: EscapeDecoder::new(),
            flags: ConsoleFlags::default(),
            mode: Mode::default(),
            prompt: None,
        }
    }

    /// Creates a console from a [`ConsoleConfig`]. The config's
    /// `list_command` is left to the caller, who has to own the handle.
    pub fn with_config(transport: T, config: &ConsoleConfig) -> Self {
        let mut console = Self::new(transport, config.max_line_length, config.max_arg_count);
        let mut flags = ConsoleFlags::empty();
        flags.set(ConsoleFlags::LOCAL_ECHO, config.local_echo);
        console.configure(config.mode, flags);
        if let Some(prompt) = &config.prompt {
            console.set_prompt(prompt);
        }
        console
    }

    pub fn configure(&mut self, mode: Mode, flags: ConsoleFlags) {
        debug!("console configured: mode {:?}, flags {:?}", mode, flags);
        self.mode = mode;
        self.flags = flags;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn flags(&self) -> ConsoleFlags {
        self.flags
    }

    /// Registers `callback` under `name`.
    ///
    /// The returned handle keeps the command registered until it is dropped
    /// or [`Command::unregister`] is called. Fails if `name` is taken.
    pub fn register<F>(&self, name: &str, callback: F) -> Result<Command>
    where
        F: FnMut(&mut CommandContext<'_>, &Args<'_>) + 'static,
    {
        registry::register(&self.registry, name, callback)
    }

    /// Registers the built-in command that lists every registered command.
    pub fn register_list_command(&self, name: &str) -> Result<Command> {
        self.register(name, builtins::list_commands)
    }

    pub fn find(&self, name: &str) -> Option<CommandId> {
        self.registry.borrow().find(name.as_bytes())
    }

    /// Registered command names, in registration order.
    pub fn command_names(&self) -> Vec<String> {
        self.registry.borrow().names().map(str::to_owned).collect()
    }

    /// Replaces the prompt with a copy of `prompt` and returns the copy.
    pub fn set_prompt(&mut self, prompt: &str) -> &str {
        self.prompt.insert(prompt.to_owned())
    }

    /// Reverts to [`DEFAULT_PROMPT`].
    pub fn clear_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    /// Writes one byte through the translating output path.
    pub fn putc(&mut self, byte: u8) {
        self.term().put_char(byte);
    }

    /// Writes a string through the translating output path.
    pub fn puts(&mut self, s: &str) {
        self.term().put_str(s);
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The partially typed line.
    pub fn line(&self) -> &[u8] {
        self.line.as_bytes()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn term(&mut self) -> Terminal<'_> {
        Terminal::new(&mut self.transport, self.mode)
    }
}

impl<T> Drop for Console<T> {
    fn drop(&mut self) {
        let mut registry = self.registry.borrow_mut();
        debug!("console dropped, detaching {} command(s)", registry.len());
        registry.detach_all();
    }
}
