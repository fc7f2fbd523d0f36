// src/console/state.rs

//! The pump state machine.
//!
//! Each call to [`Console::pump`] runs exactly one state's transition
//! function. Reading states consume at most a small fixed quantum of bytes
//! so a burst of input can never monopolise the host loop.

use super::{Console, ConsoleFlags};
use crate::escape::{AbortReason, EscapeStep, ESC};
use crate::registry::CommandContext;
use crate::term::{Mode, Terminal};
use crate::transport::Transport;
use log::{debug, trace};

/// Bytes consumed per pump while reading a line.
pub const INPUT_QUANTUM: usize = 8;
/// Bytes consumed per pump while reading an escape sequence.
pub const ESCAPE_QUANTUM: usize = 8;

const NUL: u8 = 0x00;
const BS: u8 = 0x08;
const CR: u8 = 0x0D;
const DEL: u8 = 0x7F;
const LAST_C0: u8 = 0x1F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing has been received yet; no prompt has been written.
    WaitForClient,
    StartNewCommand,
    ReadInput,
    ReadEscapeSequence,
    ParseEscapeSequence,
    ParseInput,
}

impl<T: Transport> Console<T> {
    /// Performs one bounded step of work. Call this repeatedly from the host
    /// loop; matched command callbacks run synchronously inside it.
    pub fn pump(&mut self) {
        let next = match self.state {
            State::WaitForClient => self.wait_for_client(),
            State::StartNewCommand => self.start_new_command(),
            State::ReadInput => self.read_input(),
            State::ReadEscapeSequence => self.read_escape_sequence(),
            State::ParseEscapeSequence => self.parse_escape_sequence(),
            State::ParseInput => self.parse_input(),
        };
        if next != self.state {
            trace!("console state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
        self.transport.flush();
    }

    /// Next input byte, replaying the lookahead slot first.
    fn read_raw(&mut self) -> Option<u8> {
        self.snoop.take().or_else(|| self.transport.read_byte())
    }

    fn wait_for_client(&mut self) -> State {
        match self.read_raw() {
            Some(byte) => {
                debug!("first input byte received, starting session");
                self.snoop = Some(byte);
                State::StartNewCommand
            }
            None => State::WaitForClient,
        }
    }

    fn start_new_command(&mut self) -> State {
        self.line.clear();
        self.args.clear();
        let prompt = self.prompt.as_deref().unwrap_or(super::DEFAULT_PROMPT);
        Terminal::new(&mut self.transport, self.mode).put_str(prompt);
        State::ReadInput
    }

    fn read_input(&mut self) -> State {
        for _ in 0..INPUT_QUANTUM {
            let Some(byte) = self.read_raw() else {
                break;
            };
            match byte {
                CR => {
                    self.term().newline();
                    return State::ParseInput;
                }
                NUL => {}
                BS | DEL => {
                    if self.line.backspace() {
                        self.term().backspace();
                    }
                }
                ESC => {
                    self.snoop = Some(byte);
                    self.escape.reset();
                    return State::ReadEscapeSequence;
                }
                b if b > LAST_C0 => {
                    if self.line.push(b) && self.flags.contains(ConsoleFlags::LOCAL_ECHO) {
                        self.term().put_char(b);
                    }
                }
                _ => trace!("ignoring control byte {:#04x}", byte),
            }
        }
        State::ReadInput
    }

    fn read_escape_sequence(&mut self) -> State {
        for _ in 0..ESCAPE_QUANTUM {
            let Some(byte) = self.read_raw() else {
                break;
            };
            match self.escape.feed(byte) {
                EscapeStep::Pending => {}
                EscapeStep::Complete(kind) => {
                    trace!("recognized {:?} escape sequence {:X?}", kind, self.escape.bytes());
                    return State::ParseEscapeSequence;
                }
                EscapeStep::Abort(reason) => {
                    if let AbortReason::Overflow(replay) = reason {
                        self.snoop = Some(replay);
                    }
                    debug!(
                        "abandoning escape sequence ({:?}), flushing {} byte(s)",
                        reason,
                        self.escape.len()
                    );
                    Terminal::new(&mut self.transport, self.mode).put_raw(self.escape.bytes());
                    self.escape.reset();
                    return State::ReadInput;
                }
            }
        }
        State::ReadEscapeSequence
    }

    fn parse_escape_sequence(&mut self) -> State {
        match self.mode {
            Mode::Ansi => self.interpret_ansi_escape(),
        }
    }

    /// Hook for acting on recognized ANSI sequences (arrow keys and the
    /// like). Sequences are currently swallowed.
    fn interpret_ansi_escape(&mut self) -> State {
        trace!("ignoring ANSI escape sequence {:X?}", self.escape.bytes());
        State::ReadInput
    }

    fn parse_input(&mut self) -> State {
        self.args.tokenize(self.line.as_bytes());
        let args = self.args.view(self.line.as_bytes());

        let Some(name) = args.get_bytes(0) else {
            return State::StartNewCommand;
        };

        let callback = self.registry.borrow().callback(name);
        let mut term = Terminal::new(&mut self.transport, self.mode);
        match callback {
            Some(callback) => {
                debug!(
                    "dispatching '{}' with {} argument(s)",
                    String::from_utf8_lossy(name),
                    args.len()
                );
                let mut ctx = CommandContext::new(term, &self.registry);
                let mut callback = callback.borrow_mut();
                (&mut *callback)(&mut ctx, &args);
            }
            None => {
                debug!("command '{}' not found", String::from_utf8_lossy(name));
                term.put_char(b'\'');
                term.put_bytes(name);
                term.put_str("' not found\n");
            }
        }
        State::StartNewCommand
    }
}
