// src/term.rs

//! Terminal output adapter.
//!
//! Everything user-facing (prompts, echoed input, "not found" messages,
//! command output) goes through the translating path, which turns a logical
//! newline or backspace into the byte sequence the terminal mode expects.
//! The raw path is only used to flush the bytes of an abandoned escape
//! sequence back out unmodified.

use crate::transport::Transport;
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const NEWLINE: u8 = b'\n';
pub(crate) const BACKSPACE: u8 = 0x08;

const ANSI_NEWLINE: &[u8] = b"\r\n";
const ANSI_BACKSPACE: &[u8] = b"\x08 \x08";

/// Control sequence standard spoken by the attached terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Ansi,
}

/// Short-lived writer over a transport, borrowed for the duration of one
/// pump step or one command callback.
pub struct Terminal<'a> {
    transport: &'a mut dyn Transport,
    mode: Mode,
}

impl<'a> Terminal<'a> {
    pub(crate) fn new(transport: &'a mut dyn Transport, mode: Mode) -> Self {
        Self { transport, mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Writes one byte through the translating path.
    pub fn put_char(&mut self, byte: u8) {
        match byte {
            NEWLINE => self.newline(),
            BACKSPACE => self.backspace(),
            _ => self.transport.write_byte(byte),
        }
    }

    /// Writes a byte string through the translating path.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.put_char(byte);
        }
    }

    pub fn put_str(&mut self, s: &str) {
        self.put_bytes(s.as_bytes());
    }

    pub fn newline(&mut self) {
        match self.mode {
            Mode::Ansi => self.transport.write_bytes(ANSI_NEWLINE),
        }
    }

    /// Visually erases the column left of the cursor.
    pub fn backspace(&mut self) {
        match self.mode {
            Mode::Ansi => self.transport.write_bytes(ANSI_BACKSPACE),
        }
    }

    pub(crate) fn put_raw(&mut self, bytes: &[u8]) {
        self.transport.write_bytes(bytes);
    }
}

impl fmt::Write for Terminal<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use std::fmt::Write as _;

    fn translated(bytes: &[u8]) -> Vec<u8> {
        let mut mock = MockTransport::new();
        Terminal::new(&mut mock, Mode::Ansi).put_bytes(bytes);
        mock.take_output()
    }

    #[test]
    fn newline_becomes_cr_lf() {
        assert_eq!(translated(b"a\nb"), b"a\r\nb");
    }

    #[test]
    fn backspace_erases_one_column() {
        assert_eq!(translated(b"\x08"), b"\x08 \x08");
    }

    #[test]
    fn other_bytes_pass_through() {
        let all: Vec<u8> = (0u8..=255).filter(|b| *b != NEWLINE && *b != BACKSPACE).collect();
        assert_eq!(translated(&all), all);
    }

    #[test]
    fn raw_path_does_not_translate() {
        let mut mock = MockTransport::new();
        Terminal::new(&mut mock, Mode::Ansi).put_raw(b"\x1b\n\x08");
        assert_eq!(mock.output(), b"\x1b\n\x08");
    }

    #[test]
    fn fmt_write_goes_through_translation() {
        let mut mock = MockTransport::new();
        {
            let mut term = Terminal::new(&mut mock, Mode::Ansi);
            writeln!(term, "uptime {}s", 42).unwrap();
        }
        assert_eq!(mock.output(), b"uptime 42s\r\n");
    }

    #[test]
    fn mode_deserializes_from_snake_case() {
        let mode: Mode = serde_json::from_str("\"ansi\"").unwrap();
        assert_eq!(mode, Mode::Ansi);
    }
}
