// src/escape.rs

//! Incremental recognizer for ANSI escape sequences typed at the console.
//!
//! The decoder only has to decide where a sequence ends so it can be kept
//! out of the line buffer. Bytes are collected into a fixed scratch buffer;
//! anything that cannot be recognized within that buffer is abandoned and
//! echoed back verbatim by the caller.

use log::trace;

/// Capacity of the escape scratch buffer, including the leading ESC.
pub const ESCAPE_BUFFER_SIZE: usize = 16;

pub(crate) const ESC: u8 = 0x1B;
const CAN: u8 = 0x18;
const SUB: u8 = 0x1A;
const CSI_INTRODUCER: u8 = b'[';

const SHORT_FINAL_RANGE: core::ops::RangeInclusive<u8> = 0x40..=0x5F;
const LONG_FINAL_RANGE: core::ops::RangeInclusive<u8> = 0x40..=0x7E;

/// Shape of a recognized sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKind {
    /// `ESC` followed by a single final byte in `0x40..=0x5F`.
    Short,
    /// Three or more bytes ending in a final byte in `0x40..=0x7E`. This is
    /// normally a CSI sequence (`ESC [ ...`).
    Long,
}

/// Why a sequence was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// CAN or SUB arrived mid-sequence. The cancelling byte is consumed.
    Cancelled,
    /// The scratch buffer filled up. The byte that did not fit must be
    /// replayed as ordinary input.
    Overflow(u8),
}

/// Outcome of feeding one byte to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeStep {
    /// More bytes are needed.
    Pending,
    /// A complete sequence sits in the scratch buffer.
    Complete(EscapeKind),
    /// The sequence was abandoned; the scratch buffer holds the bytes to
    /// flush back to the terminal.
    Abort(AbortReason),
}

#[derive(Debug, Clone)]
pub struct EscapeDecoder {
    buf: [u8; ESCAPE_BUFFER_SIZE],
    len: usize,
}

impl Default for EscapeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl EscapeDecoder {
    pub const fn new() -> Self {
        Self {
            buf: [0; ESCAPE_BUFFER_SIZE],
            len: 0,
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Bytes collected for the current (or just finished) sequence.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Feeds the next byte of a sequence. The first byte fed after a reset
    /// is expected to be the ESC itself.
    pub fn feed(&mut self, byte: u8) -> EscapeStep {
        if byte == CAN || byte == SUB {
            trace!("escape sequence cancelled by {:#04x}", byte);
            return EscapeStep::Abort(AbortReason::Cancelled);
        }

        if self.len >= ESCAPE_BUFFER_SIZE {
            trace!("escape buffer overflow at byte {:#04x}", byte);
            return EscapeStep::Abort(AbortReason::Overflow(byte));
        }

        let index = self.len;
        self.buf[index] = byte;
        self.len += 1;

        match index {
            0 => EscapeStep::Pending,
            1 if byte == CSI_INTRODUCER => EscapeStep::Pending,
            1 if SHORT_FINAL_RANGE.contains(&byte) => EscapeStep::Complete(EscapeKind::Short),
            1 => EscapeStep::Pending,
            _ if LONG_FINAL_RANGE.contains(&byte) => EscapeStep::Complete(EscapeKind::Long),
            _ => EscapeStep::Pending,
        }
    }
}
