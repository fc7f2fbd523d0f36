// src/line.rs

//! Fixed-capacity line buffer and whitespace tokenizer.
//!
//! Both containers are sized once at console construction and never grow:
//! bytes past the line capacity and tokens past the argument capacity are
//! dropped without any signal.

use log::trace;
use std::ops::Range;

/// Smallest accepted line capacity.
pub(crate) const MIN_LINE_LENGTH: usize = 16;
/// Smallest accepted argument capacity.
pub(crate) const MIN_ARG_COUNT: usize = 1;

#[inline]
fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

#[derive(Debug, Clone)]
pub(crate) struct LineBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl LineBuffer {
    /// Creates an empty buffer, clamping `capacity` up to [`MIN_LINE_LENGTH`].
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_LINE_LENGTH);
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a byte. Returns `false` (and drops the byte) when full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.buf.len() >= self.capacity {
            trace!("line buffer full, dropping {:#04x}", byte);
            return false;
        }
        self.buf.push(byte);
        true
    }

    /// Removes the last byte. Returns `false` if the line was already empty.
    pub fn backspace(&mut self) -> bool {
        self.buf.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// Token positions captured from the most recent line.
#[derive(Debug, Clone)]
pub(crate) struct ArgSlots {
    spans: Vec<Range<usize>>,
    capacity: usize,
}

impl ArgSlots {
    /// Creates empty slots, clamping `capacity` up to [`MIN_ARG_COUNT`].
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_ARG_COUNT);
        Self {
            spans: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Splits `line` into at most `capacity` whitespace-separated tokens.
    ///
    /// Runs of separators collapse. Once the slots are full the rest of the
    /// line is ignored, leaving the captured tokens untouched.
    pub fn tokenize(&mut self, line: &[u8]) {
        self.spans.clear();
        let mut pos = 0;
        while self.spans.len() < self.capacity {
            let Some(start) = line[pos..].iter().position(|&b| !is_separator(b)) else {
                break;
            };
            let start = pos + start;
            let end = line[start..]
                .iter()
                .position(|&b| is_separator(b))
                .map_or(line.len(), |n| start + n);
            self.spans.push(start..end);
            pos = end;
        }
        trace!("tokenized {} argument(s)", self.spans.len());
    }

    /// Borrows the captured tokens as an [`Args`] view over `line`.
    pub fn view<'a>(&'a self, line: &'a [u8]) -> Args<'a> {
        Args {
            line,
            spans: &self.spans,
        }
    }
}

/// The tokens of one dispatched command line. Argument 0 is the command name.
///
/// Tokens are raw bytes; [`Args::get`] and [`Args::iter`] expose them as
/// `&str`, substituting an empty string for any token that is not valid
/// UTF-8.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    line: &'a [u8],
    spans: &'a [Range<usize>],
}

impl<'a> Args<'a> {
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn get_bytes(&self, index: usize) -> Option<&'a [u8]> {
        self.spans
            .get(index)
            .and_then(|span| self.line.get(span.clone()))
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.get_bytes(index)
            .map(|bytes| std::str::from_utf8(bytes).unwrap_or(""))
    }

    /// The command name, if the line had any tokens.
    pub fn command(&self) -> Option<&'a str> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + 'a {
        let args = *self;
        (0..self.len()).filter_map(move |index| args.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &[u8], max_args: usize) -> Vec<String> {
        let mut slots = ArgSlots::new(max_args);
        slots.tokenize(line);
        slots.view(line).iter().map(str::to_owned).collect()
    }

    #[test]
    fn capacities_are_clamped_to_minimums() {
        assert_eq!(LineBuffer::new(0).capacity(), MIN_LINE_LENGTH);
        assert_eq!(LineBuffer::new(80).capacity(), 80);
        assert_eq!(ArgSlots::new(0).capacity(), MIN_ARG_COUNT);
    }

    #[test]
    fn push_drops_bytes_once_full() {
        let mut line = LineBuffer::new(16);
        for b in b'a'..b'a' + 16 {
            assert!(line.push(b));
        }
        assert!(!line.push(b'z'));
        assert_eq!(line.len(), 16);
        assert_eq!(line.as_bytes().last(), Some(&(b'a' + 15)));
    }

    #[test]
    fn backspace_on_empty_line_is_a_no_op() {
        let mut line = LineBuffer::new(16);
        assert!(!line.backspace());
        line.push(b'x');
        assert!(line.backspace());
        assert!(line.is_empty());
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(
            tokens(b"cmd_1 arg_1 arg_2     arg_3", 6),
            ["cmd_1", "arg_1", "arg_2", "arg_3"]
        );
    }

    #[test]
    fn leading_and_trailing_whitespace_is_ignored() {
        assert_eq!(tokens(b" \t ls  -l \t", 4), ["ls", "-l"]);
    }

    #[test]
    fn blank_lines_yield_no_tokens() {
        assert!(tokens(b"", 4).is_empty());
        assert!(tokens(b"    \t  ", 4).is_empty());
    }

    #[test]
    fn extra_tokens_past_capacity_are_discarded() {
        assert_eq!(tokens(b"set a b c d", 3), ["set", "a", "b"]);
        assert_eq!(tokens(b"one two", 1), ["one"]);
    }

    #[test]
    fn retokenizing_replaces_previous_tokens() {
        let mut slots = ArgSlots::new(4);
        slots.tokenize(b"a b c");
        slots.tokenize(b"d");
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.view(b"d").command(), Some("d"));
    }

    #[test]
    fn invalid_utf8_tokens_read_as_empty_strings() {
        let line = b"raw \xff\xfe";
        let mut slots = ArgSlots::new(4);
        slots.tokenize(line);
        let args = slots.view(line);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(1), Some(""));
        assert_eq!(args.get_bytes(1), Some(&b"\xff\xfe"[..]));
        assert_eq!(args.get(2), None);
    }

    #[test]
    fn view_over_a_shorter_line_yields_no_token() {
        let mut slots = ArgSlots::new(4);
        slots.tokenize(b"hello world");
        let args = slots.view(b"h");
        assert_eq!(args.get(1), None);
        assert_eq!(args.get_bytes(0), None);
        assert_eq!(args.iter().count(), 0);
    }
}
