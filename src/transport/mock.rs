// src/transport/mock.rs

use super::Transport;
use std::collections::VecDeque;

/// In-memory transport with a scripted input queue and captured output.
///
/// Reads drain the queue and then report "nothing pending" forever, which is
/// exactly what a quiet serial line looks like to the console.
#[derive(Debug, Default, Clone)]
pub struct MockTransport {
    input: VecDeque<u8>,
    output: Vec<u8>,
    reads: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(bytes: &[u8]) -> Self {
        let mut mock = Self::new();
        mock.push_input(bytes);
        mock
    }

    /// Queues bytes to be returned by subsequent reads.
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    /// Number of input bytes not yet consumed.
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Number of bytes handed out by `read_byte` so far.
    pub fn bytes_read(&self) -> usize {
        self.reads
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Returns everything written so far and clears the capture buffer.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }
}

impl Transport for MockTransport {
    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.input.pop_front()?;
        self.reads += 1;
        Some(byte)
    }

    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }
}
