// src/transport/mod.rs

//! Byte transports the console reads from and writes to.
//!
//! The console never blocks, so every transport must return immediately:
//! `read_byte` yields `None` when nothing is pending and `write_byte`
//! either queues the byte or drops it.

pub mod mock;
pub mod pty;
pub mod stdio;

pub use mock::MockTransport;
pub use pty::PtyTransport;
pub use stdio::StdioTransport;

/// A non-blocking, byte-oriented duplex channel.
///
/// Whatever state the transport needs (file descriptors, ring buffers,
/// UART handles) lives in the implementing value itself.
pub trait Transport {
    /// Returns the next pending input byte, or `None` if there is none yet.
    fn read_byte(&mut self) -> Option<u8>;

    /// Writes one byte of output. Must not block.
    fn write_byte(&mut self, byte: u8);

    /// Writes a run of bytes.
    fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }

    /// Called once at the end of every pump. Buffered transports push
    /// pending output here; the default does nothing.
    fn flush(&mut self) {}
}

impl<T: Transport + ?Sized> Transport for &mut T {
    #[inline]
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }

    #[inline]
    fn flush(&mut self) {
        (**self).flush()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    #[inline]
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }

    #[inline]
    fn flush(&mut self) {
        (**self).flush()
    }
}

/// Returns a [`Transport`] built from a read closure and a write closure.
///
/// This suits hosts that already expose `getc`/`putc` style functions,
/// e.g. a UART driver's polling API.
pub fn transport_fn<R, W>(read: R, write: W) -> impl Transport
where
    R: FnMut() -> Option<u8>,
    W: FnMut(u8),
{
    TransportFn { read, write }
}

struct TransportFn<R, W> {
    read: R,
    write: W,
}

impl<R, W> Transport for TransportFn<R, W>
where
    R: FnMut() -> Option<u8>,
    W: FnMut(u8),
{
    #[inline(always)]
    fn read_byte(&mut self) -> Option<u8> {
        (self.read)()
    }

    #[inline(always)]
    fn write_byte(&mut self, byte: u8) {
        (self.write)(byte)
    }
}
