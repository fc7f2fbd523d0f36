// src/transport/stdio.rs

use super::Transport;
use anyhow::{Context, Result};
use libc::STDIN_FILENO;
use log::{debug, error, trace, warn};
use std::io::{self, Read, Stdout, Write};
use termios::{tcsetattr, Termios, ECHO, ICANON, ISIG, TCSANOW, VMIN, VTIME};

/// Transport over the process's own stdin/stdout.
///
/// Stdin is switched to raw mode with `VMIN = VTIME = 0`, so reads return
/// immediately when nothing has been typed. The original terminal settings
/// are restored on drop.
pub struct StdioTransport {
    original_termios: Option<Termios>,
    stdout: Stdout,
}

impl StdioTransport {
    pub fn new() -> Result<Self> {
        let original_termios = match Termios::from_fd(STDIN_FILENO) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!(
                    "StdioTransport: failed to get initial termios: {}. Proceeding without raw mode.",
                    e
                );
                None
            }
        };

        if let Some(ref ots) = original_termios {
            let mut raw_termios = *ots;
            raw_termios.c_lflag &= !(ECHO | ICANON | ISIG);
            raw_termios.c_iflag &=
                !(libc::IXON | libc::IXOFF | libc::ICRNL | libc::INLCR | libc::IGNCR);
            raw_termios.c_oflag &= !libc::OPOST;
            raw_termios.c_cc[VMIN] = 0;
            raw_termios.c_cc[VTIME] = 0;
            tcsetattr(STDIN_FILENO, TCSANOW, &raw_termios)
                .context("StdioTransport: failed to set raw terminal attributes")?;
            debug!("StdioTransport: terminal set to raw mode.");
        }

        Ok(Self {
            original_termios,
            stdout: io::stdout(),
        })
    }

    fn restore(&mut self) -> Result<()> {
        if let Some(original_termios) = self.original_termios.take() {
            debug!("StdioTransport: restoring original terminal attributes.");
            tcsetattr(STDIN_FILENO, TCSANOW, &original_termios)
                .context("StdioTransport: failed to restore original terminal attributes")?;
        }
        Ok(())
    }
}

impl Transport for StdioTransport {
    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match io::stdin().lock().read(&mut buf) {
            Ok(1) => Some(buf[0]),
            Ok(_) => None,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => None,
            Err(e) => {
                trace!("StdioTransport: read error {:?}, treating as no data", e);
                None
            }
        }
    }

    fn write_byte(&mut self, byte: u8) {
        if let Err(e) = self.stdout.write_all(&[byte]) {
            trace!("StdioTransport: dropped output byte {:#04x}: {:?}", byte, e);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.stdout.flush() {
            trace!("StdioTransport: flush failed: {:?}", e);
        }
    }
}

impl Drop for StdioTransport {
    fn drop(&mut self) {
        Transport::flush(self);
        if let Err(e) = self.restore() {
            error!("StdioTransport: error during cleanup in drop: {:#}", e);
        }
    }
}
