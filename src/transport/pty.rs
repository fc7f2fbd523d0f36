// src/transport/pty.rs

//! Pseudo-terminal transport.
//!
//! Opens the master side of a fresh pty and leaves the slave side for a
//! terminal program (`screen /dev/pts/N`, `picocom`, ...) to attach to, which
//! makes it easy to poke at a console without real serial hardware.

use super::Transport;
use anyhow::{Context, Result};
use log::{debug, info, trace};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::pty::{grantpt, posix_openpt, ptsname_r, unlockpt, PtyMaster};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::io::{AsFd, AsRawFd};

pub struct PtyTransport {
    master: PtyMaster,
    slave_path: String,
}

impl PtyTransport {
    /// Opens, grants and unlocks a new pty master in non-blocking mode.
    pub fn open() -> Result<Self> {
        let master = posix_openpt(OFlag::O_RDWR | OFlag::O_NOCTTY)
            .context("Failed to create pseudoterminal (posix_openpt)")?;
        grantpt(&master).context("Failed to set pty permissions (grantpt)")?;
        unlockpt(&master).context("Failed to unlock pty (unlockpt)")?;
        let slave_path = ptsname_r(&master).context("Failed to get pts name (ptsname_r)")?;

        set_fd_nonblocking(&master)?;

        info!("PtyTransport: opened {}", slave_path);
        Ok(Self { master, slave_path })
    }

    /// Path of the slave device a terminal program should connect to.
    pub fn slave_path(&self) -> &str {
        &self.slave_path
    }
}

fn set_fd_nonblocking<Fd: AsFd>(fd: Fd) -> Result<()> {
    let raw_fd = fd.as_fd().as_raw_fd();
    let flags = fcntl(fd.as_fd(), FcntlArg::F_GETFL)
        .with_context(|| format!("Failed to get FD flags for pty master {}", raw_fd))?;
    let mut non_blocking_flags = OFlag::from_bits_truncate(flags);
    non_blocking_flags.insert(OFlag::O_NONBLOCK);
    fcntl(fd.as_fd(), FcntlArg::F_SETFL(non_blocking_flags))
        .with_context(|| format!("Failed to set pty master {} non-blocking", raw_fd))?;
    debug!("PtyTransport: fd {} set to O_NONBLOCK", raw_fd);
    Ok(())
}

impl Transport for PtyTransport {
    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.master.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            Ok(_) => None,
            Err(e) if e.kind() == ErrorKind::WouldBlock => None,
            Err(e) => {
                // Linux reports EIO on the master until a client opens the slave.
                trace!("PtyTransport: read error {:?}, treating as no data", e);
                None
            }
        }
    }

    fn write_byte(&mut self, byte: u8) {
        if let Err(e) = self.master.write_all(&[byte]) {
            trace!("PtyTransport: dropped output byte {:#04x}: {:?}", byte, e);
        }
    }
}
