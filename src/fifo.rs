//! Named-pipe setup. The core only sees opened `File` handles; creating and
//! naming the channel happens here, once, before a transfer.

use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;
use tracing::info;

/// Create the FIFO if it does not exist yet. An already-present pipe is
/// reused as-is.
pub fn ensure_fifo(path: &Path) -> Result<()> {
    match mkfifo(path, Mode::from_bits_truncate(0o666)) {
        Ok(()) => {
            info!("created fifo at {}", path.display());
            Ok(())
        }
        Err(Errno::EEXIST) => Ok(()),
        Err(err) => Err(err).with_context(|| format!("mkfifo {}", path.display())),
    }
}

/// Open the FIFO for reading. Blocks until a writer opens the other end.
pub fn open_reader(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("opening fifo {} for reading", path.display()))
}

/// Open the FIFO for writing. Blocks until a reader opens the other end.
pub fn open_writer(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .open(path)
        .with_context(|| format!("opening fifo {} for writing", path.display()))
}
