use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{Transport, TransportError, TransportResult};

pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 50;

/// Writes each frame to a well-known byte-stream channel.
///
/// On Windows this is the named pipe `\\.\pipe\<name>`; elsewhere a local
/// socket `<dir>/<name>`. Opening fails fast when no reader exists.
///
/// The write timeout only applies to sockets. Pipes are opened for
/// synchronous writes, so a server that accepts but never reads can hold
/// the caller until the pipe buffer drains.
pub struct StreamTransport {
    name: String,
    path: PathBuf,
    /// Unused on Windows; see above.
    #[cfg_attr(windows, allow(dead_code))]
    write_timeout: Duration,
}

impl StreamTransport {
    /// `dir` is ignored on Windows, where pipes live in their own namespace.
    pub fn new(name: &str, dir: Option<&str>, write_timeout_ms: u64) -> StreamTransport {
        StreamTransport {
            name: name.to_owned(),
            path: channel_path(name, dir),
            write_timeout: Duration::from_millis(write_timeout_ms.max(1)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, source: io::Error) -> TransportError {
        TransportError::Unavailable {
            name: self.name.clone(),
            source,
        }
    }

    #[cfg(unix)]
    fn open(&self) -> TransportResult<std::os::unix::net::UnixStream> {
        let stream = std::os::unix::net::UnixStream::connect(&self.path)
            .map_err(|err| self.unavailable(err))?;
        stream.set_write_timeout(Some(self.write_timeout))?;
        Ok(stream)
    }

    #[cfg(windows)]
    fn open(&self) -> TransportResult<std::fs::File> {
        // A busy or missing pipe fails immediately instead of waiting.
        std::fs::OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|err| self.unavailable(err))
    }
}

/// Where a stream channel of this name lives on the current platform.
pub fn channel_path(name: &str, dir: Option<&str>) -> PathBuf {
    if cfg!(windows) {
        let _ = dir;
        PathBuf::from(format!(r"\\.\pipe\{}", name))
    } else {
        dir.map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
            .join(name)
    }
}

impl Transport for StreamTransport {
    fn deliver(&mut self, payload: &[u8]) -> TransportResult<()> {
        let mut stream = self.open()?;
        stream.write_all(payload)?;
        stream.flush()?;
        Ok(())
    }
}
