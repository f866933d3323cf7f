//! Shared region reader. The reader owns the region and polls it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;

use super::{ListenerMessage, Source, REGION_POLL_INTERVAL};
use crate::wire::{Message, WireError, WireResult};

/// Create (or clear) a zero-filled region of `capacity` bytes.
pub fn create_region(path: &Path, capacity: usize) -> io::Result<()> {
    fs::write(path, vec![0u8; capacity])
}

/// Decode whatever frame the region currently holds.
pub fn read_region(path: &Path) -> WireResult<Message> {
    let bytes = fs::read(path)?;
    Message::decode(&bytes)
}

/// Start a thread that reports each new frame written to the region.
pub fn start_region_thread(
    path: PathBuf,
    capacity: usize,
    sender: Sender<ListenerMessage>,
) -> io::Result<JoinHandle<()>> {
    log::info!("[region] Watching {} ({} B)", path.display(), capacity);
    create_region(&path, capacity)?;

    Ok(thread::spawn(move || {
        let mut last: Vec<u8> = Vec::new();
        loop {
            thread::sleep(REGION_POLL_INTERVAL);

            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    log::warn!("[region] read failed: {}", err);
                    continue;
                }
            };
            if bytes == last {
                continue;
            }

            let message = match Message::decode(&bytes) {
                Ok(message) => message,
                // Still zeroed.
                Err(WireError::InvalidProtocolVersion(0)) => continue,
                Err(err) => {
                    // Possibly a torn write; the next poll will see the rest.
                    log::debug!("[region] undecodable frame: {}", err);
                    continue;
                }
            };
            last = bytes;

            let received = ListenerMessage::Received {
                source: Source::Region,
                message,
            };
            if sender.send(received).is_err() {
                log::info!("[region] Receiver gone. Exiting thread.");
                break;
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::color::Rgb;
    use crate::transport::region::DEFAULT_CAPACITY;
    use crate::transport::{RegionTransport, Transport};
    use crate::wire::{KeyGrid, LineMessage};

    #[test]
    fn empty_region_has_no_frame() {
        let path = std::env::temp_dir().join(format!("lightshim-empty-{}", std::process::id()));
        create_region(&path, 64).unwrap();
        assert!(matches!(
            read_region(&path),
            Err(WireError::InvalidProtocolVersion(0))
        ));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn reports_new_frames() {
        let dir = std::env::temp_dir();
        let name = format!("lightshim-watch-{}", std::process::id());
        let path = dir.join(&name);

        let (sender, receiver) = crossbeam_channel::unbounded();
        let _handle = start_region_thread(path.clone(), DEFAULT_CAPACITY, sender).unwrap();

        let grid = Message::Line(LineMessage::Grid {
            effect: 2,
            grid: Box::new(KeyGrid::filled(Rgb::new(1, 2, 3))),
        });
        let mut transport = RegionTransport::new(&name, DEFAULT_CAPACITY, dir.to_str());
        transport.publish(&grid);

        match receiver.recv_timeout(Duration::from_secs(5)).unwrap() {
            ListenerMessage::Received { source, message } => {
                assert_eq!(source, Source::Region);
                assert_eq!(message, grid);
            }
        }
        assert_eq!(read_region(&path).unwrap(), grid);
    }
}
