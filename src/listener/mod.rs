//! Receives frames published by the shims. Used for debugging and as a
//! reference consumer.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel as channel;

use crate::config::{self, Root};
use crate::transport::region::region_path;
use crate::transport::stream::channel_path;
use crate::wire::Message;

mod region;
mod stream;

pub use self::region::{create_region, read_region, start_region_thread};
pub use self::stream::start_stream_thread;

/// How often the shared region is checked for a new frame.
pub const REGION_POLL_INTERVAL: Duration = Duration::from_millis(30);

/// Where a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Stream,
    Region,
}

/// Messages produced by the receiver threads.
#[derive(Debug)]
pub enum ListenerMessage {
    Received { source: Source, message: Message },
}

/// Listen on every channel the configuration names and hand each message to `handler`.
pub fn serve<F: FnMut(ListenerMessage)>(config: &Root, mut handler: F) -> io::Result<()> {
    // Message channel used as the listener's event bus.
    let (sender, receiver) = channel::unbounded::<ListenerMessage>();

    let mut handles = Vec::new();
    let mut regions: Vec<(PathBuf, usize)> = Vec::new();
    match &config.transport {
        config::Transport::Stream { name, dir, .. } => {
            handles.push(start_stream_thread(channel_path(name, dir.as_deref()), sender.clone())?);
        }
        config::Transport::Region {
            name,
            capacity,
            dir,
        } => regions.push((region_path(name, dir.as_deref()), *capacity)),
    }
    let shared = region_path(&config.region.name, config.region.dir.as_deref());
    if !regions.iter().any(|(path, _)| *path == shared) {
        regions.push((shared, config.region.capacity));
    }
    for (path, capacity) in regions {
        handles.push(start_region_thread(path, capacity, sender.clone())?);
    }
    drop(sender);

    for message in receiver.iter() {
        handler(message);
    }

    for handle in handles {
        handle.join().expect("Did a listener thread crash?");
    }

    Ok(())
}
