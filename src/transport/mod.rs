//! Transports hand encoded messages to an external consumer, best effort.

use std::io;

use thiserror::Error;

use crate::config;
use crate::wire::{Message, WireError};

pub mod region;
pub mod stream;
pub use self::region::RegionTransport;
pub use self::stream::StreamTransport;

pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Error)]
pub enum TransportError {
    /// Nobody is listening, or the region does not exist.
    #[error("channel {name} unavailable: {source}")]
    Unavailable { name: String, source: io::Error },
    /// The frame does not fit the shared region and was dropped whole.
    #[error("{len} byte frame exceeds region capacity of {capacity}")]
    Oversized { len: usize, capacity: usize },
    #[error("encoding failed: {0}")]
    Encode(#[from] WireError),
    #[error("write failed: {0}")]
    IoError(#[from] io::Error),
}

/// A one-way sink for framed messages.
///
/// Every delivery is its own open/write/release cycle. Implementations must
/// never wait for a reader to show up.
pub trait Transport: Send {
    /// Deliver one complete frame.
    fn deliver(&mut self, payload: &[u8]) -> TransportResult<()>;

    /// Encode and deliver a message. Failures are logged and dropped.
    fn publish(&mut self, message: &Message) {
        let result = message
            .encode()
            .map_err(TransportError::from)
            .and_then(|frame| self.deliver(&frame));

        match result {
            Ok(()) => log::trace!("[transport] published {:?} frame", message.kind()),
            Err(err @ TransportError::Unavailable { .. }) => {
                log::debug!("[transport] dropped message: {}", err)
            }
            Err(err) => log::warn!("[transport] dropped message: {}", err),
        }
    }
}

/// Build the transport a configuration asks for.
pub fn from_config(settings: &config::Transport) -> Box<dyn Transport> {
    match settings {
        config::Transport::Stream {
            name,
            dir,
            write_timeout_ms,
        } => Box::new(StreamTransport::new(name, dir.as_deref(), *write_timeout_ms)),
        config::Transport::Region {
            name,
            capacity,
            dir,
        } => Box::new(RegionTransport::new(name, *capacity, dir.as_deref())),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::{Transport, TransportError, TransportResult};
    use crate::wire::Message;

    /// Keeps every delivered frame; can pretend nobody is listening.
    #[derive(Clone, Default)]
    pub(crate) struct Recorder {
        pub frames: Arc<Mutex<Vec<Vec<u8>>>>,
        pub unavailable: bool,
    }

    impl Recorder {
        pub fn messages(&self) -> Vec<Message> {
            self.frames
                .lock()
                .unwrap()
                .iter()
                .map(|frame| Message::decode(frame).unwrap())
                .collect()
        }
    }

    impl Transport for Recorder {
        fn deliver(&mut self, payload: &[u8]) -> TransportResult<()> {
            if self.unavailable {
                return Err(TransportError::Unavailable {
                    name: "recorder".to_owned(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            self.frames.lock().unwrap().push(payload.to_vec());
            Ok(())
        }
    }
}
