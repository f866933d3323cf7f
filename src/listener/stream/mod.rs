//! Local socket receiver.

use std::io::{self, Read};
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;

use super::{ListenerMessage, Source};
use crate::wire::Message;

/// Start a thread that accepts one frame per connection and messages it
/// to the listener's event loop.
pub fn start_stream_thread(path: PathBuf, sender: Sender<ListenerMessage>) -> io::Result<JoinHandle<()>> {
    log::info!("[stream] Listening at {}", path.display());
    // A previous run may have left the socket file behind.
    let _ = std::fs::remove_file(&path);
    let listener = UnixListener::bind(&path)?;

    Ok(thread::spawn(move || {
        for conn in listener.incoming() {
            let mut conn = match conn {
                Ok(conn) => conn,
                Err(err) => {
                    log::warn!("[stream] accept failed: {}", err);
                    continue;
                }
            };

            let mut buf = Vec::new();
            if let Err(err) = conn.read_to_end(&mut buf) {
                log::warn!("[stream] read failed: {}", err);
                continue;
            }

            let message = match Message::decode(&buf) {
                Ok(message) => message,
                Err(err) => {
                    log::warn!("[stream] undecodable frame ({} B): {}", buf.len(), err);
                    continue;
                }
            };

            let received = ListenerMessage::Received {
                source: Source::Stream,
                message,
            };
            if sender.send(received).is_err() {
                log::info!("[stream] Receiver gone. Exiting thread.");
                break;
            }
        }
    }))
}
