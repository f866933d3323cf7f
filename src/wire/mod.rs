//! Framed message format shared by both delivery modes.
//!
//! ```text
//! u8      protocol version (1)
//! u8      kind (0 document, 1 broadcast line, 2 per-key line, 3 grid line)
//! u32 LE  payload length
//! ...     payload
//! ```

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use thiserror::Error;

use crate::snapshot::{Snapshot, SnapshotError};

pub mod line;
pub use self::line::{KeyGrid, LineError, LineMessage, GRID_COLS, GRID_ROWS, MAX_GRID_LINE_LEN};

pub const PROTOCOL_VERSION: u8 = 1;
/// Version, kind and length.
pub const HEADER_SIZE: usize = 6;
/// Smallest shared region that still takes every keyboard grid frame.
pub const MAX_GRID_FRAME_LEN: usize = HEADER_SIZE + MAX_GRID_LINE_LEN;

/// Payload discriminant carried in every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Document,
    Broadcast,
    Key,
    Grid,
}

impl Kind {
    pub fn tag(self) -> u8 {
        match self {
            Kind::Document => 0,
            Kind::Broadcast => 1,
            Kind::Key => 2,
            Kind::Grid => 3,
        }
    }

    pub fn from_tag(tag: u8) -> WireResult<Kind> {
        match tag {
            0 => Ok(Kind::Document),
            1 => Ok(Kind::Broadcast),
            2 => Ok(Kind::Key),
            3 => Ok(Kind::Grid),
            _ => Err(WireError::UnknownKind(tag)),
        }
    }
}

/// Everything that can travel over a transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Full lighting state.
    Document(Snapshot),
    /// Ad hoc text line.
    Line(LineMessage),
}

pub type WireResult<T> = Result<T, WireError>;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid protocol version {0}")]
    InvalidProtocolVersion(u8),
    #[error("unknown message kind {0}")]
    UnknownKind(u8),
    #[error("payload of {0} bytes does not fit a frame")]
    PayloadTooLarge(usize),
    #[error("bad document: {0}")]
    Document(#[from] SnapshotError),
    #[error("bad line: {0}")]
    Line(#[from] LineError),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl Message {
    pub fn kind(&self) -> Kind {
        match self {
            Message::Document(_) => Kind::Document,
            Message::Line(LineMessage::Broadcast { .. }) => Kind::Broadcast,
            Message::Line(LineMessage::Key { .. }) => Kind::Key,
            Message::Line(LineMessage::Grid { .. }) => Kind::Grid,
        }
    }

    /// Serialize into a complete frame.
    pub fn encode(&self) -> WireResult<Vec<u8>> {
        let payload = match self {
            Message::Document(snapshot) => snapshot.to_json()?,
            Message::Line(line) => line.to_string().into_bytes(),
        };
        let len = u32::try_from(payload.len()).map_err(|_| WireError::PayloadTooLarge(payload.len()))?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
        buf.write_u8(PROTOCOL_VERSION)?;
        buf.write_u8(self.kind().tag())?;
        buf.write_u32::<LittleEndian>(len)?;
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Read one frame. Bytes after the payload are left unread.
    pub fn read_from(buf: &mut dyn Read) -> WireResult<Message> {
        read_header(buf)?;
        let kind = Kind::from_tag(buf.read_u8()?)?;
        let len = buf.read_u32::<LittleEndian>()? as usize;

        let mut payload = Vec::with_capacity(len.min(64 * 1024));
        buf.take(len as u64).read_to_end(&mut payload)?;
        if payload.len() < len {
            return Err(WireError::IoError(io::Error::from(io::ErrorKind::UnexpectedEof)));
        }

        match kind {
            Kind::Document => Ok(Message::Document(Snapshot::from_json(&payload)?)),
            _ => {
                // Lines are ASCII; tolerate bad UTF-8 and let the grammar reject it.
                let text = String::from_utf8_lossy(&payload);
                Ok(Message::Line(LineMessage::parse(kind, &text)?))
            }
        }
    }

    pub fn decode(mut bytes: &[u8]) -> WireResult<Message> {
        Message::read_from(&mut bytes)
    }
}

fn read_header(buf: &mut dyn Read) -> WireResult<()> {
    match buf.read_u8() {
        Ok(PROTOCOL_VERSION) => Ok(()),
        Ok(ver) => Err(WireError::InvalidProtocolVersion(ver)),
        Err(io_error) => Err(WireError::IoError(io_error)),
    }
}
