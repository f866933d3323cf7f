//! Vendor lighting SDK shims that publish a normalised lighting state to a
//! local consumer.
//!
//! Capture calls land in a [`state::LightingState`]; updates are framed by
//! [`wire`] and handed to a [`transport::Transport`], which never blocks the
//! calling host thread.

pub mod color;
pub mod config;
#[cfg(unix)]
pub mod listener;
pub mod logging;
pub mod shim;
pub mod snapshot;
pub mod state;
pub mod transport;
pub mod wire;
