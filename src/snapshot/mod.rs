//! The structured document published as the full-state feed.
//!
//! Shape:
//!
//! ```text
//! { "game": "...",
//!   "mask": { "location": 0, "light": { "red": 0, "green": 0, "blue": 0, "brightness": 0 } },
//!   "devices": [ { "lights": [ { "color": { ... } } x 5 ] } x 5 ] }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::state::LightingState;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub game: String,
    pub mask: MaskDoc,
    pub devices: Vec<DeviceDoc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MaskDoc {
    pub location: u32,
    pub light: Color,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeviceDoc {
    pub lights: Vec<LightDoc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LightDoc {
    pub color: Color,
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<&LightingState> for Snapshot {
    fn from(state: &LightingState) -> Snapshot {
        let zone = state.zone();
        Snapshot {
            game: state.game().to_owned(),
            mask: MaskDoc {
                location: zone.mask,
                light: zone.color,
            },
            devices: state
                .devices()
                .iter()
                .map(|device| DeviceDoc {
                    lights: device
                        .lights()
                        .iter()
                        .map(|light| LightDoc {
                            color: light.color(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl Snapshot {
    /// Compact JSON, as sent over the wire.
    pub fn to_json(&self) -> SnapshotResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Indented JSON for trace logging.
    pub fn to_json_pretty(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> SnapshotResult<Snapshot> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
