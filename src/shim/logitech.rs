//! Logitech LED style surface. Percentage colours go out as lines and are
//! kept on the keyboard device of the state.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::color::Percentages;
use crate::config::Root;
use crate::state::{LightingState, LIGHT_COUNT};
use crate::transport::Transport;
use crate::wire::{LineMessage, Message};

use super::ShimCore;

/// Line mode for whole-device colours.
pub const MODE_BROADCAST: u32 = 0;
/// Line mode for single-key colours.
pub const MODE_KEY: u32 = 1;

/// Every device type.
pub const DEVICETYPE_ALL: u32 = 0x7;

/// State slot the Logitech keyboard lands in.
const KEYBOARD: usize = 0;

pub struct Logitech {
    core: ShimCore,
    target: AtomicU32,
}

impl Logitech {
    pub fn new(core: ShimCore) -> Logitech {
        Logitech {
            core,
            target: AtomicU32::new(DEVICETYPE_ALL),
        }
    }

    /// Attach using the configuration found beside `module_path`.
    pub fn from_module(module_path: &str) -> Logitech {
        Logitech::attach(&super::load_config(module_path), module_path)
    }

    pub fn attach(config: &Root, module_path: &str) -> Logitech {
        Logitech::new(ShimCore::attach(config, module_path))
    }

    pub fn with_transport(game: &str, transport: Box<dyn Transport>) -> Logitech {
        Logitech::new(ShimCore::new(LightingState::new(game), transport))
    }

    pub fn init(&self) -> bool {
        log::debug!("[logitech] init for {}", self.core.game());
        true
    }

    pub fn shutdown(&self) {
        log::debug!("[logitech] shutdown");
    }

    /// Restrict later calls to these device types; sent as the broadcast modifier.
    pub fn set_target_device(&self, flags: u32) -> bool {
        self.target.store(flags, Ordering::Relaxed);
        true
    }

    pub fn set_lighting(&self, red: i32, green: i32, blue: i32) -> bool {
        let color = Percentages::new(red, green, blue);
        self.record(color);
        self.core.publish(&Message::Line(LineMessage::Broadcast {
            mode: MODE_BROADCAST,
            modifier: self.target.load(Ordering::Relaxed),
            color,
        }));
        true
    }

    pub fn set_lighting_for_key(&self, key: u32, red: i32, green: i32, blue: i32) -> bool {
        self.core.publish(&Message::Line(LineMessage::Key {
            mode: MODE_KEY,
            key,
            color: Percentages::new(red, green, blue),
        }));
        true
    }

    /// Whole-device colours fill every keyboard light, brightness untouched.
    fn record(&self, color: Percentages) {
        self.core.with_state(|state| {
            for light in 0..LIGHT_COUNT {
                if let Err(err) = state.set_device_light_percentages(KEYBOARD, light, color) {
                    log::warn!("[logitech] {}", err);
                }
            }
        });
    }
}
