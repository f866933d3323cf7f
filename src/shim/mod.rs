//! Vendor SDK look-alikes feeding the lighting state and the transports.
//!
//! Each shim owns a [`ShimCore`] built once when the host process attaches.
//! Host applications may call in from any thread, so the state and the
//! transport each sit behind one coarse lock.

use parking_lot::Mutex;

use crate::config::Root;
use crate::logging;
use crate::state::LightingState;
use crate::transport::{self, Transport};
use crate::wire::Message;

pub mod lightfx;
pub mod logitech;
pub mod razer;
mod throttle;

pub use self::lightfx::LightFx;
pub use self::logitech::Logitech;
pub use self::razer::Razer;
pub use self::throttle::Throttle;

/// Load the configuration beside the host executable and start logging.
pub fn load_config(module_path: &str) -> Root {
    let config = Root::for_module(module_path);
    logging::init(&config.log_level);
    config
}

/// One attached process's state plus the channel it publishes on.
pub struct ShimCore {
    state: Mutex<LightingState>,
    transport: Mutex<Box<dyn Transport>>,
}

impl ShimCore {
    pub fn new(state: LightingState, transport: Box<dyn Transport>) -> ShimCore {
        ShimCore {
            state: Mutex::new(state),
            transport: Mutex::new(transport),
        }
    }

    /// Build the core for a host executable using its configured transport.
    pub fn attach(config: &Root, module_path: &str) -> ShimCore {
        let state = LightingState::attach(module_path, &config.titles);
        log::info!("[shim] attached to {}", state.game());
        ShimCore::new(state, transport::from_config(&config.transport))
    }

    pub fn game(&self) -> String {
        self.state.lock().game().to_owned()
    }

    /// Run `f` with exclusive access to the state.
    pub fn with_state<R, F: FnOnce(&mut LightingState) -> R>(&self, f: F) -> R {
        f(&mut self.state.lock())
    }

    /// Snapshot the state and publish it as a document.
    pub fn publish_snapshot(&self) {
        let snapshot = self.state.lock().snapshot();
        if log::log_enabled!(log::Level::Trace) {
            if let Ok(pretty) = snapshot.to_json_pretty() {
                log::trace!("[shim] snapshot: {}", pretty);
            }
        }
        self.publish(&Message::Document(snapshot));
    }

    pub fn publish(&self, message: &Message) {
        self.transport.lock().publish(message);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::color::Color;
    use crate::transport::testing::Recorder;

    #[test]
    fn publishes_current_state() {
        let recorder = Recorder::default();
        let core = ShimCore::new(LightingState::new("notepad.exe"), Box::new(recorder.clone()));
        core.with_state(|state| state.set_device_light(0, 0, 0x11223344))
            .unwrap();
        core.publish_snapshot();

        match recorder.messages().as_slice() {
            [Message::Document(doc)] => {
                assert_eq!(doc.game, "notepad.exe");
                assert_eq!(
                    doc.devices[0].lights[0].color,
                    Color {
                        red: 34,
                        green: 51,
                        blue: 68,
                        brightness: 17
                    }
                );
            }
            other => panic!("unexpected messages {:?}", other),
        }
    }

    #[test]
    fn shared_between_threads() {
        let recorder = Recorder::default();
        let core = Arc::new(ShimCore::new(LightingState::new("threads"), Box::new(recorder.clone())));

        let handles: Vec<_> = (0..4)
            .map(|device| {
                let core = Arc::clone(&core);
                std::thread::spawn(move || {
                    for light in 0..5 {
                        core.with_state(|state| state.set_device_light(device, light, 0xFF000000 | device as u32))
                            .unwrap();
                        core.publish_snapshot();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(recorder.messages().len(), 20);
        core.with_state(|state| {
            for device in 0..4 {
                for light in 0..5 {
                    assert_eq!(state.light_color(device, light).unwrap().blue, device as u8);
                }
            }
        });
    }
}
