//! The canonical lighting state of one attached host process.

use thiserror::Error;

use crate::color::{Color, Percentages};
use crate::snapshot::Snapshot;

pub mod game;
pub use self::game::{derive_game, KnownTitle};

/// Devices per state.
pub const DEVICE_COUNT: usize = 5;
/// Lights per device.
pub const LIGHT_COUNT: usize = 5;

/// Conventional role of each device slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRole {
    Keyboard,
    Mouse,
    Headset,
    Mousemat,
    Generic,
}

impl DeviceRole {
    pub fn from_index(index: usize) -> Option<DeviceRole> {
        match index {
            0 => Some(DeviceRole::Keyboard),
            1 => Some(DeviceRole::Mouse),
            2 => Some(DeviceRole::Headset),
            3 => Some(DeviceRole::Mousemat),
            4 => Some(DeviceRole::Generic),
            _ => None,
        }
    }
}

pub type StateResult<T> = Result<T, AddressingError>;

/// An index outside the fixed device/light arrays.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AddressingError {
    #[error("device index {0} out of range (0..{})", DEVICE_COUNT)]
    Device(usize),
    #[error("light index {light} out of range (0..{}) on device {device}", LIGHT_COUNT)]
    Light { device: usize, light: usize },
}

/// A single addressable light.
#[derive(Debug, Clone, Default)]
pub struct Light {
    color: Color,
}

impl Light {
    pub fn color(&self) -> Color {
        self.color
    }
}

/// A device with a fixed row of lights.
#[derive(Debug, Clone, Default)]
pub struct Device {
    lights: [Light; LIGHT_COUNT],
}

impl Device {
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}

/// The colour applied by the broadcast "light everything in this mask" call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneLight {
    pub mask: u32,
    pub color: Color,
}

/// All light sources of one host process.
///
/// Created once at attach time; only colours change afterwards.
#[derive(Debug, Clone)]
pub struct LightingState {
    game: String,
    devices: [Device; DEVICE_COUNT],
    zone: ZoneLight,
}

impl LightingState {
    pub fn new<S: Into<String>>(game: S) -> LightingState {
        LightingState {
            game: game.into(),
            devices: Default::default(),
            zone: ZoneLight::default(),
        }
    }

    /// Build the state for a host executable, deriving the game from its path.
    pub fn attach(module_path: &str, titles: &[KnownTitle]) -> LightingState {
        LightingState::new(derive_game(module_path, titles))
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn zone(&self) -> ZoneLight {
        self.zone
    }

    pub fn device(&self, device: usize) -> StateResult<&Device> {
        self.devices.get(device).ok_or(AddressingError::Device(device))
    }

    pub fn light_color(&self, device: usize, light: usize) -> StateResult<Color> {
        self.device(device)?
            .lights
            .get(light)
            .map(Light::color)
            .ok_or(AddressingError::Light { device, light })
    }

    fn light_mut(&mut self, device: usize, light: usize) -> StateResult<&mut Light> {
        self.devices
            .get_mut(device)
            .ok_or(AddressingError::Device(device))?
            .lights
            .get_mut(light)
            .ok_or(AddressingError::Light { device, light })
    }

    /// Set one light from a packed colour value.
    pub fn set_device_light(&mut self, device: usize, light: usize, value: u32) -> StateResult<()> {
        self.light_mut(device, light)?.color = Color::from_packed(value);
        Ok(())
    }

    /// Set one light's RGB from percentages, keeping its brightness.
    pub fn set_device_light_percentages(
        &mut self,
        device: usize,
        light: usize,
        pct: Percentages,
    ) -> StateResult<()> {
        let light = self.light_mut(device, light)?;
        light.color = light.color.with_percentages(pct);
        Ok(())
    }

    /// Record the broadcast zone call. No per-device fan-out happens here.
    pub fn set_zone_light(&mut self, mask: u32, value: u32) {
        self.zone = ZoneLight {
            mask,
            color: Color::from_packed(value),
        };
    }

    /// Turn every light and the zone colour off.
    pub fn reset(&mut self) {
        for device in self.devices.iter_mut() {
            for light in device.lights.iter_mut() {
                light.color = Color::from_packed(0);
            }
        }
        self.zone.color = Color::from_packed(0);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_every_valid_light() {
        let mut state = LightingState::new("test");
        for device in 0..DEVICE_COUNT {
            for light in 0..LIGHT_COUNT {
                state.set_device_light(device, light, 0xAABBCCDD).unwrap();
                let color = state.light_color(device, light).unwrap();
                assert_eq!(
                    color,
                    Color {
                        red: 0xBB,
                        green: 0xCC,
                        blue: 0xDD,
                        brightness: 0xAA
                    }
                );
            }
        }
    }

    #[test]
    fn out_of_range_leaves_state_unchanged() {
        let mut state = LightingState::new("test");
        state.set_device_light(1, 1, 0x01020304).unwrap();
        let before = state.snapshot();

        assert_eq!(
            state.set_device_light(DEVICE_COUNT, 0, 0xFFFFFFFF),
            Err(AddressingError::Device(DEVICE_COUNT))
        );
        assert_eq!(
            state.set_device_light(0, LIGHT_COUNT, 0xFFFFFFFF),
            Err(AddressingError::Light {
                device: 0,
                light: LIGHT_COUNT
            })
        );
        assert_eq!(
            state.set_device_light_percentages(99, 99, Percentages::new(1, 2, 3)),
            Err(AddressingError::Device(99))
        );
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn percentages_keep_brightness() {
        let mut state = LightingState::new("test");
        state.set_device_light(3, 4, 0x7F010203).unwrap();
        state
            .set_device_light_percentages(3, 4, Percentages::new(100, 50, 1))
            .unwrap();
        assert_eq!(
            state.light_color(3, 4).unwrap(),
            Color {
                red: 255,
                green: 128,
                blue: 3,
                brightness: 0x7F
            }
        );
    }

    #[test]
    fn zone_light_does_not_touch_devices() {
        let mut state = LightingState::new("test");
        state.set_zone_light(0x0000_07FF, 0xFF102030);
        assert_eq!(state.zone().mask, 0x7FF);
        assert_eq!(state.zone().color.to_packed(), 0xFF102030);
        assert_eq!(state.light_color(0, 0).unwrap(), Color::OFF);
    }

    #[test]
    fn reset_keeps_game() {
        let mut state = LightingState::new("notepad.exe");
        state.set_device_light(4, 4, 0xFFFFFFFF).unwrap();
        state.set_zone_light(3, 0xFFFFFFFF);
        state.reset();
        assert_eq!(state.light_color(4, 4).unwrap(), Color::OFF);
        assert_eq!(state.zone().color, Color::OFF);
        assert_eq!(state.zone().mask, 3);
        assert_eq!(state.game(), "notepad.exe");
    }

    #[test]
    fn roles_cover_every_device() {
        assert_eq!(DeviceRole::from_index(0), Some(DeviceRole::Keyboard));
        assert_eq!(DeviceRole::from_index(4), Some(DeviceRole::Generic));
        assert_eq!(DeviceRole::from_index(DEVICE_COUNT), None);
    }
}
