//! LightFX 2.0 style surface.
//!
//! Results follow the vendor convention: `0` is success and the error
//! codes below describe everything else. Transport trouble is never
//! reported; the SDK has no status for it.

use crate::color::Color;
use crate::config::Root;
use crate::state::{AddressingError, DeviceRole, LightingState, DEVICE_COUNT, LIGHT_COUNT};
use crate::transport::Transport;

use super::ShimCore;

pub const LFX_SUCCESS: u32 = 0;
pub const VERSION: &str = "2.0.0.0";

/// Vendor failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LfxStatus {
    Failure = 1,
    NoInit = 2,
    NoDevs = 3,
    NoLights = 4,
    BuffSize = 5,
}

pub type LfxResult<T> = Result<T, LfxStatus>;

impl From<AddressingError> for LfxStatus {
    fn from(err: AddressingError) -> LfxStatus {
        match err {
            AddressingError::Device(_) => LfxStatus::NoDevs,
            AddressingError::Light { .. } => LfxStatus::NoLights,
        }
    }
}

/// Map a result onto the numeric status the SDK returns.
pub fn status_code<T>(result: &LfxResult<T>) -> u32 {
    match result {
        Ok(_) => LFX_SUCCESS,
        Err(status) => *status as u32,
    }
}

/// Vendor device type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LfxDeviceType {
    Desktop = 0x02,
    Mouse = 0x05,
    Keyboard = 0x06,
    Gamepad = 0x07,
    Speaker = 0x08,
}

impl From<DeviceRole> for LfxDeviceType {
    fn from(role: DeviceRole) -> LfxDeviceType {
        match role {
            DeviceRole::Keyboard => LfxDeviceType::Keyboard,
            DeviceRole::Mouse => LfxDeviceType::Mouse,
            DeviceRole::Headset => LfxDeviceType::Speaker,
            DeviceRole::Mousemat => LfxDeviceType::Gamepad,
            DeviceRole::Generic => LfxDeviceType::Desktop,
        }
    }
}

/// The SDK's colour struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LfxColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub brightness: u8,
}

impl LfxColor {
    fn to_packed(self) -> u32 {
        Color {
            red: self.red,
            green: self.green,
            blue: self.blue,
            brightness: self.brightness,
        }
        .to_packed()
    }
}

impl From<Color> for LfxColor {
    fn from(color: Color) -> LfxColor {
        LfxColor {
            red: color.red,
            green: color.green,
            blue: color.blue,
            brightness: color.brightness,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LfxPosition {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

pub struct LightFx {
    core: ShimCore,
}

impl LightFx {
    pub fn new(core: ShimCore) -> LightFx {
        LightFx { core }
    }

    /// Attach using the configuration found beside `module_path`.
    pub fn from_module(module_path: &str) -> LightFx {
        LightFx::attach(&super::load_config(module_path), module_path)
    }

    pub fn attach(config: &Root, module_path: &str) -> LightFx {
        LightFx::new(ShimCore::attach(config, module_path))
    }

    pub fn with_transport(game: &str, transport: Box<dyn Transport>) -> LightFx {
        LightFx::new(ShimCore::new(LightingState::new(game), transport))
    }

    pub fn core(&self) -> &ShimCore {
        &self.core
    }

    pub fn initialize(&self) -> LfxResult<()> {
        log::debug!("[lightfx] initialize");
        Ok(())
    }

    pub fn release(&self) -> LfxResult<()> {
        log::debug!("[lightfx] release");
        Ok(())
    }

    /// Turn every light off. Nothing is sent until the next update.
    pub fn reset(&self) -> LfxResult<()> {
        log::debug!("[lightfx] reset");
        self.core.with_state(LightingState::reset);
        Ok(())
    }

    /// Publish the current state.
    pub fn update(&self) -> LfxResult<()> {
        log::debug!("[lightfx] update");
        self.core.publish_snapshot();
        Ok(())
    }

    pub fn update_default(&self) -> LfxResult<()> {
        log::debug!("[lightfx] update default");
        Ok(())
    }

    pub fn get_num_devices(&self) -> LfxResult<u32> {
        Ok(DEVICE_COUNT as u32)
    }

    /// Description and type of a device. `buf_size` is the caller's buffer,
    /// which must also hold a terminating NUL.
    pub fn get_device_description(
        &self,
        device: u32,
        buf_size: u32,
    ) -> LfxResult<(String, LfxDeviceType)> {
        let role = DeviceRole::from_index(device as usize).ok_or(LfxStatus::NoDevs)?;
        let desc = fit(format!("Device {}", device), buf_size)?;
        Ok((desc, role.into()))
    }

    pub fn get_num_lights(&self, device: u32) -> LfxResult<u32> {
        self.core
            .with_state(|state| state.device(device as usize).map(|_| LIGHT_COUNT as u32))
            .map_err(LfxStatus::from)
    }

    pub fn get_light_description(&self, device: u32, light: u32, buf_size: u32) -> LfxResult<String> {
        self.core
            .with_state(|state| state.light_color(device as usize, light as usize))?;
        fit(format!("Device {} Light {}", device, light), buf_size)
    }

    pub fn get_light_location(&self, device: u32, light: u32) -> LfxResult<LfxPosition> {
        self.core
            .with_state(|state| state.light_color(device as usize, light as usize))?;
        Ok(LfxPosition::default())
    }

    pub fn get_light_color(&self, device: u32, light: u32) -> LfxResult<LfxColor> {
        let color = self
            .core
            .with_state(|state| state.light_color(device as usize, light as usize))?;
        Ok(color.into())
    }

    pub fn set_light_color(&self, device: u32, light: u32, color: LfxColor) -> LfxResult<()> {
        log::trace!("[lightfx] set light {}/{} to {:?}", device, light, color);
        self.core.with_state(|state| {
            state.set_device_light(device as usize, light as usize, color.to_packed())
        })?;
        Ok(())
    }

    /// Colour everything covered by `location_mask`.
    pub fn light(&self, location_mask: u32, color: u32) -> LfxResult<()> {
        log::debug!(
            "[lightfx] light mask {:#x} colour {:#010x}",
            location_mask,
            color
        );
        self.core
            .with_state(|state| state.set_zone_light(location_mask, color));
        Ok(())
    }

    /// Accepted and ignored.
    pub fn set_timing(&self, timing: i32) -> LfxResult<()> {
        log::debug!("[lightfx] set timing {}", timing);
        Ok(())
    }

    /// Accepted and ignored.
    pub fn action_color(&self, location_mask: u32, action: u32, color: u32) -> LfxResult<()> {
        log::debug!(
            "[lightfx] action colour mask {:#x} action {} colour {:#010x}",
            location_mask,
            action,
            color
        );
        Ok(())
    }

    /// Accepted and ignored.
    pub fn action_color_ex(
        &self,
        location_mask: u32,
        action: u32,
        primary: u32,
        secondary: u32,
    ) -> LfxResult<()> {
        log::debug!(
            "[lightfx] action colour ex mask {:#x} action {} colours {:#010x} {:#010x}",
            location_mask,
            action,
            primary,
            secondary
        );
        Ok(())
    }

    /// Accepted and ignored.
    pub fn set_light_action_color(
        &self,
        device: u32,
        light: u32,
        action: u32,
        color: LfxColor,
    ) -> LfxResult<()> {
        log::debug!(
            "[lightfx] light {}/{} action {} colour {:?}",
            device,
            light,
            action,
            color
        );
        Ok(())
    }

    /// Accepted and ignored.
    pub fn set_light_action_color_ex(
        &self,
        device: u32,
        light: u32,
        action: u32,
        primary: LfxColor,
        secondary: LfxColor,
    ) -> LfxResult<()> {
        log::debug!(
            "[lightfx] light {}/{} action {} colours {:?} {:?}",
            device,
            light,
            action,
            primary,
            secondary
        );
        Ok(())
    }

    pub fn get_version(&self, buf_size: u32) -> LfxResult<String> {
        fit(VERSION.to_owned(), buf_size)
    }
}

fn fit(text: String, buf_size: u32) -> LfxResult<String> {
    if text.len() + 1 > buf_size as usize {
        return Err(LfxStatus::BuffSize);
    }
    Ok(text)
}
