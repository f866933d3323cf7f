//! Razer Chroma keyboard style surface. Effects become grid lines on the
//! shared region, rate limited because games resend them every frame.

use parking_lot::Mutex;

use crate::color::Rgb;
use crate::config::Root;
use crate::state::LightingState;
use crate::transport::{self, Transport};
use crate::wire::{KeyGrid, LineMessage, Message, GRID_COLS, GRID_ROWS};

use super::{ShimCore, Throttle};

/// Vendor result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RzResult {
    Success = 0,
    NotSupported = 50,
    InvalidParameter = 87,
}

/// Vendor keyboard effect ids.
pub const EFFECT_NONE: u32 = 0;
pub const EFFECT_CUSTOM: u32 = 2;
pub const EFFECT_STATIC: u32 = 4;

pub enum KeyboardEffect {
    None,
    /// One COLORREF for every key.
    Static(u32),
    /// COLORREF per grid cell.
    Custom(Box<[[u32; GRID_COLS]; GRID_ROWS]>),
}

impl KeyboardEffect {
    fn id(&self) -> u32 {
        match self {
            KeyboardEffect::None => EFFECT_NONE,
            KeyboardEffect::Static(_) => EFFECT_STATIC,
            KeyboardEffect::Custom(_) => EFFECT_CUSTOM,
        }
    }

    fn grid(&self) -> KeyGrid {
        match self {
            KeyboardEffect::None => KeyGrid::default(),
            KeyboardEffect::Static(color) => KeyGrid::filled(Rgb::from_colorref(*color)),
            KeyboardEffect::Custom(colors) => KeyGrid::from_colorrefs(colors),
        }
    }
}

pub struct Razer {
    core: ShimCore,
    throttle: Mutex<Throttle>,
}

impl Razer {
    pub fn new(core: ShimCore, throttle: Throttle) -> Razer {
        Razer {
            core,
            throttle: Mutex::new(throttle),
        }
    }

    /// Attach using the configuration found beside `module_path`.
    pub fn from_module(module_path: &str) -> Razer {
        Razer::attach(&super::load_config(module_path), module_path)
    }

    /// Publishes on the configured shared region, not the stream channel.
    pub fn attach(config: &Root, module_path: &str) -> Razer {
        let state = LightingState::attach(module_path, &config.titles);
        log::info!("[razer] attached to {}", state.game());
        let transport = transport::from_config(&config.region.as_transport());
        Razer::new(ShimCore::new(state, transport), Throttle::new(config.throttle))
    }

    pub fn with_transport(game: &str, transport: Box<dyn Transport>, threshold: u32) -> Razer {
        Razer::new(
            ShimCore::new(LightingState::new(game), transport),
            Throttle::new(threshold),
        )
    }

    pub fn init(&self) -> RzResult {
        log::debug!("[razer] init");
        RzResult::Success
    }

    pub fn uninit(&self) -> RzResult {
        log::debug!("[razer] uninit");
        RzResult::Success
    }

    /// Accepts the effect; only every Nth call reaches the transport.
    pub fn create_keyboard_effect(&self, effect: KeyboardEffect) -> RzResult {
        if !self.throttle.lock().admit() {
            return RzResult::Success;
        }
        self.core.publish(&Message::Line(LineMessage::Grid {
            effect: effect.id(),
            grid: Box::new(effect.grid()),
        }));
        RzResult::Success
    }

    /// Only keyboards are emulated.
    pub fn create_mouse_effect(&self) -> RzResult {
        RzResult::NotSupported
    }

    /// Raw vendor effect ids. Static takes one COLORREF, custom a full grid;
    /// a missing parameter or an unknown id is rejected.
    pub fn create_keyboard_effect_raw(
        &self,
        effect: u32,
        color: Option<u32>,
        colors: Option<&[[u32; GRID_COLS]; GRID_ROWS]>,
    ) -> RzResult {
        let effect = match effect {
            EFFECT_NONE => KeyboardEffect::None,
            EFFECT_STATIC => match color {
                Some(color) => KeyboardEffect::Static(color),
                None => return RzResult::InvalidParameter,
            },
            EFFECT_CUSTOM => match colors {
                Some(colors) => KeyboardEffect::Custom(Box::new(*colors)),
                None => return RzResult::InvalidParameter,
            },
            _ => return RzResult::InvalidParameter,
        };
        self.create_keyboard_effect(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::Recorder;

    #[test]
    fn publishes_once_among_the_last_five_of_twenty_five() {
        let recorder = Recorder::default();
        let razer = Razer::with_transport("game", Box::new(recorder.clone()), 20);

        for call in 0..25 {
            assert_eq!(
                razer.create_keyboard_effect(KeyboardEffect::Static(0x00030201)),
                RzResult::Success
            );
            let expected = if call < 20 { 0 } else { 1 };
            assert_eq!(recorder.messages().len(), expected, "after call {}", call);
        }
    }

    #[test]
    fn custom_grid_becomes_a_grid_line() {
        let recorder = Recorder::default();
        let razer = Razer::with_transport("game", Box::new(recorder.clone()), 0);

        let colors = [[0x00030201u32; GRID_COLS]; GRID_ROWS];
        razer.create_keyboard_effect(KeyboardEffect::Custom(Box::new(colors)));

        match recorder.messages().as_slice() {
            [Message::Line(line @ LineMessage::Grid { effect, .. })] => {
                assert_eq!(*effect, EFFECT_CUSTOM);
                let text = line.to_string();
                let (_, cells) = text.split_once('|').unwrap();
                let tokens: Vec<&str> = cells.split(' ').collect();
                assert_eq!(tokens.len(), 132);
                assert!(tokens.iter().all(|token| token.ends_with(",1,2,3")));
            }
            other => panic!("unexpected messages {:?}", other),
        }
    }

    #[test]
    fn raw_effects_validate_parameters() {
        let recorder = Recorder::default();
        let razer = Razer::with_transport("game", Box::new(recorder.clone()), 0);
        assert_eq!(
            razer.create_keyboard_effect_raw(EFFECT_CUSTOM, Some(0x00FFFFFF), None),
            RzResult::InvalidParameter
        );
        assert_eq!(
            razer.create_keyboard_effect_raw(EFFECT_STATIC, None, None),
            RzResult::InvalidParameter
        );
        assert_eq!(razer.create_keyboard_effect_raw(99, None, None), RzResult::InvalidParameter);
        assert_eq!(razer.create_keyboard_effect_raw(EFFECT_NONE, None, None), RzResult::Success);
        assert_eq!(razer.create_mouse_effect(), RzResult::NotSupported);
        assert_eq!(recorder.messages().len(), 1);
    }

    #[test]
    fn raw_static_effect_uses_its_single_colorref() {
        let recorder = Recorder::default();
        let razer = Razer::with_transport("game", Box::new(recorder.clone()), 0);
        assert_eq!(
            razer.create_keyboard_effect_raw(EFFECT_STATIC, Some(0x00030201), None),
            RzResult::Success
        );
        assert_eq!(
            recorder.messages(),
            vec![Message::Line(LineMessage::Grid {
                effect: EFFECT_STATIC,
                grid: Box::new(KeyGrid::filled(Rgb::new(1, 2, 3))),
            })]
        );
    }

    #[cfg(unix)]
    #[test]
    fn from_module_reads_the_region_beside_the_executable() {
        let dir = std::env::temp_dir().join(format!("lightshim-razer-module-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = format!(
            "throttle: 0\nlogLevel: debug\nregion:\n  name: keys\n  capacity: 4096\n  dir: {}\n",
            dir.display()
        );
        std::fs::write(dir.join(crate::config::CONFIG_FILE_NAME), config).unwrap();
        std::fs::write(dir.join("keys"), vec![0u8; 4096]).unwrap();

        let razer = Razer::from_module(dir.join("Overwatch.exe").to_str().unwrap());
        assert_eq!(razer.core.game(), "Overwatch");
        razer.create_keyboard_effect(KeyboardEffect::None);

        let region = std::fs::read(dir.join("keys")).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(
            Message::decode(&region).unwrap(),
            Message::Line(LineMessage::Grid { effect: EFFECT_NONE, .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn white_grid_fits_the_smallest_accepted_region() {
        use crate::transport::RegionTransport;
        use crate::wire::MAX_GRID_FRAME_LEN;

        let dir = std::env::temp_dir();
        let name = format!("lightshim-razer-white-{}", std::process::id());
        let path = dir.join(&name);
        std::fs::write(&path, vec![0u8; MAX_GRID_FRAME_LEN]).unwrap();

        let transport = RegionTransport::new(&name, MAX_GRID_FRAME_LEN, dir.to_str());
        let razer = Razer::with_transport("game", Box::new(transport), 0);
        assert_eq!(
            razer.create_keyboard_effect(KeyboardEffect::Static(0x00FFFFFF)),
            RzResult::Success
        );

        let region = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            Message::decode(&region).unwrap(),
            Message::Line(LineMessage::Grid {
                effect: EFFECT_STATIC,
                grid: Box::new(KeyGrid::filled(Rgb::new(255, 255, 255))),
            })
        );
    }
}
