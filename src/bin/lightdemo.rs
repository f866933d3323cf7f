use std::time::{Duration, Instant};

use lightshim_rs::shim::lightfx::LfxColor;
use lightshim_rs::shim::LightFx;
use lightshim_rs::state::{DEVICE_COUNT, LIGHT_COUNT};

fn channel(t: f32, phase: f32) -> u8 {
    (((t + phase).sin() * 0.5 + 0.5) * 255.0) as u8
}

fn main() {
    let module_path = std::env::current_exe()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|_| "lightdemo".to_owned());
    let fx = LightFx::from_module(&module_path);
    fx.initialize().ok();

    let started = Instant::now();
    loop {
        let t = started.elapsed().as_secs_f32();

        for device in 0..DEVICE_COUNT {
            for light in 0..LIGHT_COUNT {
                let i = (device * LIGHT_COUNT + light) as f32 * 0.3;
                let color = LfxColor {
                    red: channel(t, i),
                    green: channel(t, i + 2.25),
                    blue: channel(t, i + 4.5),
                    brightness: 255,
                };
                fx.set_light_color(device as u32, light as u32, color).ok();
            }
        }
        fx.light(0x7FF, 0xFF000000 | u32::from(channel(t, 0.0))).ok();
        fx.update().ok();

        std::thread::sleep(Duration::from_millis(50));
    }
}
