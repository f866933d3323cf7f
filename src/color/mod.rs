//! Canonical colour records and the vendor encodings they are captured from.

use serde::{Deserialize, Serialize};

/// A light's colour. Always produced by unpacking a 32-bit value:
/// brightness = bits 31..24, red = 23..16, green = 15..8, blue = 7..0.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub brightness: u8,
}

impl Color {
    pub const OFF: Color = Color {
        red: 0,
        green: 0,
        blue: 0,
        brightness: 0,
    };

    /// Unpack a colour from its 32-bit `0xBBRRGGBB` form.
    pub fn from_packed(value: u32) -> Color {
        Color {
            brightness: (value >> 24) as u8,
            red: (value >> 16) as u8,
            green: (value >> 8) as u8,
            blue: value as u8,
        }
    }

    /// Pack back into the 32-bit form. Inverse of `from_packed`.
    pub fn to_packed(self) -> u32 {
        (self.brightness as u32) << 24
            | (self.red as u32) << 16
            | (self.green as u32) << 8
            | self.blue as u32
    }

    /// Replace the RGB channels with normalised percentages, keeping brightness.
    ///
    /// The result goes through the packed form so every channel is still
    /// derived by the same unpacking rule.
    pub fn with_percentages(self, pct: Percentages) -> Color {
        let (red, green, blue) = pct.to_bytes();
        let packed = (self.brightness as u32) << 24
            | (red as u32) << 16
            | (green as u32) << 8
            | blue as u32;
        Color::from_packed(packed)
    }
}

/// An RGB triple given as percentages, as the percentage-based vendor APIs do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Percentages {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Percentages {
    /// Build from the vendor's signed ints, clamping each channel to 0..=100.
    pub fn new(red: i32, green: i32, blue: i32) -> Percentages {
        Percentages {
            red: clamp_percent(red),
            green: clamp_percent(green),
            blue: clamp_percent(blue),
        }
    }

    /// Normalise to bytes, rounding to the nearest value.
    pub fn to_bytes(self) -> (u8, u8, u8) {
        (
            percent_to_byte(self.red),
            percent_to_byte(self.green),
            percent_to_byte(self.blue),
        )
    }
}

fn clamp_percent(num: i32) -> u8 {
    num.clamp(0, 100) as u8
}

/// Map 0..=100 onto 0..=255.
pub fn percent_to_byte(pct: u8) -> u8 {
    let pct = pct.min(100) as u16;
    ((pct * 255 + 50) / 100) as u8
}

/// A single keyboard grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub fn new(red: u8, green: u8, blue: u8) -> Rgb {
        Rgb { red, green, blue }
    }

    /// Read a Windows COLORREF (`0x00BBGGRR`).
    pub fn from_colorref(value: u32) -> Rgb {
        Rgb {
            red: value as u8,
            green: (value >> 8) as u8,
            blue: (value >> 16) as u8,
        }
    }
}
