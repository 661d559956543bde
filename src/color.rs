//! Colors as they appear in options (`"#1a2b3c"`, `"#fff"`, `"black"`).

use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;

/// An 8-bit, non-premultiplied RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba::new(r, g, b, 255)
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = RenderError;

    /// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` and a handful of names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || RenderError::config(format!("unrecognized color {:?}", s));

        match text.to_ascii_lowercase().as_str() {
            "black" => return Ok(Rgba::BLACK),
            "white" => return Ok(Rgba::WHITE),
            "transparent" => return Ok(Rgba::TRANSPARENT),
            "red" => return Ok(Rgba::rgb(255, 0, 0)),
            "green" => return Ok(Rgba::rgb(0, 128, 0)),
            "blue" => return Ok(Rgba::rgb(0, 0, 255)),
            _ => {}
        }

        let hex = text.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        let color = match hex.len() {
            3 => Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?),
            4 => Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
            6 => Rgba::rgb(byte(0)?, byte(2)?, byte(4)?),
            8 => Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?),
            _ => return Err(invalid()),
        };
        Ok(color)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}
