//! Pixel color representations for the supported controllers.

use core::fmt::Debug;

/// A color a controller can store for one pixel.
pub trait PixelColor: Copy + PartialEq + Debug {
    /// The color of a cleared display.
    const BLACK: Self;
    /// The brightest color the controller can show.
    const WHITE: Self;
}

/// Pack 8-bit red, green and blue components into RGB565, keeping the 5/6/5 most significant
/// bits of each and discarding the rest. Never rounds.
pub const fn rgb_to_565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// A 16-bit RGB565 color, as stored by the ST7735 in 16 bits/pixel mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb565(rgb_to_565(r, g, b))
    }

    /// The two bytes sent over the bus for this color, high byte first.
    pub const fn to_be_bytes(self) -> [u8; 2] {
        [(self.0 >> 8) as u8, self.0 as u8]
    }
}

impl From<u16> for Rgb565 {
    fn from(raw: u16) -> Self {
        Rgb565(raw)
    }
}

impl From<Rgb565> for u16 {
    fn from(c: Rgb565) -> u16 {
        c.0
    }
}

impl PixelColor for Rgb565 {
    const BLACK: Self = BLACK;
    const WHITE: Self = WHITE;
}

pub const BLACK: Rgb565 = Rgb565(0x0000);
pub const BLUE: Rgb565 = Rgb565(0x001F);
pub const RED: Rgb565 = Rgb565(0xF800);
pub const GREEN: Rgb565 = Rgb565(0x07E0);
pub const CYAN: Rgb565 = Rgb565(0x07FF);
pub const MAGENTA: Rgb565 = Rgb565(0xF81F);
pub const YELLOW: Rgb565 = Rgb565(0xFFE0);
pub const WHITE: Rgb565 = Rgb565(0xFFFF);

/// A monochrome pixel, as stored by the SSD1306.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryColor {
    Off,
    On,
}

impl BinaryColor {
    pub fn invert(self) -> Self {
        match self {
            BinaryColor::Off => BinaryColor::On,
            BinaryColor::On => BinaryColor::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == BinaryColor::On
    }
}

impl From<bool> for BinaryColor {
    fn from(on: bool) -> Self {
        if on {
            BinaryColor::On
        } else {
            BinaryColor::Off
        }
    }
}

impl PixelColor for BinaryColor {
    const BLACK: Self = BinaryColor::Off;
    const WHITE: Self = BinaryColor::On;
}
