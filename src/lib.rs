//! Driver library for pixel-addressable display controllers: the Sitronix ST7735 16-bit color
//! TFT controller (window addressed, SPI with a D/C line) and the Solomon Systech SSD1306
//! monochrome OLED controller (column/page addressed, I2C with a control byte).
//!
//! All bus traffic is synchronous and blocking. The driver does no internal locking: a window
//! arm followed by its pixel stream is one logical operation on the controller, so callers
//! sharing a display between execution contexts must serialize whole drawing calls (wrap the
//! `Display` in a mutex, or give it a single owning task).

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate embedded_hal as hal;
#[macro_use]
extern crate itertools;


pub mod color;
pub mod command;
pub mod config;
pub mod display;
pub mod font;
pub mod interface;
pub mod model;

// Re-exports for primary API.
pub use color::{rgb_to_565, BinaryColor, PixelColor, Rgb565};
pub use config::{Config, MonoConfig, Orientation};
pub use display::text::{text_height, text_width, TextCursor};
pub use display::window::Window;
pub use display::{Display, NoResetPin, PixelCoord};
pub use interface::i2c::I2cInterface;
pub use interface::spi::SpiInterface;
pub use interface::{DisplayInterface, TransportError};
pub use model::{Model, Ssd1306, St7735};

/// Errors returned by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// The bus transport failed. The operation in progress was abandoned where it stood; nothing
    /// is retried.
    Interface(E),
    /// The reset GPIO could not be driven.
    ResetPin,
    /// A command argument was outside the range accepted by the controller.
    InvalidArgument,
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Interface(e)
    }
}
