//! Controller models. A `Model` knows one controller's power-on sequence, how it addresses a
//! window of frame memory, and how colors are packed on the wire. `Display` handles everything
//! that is the same for all controllers: bounds, clipping, text and shapes.

use hal::blocking::delay::DelayMs;

use crate::color::PixelColor;
use crate::display::window::Window;
use crate::display::PixelCoord;
use crate::interface::DisplayInterface;
use crate::Error;

mod ssd1306;
mod st7735;

pub use self::ssd1306::Ssd1306;
pub use self::st7735::St7735;

pub trait Model {
    /// The color of one pixel as stored by the controller.
    type Color: PixelColor;

    /// How long the reset line is held low, and then high before the first command.
    const RESET_PULSE_MS: u16;

    /// Whether a panel of `size` pixels can be driven by this controller with this configuration.
    fn supports_size(&self, size: PixelCoord) -> bool;

    /// Send the power-on sequence, ending with the display on. The hardware reset pulse has
    /// already been given.
    fn init<DI, DELAY>(
        &mut self,
        iface: &mut DI,
        delay: &mut DELAY,
        size: PixelCoord,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
        DELAY: DelayMs<u16>;

    /// Point the controller's write address at `window` and enter write mode.
    fn address_window<DI>(
        &mut self,
        iface: &mut DI,
        window: &Window,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface;

    /// Write `colors` row-major into the armed `window`. Consumes at most `window.area()` colors.
    /// A bus failure ends the stream at once; nothing more is sent.
    fn stream<DI, I>(
        &mut self,
        iface: &mut DI,
        window: &Window,
        colors: I,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
        I: Iterator<Item = Self::Color>;

    /// Control sleep mode. Frame memory survives sleep.
    fn sleep<DI>(&mut self, iface: &mut DI, enabled: bool) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface;

    /// Turn the panel output on or off without touching frame memory.
    fn set_display_on<DI>(&mut self, iface: &mut DI, on: bool) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface;

    /// Show frame memory color-inverted.
    fn invert<DI>(&mut self, iface: &mut DI, inverted: bool) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface;
}
