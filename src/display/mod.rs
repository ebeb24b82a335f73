//! The main API to the display driver. It owns the bus interface and a controller model, runs the
//! power-on lifecycle, and offers methods for drawing shapes and text and for obtaining `Region`
//! instances which can be used to write image data to the display.

pub mod primitives;
pub mod region;
pub mod text;
pub mod window;

use core::convert::Infallible;

use hal::blocking::delay::DelayMs;
use hal::digital::v2::OutputPin;
use log::{debug, trace};

use crate::display::region::Region;
use crate::display::text::TextCursor;
use crate::display::window::Window;
use crate::interface::DisplayInterface;
use crate::model::{Model, Ssd1306};
use crate::Error;

/// A pixel coordinate pair of `column` and `row`, or a `width` and `height`. Coordinates may be
/// negative or beyond the display; drawing there is clipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelCoord(pub i32, pub i32);

/// Stands in for the reset line of modules that do not break it out.
pub struct NoResetPin;

impl OutputPin for NoResetPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// A driver for one display panel.
pub struct Display<DI, M>
where
    DI: DisplayInterface,
    M: Model,
{
    iface: DI,
    model: M,
    size: PixelCoord,
    window: Option<Window>,
    cursor: TextCursor<M::Color>,
}

impl<DI, M> Display<DI, M>
where
    DI: DisplayInterface,
    M: Model,
{
    /// Construct a new display driver for a panel of `size` pixels driven by the controller
    /// `model`, which is connected to the interface `iface`. Nothing is sent until `init`.
    ///
    /// Panics if the controller cannot drive a panel of that size.
    pub fn new(iface: DI, model: M, size: PixelCoord) -> Self {
        if !model.supports_size(size) {
            panic!("Display size not supported by the controller.");
        }
        Display {
            iface,
            model,
            size,
            window: None,
            cursor: TextCursor::new(),
        }
    }

    /// Reset the controller with `reset` and bring it up with its power-on sequence. The first
    /// failing step aborts initialization; calling `init` again starts over from the reset pulse.
    pub fn init<RST, DELAY>(
        &mut self,
        reset: &mut RST,
        delay: &mut DELAY,
    ) -> Result<(), Error<DI::Error>>
    where
        RST: OutputPin,
        DELAY: DelayMs<u16>,
    {
        self.window = None;
        reset.set_low().map_err(|_| Error::ResetPin)?;
        delay.delay_ms(M::RESET_PULSE_MS);
        reset.set_high().map_err(|_| Error::ResetPin)?;
        delay.delay_ms(M::RESET_PULSE_MS);
        debug!("reset pulse done");
        self.model.init(&mut self.iface, delay, self.size)?;
        debug!("display initialized, {}x{}", self.size.0, self.size.1);
        Ok(())
    }

    /// Consume the driver and give back the interface, so the caller can release the bus.
    pub fn release(self) -> DI {
        self.iface
    }

    /// The panel size in pixels.
    pub fn size(&self) -> PixelCoord {
        self.size
    }

    /// The window armed by the last `set_window`, if no pixels have been written into it yet.
    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Control sleep mode.
    pub fn sleep(&mut self, enabled: bool) -> Result<(), Error<DI::Error>> {
        self.model.sleep(&mut self.iface, enabled)
    }

    /// Turn the panel output on or off. Frame memory is kept.
    pub fn set_display_on(&mut self, on: bool) -> Result<(), Error<DI::Error>> {
        self.model.set_display_on(&mut self.iface, on)
    }

    /// Control color inversion of the whole panel.
    pub fn invert(&mut self, inverted: bool) -> Result<(), Error<DI::Error>> {
        self.model.invert(&mut self.iface, inverted)
    }

    /// Clip the rectangle at (`x`, `y`) of `w` by `h` pixels to the panel and arm the clipped
    /// window for writing. If nothing of the rectangle is visible, nothing is sent and `None` is
    /// returned; that is not an error.
    pub fn set_window(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Result<Option<Window>, Error<DI::Error>> {
        match Window::clip(x, y, w, h, self.size) {
            Some(window) => {
                self.arm(window)?;
                Ok(Some(window))
            }
            None => {
                trace!("{}x{} at ({}, {}) is off-screen, dropped", w, h, x, y);
                Ok(None)
            }
        }
    }

    /// Stream colors row-major into the armed window. At most the window's area is consumed, and
    /// the window is used up afterwards even if `colors` ran out early or the bus failed partway.
    /// After a failure the panel holds whatever part of the stream got through; redraw the region
    /// to recover. Without an armed window this does nothing.
    pub fn write_pixels<I>(&mut self, colors: I) -> Result<(), Error<DI::Error>>
    where
        I: IntoIterator<Item = M::Color>,
    {
        match self.window.take() {
            Some(window) => self.model.stream(&mut self.iface, &window, colors.into_iter()),
            None => {
                trace!("no window armed, pixels dropped");
                Ok(())
            }
        }
    }

    /// Construct a rectangular region onto which to draw image data which silently discards
    /// overscan. The rectangle *need not* lie within the panel.
    ///
    /// Regions are intended to be short-lived, and mutably borrow the display so clashing writes
    /// are prevented.
    pub fn region(&mut self, x: i32, y: i32, w: i32, h: i32) -> Region<'_, DI, M> {
        Region::new(self, x, y, w, h)
    }

    /// Draw a row-major stream of `w` by `h` pixels with its top-left corner at (`x`, `y`).
    /// Pixels outside the panel are dropped.
    pub fn draw_iter<I>(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        colors: I,
    ) -> Result<(), Error<DI::Error>>
    where
        I: IntoIterator<Item = M::Color>,
    {
        self.region(x, y, w, h).draw(colors)
    }

    fn arm(&mut self, window: Window) -> Result<(), Error<DI::Error>> {
        self.window = None;
        self.model.address_window(&mut self.iface, &window)?;
        trace!(
            "window ({}, {})-({}, {}) armed",
            window.x0,
            window.y0,
            window.x1,
            window.y1
        );
        self.window = Some(window);
        Ok(())
    }
}

impl<DI> Display<DI, Ssd1306>
where
    DI: DisplayInterface,
{
    /// Control the contrast.
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), Error<DI::Error>> {
        self.model.set_contrast(&mut self.iface, contrast)
    }
}
