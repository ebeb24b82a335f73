//! Region abstraction for drawing into rectangular regions of the display. A region may
//! "overscan" the display, i.e. portions of it may lie outside the displayable area. Image data
//! written there is silently discarded, to relieve the user from having to consider boundary
//! conditions in code where the region rectangle is dynamically computed.

use core::iter;

use log::trace;

use crate::display::window::Window;
use crate::display::Display;
use crate::interface::DisplayInterface;
use crate::model::Model;
use crate::Error;

/// A handle to a rectangular region of a display which can be drawn into.
///
/// These are intended to be short-lived, and contain a mutable borrow of the display that issued
/// them so clashing writes are prevented.
pub struct Region<'di, DI, M>
where
    DI: 'di + DisplayInterface,
    M: 'di + Model,
{
    display: &'di mut Display<DI, M>,
    viewable: Option<Window>,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

impl<'di, DI, M> Region<'di, DI, M>
where
    DI: 'di + DisplayInterface,
    M: 'di + Model,
{
    /// Construct a new region. This is only called by the factory method `Display::region`.
    pub(super) fn new(display: &'di mut Display<DI, M>, x: i32, y: i32, w: i32, h: i32) -> Self {
        let viewable = Window::clip(x, y, w, h, display.size);
        Self {
            display,
            viewable,
            left: x,
            top: y,
            width: w,
            height: h,
        }
    }

    /// The part of the region that is on the panel, if any.
    pub fn viewable(&self) -> Option<Window> {
        self.viewable
    }

    /// Paint the whole viewable part of the region in one color, through a single window.
    pub fn fill(&mut self, color: M::Color) -> Result<(), Error<DI::Error>> {
        let window = match self.viewable {
            Some(window) => window,
            None => {
                self.trace_dropped();
                return Ok(());
            }
        };
        self.display.arm(window)?;
        self.display.write_pixels(iter::repeat(color))
    }

    /// Draw pixel data into the region, left-to-right and top-to-bottom. The sequence of pixels
    /// is filtered such that only pixels which intersect the displayable area are transmitted to
    /// the hardware.
    pub fn draw<I>(&mut self, colors: I) -> Result<(), Error<DI::Error>>
    where
        I: IntoIterator<Item = M::Color>,
    {
        let window = match self.viewable {
            Some(window) => window,
            None => {
                self.trace_dropped();
                return Ok(());
            }
        };
        let input_coords = iproduct!(
            self.top..self.top.saturating_add(self.height),
            self.left..self.left.saturating_add(self.width)
        );
        let only_viewable = input_coords
            .zip(colors)
            .filter(move |((r, c), _)| window.contains(*c, *r))
            .map(|(_, color)| color);
        self.display.arm(window)?;
        self.display.write_pixels(only_viewable)
    }

    fn trace_dropped(&self) {
        trace!(
            "{}x{} at ({}, {}) is off-screen, dropped",
            self.width,
            self.height,
            self.left,
            self.top
        );
    }
}
