//! The controller-side addressing window: the inclusive rectangle that the next pixel stream is
//! written into, row-major from its top-left corner.

use crate::display::PixelCoord;

/// An addressing window, inclusive on both ends. A `Window` always lies inside the display it was
/// clipped against: `x0 <= x1 < width` and `y0 <= y1 < height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

/// Clip a value between some low and high limit.
pub(crate) fn clip<T: PartialOrd>(lo: T, x: T, hi: T) -> T {
    match () {
        _ if x > hi => hi,
        _ if x < lo => lo,
        _ => x,
    }
}

pub(crate) fn in_range<T: PartialOrd>(x: T, lo: T, hi: T) -> bool {
    x >= lo && x < hi
}

impl Window {
    /// Clip the rectangle at (`x`, `y`) of `w` by `h` pixels against a display of `size`. Returns
    /// `None` if nothing of it is visible, including when `w` or `h` is not positive.
    pub fn clip(x: i32, y: i32, w: i32, h: i32, size: PixelCoord) -> Option<Window> {
        if w <= 0 || h <= 0 {
            return None;
        }
        let left = clip(0, x, size.0);
        let right = clip(0, x.saturating_add(w), size.0);
        let top = clip(0, y, size.1);
        let bottom = clip(0, y.saturating_add(h), size.1);
        if left >= right || top >= bottom {
            return None;
        }
        Some(Window {
            x0: left as u16,
            y0: top as u16,
            x1: (right - 1) as u16,
            y1: (bottom - 1) as u16,
        })
    }

    /// The window covering a whole display of `size`.
    pub fn full(size: PixelCoord) -> Window {
        Window {
            x0: 0,
            y0: 0,
            x1: (size.0 - 1) as u16,
            y1: (size.1 - 1) as u16,
        }
    }

    pub fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    /// Number of pixel units the window accepts before it is full.
    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        in_range(x, i32::from(self.x0), i32::from(self.x1) + 1)
            && in_range(y, i32::from(self.y0), i32::from(self.y1) + 1)
    }
}
