//! Shape rasterization. Every primitive clips against the panel; anything falling entirely
//! outside it is dropped without bus traffic.

use crate::color::PixelColor;
use crate::display::window::in_range;
use crate::display::{Display, PixelCoord};
use crate::interface::DisplayInterface;
use crate::model::Model;
use crate::Error;

/// Start and length of the inclusive run between `a` and `b`, trimmed to at most one pixel
/// beyond either end of `0..limit` so the length cannot overflow.
fn span(a: i32, b: i32, limit: i32) -> (i32, i32) {
    let start = a.min(b).max(-1);
    let end = a.max(b).min(limit);
    (start, end - start + 1)
}

impl<DI, M> Display<DI, M>
where
    DI: DisplayInterface,
    M: Model,
{
    /// Set a single pixel. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: M::Color) -> Result<(), Error<DI::Error>> {
        if !in_range(x, 0, self.size.0) || !in_range(y, 0, self.size.1) {
            return Ok(());
        }
        self.fill_rect(x, y, 1, 1, color)
    }

    /// `set_pixel` for coordinates computed in wide arithmetic.
    fn plot(&mut self, x: i64, y: i64, color: M::Color) -> Result<(), Error<DI::Error>> {
        if !in_range(x, 0, i64::from(self.size.0)) || !in_range(y, 0, i64::from(self.size.1)) {
            return Ok(());
        }
        self.fill_rect(x as i32, y as i32, 1, 1, color)
    }

    /// Whether the box `x0..=x1` by `y0..=y1` misses the panel entirely.
    fn off_panel(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> bool {
        x1 < 0 || y1 < 0 || x0 >= i64::from(self.size.0) || y0 >= i64::from(self.size.1)
    }

    /// Fill a rectangle through a single window over its visible part.
    pub fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: M::Color,
    ) -> Result<(), Error<DI::Error>> {
        self.region(x, y, w, h).fill(color)
    }

    pub fn fill_screen(&mut self, color: M::Color) -> Result<(), Error<DI::Error>> {
        let PixelCoord(w, h) = self.size;
        self.fill_rect(0, 0, w, h, color)
    }

    /// Fill the panel with black.
    pub fn clear(&mut self) -> Result<(), Error<DI::Error>> {
        self.fill_screen(M::Color::BLACK)
    }

    /// Horizontal line of `len` pixels starting at (`x`, `y`) and extending right.
    pub fn hline(
        &mut self,
        x: i32,
        y: i32,
        len: i32,
        color: M::Color,
    ) -> Result<(), Error<DI::Error>> {
        self.fill_rect(x, y, len, 1, color)
    }

    /// Vertical line of `len` pixels starting at (`x`, `y`) and extending down.
    pub fn vline(
        &mut self,
        x: i32,
        y: i32,
        len: i32,
        color: M::Color,
    ) -> Result<(), Error<DI::Error>> {
        self.fill_rect(x, y, 1, len, color)
    }

    /// Rectangle outline: top, bottom, left and right edges in that order.
    pub fn rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: M::Color,
    ) -> Result<(), Error<DI::Error>> {
        let right = x.saturating_add(w).saturating_sub(1);
        let bottom = y.saturating_add(h).saturating_sub(1);
        self.hline(x, y, w, color)?;
        self.hline(x, bottom, w, color)?;
        self.vline(x, y, h, color)?;
        self.vline(right, y, h, color)
    }

    /// Straight line between two points, both included.
    pub fn line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: M::Color,
    ) -> Result<(), Error<DI::Error>> {
        if y0 == y1 {
            let (x, len) = span(x0, x1, self.size.0);
            return self.hline(x, y0, len, color);
        }
        if x0 == x1 {
            let (y, len) = span(y0, y1, self.size.1);
            return self.vline(x0, y, len, color);
        }

        let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
        if self.off_panel(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)) {
            return Ok(());
        }

        // Bresenham, with the error term covering both octant halves.
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        let mut entered = false;
        loop {
            if self.off_panel(x, y, x, y) {
                // The path is monotone in both axes, so once it leaves the panel it is done.
                if entered {
                    return Ok(());
                }
            } else {
                entered = true;
                self.plot(x, y, color)?;
            }
            if x == x1 && y == y1 {
                return Ok(());
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Circle outline of radius `r` around (`cx`, `cy`), by the integer midpoint algorithm. All
    /// eight reflections are plotted on every step, so pixels on the axes and diagonals are sent
    /// more than once.
    pub fn draw_circle(
        &mut self,
        cx: i32,
        cy: i32,
        r: i32,
        color: M::Color,
    ) -> Result<(), Error<DI::Error>> {
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(r));
        if self.off_panel(cx - r, cy - r, cx + r, cy + r) {
            return Ok(());
        }
        let mut x = r;
        let mut y = 0;
        let mut err = 0;
        while x >= y {
            self.plot(cx + x, cy + y, color)?;
            self.plot(cx + y, cy + x, color)?;
            self.plot(cx - y, cy + x, color)?;
            self.plot(cx - x, cy + y, color)?;
            self.plot(cx - x, cy - y, color)?;
            self.plot(cx - y, cy - x, color)?;
            self.plot(cx + y, cy - x, color)?;
            self.plot(cx + x, cy - y, color)?;

            if err <= 0 {
                y += 1;
                err += 2 * y + 1;
            }
            if err > 0 {
                x -= 1;
                err -= 2 * x + 1;
            }
        }
        Ok(())
    }

    /// Filled disc of radius `r` around (`cx`, `cy`): every offset with `dx² + dy² <= r²`. Only
    /// the part of the bounding square that lies on the panel is scanned.
    pub fn fill_circle(
        &mut self,
        cx: i32,
        cy: i32,
        r: i32,
        color: M::Color,
    ) -> Result<(), Error<DI::Error>> {
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(r));
        let rows = (cy - r).max(0)..=(cy + r).min(i64::from(self.size.1) - 1);
        let cols = (cx - r).max(0)..=(cx + r).min(i64::from(self.size.0) - 1);
        // |dx|, |dy| <= r <= i32::MAX, so the sum of squares stays below i64::MAX.
        for (y, x) in iproduct!(rows, cols) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r * r {
                self.plot(x, y, color)?;
            }
        }
        Ok(())
    }
}
