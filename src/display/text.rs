//! Text layout with the built-in 5x8 font. Characters advance by one glyph plus one spacing
//! column, lines by one glyph plus one spacing row, both multiplied by the integer scale.

use core::fmt::{self, Write};

use heapless::String;

use crate::color::PixelColor;
use crate::display::{Display, PixelCoord};
use crate::font::{self, FONT_HEIGHT, FONT_WIDTH};
use crate::interface::DisplayInterface;
use crate::model::Model;
use crate::Error;

/// Horizontal advance per character at scale 1.
pub const CHAR_ADVANCE: i32 = FONT_WIDTH + 1;
/// Vertical advance per line at scale 1.
pub const LINE_ADVANCE: i32 = FONT_HEIGHT + 1;

/// Capacity of the buffer `Display::print` formats into. Longer output is cut off.
pub const PRINT_BUFFER: usize = 256;

fn effective_scale(scale: u8) -> i32 {
    i32::from(scale.max(1))
}

/// Width in pixels of the widest line of `text`, counting a full character advance (glyph and
/// spacing column) per character. Both `'\n'` and `'\r'` start a new line.
pub fn text_width(text: &str, scale: u8) -> i32 {
    let widest = text
        .split(|c| c == '\n' || c == '\r')
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    widest as i32 * CHAR_ADVANCE * effective_scale(scale)
}

/// Height in pixels of one line of text.
pub fn text_height(scale: u8) -> i32 {
    FONT_HEIGHT * effective_scale(scale)
}

/// Where `Display::print` draws next, and in which style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextCursor<C> {
    pub position: PixelCoord,
    pub foreground: C,
    pub background: C,
    pub scale: u8,
}

impl<C: PixelColor> TextCursor<C> {
    /// White on black at scale 1, in the top-left corner.
    pub fn new() -> Self {
        TextCursor {
            position: PixelCoord(0, 0),
            foreground: C::WHITE,
            background: C::BLACK,
            scale: 1,
        }
    }
}

impl<C: PixelColor> Default for TextCursor<C> {
    fn default() -> Self {
        TextCursor::new()
    }
}

/// Formats into a fixed buffer, silently dropping whatever does not fit.
struct Truncating<'a>(&'a mut String<PRINT_BUFFER>);

impl<'a> Write for Truncating<'a> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

impl<DI, M> Display<DI, M>
where
    DI: DisplayInterface,
    M: Model,
{
    /// Draw one character with its top-left corner at (`x`, `y`). Characters outside printable
    /// ASCII are drawn as `'?'`.
    ///
    /// If `bg` differs from `fg` the whole character cell, including the spacing column after
    /// the glyph, is painted as one block. Otherwise only the set pixels are drawn and the
    /// background shows through.
    pub fn draw_char(
        &mut self,
        x: i32,
        y: i32,
        ch: char,
        fg: M::Color,
        bg: M::Color,
        scale: u8,
    ) -> Result<(), Error<DI::Error>> {
        let s = effective_scale(scale);
        let glyph = font::glyph(ch);
        if fg != bg {
            let cell_w = CHAR_ADVANCE * s;
            let cell_h = FONT_HEIGHT * s;
            let pixels = iproduct!(0..cell_h, 0..cell_w).map(move |(row, col)| {
                if glyph.is_set(col / s, row / s) {
                    fg
                } else {
                    bg
                }
            });
            return self.draw_iter(x, y, cell_w, cell_h, pixels);
        }
        for (col, row) in iproduct!(0..FONT_WIDTH, 0..FONT_HEIGHT) {
            if !glyph.is_set(col, row) {
                continue;
            }
            let (px, py) = (x.saturating_add(col * s), y.saturating_add(row * s));
            if s == 1 {
                self.set_pixel(px, py, fg)?;
            } else {
                self.fill_rect(px, py, s, s, fg)?;
            }
        }
        Ok(())
    }

    /// Draw `text` starting at (`x`, `y`). `'\n'` moves to the start of the next line, `'\r'` to
    /// the start of the current one. A character that would cross the right edge wraps to the
    /// next line first; drawing stops at the first character whose line would cross the bottom
    /// edge.
    pub fn draw_string(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: M::Color,
        bg: M::Color,
        scale: u8,
    ) -> Result<(), Error<DI::Error>> {
        let s = effective_scale(scale);
        let (mut cur_x, mut cur_y) = (x, y);
        for ch in text.chars() {
            match ch {
                '\n' => {
                    cur_x = x;
                    cur_y = cur_y.saturating_add(LINE_ADVANCE * s);
                }
                '\r' => cur_x = x,
                _ => {
                    if cur_x.saturating_add(CHAR_ADVANCE * s) > self.size.0 {
                        cur_x = x;
                        cur_y = cur_y.saturating_add(LINE_ADVANCE * s);
                    }
                    if cur_y.saturating_add(FONT_HEIGHT * s) > self.size.1 {
                        break;
                    }
                    self.draw_char(cur_x, cur_y, ch, fg, bg, scale)?;
                    cur_x = cur_x.saturating_add(CHAR_ADVANCE * s);
                }
            }
        }
        Ok(())
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor.position = PixelCoord(x, y);
    }

    pub fn cursor(&self) -> PixelCoord {
        self.cursor.position
    }

    /// Colors and scale used by `print`.
    pub fn set_text_style(&mut self, fg: M::Color, bg: M::Color, scale: u8) {
        self.cursor.foreground = fg;
        self.cursor.background = bg;
        self.cursor.scale = scale;
    }

    pub fn text_cursor(&self) -> &TextCursor<M::Color> {
        &self.cursor
    }

    /// Format `args` and draw the result at the cursor, then move the cursor past it: right by
    /// the characters on the last line, down by the number of line breaks. Wrapping done by
    /// `draw_string` does not move the cursor.
    ///
    /// ```ignore
    /// disp.print(format_args!("Temp: {:.1}C", temp))?;
    /// ```
    pub fn print(&mut self, args: fmt::Arguments) -> Result<(), Error<DI::Error>> {
        let mut buf: String<PRINT_BUFFER> = String::new();
        // Truncating never fails; an error here can only come from a Display impl.
        Truncating(&mut buf).write_fmt(args).ok();

        let TextCursor {
            position,
            foreground,
            background,
            scale,
        } = self.cursor;
        self.draw_string(position.0, position.1, &buf, foreground, background, scale)?;

        let s = effective_scale(scale);
        let breaks = buf.matches('\n').count() as i32;
        let last_line = buf.rsplit('\n').next().unwrap_or("");
        let last_line_chars = last_line.chars().filter(|&c| c != '\r').count() as i32;
        self.cursor.position = PixelCoord(
            position.0.saturating_add(last_line_chars * CHAR_ADVANCE * s),
            position.1.saturating_add(breaks * LINE_ADVANCE * s),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::iter;

    use super::*;
    use crate::color::{BinaryColor, Rgb565, BLACK, RED, WHITE};
    use crate::interface::test_spy::{PanelSim, Sent, SpyError, TestSpyInterface};
    use crate::model::{Ssd1306, St7735};

    fn panel() -> (PanelSim, Display<PanelSim, St7735>) {
        let sim = PanelSim::new(128, 160);
        let disp = Display::new(sim.split(), St7735::default(), PixelCoord(128, 160));
        (sim, disp)
    }

    fn lit(sim: &PanelSim) -> BTreeSet<(i32, i32)> {
        sim.pixels_of(WHITE.0).into_iter().collect()
    }

    #[test]
    fn measurement() {
        assert_eq!(text_width("Hi", 1), 12);
        assert_eq!(text_width("ab\nabcd", 2), 48);
        assert_eq!(text_width("abc\r\nx", 1), 18);
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("a", 0), 6);
        assert_eq!(text_height(1), 8);
        assert_eq!(text_height(3), 24);
    }

    #[test]
    fn width_matches_rendered_extent() {
        let (sim, mut disp) = panel();
        disp.draw_string(0, 0, "Hi", WHITE, BLACK, 1).unwrap();
        let windows = sim.windows();
        let left = windows.iter().map(|w| w.0).min().unwrap();
        let right = windows.iter().map(|w| w.2).max().unwrap();
        let top = windows.iter().map(|w| w.1).min().unwrap();
        let bottom = windows.iter().map(|w| w.3).max().unwrap();
        assert_eq!(i32::from(right - left) + 1, text_width("Hi", 1));
        assert_eq!(i32::from(bottom - top) + 1, text_height(1));
    }

    #[test]
    fn opaque_char_is_one_window() {
        let (sim, mut disp) = panel();
        disp.draw_char(10, 20, '!', WHITE, RED, 1).unwrap();
        assert_eq!(sim.windows(), vec![(10, 20, 15, 27)]);
        assert_eq!(sim.units(), 48);
        let expected: BTreeSet<_> = [0, 1, 2, 3, 4, 6].iter().map(|&r| (12, 20 + r)).collect();
        assert_eq!(lit(&sim), expected);
        assert_eq!(sim.pixels_of(RED.0).len(), 48 - 6);
    }

    #[test]
    fn opaque_char_scaled() {
        let (sim, mut disp) = panel();
        disp.draw_char(0, 0, '!', WHITE, RED, 2).unwrap();
        assert_eq!(sim.windows(), vec![(0, 0, 11, 15)]);
        assert_eq!(lit(&sim).len(), 6 * 4);
        assert!(lit(&sim).contains(&(5, 13)));
    }

    #[test]
    fn transparent_char_draws_set_bits_only() {
        let (sim, mut disp) = panel();
        disp.fill_rect(0, 0, 20, 20, RED).unwrap();
        sim.reset_counters();
        disp.draw_char(0, 0, '!', WHITE, WHITE, 1).unwrap();
        assert_eq!(sim.windows().len(), 6);
        assert_eq!(sim.pixels_of(RED.0).len(), 400 - 6);

        sim.reset_counters();
        disp.draw_char(10, 0, '!', WHITE, WHITE, 2).unwrap();
        assert_eq!(sim.windows().len(), 6);
        assert_eq!(sim.units(), 24);
    }

    #[test]
    fn unknown_char_draws_fallback() {
        let (sim_a, mut a) = panel();
        let (sim_b, mut b) = panel();
        a.draw_char(0, 0, 'é', WHITE, BLACK, 1).unwrap();
        b.draw_char(0, 0, '?', WHITE, BLACK, 1).unwrap();
        assert_eq!(lit(&sim_a), lit(&sim_b));
        assert!(!lit(&sim_a).is_empty());
    }

    #[test]
    fn string_stops_at_bottom_edge() {
        let (sim, mut disp) = panel();
        disp.draw_string(0, 150, "Hi\nBye", WHITE, BLACK, 1).unwrap();
        assert_eq!(sim.windows(), vec![(0, 150, 5, 157), (6, 150, 11, 157)]);
        assert!(lit(&sim).iter().all(|&(_, y)| y >= 150 && y < 158));
    }

    #[test]
    fn string_wraps_at_right_edge() {
        let (sim, mut disp) = panel();
        disp.draw_string(120, 0, "AB", WHITE, BLACK, 1).unwrap();
        assert_eq!(sim.windows(), vec![(120, 0, 125, 7), (120, 9, 125, 16)]);
    }

    #[test]
    fn carriage_return_and_newline() {
        let (sim, mut disp) = panel();
        disp.draw_string(4, 2, "ab\rc\nd", WHITE, BLACK, 2).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        assert_eq!(sim.windows(), vec![
            (4, 2, 15, 17),   // a
            (16, 2, 27, 17),  // b
            (4, 2, 15, 17),   // c over a
            (4, 20, 15, 35),  // d
        ]);
    }

    #[test]
    fn print_advances_cursor() {
        let (sim, mut disp) = panel();
        disp.set_cursor(0, 0);
        disp.print(format_args!("ab\n{}", 42)).unwrap();
        assert_eq!(disp.cursor(), PixelCoord(12, 9));
        disp.print(format_args!("x")).unwrap();
        assert_eq!(disp.cursor(), PixelCoord(18, 9));
        assert_eq!(sim.windows().len(), 5);
        assert_eq!(sim.windows()[4], (12, 9, 17, 16));
    }

    #[test]
    fn print_uses_text_style() {
        let (sim, mut disp) = panel();
        disp.set_text_style(RED, RED, 2);
        disp.set_cursor(5, 5);
        disp.print(format_args!("\r!")).unwrap();
        assert_eq!(disp.cursor(), PixelCoord(17, 5));
        assert_eq!(sim.pixels_of(RED.0).len(), 24);
        assert_eq!(disp.text_cursor().scale, 2);
    }

    #[test]
    fn print_truncates_long_output() {
        let (_sim, mut disp) = panel();
        let long: std::string::String = iter::repeat('a').take(300).collect();
        disp.print(format_args!("{}", long)).unwrap();
        assert_eq!(disp.cursor(), PixelCoord(256 * 6, 0));
    }

    #[test]
    fn extreme_positions_clip_without_overflow() {
        let (sim, mut disp) = panel();
        disp.draw_string(i32::MAX - 2, 0, "A", WHITE, BLACK, 1).unwrap();
        disp.draw_string(0, i32::MAX - 2, "A\nB", WHITE, BLACK, 3).unwrap();
        disp.draw_string(i32::MIN, 0, "AB", WHITE, BLACK, 255).unwrap();
        disp.draw_char(i32::MAX - 2, 0, 'A', WHITE, WHITE, 4).unwrap();
        disp.draw_char(0, i32::MAX, 'A', WHITE, WHITE, 1).unwrap();
        assert!(sim.windows().is_empty());

        disp.set_cursor(i32::MAX - 3, i32::MAX - 3);
        disp.print(format_args!("ab\ncd")).unwrap();
        assert_eq!(disp.cursor(), PixelCoord(i32::MAX, i32::MAX));
        assert!(sim.windows().is_empty());
    }

    #[test]
    fn string_aborts_on_bus_failure() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), St7735::default(), PixelCoord(128, 160));
        // The first glyph's window is armed, then its pixels fail.
        di.fail_after(5);
        assert_eq!(
            disp.draw_string(0, 0, "AB", WHITE, BLACK, 1),
            Err(Error::Interface(SpyError))
        );
        assert_eq!(di.sent().len(), 5);
        assert_eq!(di.failures(), 1);
        assert_eq!(disp.window(), None);
    }

    #[test]
    fn default_cursor() {
        let cursor: TextCursor<Rgb565> = TextCursor::default();
        assert_eq!(cursor.position, PixelCoord(0, 0));
        assert_eq!(cursor.foreground, WHITE);
        assert_eq!(cursor.background, BLACK);
        assert_eq!(cursor.scale, 1);
    }

    #[test]
    fn mono_glyph_bytes() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), Ssd1306::default(), PixelCoord(128, 64));
        disp.draw_char(0, 0, '|', BinaryColor::On, BinaryColor::Off, 1)
            .unwrap();
        di.check_multi(sends!(0x21, 0, 5, 0x22, 0, 0, [0x00, 0x00, 0x7F, 0x00, 0x00, 0x00]));
    }
}
