use hal::blocking::delay::DelayMs;
use log::debug;

use crate::color::Rgb565;
use crate::command::st7735::{BufCommand, Command, NUM_PIXEL_COLS, NUM_PIXEL_ROWS};
use crate::config::Config;
use crate::display::window::Window;
use crate::display::PixelCoord;
use crate::interface::DisplayInterface;
use crate::model::Model;
use crate::Error;

/// Register setup sent after reset, each with the time in ms the controller needs before the next
/// command. Frame rate, inversion and power levels suit the common 128x160 "red tab" modules.
#[cfg_attr(rustfmt, rustfmt_skip)]
const POWER_ON: [(Command, u16); 12] = [
    (Command::SoftwareReset, 150),
    (Command::SetSleepMode(false), 500),
    (Command::SetFrameRateNormal(0x01, 0x2C, 0x2D), 0),
    (Command::SetFrameRateIdle(0x01, 0x2C, 0x2D), 0),
    (Command::SetFrameRatePartial([0x01, 0x2C, 0x2D], [0x01, 0x2C, 0x2D]), 0),
    (Command::SetInversionControl(0x07), 0),
    (Command::SetPowerControl1(0xA2, 0x02, 0x84), 0),
    (Command::SetPowerControl2(0xC5), 0),
    (Command::SetPowerControl3(0x0A, 0x00), 0),
    (Command::SetPowerControl4(0x8A, 0x2A), 0),
    (Command::SetPowerControl5(0x8A, 0xEE), 0),
    (Command::SetVcom(0x0E), 0),
];

#[cfg_attr(rustfmt, rustfmt_skip)]
const GAMMA_POSITIVE: [u8; 16] = [
    0x02, 0x1c, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2d,
    0x29, 0x25, 0x2b, 0x39, 0x00, 0x01, 0x03, 0x10,
];

#[cfg_attr(rustfmt, rustfmt_skip)]
const GAMMA_NEGATIVE: [u8; 16] = [
    0x03, 0x1d, 0x07, 0x06, 0x2e, 0x2c, 0x29, 0x2d,
    0x2e, 0x2e, 0x37, 0x3f, 0x00, 0x00, 0x02, 0x10,
];

const NORMAL_MODE_SETTLE_MS: u16 = 10;
const DISPLAY_ON_SETTLE_MS: u16 = 100;

/// Pixel bytes sent per data transaction while streaming.
const CHUNK_BYTES: usize = 64;

/// The Sitronix ST7735 16-bit color TFT controller, window addressed, RGB565 over SPI.
pub struct St7735 {
    config: Config,
}

impl St7735 {
    pub fn new(config: Config) -> Self {
        St7735 { config }
    }
}

impl Default for St7735 {
    fn default() -> Self {
        St7735::new(Config::default())
    }
}

impl Model for St7735 {
    type Color = Rgb565;

    const RESET_PULSE_MS: u16 = 50;

    fn supports_size(&self, size: PixelCoord) -> bool {
        let (cols, rows) = if self.config.orientation_value().is_landscape() {
            (NUM_PIXEL_ROWS, NUM_PIXEL_COLS)
        } else {
            (NUM_PIXEL_COLS, NUM_PIXEL_ROWS)
        };
        let (col_offset, row_offset) = self.config.offsets();
        size.0 > 0
            && size.1 > 0
            && size.0 + i32::from(col_offset) <= i32::from(cols)
            && size.1 + i32::from(row_offset) <= i32::from(rows)
    }

    fn init<DI, DELAY>(
        &mut self,
        iface: &mut DI,
        delay: &mut DELAY,
        _size: PixelCoord,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
        DELAY: DelayMs<u16>,
    {
        for &(cmd, settle_ms) in POWER_ON.iter() {
            cmd.send(iface)?;
            if settle_ms > 0 {
                delay.delay_ms(settle_ms);
            }
        }
        self.config.send(iface)?;
        Command::SetPositiveGamma(GAMMA_POSITIVE).send(iface)?;
        Command::SetNegativeGamma(GAMMA_NEGATIVE).send(iface)?;
        Command::NormalDisplayOn.send(iface)?;
        delay.delay_ms(NORMAL_MODE_SETTLE_MS);
        Command::SetDisplayOn(true).send(iface)?;
        delay.delay_ms(DISPLAY_ON_SETTLE_MS);
        debug!("st7735: display on, madctl {:#04x}", self.config.memory_access());
        Ok(())
    }

    fn address_window<DI>(
        &mut self,
        iface: &mut DI,
        window: &Window,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let (col_offset, row_offset) = self.config.offsets();
        Command::SetColumnAddress(window.x0 + col_offset, window.x1 + col_offset).send(iface)?;
        Command::SetRowAddress(window.y0 + row_offset, window.y1 + row_offset).send(iface)?;
        BufCommand::WriteMemory(&[]).send(iface)
    }

    fn stream<DI, I>(
        &mut self,
        iface: &mut DI,
        window: &Window,
        colors: I,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
        I: Iterator<Item = Rgb565>,
    {
        // Paint the window using constant memory by alternately filling a chunk buffer from the
        // iterator and writing it to the display.
        let mut colors = colors.take(window.area());
        let mut buf = [0u8; CHUNK_BYTES];
        loop {
            let mut chunk_len = 0;
            for slot in buf.chunks_mut(2) {
                match colors.next() {
                    Some(color) => {
                        slot.copy_from_slice(&color.to_be_bytes());
                        chunk_len += 2;
                    }
                    None => break,
                }
            }
            if chunk_len > 0 {
                iface.send_data(&buf[..chunk_len])?;
            }
            // A short chunk means the window is full or the iterator ran dry.
            if chunk_len != buf.len() {
                return Ok(());
            }
        }
    }

    fn sleep<DI>(&mut self, iface: &mut DI, enabled: bool) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        Command::SetSleepMode(enabled).send(iface)
    }

    fn set_display_on<DI>(&mut self, iface: &mut DI, on: bool) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        Command::SetDisplayOn(on).send(iface)
    }

    fn invert<DI>(&mut self, iface: &mut DI, inverted: bool) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        Command::SetInversion(inverted).send(iface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLUE, RED};
    use crate::config::Orientation;
    use crate::interface::test_spy::{Sent, SpyDelay, TestSpyInterface};
    use std::iter;

    #[test]
    fn power_on_sequence() {
        let di = TestSpyInterface::new();
        let mut delay = SpyDelay::default();
        St7735::default()
            .init(&mut di.split(), &mut delay, PixelCoord(128, 160))
            .unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0x01, // software reset
            0x11, // sleep out
            0xB1, [0x01, 0x2C, 0x2D],
            0xB2, [0x01, 0x2C, 0x2D],
            0xB3, [0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D],
            0xB4, [0x07],
            0xC0, [0xA2, 0x02, 0x84],
            0xC1, [0xC5],
            0xC2, [0x0A, 0x00],
            0xC3, [0x8A, 0x2A],
            0xC4, [0x8A, 0xEE],
            0xC5, [0x0E],
            0x20, // inversion off
            0x36, [0xC8],
            0x3A, [0x05],
            0xE0, [0x02, 0x1c, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2d,
                   0x29, 0x25, 0x2b, 0x39, 0x00, 0x01, 0x03, 0x10],
            0xE1, [0x03, 0x1d, 0x07, 0x06, 0x2e, 0x2c, 0x29, 0x2d,
                   0x2e, 0x2e, 0x37, 0x3f, 0x00, 0x00, 0x02, 0x10],
            0x13, // normal display
            0x29 // display on
        ));
        assert_eq!(delay.delays, vec![150, 500, 10, 100]);
    }

    #[test]
    fn window_with_ram_offset() {
        let di = TestSpyInterface::new();
        let mut model = St7735::new(Config::new().offset(2, 1));
        let window = Window {
            x0: 0,
            y0: 0,
            x1: 127,
            y1: 159,
        };
        model.address_window(&mut di.split(), &window).unwrap();
        di.check_multi(sends!(0x2A, [0, 2, 0, 129], 0x2B, [0, 1, 0, 160], 0x2C));
    }

    #[test]
    fn stream_stops_at_window_area() {
        let di = TestSpyInterface::new();
        let mut model = St7735::default();
        let window = Window {
            x0: 3,
            y0: 4,
            x1: 4,
            y1: 4,
        };
        model
            .stream(&mut di.split(), &window, iter::repeat(RED))
            .unwrap();
        di.check_multi(sends!([0xF8, 0x00, 0xF8, 0x00]));
    }

    #[test]
    fn stream_is_chunked() {
        let di = TestSpyInterface::new();
        let mut model = St7735::default();
        let window = Window {
            x0: 0,
            y0: 0,
            x1: 9,
            y1: 9,
        };
        model
            .stream(&mut di.split(), &window, iter::repeat(BLUE))
            .unwrap();
        let lens: Vec<usize> = di
            .sent()
            .iter()
            .map(|s| match s {
                Sent::Data(d) => d.len(),
                Sent::Cmd(c) => panic!("unexpected command {:#04x}", c),
            })
            .collect();
        assert_eq!(lens, vec![64, 64, 64, 8]);
    }

    #[test]
    fn short_iterator_ends_stream() {
        let di = TestSpyInterface::new();
        let mut model = St7735::default();
        let window = Window::full(PixelCoord(128, 160));
        model
            .stream(&mut di.split(), &window, iter::repeat(RED).take(3))
            .unwrap();
        di.check_multi(sends!([0xF8, 0x00, 0xF8, 0x00, 0xF8, 0x00]));
    }

    #[test]
    fn supported_sizes() {
        let portrait = St7735::default();
        assert!(portrait.supports_size(PixelCoord(128, 160)));
        assert!(portrait.supports_size(PixelCoord(132, 162)));
        assert!(!portrait.supports_size(PixelCoord(160, 128)));
        assert!(!portrait.supports_size(PixelCoord(0, 160)));
        let landscape = St7735::new(Config::new().orientation(Orientation::Landscape));
        assert!(landscape.supports_size(PixelCoord(160, 128)));
        let offset = St7735::new(Config::new().offset(26, 1));
        assert!(offset.supports_size(PixelCoord(80, 160)));
        assert!(!offset.supports_size(PixelCoord(128, 160)));
    }
}
