use core::convert::TryFrom;

use hal::blocking::delay::DelayMs;
use log::debug;

use crate::color::BinaryColor;
use crate::command::ssd1306::{AddressingMode, Command, NUM_COLUMNS, NUM_PAGES};
use crate::config::MonoConfig;
use crate::display::window::Window;
use crate::display::PixelCoord;
use crate::interface::DisplayInterface;
use crate::model::Model;
use crate::Error;

const STRIDE: usize = NUM_COLUMNS as usize;
const BUFFER_SIZE: usize = STRIDE * NUM_PAGES as usize;

const DISPLAY_ON_SETTLE_MS: u16 = 100;

/// The Solomon Systech SSD1306 monochrome OLED controller, column/page addressed over I2C.
///
/// One byte of display RAM holds 8 vertically stacked pixels, so a window whose rows do not line
/// up with page boundaries cannot be written without knowing the pixels around it. The model keeps
/// a mirror of the whole RAM; streaming into a window updates the mirror and then sends every page
/// byte the window touches. If the bus fails partway through, the mirror is ahead of the panel for
/// that window until it is drawn again.
///
/// The mirror is indexed by panel column; the configured column offset is applied only when the
/// controller's address window is set.
pub struct Ssd1306 {
    config: MonoConfig,
    buffer: [u8; BUFFER_SIZE],
}

impl Ssd1306 {
    pub fn new(config: MonoConfig) -> Self {
        Ssd1306 {
            config,
            buffer: [0; BUFFER_SIZE],
        }
    }

    /// Change the contrast at runtime.
    pub fn set_contrast<DI>(&mut self, iface: &mut DI, contrast: u8) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        Command::SetContrast(contrast).send(iface)?;
        self.config = self.config.contrast(contrast);
        Ok(())
    }

    fn set_bit(&mut self, x: u16, y: u16, color: BinaryColor) {
        let idx = (y as usize / 8) * STRIDE + x as usize;
        let mask = 1 << (y % 8);
        if color.is_on() {
            self.buffer[idx] |= mask;
        } else {
            self.buffer[idx] &= !mask;
        }
    }

    #[cfg(test)]
    fn bit(&self, x: u16, y: u16) -> bool {
        self.buffer[(y as usize / 8) * STRIDE + x as usize] & (1 << (y % 8)) != 0
    }

    /// Send the mirror bytes covering `window`, page by page. The controller's address window
    /// must already be set to the same columns and pages.
    fn flush<DI>(&self, iface: &mut DI, window: &Window) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        for page in (window.y0 / 8)..=(window.y1 / 8) {
            let row = page as usize * STRIDE;
            iface.send_data(&self.buffer[row + window.x0 as usize..=row + window.x1 as usize])?;
        }
        Ok(())
    }
}

impl Default for Ssd1306 {
    fn default() -> Self {
        Ssd1306::new(MonoConfig::default())
    }
}

impl Model for Ssd1306 {
    type Color = BinaryColor;

    const RESET_PULSE_MS: u16 = 10;

    fn supports_size(&self, size: PixelCoord) -> bool {
        let cols = i32::from(NUM_COLUMNS) - i32::from(self.config.col_offset());
        size.0 > 0 && size.0 <= cols && (size.1 == 32 || size.1 == 64)
    }

    fn init<DI, DELAY>(
        &mut self,
        iface: &mut DI,
        delay: &mut DELAY,
        size: PixelCoord,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
        DELAY: DelayMs<u16>,
    {
        Command::SetDisplayOn(false).send(iface)?;
        Command::SetClockDivide(0x80).send(iface)?;
        Command::SetMuxRatio(size.1 as u8).send(iface)?;
        Command::SetDisplayOffset(0).send(iface)?;
        Command::SetStartLine(0).send(iface)?;
        Command::SetChargePump(true).send(iface)?;
        Command::SetAddressingMode(AddressingMode::Horizontal).send(iface)?;
        self.config.send(iface)?;
        Command::SetComPins(size.1 == 64, false).send(iface)?;
        Command::SetContrast(self.config.contrast_value()).send(iface)?;
        Command::SetPrecharge(0xF1).send(iface)?;
        Command::SetVcomhDeselect(0x40).send(iface)?;
        Command::EntireDisplayOn(false).send(iface)?;
        Command::SetInvert(false).send(iface)?;

        // RAM content is undefined after reset.
        self.buffer = [0; BUFFER_SIZE];
        let all = Window::full(size);
        self.address_window(iface, &all)?;
        self.flush(iface, &all)?;

        Command::SetDisplayOn(true).send(iface)?;
        delay.delay_ms(DISPLAY_ON_SETTLE_MS);
        debug!("ssd1306: display on, {}x{}", size.0, size.1);
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
        // Columns that do not fit a byte become 255, which the command encoder rejects.
        let offset = u16::from(self.config.col_offset());
        let column = |x: u16| u8::try_from(x + offset).unwrap_or(u8::MAX);
        Command::SetColumnAddress(column(window.x0), column(window.x1)).send(iface)?;
        Command::SetPageAddress((window.y0 / 8) as u8, (window.y1 / 8) as u8).send(iface)
    }

    fn stream<DI, I>(
        &mut self,
        iface: &mut DI,
        window: &Window,
        colors: I,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
        I: Iterator<Item = BinaryColor>,
    {
        let coords = iproduct!(window.y0..=window.y1, window.x0..=window.x1);
        for ((y, x), color) in coords.zip(colors) {
            self.set_bit(x, y, color);
        }
        self.flush(iface, window)
    }

    /// Sleep on the SSD1306 is the display-off state; RAM and configuration are kept.
    fn sleep<DI>(&mut self, iface: &mut DI, enabled: bool) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        Command::SetDisplayOn(!enabled).send(iface)
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
        Command::SetInvert(inverted).send(iface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{Sent, SpyDelay, SpyError, TestSpyInterface};
    use std::iter;

    fn data_lens(di: &TestSpyInterface) -> Vec<usize> {
        di.sent()
            .iter()
            .filter_map(|s| match s {
                Sent::Data(d) => Some(d.len()),
                Sent::Cmd(_) => None,
            })
            .collect()
    }

    #[test]
    fn power_on_sequence_64_rows() {
        let di = TestSpyInterface::new();
        let mut delay = SpyDelay::default();
        let mut model = Ssd1306::default();
        model
            .init(&mut di.split(), &mut delay, PixelCoord(128, 64))
            .unwrap();
        let sent = di.sent();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let expected_setup: &[Sent] = sends!(
            0xAE, // display off
            0xD5, 0x80, // clock divide
            0xA8, 63, // multiplex
            0xD3, 0x00, // display offset
            0x40, // start line 0
            0x8D, 0x14, // charge pump on
            0x20, 0x00, // horizontal addressing
            0xA1, // segment remap
            0xC8, // COM scan reverse
            0xDA, 0x12, // alternative COM pins
            0x81, 0xCF, // contrast
            0xD9, 0xF1, // precharge
            0xDB, 0x40, // VCOMH deselect
            0xA4, // follow RAM
            0xA6, // not inverted
            0x21, 0, 127, // column window
            0x22, 0, 7 // page window
        );
        assert_eq!(&sent[..expected_setup.len()], expected_setup);
        assert_eq!(sent.last(), Some(&Sent::Cmd(0xAF)));
        // 8 cleared pages of 128 columns.
        assert_eq!(data_lens(&di), vec![128; 8]);
        assert!(sent
            .iter()
            .all(|s| if let Sent::Data(d) = s { d.iter().all(|&b| b == 0) } else { true }));
        assert_eq!(delay.delays, vec![100]);
    }

    #[test]
    fn power_on_sequence_32_rows() {
        let di = TestSpyInterface::new();
        let mut delay = SpyDelay::default();
        Ssd1306::new(MonoConfig::new().contrast(0x8F).flip(false))
            .init(&mut di.split(), &mut delay, PixelCoord(128, 32))
            .unwrap();
        let sent = di.sent();
        assert_eq!(&sent[3..5], sends!(0xA8, 31));
        assert_eq!(&sent[12..18], sends!(0xA0, 0xC0, 0xDA, 0x02, 0x81, 0x8F));
        assert_eq!(data_lens(&di), vec![128; 4]);
    }

    #[test]
    fn stream_updates_mirror_and_sends_touched_pages() {
        let di = TestSpyInterface::new();
        let mut model = Ssd1306::default();
        // Rows 6..=9 straddle pages 0 and 1.
        let window = Window {
            x0: 10,
            y0: 6,
            x1: 11,
            y1: 9,
        };
        model.address_window(&mut di.split(), &window).unwrap();
        model
            .stream(&mut di.split(), &window, iter::repeat(BinaryColor::On))
            .unwrap();
        di.check_multi(sends!(
            0x21, 10, 11,
            0x22, 0, 1,
            [0xC0, 0xC0],
            [0x03, 0x03]
        ));
        assert!(model.bit(10, 6) && model.bit(11, 9));
        assert!(!model.bit(10, 5) && !model.bit(12, 6) && !model.bit(10, 10));
    }

    #[test]
    fn stream_keeps_neighbouring_bits() {
        let di = TestSpyInterface::new();
        let mut model = Ssd1306::default();
        let column = Window {
            x0: 0,
            y0: 0,
            x1: 0,
            y1: 7,
        };
        model
            .stream(&mut di.split(), &column, iter::repeat(BinaryColor::On))
            .unwrap();
        di.clear();
        let pixel = Window {
            x0: 0,
            y0: 3,
            x1: 0,
            y1: 3,
        };
        model
            .stream(&mut di.split(), &pixel, iter::once(BinaryColor::Off))
            .unwrap();
        di.check_multi(sends!([0xF7]));
    }

    #[test]
    fn flush_failure_leaves_mirror_ahead_of_panel() {
        let di = TestSpyInterface::new();
        let mut model = Ssd1306::default();
        let window = Window {
            x0: 10,
            y0: 6,
            x1: 11,
            y1: 9,
        };
        // Page 0 gets through, page 1 does not.
        di.fail_after(1);
        assert_eq!(
            model.stream(&mut di.split(), &window, iter::repeat(BinaryColor::On)),
            Err(Error::Interface(SpyError))
        );
        di.check_multi(sends!([0xC0, 0xC0]));
        assert_eq!(di.failures(), 1);
        assert!(model.bit(10, 6) && model.bit(11, 9));

        // Drawing the region again brings the panel back in line with the mirror.
        let retry = TestSpyInterface::new();
        model
            .stream(&mut retry.split(), &window, iter::repeat(BinaryColor::On))
            .unwrap();
        retry.check_multi(sends!([0xC0, 0xC0], [0x03, 0x03]));
    }

    #[test]
    fn column_offset_for_narrow_panels() {
        let di = TestSpyInterface::new();
        let mut model = Ssd1306::new(MonoConfig::new().offset(32));
        assert!(model.supports_size(PixelCoord(64, 32)));
        assert!(model.supports_size(PixelCoord(96, 64)));
        assert!(!model.supports_size(PixelCoord(128, 32)));

        model
            .init(&mut di.split(), &mut SpyDelay::default(), PixelCoord(64, 32))
            .unwrap();
        let sent = di.sent();
        let window: &[Sent] = sends!(0x21, 32, 95, 0x22, 0, 3);
        assert!(sent.windows(window.len()).any(|w| w == window));
        assert_eq!(data_lens(&di), vec![64; 4]);

        di.clear();
        let pixel = Window {
            x0: 0,
            y0: 0,
            x1: 0,
            y1: 0,
        };
        model.address_window(&mut di.split(), &pixel).unwrap();
        model
            .stream(&mut di.split(), &pixel, iter::once(BinaryColor::On))
            .unwrap();
        di.check_multi(sends!(0x21, 32, 32, 0x22, 0, 0, [0x01]));
    }

    #[test]
    fn column_offset_out_of_range_is_rejected() {
        let di = TestSpyInterface::new();
        let mut model = Ssd1306::new(MonoConfig::new().offset(200));
        let window = Window {
            x0: 0,
            y0: 0,
            x1: 3,
            y1: 0,
        };
        assert_eq!(
            model.address_window(&mut di.split(), &window),
            Err(Error::InvalidArgument)
        );
        assert!(di.is_empty());
    }

    #[test]
    fn runtime_controls() {
        let di = TestSpyInterface::new();
        let mut model = Ssd1306::default();
        model.sleep(&mut di.split(), true).unwrap();
        model.sleep(&mut di.split(), false).unwrap();
        model.invert(&mut di.split(), true).unwrap();
        model.set_contrast(&mut di.split(), 0x20).unwrap();
        di.check_multi(sends!(0xAE, 0xAF, 0xA7, 0x81, 0x20));
        assert_eq!(model.config.contrast_value(), 0x20);
    }

    #[test]
    fn supported_sizes() {
        let model = Ssd1306::default();
        assert!(model.supports_size(PixelCoord(128, 64)));
        assert!(model.supports_size(PixelCoord(128, 32)));
        assert!(model.supports_size(PixelCoord(64, 32)));
        assert!(!model.supports_size(PixelCoord(129, 64)));
        assert!(!model.supports_size(PixelCoord(128, 48)));
    }
}
