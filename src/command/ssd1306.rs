//! The command set for the SSD1306.
//!
//! Unlike the ST7735, the SSD1306 takes command arguments on the command channel: every argument
//! byte goes out as its own command transaction (D/C low, or an `0x80` control byte on I2C).

use crate::interface::DisplayInterface;
use crate::Error;

/// Columns of graphic display data RAM.
pub const NUM_COLUMNS: u8 = 128;
/// Pages of graphic display data RAM. Each page is 8 pixel rows, LSB on top.
pub const NUM_PAGES: u8 = 8;

/// How the RAM address pointer advances after each data byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// Column first, wrapping to the next page at the end of the column window.
    Horizontal,
    /// Page first, wrapping to the next column at the end of the page window.
    Vertical,
    /// Column only, never leaving the current page.
    Page,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Set the contrast (segment output current). Any byte is accepted.
    SetContrast(u8),
    /// Light every pixel regardless of RAM (`true`) or follow RAM content (`false`).
    EntireDisplayOn(bool),
    /// Show RAM inverted: a 0 bit lights the pixel.
    SetInvert(bool),
    /// Turn the panel on or off. Off is sleep mode; RAM is kept.
    SetDisplayOn(bool),
    SetAddressingMode(AddressingMode),
    /// Column start and end of the horizontal/vertical addressing window. Range 0-127,
    /// start <= end.
    SetColumnAddress(u8, u8),
    /// Page start and end of the addressing window. Range 0-7, start <= end.
    SetPageAddress(u8, u8),
    /// RAM row shown on the top line. Range 0-63.
    SetStartLine(u8),
    /// Map column 127 to SEG0 (`true`) or column 0 to SEG0 (`false`).
    SetSegmentRemap(bool),
    /// Number of multiplexed rows. Range 16-64.
    SetMuxRatio(u8),
    /// Scan COM outputs from COM[N-1] down to COM0 (`true`) or upwards (`false`).
    SetComScanReverse(bool),
    /// Vertical shift by COM. Range 0-63.
    SetDisplayOffset(u8),
    /// COM pin hardware configuration: alternative (`true`) or sequential, and left/right remap.
    SetComPins(bool, bool),
    /// Clock divide ratio (low nibble, plus one) and oscillator frequency (high nibble).
    SetClockDivide(u8),
    /// Pre-charge period: phase 1 in the low nibble, phase 2 in the high nibble, neither zero.
    SetPrecharge(u8),
    /// VCOMH deselect level. Only bits 4-6 are meaningful.
    SetVcomhDeselect(u8),
    /// Enable the internal charge pump. Must be sent before `SetDisplayOn(true)`.
    SetChargePump(bool),
}

impl Command {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 2];
        let encoded: Result<(u8, &[u8]), Error<DI::Error>> = match self {
            Command::SetContrast(level) => ok_command!(arg_buf, 0x81, [level]),
            Command::EntireDisplayOn(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0xA5,
                    false => 0xA4,
                },
                []
            ),
            Command::SetInvert(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0xA7,
                    false => 0xA6,
                },
                []
            ),
            Command::SetDisplayOn(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0xAF,
                    false => 0xAE,
                },
                []
            ),
            Command::SetAddressingMode(mode) => ok_command!(
                arg_buf,
                0x20,
                [match mode {
                    AddressingMode::Horizontal => 0x00,
                    AddressingMode::Vertical => 0x01,
                    AddressingMode::Page => 0x02,
                }]
            ),
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=127, 0..=127) if start <= end => ok_command!(arg_buf, 0x21, [start, end]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetPageAddress(start, end) => match (start, end) {
                (0..=7, 0..=7) if start <= end => ok_command!(arg_buf, 0x22, [start, end]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetStartLine(line) => match line {
                0..=63 => ok_command!(arg_buf, 0x40 | line, []),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetSegmentRemap(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0xA1,
                    false => 0xA0,
                },
                []
            ),
            Command::SetMuxRatio(ratio) => match ratio {
                16..=64 => ok_command!(arg_buf, 0xA8, [ratio - 1]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetComScanReverse(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0xC8,
                    false => 0xC0,
                },
                []
            ),
            Command::SetDisplayOffset(offset) => match offset {
                0..=63 => ok_command!(arg_buf, 0xD3, [offset]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetComPins(alternative, remap) => ok_command!(
                arg_buf,
                0xDA,
                [0x02 | (alternative as u8) << 4 | (remap as u8) << 5]
            ),
            Command::SetClockDivide(clk) => ok_command!(arg_buf, 0xD5, [clk]),
            Command::SetPrecharge(period) => match (period & 0x0F, period >> 4) {
                (1..=15, 1..=15) => ok_command!(arg_buf, 0xD9, [period]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetVcomhDeselect(level) => ok_command!(arg_buf, 0xDB, [level & 0x70]),
            Command::SetChargePump(ena) => ok_command!(
                arg_buf,
                0x8D,
                [match ena {
                    true => 0x14,
                    false => 0x10,
                }]
            ),
        };
        let (cmd, args) = encoded?;
        iface.send_command(cmd)?;
        for &arg in args {
            iface.send_command(arg)?;
        }
        Ok(())
    }
}
