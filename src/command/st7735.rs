//! The command set for the ST7735.
//!
//! Note 1: The frame memory of the ST7735 is 132 columns by 162 rows. Panels with fewer pixels
//! are wired to a sub-rectangle of it, which is why column and row addresses are validated
//! against the memory size and not the panel size. With row/column exchange (MADCTL MV) set, the
//! column address runs over the 162 memory rows, so both address commands accept 0-161.

use crate::interface::DisplayInterface;
use crate::Error;

pub const NUM_PIXEL_COLS: u16 = 132;
pub const NUM_PIXEL_ROWS: u16 = 162;
/// Largest address either `SetColumnAddress` or `SetRowAddress` accepts.
pub const ADDRESS_MAX: u16 = NUM_PIXEL_ROWS - 1;

/// Interface pixel format, selected with `SetPixelFormat`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 12 bits/pixel.
    Rgb444,
    /// 16 bits/pixel, the only format this driver streams.
    Rgb565,
    /// 18 bits/pixel.
    Rgb666,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// No operation.
    Nop,
    /// Reset all registers to their defaults. The controller needs 120ms before the next command,
    /// or before `SetSleepMode(false)`.
    SoftwareReset,
    /// Enter (`true`) or leave (`false`) sleep mode. Leaving sleep mode needs 120ms to settle.
    SetSleepMode(bool),
    /// Leave partial mode and show the whole frame memory.
    NormalDisplayOn,
    /// Turn display color inversion on or off.
    SetInversion(bool),
    /// Turn the display output on or off. Frame memory is kept either way.
    SetDisplayOn(bool),
    /// Set the column start and end address of the write window. Range is 0-161, start <= end.
    /// (Note 1)
    SetColumnAddress(u16, u16),
    /// Set the row start and end address of the write window. Range is 0-161, start <= end.
    /// (Note 1)
    SetRowAddress(u16, u16),
    /// Set the memory data access control (MADCTL) byte: row/column order and exchange, vertical
    /// and horizontal refresh order, and RGB/BGR subpixel order. Bits 0-1 are reserved and must be
    /// zero.
    SetMemoryAccess(u8),
    /// Set the interface pixel format.
    SetPixelFormat(PixelFormat),
    /// Frame rate in normal mode: RTNA, front porch, back porch. RTNA is 0-15, porches 0-63.
    SetFrameRateNormal(u8, u8, u8),
    /// Frame rate in idle mode, same encoding as `SetFrameRateNormal`.
    SetFrameRateIdle(u8, u8, u8),
    /// Frame rate in partial mode: dot-inversion triple followed by line-inversion triple.
    SetFrameRatePartial([u8; 3], [u8; 3]),
    /// Display inversion control (line/dot inversion per mode). Range 0-7.
    SetInversionControl(u8),
    /// Power control 1: AVDD/GVDD levels and the mode byte.
    SetPowerControl1(u8, u8, u8),
    /// Power control 2: VGH/VGL supply levels.
    SetPowerControl2(u8),
    /// Power control 3, normal mode: op-amp current and booster frequency.
    SetPowerControl3(u8, u8),
    /// Power control 4, idle mode.
    SetPowerControl4(u8, u8),
    /// Power control 5, partial mode.
    SetPowerControl5(u8, u8),
    /// VCOM voltage. Range 0-63.
    SetVcom(u8),
    /// Positive-polarity gamma correction table. Each entry is 0-63.
    SetPositiveGamma([u8; 16]),
    /// Negative-polarity gamma correction table. Each entry is 0-63.
    SetNegativeGamma([u8; 16]),
}

pub enum BufCommand<'buf> {
    /// Start writing pixel data into the current column/row window. The write pointer restarts at
    /// the window's top-left corner and advances row-major, wrapping at the window's right edge.
    WriteMemory(&'buf [u8]),
}

fn gamma_ok(table: &[u8; 16]) -> bool {
    table.iter().all(|&v| v <= 0x3F)
}

fn be(start: u16, end: u16) -> [u8; 4] {
    [(start >> 8) as u8, start as u8, (end >> 8) as u8, end as u8]
}

impl Command {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 16];
        let encoded: Result<(u8, &[u8]), Error<DI::Error>> = match self {
            Command::Nop => ok_command!(arg_buf, 0x00, []),
            Command::SoftwareReset => ok_command!(arg_buf, 0x01, []),
            Command::SetSleepMode(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0x10,
                    false => 0x11,
                },
                []
            ),
            Command::NormalDisplayOn => ok_command!(arg_buf, 0x13, []),
            Command::SetInversion(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0x21,
                    false => 0x20,
                },
                []
            ),
            Command::SetDisplayOn(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0x29,
                    false => 0x28,
                },
                []
            ),
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=ADDRESS_MAX, 0..=ADDRESS_MAX) if start <= end => {
                    let [a, b, c, d] = be(start, end);
                    ok_command!(arg_buf, 0x2A, [a, b, c, d])
                }
                _ => Err(Error::InvalidArgument),
            },
            Command::SetRowAddress(start, end) => match (start, end) {
                (0..=ADDRESS_MAX, 0..=ADDRESS_MAX) if start <= end => {
                    let [a, b, c, d] = be(start, end);
                    ok_command!(arg_buf, 0x2B, [a, b, c, d])
                }
                _ => Err(Error::InvalidArgument),
            },
            Command::SetMemoryAccess(madctl) => match madctl & 0x03 {
                0 => ok_command!(arg_buf, 0x36, [madctl]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetPixelFormat(format) => ok_command!(
                arg_buf,
                0x3A,
                [match format {
                    PixelFormat::Rgb444 => 0x03,
                    PixelFormat::Rgb565 => 0x05,
                    PixelFormat::Rgb666 => 0x06,
                }]
            ),
            Command::SetFrameRateNormal(rtna, fp, bp) => match (rtna, fp, bp) {
                (0..=15, 0..=63, 0..=63) => ok_command!(arg_buf, 0xB1, [rtna, fp, bp]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetFrameRateIdle(rtnb, fp, bp) => match (rtnb, fp, bp) {
                (0..=15, 0..=63, 0..=63) => ok_command!(arg_buf, 0xB2, [rtnb, fp, bp]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetFrameRatePartial([a, b, c], [d, e, f]) => {
                ok_command!(arg_buf, 0xB3, [a, b, c, d, e, f])
            }
            Command::SetInversionControl(nla) => match nla {
                0..=7 => ok_command!(arg_buf, 0xB4, [nla]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetPowerControl1(a, b, c) => ok_command!(arg_buf, 0xC0, [a, b, c]),
            Command::SetPowerControl2(a) => ok_command!(arg_buf, 0xC1, [a]),
            Command::SetPowerControl3(a, b) => ok_command!(arg_buf, 0xC2, [a, b]),
            Command::SetPowerControl4(a, b) => ok_command!(arg_buf, 0xC3, [a, b]),
            Command::SetPowerControl5(a, b) => ok_command!(arg_buf, 0xC4, [a, b]),
            Command::SetVcom(vcom) => match vcom {
                0..=0x3F => ok_command!(arg_buf, 0xC5, [vcom]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetPositiveGamma(table) => {
                if gamma_ok(&table) {
                    arg_buf.copy_from_slice(&table);
                    Ok((0xE0, &arg_buf[..]))
                } else {
                    Err(Error::InvalidArgument)
                }
            }
            Command::SetNegativeGamma(table) => {
                if gamma_ok(&table) {
                    arg_buf.copy_from_slice(&table);
                    Ok((0xE1, &arg_buf[..]))
                } else {
                    Err(Error::InvalidArgument)
                }
            }
        };
        let (cmd, data) = encoded?;
        iface.send_command(cmd)?;
        if data.is_empty() {
            Ok(())
        } else {
            Ok(iface.send_data(data)?)
        }
    }
}

impl<'a> BufCommand<'a> {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let (cmd, data) = match self {
            BufCommand::WriteMemory(buf) => (0x2C, buf),
        };
        iface.send_command(cmd)?;
        if data.is_empty() {
            Ok(())
        } else {
            Ok(iface.send_data(data)?)
        }
    }
}
