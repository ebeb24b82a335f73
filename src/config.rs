//! Defines structs for storing register values of commands that are associated with
//! relatively-static configuration.

use crate::command::ssd1306;
use crate::command::st7735::{Command, PixelFormat};
use crate::interface;
use crate::Error;

const MADCTL_MY: u8 = 0x80;
const MADCTL_MX: u8 = 0x40;
const MADCTL_MV: u8 = 0x20;
const MADCTL_BGR: u8 = 0x08;

/// Panel orientation, encoded into the row/column order bits of the ST7735 memory access control
/// register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
    PortraitFlipped,
    LandscapeFlipped,
}

impl Orientation {
    fn madctl(self) -> u8 {
        match self {
            Orientation::Portrait => MADCTL_MY | MADCTL_MX,
            Orientation::Landscape => MADCTL_MY | MADCTL_MV,
            Orientation::PortraitFlipped => 0,
            Orientation::LandscapeFlipped => MADCTL_MX | MADCTL_MV,
        }
    }

    /// Whether rows and columns of frame memory are exchanged.
    pub fn is_landscape(self) -> bool {
        self.madctl() & MADCTL_MV != 0
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Portrait
    }
}

/// A configuration for an ST7735 panel. Builder methods override the defaults, which match the
/// common 128x160 modules: portrait, BGR subpixels, not inverted, no RAM offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    orientation: Orientation,
    bgr: bool,
    inverted: bool,
    col_offset: u16,
    row_offset: u16,
}

impl Config {
    pub fn new() -> Self {
        Config {
            orientation: Orientation::Portrait,
            bgr: true,
            inverted: false,
            col_offset: 0,
            row_offset: 0,
        }
    }

    /// Extend this `Config` to rotate the panel.
    pub fn orientation(self, orientation: Orientation) -> Self {
        Self {
            orientation,
            ..self
        }
    }

    /// Extend this `Config` to select RGB (`false`) or BGR (`true`) subpixel order.
    pub fn bgr(self, bgr: bool) -> Self {
        Self { bgr, ..self }
    }

    /// Extend this `Config` to turn on display color inversion, which some panels need for
    /// black to appear black.
    pub fn inverted(self, inverted: bool) -> Self {
        Self { inverted, ..self }
    }

    /// Extend this `Config` for panels whose visible area starts at frame memory column `col` and
    /// row `row` instead of 0, as in the current orientation.
    pub fn offset(self, col: u16, row: u16) -> Self {
        Self {
            col_offset: col,
            row_offset: row,
            ..self
        }
    }

    pub(crate) fn orientation_value(&self) -> Orientation {
        self.orientation
    }

    pub(crate) fn offsets(&self) -> (u16, u16) {
        (self.col_offset, self.row_offset)
    }

    /// The MADCTL byte this configuration selects.
    pub fn memory_access(&self) -> u8 {
        self.orientation.madctl() | if self.bgr { MADCTL_BGR } else { 0 }
    }

    /// Transmit commands to the display at `iface` necessary to put that display into the
    /// configuration encoded in `self`.
    pub(crate) fn send<DI>(&self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: interface::DisplayInterface,
    {
        Command::SetInversion(self.inverted).send(iface)?;
        Command::SetMemoryAccess(self.memory_access()).send(iface)?;
        Command::SetPixelFormat(PixelFormat::Rgb565).send(iface)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

/// A configuration for an SSD1306 panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonoConfig {
    contrast: u8,
    flip: bool,
    col_offset: u8,
}

impl MonoConfig {
    pub fn new() -> Self {
        MonoConfig {
            contrast: 0xCF,
            flip: true,
            col_offset: 0,
        }
    }

    /// Extend this `MonoConfig` to set the initial contrast. See `ssd1306::Command::SetContrast`.
    pub fn contrast(self, contrast: u8) -> Self {
        Self { contrast, ..self }
    }

    /// Extend this `MonoConfig` to select segment remap and reversed COM scan (`true`, the usual
    /// module wiring) or the unremapped orientation, which shows the image rotated 180 degrees.
    pub fn flip(self, flip: bool) -> Self {
        Self { flip, ..self }
    }

    /// Extend this `MonoConfig` for panels narrower than the controller whose first visible
    /// column is RAM column `col`, such as 64x32 modules starting at column 32.
    pub fn offset(self, col: u8) -> Self {
        Self {
            col_offset: col,
            ..self
        }
    }

    pub(crate) fn send<DI>(&self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: interface::DisplayInterface,
    {
        ssd1306::Command::SetSegmentRemap(self.flip).send(iface)?;
        ssd1306::Command::SetComScanReverse(self.flip).send(iface)
    }

    pub(crate) fn contrast_value(&self) -> u8 {
        self.contrast
    }

    pub(crate) fn col_offset(&self) -> u8 {
        self.col_offset
    }
}

impl Default for MonoConfig {
    fn default() -> Self {
        MonoConfig::new()
    }
}
