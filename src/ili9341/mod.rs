use bitflags::bitflags;
use display_interface::DisplayError;

use crate::canvas::Rotation;

mod blocking;

pub use blocking::Ili9341;

/// Panel width in the power-on portrait orientation.
pub const WIDTH: u16 = 240;
/// Panel height in the power-on portrait orientation.
pub const HEIGHT: u16 = 320;

/// ILI9341 command set, per datasheet section 8.1.
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub(crate) enum Command {
    SoftwareReset = 0x01,
    SleepOut = 0x11,
    DisplayOff = 0x28,
    DisplayOn = 0x29,
    ColumnAddressSet = 0x2A,
    PageAddressSet = 0x2B,
    MemoryWrite = 0x2C,
    MemoryAccessControl = 0x36,
    PixelFormat = 0x3A,
    FrameRateControl = 0xB1,
    EntryMode = 0xB7,
    PowerControl1 = 0xC0,
    PowerControl2 = 0xC1,
    VcomControl1 = 0xC5,
    VcomControl2 = 0xC7,
}

bitflags! {
    /// Memory access control (MADCTL) register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Madctl: u8 {
        /// Bit 7: row address order (vertical flip)
        const ROW_ORDER = 1 << 7;
        /// Bit 6: column address order (horizontal flip)
        const COL_ORDER = 1 << 6;
        /// Bit 5: row/column exchange
        const ROW_COL_SWAP = 1 << 5;
        /// Bit 4: vertical refresh order
        const LINE_ORDER = 1 << 4;
        /// Bit 3: BGR color filter panel order
        const BGR = 1 << 3;
        /// Bit 2: horizontal refresh order
        const REFRESH_ORDER = 1 << 2;
    }
}

/// Orientation register value for each rotation.
///
/// The panel is wired BGR; every mapping carries that bit.
pub(crate) fn madctl_for(rotation: Rotation) -> Madctl {
    match rotation {
        Rotation::Deg0 => Madctl::ROW_ORDER | Madctl::BGR,
        Rotation::Deg90 => {
            Madctl::COL_ORDER | Madctl::ROW_ORDER | Madctl::ROW_COL_SWAP | Madctl::BGR
        }
        Rotation::Deg180 => Madctl::COL_ORDER | Madctl::BGR,
        Rotation::Deg270 => Madctl::ROW_COL_SWAP | Madctl::BGR,
    }
}

/// Errors that can occur when driving the ILI9341.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Transport failure reported by the display interface.
    Interface(DisplayError),
    /// The reset line could not be driven.
    Reset,
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Interface(e)
    }
}
