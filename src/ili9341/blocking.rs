use display_interface::{DataFormat, WriteOnlyDataCommand};
use embedded_graphics_core::pixelcolor::Rgb565;
use embedded_graphics_core::prelude::IntoStorage;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::{madctl_for, Command, Error, HEIGHT, WIDTH};
use crate::canvas::{Canvas, PixelOutcome, Rotation};

/// Pixels per flood batch, 64 bytes on the wire.
const FLOOD_BATCH: usize = 32;

/// Blocking ILI9341 driver.
///
/// Owns the write-only display interface, the reset line and a delay
/// source, plus the single rotation state object the graphics layer reads
/// through [`Canvas`]. Width and height are always derived from the
/// rotation, never stored.
pub struct Ili9341<DI, RST, DELAY> {
    di: DI,
    rst: RST,
    delay: DELAY,
    rotation: Rotation,
}

impl<DI, RST, DELAY> Ili9341<DI, RST, DELAY>
where
    DI: WriteOnlyDataCommand,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Resets the panel and runs the power-on register sequence.
    ///
    /// Returns the driver in portrait rotation with the address window
    /// covering the full screen. Consuming the parts at construction is
    /// what makes the init-before-use ordering impossible to get wrong.
    pub fn new(di: DI, rst: RST, delay: DELAY) -> Result<Self, Error> {
        let mut lcd = Self {
            di,
            rst,
            delay,
            rotation: Rotation::Deg0,
        };

        lcd.hard_reset()?;

        lcd.command(Command::SoftwareReset, &[])?;
        lcd.delay.delay_ms(150);

        lcd.command(Command::DisplayOff, &[])?;

        lcd.write_register8(Command::PowerControl1, 0x23)?;
        lcd.write_register8(Command::PowerControl2, 0x10)?;
        lcd.write_register16(Command::VcomControl1, 0x2B2B)?;
        lcd.write_register8(Command::VcomControl2, 0xC0)?;
        lcd.write_register8(
            Command::MemoryAccessControl,
            madctl_for(Rotation::Deg0).bits(),
        )?;
        // 16 bits per pixel on both the RGB and the MCU interface
        lcd.write_register8(Command::PixelFormat, 0x55)?;
        lcd.write_register16(Command::FrameRateControl, 0x001B)?;
        lcd.write_register8(Command::EntryMode, 0x07)?;

        lcd.command(Command::SleepOut, &[])?;
        lcd.delay.delay_ms(150);

        lcd.command(Command::DisplayOn, &[])?;
        lcd.delay.delay_ms(500);

        lcd.set_addr_window(0, 0, WIDTH - 1, HEIGHT - 1)?;

        #[cfg(feature = "defmt")]
        defmt::info!("ILI9341 initialized");

        Ok(lcd)
    }

    /// Pulse the reset line: low for 10 ms, then 120 ms for the controller
    /// to come back up.
    fn hard_reset(&mut self) -> Result<(), Error> {
        self.rst.set_low().map_err(|_| Error::Reset)?;
        self.delay.delay_ms(10);
        self.rst.set_high().map_err(|_| Error::Reset)?;
        self.delay.delay_ms(120);
        Ok(())
    }

    fn command(&mut self, cmd: Command, args: &[u8]) -> Result<(), Error> {
        self.di.send_commands(DataFormat::U8(&[cmd as u8]))?;
        if !args.is_empty() {
            self.di.send_data(DataFormat::U8(args))?;
        }
        Ok(())
    }

    fn write_register8(&mut self, cmd: Command, value: u8) -> Result<(), Error> {
        self.command(cmd, &[value])
    }

    fn write_register16(&mut self, cmd: Command, value: u16) -> Result<(), Error> {
        self.command(cmd, &value.to_be_bytes())
    }

    fn write_register32(&mut self, cmd: Command, value: u32) -> Result<(), Error> {
        self.command(cmd, &value.to_be_bytes())
    }

    /// Pre-loads the rectangle subsequent memory writes land in.
    ///
    /// Each axis pair is packed as `start << 16 | end` and written to the
    /// column and page address registers. Bounds are inclusive and must
    /// satisfy `x1 <= x2`, `y1 <= y2` within the current dimensions.
    pub fn set_addr_window(&mut self, x1: u16, y1: u16, x2: u16, y2: u16) -> Result<(), Error> {
        debug_assert!(x1 <= x2 && y1 <= y2);
        self.write_register32(
            Command::ColumnAddressSet,
            u32::from(x1) << 16 | u32::from(x2),
        )?;
        self.write_register32(Command::PageAddressSet, u32::from(y1) << 16 | u32::from(y2))
    }

    /// Streams `count` repetitions of `color` into the current window.
    ///
    /// U16BE transfers may byte-swap the buffer in place, so every batch
    /// gets a fresh copy.
    fn flood(&mut self, color: Rgb565, count: u32) -> Result<(), Error> {
        self.di
            .send_commands(DataFormat::U8(&[Command::MemoryWrite as u8]))?;

        let raw = color.into_storage();
        let mut remaining = count as usize;
        while remaining >= FLOOD_BATCH {
            let mut batch = [raw; FLOOD_BATCH];
            self.di.send_data(DataFormat::U16BE(&mut batch))?;
            remaining -= FLOOD_BATCH;
        }
        if remaining > 0 {
            let mut batch = [raw; FLOOD_BATCH];
            self.di.send_data(DataFormat::U16BE(&mut batch[..remaining]))?;
        }
        Ok(())
    }

    /// Writes one pixel.
    ///
    /// Coordinates outside the current `[0, width) x [0, height)` bounds are
    /// dropped and reported as [`PixelOutcome::Clipped`].
    pub fn draw_pixel(&mut self, x: i16, y: i16, color: Rgb565) -> Result<PixelOutcome, Error> {
        let (width, height) = self.dimensions();
        if x < 0 || y < 0 || x >= width as i16 || y >= height as i16 {
            return Ok(PixelOutcome::Clipped);
        }

        let (x, y) = (x as u16, y as u16);
        self.set_addr_window(x, y, x, y)?;
        self.write_register16(Command::MemoryWrite, color.into_storage())?;
        Ok(PixelOutcome::Drawn)
    }

    /// Floods the whole screen with one color.
    pub fn fill_screen(&mut self, color: Rgb565) -> Result<(), Error> {
        let (width, height) = self.dimensions();
        self.set_addr_window(0, 0, width - 1, height - 1)?;
        self.flood(color, u32::from(width) * u32::from(height))
    }

    /// Rotates the screen and resets the address window to the new
    /// full-screen bounds.
    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Error> {
        self.rotation = rotation;
        self.write_register8(Command::MemoryAccessControl, madctl_for(rotation).bits())?;
        let (width, height) = self.dimensions();
        self.set_addr_window(0, 0, width - 1, height - 1)
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Current `(width, height)`, a pure function of the rotation parity
    /// over the fixed 240x320 panel.
    pub fn dimensions(&self) -> (u16, u16) {
        if self.rotation.swaps_axes() {
            (HEIGHT, WIDTH)
        } else {
            (WIDTH, HEIGHT)
        }
    }

    /// Releases the interface, reset pin and delay source.
    pub fn release(self) -> (DI, RST, DELAY) {
        (self.di, self.rst, self.delay)
    }
}

impl<DI, RST, DELAY> Canvas for Ili9341<DI, RST, DELAY>
where
    DI: WriteOnlyDataCommand,
    RST: OutputPin,
    DELAY: DelayNs,
{
    type Error = Error;

    fn draw_pixel(&mut self, x: i16, y: i16, color: Rgb565) -> Result<PixelOutcome, Error> {
        Ili9341::draw_pixel(self, x, y, color)
    }

    fn fill_screen(&mut self, color: Rgb565) -> Result<(), Error> {
        Ili9341::fill_screen(self, color)
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Error> {
        Ili9341::set_rotation(self, rotation)
    }

    fn dimensions(&self) -> (u16, u16) {
        Ili9341::dimensions(self)
    }
}
