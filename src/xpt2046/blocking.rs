use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use super::{Channel, TouchError, ADC_MAX, SAMPLES, SAMPLE_DELAY_US};

/// Blocking XPT2046 driver.
///
/// The digitizer shares the serial bus with the display; the [`SpiDevice`]
/// contract scopes its chip select to a single transfer, so the two command
/// streams never interleave.
pub struct Xpt2046<SPI, DELAY> {
    spi: SPI,
    delay: DELAY,
}

impl<SPI, DELAY> Xpt2046<SPI, DELAY>
where
    SPI: SpiDevice,
    DELAY: DelayNs,
{
    pub fn new(spi: SPI, delay: DELAY) -> Self {
        Self { spi, delay }
    }

    /// Runs one conversion and returns the raw 12-bit sample.
    ///
    /// One command byte plus two dummy bytes clock the response out; the
    /// reply carries the sample left-aligned, hence the shift by 3.
    pub fn read_raw(&mut self, channel: Channel) -> Result<u16, TouchError> {
        let tx = [channel.into(), 0x00, 0x00];
        let mut rx = [0u8; 3];
        self.spi.transfer(&mut rx, &tx)?;

        Ok((u16::from(rx[1]) << 8 | u16::from(rx[2])) >> 3)
    }

    /// Mean of [`SAMPLES`] consecutive raw reads, paced [`SAMPLE_DELAY_US`]
    /// apart.
    fn read_filtered(&mut self, channel: Channel) -> Result<u16, TouchError> {
        let mut sum: u32 = 0;
        for _ in 0..SAMPLES {
            sum += u32::from(self.read_raw(channel)?);
            self.delay.delay_us(SAMPLE_DELAY_US);
        }
        Ok((sum / SAMPLES) as u16)
    }

    /// Filtered raw position of the current contact, `(x, y)` in
    /// `0..=4095` per axis.
    pub fn read_position(&mut self) -> Result<(u16, u16), TouchError> {
        let x = self.read_filtered(Channel::X)?;
        let y = self.read_filtered(Channel::Y)?;
        Ok((x, y))
    }

    /// Contact pressure, `None` when the Z plates disagree.
    ///
    /// A sample with `z1 == 0`, `z2 == 0` or `z1 >= z2` is contradictory
    /// and reported as invalid. Valid pressure is `z1 + 4095 - z2`, a
    /// relative firmness metric: larger means firmer contact.
    pub fn read_pressure(&mut self) -> Result<Option<u16>, TouchError> {
        let z1 = self.read_raw(Channel::Z1)?;
        let z2 = self.read_raw(Channel::Z2)?;

        if z1 == 0 || z2 == 0 || z1 >= z2 {
            return Ok(None);
        }
        Ok(Some(z1 + ADC_MAX - z2))
    }

    /// Releases the bus handle and delay source.
    pub fn release(self) -> (SPI, DELAY) {
        (self.spi, self.delay)
    }
}
