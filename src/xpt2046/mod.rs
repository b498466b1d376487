use num_enum::IntoPrimitive;

mod blocking;

pub use blocking::Xpt2046;

/// Full scale of the 12-bit ADC.
pub const ADC_MAX: u16 = 4095;

/// Samples averaged per filtered axis read.
pub(crate) const SAMPLES: u32 = 5;

/// Pause between consecutive samples of one filtered read.
pub(crate) const SAMPLE_DELAY_US: u32 = 100;

/// Control byte selecting the conversion channel.
///
/// Single-ended, 12-bit conversions; the two pressure plates are sampled
/// through the Z1/Z2 cross measurements.
#[derive(Debug, Clone, Copy, PartialEq, IntoPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    X = 0xD0,
    Y = 0x90,
    Z1 = 0xB0,
    Z2 = 0xC0,
}

/// Errors that can occur when talking to the digitizer.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// The SPI transfer failed.
    Spi,
}

impl<E> From<E> for TouchError
where
    E: embedded_hal::spi::Error,
{
    fn from(_: E) -> Self {
        TouchError::Spi
    }
}
