use embedded_graphics_core::pixelcolor::{Rgb565, RgbColor};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use crate::canvas::Canvas;
use crate::gfx::Gfx;
use crate::xpt2046::{TouchError, Xpt2046};

/// Default contact threshold; lower values make the screen more sensitive.
pub const PRESSURE_THRESHOLD: u16 = 350;

/// Side of the square targets drawn by [`TouchScreen::calibrate`].
const TARGET_SIZE: i16 = 10;

/// Raw ADC extremes mapped linearly onto the pixel grid.
///
/// The defaults are the board's build-time calibration; [`TouchScreen::calibrate`]
/// can measure a replacement set, but nothing persists it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    pub min_x: u16,
    pub max_x: u16,
    pub min_y: u16,
    pub max_y: u16,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            min_x: 225,
            max_x: 3800,
            min_y: 300,
            max_y: 3700,
        }
    }
}

/// Errors from the interactive calibration routine.
#[derive(Debug)]
pub enum CalibrationError<E> {
    /// The digitizer failed.
    Touch(TouchError),
    /// The display failed.
    Display(E),
}

impl<E> From<TouchError> for CalibrationError<E> {
    fn from(e: TouchError) -> Self {
        CalibrationError::Touch(e)
    }
}

/// Calibrated touch positions on top of the raw digitizer.
///
/// Raw X always maps to the display's width axis and raw Y to its height
/// axis, independent of the display rotation; with a rotated display the
/// caller sees the digitizer's fixed frame of reference.
pub struct TouchScreen<SPI, DELAY> {
    digitizer: Xpt2046<SPI, DELAY>,
    calibration: Calibration,
    pressure_threshold: u16,
}

impl<SPI, DELAY> TouchScreen<SPI, DELAY>
where
    SPI: SpiDevice,
    DELAY: DelayNs,
{
    pub fn new(digitizer: Xpt2046<SPI, DELAY>) -> Self {
        Self::with_calibration(digitizer, Calibration::default())
    }

    pub fn with_calibration(digitizer: Xpt2046<SPI, DELAY>, calibration: Calibration) -> Self {
        Self {
            digitizer,
            calibration,
            pressure_threshold: PRESSURE_THRESHOLD,
        }
    }

    /// Adjusts the contact threshold used by [`Self::is_touched`].
    pub fn set_pressure_threshold(&mut self, threshold: u16) {
        self.pressure_threshold = threshold;
    }

    /// Touch position in pixels for the given display dimensions.
    ///
    /// `dimensions` must be the display's *current* `(width, height)`; each
    /// axis is rescaled linearly from the calibration range and clamped to
    /// `0..dimension`.
    pub fn read_position(&mut self, dimensions: (u16, u16)) -> Result<(u16, u16), TouchError> {
        let (width, height) = dimensions;
        let (raw_x, raw_y) = self.digitizer.read_position()?;

        let x = map_axis(raw_x, self.calibration.min_x, self.calibration.max_x, width);
        let y = map_axis(raw_y, self.calibration.min_y, self.calibration.max_y, height);
        Ok((x, y))
    }

    /// Contact pressure, with invalid samples reading as 0.
    ///
    /// Callers that need to tell "no contact" apart from "invalid sample"
    /// should use [`Xpt2046::read_pressure`] through [`Self::digitizer_mut`].
    pub fn read_pressure(&mut self) -> Result<u16, TouchError> {
        Ok(self.digitizer.read_pressure()?.unwrap_or(0))
    }

    /// Whether the panel is currently pressed harder than the threshold.
    ///
    /// A plain threshold with no hysteresis: a light, drawn-out contact can
    /// flicker across consecutive calls.
    pub fn is_touched(&mut self) -> Result<bool, TouchError> {
        let pressure = self.digitizer.read_pressure()?;
        Ok(pressure.is_some_and(|p| p > self.pressure_threshold))
    }

    /// Measures a fresh calibration against two corner targets.
    ///
    /// Draws a target in the top-left corner, samples the raw position once
    /// the panel is pressed, waits for release, and repeats at the
    /// bottom-right corner. The measured range is returned for the caller
    /// to apply or persist; this routine stores nothing. Blocks until the
    /// user has touched both targets.
    pub fn calibrate<C: Canvas>(
        &mut self,
        gfx: &mut Gfx<C>,
    ) -> Result<Calibration, CalibrationError<C::Error>> {
        let (width, height) = gfx.dimensions();
        let (right, bottom) = (
            width as i16 - TARGET_SIZE,
            height as i16 - TARGET_SIZE,
        );

        gfx.fill_screen(Rgb565::BLACK)
            .map_err(CalibrationError::Display)?;

        let (min_x, min_y) = self.sample_target(gfx, 0, 0)?;
        let (max_x, max_y) = self.sample_target(gfx, right, bottom)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "touch calibration: x {}..{} y {}..{}",
            min_x,
            max_x,
            min_y,
            max_y
        );

        Ok(Calibration {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    /// Draws one calibration target, samples the raw position while it is
    /// pressed, then erases the target and waits for release.
    fn sample_target<C: Canvas>(
        &mut self,
        gfx: &mut Gfx<C>,
        x: i16,
        y: i16,
    ) -> Result<(u16, u16), CalibrationError<C::Error>> {
        gfx.fill_rect(x, y, TARGET_SIZE, TARGET_SIZE, Rgb565::RED)
            .map_err(CalibrationError::Display)?;

        while !self.is_touched()? {}
        let raw = self.digitizer.read_position()?;

        gfx.fill_rect(x, y, TARGET_SIZE, TARGET_SIZE, Rgb565::BLACK)
            .map_err(CalibrationError::Display)?;
        while self.is_touched()? {}

        Ok(raw)
    }

    /// Access to the underlying digitizer.
    pub fn digitizer_mut(&mut self) -> &mut Xpt2046<SPI, DELAY> {
        &mut self.digitizer
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Releases the digitizer.
    pub fn release(self) -> Xpt2046<SPI, DELAY> {
        self.digitizer
    }
}

/// Linear rescale of one raw axis onto `0..dimension`.
fn map_axis(raw: u16, min: u16, max: u16, dimension: u16) -> u16 {
    let span = i32::from(max) - i32::from(min);
    let scaled = (i32::from(raw) - i32::from(min)) * i32::from(dimension) / span;
    scaled.clamp(0, i32::from(dimension) - 1) as u16
}
