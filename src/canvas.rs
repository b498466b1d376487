use embedded_graphics_core::pixelcolor::Rgb565;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Display rotation, in 90 degree steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Portrait, the power-on orientation.
    #[default]
    Deg0 = 0,
    /// Landscape.
    Deg90 = 1,
    /// Portrait, upside down.
    Deg180 = 2,
    /// Landscape, upside down.
    Deg270 = 3,
}

impl Rotation {
    /// Decodes a raw rotation value, substituting [`Rotation::Deg0`] for
    /// anything outside `0..=3`.
    ///
    /// This is the controller's documented fallback for out-of-range
    /// rotation requests; use `Rotation::try_from` when an invalid input
    /// should be surfaced instead.
    pub fn from_raw(raw: u8) -> Self {
        Self::try_from(raw).unwrap_or_default()
    }

    /// Whether this rotation exchanges the panel's row and column axes.
    ///
    /// Width and height are derived from this parity; they are never stored
    /// separately.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Result of a single pixel write.
///
/// Coordinates outside the current screen bounds are not an error: the write
/// is dropped and reported as [`PixelOutcome::Clipped`]. The graphics
/// primitives rely on this as their universal clipping contract and ignore
/// the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelOutcome {
    /// The pixel was written to the panel.
    Drawn,
    /// The coordinates were out of bounds and nothing was written.
    Clipped,
}

impl PixelOutcome {
    pub fn is_clipped(self) -> bool {
        self == PixelOutcome::Clipped
    }
}

/// The display-controller surface the graphics layer draws through.
///
/// [`crate::ili9341::Ili9341`] is the hardware implementation; host tests
/// substitute a framebuffer mirror.
pub trait Canvas {
    type Error;

    /// Writes one pixel, clipping silently against the current dimensions.
    fn draw_pixel(&mut self, x: i16, y: i16, color: Rgb565) -> Result<PixelOutcome, Self::Error>;

    /// Floods the whole screen with one color.
    fn fill_screen(&mut self, color: Rgb565) -> Result<(), Self::Error>;

    /// Rotates the screen. The only mutator of rotation state.
    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Self::Error>;

    /// Current `(width, height)` in pixels, after rotation.
    fn dimensions(&self) -> (u16, u16);

    fn width(&self) -> u16 {
        self.dimensions().0
    }

    fn height(&self) -> u16 {
        self.dimensions().1
    }
}
