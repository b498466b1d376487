#![no_std]
//! Drivers for a 240x320 ILI9341 SPI TFT paired with an XPT2046 resistive
//! touch digitizer, plus an integer raster graphics layer on top.
//!
//! The display is driven through a [`display_interface::WriteOnlyDataCommand`]
//! transport, the digitizer through an [`embedded_hal::spi::SpiDevice`] with
//! its own chip select. Both peripherals share one physical bus; every
//! operation holds its select line only for the duration of a single
//! transfer.

/// Seam between the graphics layer and the display controller.
pub mod canvas;

/// 5x7 column-major bitmap font support.
pub mod font;

/// Raster graphics primitives on top of any [`canvas::Canvas`].
pub mod gfx;

/// ILI9341 TFT LCD controller driver.
pub mod ili9341;

/// Calibrated touch-position mapping on top of the raw digitizer.
pub mod touchscreen;

/// XPT2046 resistive touch digitizer driver.
pub mod xpt2046;

#[cfg(test)]
extern crate alloc;

#[cfg(test)]
mod testutil;
