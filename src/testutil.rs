//! Test doubles: a recording display interface, a scripted digitizer bus,
//! and a framebuffer mirror standing in for the panel.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::Infallible;

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};
use embedded_graphics_core::pixelcolor::Rgb565;
use embedded_graphics_core::prelude::IntoStorage;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Operation, SpiDevice};

use crate::canvas::{Canvas, PixelOutcome, Rotation};

/// One captured bus operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Cmd(u8),
    Data(Vec<u8>),
}

pub type OpLog = Rc<RefCell<Vec<Op>>>;

/// Command bytes of a capture, in order.
pub fn command_bytes(ops: &[Op]) -> Vec<u8> {
    ops.iter()
        .filter_map(|op| match op {
            Op::Cmd(b) => Some(*b),
            Op::Data(_) => None,
        })
        .collect()
}

/// Write-only display interface that records everything it is sent.
pub struct RecordingInterface {
    ops: OpLog,
}

impl RecordingInterface {
    pub fn new() -> (Self, OpLog) {
        let ops: OpLog = Rc::new(RefCell::new(Vec::new()));
        (Self { ops: ops.clone() }, ops)
    }
}

impl WriteOnlyDataCommand for RecordingInterface {
    fn send_commands(&mut self, cmd: DataFormat<'_>) -> Result<(), DisplayError> {
        match cmd {
            DataFormat::U8(bytes) => {
                for b in bytes {
                    self.ops.borrow_mut().push(Op::Cmd(*b));
                }
                Ok(())
            }
            DataFormat::U8Iter(iter) => {
                for b in iter {
                    self.ops.borrow_mut().push(Op::Cmd(b));
                }
                Ok(())
            }
            _ => Err(DisplayError::InvalidFormatError),
        }
    }

    fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), DisplayError> {
        let bytes: Vec<u8> = match buf {
            DataFormat::U8(slice) => slice.to_vec(),
            DataFormat::U16(slice) => slice.iter().flat_map(|v| v.to_ne_bytes()).collect(),
            DataFormat::U16BE(slice) => slice.iter().flat_map(|v| v.to_be_bytes()).collect(),
            DataFormat::U16LE(slice) => slice.iter().flat_map(|v| v.to_le_bytes()).collect(),
            DataFormat::U8Iter(iter) => iter.collect(),
            DataFormat::U16BEIter(iter) => iter.flat_map(|v| v.to_be_bytes()).collect(),
            DataFormat::U16LEIter(iter) => iter.flat_map(|v| v.to_le_bytes()).collect(),
            _ => return Err(DisplayError::InvalidFormatError),
        };
        self.ops.borrow_mut().push(Op::Data(bytes));
        Ok(())
    }
}

/// Reset pin stub recording the level transitions it was driven through.
#[derive(Debug, Default)]
pub struct StubPin {
    pub states: Vec<bool>,
}

impl embedded_hal::digital::ErrorType for StubPin {
    type Error = Infallible;
}

impl OutputPin for StubPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.states.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.states.push(true);
        Ok(())
    }
}

pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Delay source that logs every requested pause in nanoseconds.
pub struct RecordingDelay {
    log: Rc<RefCell<Vec<u32>>>,
}

impl RecordingDelay {
    pub fn new() -> (Self, Rc<RefCell<Vec<u32>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (Self { log: log.clone() }, log)
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(ns);
    }
}

/// Scripted XPT2046 stand-in. Each channel replays its sample script,
/// repeating the final value once the script runs out.
pub struct FakeTouchBus {
    x: Vec<u16>,
    y: Vec<u16>,
    z1: Vec<u16>,
    z2: Vec<u16>,
    xi: usize,
    yi: usize,
    z1i: usize,
    z2i: usize,
}

impl FakeTouchBus {
    pub fn constant(x: u16, y: u16, z1: u16, z2: u16) -> Self {
        Self::scripted(&[x], &[y], &[z1], &[z2])
    }

    pub fn scripted(x: &[u16], y: &[u16], z1: &[u16], z2: &[u16]) -> Self {
        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            z1: z1.to_vec(),
            z2: z2.to_vec(),
            xi: 0,
            yi: 0,
            z1i: 0,
            z2i: 0,
        }
    }

    fn next(script: &[u16], idx: &mut usize) -> u16 {
        if script.is_empty() {
            return 0;
        }
        let value = script[(*idx).min(script.len() - 1)];
        *idx += 1;
        value
    }

    fn sample(&mut self, command: u8) -> u16 {
        match command {
            0xD0 => Self::next(&self.x, &mut self.xi),
            0x90 => Self::next(&self.y, &mut self.yi),
            0xB0 => Self::next(&self.z1, &mut self.z1i),
            0xC0 => Self::next(&self.z2, &mut self.z2i),
            _ => 0,
        }
    }
}

impl embedded_hal::spi::ErrorType for FakeTouchBus {
    type Error = Infallible;
}

impl SpiDevice for FakeTouchBus {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        for op in operations.iter_mut() {
            match op {
                Operation::Transfer(rx, tx) => {
                    // The reply carries the 12-bit sample left-aligned in
                    // the two bytes after the command byte.
                    let shifted = self.sample(tx[0]) << 3;
                    rx[0] = 0;
                    rx[1] = (shifted >> 8) as u8;
                    rx[2] = (shifted & 0xFF) as u8;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// In-memory mirror of the panel, recording pixel writes in order.
pub struct Framebuffer {
    pub rotation: Rotation,
    pub writes: Vec<(i16, i16, u16)>,
    pub clipped: usize,
    pub fills: Vec<u16>,
    pub rotation_log: Vec<Rotation>,
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            rotation: Rotation::Deg0,
            writes: Vec::new(),
            clipped: 0,
            fills: Vec::new(),
            rotation_log: Vec::new(),
        }
    }
}

impl Canvas for Framebuffer {
    type Error = Infallible;

    fn draw_pixel(&mut self, x: i16, y: i16, color: Rgb565) -> Result<PixelOutcome, Infallible> {
        let (width, height) = self.dimensions();
        if x < 0 || y < 0 || x >= width as i16 || y >= height as i16 {
            self.clipped += 1;
            return Ok(PixelOutcome::Clipped);
        }
        self.writes.push((x, y, color.into_storage()));
        Ok(PixelOutcome::Drawn)
    }

    fn fill_screen(&mut self, color: Rgb565) -> Result<(), Infallible> {
        self.fills.push(color.into_storage());
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Infallible> {
        self.rotation = rotation;
        self.rotation_log.push(rotation);
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        if self.rotation.swaps_axes() {
            (320, 240)
        } else {
            (240, 320)
        }
    }
}
