//! DFR0591 Display Driver Implementation
//!
//! [`Epaper`] owns the bit-packed frame buffer and sequences the controller
//! commands through a [`DisplayTransport`].
//!
//! ## Flush sequence
//!
//! Every [`Epaper::flush`] sends, strictly in this order:
//!
//! 1. init - driver output, booster, VCOM, line timing, data entry mode, RAM window and pointer
//! 1. LUT - the 29 byte waveform table for the requested [`Mode`]
//! 1. power on - `0x22 0xC0` followed by master activation
//! 1. RAM write and update:
//!    - `Full`: RAM pointer, the whole buffer, update `0xC7`
//!    - `Partial`: RAM window, RAM pointer, the window bytes, update `0x04`
//!
//! Both update paths end with master activation (`0x20`) and `0xFF`.
//!
//! ## Pixel addressing
//!
//! Pixel `(x, y)` is bit `y * XMAX + x` of the buffer, where [`XMAX`] is
//! the controller's 250 pixel row stride and not the width passed to
//! [`Epaper::new`]. The bounds check is inclusive (`x <= width`,
//! `y <= height`), matching the DFRobot reference driver; an edge pixel
//! that lands past the buffer is reported as [`Error::InvalidIndex`].

use crate::bitarray::BitArray;
use crate::dfr0591::interface::{ram_transfer_len, DisplayTransport};
use crate::dfr0591::{cmd::Cmd, flag::Flag, Mode, XMAX, YMAX};
use crate::error::Error;

/// Last RAM column (gate line) as low and high byte
const X_LAST_LOW: u8 = ((XMAX - 1) % 256) as u8;
const X_LAST_HIGH: u8 = ((XMAX - 1) / 256) as u8;

/// Last RAM row as a byte address
const Y_LAST_BYTE: u8 = ((YMAX - 1) / 8) as u8;

/// RAM write sizes of the two update paths: (bits per row, rows)
const FULL_WINDOW: (u8, u8) = (YMAX as u8, XMAX as u8);
const PARTIAL_WINDOW: (u8, u8) = ((YMAX - 1) as u8, XMAX as u8);

/// DFR0591 E-Paper Display Driver
///
/// ## Type Parameters
///
/// - `T` - transport the commands go through. Pass `&mut transport` to keep
///   ownership of it, since [`DisplayTransport`] is implemented for `&mut T`.
pub struct Epaper<T> {
    transport: T,
    width: usize,
    height: usize,
    buffer: BitArray,
}

impl<T> Epaper<T> {
    /// Allocate a `width × height` bit buffer, all pixels off.
    ///
    /// Fails with [`Error::InvalidSize`] if `width * height` is not a multiple of 8.
    /// Nothing is sent to the panel.
    pub fn new(transport: T, width: usize, height: usize) -> Result<Self, Error> {
        let bits = width.checked_mul(height).ok_or(Error::InvalidSize)?;
        let buffer = BitArray::new(bits)?;

        Ok(Epaper {
            transport,
            width,
            height,
            buffer,
        })
    }

    /// Set or clear one pixel in the buffer. No I/O happens until [`Epaper::flush`].
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> Result<(), Error> {
        let index = self.bit_index(x, y)?;
        self.buffer.set_bit(index, on)
    }

    /// Read one pixel back from the buffer
    pub fn pixel(&self, x: usize, y: usize) -> Result<bool, Error> {
        let index = self.bit_index(x, y)?;
        self.buffer.bit(index)
    }

    /// Set every pixel in the buffer on or off
    pub fn fill(&mut self, on: bool) {
        self.buffer.fill(on);
    }

    /// The frame buffer as it will be sent
    pub fn buffer(&self) -> &BitArray {
        &self.buffer
    }

    /// Panel width given at construction
    pub fn width(&self) -> usize {
        self.width
    }

    /// Panel height given at construction
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Drop the buffer and give the transport back
    pub fn release(self) -> T {
        self.transport
    }

    fn bit_index(&self, x: usize, y: usize) -> Result<usize, Error> {
        if x > self.width || y > self.height {
            return Err(Error::OutOfBounds);
        }

        y.checked_mul(XMAX)
            .and_then(|row| row.checked_add(x))
            .ok_or(Error::InvalidIndex)
    }
}

impl<T> Epaper<T>
where
    T: DisplayTransport,
{
    /// Send the buffer to the panel and refresh it with `mode`.
    ///
    /// A buffer smaller than the controller RAM write is rejected with
    /// [`Error::InvalidSize`] before anything is sent.
    ///
    /// The first transport error aborts the sequence and is returned as
    /// [`Error::Transport`]; the controller is then in an unknown state and
    /// the whole flush has to be repeated.
    pub fn flush(&mut self, mode: Mode) -> Result<(), Error> {
        let (size_x, size_y) = match mode {
            Mode::Full => FULL_WINDOW,
            Mode::Partial => PARTIAL_WINDOW,
        };
        if self.buffer.as_bytes().len() < ram_transfer_len(size_x, size_y) {
            return Err(Error::InvalidSize);
        }

        log::info!("Flushing frame with {:?} refresh", mode);

        self.init()?;
        self.init_lut(mode)?;
        self.transport.power_on()?;

        match mode {
            Mode::Full => self.display_full()?,
            Mode::Partial => {
                let (x_end, _) = PARTIAL_WINDOW;
                self.display_partial(0, x_end, 0, (XMAX - 1) as u16)?
            }
        }

        log::info!("Flush complete");
        Ok(())
    }

    /// Wake the controller: clock and analog on, then activate
    pub fn power_on(&mut self) -> Result<(), Error> {
        log::info!("Powering on display");
        self.transport.power_on()?;
        Ok(())
    }

    /// Put the controller into deep sleep
    pub fn power_off(&mut self) -> Result<(), Error> {
        log::info!("Powering off display");
        self.transport.power_off()?;
        Ok(())
    }

    /// Controller configuration, sent at the start of every flush
    fn init(&mut self) -> Result<(), Error> {
        log::debug!("Initializing controller");
        let t = &mut self.transport;

        t.write_cmd_and_data(
            Cmd::DRIVER_OUTPUT_CONTROL,
            Some(&[
                X_LAST_LOW,
                X_LAST_HIGH,
                Flag::DRIVER_OUTPUT_GATE_SCAN_FROM_G0,
            ]),
        )?;
        t.write_cmd_and_data(Cmd::BOOSTER_SOFT_START, Some(&Flag::BOOSTER_SOFT_START))?;
        t.write_cmd_and_data(Cmd::WRITE_VCOM_REGISTER, Some(&[Flag::VCOM]))?;
        t.write_cmd_and_data(Cmd::DUMMY_LINE_PERIOD, Some(&[Flag::DUMMY_LINE_PERIOD]))?;
        t.write_cmd_and_data(Cmd::GATE_LINE_WIDTH, Some(&[Flag::GATE_LINE_WIDTH]))?;
        t.write_cmd_and_data(Cmd::DATA_ENTRY_MODE, Some(&[Flag::DATA_ENTRY_DECRY_INCRX]))?;

        t.set_ram_data_window(0x00, Y_LAST_BYTE, X_LAST_LOW, X_LAST_HIGH, 0x00, 0x00)?;
        t.set_ram_pointer(0x00, X_LAST_LOW, X_LAST_HIGH)?;
        Ok(())
    }

    /// Load the waveform table matching `mode`
    fn init_lut(&mut self, mode: Mode) -> Result<(), Error> {
        log::debug!("Setting {:?} LUT", mode);
        let lut: &[u8] = match mode {
            Mode::Full => &Flag::LUT_FULL_UPDATE,
            Mode::Partial => &Flag::LUT_PARTIAL_UPDATE,
        };
        self.transport
            .write_cmd_and_data(Cmd::WRITE_LUT_REGISTER, Some(lut))?;
        Ok(())
    }

    fn display_full(&mut self) -> Result<(), Error> {
        self.transport
            .set_ram_pointer(0x00, X_LAST_LOW, X_LAST_HIGH)?;
        let (size_x, size_y) = FULL_WINDOW;
        self.transport
            .write_display_ram(&self.buffer, size_x, size_y)?;
        self.transport.update_display(Mode::Full)?;
        Ok(())
    }

    /// Write and refresh the window `x_start..=x_end` (pixels along the gate
    /// byte axis) by `y_start..=y_end` (gate lines).
    ///
    /// RAM Y runs from `y_end` down to `y_start` (data entry mode decrements Y).
    fn display_partial(
        &mut self,
        x_start: u8,
        x_end: u8,
        y_start: u16,
        y_end: u16,
    ) -> Result<(), Error> {
        let [y_end_low, y_end_high] = y_end.to_le_bytes();
        let [y_start_low, y_start_high] = y_start.to_le_bytes();
        let size_y = u8::try_from(y_end - y_start + 1).map_err(|_| Error::OutOfBounds)?;

        self.transport.set_ram_data_window(
            x_start / 8,
            x_end / 8,
            y_end_low,
            y_end_high,
            y_start_low,
            y_start_high,
        )?;
        self.transport
            .set_ram_pointer(x_start / 8, y_end_low, y_end_high)?;
        self.transport
            .write_display_ram(&self.buffer, x_end - x_start, size_y)?;
        self.transport.update_display(Mode::Partial)?;
        Ok(())
    }
}
