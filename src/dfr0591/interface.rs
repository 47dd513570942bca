//! Display transport: the command protocol primitive and its SPI implementation
use crate::bitarray::BitArray;
use crate::dfr0591::cancel::Cancellation;
use crate::dfr0591::{cmd::Cmd, flag::Flag, Mode};
use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

/// Interval between two reads of the busy line
pub const BUSY_POLL_INTERVAL_US: u32 = 1_000;

/// Everything the panel driver needs from the bus.
///
/// Only [`DisplayTransport::write_cmd_and_data`] has to be implemented; the
/// other operations are encoded on top of it with the DFR0591 command bytes.
/// Implementations may override them to observe the higher level calls.
pub trait DisplayTransport {
    /// Send one command byte followed by its optional data bytes
    fn write_cmd_and_data(&mut self, cmd: u8, data: Option<&[u8]>) -> Result<(), DisplayError>;

    /// Turn on clock and analog blocks and activate
    fn power_on(&mut self) -> Result<(), DisplayError> {
        send_power_on(self)
    }

    /// Booster off, deep sleep, oscillator idle
    fn power_off(&mut self) -> Result<(), DisplayError> {
        send_power_off(self)
    }

    /// Set the RAM X (byte) and Y (gate, low/high byte) window
    fn set_ram_data_window(
        &mut self,
        x_start: u8,
        x_end: u8,
        y_start: u8,
        y_start_high: u8,
        y_end: u8,
        y_end_high: u8,
    ) -> Result<(), DisplayError> {
        send_ram_data_window(self, x_start, x_end, y_start, y_start_high, y_end, y_end_high)
    }

    /// Set the RAM address counter
    fn set_ram_pointer(&mut self, x: u8, y: u8, y_high: u8) -> Result<(), DisplayError> {
        send_ram_pointer(self, x, y, y_high)
    }

    /// Write the leading `size_x` (rounded up to whole bytes) × `size_y` part of the buffer into RAM
    fn write_display_ram(
        &mut self,
        buffer: &BitArray,
        size_x: u8,
        size_y: u8,
    ) -> Result<(), DisplayError> {
        send_display_ram(self, buffer, size_x, size_y)
    }

    /// Run the update sequence for `mode` and terminate it
    fn update_display(&mut self, mode: Mode) -> Result<(), DisplayError> {
        send_update_display(self, mode)
    }
}

impl<T: DisplayTransport + ?Sized> DisplayTransport for &mut T {
    fn write_cmd_and_data(&mut self, cmd: u8, data: Option<&[u8]>) -> Result<(), DisplayError> {
        (**self).write_cmd_and_data(cmd, data)
    }

    fn power_on(&mut self) -> Result<(), DisplayError> {
        (**self).power_on()
    }

    fn power_off(&mut self) -> Result<(), DisplayError> {
        (**self).power_off()
    }

    fn set_ram_data_window(
        &mut self,
        x_start: u8,
        x_end: u8,
        y_start: u8,
        y_start_high: u8,
        y_end: u8,
        y_end_high: u8,
    ) -> Result<(), DisplayError> {
        (**self).set_ram_data_window(x_start, x_end, y_start, y_start_high, y_end, y_end_high)
    }

    fn set_ram_pointer(&mut self, x: u8, y: u8, y_high: u8) -> Result<(), DisplayError> {
        (**self).set_ram_pointer(x, y, y_high)
    }

    fn write_display_ram(
        &mut self,
        buffer: &BitArray,
        size_x: u8,
        size_y: u8,
    ) -> Result<(), DisplayError> {
        (**self).write_display_ram(buffer, size_x, size_y)
    }

    fn update_display(&mut self, mode: Mode) -> Result<(), DisplayError> {
        (**self).update_display(mode)
    }
}

/// Number of bytes a RAM write of `size_x` bits × `size_y` rows transfers.
///
/// Rows are padded up to a multiple of 8 bits.
pub const fn ram_transfer_len(size_x: u8, size_y: u8) -> usize {
    (size_x as usize).div_ceil(8) * size_y as usize
}

pub(crate) fn send_power_on<T: DisplayTransport + ?Sized>(t: &mut T) -> Result<(), DisplayError> {
    t.write_cmd_and_data(Cmd::DISPLAY_UPDATE_CTRL2, Some(&[Flag::DISPLAY_UPDATE_POWER_ON]))?;
    t.write_cmd_and_data(Cmd::MASTER_ACTIVATE, None)
}

pub(crate) fn send_power_off<T: DisplayTransport + ?Sized>(t: &mut T) -> Result<(), DisplayError> {
    t.write_cmd_and_data(Cmd::POWER_OFF_RESET, None)?;
    t.write_cmd_and_data(Cmd::POWER_OFF_BOOSTER, Some(&[Flag::POWER_OFF_BOOSTER]))?;
    t.write_cmd_and_data(
        Cmd::DRIVER_OUTPUT_CONTROL,
        Some(&Flag::POWER_OFF_DRIVER_OUTPUT),
    )?;
    t.write_cmd_and_data(Cmd::POWER_OFF_OSCILLATOR, None)
}

pub(crate) fn send_ram_data_window<T: DisplayTransport + ?Sized>(
    t: &mut T,
    x_start: u8,
    x_end: u8,
    y_start: u8,
    y_start_high: u8,
    y_end: u8,
    y_end_high: u8,
) -> Result<(), DisplayError> {
    t.write_cmd_and_data(Cmd::SET_RAMX_START_END, Some(&[x_start, x_end]))?;
    t.write_cmd_and_data(
        Cmd::SET_RAMY_START_END,
        Some(&[y_start, y_start_high, y_end, y_end_high]),
    )
}

pub(crate) fn send_ram_pointer<T: DisplayTransport + ?Sized>(
    t: &mut T,
    x: u8,
    y: u8,
    y_high: u8,
) -> Result<(), DisplayError> {
    t.write_cmd_and_data(Cmd::SET_RAMX_COUNTER, Some(&[x]))?;
    t.write_cmd_and_data(Cmd::SET_RAMY_COUNTER, Some(&[y, y_high]))
}

pub(crate) fn send_display_ram<T: DisplayTransport + ?Sized>(
    t: &mut T,
    buffer: &BitArray,
    size_x: u8,
    size_y: u8,
) -> Result<(), DisplayError> {
    let len = ram_transfer_len(size_x, size_y);
    let data = buffer
        .as_bytes()
        .get(..len)
        .ok_or(DisplayError::OutOfBoundsError)?;

    log::debug!("Writing {} bytes of display RAM ({}x{})", len, size_x, size_y);
    t.write_cmd_and_data(Cmd::WRITE_RAM, Some(data))
}

pub(crate) fn send_update_display<T: DisplayTransport + ?Sized>(
    t: &mut T,
    mode: Mode,
) -> Result<(), DisplayError> {
    let sequence = match mode {
        Mode::Full => Flag::DISPLAY_UPDATE_FULL,
        Mode::Partial => Flag::DISPLAY_UPDATE_PARTIAL,
    };
    t.write_cmd_and_data(Cmd::DISPLAY_UPDATE_CTRL2, Some(&[sequence]))?;
    t.write_cmd_and_data(Cmd::MASTER_ACTIVATE, None)?;
    t.write_cmd_and_data(Cmd::NOP, None)
}

/// How a busy wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyWait {
    /// The controller released the busy line
    Idle,
    /// The cancellation fired while the controller was still busy
    Cancelled,
}

/// SPI connection to the DFR0591 controller.
///
/// Chip select is driven by hand because the DC line has to switch between
/// the command byte and its data while CS stays low, so the bus is a plain
/// [`SpiBus`] rather than an `SpiDevice`.
pub struct DisplayInterface<SPI, CS, DC, BSY, DELAY, C> {
    /// SPI bus, without hardware chip select
    spi: SPI,
    /// Chip select, active low
    cs: CS,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// High while the controller is busy
    busy: BSY,
    /// Paces the busy polling
    delay: DELAY,
    /// Decides when to stop waiting on the busy line
    cancel: C,
    poll_interval_us: u32,
    last_wait: Option<BusyWait>,
}

impl<SPI, CS, DC, BSY, DELAY, C> DisplayInterface<SPI, CS, DC, BSY, DELAY, C> {
    /// Bundle the bus, the three control pins, a delay and a cancellation signal.
    ///
    /// Nothing is sent until the first command.
    pub fn new(spi: SPI, cs: CS, dc: DC, busy: BSY, delay: DELAY, cancel: C) -> Self {
        DisplayInterface {
            spi,
            cs,
            dc,
            busy,
            delay,
            cancel,
            poll_interval_us: BUSY_POLL_INTERVAL_US,
            last_wait: None,
        }
    }

    /// Override [`BUSY_POLL_INTERVAL_US`]
    pub fn with_poll_interval_us(mut self, poll_interval_us: u32) -> Self {
        self.poll_interval_us = poll_interval_us;
        self
    }

    /// Outcome of the busy wait before the most recent command
    pub fn last_wait(&self) -> Option<BusyWait> {
        self.last_wait
    }

    /// Give back the bus, pins, delay and cancellation
    pub fn release(self) -> (SPI, CS, DC, BSY, DELAY, C) {
        (self.spi, self.cs, self.dc, self.busy, self.delay, self.cancel)
    }
}

impl<SPI, CS, DC, BSY, DELAY, C> DisplayInterface<SPI, CS, DC, BSY, DELAY, C>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
    C: Cancellation,
{
    /// Block until the busy line goes low or the cancellation fires
    pub fn wait_busy_low(&mut self) -> Result<BusyWait, DisplayError> {
        self.cancel.begin_wait();
        let mut polls: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                log::warn!(
                    "Busy wait cancelled after {} polls, controller may still be busy",
                    polls
                );
                return Ok(BusyWait::Cancelled);
            }

            self.delay.delay_us(self.poll_interval_us);
            polls = polls.saturating_add(1);

            let busy = self
                .busy
                .is_high()
                .map_err(|_| DisplayError::BusWriteError)?;
            if !busy {
                log::trace!("Busy line low after {} polls", polls);
                return Ok(BusyWait::Idle);
            }
        }
    }

    /// Command byte and data with CS already low
    fn write_selected(&mut self, cmd: u8, data: Option<&[u8]>) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.write_bytes(&[cmd])?;

        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        if let Some(data) = data.filter(|data| !data.is_empty()) {
            self.write_bytes(data)?;
        }
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.spi
            .write(bytes)
            .map_err(|_| DisplayError::BusWriteError)?;
        self.spi.flush().map_err(|_| DisplayError::BusWriteError)
    }
}

impl<SPI, CS, DC, BSY, DELAY, C> DisplayTransport for DisplayInterface<SPI, CS, DC, BSY, DELAY, C>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
    C: Cancellation,
{
    fn write_cmd_and_data(&mut self, cmd: u8, data: Option<&[u8]>) -> Result<(), DisplayError> {
        // A cancelled wait still sends the command. The controller ignores
        // input while busy, so the command may be lost; `last_wait` lets the
        // caller tell the two outcomes apart.
        let wait = self.wait_busy_low()?;
        self.last_wait = Some(wait);

        log::debug!(
            "cmd 0x{:02X} with {} data bytes",
            cmd,
            data.map_or(0, <[u8]>::len)
        );

        self.cs.set_low().map_err(|_| DisplayError::CSError)?;
        let sent = self.write_selected(cmd, data);

        // CS goes high even when the transfer failed; the first error wins
        let released = self.cs.set_high().map_err(|_| DisplayError::CSError);
        sent.and(released)
    }
}
