//! End-to-end tests: `Epaper` driving `DisplayInterface` over mocked SPI and GPIO.
//!
//! Every command unit on the wire is expected as:
//! busy poll, CS low, DC low, command byte, DC high, data bytes (if any), CS high.
//!
//! Run with: cargo test --test spi_transport

use std::sync::atomic::AtomicBool;

use dfr0591::{DisplayInterface, Epaper, Flag, Mode, Never, XMAX, YMAX};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mock expectations for a run of command units
struct Wire {
    spi: Vec<SpiTransaction<u8>>,
    cs: Vec<PinTransaction>,
    dc: Vec<PinTransaction>,
    busy: Vec<PinTransaction>,
}

impl Wire {
    fn new() -> Self {
        Wire {
            spi: vec![],
            cs: vec![],
            dc: vec![],
            busy: vec![],
        }
    }

    /// One command unit, with a single idle busy poll in front of it
    fn command(mut self, cmd: u8, data: &[u8]) -> Self {
        self.busy.push(PinTransaction::get(PinState::Low));
        self.unpolled_command(cmd, data)
    }

    /// One command unit without a busy read (the wait was cancelled up front)
    fn unpolled_command(mut self, cmd: u8, data: &[u8]) -> Self {
        self.cs.push(PinTransaction::set(PinState::Low));
        self.dc.push(PinTransaction::set(PinState::Low));
        self.spi.push(SpiTransaction::write_vec(vec![cmd]));
        self.spi.push(SpiTransaction::flush());
        self.dc.push(PinTransaction::set(PinState::High));
        if !data.is_empty() {
            self.spi.push(SpiTransaction::write_vec(data.to_vec()));
            self.spi.push(SpiTransaction::flush());
        }
        self.cs.push(PinTransaction::set(PinState::High));
        self
    }

    fn mocks(&self) -> (SpiMock<u8>, PinMock, PinMock, PinMock) {
        (
            SpiMock::new(&self.spi),
            PinMock::new(&self.cs),
            PinMock::new(&self.dc),
            PinMock::new(&self.busy),
        )
    }
}

fn init_sequence(wire: Wire) -> Wire {
    wire.command(0x01, &[0xF9, 0x00, 0x00])
        .command(0x0C, &[0xD7, 0xD6, 0x9D])
        .command(0x2C, &[0xA8])
        .command(0x3A, &[0x1A])
        .command(0x3B, &[0x08])
        .command(0x11, &[0x01])
        .command(0x44, &[0x00, 0x0F])
        .command(0x45, &[0xF9, 0x00, 0x00, 0x00])
        .command(0x4E, &[0x00])
        .command(0x4F, &[0xF9, 0x00])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// A full flush puts the exact DFR0591 byte stream on the bus
#[test]
fn full_flush_over_spi() -> anyhow::Result<()> {
    // Diagonal from the top-left corner, in the bit layout the controller reads
    let mut ram = vec![0u8; XMAX * YMAX / 8];
    for i in 0..YMAX {
        let index = i * XMAX + i;
        ram[index / 8] |= 1 << (index % 8);
    }

    let wire = init_sequence(Wire::new())
        .command(0x32, &Flag::LUT_FULL_UPDATE)
        .command(0x22, &[0xC0])
        .command(0x20, &[])
        .command(0x4E, &[0x00])
        .command(0x4F, &[0xF9, 0x00])
        .command(0x24, &ram)
        .command(0x22, &[0xC7])
        .command(0x20, &[])
        .command(0xFF, &[]);
    let (mut spi, mut cs, mut dc, mut busy) = wire.mocks();

    let mut di = DisplayInterface::new(
        spi.clone(),
        cs.clone(),
        dc.clone(),
        busy.clone(),
        NoopDelay,
        Never,
    );
    let mut epd = Epaper::new(&mut di, XMAX, YMAX)?;
    for i in 0..YMAX {
        epd.set_pixel(i, i, true)?;
    }
    epd.flush(Mode::Full)?;

    spi.done();
    cs.done();
    dc.done();
    busy.done();
    Ok(())
}

/// A partial flush writes the window registers and uses update sequence 0x04
#[test]
fn partial_flush_over_spi() -> anyhow::Result<()> {
    let ram = vec![0u8; XMAX * YMAX / 8];

    let wire = init_sequence(Wire::new())
        .command(0x32, &Flag::LUT_PARTIAL_UPDATE)
        .command(0x22, &[0xC0])
        .command(0x20, &[])
        .command(0x44, &[0x00, 0x0F])
        .command(0x45, &[0xF9, 0x00, 0x00, 0x00])
        .command(0x4E, &[0x00])
        .command(0x4F, &[0xF9, 0x00])
        .command(0x24, &ram)
        .command(0x22, &[0x04])
        .command(0x20, &[])
        .command(0xFF, &[]);
    let (mut spi, mut cs, mut dc, mut busy) = wire.mocks();

    let di = DisplayInterface::new(
        spi.clone(),
        cs.clone(),
        dc.clone(),
        busy.clone(),
        NoopDelay,
        Never,
    );
    let mut epd = Epaper::new(di, XMAX, YMAX)?;
    epd.flush(Mode::Partial)?;
    epd.release();

    spi.done();
    cs.done();
    dc.done();
    busy.done();
    Ok(())
}

/// Power off sends its four commands, each after a busy poll
#[test]
fn power_off_over_spi() -> anyhow::Result<()> {
    let wire = Wire::new()
        .command(0x12, &[])
        .command(0x82, &[0x00])
        .command(0x01, &[0x02, 0x00, 0x00, 0x00, 0x00])
        .command(0x02, &[]);
    let (mut spi, mut cs, mut dc, mut busy) = wire.mocks();

    let mut di = DisplayInterface::new(
        spi.clone(),
        cs.clone(),
        dc.clone(),
        busy.clone(),
        NoopDelay,
        Never,
    );
    Epaper::new(&mut di, XMAX, YMAX)?.power_off()?;

    spi.done();
    cs.done();
    dc.done();
    busy.done();
    Ok(())
}

/// With the cancel flag already set the busy line is never read, and the
/// commands still go out
#[test]
fn cancelled_waits_still_send_commands() -> anyhow::Result<()> {
    let wire = Wire::new()
        .unpolled_command(0x22, &[0xC0])
        .unpolled_command(0x20, &[]);
    let (mut spi, mut cs, mut dc, mut busy) = wire.mocks();

    let cancel = AtomicBool::new(true);
    let mut di = DisplayInterface::new(
        spi.clone(),
        cs.clone(),
        dc.clone(),
        busy.clone(),
        NoopDelay,
        &cancel,
    );
    Epaper::new(&mut di, XMAX, YMAX)?.power_on()?;
    assert_eq!(di.last_wait(), Some(dfr0591::BusyWait::Cancelled));

    spi.done();
    cs.done();
    dc.done();
    busy.done();
    Ok(())
}

/// Pixel writes never touch the bus
#[test]
fn set_pixel_is_buffer_only() -> anyhow::Result<()> {
    let (mut spi, mut cs, mut dc, mut busy) = Wire::new().mocks();

    let mut di = DisplayInterface::new(
        spi.clone(),
        cs.clone(),
        dc.clone(),
        busy.clone(),
        NoopDelay,
        Never,
    );
    let mut epd = Epaper::new(&mut di, XMAX, YMAX)?;
    epd.set_pixel(100, 50, true)?;
    let index = 50 * XMAX + 100;
    assert_eq!(epd.buffer().as_bytes()[index / 8], 1 << (index % 8));

    spi.done();
    cs.done();
    dc.done();
    busy.done();
    Ok(())
}
