//! Driver for the DFRobot DFR0591 2.13" black/white e-ink display
//!
//! Keeps a bit-packed frame buffer in memory and, on flush, sends the
//! controller its fixed command sequence: init, waveform LUT, power on, RAM
//! write and refresh. The bus is reached through [`DisplayTransport`]; the
//! crate ships an `embedded-hal` SPI implementation ([`DisplayInterface`]) and
//! an in-memory recorder for tests ([`RecordingTransport`]).
//!
//! ```
//! use dfr0591::{Epaper, Mode, RecordingTransport, XMAX, YMAX};
//!
//! let mut transport = RecordingTransport::new();
//! let mut epd = Epaper::new(&mut transport, XMAX, YMAX)?;
//! epd.set_pixel(10, 20, true)?;
//! epd.flush(Mode::Full)?;
//! # Ok::<(), dfr0591::Error>(())
//! ```
#![warn(missing_docs)]

pub mod bitarray;
pub mod dfr0591;
pub mod error;

pub use crate::bitarray::BitArray;
pub use crate::error::{DisplayError, Error};

pub use crate::dfr0591::cancel::{Cancellation, Never, PollLimit};
pub use crate::dfr0591::cmd::Cmd;
pub use crate::dfr0591::driver::Epaper;
pub use crate::dfr0591::flag::Flag;
pub use crate::dfr0591::interface::{
    BusyWait, DisplayInterface, DisplayTransport, BUSY_POLL_INTERVAL_US,
};
pub use crate::dfr0591::recording::{Call, Command, RecordingTransport};
pub use crate::dfr0591::{Mode, XMAX, YMAX};
