//! DFR0591 ePaper Display Driver
//!
//! Used in the [DFRobot 2.13" e-ink display module](https://wiki.dfrobot.com/2.13_e-ink_display_module_SKU_DFR0591),
//! a 250×128 black/white panel.
//!
//! ### Usage
//! This driver keeps one bit-packed buffer and only talks to the panel on
//! [`driver::Epaper::flush`]. To display something you:
//!
//! 1. build a transport, normally [`interface::DisplayInterface`] over your HAL's SPI bus and pins
//! 1. wrap it in [`driver::Epaper`] and draw with [`driver::Epaper::set_pixel`], or with
//!    [`embedded_graphics`](https://github.com/embedded-graphics/embedded-graphics) through the
//!    `DrawTarget` impl in [`graphics`]
//! 1. call [`driver::Epaper::flush`] with [`Mode::Full`] or [`Mode::Partial`]
//!
//! Everything is synchronous and single-owner. The driver and the transports
//! take `&mut self` and do no locking; share them across threads only behind
//! your own mutex.

pub mod cancel;
pub mod driver;
pub mod graphics;
pub mod interface;
pub mod recording;

pub mod cmd;
pub mod flag;

/// Controller row stride in pixels. Pixel `(x, y)` lives at bit `y * XMAX + x`.
pub const XMAX: usize = 250;

/// Controller gate count
pub const YMAX: usize = 128;

/// Refresh mode, selects the waveform LUT and the update path of a flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Full refresh - best quality, flickers to clear ghosting
    Full,
    /// Partial refresh - fast, some ghosting
    Partial,
}
