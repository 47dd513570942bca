//! Fixed data bytes and waveform tables

/// Data bytes that accompany the [`super::cmd::Cmd`] commands.
///
/// These are fixed for the DFR0591 panel; changing any of them breaks
/// compatibility with the controller.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Booster Soft Start (0x0C) phases
    pub const BOOSTER_SOFT_START: [u8; 3] = [0xD7, 0xD6, 0x9D];

    // Write VCOM (0x2C)
    pub const VCOM: u8 = 0xA8;

    // Dummy Line Period (0x3A), 4 dummy lines per gate
    pub const DUMMY_LINE_PERIOD: u8 = 0x1A;

    // Gate Line Width (0x3B), 2us per line
    pub const GATE_LINE_WIDTH: u8 = 0x08;

    // Data Entry Mode (0x11)
    pub const DATA_ENTRY_DECRY_INCRX: u8 = 0x01; // Y decrement, X increment

    // Driver Output Control (0x01), third byte
    pub const DRIVER_OUTPUT_GATE_SCAN_FROM_G0: u8 = 0x00;

    // Display Update Control 2 (0x22) sequences
    pub const DISPLAY_UPDATE_FULL: u8 = 0xC7;
    pub const DISPLAY_UPDATE_PARTIAL: u8 = 0x04;
    pub const DISPLAY_UPDATE_POWER_ON: u8 = 0xC0; // Clock + analog on, no refresh

    // Power off data
    pub const POWER_OFF_BOOSTER: u8 = 0x00;
    pub const POWER_OFF_DRIVER_OUTPUT: [u8; 5] = [0x02, 0x00, 0x00, 0x00, 0x00];

    /// Waveform LUT for a full refresh
    pub const LUT_FULL_UPDATE: [u8; 29] = [
        0x22, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, // VS phases
        0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x1E, 0x1E, 0x1E, 0x1E, 0x1E, // TP phase timing
        0x1E, 0x1E, 0x1E, 0x01, 0x00, 0x00, 0x00, //
        0x00,
    ];

    /// Waveform LUT for a partial refresh
    pub const LUT_PARTIAL_UPDATE: [u8; 29] = [
        0x18, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS phases
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x0F, 0x01, 0x00, 0x00, 0x00, // TP phase timing
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00,
    ];
}
