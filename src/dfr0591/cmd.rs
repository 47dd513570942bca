//! Controller command bytes

/// Command bytes, sent with the DC line low
pub struct Cmd;
#[allow(missing_docs)]
impl Cmd {
    // Init
    pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;
    pub const BOOSTER_SOFT_START: u8 = 0x0C;
    pub const WRITE_VCOM_REGISTER: u8 = 0x2C;
    pub const DUMMY_LINE_PERIOD: u8 = 0x3A;
    pub const GATE_LINE_WIDTH: u8 = 0x3B;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const WRITE_LUT_REGISTER: u8 = 0x32;

    // RAM addressing
    pub const SET_RAMX_START_END: u8 = 0x44;
    pub const SET_RAMY_START_END: u8 = 0x45;
    pub const SET_RAMX_COUNTER: u8 = 0x4E;
    pub const SET_RAMY_COUNTER: u8 = 0x4F;

    // Update
    pub const WRITE_RAM: u8 = 0x24;
    pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;
    pub const MASTER_ACTIVATE: u8 = 0x20;
    pub const NOP: u8 = 0xFF;

    // Power off, sent in this order (DRIVER_OUTPUT_CONTROL goes between 0x82 and 0x02)
    pub const POWER_OFF_RESET: u8 = 0x12;
    pub const POWER_OFF_BOOSTER: u8 = 0x82;
    pub const POWER_OFF_OSCILLATOR: u8 = 0x02;
}

/*
DFRobot reference driver sequence:
0x01 - Driver Output Control (gate count)
0x0C - Booster Soft Start
0x2C - Write VCOM
0x3A - Dummy Line Period
0x3B - Gate Line Width
0x11 - Data Entry Mode
0x32 - Write LUT (29 bytes)
0x44 / 0x45 - RAM X / Y window
0x4E / 0x4F - RAM X / Y counter
0x24 - Write RAM
0x22 + 0x20 - Update sequence + Master Activation, terminated by 0xFF
*/
