//! SSD1306 command packets
//!
//! Each command byte is preceded by [`CONTROL_COMMAND`] so the controller
//! treats every following byte individually. The packets are fixed-size
//! arrays so callers can copy them into a transaction without allocation.

/// Control byte: Co=1, D/C#=0, exactly one command byte follows
pub const CONTROL_COMMAND: u8 = 0x80;

/// Control byte: Co=0, D/C#=0, every remaining byte is a command
pub const CONTROL_COMMAND_STREAM: u8 = 0x00;

/// Control byte: Co=0, D/C#=1, every remaining byte goes to GDDRAM
pub const CONTROL_DATA: u8 = 0x40;

/// SSD1306 commands
#[allow(dead_code)]
pub mod cmd {
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const CHARGE_PUMP_ON: u8 = 0x14;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    /// Low nibble selects the page (0xB0..0xB7)
    pub const SET_PAGE_ADDR: u8 = 0xB0;
}

/// Bring-up sequence sent once after reset
#[rustfmt::skip]
pub const BRINGUP_SEQUENCE: [u8; 12] = [
    CONTROL_COMMAND, cmd::SET_CHARGE_PUMP,
    CONTROL_COMMAND, cmd::CHARGE_PUMP_ON,
    CONTROL_COMMAND, cmd::DISPLAY_ON,
    CONTROL_COMMAND, cmd::SET_CONTRAST,
    CONTROL_COMMAND, 0xFF,
    CONTROL_COMMAND, cmd::SET_INVERSE,
];

/// Length of a select-page packet
pub const SELECT_PAGE_LEN: usize = 6;

/// Length of a brightness packet
pub const BRIGHTNESS_LEN: usize = 4;

/// Prefix switching the controller to data mode before page bytes
pub const DATA_PREFIX: [u8; 1] = [CONTROL_DATA];

/// Reset the column cursor to 0 and select `page`
///
/// Only the low nibble of `page` reaches the controller.
#[rustfmt::skip]
pub const fn select_page(page: u8) -> [u8; SELECT_PAGE_LEN] {
    [
        CONTROL_COMMAND, cmd::SET_LOW_COLUMN,
        CONTROL_COMMAND, cmd::SET_HIGH_COLUMN,
        CONTROL_COMMAND, cmd::SET_PAGE_ADDR | (page & 0x0F),
    ]
}

/// Set contrast to `level` (0 = dimmest, 255 = brightest)
pub const fn brightness(level: u8) -> [u8; BRIGHTNESS_LEN] {
    [CONTROL_COMMAND, cmd::SET_CONTRAST, CONTROL_COMMAND, level]
}
