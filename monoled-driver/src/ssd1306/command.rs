//! SSD1306 command set and init sequence

use monoled_core::DisplayConfig;

/// SSD1306 commands
pub mod cmd {
    /// Contrast, one argument byte
    pub const SET_CONTRAST: u8 = 0x81;
    /// Show RAM contents (not all-on)
    pub const DISPLAY_FOLLOW_RAM: u8 = 0xA4;
    /// Lit bit is a lit pixel
    pub const SET_NORMAL: u8 = 0xA6;
    /// Lit bit is a dark pixel
    pub const SET_INVERSE: u8 = 0xA7;
    /// Panel off (sleep)
    pub const DISPLAY_OFF: u8 = 0xAE;
    /// Panel on
    pub const DISPLAY_ON: u8 = 0xAF;

    /// Addressing mode, one argument byte
    pub const SET_MEMORY_MODE: u8 = 0x20;
    /// Column window, start and end bytes
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    /// Page window, start and end bytes
    pub const SET_PAGE_ADDR: u8 = 0x22;

    /// RAM start line 0 (OR in the line)
    pub const SET_START_LINE: u8 = 0x40;
    /// Column 127 mapped to SEG0
    pub const SET_SEG_REMAP: u8 = 0xA1;
    /// Multiplex ratio, one argument byte
    pub const SET_MUX_RATIO: u8 = 0xA8;
    /// Scan COM outputs from the bottom
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    /// Vertical offset, one argument byte
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    /// COM pin layout, one argument byte
    pub const SET_COM_PINS: u8 = 0xDA;

    /// Clock divide ratio and oscillator, one argument byte
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    /// Precharge period, one argument byte
    pub const SET_PRECHARGE: u8 = 0xD9;
    /// VCOMH deselect level, one argument byte
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    /// Charge pump, one argument byte
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Horizontal addressing mode argument for [`cmd::SET_MEMORY_MODE`]
pub const MEMORY_MODE_HORIZONTAL: u8 = 0x00;

/// Length of the init sequence
pub const INIT_LEN: usize = 25;

/// Power-up command sequence for a panel
///
/// Multiplex ratio and COM pin layout follow the panel height; precharge and
/// charge pump follow the VCC source.
pub fn init_sequence(config: &DisplayConfig) -> [u8; INIT_LEN] {
    let mux = config.height.saturating_sub(1).min(0xFF) as u8;
    let com_pins = if config.height == 32 { 0x02 } else { 0x12 };
    let (precharge, charge_pump) = if config.external_vcc {
        (0x22, 0x10)
    } else {
        (0xF1, 0x14)
    };

    [
        cmd::DISPLAY_OFF,
        cmd::SET_MEMORY_MODE,
        MEMORY_MODE_HORIZONTAL,
        cmd::SET_START_LINE, // line 0
        cmd::SET_SEG_REMAP,
        cmd::SET_MUX_RATIO,
        mux,
        cmd::SET_COM_SCAN_DEC,
        cmd::SET_DISPLAY_OFFSET,
        0x00,
        cmd::SET_COM_PINS,
        com_pins,
        cmd::SET_CLOCK_DIV,
        0x80, // Default clock
        cmd::SET_PRECHARGE,
        precharge,
        cmd::SET_VCOM_DETECT,
        0x30,
        cmd::SET_CONTRAST,
        0xFF,
        cmd::DISPLAY_FOLLOW_RAM,
        cmd::SET_NORMAL,
        cmd::SET_CHARGE_PUMP,
        charge_pump,
        cmd::DISPLAY_ON,
    ]
}

/// Column window `start..=end` for the next data write
pub const fn column_window(start: u16, end: u16) -> [u8; 3] {
    [cmd::SET_COLUMN_ADDR, start as u8, end as u8]
}

/// Page window covering exactly one page
pub const fn page_window(page: u16) -> [u8; 3] {
    [cmd::SET_PAGE_ADDR, page as u8, page as u8]
}
