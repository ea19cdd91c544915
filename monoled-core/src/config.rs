//! Display geometry configuration
//!
//! Describes one physical panel. The values are fixed for the life of a
//! display handle.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pixel rows per display page
pub const PAGE_HEIGHT: u16 = 8;

/// Widest supported panel (column addresses are a single byte)
pub const MAX_WIDTH: u16 = 256;

/// Tallest supported panel (multiplex ratio is a single byte)
pub const MAX_HEIGHT: u16 = 256;

/// Highest 7-bit I2C address
pub const MAX_ADDRESS: u8 = 0x7F;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width is zero or wider than [`MAX_WIDTH`]
    InvalidWidth(u16),
    /// Height is zero, above [`MAX_HEIGHT`] or not a multiple of 8
    InvalidHeight(u16),
    /// Address does not fit in 7 bits
    InvalidAddress(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWidth(w) => write!(f, "invalid display width {}", w),
            Self::InvalidHeight(h) => write!(f, "invalid display height {}", h),
            Self::InvalidAddress(a) => write!(f, "invalid I2C address 0x{:02x}", a),
        }
    }
}

/// Check that a framebuffer of `width` x `height` can be addressed
pub fn validate_dimensions(width: u16, height: u16) -> Result<(), ConfigError> {
    if width == 0 || width > MAX_WIDTH {
        return Err(ConfigError::InvalidWidth(width));
    }
    if height == 0 || height > MAX_HEIGHT || height % PAGE_HEIGHT != 0 {
        return Err(ConfigError::InvalidHeight(height));
    }
    Ok(())
}

/// Panel description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels (multiple of 8)
    pub height: u16,
    /// 7-bit I2C address
    pub address: u8,
    /// Panel supplied by an external VCC rail instead of the internal charge pump
    pub external_vcc: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::SSD1306_128X64
    }
}

impl DisplayConfig {
    /// Common 0.96" 128x64 module at 0x3C
    pub const SSD1306_128X64: Self = Self {
        width: 128,
        height: 64,
        address: 0x3C,
        external_vcc: false,
    };

    /// Common 0.91" 128x32 module at 0x3C
    pub const SSD1306_128X32: Self = Self {
        width: 128,
        height: 32,
        address: 0x3C,
        external_vcc: false,
    };

    /// Use a different I2C address
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Select external VCC supply
    pub const fn with_external_vcc(mut self, external_vcc: bool) -> Self {
        self.external_vcc = external_vcc;
        self
    }

    /// Number of 8-row pages
    pub const fn pages(&self) -> u16 {
        self.height / PAGE_HEIGHT
    }

    /// Framebuffer size in bytes
    pub const fn buffer_len(&self) -> usize {
        self.pages() as usize * self.width as usize
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dimensions(self.width, self.height)?;
        if self.address > MAX_ADDRESS {
            return Err(ConfigError::InvalidAddress(self.address));
        }
        Ok(())
    }
}
