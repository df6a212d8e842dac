//! Display configuration
//!
//! Geometry and bus address of one panel. With the `serde` feature the
//! configuration can be stored as postcard binary data alongside the rest
//! of a board's settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use oledlink_raster::{FrameBuffer, PAGE_HEIGHT};

use crate::error::Error;

/// Highest 7-bit bus address
pub const MAX_ADDRESS: u8 = 0x7F;

/// Page select carries the page in a nibble
pub const MAX_PAGES: u8 = 16;

/// Panel geometry and bus address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Width in pixels (columns)
    pub width: u8,
    /// Height in pixels (rows)
    pub height: u8,
    /// 7-bit bus address
    pub address: u8,
}

impl DisplayConfig {
    /// 128×64 module at the usual 0x3C address
    pub const SSD1306_128X64: Self = Self::new(128, 64, 0x3C);

    /// 128×32 module at the usual 0x3C address
    pub const SSD1306_128X32: Self = Self::new(128, 32, 0x3C);

    pub const fn new(width: u8, height: u8, address: u8) -> Self {
        Self {
            width,
            height,
            address,
        }
    }

    /// Same geometry at another bus address
    pub const fn with_address(self, address: u8) -> Self {
        Self { address, ..self }
    }

    /// Number of 8-row pages
    pub const fn pages(&self) -> u8 {
        FrameBuffer::page_count(self.height)
    }

    /// Frame buffer bytes needed for this geometry
    pub const fn buffer_len(&self) -> usize {
        FrameBuffer::required_len(self.width, self.height)
    }

    /// Check that the geometry and address can be driven
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 || self.address > MAX_ADDRESS {
            return Err(Error::InvalidParameter);
        }
        if u16::from(self.height) > u16::from(MAX_PAGES) * u16::from(PAGE_HEIGHT) {
            return Err(Error::InvalidParameter);
        }
        Ok(())
    }

    /// Serialize into `buf`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_postcard<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], Error> {
        postcard::to_slice(self, buf).map_err(|_| Error::Overflow)
    }

    /// Deserialize and validate a stored configuration
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, Error> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| Error::InvalidParameter)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::SSD1306_128X64
    }
}
