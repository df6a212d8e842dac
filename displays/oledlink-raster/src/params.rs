//! Drawing parameters
//!
//! Shape operations take a flag byte selecting pixel color and whether the
//! shape is filled. Raw bytes from outside the crate go through
//! [`DrawParams::from_bits`], which rejects undefined bits.

use core::ops::BitOr;

use crate::framebuffer::RasterError;

/// Color and fill flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrawParams(u8);

impl DrawParams {
    /// Pixels off, outline only
    pub const OFF: Self = Self(0x00);
    /// Pixels on
    pub const ON: Self = Self(0x01);
    /// Fill the shape interior
    pub const FILL: Self = Self(0x02);

    const DEFINED: u8 = Self::ON.0 | Self::FILL.0;

    /// Validate a raw flag byte
    pub const fn from_bits(bits: u8) -> Result<Self, RasterError> {
        if bits & !Self::DEFINED != 0 {
            return Err(RasterError::InvalidParameter);
        }
        Ok(Self(bits))
    }

    /// Raw flag byte
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Pixel state the shape is drawn with
    pub const fn color(self) -> bool {
        self.0 & Self::ON.0 != 0
    }

    /// Whether the interior is filled
    pub const fn is_fill(self) -> bool {
        self.0 & Self::FILL.0 != 0
    }
}

impl BitOr for DrawParams {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
