//! Error type shared by the bus and display layers

use oledlink_raster::RasterError;

/// Errors returned by display and bus operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bus or lock held by another operation
    Busy,
    /// Coordinates outside the display
    Bounds,
    /// Argument outside its accepted range
    InvalidParameter,
    /// Prefix or payload larger than a transaction can hold
    Overflow,
}

impl From<RasterError> for Error {
    fn from(err: RasterError) -> Self {
        match err {
            RasterError::Bounds => Error::Bounds,
            RasterError::InvalidParameter | RasterError::BufferTooSmall => {
                Error::InvalidParameter
            }
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Busy => f.write_str("bus busy"),
            Error::Bounds => f.write_str("coordinates outside display"),
            Error::InvalidParameter => f.write_str("invalid parameter"),
            Error::Overflow => f.write_str("transaction too large"),
        }
    }
}
