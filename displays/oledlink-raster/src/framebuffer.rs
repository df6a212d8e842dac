//! Page-major frame buffer
//!
//! Wraps a caller-owned byte slice. The buffer only borrows the memory, so
//! the same storage can be handed to the display driver for transmission.

/// Pixel rows per page
pub const PAGE_HEIGHT: u8 = 8;

/// Rasterizer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RasterError {
    /// Coordinates outside the display
    Bounds,
    /// Flag bits outside the defined set, or a zero-sized display
    InvalidParameter,
    /// Backing slice shorter than `width * pages`
    BufferTooSmall,
}

impl core::fmt::Display for RasterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RasterError::Bounds => f.write_str("coordinates outside display"),
            RasterError::InvalidParameter => f.write_str("invalid drawing parameter"),
            RasterError::BufferTooSmall => f.write_str("frame buffer too small"),
        }
    }
}

/// 1-bit bitmap in controller page order
#[derive(Debug)]
pub struct FrameBuffer<'a> {
    width: u8,
    height: u8,
    bytes: &'a mut [u8],
}

impl<'a> FrameBuffer<'a> {
    /// Number of pages needed for `height` pixel rows
    pub const fn page_count(height: u8) -> u8 {
        ((height as u16 + PAGE_HEIGHT as u16 - 1) / PAGE_HEIGHT as u16) as u8
    }

    /// Minimum backing length for a `width` × `height` display
    pub const fn required_len(width: u8, height: u8) -> usize {
        width as usize * Self::page_count(height) as usize
    }

    /// Wrap `bytes` as a `width` × `height` bitmap
    ///
    /// Extra bytes past [`required_len`](Self::required_len) are left alone.
    pub fn new(width: u8, height: u8, bytes: &'a mut [u8]) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidParameter);
        }
        let len = Self::required_len(width, height);
        if bytes.len() < len {
            return Err(RasterError::BufferTooSmall);
        }
        Ok(Self {
            width,
            height,
            bytes: &mut bytes[..len],
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of pages
    pub fn pages(&self) -> u8 {
        Self::page_count(self.height)
    }

    /// Bytes of one page, `width` long
    pub fn page(&self, page: u8) -> Option<&[u8]> {
        if page >= self.pages() {
            return None;
        }
        let start = usize::from(page) * usize::from(self.width);
        self.bytes.get(start..start + usize::from(self.width))
    }

    /// The whole bitmap
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.fill(false);
    }

    /// Set every pixel to `on`
    pub fn fill(&mut self, on: bool) {
        self.bytes.fill(if on { 0xFF } else { 0x00 });
    }

    /// Set one pixel
    pub fn set_pixel(&mut self, x: u8, y: u8, on: bool) -> Result<(), RasterError> {
        if x >= self.width || y >= self.height {
            return Err(RasterError::Bounds);
        }
        self.put(i16::from(x), i16::from(y), on);
        Ok(())
    }

    /// Read one pixel
    pub fn pixel(&self, x: u8, y: u8) -> Result<bool, RasterError> {
        if x >= self.width || y >= self.height {
            return Err(RasterError::Bounds);
        }
        let (index, mask) = self.locate(x, y);
        Ok(self.bytes[index] & mask != 0)
    }

    /// Set a pixel, silently skipping coordinates off the display
    pub(crate) fn put(&mut self, x: i16, y: i16, on: bool) {
        if x < 0 || y < 0 || x >= i16::from(self.width) || y >= i16::from(self.height) {
            return;
        }
        let (index, mask) = self.locate(x as u8, y as u8);
        if on {
            self.bytes[index] |= mask;
        } else {
            self.bytes[index] &= !mask;
        }
    }

    fn locate(&self, x: u8, y: u8) -> (usize, u8) {
        let page = usize::from(y / PAGE_HEIGHT);
        let index = page * usize::from(self.width) + usize::from(x);
        (index, 1 << (y % PAGE_HEIGHT))
    }
}
