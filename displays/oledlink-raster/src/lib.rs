//! Frame buffer and rasterizer for oledlink displays
//!
//! This crate provides:
//! - `FrameBuffer`, a page-major 1-bit bitmap over caller-owned memory
//! - `DrawParams`, the color/fill flag byte accepted by shape operations
//! - Pixel, line, rectangle, rounded rectangle and circle drawing
//!
//! # Memory Layout
//!
//! The display is split into pages of 8 pixel rows. Each byte holds one
//! column of a page, least significant bit at the top:
//!
//! ```text
//!          x=0   x=1   x=2  ...  x=width-1
//! page 0  [b0 ] [b1 ] [b2 ] ... [b(w-1)]     rows 0..7
//! page 1  [bw ] [bw+1] ...                   rows 8..15
//! ```
//!
//! This is the controller's native transfer order, so the bus driver can
//! stream one page as a contiguous slice.
//!
//! Nothing here touches the bus. Drawing only changes memory; the driver
//! transmits it on the next refresh.

#![no_std]
#![deny(unsafe_code)]

pub mod framebuffer;
#[cfg(feature = "embedded-graphics")]
pub mod graphics;
pub mod params;
pub mod shapes;

// Re-export key types
pub use framebuffer::{FrameBuffer, RasterError, PAGE_HEIGHT};
pub use params::DrawParams;
