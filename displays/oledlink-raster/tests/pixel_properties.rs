//! Property tests for pixel addressing

use oledlink_raster::{FrameBuffer, RasterError, PAGE_HEIGHT};
use proptest::prelude::*;

const WIDTH: u8 = 128;
const HEIGHT: u8 = 64;

proptest! {
    #[test]
    fn set_then_read_returns_value(x in 0..WIDTH, y in 0..HEIGHT, on: bool) {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(WIDTH, HEIGHT, &mut buf).unwrap();
        fb.fill(!on);
        fb.set_pixel(x, y, on).unwrap();
        prop_assert_eq!(fb.pixel(x, y), Ok(on));

        let index = usize::from(y / PAGE_HEIGHT) * usize::from(WIDTH) + usize::from(x);
        let mask = 1u8 << (y % PAGE_HEIGHT);
        prop_assert_eq!(fb.as_bytes()[index] & mask != 0, on);
    }

    #[test]
    fn set_touches_one_byte(x in 0..WIDTH, y in 0..HEIGHT) {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(WIDTH, HEIGHT, &mut buf).unwrap();
        fb.set_pixel(x, y, true).unwrap();
        let lit = fb.as_bytes().iter().filter(|&&b| b != 0).count();
        prop_assert_eq!(lit, 1);
    }

    #[test]
    fn out_of_range_is_rejected_without_change(x in WIDTH..=u8::MAX, y: u8, on: bool) {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(WIDTH, HEIGHT, &mut buf).unwrap();
        fb.set_pixel(5, 5, true).unwrap();
        let before = fb.as_bytes().to_vec();

        prop_assert_eq!(fb.set_pixel(x, y, on), Err(RasterError::Bounds));
        prop_assert_eq!(fb.set_pixel(y % WIDTH, HEIGHT.saturating_add(y % 64), on), Err(RasterError::Bounds));
        prop_assert_eq!(fb.as_bytes(), &before[..]);
    }
}
