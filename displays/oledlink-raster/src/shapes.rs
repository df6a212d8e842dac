//! Shape rasterization
//!
//! All shapes write straight into the frame buffer. Public operations
//! validate their inputs and return [`RasterError`] before touching any
//! pixel; the span and quadrant helpers below clip silently.

use crate::framebuffer::{FrameBuffer, RasterError};
use crate::params::DrawParams;

/// Quadrant masks for the circle helpers
mod corner {
    pub const UPPER_LEFT: u8 = 0x1;
    pub const UPPER_RIGHT: u8 = 0x2;
    pub const LOWER_RIGHT: u8 = 0x4;
    pub const LOWER_LEFT: u8 = 0x8;
    pub const ALL: u8 = 0xF;

    /// Fill masks select a half: right or left of the center column
    pub const RIGHT_HALF: u8 = 0x1;
    pub const LEFT_HALF: u8 = 0x2;
}

/// Clamped and normalized corners (inclusive)
#[derive(Debug, Clone, Copy)]
struct Area {
    x0: i16,
    y0: i16,
    x1: i16,
    y1: i16,
}

impl Area {
    fn width(&self) -> i16 {
        self.x1 - self.x0 + 1
    }

    fn height(&self) -> i16 {
        self.y1 - self.y0 + 1
    }
}

impl FrameBuffer<'_> {
    /// Draw a line between two points
    ///
    /// Both endpoints must lie on the display.
    pub fn line(&mut self, x0: u8, y0: u8, x1: u8, y1: u8, params: DrawParams) -> Result<(), RasterError> {
        let (w, h) = (self.width(), self.height());
        if x0 >= w || x1 >= w || y0 >= h || y1 >= h {
            return Err(RasterError::Bounds);
        }
        self.bresenham(
            i16::from(x0),
            i16::from(y0),
            i16::from(x1),
            i16::from(y1),
            params.color(),
        );
        Ok(())
    }

    /// Draw a rectangle between two opposite corners
    ///
    /// Coordinates past the display edge are clamped to it. The call only
    /// fails when all four coordinates are out of range.
    pub fn rectangle(&mut self, x0: u8, y0: u8, x1: u8, y1: u8, params: DrawParams) -> Result<(), RasterError> {
        let area = self.clamp_area(x0, y0, x1, y1)?;
        let on = params.color();

        if params.is_fill() {
            for x in area.x0..=area.x1 {
                self.vspan(x, area.y0, area.y1, on);
            }
        } else {
            self.hspan(area.x0, area.x1, area.y0, on);
            self.hspan(area.x0, area.x1, area.y1, on);
            self.vspan(area.x0, area.y0, area.y1, on);
            self.vspan(area.x1, area.y0, area.y1, on);
        }

        Ok(())
    }

    /// Draw a rectangle with rounded corners of radius `r`
    ///
    /// Clamping follows [`rectangle`](Self::rectangle). The radius is
    /// limited to half the shorter side.
    pub fn rounded_rectangle(
        &mut self,
        x0: u8,
        y0: u8,
        x1: u8,
        y1: u8,
        r: u8,
        params: DrawParams,
    ) -> Result<(), RasterError> {
        let a = self.clamp_area(x0, y0, x1, y1)?;
        let r = i16::from(r).min(a.width().min(a.height()) / 2);
        let on = params.color();

        if params.is_fill() {
            for x in (a.x0 + r)..=(a.x1 - r) {
                self.vspan(x, a.y0, a.y1, on);
            }
            let delta = a.height() - 2 * r - 1;
            self.quadrant_fill(a.x1 - r, a.y0 + r, r, corner::RIGHT_HALF, delta, on);
            self.quadrant_fill(a.x0 + r, a.y0 + r, r, corner::LEFT_HALF, delta, on);
        } else {
            self.hspan(a.x0 + r, a.x1 - r, a.y0, on);
            self.hspan(a.x0 + r, a.x1 - r, a.y1, on);
            self.vspan(a.x0, a.y0 + r, a.y1 - r, on);
            self.vspan(a.x1, a.y0 + r, a.y1 - r, on);
            self.quadrant_outline(a.x0 + r, a.y0 + r, r, corner::UPPER_LEFT, on);
            self.quadrant_outline(a.x1 - r, a.y0 + r, r, corner::UPPER_RIGHT, on);
            self.quadrant_outline(a.x1 - r, a.y1 - r, r, corner::LOWER_RIGHT, on);
            self.quadrant_outline(a.x0 + r, a.y1 - r, r, corner::LOWER_LEFT, on);
        }

        Ok(())
    }

    /// Draw a circle of radius `r` around (`cx`, `cy`)
    ///
    /// The center must lie on the display; the rim is clipped.
    pub fn circle(&mut self, cx: u8, cy: u8, r: u8, params: DrawParams) -> Result<(), RasterError> {
        if cx >= self.width() || cy >= self.height() {
            return Err(RasterError::Bounds);
        }
        let (cx, cy, r) = (i16::from(cx), i16::from(cy), i16::from(r));
        let on = params.color();

        if params.is_fill() {
            self.vspan(cx, cy - r, cy + r, on);
            self.quadrant_fill(cx, cy, r, corner::RIGHT_HALF | corner::LEFT_HALF, 0, on);
        } else {
            self.put(cx, cy + r, on);
            self.put(cx, cy - r, on);
            self.put(cx + r, cy, on);
            self.put(cx - r, cy, on);
            self.quadrant_outline(cx, cy, r, corner::ALL, on);
        }

        Ok(())
    }

    fn clamp_area(&self, x0: u8, y0: u8, x1: u8, y1: u8) -> Result<Area, RasterError> {
        let w_max = self.width() - 1;
        let h_max = self.height() - 1;
        let mut out_of_range = 0;
        let mut clamp = |v: u8, max: u8| {
            if v > max {
                out_of_range += 1;
                max
            } else {
                v
            }
        };

        let (x0, x1) = (clamp(x0, w_max), clamp(x1, w_max));
        let (y0, y1) = (clamp(y0, h_max), clamp(y1, h_max));
        if out_of_range >= 4 {
            return Err(RasterError::Bounds);
        }

        Ok(Area {
            x0: i16::from(x0.min(x1)),
            y0: i16::from(y0.min(y1)),
            x1: i16::from(x0.max(x1)),
            y1: i16::from(y0.max(y1)),
        })
    }

    fn hspan(&mut self, x_from: i16, x_to: i16, y: i16, on: bool) {
        for x in x_from..=x_to {
            self.put(x, y, on);
        }
    }

    fn vspan(&mut self, x: i16, y_from: i16, y_to: i16, on: bool) {
        for y in y_from..=y_to {
            self.put(x, y, on);
        }
    }

    fn bresenham(&mut self, mut x0: i16, mut y0: i16, x1: i16, y1: i16, on: bool) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, on);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Midpoint arc for the quadrants selected by `mask`
    ///
    /// Axis points (x = 0) are not drawn; callers add them.
    fn quadrant_outline(&mut self, cx: i16, cy: i16, r: i16, mask: u8, on: bool) {
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            if mask & corner::LOWER_RIGHT != 0 {
                self.put(cx + x, cy + y, on);
                self.put(cx + y, cy + x, on);
            }
            if mask & corner::UPPER_RIGHT != 0 {
                self.put(cx + x, cy - y, on);
                self.put(cx + y, cy - x, on);
            }
            if mask & corner::LOWER_LEFT != 0 {
                self.put(cx - y, cy + x, on);
                self.put(cx - x, cy + y, on);
            }
            if mask & corner::UPPER_LEFT != 0 {
                self.put(cx - y, cy - x, on);
                self.put(cx - x, cy - y, on);
            }
        }
    }

    /// Vertical spans filling the halves selected by `mask`
    ///
    /// `delta` stretches every span downwards, which turns two half
    /// circles into the rounded ends of a tall rectangle.
    fn quadrant_fill(&mut self, cx: i16, cy: i16, r: i16, mask: u8, delta: i16, on: bool) {
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            if mask & corner::RIGHT_HALF != 0 {
                self.vspan(cx + x, cy - y, cy + y + delta, on);
                self.vspan(cx + y, cy - x, cy + x + delta, on);
            }
            if mask & corner::LEFT_HALF != 0 {
                self.vspan(cx - x, cy - y, cy + y + delta, on);
                self.vspan(cx - y, cy - x, cy + x + delta, on);
            }
        }
    }
}
