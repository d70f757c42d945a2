use crate::surface::{Rgb, Stroke, Surface};

/// Page background behind the visualization, matching the reference look.
pub const PAGE_BG: Rgb = Rgb::new(0x1a, 0x1a, 0x2e);

/// Software canvas: a fixed RGB pixel grid the scene draws into and the
/// terminal presenter samples from. Repainted from scratch every frame.
pub struct Raster {
    width: usize,
    height: usize,
    px: Vec<Rgb>,
}

impl Raster {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            px: vec![PAGE_BG; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.width + x]
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, color: Rgb) {
        self.px[y * self.width + x] = color;
    }

    /// Clipped pixel range [lo, hi) covering `from..=to` in one axis.
    fn span(from: f32, to: f32, limit: usize) -> (usize, usize) {
        let lo = from.floor().max(0.0) as usize;
        let hi = (to.ceil().max(0.0) as usize + 1).min(limit);
        (lo.min(limit), hi)
    }
}

impl Surface for Raster {
    fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    fn clear(&mut self) {
        self.px.fill(PAGE_BG);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgb) {
        if r <= 0.0 {
            return;
        }
        let (x_lo, x_hi) = Self::span(cx - r, cx + r, self.width);
        let (y_lo, y_hi) = Self::span(cy - r, cy + r, self.height);
        let r2 = r * r;

        for y in y_lo..y_hi {
            let dy = y as f32 + 0.5 - cy;
            for x in x_lo..x_hi {
                let dx = x as f32 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    self.set(x, y, color);
                }
            }
        }
    }

    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, stroke: Stroke) {
        let half = stroke.width / 2.0;
        if half <= 0.0 {
            return;
        }

        let pad = half + 1.0;
        let (x_lo, x_hi) =
            Self::span(x0.min(x1) - pad, x0.max(x1) + pad, self.width);
        let (y_lo, y_hi) =
            Self::span(y0.min(y1) - pad, y0.max(y1) + pad, self.height);

        let vx = x1 - x0;
        let vy = y1 - y0;
        let len2 = vx * vx + vy * vy;
        let half2 = half * half;

        for y in y_lo..y_hi {
            let py = y as f32 + 0.5;
            for x in x_lo..x_hi {
                let px = x as f32 + 0.5;

                // distance to the segment; the clamp gives round caps
                let t = if len2 > 0.0 {
                    ((px - x0) * vx + (py - y0) * vy) / len2
                } else {
                    0.0
                };
                let t = t.clamp(0.0, 1.0);
                let dx = px - (x0 + t * vx);
                let dy = py - (y0 + t * vy);

                if dx * dx + dy * dy <= half2 {
                    self.set(x, y, stroke.color);
                }
            }
        }
    }
}
